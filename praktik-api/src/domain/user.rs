use std::fmt;
use std::str::FromStr;

use crate::domain::models::UserId;
use axum_login::AuthUser;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Program-wide role of a user. Declaration order is the view-gating
/// hierarchy: admin ⊇ superuser ⊇ mentor ⊇ intern.
#[derive(
    Debug,
    Clone,
    Copy,
    Serialize,
    Deserialize,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Display,
    EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Role {
    Intern,
    Mentor,
    Superuser,
    Admin,
}

impl Role {
    /// Whether this role is at least `required` in the hierarchy.
    ///
    /// Only used for view gating; the submission lifecycle checks
    /// ownership and mentor assignment, never the hierarchy.
    pub fn grants(&self, required: Role) -> bool {
        *self >= required
    }
}

impl From<String> for Role {
    fn from(role: String) -> Self {
        Role::from_str(&role).unwrap_or(Role::Intern)
    }
}

#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub full_name: String,
    pub picture: String,
    #[serde(skip)]
    pub access_token: String,
    pub role: Role,
}

impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("full_name", &self.full_name)
            .field("picture", &self.picture)
            .field("role", &self.role)
            .field("access_token", &"[redacted]")
            .finish()
    }
}

impl AuthUser for User {
    type Id = i64;

    fn id(&self) -> Self::Id {
        self.id.as_i32().into()
    }

    fn session_auth_hash(&self) -> &[u8] {
        self.access_token.as_bytes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_hierarchy() {
        assert!(Role::Admin.grants(Role::Superuser));
        assert!(Role::Superuser.grants(Role::Mentor));
        assert!(Role::Mentor.grants(Role::Intern));
        assert!(Role::Intern.grants(Role::Intern));

        assert!(!Role::Intern.grants(Role::Mentor));
        assert!(!Role::Mentor.grants(Role::Superuser));
        assert!(!Role::Superuser.grants(Role::Admin));
    }

    #[test]
    fn role_from_db_string() {
        assert_eq!(Role::from("mentor".to_string()), Role::Mentor);
        assert_eq!(Role::from("Admin".to_string()), Role::Admin);
        // unknown strings default to the least privileged role
        assert_eq!(Role::from("wizard".to_string()), Role::Intern);
    }

    #[test]
    fn role_round_trips_as_lowercase() {
        assert_eq!(Role::Superuser.to_string(), "superuser");
        assert_eq!(Role::from(Role::Superuser.to_string()), Role::Superuser);
    }
}
