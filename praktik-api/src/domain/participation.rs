use serde::Serialize;
use std::str::FromStr;
use strum::{Display, EnumString};

use super::models::{ProjectId, UserId};

/// Role of a user inside one project: plain member (the intern side) or
/// person-in-charge (the mentor side).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum ParticipantRole {
    Member,
    Pic,
}

impl From<String> for ParticipantRole {
    fn from(role: String) -> Self {
        ParticipantRole::from_str(&role).unwrap_or(ParticipantRole::Member)
    }
}

/// One `project_participants` row.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Participation {
    pub id: i32,
    pub project_id: i32,
    pub user_id: i32,
    pub role_in_project: String,
}

impl Participation {
    pub fn role(&self) -> ParticipantRole {
        ParticipantRole::from(self.role_in_project.clone())
    }
}

/// An intern's resolved placement: their current project and, if one is
/// registered, the mentor in charge of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    pub project_id: ProjectId,
    pub mentor_id: Option<UserId>,
}

/// Resolve a user's assignment from the participation rows of their
/// projects: the first row where the user is a plain member picks the
/// project, and that project's `pic` row (if any) picks the mentor.
/// Returns `None` for users without a membership — no project means the
/// submission workflow is unreachable for them.
pub fn resolve_assignment(user: UserId, rows: &[Participation]) -> Option<Assignment> {
    let project_id = rows
        .iter()
        .find(|row| row.user_id == user.as_i32() && row.role() == ParticipantRole::Member)
        .map(|row| row.project_id)?;

    let mentor_id = rows
        .iter()
        .find(|row| row.project_id == project_id && row.role() == ParticipantRole::Pic)
        .map(|row| UserId::new(row.user_id));

    Some(Assignment {
        project_id: ProjectId::new(project_id),
        mentor_id,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(id: i32, project_id: i32, user_id: i32, role: &str) -> Participation {
        Participation {
            id,
            project_id,
            user_id,
            role_in_project: role.to_string(),
        }
    }

    #[test]
    fn resolves_project_and_mentor() {
        let rows = vec![
            row(1, 10, 1, "member"),
            row(2, 10, 2, "pic"),
            row(3, 10, 3, "member"),
        ];

        let assignment = resolve_assignment(UserId::new(1), &rows).unwrap();
        assert_eq!(assignment.project_id, ProjectId::new(10));
        assert_eq!(assignment.mentor_id, Some(UserId::new(2)));
    }

    #[test]
    fn no_membership_means_unassigned() {
        let rows = vec![row(1, 10, 2, "pic")];
        assert_eq!(resolve_assignment(UserId::new(1), &rows), None);
        assert_eq!(resolve_assignment(UserId::new(1), &[]), None);
    }

    #[test]
    fn project_without_pic_has_no_mentor() {
        let rows = vec![row(1, 10, 1, "member")];
        let assignment = resolve_assignment(UserId::new(1), &rows).unwrap();
        assert_eq!(assignment.mentor_id, None);
    }

    #[test]
    fn first_membership_wins() {
        let rows = vec![
            row(1, 10, 1, "member"),
            row(2, 20, 1, "member"),
            row(3, 20, 5, "pic"),
            row(4, 10, 2, "pic"),
        ];

        let assignment = resolve_assignment(UserId::new(1), &rows).unwrap();
        assert_eq!(assignment.project_id, ProjectId::new(10));
        assert_eq!(assignment.mentor_id, Some(UserId::new(2)));
    }

    #[test]
    fn other_projects_pic_is_ignored() {
        let rows = vec![row(1, 10, 1, "member"), row(2, 20, 5, "pic")];
        let assignment = resolve_assignment(UserId::new(1), &rows).unwrap();
        assert_eq!(assignment.mentor_id, None);
    }

    #[test]
    fn own_pic_row_does_not_count_as_membership() {
        let rows = vec![row(1, 10, 2, "pic"), row(2, 10, 1, "member")];
        assert_eq!(resolve_assignment(UserId::new(2), &rows), None);
    }
}
