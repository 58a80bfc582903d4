//! The submission gate: who may move a week between lifecycle states.
//!
//! Draft → Submitted → {Approved, Rejected}, with Rejected → Submitted
//! re-entry (a mentor decision never locks the entries; the intern can
//! rework and resubmit). Validation is pure given the actors and the
//! current aggregate state, so it runs before any store write.

use strum::Display;

use super::bundle::BundleState;
use super::category::EntryState;
use super::error::LogbookError;
use super::models::UserId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum Transition {
    Submit,
    Approve,
    Reject,
}

impl Transition {
    /// The tag state every member entry is rewritten to.
    pub fn target_state(&self) -> EntryState {
        match self {
            Transition::Submit => EntryState::Submitted,
            Transition::Approve => EntryState::Approved,
            Transition::Reject => EntryState::Rejected,
        }
    }
}

/// Actors relevant to one gate decision: who is asking, who owns the
/// bundle, and which mentor (if any) is assigned via the owner's project.
#[derive(Debug, Clone, Copy)]
pub struct GateContext {
    pub actor: UserId,
    pub owner: UserId,
    pub mentor: Option<UserId>,
}

/// Central transition check. Permission first, then existence, then the
/// transition table, so a forbidden caller learns nothing about the
/// bundle's contents.
pub fn authorize(
    transition: Transition,
    ctx: &GateContext,
    current: BundleState,
    week: u32,
    entry_count: usize,
) -> Result<(), LogbookError> {
    let permitted = match transition {
        Transition::Submit => ctx.actor == ctx.owner,
        Transition::Approve | Transition::Reject => ctx.mentor == Some(ctx.actor),
    };
    if !permitted {
        return Err(LogbookError::Forbidden);
    }

    if entry_count == 0 {
        return Err(LogbookError::NotFound(week));
    }

    let allowed_from = match transition {
        Transition::Submit => matches!(current, BundleState::Draft | BundleState::Rejected),
        Transition::Approve | Transition::Reject => current == BundleState::Submitted,
    };
    if !allowed_from {
        return Err(LogbookError::InvalidTransition {
            from: current,
            transition,
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const INTERN: UserId = UserId::new(1);
    const MENTOR: UserId = UserId::new(2);
    const OTHER: UserId = UserId::new(3);

    fn ctx(actor: UserId) -> GateContext {
        GateContext {
            actor,
            owner: INTERN,
            mentor: Some(MENTOR),
        }
    }

    #[test]
    fn intern_submits_own_draft() {
        assert!(authorize(Transition::Submit, &ctx(INTERN), BundleState::Draft, 4, 3).is_ok());
    }

    #[test]
    fn rejected_week_can_be_resubmitted() {
        assert!(authorize(Transition::Submit, &ctx(INTERN), BundleState::Rejected, 4, 3).is_ok());
    }

    #[test]
    fn submitted_week_cannot_be_submitted_again() {
        let err =
            authorize(Transition::Submit, &ctx(INTERN), BundleState::Submitted, 4, 3).unwrap_err();
        assert!(matches!(
            err,
            LogbookError::InvalidTransition {
                from: BundleState::Submitted,
                transition: Transition::Submit,
            }
        ));
    }

    #[test]
    fn only_the_owner_submits() {
        let err = authorize(Transition::Submit, &ctx(OTHER), BundleState::Draft, 4, 3).unwrap_err();
        assert!(matches!(err, LogbookError::Forbidden));

        // the mentor cannot submit on the intern's behalf either
        let err =
            authorize(Transition::Submit, &ctx(MENTOR), BundleState::Draft, 4, 3).unwrap_err();
        assert!(matches!(err, LogbookError::Forbidden));
    }

    #[test]
    fn empty_week_is_not_found() {
        let err = authorize(Transition::Submit, &ctx(INTERN), BundleState::Draft, 4, 0).unwrap_err();
        assert!(matches!(err, LogbookError::NotFound(4)));
    }

    #[test]
    fn mentor_approves_submitted_week() {
        assert!(authorize(Transition::Approve, &ctx(MENTOR), BundleState::Submitted, 4, 3).is_ok());
        assert!(authorize(Transition::Reject, &ctx(MENTOR), BundleState::Submitted, 4, 3).is_ok());
    }

    #[test]
    fn intern_cannot_approve_own_week() {
        let err =
            authorize(Transition::Approve, &ctx(INTERN), BundleState::Submitted, 4, 3).unwrap_err();
        assert!(matches!(err, LogbookError::Forbidden));
    }

    #[test]
    fn unassigned_week_has_no_approver() {
        let ctx = GateContext {
            actor: MENTOR,
            owner: INTERN,
            mentor: None,
        };
        let err =
            authorize(Transition::Approve, &ctx, BundleState::Submitted, 4, 3).unwrap_err();
        assert!(matches!(err, LogbookError::Forbidden));
    }

    #[test]
    fn approval_requires_a_submitted_week() {
        for from in [BundleState::Draft, BundleState::Approved, BundleState::Rejected] {
            let err = authorize(Transition::Approve, &ctx(MENTOR), from, 4, 3).unwrap_err();
            assert!(matches!(err, LogbookError::InvalidTransition { .. }));
        }
    }

    #[test]
    fn permission_is_checked_before_existence() {
        // wrong actor on an empty week: Forbidden, not NotFound
        let err = authorize(Transition::Submit, &ctx(OTHER), BundleState::Draft, 4, 0).unwrap_err();
        assert!(matches!(err, LogbookError::Forbidden));
    }

    #[test]
    fn transitions_map_to_tag_states() {
        assert_eq!(Transition::Submit.target_state(), EntryState::Submitted);
        assert_eq!(Transition::Approve.target_state(), EntryState::Approved);
        assert_eq!(Transition::Reject.target_state(), EntryState::Rejected);
    }
}
