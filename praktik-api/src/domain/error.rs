use thiserror::Error;

use crate::repositories::RepositoryError;

use super::{bundle::BundleState, submission::Transition};

/// Failures of the logbook lifecycle.
///
/// `InvalidWeek` and `Forbidden` are raised before any store write, so a
/// failed call never leaves side effects. Store failures during a bulk
/// retag can leave a week with mixed tags; that is not an error state of
/// its own — the aggregator's precedence rule reads it deterministically
/// and re-issuing the same transition converges.
#[derive(Debug, Error)]
pub enum LogbookError {
    #[error("invalid week number: {0}")]
    InvalidWeek(i64),
    #[error("not permitted to perform this operation")]
    Forbidden,
    #[error("no entries found for week {0}")]
    NotFound(u32),
    #[error("cannot {transition} a week that is {from}")]
    InvalidTransition {
        from: BundleState,
        transition: Transition,
    },
    #[error(transparent)]
    Store(#[from] RepositoryError),
}
