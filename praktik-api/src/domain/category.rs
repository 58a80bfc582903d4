//! Codec for the category strings that carry the weekly lifecycle.
//!
//! A tagged entry's category is `weekly_<N>_log_<state>` with an optional
//! `_<detail>` suffix (rejection reason). This format is the persisted
//! contract with already-stored rows and must stay stable.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use strum::{Display, EnumString};

use super::error::LogbookError;

/// Lifecycle state carried by a single entry's tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum EntryState {
    Submitted,
    Approved,
    Rejected,
}

/// SQL LIKE patterns that discover tagged entries per state.
/// `_` is a LIKE wildcard, hence the escapes.
pub const SUBMITTED_LIKE: &str = r"weekly\_%\_log\_submitted";
pub const APPROVED_LIKE: &str = r"weekly\_%\_log\_approved";
pub const REJECTED_LIKE: &str = r"weekly\_%\_log\_rejected%";

/// LIKE pattern matching every tag of one week, any state.
pub fn week_like_pattern(week: u32) -> String {
    format!(r"weekly\_{}\_log\_%", week)
}

// Anchored on both ends so free text containing a tag-shaped substring
// never false-positives.
static CATEGORY_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^weekly_([0-9]+)_log_(submitted|approved|rejected)(?:_(.+))?$").unwrap()
});

/// A decoded category tag: which week, which state, optional detail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeekTag {
    pub week: u32,
    pub state: EntryState,
    pub detail: Option<String>,
}

impl WeekTag {
    /// Build a tag for a positive week number.
    pub fn new(week: u32, state: EntryState) -> Result<Self, LogbookError> {
        if week == 0 {
            return Err(LogbookError::InvalidWeek(0));
        }
        Ok(Self {
            week,
            state,
            detail: None,
        })
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        let detail = detail.into();
        self.detail = (!detail.is_empty()).then_some(detail);
        self
    }

    pub fn encode(&self) -> String {
        match &self.detail {
            Some(detail) => format!("weekly_{}_log_{}_{}", self.week, self.state, detail),
            None => format!("weekly_{}_log_{}", self.week, self.state),
        }
    }

    /// Parse a category string. Anything that does not match the tag
    /// format is an ordinary daily-draft category, so this returns `None`
    /// rather than an error.
    pub fn decode(category: &str) -> Option<Self> {
        let caps = CATEGORY_PATTERN.captures(category)?;
        let week = caps[1].parse::<u32>().ok().filter(|week| *week > 0)?;
        let state = caps[2].parse::<EntryState>().ok()?;
        let detail = caps.get(3).map(|m| m.as_str().to_string());

        Some(Self {
            week,
            state,
            detail,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_decode_round_trip() {
        for state in [
            EntryState::Submitted,
            EntryState::Approved,
            EntryState::Rejected,
        ] {
            for week in [1u32, 7, 12, 52, 104] {
                let tag = WeekTag::new(week, state).unwrap();
                let decoded = WeekTag::decode(&tag.encode()).unwrap();
                assert_eq!(decoded.week, week);
                assert_eq!(decoded.state, state);
                assert_eq!(decoded.detail, None);
            }
        }
    }

    #[test]
    fn encode_with_detail() {
        let tag = WeekTag::new(3, EntryState::Rejected)
            .unwrap()
            .with_detail("missing attachments");
        assert_eq!(tag.encode(), "weekly_3_log_rejected_missing attachments");

        let decoded = WeekTag::decode(&tag.encode()).unwrap();
        assert_eq!(decoded.week, 3);
        assert_eq!(decoded.state, EntryState::Rejected);
        assert_eq!(decoded.detail.as_deref(), Some("missing attachments"));
    }

    #[test]
    fn empty_detail_is_dropped() {
        let tag = WeekTag::new(5, EntryState::Rejected).unwrap().with_detail("");
        assert_eq!(tag.encode(), "weekly_5_log_rejected");
    }

    #[test]
    fn week_zero_is_invalid() {
        assert!(matches!(
            WeekTag::new(0, EntryState::Submitted),
            Err(LogbookError::InvalidWeek(0))
        ));
        // the stored form is equally unacceptable on the way back in
        assert_eq!(WeekTag::decode("weekly_0_log_submitted"), None);
    }

    #[test]
    fn non_tags_decode_to_none() {
        assert_eq!(WeekTag::decode(""), None);
        assert_eq!(WeekTag::decode("random text"), None);
        assert_eq!(WeekTag::decode("weekly_abc_log_submitted"), None);
        assert_eq!(WeekTag::decode("weekly_1_log_archived"), None);
        assert_eq!(WeekTag::decode("weekly_1_log"), None);
    }

    #[test]
    fn matching_is_anchored() {
        assert_eq!(WeekTag::decode("note weekly_1_log_submitted"), None);
        assert_eq!(WeekTag::decode("weekly_1_log_submitted!"), None);
    }

    #[test]
    fn trailing_detail_keeps_rejection_parseable() {
        let decoded = WeekTag::decode("weekly_12_log_rejected_too_short").unwrap();
        assert_eq!(decoded.week, 12);
        assert_eq!(decoded.state, EntryState::Rejected);
        assert_eq!(decoded.detail.as_deref(), Some("too_short"));
    }

    #[test]
    fn oversized_week_numbers_are_rejected() {
        assert_eq!(WeekTag::decode("weekly_99999999999_log_submitted"), None);
    }
}
