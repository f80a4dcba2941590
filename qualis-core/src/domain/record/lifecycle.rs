// qualis-core/src/domain/record/lifecycle.rs

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::error::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RecordStatus {
    #[default]
    Draft,
    Submitted,
    UnderReview,
    Approved,
    Rejected,
    Closed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordAction {
    Submit,
    StartReview,
    Approve,
    Reject,
    /// Sends a rejected record back to draft for rework.
    Reopen,
    Close,
}

impl RecordStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Submitted => "submitted",
            Self::UnderReview => "under_review",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::Closed => "closed",
        }
    }

    /// Item values may still change (and be re-evaluated) in these states.
    pub fn is_editable(&self) -> bool {
        matches!(self, Self::Draft | Self::Submitted | Self::UnderReview)
    }

    pub fn apply(self, action: RecordAction) -> Result<RecordStatus, DomainError> {
        use RecordAction as A;
        use RecordStatus as S;

        match (self, action) {
            (S::Draft, A::Submit) => Ok(S::Submitted),
            (S::Submitted, A::StartReview) => Ok(S::UnderReview),
            (S::UnderReview, A::Approve) => Ok(S::Approved),
            (S::UnderReview, A::Reject) => Ok(S::Rejected),
            (S::Rejected, A::Reopen) => Ok(S::Draft),
            (S::Approved, A::Close) => Ok(S::Closed),
            (from, action) => Err(DomainError::InvalidTransition {
                from: from.to_string(),
                action: action.to_string(),
            }),
        }
    }
}

impl RecordAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Submit => "submit",
            Self::StartReview => "start_review",
            Self::Approve => "approve",
            Self::Reject => "reject",
            Self::Reopen => "reopen",
            Self::Close => "close",
        }
    }
}

impl fmt::Display for RecordStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for RecordAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for RecordStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "draft" => Ok(Self::Draft),
            "submitted" => Ok(Self::Submitted),
            "under_review" => Ok(Self::UnderReview),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            "closed" => Ok(Self::Closed),
            _ => Err(format!("Unknown record status: {}", s)),
        }
    }
}

impl FromStr for RecordAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "submit" => Ok(Self::Submit),
            "start_review" => Ok(Self::StartReview),
            "approve" => Ok(Self::Approve),
            "reject" => Ok(Self::Reject),
            "reopen" => Ok(Self::Reopen),
            "close" => Ok(Self::Close),
            _ => Err(format!("Unknown record action: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_happy_path() -> Result<(), DomainError> {
        let status = RecordStatus::Draft
            .apply(RecordAction::Submit)?
            .apply(RecordAction::StartReview)?
            .apply(RecordAction::Approve)?
            .apply(RecordAction::Close)?;
        assert_eq!(status, RecordStatus::Closed);
        Ok(())
    }

    #[test]
    fn test_rejected_records_go_back_to_draft() -> Result<(), DomainError> {
        let status = RecordStatus::UnderReview
            .apply(RecordAction::Reject)?
            .apply(RecordAction::Reopen)?;
        assert_eq!(status, RecordStatus::Draft);
        Ok(())
    }

    #[test]
    fn test_illegal_transitions() {
        assert!(matches!(
            RecordStatus::Draft.apply(RecordAction::Approve),
            Err(DomainError::InvalidTransition { from, action }) if from == "draft" && action == "approve"
        ));
        assert!(RecordStatus::Closed.apply(RecordAction::Reopen).is_err());
        assert!(RecordStatus::Approved.apply(RecordAction::Reject).is_err());
        assert!(RecordStatus::Submitted.apply(RecordAction::Submit).is_err());
    }

    #[test]
    fn test_editability() {
        assert!(RecordStatus::Draft.is_editable());
        assert!(RecordStatus::Submitted.is_editable());
        assert!(RecordStatus::UnderReview.is_editable());
        assert!(!RecordStatus::Approved.is_editable());
        assert!(!RecordStatus::Rejected.is_editable());
        assert!(!RecordStatus::Closed.is_editable());
    }

    #[test]
    fn test_parsing_round_trips_display() -> anyhow::Result<()> {
        assert_eq!(
            RecordStatus::from_str("UNDER_REVIEW").map_err(|e| anyhow::anyhow!(e))?,
            RecordStatus::UnderReview
        );
        assert_eq!(
            RecordAction::from_str("start-review").map_err(|e| anyhow::anyhow!(e))?,
            RecordAction::StartReview
        );
        assert!(RecordAction::from_str("archive").is_err());
        Ok(())
    }
}
