// qualis-core/src/domain/compliance/item.rs

use serde::{Deserialize, Serialize};

use crate::domain::criterion::Severity;
use crate::domain::error::DomainError;

/// One observation as entered against one criterion, before evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmittedValue {
    pub criterion: String,
    #[serde(default)]
    pub value: String,
}

impl SubmittedValue {
    pub fn new(criterion: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            criterion: criterion.into(),
            value: value.into(),
        }
    }
}

/// Result of evaluating one raw value against its criterion.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
    pub compliance: bool,
    pub numeric_value: Option<f64>,
    pub deviation: Option<f64>,
}

/// An evaluated observation. Every field except `raw_value` is derived.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemValue {
    pub criterion: String,
    pub raw_value: String,
    pub numeric_value: Option<f64>,
    pub compliance: bool,
    pub deviation: Option<f64>,
    pub severity: Severity,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemErrorKind {
    InvalidValue,
    Configuration,
    NotFound,
    Other,
}

/// An item that could not be evaluated. Kept next to the summary, never counted in it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemError {
    pub criterion: String,
    pub kind: ItemErrorKind,
    pub message: String,
}

impl ItemError {
    pub fn from_domain(criterion: impl Into<String>, error: &DomainError) -> Self {
        let kind = match error {
            DomainError::InvalidValue { .. } => ItemErrorKind::InvalidValue,
            DomainError::Configuration { .. } => ItemErrorKind::Configuration,
            DomainError::CriterionNotFound(_) => ItemErrorKind::NotFound,
            _ => ItemErrorKind::Other,
        };
        Self {
            criterion: criterion.into(),
            kind,
            message: error.to_string(),
        }
    }
}

pub type ItemOutcome = Result<ItemValue, ItemError>;
