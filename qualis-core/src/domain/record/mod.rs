// qualis-core/src/domain/record/mod.rs

pub mod lifecycle;

pub use lifecycle::{RecordAction, RecordStatus};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::compliance::{Assessment, SubmittedValue};
use crate::domain::error::DomainError;

/// One inspection instance: what was entered, and what was derived from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub number: String,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default)]
    pub status: RecordStatus,
    #[serde(default)]
    pub values: Vec<SubmittedValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assessment: Option<Assessment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evaluated_at: Option<DateTime<Utc>>,
}

impl Record {
    pub fn new(number: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            number: number.into(),
            title: title.into(),
            category: None,
            status: RecordStatus::Draft,
            values: Vec::new(),
            assessment: None,
            evaluated_at: None,
        }
    }

    pub fn ensure_editable(&self) -> Result<(), DomainError> {
        if self.status.is_editable() {
            Ok(())
        } else {
            Err(DomainError::RecordLocked {
                number: self.number.clone(),
                status: self.status.to_string(),
            })
        }
    }

    /// Replaces the raw value for `criterion`, or appends it when absent.
    pub fn set_value(&mut self, criterion: &str, value: &str) -> Result<(), DomainError> {
        self.ensure_editable()?;
        match self.values.iter_mut().find(|v| v.criterion == criterion) {
            Some(existing) => existing.value = value.to_string(),
            None => self.values.push(SubmittedValue::new(criterion, value)),
        }
        Ok(())
    }

    pub fn apply(&mut self, action: RecordAction) -> Result<RecordStatus, DomainError> {
        self.status = self.status.apply(action)?;
        Ok(self.status)
    }
}
