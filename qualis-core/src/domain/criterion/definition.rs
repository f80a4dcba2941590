// qualis-core/src/domain/criterion/definition.rs

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use validator::{Validate, ValidationError};

use super::kind::{DataType, Severity};
use crate::domain::error::DomainError;

/// A single named inspection rule, authored once and reused by many records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_shape"))]
pub struct Criterion {
    #[validate(length(min = 1, message = "Criterion code cannot be empty"))]
    pub code: String,

    #[serde(default)]
    pub title: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    pub data_type: DataType,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit_min: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit_max: Option<f64>,

    #[validate(range(min = 0.0, message = "Tolerance cannot be negative"))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tolerance: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,

    #[serde(default)]
    pub severity: Severity,

    /// Boolean criteria only: `false` means a negative answer is the passing one
    /// (e.g. "Visible damage?").
    #[serde(default = "default_expect_true")]
    pub expect_true: bool,

    #[validate(nested)]
    #[serde(default)]
    pub rules: ValidationRules,
}

/// Checkbox-style rules for free-form values (text, date, file).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate, Default)]
#[validate(schema(function = "validate_rules"))]
pub struct ValidationRules {
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
}

fn default_expect_true() -> bool {
    true
}

impl Criterion {
    pub fn new(code: impl Into<String>, data_type: DataType) -> Self {
        Self {
            code: code.into(),
            title: String::new(),
            description: None,
            data_type,
            limit_min: None,
            limit_max: None,
            tolerance: None,
            unit: None,
            options: Vec::new(),
            severity: Severity::default(),
            expect_true: true,
            rules: ValidationRules::default(),
        }
    }

    pub fn numeric(code: impl Into<String>, limit_min: Option<f64>, limit_max: Option<f64>) -> Self {
        Self {
            limit_min,
            limit_max,
            ..Self::new(code, DataType::Numeric)
        }
    }

    pub fn select<I, S>(code: impl Into<String>, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            options: options.into_iter().map(Into::into).collect(),
            ..Self::new(code, DataType::Select)
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = Some(tolerance);
        self
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    pub fn with_rules(mut self, rules: ValidationRules) -> Self {
        self.rules = rules;
        self
    }

    /// Static validation of the definition itself.
    /// A failure here is an authoring problem, never an inspector's.
    pub fn check(&self) -> Result<(), DomainError> {
        self.validate().map_err(|errors| DomainError::Configuration {
            criterion: self.code.clone(),
            reason: errors.to_string(),
        })
    }
}

impl ValidationRules {
    pub fn is_empty(&self) -> bool {
        !self.required
            && self.min_length.is_none()
            && self.max_length.is_none()
            && self.pattern.is_none()
    }
}

fn invalid(code: &'static str, message: String) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(Cow::Owned(message));
    error
}

fn validate_shape(criterion: &Criterion) -> Result<(), ValidationError> {
    let numbers = [
        ("limit_min", criterion.limit_min),
        ("limit_max", criterion.limit_max),
        ("tolerance", criterion.tolerance),
    ];
    for (field, value) in numbers {
        if let Some(v) = value
            && !v.is_finite()
        {
            return Err(invalid("finite", format!("{field} must be a finite number, got {v}")));
        }
    }

    if let (Some(min), Some(max)) = (criterion.limit_min, criterion.limit_max)
        && min > max
    {
        return Err(invalid(
            "limits",
            format!("limit_min ({min}) is greater than limit_max ({max})"),
        ));
    }

    if criterion.data_type.has_options() && criterion.options.is_empty() {
        return Err(invalid(
            "options",
            format!("a {} criterion needs at least one option", criterion.data_type),
        ));
    }

    Ok(())
}

fn validate_rules(rules: &ValidationRules) -> Result<(), ValidationError> {
    if let (Some(min), Some(max)) = (rules.min_length, rules.max_length)
        && min > max
    {
        return Err(invalid(
            "length",
            format!("min_length ({min}) is greater than max_length ({max})"),
        ));
    }

    if let Some(pattern) = &rules.pattern
        && let Err(e) = Regex::new(pattern)
    {
        return Err(invalid("pattern", format!("invalid pattern: {e}")));
    }

    Ok(())
}
