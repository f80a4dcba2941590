// qualis-core/src/domain/compliance/evaluator.rs

use regex::Regex;

use super::config::BooleanVocabulary;
use super::item::{ItemValue, Verdict};
use crate::domain::criterion::{Criterion, DataType, ValidationRules};
use crate::domain::error::DomainError;

/// Maps one `(criterion, raw value)` pair to a verdict.
///
/// The evaluator holds configuration only. The same inputs always produce the
/// same verdict, so it can be re-run whenever a value or a criterion changes.
#[derive(Debug, Clone, Default)]
pub struct ComplianceEvaluator {
    vocabulary: BooleanVocabulary,
}

impl ComplianceEvaluator {
    pub fn new(vocabulary: BooleanVocabulary) -> Self {
        Self { vocabulary }
    }

    pub fn evaluate(&self, criterion: &Criterion, raw: &str) -> Result<Verdict, DomainError> {
        criterion.check()?;

        match criterion.data_type {
            DataType::Numeric => evaluate_numeric(criterion, raw),
            DataType::Boolean => self.evaluate_boolean(criterion, raw),
            DataType::Select => Ok(non_numeric(criterion.options.iter().any(|o| o == raw.trim()))),
            DataType::Multiselect => Ok(non_numeric(
                selections(raw).all(|choice| criterion.options.iter().any(|o| o == choice)),
            )),
            DataType::Text | DataType::Date | DataType::File => {
                rules_hold(criterion, raw).map(non_numeric)
            }
        }
    }

    /// Evaluates and packages the result as a storable item.
    pub fn evaluate_item(&self, criterion: &Criterion, raw: &str) -> Result<ItemValue, DomainError> {
        let verdict = self.evaluate(criterion, raw)?;
        Ok(ItemValue {
            criterion: criterion.code.clone(),
            raw_value: raw.to_string(),
            numeric_value: verdict.numeric_value,
            compliance: verdict.compliance,
            deviation: verdict.deviation,
            severity: criterion.severity,
        })
    }

    fn evaluate_boolean(&self, criterion: &Criterion, raw: &str) -> Result<Verdict, DomainError> {
        let answer = self
            .vocabulary
            .interpret(raw)
            .ok_or_else(|| DomainError::InvalidValue {
                criterion: criterion.code.clone(),
                value: raw.to_string(),
                reason: format!(
                    "expected one of {:?} or {:?}",
                    self.vocabulary.truthy, self.vocabulary.falsy
                ),
            })?;
        Ok(non_numeric(answer == criterion.expect_true))
    }
}

fn non_numeric(compliance: bool) -> Verdict {
    Verdict {
        compliance,
        numeric_value: None,
        deviation: None,
    }
}

fn evaluate_numeric(criterion: &Criterion, raw: &str) -> Result<Verdict, DomainError> {
    let value = parse_decimal(criterion, raw)?;
    let slack = criterion.tolerance.unwrap_or(0.0);

    // Tolerance widens the window; deviation is measured from the original bound.
    let below = criterion.limit_min.filter(|min| value < *min - slack);
    let above = criterion.limit_max.filter(|max| value > *max + slack);

    let deviation = match (below, above) {
        (Some(min), _) => value - min,
        (None, Some(max)) => value - max,
        (None, None) => 0.0,
    };

    Ok(Verdict {
        compliance: below.is_none() && above.is_none(),
        numeric_value: Some(value),
        deviation: Some(deviation),
    })
}

fn parse_decimal(criterion: &Criterion, raw: &str) -> Result<f64, DomainError> {
    let invalid = |reason: &str| DomainError::InvalidValue {
        criterion: criterion.code.clone(),
        value: raw.to_string(),
        reason: reason.to_string(),
    };

    let value: f64 = raw
        .trim()
        .parse()
        .map_err(|_| invalid("not a decimal number"))?;

    // "inf" and "NaN" parse as f64 but are not measurements.
    if !value.is_finite() {
        return Err(invalid("not a finite number"));
    }
    Ok(value)
}

fn selections(raw: &str) -> impl Iterator<Item = &str> {
    raw.split(',').map(str::trim).filter(|s| !s.is_empty())
}

fn rules_hold(criterion: &Criterion, raw: &str) -> Result<bool, DomainError> {
    let rules: &ValidationRules = &criterion.rules;
    let value = raw.trim();

    if value.is_empty() {
        return Ok(!rules.required);
    }

    let length = value.chars().count();
    if rules.min_length.is_some_and(|min| length < min)
        || rules.max_length.is_some_and(|max| length > max)
    {
        return Ok(false);
    }

    match &rules.pattern {
        Some(pattern) => {
            let regex = Regex::new(pattern).map_err(|e| DomainError::Configuration {
                criterion: criterion.code.clone(),
                reason: format!("invalid pattern: {e}"),
            })?;
            Ok(regex.is_match(value))
        }
        None => Ok(true),
    }
}
