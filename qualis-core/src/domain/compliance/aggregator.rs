// qualis-core/src/domain/compliance/aggregator.rs

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::item::{ItemError, ItemOutcome, ItemValue};
use crate::domain::criterion::Severity;

/// Summary fields derived for a record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct RecordSummary {
    /// `None` when nothing could be evaluated: unknown, not compliant.
    pub overall_compliance: Option<bool>,
    pub compliance_score: Option<f64>,
    pub failed_items_count: usize,
    pub evaluated_count: usize,
    pub error_count: usize,
    #[serde(default)]
    pub failed_by_severity: BTreeMap<Severity, usize>,
}

/// Evaluated items, their summary and the items that could not be evaluated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Assessment {
    pub items: Vec<ItemValue>,
    pub errors: Vec<ItemError>,
    pub summary: RecordSummary,
}

impl Assessment {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct RecordAggregator {
    precision: u32,
}

impl Default for RecordAggregator {
    fn default() -> Self {
        Self { precision: 2 }
    }
}

impl RecordAggregator {
    pub fn new(precision: u32) -> Self {
        Self { precision }
    }

    /// Folds per-item outcomes into an assessment. Failed evaluations are
    /// collected, never propagated, so one bad value cannot block the rest.
    pub fn aggregate<I>(&self, outcomes: I) -> Assessment
    where
        I: IntoIterator<Item = ItemOutcome>,
    {
        let (items, errors): (Vec<_>, Vec<_>) =
            outcomes.into_iter().partition(|outcome| outcome.is_ok());
        let items: Vec<ItemValue> = items.into_iter().filter_map(Result::ok).collect();
        let errors: Vec<ItemError> = errors.into_iter().filter_map(Result::err).collect();

        let summary = self.summarize(&items, errors.len());
        Assessment {
            items,
            errors,
            summary,
        }
    }

    pub fn summarize(&self, items: &[ItemValue], error_count: usize) -> RecordSummary {
        let evaluated = items.len();
        let mut failed_by_severity = BTreeMap::new();
        for item in items.iter().filter(|item| !item.compliance) {
            *failed_by_severity.entry(item.severity).or_insert(0) += 1;
        }
        let failed: usize = failed_by_severity.values().sum();

        let (overall_compliance, compliance_score) = if evaluated == 0 {
            (None, None)
        } else {
            let ratio = (evaluated - failed) as f64 / evaluated as f64;
            (
                Some(failed == 0),
                Some(round_to(100.0 * ratio, self.precision)),
            )
        };

        RecordSummary {
            overall_compliance,
            compliance_score,
            failed_items_count: failed,
            evaluated_count: evaluated,
            error_count,
            failed_by_severity,
        }
    }
}

pub fn round_to(value: f64, precision: u32) -> f64 {
    let factor = 10f64.powi(precision as i32);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::compliance::item::ItemErrorKind;

    fn item(code: &str, compliance: bool, severity: Severity) -> ItemOutcome {
        Ok(ItemValue {
            criterion: code.to_string(),
            raw_value: "x".to_string(),
            numeric_value: None,
            compliance,
            deviation: None,
            severity,
        })
    }

    fn invalid(code: &str) -> ItemOutcome {
        Err(ItemError {
            criterion: code.to_string(),
            kind: ItemErrorKind::InvalidValue,
            message: "not a decimal number".to_string(),
        })
    }

    #[test]
    fn test_two_of_three_compliant() {
        let assessment = RecordAggregator::default().aggregate(vec![
            item("A", true, Severity::Major),
            item("B", true, Severity::Major),
            item("C", false, Severity::Critical),
        ]);
        let summary = &assessment.summary;
        assert_eq!(summary.failed_items_count, 1);
        assert_eq!(summary.compliance_score, Some(66.67));
        assert_eq!(summary.overall_compliance, Some(false));
        assert_eq!(summary.failed_by_severity.get(&Severity::Critical), Some(&1));
        assert_eq!(summary.failed_by_severity.get(&Severity::Major), None);
    }

    #[test]
    fn test_nothing_evaluable_is_unknown() {
        let empty = RecordAggregator::default().aggregate(Vec::new());
        assert_eq!(empty.summary.overall_compliance, None);
        assert_eq!(empty.summary.compliance_score, None);
        assert_eq!(empty.summary.failed_items_count, 0);

        let all_errors = RecordAggregator::default().aggregate(vec![invalid("A"), invalid("B")]);
        assert_eq!(all_errors.summary.overall_compliance, None);
        assert_eq!(all_errors.summary.compliance_score, None);
        assert_eq!(all_errors.summary.error_count, 2);
        assert_eq!(all_errors.errors.len(), 2);
    }

    #[test]
    fn test_errors_are_excluded_from_score() {
        let assessment = RecordAggregator::default().aggregate(vec![
            item("A", true, Severity::Minor),
            invalid("B"),
            item("C", true, Severity::Minor),
        ]);
        assert_eq!(assessment.summary.evaluated_count, 2);
        assert_eq!(assessment.summary.compliance_score, Some(100.0));
        assert_eq!(assessment.summary.overall_compliance, Some(true));
        assert_eq!(assessment.summary.failed_items_count, 0);
        assert!(assessment.has_errors());
        assert_eq!(assessment.errors[0].criterion, "B");
        assert_eq!(assessment.items.len(), 2);
    }

    #[test]
    fn test_precision_is_configurable() {
        let outcomes = || {
            vec![
                item("A", true, Severity::Major),
                item("B", true, Severity::Major),
                item("C", false, Severity::Major),
            ]
        };
        assert_eq!(
            RecordAggregator::new(0).aggregate(outcomes()).summary.compliance_score,
            Some(67.0)
        );
        assert_eq!(
            RecordAggregator::new(1).aggregate(outcomes()).summary.compliance_score,
            Some(66.7)
        );
    }

    #[test]
    fn test_item_order_is_preserved() {
        let assessment = RecordAggregator::default().aggregate(vec![
            item("Z", false, Severity::Minor),
            invalid("Y"),
            item("X", true, Severity::Minor),
        ]);
        let codes: Vec<&str> = assessment
            .items
            .iter()
            .map(|i| i.criterion.as_str())
            .collect();
        assert_eq!(codes, vec!["Z", "X"]);
    }
}
