// qualis-core/src/domain/reporting.rs

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use crate::domain::compliance::aggregator::round_to;
use crate::domain::criterion::Severity;
use crate::domain::ports::CriterionStore;
use crate::domain::record::Record;

/// Compliance statistics across a set of records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ComplianceReport {
    pub total_records: usize,
    pub passed: usize,
    pub failed: usize,
    /// Never evaluated, or nothing in them could be evaluated.
    pub pending: usize,
    /// Share of decided records that passed. 0 when none are decided.
    pub pass_rate: f64,
    /// Mean score of the records that have one.
    pub average_score: Option<f64>,
    pub status_breakdown: BTreeMap<String, usize>,
    /// Records without a category count under "Unknown".
    pub category_breakdown: BTreeMap<String, usize>,
}

/// Inclusive date bounds on when a record was last evaluated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportWindow {
    pub since: Option<NaiveDate>,
    pub until: Option<NaiveDate>,
}

impl ReportWindow {
    pub fn is_open(&self) -> bool {
        self.since.is_none() && self.until.is_none()
    }

    /// Once a bound is set, records that were never evaluated fall outside.
    pub fn contains(&self, record: &Record) -> bool {
        if self.is_open() {
            return true;
        }
        let Some(day) = record.evaluated_at.map(|at| at.date_naive()) else {
            return false;
        };
        self.since.is_none_or(|since| day >= since) && self.until.is_none_or(|until| day <= until)
    }

    pub fn select<'a>(&self, records: &'a [Record]) -> Vec<&'a Record> {
        records.iter().filter(|r| self.contains(r)).collect()
    }
}

impl ComplianceReport {
    pub fn build<'a>(records: impl IntoIterator<Item = &'a Record>) -> Self {
        let mut report = Self::default();
        let mut scores = Vec::new();

        for record in records {
            report.total_records += 1;
            *report
                .status_breakdown
                .entry(record.status.to_string())
                .or_insert(0) += 1;
            let category = record.category.as_deref().unwrap_or("Unknown");
            *report
                .category_breakdown
                .entry(category.to_string())
                .or_insert(0) += 1;

            let summary = record.assessment.as_ref().map(|a| &a.summary);
            match summary.and_then(|s| s.overall_compliance) {
                Some(true) => report.passed += 1,
                Some(false) => report.failed += 1,
                None => report.pending += 1,
            }
            if let Some(score) = summary.and_then(|s| s.compliance_score) {
                scores.push(score);
            }
        }

        let decided = report.passed + report.failed;
        if decided > 0 {
            report.pass_rate = round_to(100.0 * report.passed as f64 / decided as f64, 2);
        }
        if !scores.is_empty() {
            let mean = scores.iter().sum::<f64>() / scores.len() as f64;
            report.average_score = Some(round_to(mean, 2));
        }
        report
    }
}

/// How often one criterion failed across records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CriterionFailure {
    pub criterion: String,
    pub title: String,
    pub severity: Option<Severity>,
    pub failure_count: usize,
}

/// Most frequently failing criteria, most failures first (ties by code).
/// Criteria missing from the store are still listed, without title or severity.
pub fn criteria_failures<'a>(
    records: impl IntoIterator<Item = &'a Record>,
    store: &dyn CriterionStore,
    top_n: usize,
) -> Vec<CriterionFailure> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for item in records
        .into_iter()
        .filter_map(|r| r.assessment.as_ref())
        .flat_map(|a| a.items.iter())
        .filter(|item| !item.compliance)
    {
        *counts.entry(item.criterion.as_str()).or_insert(0) += 1;
    }

    let mut ranked: Vec<(&str, usize)> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));

    ranked
        .into_iter()
        .take(top_n)
        .map(|(code, failure_count)| {
            let criterion = store.get_criterion(code).ok();
            CriterionFailure {
                criterion: code.to_string(),
                title: criterion.as_ref().map(|c| c.title.clone()).unwrap_or_default(),
                severity: criterion.map(|c| c.severity),
                failure_count,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::compliance::{Assessment, ItemValue, RecordAggregator};
    use crate::domain::criterion::Criterion;
    use crate::domain::error::DomainError;
    use crate::domain::record::RecordStatus;

    struct OneCriterion(Criterion);

    impl CriterionStore for OneCriterion {
        fn get_criterion(&self, code: &str) -> Result<Criterion, DomainError> {
            if code == self.0.code {
                Ok(self.0.clone())
            } else {
                Err(DomainError::CriterionNotFound(code.to_string()))
            }
        }
    }

    fn item(code: &str, compliance: bool) -> ItemValue {
        ItemValue {
            criterion: code.to_string(),
            raw_value: String::new(),
            numeric_value: None,
            compliance,
            deviation: None,
            severity: Severity::Major,
        }
    }

    fn record(number: &str, status: RecordStatus, items: Vec<ItemValue>) -> Record {
        let mut record = Record::new(number, "");
        record.status = status;
        if !items.is_empty() {
            let aggregator = RecordAggregator::default();
            let summary = aggregator.summarize(&items, 0);
            record.assessment = Some(Assessment {
                items,
                errors: vec![],
                summary,
            });
        }
        record
    }

    fn fixture() -> Vec<Record> {
        vec![
            record("R1", RecordStatus::Approved, vec![item("A", true), item("B", true)]),
            record("R2", RecordStatus::Submitted, vec![item("A", false), item("B", true)]),
            record("R3", RecordStatus::Submitted, vec![item("A", false), item("C", false)]),
            record("R4", RecordStatus::Draft, vec![]),
        ]
    }

    #[test]
    fn test_compliance_report() {
        let report = ComplianceReport::build(&fixture());
        assert_eq!(report.total_records, 4);
        assert_eq!(report.passed, 1);
        assert_eq!(report.failed, 2);
        assert_eq!(report.pending, 1);
        assert_eq!(report.pass_rate, 33.33);
        // (100 + 50 + 0) / 3
        assert_eq!(report.average_score, Some(50.0));
        assert_eq!(report.status_breakdown.get("submitted"), Some(&2));
        assert_eq!(report.status_breakdown.get("draft"), Some(&1));
    }

    #[test]
    fn test_empty_report() {
        let report = ComplianceReport::build(std::iter::empty());
        assert_eq!(report.total_records, 0);
        assert_eq!(report.pass_rate, 0.0);
        assert_eq!(report.average_score, None);
    }

    #[test]
    fn test_category_breakdown_counts_missing_as_unknown() {
        let mut records = fixture();
        records[0].category = Some("incoming".to_string());
        records[1].category = Some("incoming".to_string());
        records[2].category = Some("final".to_string());

        let report = ComplianceReport::build(&records);
        assert_eq!(report.category_breakdown.get("incoming"), Some(&2));
        assert_eq!(report.category_breakdown.get("final"), Some(&1));
        assert_eq!(report.category_breakdown.get("Unknown"), Some(&1));
    }

    #[test]
    fn test_window_filters_on_evaluation_date() {
        let at = |day: u32| {
            NaiveDate::from_ymd_opt(2024, 3, day)
                .and_then(|d| d.and_hms_opt(23, 30, 0))
                .map(|dt| dt.and_utc())
        };
        let mut records = fixture();
        records[0].evaluated_at = at(1);
        records[1].evaluated_at = at(10);
        records[2].evaluated_at = at(20);
        // R4 was never evaluated

        let day = |d: u32| NaiveDate::from_ymd_opt(2024, 3, d);
        let open = ReportWindow::default();
        assert_eq!(open.select(&records).len(), 4);

        let window = ReportWindow {
            since: day(10),
            until: day(20),
        };
        let selected: Vec<&str> = window
            .select(&records)
            .iter()
            .map(|r| r.number.as_str())
            .collect();
        assert_eq!(selected, vec!["R2", "R3"]);

        let report = ComplianceReport::build(window.select(&records));
        assert_eq!(report.total_records, 2);
        assert_eq!(report.failed, 2);
        assert_eq!(report.pending, 0);

        let until_only = ReportWindow {
            since: None,
            until: day(9),
        };
        assert_eq!(until_only.select(&records).len(), 1);
    }

    #[test]
    fn test_criteria_failures_ranking() {
        let store = OneCriterion(
            Criterion::numeric("A", Some(1.0), Some(2.0))
                .with_title("Bath temperature")
                .with_severity(Severity::Critical),
        );
        let failures = criteria_failures(&fixture(), &store, 10);

        assert_eq!(failures.len(), 2);
        assert_eq!(failures[0].criterion, "A");
        assert_eq!(failures[0].failure_count, 2);
        assert_eq!(failures[0].title, "Bath temperature");
        assert_eq!(failures[0].severity, Some(Severity::Critical));
        assert_eq!(failures[1].criterion, "C");
        assert_eq!(failures[1].title, "");
        assert_eq!(failures[1].severity, None);

        assert_eq!(criteria_failures(&fixture(), &store, 1).len(), 1);
    }
}
