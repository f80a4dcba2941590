// qualis-core/src/domain/compliance/engine.rs

use tracing::debug;

use super::aggregator::{Assessment, RecordAggregator};
use super::config::ComplianceConfig;
use super::evaluator::ComplianceEvaluator;
use super::item::{ItemError, ItemOutcome, SubmittedValue};
use crate::domain::ports::CriterionStore;

/// Evaluator and aggregator configured together from `ComplianceConfig`.
#[derive(Debug, Clone, Default)]
pub struct ComplianceEngine {
    evaluator: ComplianceEvaluator,
    aggregator: RecordAggregator,
}

impl ComplianceEngine {
    pub fn new(config: &ComplianceConfig) -> Self {
        Self {
            evaluator: ComplianceEvaluator::new(config.boolean_vocabulary.clone()),
            aggregator: RecordAggregator::new(config.score_precision),
        }
    }

    pub fn evaluator(&self) -> &ComplianceEvaluator {
        &self.evaluator
    }

    pub fn aggregator(&self) -> &RecordAggregator {
        &self.aggregator
    }

    /// Resolves each entry's criterion, evaluates it and folds the outcomes.
    /// Unknown criteria are reported as item errors like any other bad item.
    pub fn assess(&self, store: &dyn CriterionStore, entries: &[SubmittedValue]) -> Assessment {
        let outcomes = entries.iter().map(|entry| self.assess_entry(store, entry));
        let assessment = self.aggregator.aggregate(outcomes);
        debug!(
            evaluated = assessment.summary.evaluated_count,
            failed = assessment.summary.failed_items_count,
            errors = assessment.errors.len(),
            "Assessment computed"
        );
        assessment
    }

    fn assess_entry(&self, store: &dyn CriterionStore, entry: &SubmittedValue) -> ItemOutcome {
        store
            .get_criterion(&entry.criterion)
            .and_then(|criterion| self.evaluator.evaluate_item(&criterion, &entry.value))
            .map_err(|e| ItemError::from_domain(&entry.criterion, &e))
    }
}
