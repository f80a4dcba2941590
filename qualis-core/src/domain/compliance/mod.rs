// qualis-core/src/domain/compliance/mod.rs

pub mod aggregator;
pub mod config;
pub mod engine;
pub mod evaluator;
pub mod item;

pub use aggregator::{Assessment, RecordAggregator, RecordSummary};
pub use config::{BooleanVocabulary, ComplianceConfig, RecomputePolicy};
pub use engine::ComplianceEngine;
pub use evaluator::ComplianceEvaluator;
pub use item::{ItemError, ItemErrorKind, ItemOutcome, ItemValue, SubmittedValue, Verdict};
