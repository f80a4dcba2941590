// qualis-core/src/application/mod.rs

pub mod batch;
pub mod evaluation;
pub mod report;

// --- RE-EXPORTS (FACADE PATTERN) ---
// The CLI does `use qualis_core::application::{evaluate_record, assess_batch};`
// without knowing the file layout.

pub use batch::{BatchOutcome, assess_batch};
pub use evaluation::{
    RecordContext, evaluate_record, import_record, transition_record, update_item,
};
pub use report::{ReportBundle, build_report};
