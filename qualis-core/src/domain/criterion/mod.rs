// qualis-core/src/domain/criterion/mod.rs

pub mod definition;
pub mod kind;

pub use definition::{Criterion, ValidationRules};
pub use kind::{DataType, Severity};
