// qualis-core/src/domain/ports/mod.rs

pub mod criterion;

pub use criterion::CriterionStore;
