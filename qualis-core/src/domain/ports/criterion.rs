use crate::domain::criterion::Criterion;
use crate::domain::error::DomainError;

/// Read-only lookup of criterion definitions by code.
pub trait CriterionStore: Send + Sync {
    /// Fails with `DomainError::CriterionNotFound` when the code is unknown.
    fn get_criterion(&self, code: &str) -> Result<Criterion, DomainError>;
}
