// qualis-core/src/error.rs

use crate::domain::error::DomainError;
use crate::infrastructure::error::InfrastructureError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum QualisError {
    // --- DOMAIN ERRORS (values, criteria, lifecycle) ---
    #[error(transparent)]
    Domain(#[from] DomainError),

    // --- INFRASTRUCTURE ERRORS (IO, parsing, storage) ---
    #[error(transparent)]
    Infrastructure(#[from] InfrastructureError),

    // --- GENERIC / APPLICATION ERRORS ---
    #[error("Internal Error: {0}")]
    InternalError(String),
}

impl From<std::io::Error> for QualisError {
    fn from(err: std::io::Error) -> Self {
        QualisError::Infrastructure(InfrastructureError::Io(err))
    }
}

// Lets adapters use `?` on duckdb calls inside async trait methods
impl From<duckdb::Error> for QualisError {
    fn from(err: duckdb::Error) -> Self {
        QualisError::Infrastructure(InfrastructureError::from(err))
    }
}
