// qualis-core/src/domain/error.rs

use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Diagnostic)]
pub enum DomainError {
    #[error("Invalid value '{value}' for criterion '{criterion}': {reason}")]
    #[diagnostic(
        code(qualis::domain::invalid_value),
        help("Correct the entered value; it is excluded from scoring until then.")
    )]
    InvalidValue {
        criterion: String,
        value: String,
        reason: String,
    },

    #[error("Criterion '{criterion}' is misconfigured: {reason}")]
    #[diagnostic(
        code(qualis::domain::configuration),
        help("Fix the criterion definition in the catalog; re-entering the value will not help.")
    )]
    Configuration { criterion: String, reason: String },

    #[error("Criterion '{0}' not found")]
    #[diagnostic(code(qualis::domain::criterion_not_found))]
    CriterionNotFound(String),

    #[error("Record '{0}' not found")]
    #[diagnostic(code(qualis::domain::record_not_found))]
    RecordNotFound(String),

    #[error("Record '{0}' already exists")]
    #[diagnostic(code(qualis::domain::record_exists))]
    RecordExists(String),

    #[error("Cannot {action} a record in status '{from}'")]
    #[diagnostic(code(qualis::domain::lifecycle))]
    InvalidTransition { from: String, action: String },

    #[error("Record '{number}' is {status} and can no longer be edited")]
    #[diagnostic(
        code(qualis::domain::record_locked),
        help("Only draft, submitted and under_review records accept new values.")
    )]
    RecordLocked { number: String, status: String },
}
