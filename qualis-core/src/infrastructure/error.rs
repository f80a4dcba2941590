// qualis-core/src/infrastructure/error.rs

use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
pub enum DatabaseError {
    #[error("DuckDB Engine Error: {0}")]
    #[diagnostic(
        code(qualis::infra::database::duckdb),
        help("An error occurred inside the record store.")
    )]
    DuckDB(#[from] duckdb::Error),

    #[error("Record store lock poisoned")]
    #[diagnostic(code(qualis::infra::database::poisoned))]
    Poisoned,

    #[error("Corrupted row in '{table}': {detail}")]
    #[diagnostic(code(qualis::infra::database::corrupted))]
    Corrupted { table: String, detail: String },
}

#[derive(Error, Debug, Diagnostic)]
pub enum InfrastructureError {
    // --- DATABASE (Abstracted) ---
    #[error(transparent)]
    #[diagnostic(transparent)]
    Database(#[from] DatabaseError),

    // --- FILESYSTEM (IO) ---
    #[error("File System Error: {0}")]
    #[diagnostic(
        code(qualis::infra::io),
        help("Check file permissions or path validity.")
    )]
    Io(#[from] std::io::Error),

    // --- CONFIG / YAML ---
    #[error("YAML Parsing Error: {0}")]
    #[diagnostic(
        code(qualis::infra::yaml),
        help("Check your YAML syntax (indentation, types).")
    )]
    YamlError(#[from] serde_yaml::Error),

    #[error("JSON Error: {0}")]
    #[diagnostic(code(qualis::infra::json))]
    JsonError(#[from] serde_json::Error),

    #[error("Configuration Error: {0}")]
    #[diagnostic(code(qualis::infra::config))]
    ConfigError(String),

    #[error("Configuration file not found: {0}")]
    #[diagnostic(code(qualis::infra::config_missing))]
    ConfigNotFound(String),
}

// Shortcut so that `?` works directly on duckdb calls
impl From<duckdb::Error> for InfrastructureError {
    fn from(err: duckdb::Error) -> Self {
        InfrastructureError::Database(DatabaseError::DuckDB(err))
    }
}
