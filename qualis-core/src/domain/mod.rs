pub mod compliance;
pub mod criterion;
pub mod error;
pub mod ports;
pub mod project;
pub mod record;
pub mod reporting;

// Re-exports to keep imports short elsewhere
pub use error::DomainError;
