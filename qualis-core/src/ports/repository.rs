// qualis-core/src/ports/repository.rs

// What the use cases need from storage, without knowing which engine keeps the rows.
// The adapter owns transactions; the core never opens one.

use crate::domain::compliance::Assessment;
use crate::domain::record::{Record, RecordStatus};
use crate::error::QualisError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

#[async_trait]
pub trait RecordRepository: Send + Sync {
    /// Stores a new record with its submitted values. Fails if the number exists.
    async fn create_record(&self, record: &Record) -> Result<(), QualisError>;

    /// Loads a record, its values and its last assessment.
    /// Fails with `DomainError::RecordNotFound` when absent.
    async fn load_record(&self, number: &str) -> Result<Record, QualisError>;

    /// Inserts or replaces the raw value entered for one criterion.
    async fn set_raw_value(
        &self,
        number: &str,
        criterion: &str,
        value: &str,
    ) -> Result<(), QualisError>;

    async fn set_status(&self, number: &str, status: RecordStatus) -> Result<(), QualisError>;

    /// Replaces items, errors and summary of a record in one atomic write.
    async fn save_assessment(
        &self,
        number: &str,
        assessment: &Assessment,
        evaluated_at: DateTime<Utc>,
    ) -> Result<(), QualisError>;

    async fn list_records(&self) -> Result<Vec<Record>, QualisError>;
}
