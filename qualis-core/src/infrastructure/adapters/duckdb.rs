// qualis-core/src/infrastructure/adapters/duckdb.rs

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use duckdb::{Config, Connection, params};
use std::collections::BTreeMap;
use std::str::FromStr;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, info, instrument};

use crate::domain::compliance::{Assessment, ItemError, ItemValue, RecordSummary, SubmittedValue};
use crate::domain::criterion::Severity;
use crate::domain::error::DomainError;
use crate::domain::record::{Record, RecordStatus};
use crate::error::QualisError;
use crate::infrastructure::error::{DatabaseError, InfrastructureError};
use crate::ports::repository::RecordRepository;

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS records (
    number VARCHAR NOT NULL,
    title VARCHAR NOT NULL,
    category VARCHAR,
    status VARCHAR NOT NULL,
    overall_compliance BOOLEAN,
    compliance_score DOUBLE,
    failed_items_count BIGINT NOT NULL DEFAULT 0,
    evaluated_count BIGINT NOT NULL DEFAULT 0,
    item_errors VARCHAR,
    evaluated_at VARCHAR
);
CREATE TABLE IF NOT EXISTS record_entries (
    record_number VARCHAR NOT NULL,
    position BIGINT NOT NULL,
    criterion VARCHAR NOT NULL,
    raw_value VARCHAR NOT NULL
);
CREATE TABLE IF NOT EXISTS record_items (
    record_number VARCHAR NOT NULL,
    position BIGINT NOT NULL,
    criterion VARCHAR NOT NULL,
    raw_value VARCHAR NOT NULL,
    numeric_value DOUBLE,
    compliance BOOLEAN NOT NULL,
    deviation DOUBLE,
    severity VARCHAR NOT NULL
);
"#;

/// Record storage on a single DuckDB connection.
///
/// Uniqueness of record numbers and of one entry per criterion is enforced here
/// rather than with key constraints, so a delete and re-insert inside one
/// transaction never trips DuckDB's eager index checks.
pub struct DuckDbRecordRepository {
    conn: Arc<Mutex<Connection>>,
}

impl DuckDbRecordRepository {
    pub fn new(db_path: &str) -> Result<Self, InfrastructureError> {
        let config = Config::default();
        let conn = if db_path == ":memory:" {
            Connection::open_in_memory_with_flags(config)?
        } else {
            Connection::open_with_flags(db_path, config)?
        };
        conn.execute_batch(SCHEMA)?;
        info!(path = db_path, "Record store ready");

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn in_memory() -> Result<Self, InfrastructureError> {
        Self::new(":memory:")
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, QualisError> {
        self.conn
            .lock()
            .map_err(|_| InfrastructureError::Database(DatabaseError::Poisoned).into())
    }
}

#[async_trait]
impl RecordRepository for DuckDbRecordRepository {
    #[instrument(skip(self, record), fields(number = %record.number))]
    async fn create_record(&self, record: &Record) -> Result<(), QualisError> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;

        if record_exists(&tx, &record.number)? {
            return Err(DomainError::RecordExists(record.number.clone()).into());
        }

        tx.execute(
            "INSERT INTO records (number, title, category, status) VALUES (?, ?, ?, ?)",
            params![
                record.number,
                record.title,
                record.category,
                record.status.as_str()
            ],
        )?;
        for (position, entry) in record.values.iter().enumerate() {
            tx.execute(
                "INSERT INTO record_entries VALUES (?, ?, ?, ?)",
                params![record.number, (position as i64), entry.criterion, entry.value],
            )?;
        }
        if let Some(assessment) = &record.assessment {
            let evaluated_at = record.evaluated_at.unwrap_or_else(Utc::now);
            write_assessment(&tx, &record.number, assessment, evaluated_at)?;
        }

        tx.commit()?;
        debug!(values = record.values.len(), "Record created");
        Ok(())
    }

    async fn load_record(&self, number: &str) -> Result<Record, QualisError> {
        let conn = self.lock()?;
        read_record(&conn, number)
    }

    async fn set_raw_value(
        &self,
        number: &str,
        criterion: &str,
        value: &str,
    ) -> Result<(), QualisError> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;

        if !record_exists(&tx, number)? {
            return Err(DomainError::RecordNotFound(number.to_string()).into());
        }

        let existing: i64 = tx.query_row(
            "SELECT COUNT(*) FROM record_entries WHERE record_number = ? AND criterion = ?",
            params![number, criterion],
            |row| row.get(0),
        )?;
        if existing > 0 {
            tx.execute(
                "UPDATE record_entries SET raw_value = ? WHERE record_number = ? AND criterion = ?",
                params![value, number, criterion],
            )?;
        } else {
            let next: i64 = tx.query_row(
                "SELECT COALESCE(MAX(position) + 1, 0) FROM record_entries WHERE record_number = ?",
                params![number],
                |row| row.get(0),
            )?;
            tx.execute(
                "INSERT INTO record_entries VALUES (?, ?, ?, ?)",
                params![number, next, criterion, value],
            )?;
        }

        tx.commit()?;
        Ok(())
    }

    async fn set_status(&self, number: &str, status: RecordStatus) -> Result<(), QualisError> {
        let conn = self.lock()?;
        let updated = conn.execute(
            "UPDATE records SET status = ? WHERE number = ?",
            params![status.as_str(), number],
        )?;
        if updated == 0 {
            return Err(DomainError::RecordNotFound(number.to_string()).into());
        }
        Ok(())
    }

    #[instrument(skip(self, assessment), fields(items = assessment.items.len()))]
    async fn save_assessment(
        &self,
        number: &str,
        assessment: &Assessment,
        evaluated_at: DateTime<Utc>,
    ) -> Result<(), QualisError> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;

        if !record_exists(&tx, number)? {
            return Err(DomainError::RecordNotFound(number.to_string()).into());
        }
        write_assessment(&tx, number, assessment, evaluated_at)?;

        tx.commit()?;
        debug!("Assessment stored");
        Ok(())
    }

    async fn list_records(&self) -> Result<Vec<Record>, QualisError> {
        let conn = self.lock()?;
        let numbers: Vec<String> = {
            let mut stmt = conn.prepare("SELECT number FROM records ORDER BY number")?;
            let numbers = stmt
                .query_map([], |row| row.get(0))?
                .collect::<Result<Vec<_>, _>>()?;
            numbers
        };
        numbers
            .iter()
            .map(|number| read_record(&conn, number))
            .collect()
    }
}

fn record_exists(conn: &Connection, number: &str) -> Result<bool, QualisError> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM records WHERE number = ?",
        params![number],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

fn write_assessment(
    conn: &Connection,
    number: &str,
    assessment: &Assessment,
    evaluated_at: DateTime<Utc>,
) -> Result<(), QualisError> {
    conn.execute(
        "DELETE FROM record_items WHERE record_number = ?",
        params![number],
    )?;
    for (position, item) in assessment.items.iter().enumerate() {
        conn.execute(
            "INSERT INTO record_items VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
            params![
                number,
                (position as i64),
                item.criterion,
                item.raw_value,
                item.numeric_value,
                item.compliance,
                item.deviation,
                item.severity.as_str()
            ],
        )?;
    }

    let errors = serde_json::to_string(&assessment.errors).map_err(InfrastructureError::from)?;
    let summary = &assessment.summary;
    conn.execute(
        "UPDATE records SET overall_compliance = ?, compliance_score = ?, failed_items_count = ?, \
         evaluated_count = ?, item_errors = ?, evaluated_at = ? WHERE number = ?",
        params![
            summary.overall_compliance,
            summary.compliance_score,
            (summary.failed_items_count as i64),
            (summary.evaluated_count as i64),
            errors,
            evaluated_at.to_rfc3339(),
            number
        ],
    )?;
    Ok(())
}

struct RecordRow {
    title: String,
    category: Option<String>,
    status: String,
    overall_compliance: Option<bool>,
    compliance_score: Option<f64>,
    failed_items_count: i64,
    evaluated_count: i64,
    item_errors: Option<String>,
    evaluated_at: Option<String>,
}

fn read_record(conn: &Connection, number: &str) -> Result<Record, QualisError> {
    let row = {
        let mut stmt = conn.prepare(
            "SELECT title, category, status, overall_compliance, compliance_score, \
             failed_items_count, evaluated_count, item_errors, evaluated_at \
             FROM records WHERE number = ?",
        )?;
        let mut rows = stmt.query(params![number])?;
        let row = rows
            .next()?
            .ok_or_else(|| DomainError::RecordNotFound(number.to_string()))?;
        RecordRow {
            title: row.get(0)?,
            category: row.get(1)?,
            status: row.get(2)?,
            overall_compliance: row.get(3)?,
            compliance_score: row.get(4)?,
            failed_items_count: row.get(5)?,
            evaluated_count: row.get(6)?,
            item_errors: row.get(7)?,
            evaluated_at: row.get(8)?,
        }
    };

    let values = {
        let mut stmt = conn.prepare(
            "SELECT criterion, raw_value FROM record_entries \
             WHERE record_number = ? ORDER BY position",
        )?;
        let values = stmt
            .query_map(params![number], |row| {
                Ok(SubmittedValue {
                    criterion: row.get(0)?,
                    value: row.get(1)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        values
    };

    let status = RecordStatus::from_str(&row.status).map_err(|detail| corrupted("records", detail))?;
    let evaluated_at = row
        .evaluated_at
        .as_deref()
        .map(|s| {
            DateTime::parse_from_rfc3339(s)
                .map(|d| d.with_timezone(&Utc))
                .map_err(|e| corrupted("records", e.to_string()))
        })
        .transpose()?;

    let assessment = match evaluated_at {
        Some(_) => Some(read_assessment(conn, number, &row)?),
        None => None,
    };

    Ok(Record {
        number: number.to_string(),
        title: row.title,
        category: row.category,
        status,
        values,
        assessment,
        evaluated_at,
    })
}

fn read_assessment(
    conn: &Connection,
    number: &str,
    row: &RecordRow,
) -> Result<Assessment, QualisError> {
    let raw_items: Vec<(ItemValue, String)> = {
        let mut stmt = conn.prepare(
            "SELECT criterion, raw_value, numeric_value, compliance, deviation, severity \
             FROM record_items WHERE record_number = ? ORDER BY position",
        )?;
        let items = stmt
            .query_map(params![number], |r| {
                Ok((
                    ItemValue {
                        criterion: r.get(0)?,
                        raw_value: r.get(1)?,
                        numeric_value: r.get(2)?,
                        compliance: r.get(3)?,
                        deviation: r.get(4)?,
                        severity: Severity::default(),
                    },
                    r.get::<_, String>(5)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;
        items
    };

    let mut items = Vec::with_capacity(raw_items.len());
    let mut failed_by_severity = BTreeMap::new();
    for (mut item, severity) in raw_items {
        item.severity =
            Severity::from_str(&severity).map_err(|detail| corrupted("record_items", detail))?;
        if !item.compliance {
            *failed_by_severity.entry(item.severity).or_insert(0) += 1;
        }
        items.push(item);
    }

    let errors: Vec<ItemError> = match row.item_errors.as_deref() {
        Some(json) => serde_json::from_str(json).map_err(InfrastructureError::from)?,
        None => Vec::new(),
    };

    let summary = RecordSummary {
        overall_compliance: row.overall_compliance,
        compliance_score: row.compliance_score,
        failed_items_count: row.failed_items_count.max(0) as usize,
        evaluated_count: row.evaluated_count.max(0) as usize,
        error_count: errors.len(),
        failed_by_severity,
    };

    Ok(Assessment {
        items,
        errors,
        summary,
    })
}

fn corrupted(table: &str, detail: String) -> QualisError {
    InfrastructureError::Database(DatabaseError::Corrupted {
        table: table.to_string(),
        detail,
    })
    .into()
}
