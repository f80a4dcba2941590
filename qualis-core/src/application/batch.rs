// qualis-core/src/application/batch.rs

use chrono::Utc;
use futures::StreamExt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, instrument, warn};

use crate::domain::compliance::ComplianceEngine;
use crate::domain::ports::CriterionStore;
use crate::domain::record::Record;
use crate::error::QualisError;
use crate::infrastructure::records::{discover_record_files, load_record_file};

const MAX_CONCURRENT_FILES: usize = 8;

/// Result of assessing one record file. A file that cannot be read does not
/// stop the others.
#[derive(Debug)]
pub struct BatchOutcome {
    pub path: PathBuf,
    pub result: Result<Record, QualisError>,
}

/// Evaluates every record file under `path` without touching the repository.
/// Outcomes come back sorted by file path.
#[instrument(skip(store, engine))]
pub async fn assess_batch(
    path: &Path,
    store: Arc<dyn CriterionStore>,
    engine: Arc<ComplianceEngine>,
) -> Result<Vec<BatchOutcome>, QualisError> {
    let start = Instant::now();
    let files = discover_record_files(path)?;

    let tasks = files.into_iter().map(|file| {
        let store = Arc::clone(&store);
        let engine = Arc::clone(&engine);
        async move {
            let task_path = file.clone();
            let joined =
                tokio::task::spawn_blocking(move || assess_file(&task_path, &*store, &engine))
                    .await;
            let result = joined.unwrap_or_else(|e| {
                Err(QualisError::InternalError(format!(
                    "Assessment task panicked: {}",
                    e
                )))
            });
            BatchOutcome { path: file, result }
        }
    });

    let mut outcomes: Vec<BatchOutcome> = futures::stream::iter(tasks)
        .buffer_unordered(MAX_CONCURRENT_FILES)
        .collect()
        .await;
    outcomes.sort_by(|a, b| a.path.cmp(&b.path));

    for outcome in &outcomes {
        if let Err(e) = &outcome.result {
            warn!(path = ?outcome.path, error = %e, "Record file skipped");
        }
    }
    info!(
        files = outcomes.len(),
        elapsed = ?start.elapsed(),
        "Batch assessment finished"
    );
    Ok(outcomes)
}

fn assess_file(
    path: &Path,
    store: &dyn CriterionStore,
    engine: &ComplianceEngine,
) -> Result<Record, QualisError> {
    let mut record = load_record_file(path)?;
    record.assessment = Some(engine.assess(store, &record.values));
    record.evaluated_at = Some(Utc::now());
    Ok(record)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::application::evaluation::tests::catalog;
    use std::fs;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_batch_assesses_each_file_independently() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("a.yaml"),
            "number: A-1\nvalues:\n  - { criterion: TEMP, value: \"101.0\" }\n  - { criterion: SEAL, value: \"yes\" }\n",
        )
        .unwrap();
        fs::write(
            dir.path().join("b.yaml"),
            "number: B-1\nvalues:\n  - { criterion: FINISH, value: Good }\n",
        )
        .unwrap();
        fs::write(dir.path().join("c.yaml"), "title: no number here\n").unwrap();

        let store: Arc<dyn CriterionStore> = Arc::new(catalog());
        let outcomes = assess_batch(dir.path(), store, Arc::new(ComplianceEngine::default()))
            .await
            .unwrap();

        assert_eq!(outcomes.len(), 3);

        let a = outcomes[0].result.as_ref().unwrap();
        let a_summary = &a.assessment.as_ref().unwrap().summary;
        assert_eq!(a.number, "A-1");
        assert_eq!(a_summary.compliance_score, Some(50.0));
        assert_eq!(a.assessment.as_ref().unwrap().items[0].deviation, Some(0.5));

        let b = outcomes[1].result.as_ref().unwrap();
        assert_eq!(
            b.assessment.as_ref().unwrap().summary.overall_compliance,
            Some(true)
        );

        assert!(outcomes[2].result.is_err());
    }

    #[tokio::test]
    async fn test_batch_on_missing_path() {
        let dir = tempdir().unwrap();
        let store: Arc<dyn CriterionStore> = Arc::new(catalog());
        let result = assess_batch(
            &dir.path().join("missing"),
            store,
            Arc::new(ComplianceEngine::default()),
        )
        .await;
        assert!(result.is_err());
    }
}
