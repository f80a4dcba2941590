// qualis-core/src/application/report.rs

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{info, instrument};

use crate::domain::ports::CriterionStore;
use crate::domain::reporting::{
    ComplianceReport, CriterionFailure, ReportWindow, criteria_failures,
};
use crate::error::QualisError;
use crate::infrastructure::fs::write_json;
use crate::ports::repository::RecordRepository;

pub const REPORT_FILE: &str = "compliance_report.json";

#[derive(Debug, Clone, Serialize)]
pub struct ReportBundle {
    pub generated_at: DateTime<Utc>,
    pub window: ReportWindow,
    pub compliance: ComplianceReport,
    pub top_failures: Vec<CriterionFailure>,
}

#[instrument(skip(repo, store))]
pub async fn build_report(
    repo: &dyn RecordRepository,
    store: &dyn CriterionStore,
    top_n: usize,
    window: ReportWindow,
) -> Result<ReportBundle, QualisError> {
    let records = repo.list_records().await?;
    let selected = window.select(&records);
    let bundle = ReportBundle {
        generated_at: Utc::now(),
        window,
        compliance: ComplianceReport::build(selected.iter().copied()),
        top_failures: criteria_failures(selected.iter().copied(), store, top_n),
    };
    info!(
        records = bundle.compliance.total_records,
        pass_rate = bundle.compliance.pass_rate,
        "Report built"
    );
    Ok(bundle)
}

impl ReportBundle {
    /// Writes the bundle as `compliance_report.json` under `target_dir`.
    pub fn export(&self, target_dir: &Path) -> Result<PathBuf, QualisError> {
        let path = target_dir.join(REPORT_FILE);
        write_json(&path, self)?;
        Ok(path)
    }
}
