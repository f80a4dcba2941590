// qualis/src/commands/mod.rs

pub mod catalog;
pub mod evaluate;
pub mod record;
pub mod report;

use std::path::{Path, PathBuf};

use anyhow::Context;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{ContentArrangement, Table};
use qualis_core::domain::compliance::{Assessment, ComplianceEngine, RecordSummary};
use qualis_core::domain::project::ProjectConfig;
use qualis_core::infrastructure::adapters::DuckDbRecordRepository;
use qualis_core::infrastructure::catalog::CriteriaCatalog;
use qualis_core::infrastructure::config::load_project_config;
use tracing::debug;

/// Configuration and catalog shared by every command.
pub struct Project {
    pub dir: PathBuf,
    pub config: ProjectConfig,
    pub catalog: CriteriaCatalog,
}

impl Project {
    pub fn load(project_dir: &Path) -> anyhow::Result<Self> {
        let config = load_project_config(project_dir).with_context(|| {
            format!(
                "Failed to load project configuration from {:?}",
                project_dir
            )
        })?;
        let catalog_path = project_dir.join(&config.criteria_path);
        let catalog = CriteriaCatalog::load(&catalog_path)
            .with_context(|| format!("Failed to load criteria from {:?}", catalog_path))?;

        Ok(Self {
            dir: project_dir.to_path_buf(),
            config,
            catalog,
        })
    }

    pub fn engine(&self) -> ComplianceEngine {
        ComplianceEngine::new(&self.config.compliance)
    }

    pub fn target_dir(&self) -> PathBuf {
        self.dir.join(&self.config.target_path)
    }

    pub fn open_repository(&self) -> anyhow::Result<DuckDbRecordRepository> {
        let db_path = self.dir.join(&self.config.database);
        debug!(path = ?db_path, "Opening record database");
        DuckDbRecordRepository::new(&db_path.to_string_lossy())
            .with_context(|| format!("Failed to open record database at {:?}", db_path))
    }
}

pub fn new_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

pub fn format_score(summary: &RecordSummary) -> String {
    match summary.compliance_score {
        Some(score) => format!("{}%", score),
        None => "n/a".to_string(),
    }
}

pub fn format_verdict(overall: Option<bool>) -> &'static str {
    match overall {
        Some(true) => "✅ compliant",
        Some(false) => "❌ non-compliant",
        None => "⏳ pending",
    }
}

/// Items table followed by the errors that kept some items out of the score.
pub fn print_assessment(assessment: &Assessment) {
    let mut items = new_table();
    items.set_header(vec!["Criterion", "Value", "Compliant", "Deviation", "Severity"]);
    for item in &assessment.items {
        items.add_row(vec![
            item.criterion.clone(),
            item.raw_value.clone(),
            if item.compliance { "yes" } else { "NO" }.to_string(),
            item.deviation.map(|d| d.to_string()).unwrap_or_default(),
            item.severity.to_string(),
        ]);
    }
    println!("{items}");

    if assessment.has_errors() {
        println!("⚠️  {} item(s) could not be evaluated:", assessment.errors.len());
        for error in &assessment.errors {
            println!("   ➜ {} [{:?}] {}", error.criterion, error.kind, error.message);
        }
    }

    let summary = &assessment.summary;
    println!(
        "   Verdict: {} | Score: {} | Failed: {}/{}",
        format_verdict(summary.overall_compliance),
        format_score(summary),
        summary.failed_items_count,
        summary.evaluated_count
    );
}
