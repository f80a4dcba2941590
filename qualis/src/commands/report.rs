// qualis/src/commands/report.rs
//
// USE CASE: Compliance report over all stored records.

use std::path::PathBuf;

use qualis_core::application::build_report;
use qualis_core::domain::reporting::ReportWindow;
use qualis_core::infrastructure::fs::write_json;

use crate::cli::OutputFormat;

use super::{Project, new_table};

pub async fn execute(
    project_dir: PathBuf,
    top: usize,
    format: OutputFormat,
    output: Option<PathBuf>,
    window: ReportWindow,
) -> anyhow::Result<()> {
    let project = Project::load(&project_dir)?;
    let repo = project.open_repository()?;

    let bundle = build_report(&repo, &project.catalog, top, window).await?;
    let exported = bundle.export(&project.target_dir())?;
    if let Some(output) = &output {
        write_json(output, &bundle)?;
    }

    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&bundle)?);
        return Ok(());
    }

    let report = &bundle.compliance;
    let mut overview = new_table();
    overview.set_header(vec!["Records", "Passed", "Failed", "Pending", "Pass rate", "Avg score"]);
    overview.add_row(vec![
        report.total_records.to_string(),
        report.passed.to_string(),
        report.failed.to_string(),
        report.pending.to_string(),
        format!("{}%", report.pass_rate),
        report
            .average_score
            .map(|s| format!("{}%", s))
            .unwrap_or_else(|| "n/a".to_string()),
    ]);
    if window.is_open() {
        println!("📊 Compliance overview");
    } else {
        let bound = |day: Option<chrono::NaiveDate>| {
            day.map(|d| d.to_string())
                .unwrap_or_else(|| "…".to_string())
        };
        println!(
            "📊 Compliance overview (evaluated {} to {})",
            bound(window.since),
            bound(window.until)
        );
    }
    println!("{overview}");

    if !report.status_breakdown.is_empty() {
        let breakdown: Vec<String> = report
            .status_breakdown
            .iter()
            .map(|(status, count)| format!("{}: {}", status, count))
            .collect();
        println!("   Status: {}", breakdown.join(", "));
    }
    if !report.category_breakdown.is_empty() {
        let breakdown: Vec<String> = report
            .category_breakdown
            .iter()
            .map(|(category, count)| format!("{}: {}", category, count))
            .collect();
        println!("   Category: {}", breakdown.join(", "));
    }

    if bundle.top_failures.is_empty() {
        println!("✅ No failed items recorded.");
    } else {
        let mut failures = new_table();
        failures.set_header(vec!["Criterion", "Title", "Severity", "Failures"]);
        for failure in &bundle.top_failures {
            failures.add_row(vec![
                failure.criterion.clone(),
                failure.title.clone(),
                failure
                    .severity
                    .map(|s| s.to_string())
                    .unwrap_or_default(),
                failure.failure_count.to_string(),
            ]);
        }
        println!("🔥 Most failed criteria");
        println!("{failures}");
    }

    println!("💾 Report written to {}", exported.display());
    Ok(())
}
