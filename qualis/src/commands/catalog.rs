// qualis/src/commands/catalog.rs
//
// USE CASE: List the criteria catalog.

use std::path::PathBuf;

use qualis_core::domain::criterion::{Criterion, DataType};

use super::{Project, new_table};

pub fn execute(project_dir: PathBuf) -> anyhow::Result<()> {
    let project = Project::load(&project_dir)?;
    println!(
        "📋 {} (v{}): {} criteria",
        project.config.name,
        project.config.version,
        project.catalog.len()
    );

    let mut table = new_table();
    table.set_header(vec!["Code", "Title", "Type", "Expectation", "Severity"]);
    for criterion in project.catalog.criteria() {
        table.add_row(vec![
            criterion.code.clone(),
            criterion.title.clone(),
            criterion.data_type.to_string(),
            expectation(criterion),
            criterion.severity.to_string(),
        ]);
    }
    println!("{table}");

    let issues = project.catalog.issues();
    if issues.is_empty() {
        println!("✅ All criteria are well-formed.");
        return Ok(());
    }

    eprintln!("⚠️  {} misconfigured criteria:", issues.len());
    for issue in &issues {
        eprintln!("   ➜ {}: {}", issue.criterion, issue.reason);
    }
    std::process::exit(1);
}

fn expectation(criterion: &Criterion) -> String {
    let unit = criterion.unit.as_deref().unwrap_or("");
    let bound = |v: Option<f64>| v.map(|v| v.to_string()).unwrap_or_else(|| "∞".to_string());

    if criterion.data_type.has_options() {
        return criterion.options.join(" | ");
    }
    match (criterion.limit_min, criterion.limit_max) {
        (None, None) if criterion.data_type == DataType::Boolean => {
            let expected = if criterion.expect_true { "yes" } else { "no" };
            expected.to_string()
        }
        (None, None) => String::new(),
        (min, max) => {
            let mut text = format!("[{}, {}] {}", bound(min), bound(max), unit);
            if let Some(tolerance) = criterion.tolerance {
                text.push_str(&format!(" ±{}", tolerance));
            }
            text.trim_end().to_string()
        }
    }
}
