// qualis/src/commands/evaluate.rs
//
// USE CASE: Dry-run evaluation of record files. Nothing is stored.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use qualis_core::application::assess_batch;
use qualis_core::domain::ports::CriterionStore;
use qualis_core::domain::record::Record;

use super::{Project, format_score, format_verdict, new_table, print_assessment};

pub async fn execute(path: PathBuf, project_dir: PathBuf, json: bool) -> anyhow::Result<()> {
    let project = Project::load(&project_dir)?;
    let engine = Arc::new(project.engine());
    let store: Arc<dyn CriterionStore> = Arc::new(project.catalog);

    if !json {
        println!("🔎 Evaluating {}...", path.display());
    }
    let outcomes = assess_batch(&path, store, engine)
        .await
        .with_context(|| format!("Failed to read records from {:?}", path))?;

    let mut records: Vec<&Record> = Vec::new();
    let mut unreadable = 0;
    for outcome in &outcomes {
        match &outcome.result {
            Ok(record) => records.push(record),
            Err(e) => {
                unreadable += 1;
                eprintln!("❌ {}: {}", outcome.path.display(), e);
            }
        }
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&records)?);
    } else {
        print_records(&records);
    }

    let summaries = records
        .iter()
        .filter_map(|r| r.assessment.as_ref().map(|a| &a.summary));
    let (mut compliant, mut non_compliant, mut pending) = (0, 0, 0);
    for summary in summaries {
        match summary.overall_compliance {
            Some(true) => compliant += 1,
            Some(false) => non_compliant += 1,
            None => pending += 1,
        }
    }
    eprintln!(
        "📊 {} record(s): {} compliant, {} non-compliant, {} pending, {} unreadable",
        outcomes.len(),
        compliant,
        non_compliant,
        pending,
        unreadable
    );

    if non_compliant > 0 || unreadable > 0 {
        std::process::exit(1);
    }
    Ok(())
}

fn print_records(records: &[&Record]) {
    if records.len() == 1
        && let Some(assessment) = &records[0].assessment
    {
        println!("📄 {} {}", records[0].number, records[0].title);
        print_assessment(assessment);
        return;
    }

    let mut table = new_table();
    table.set_header(vec!["Record", "Title", "Verdict", "Score", "Failed", "Errors"]);
    for record in records {
        let Some(assessment) = &record.assessment else {
            continue;
        };
        let summary = &assessment.summary;
        table.add_row(vec![
            record.number.clone(),
            record.title.clone(),
            format_verdict(summary.overall_compliance).to_string(),
            format_score(summary),
            summary.failed_items_count.to_string(),
            summary.error_count.to_string(),
        ]);
    }
    println!("{table}");
}
