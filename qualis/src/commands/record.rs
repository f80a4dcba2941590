// qualis/src/commands/record.rs
//
// USE CASES: create, edit, transition and show stored records.

use std::path::Path;
use std::str::FromStr;

use anyhow::Context;
use qualis_core::application::{RecordContext, import_record, transition_record, update_item};
use qualis_core::domain::compliance::ComplianceEngine;
use qualis_core::domain::record::RecordAction;
use qualis_core::infrastructure::records::load_record_file;
use qualis_core::ports::repository::RecordRepository;

use crate::cli::RecordCommands;

use super::{Project, print_assessment};

pub async fn execute(command: RecordCommands) -> anyhow::Result<()> {
    match command {
        RecordCommands::Create { file, project_dir } => create(&file, &project_dir).await,
        RecordCommands::Set {
            number,
            criterion,
            value,
            project_dir,
        } => set(&number, &criterion, &value, &project_dir).await,
        RecordCommands::Transition {
            number,
            action,
            project_dir,
        } => transition(&number, &action, &project_dir).await,
        RecordCommands::Show {
            number,
            project_dir,
            json,
        } => show(&number, &project_dir, json).await,
    }
}

async fn create(file: &Path, project_dir: &Path) -> anyhow::Result<()> {
    let project = Project::load(project_dir)?;
    let repo = project.open_repository()?;
    let engine = project.engine();
    let ctx = context(&project, &repo, &engine);

    let record = load_record_file(file)
        .with_context(|| format!("Failed to read record file {:?}", file))?;
    let stored = import_record(ctx, record).await?;

    println!(
        "🗂️  Record {} created ({} value(s), {})",
        stored.number,
        stored.values.len(),
        stored.status
    );
    if let Some(assessment) = &stored.assessment {
        print_assessment(assessment);
    }
    Ok(())
}

async fn set(number: &str, criterion: &str, value: &str, project_dir: &Path) -> anyhow::Result<()> {
    let project = Project::load(project_dir)?;
    let repo = project.open_repository()?;
    let engine = project.engine();
    let ctx = context(&project, &repo, &engine);

    let assessment = update_item(ctx, number, criterion, value).await?;
    println!("✏️  {}: {} = {}", number, criterion, value);
    match assessment {
        Some(assessment) => print_assessment(&assessment),
        None => println!("   Evaluation deferred until submission."),
    }
    Ok(())
}

async fn transition(number: &str, action: &str, project_dir: &Path) -> anyhow::Result<()> {
    let action = RecordAction::from_str(action).map_err(anyhow::Error::msg)?;
    let project = Project::load(project_dir)?;
    let repo = project.open_repository()?;
    let engine = project.engine();
    let ctx = context(&project, &repo, &engine);

    let status = transition_record(ctx, number, action).await?;
    println!("🔁 Record {} is now {}", number, status);
    Ok(())
}

async fn show(number: &str, project_dir: &Path, json: bool) -> anyhow::Result<()> {
    let project = Project::load(project_dir)?;
    let repo = project.open_repository()?;
    let record = repo.load_record(number).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&record)?);
        return Ok(());
    }

    println!("📄 {} {} [{}]", record.number, record.title, record.status);
    if let Some(category) = &record.category {
        println!("   Category: {}", category);
    }
    match (&record.assessment, record.evaluated_at) {
        (Some(assessment), Some(at)) => {
            println!("   Evaluated at {}", at.to_rfc3339());
            print_assessment(assessment);
        }
        (Some(assessment), None) => print_assessment(assessment),
        (None, _) => println!("   Not evaluated yet ({} value(s) entered).", record.values.len()),
    }
    Ok(())
}

fn context<'a>(
    project: &'a Project,
    repo: &'a dyn RecordRepository,
    engine: &'a ComplianceEngine,
) -> RecordContext<'a> {
    RecordContext {
        repo,
        store: &project.catalog,
        engine,
        recompute: project.config.compliance.recompute,
    }
}
