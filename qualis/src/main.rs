// qualis/src/main.rs

mod cli;
mod commands;

use clap::Parser;
use miette::Diagnostic;
use qualis_core::QualisError;
use qualis_core::domain::reporting::ReportWindow;

use crate::cli::{Cli, Commands};

#[tokio::main]
async fn main() {
    // RUST_LOG=debug qualis report ... to see spans and adapter events.
    // Logs go to stderr so `--json` output stays parseable.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Catalog { project_dir } => commands::catalog::execute(project_dir),
        Commands::Evaluate {
            path,
            project_dir,
            json,
        } => commands::evaluate::execute(path, project_dir, json).await,
        Commands::Record { command } => commands::record::execute(command).await,
        Commands::Report {
            project_dir,
            top,
            format,
            output,
            since,
            until,
        } => {
            let window = ReportWindow { since, until };
            commands::report::execute(project_dir, top, format, output, window).await
        }
    };

    if let Err(e) = result {
        report_error(&e);
        std::process::exit(1);
    }
}

/// Prints the error chain, plus the diagnostic code and help for domain errors.
fn report_error(err: &anyhow::Error) {
    eprintln!("❌ {:#}", err);

    let domain = err.chain().find_map(|cause| match cause.downcast_ref::<QualisError>() {
        Some(QualisError::Domain(d)) => Some(d),
        _ => None,
    });
    if let Some(diagnostic) = domain {
        if let Some(code) = diagnostic.code() {
            eprintln!("   [{}]", code);
        }
        if let Some(help) = diagnostic.help() {
            eprintln!("   👉 {}", help);
        }
    }
}
