// qualis/src/cli.rs
//
// Single source of truth for all CLI definitions (Clap structs).

use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "qualis")]
#[command(about = "Inspection criteria, compliance scoring and record lifecycle", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 📋 Lists the criteria catalog and flags misconfigured criteria
    Catalog {
        #[arg(long, default_value = ".")]
        project_dir: PathBuf,
    },

    /// 🔎 Evaluates record files (or a directory of them) without storing anything
    Evaluate {
        /// Record file or directory, relative to the current directory
        path: PathBuf,

        #[arg(long, default_value = ".")]
        project_dir: PathBuf,

        /// Print the assessed records as JSON
        #[arg(long)]
        json: bool,
    },

    /// 🗂️ Manages stored inspection records
    Record {
        #[command(subcommand)]
        command: RecordCommands,
    },

    /// 📊 Compliance report across all stored records
    Report {
        #[arg(long, default_value = ".")]
        project_dir: PathBuf,

        /// Number of most-failed criteria to list
        #[arg(long, default_value = "10")]
        top: usize,

        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,

        /// Extra copy of the JSON report
        #[arg(long, short)]
        output: Option<PathBuf>,

        /// Only records evaluated on or after this day (YYYY-MM-DD)
        #[arg(long)]
        since: Option<NaiveDate>,

        /// Only records evaluated on or before this day (YYYY-MM-DD)
        #[arg(long)]
        until: Option<NaiveDate>,
    },
}

#[derive(Subcommand)]
pub enum RecordCommands {
    /// Imports a record file into the database
    Create {
        file: PathBuf,

        #[arg(long, default_value = ".")]
        project_dir: PathBuf,
    },

    /// Enters or corrects the value of one criterion
    Set {
        number: String,
        criterion: String,
        value: String,

        #[arg(long, default_value = ".")]
        project_dir: PathBuf,
    },

    /// Applies a lifecycle action: submit, start_review, approve, reject, reopen, close
    Transition {
        number: String,
        action: String,

        #[arg(long, default_value = ".")]
        project_dir: PathBuf,
    },

    /// Shows a record with its evaluated items
    Show {
        number: String,

        #[arg(long, default_value = ".")]
        project_dir: PathBuf,

        #[arg(long)]
        json: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}
