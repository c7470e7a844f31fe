//! CLI commands for data export
//!
//! Writes the current user's data as CSV, JSON or YAML, to a file or stdout.

use clap::Subcommand;
use std::io::Write;
use std::path::PathBuf;

use crate::cli::create_output;
use crate::error::MonetaResult;
use crate::export::{export_transactions_csv, export_user_json, export_user_yaml};
use crate::models::User;
use crate::storage::Storage;

/// Export subcommands
#[derive(Subcommand, Debug)]
pub enum ExportCommands {
    /// Export transactions to CSV
    Csv {
        /// Output file, stdout if omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Export all of the user's data to JSON
    Json {
        /// Output file, stdout if omitted
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Compact output instead of pretty-printed
        #[arg(long)]
        compact: bool,
    },

    /// Export all of the user's data to YAML
    Yaml {
        /// Output file, stdout if omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn writer_for(output: &Option<PathBuf>) -> MonetaResult<Box<dyn Write>> {
    Ok(match output {
        Some(path) => Box::new(create_output(path)?),
        None => Box::new(std::io::stdout().lock()),
    })
}

fn report_destination(output: &Option<PathBuf>, what: &str) {
    if let Some(path) = output {
        // stdout carries the data itself otherwise
        println!("{} exported to: {}", what, path.display());
    }
}

/// Handle export commands
pub fn handle_export_command(storage: &Storage, user: &User, cmd: ExportCommands) -> MonetaResult<()> {
    match cmd {
        ExportCommands::Csv { output } => {
            let mut writer = writer_for(&output)?;
            let count = export_transactions_csv(storage, user.id, &mut writer)?;
            writer.flush()?;
            report_destination(&output, &format!("{} transactions", count));
        }
        ExportCommands::Json { output, compact } => {
            let mut writer = writer_for(&output)?;
            export_user_json(storage, user, &mut writer, !compact)?;
            writeln!(writer)?;
            writer.flush()?;
            report_destination(&output, "User data");
        }
        ExportCommands::Yaml { output } => {
            let mut writer = writer_for(&output)?;
            export_user_yaml(storage, user, &mut writer)?;
            writer.flush()?;
            report_destination(&output, "User data");
        }
    }

    Ok(())
}
