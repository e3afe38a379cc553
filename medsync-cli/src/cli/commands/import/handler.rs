//! Import command handler

use std::process::ExitCode;

use anyhow::Result;
use chrono::Utc;
use colored::*;

use super::ImportCommands;
use crate::cli::print_outcome;
use crate::config::Config;
use crate::ingest::{LogReporter, import_file};
use crate::output::{OutputFormat, render_records, write_output};

/// Import one workbook and write its records
pub fn handle_import_command(args: ImportCommands, config: &Config) -> Result<ExitCode> {
    if args.format == OutputFormat::Xlsx && args.output.is_none() {
        anyhow::bail!("--format xlsx needs --output <PATH>");
    }

    let outcome = import_file(&args.path, args.schema, config, &LogReporter, Utc::now())?;

    let bytes = render_records(
        &outcome.records,
        outcome.schema,
        args.format,
        !args.no_timestamp,
    )?;
    write_output(&bytes, args.output.as_deref())?;

    print_outcome(&outcome);
    if let Some(path) = &args.output {
        eprintln!("Results saved to: {}", path.display().to_string().bright_green());
    }

    Ok(ExitCode::SUCCESS)
}
