//! Sync command handler

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use chrono::Utc;
use colored::*;

use super::SyncCommands;
use crate::cli::print_outcome;
use crate::config::Config;
use crate::ingest::{ImportOutcome, LogReporter, Schema, import_file};
use crate::output::{SyncEntry, sync_to_json, write_output};

/// Import each given report independently; one file failing never drops the other's records
pub fn handle_sync_command(args: SyncCommands, config: &Config) -> Result<ExitCode> {
    let inputs: Vec<(Schema, PathBuf)> = [(Schema::Marg, args.marg), (Schema::Pmbi, args.pmbi)]
        .into_iter()
        .filter_map(|(schema, path)| path.map(|path| (schema, path)))
        .collect();

    if inputs.is_empty() {
        anyhow::bail!("Provide at least one of --marg or --pmbi");
    }

    // One timestamp for the whole run
    let imported_at = Utc::now();

    let results: Vec<(Schema, Result<ImportOutcome>)> = inputs
        .iter()
        .map(|(schema, path)| {
            let result = import_file(path, *schema, config, &LogReporter, imported_at);
            match &result {
                Ok(outcome) => print_outcome(outcome),
                Err(e) => eprintln!(
                    "{} {} {}",
                    format!("{:<4}", schema.label()).bold(),
                    schema.collection().cyan(),
                    format!("{:#}", e).red()
                ),
            }
            (*schema, result)
        })
        .collect();

    let entries: BTreeMap<&str, SyncEntry<'_>> = results
        .iter()
        .map(|(schema, result)| {
            (
                schema.collection(),
                SyncEntry::from_result(result, !args.no_timestamp),
            )
        })
        .collect();

    let document = sync_to_json(entries)?;
    write_output(document.as_bytes(), args.output.as_deref())?;

    let all_failed = results.iter().all(|(_, result)| result.is_err());
    Ok(if all_failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}
