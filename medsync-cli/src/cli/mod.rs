//! Command-line interface

pub mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use colored::*;

use crate::config::{LoadedConfig, load_config};
use crate::ingest::ImportOutcome;
use commands::config::{ConfigCommands, handle_config_command};
use commands::import::{ImportCommands, handle_import_command};
use commands::inspect::{InspectCommands, handle_inspect_command};
use commands::sync::{SyncCommands, handle_sync_command};

#[derive(Parser, Debug)]
#[command(
    name = "medsync",
    version,
    about = "Normalizes MARG and PMBI stock report spreadsheets into canonical medicine records"
)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Config file (defaults to $MEDSYNC_CONFIG, then the per-user config file)
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Import one stock report
    Import(ImportCommands),
    /// Import a MARG and a PMBI report in one run
    Sync(SyncCommands),
    /// Show raw rows, detected header rows and column mappings
    Inspect(InspectCommands),
    /// Print the effective configuration
    Config(ConfigCommands),
}

impl Cli {
    /// Log filter derived from `-v` flags; `RUST_LOG` still takes precedence
    pub fn log_filter(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}

/// Run the parsed command
pub fn run(cli: Cli) -> Result<ExitCode> {
    let loaded = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Import(args) => handle_import_command(args, &loaded.config),
        Commands::Sync(args) => handle_sync_command(args, &loaded.config),
        Commands::Inspect(args) => handle_inspect_command(args, &loaded.config),
        Commands::Config(args) => handle_config_command(args, &loaded),
    }
}

/// One-line import summary on stderr
pub(crate) fn print_outcome(outcome: &ImportOutcome) {
    let mapped = outcome
        .columns
        .iter()
        .filter(|column| column.mapping().is_some())
        .count();

    eprintln!(
        "{} {} {}, {}, {} {}",
        format!("{:<4}", outcome.schema.label()).bold(),
        outcome.schema.collection().cyan(),
        format!("{} processed", outcome.summary.processed).green(),
        format!("{} skipped", outcome.summary.skipped).yellow(),
        format!("{} failed", outcome.summary.failed).red(),
        format!(
            "(header row {}, {}/{} columns mapped)",
            outcome.header.row + 1,
            mapped,
            outcome.columns.len()
        )
        .dimmed()
    );
}

/// Config source line, shared by commands that mention it
pub(crate) fn describe_source(loaded: &LoadedConfig) -> String {
    format!("# config: {}", loaded.source)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::Schema;
    use crate::output::OutputFormat;

    #[test]
    fn test_parse_import() {
        let cli = Cli::try_parse_from([
            "medsync", "-vv", "import", "stock.xls", "--schema", "pmbi", "--format", "csv",
        ])
        .unwrap();
        assert_eq!(cli.log_filter(), "debug");
        let Commands::Import(args) = cli.command else {
            panic!("expected import");
        };
        assert_eq!(args.schema, Schema::Pmbi);
        assert_eq!(args.format, OutputFormat::Csv);
        assert!(!args.no_timestamp);
    }

    #[test]
    fn test_parse_sync_with_global_flags() {
        let cli = Cli::try_parse_from([
            "medsync",
            "sync",
            "--marg",
            "marg.xls",
            "--no-timestamp",
            "--no-color",
            "--config",
            "alt.toml",
        ])
        .unwrap();
        assert!(cli.no_color);
        assert_eq!(cli.config, Some(PathBuf::from("alt.toml")));
        let Commands::Sync(args) = cli.command else {
            panic!("expected sync");
        };
        assert_eq!(args.marg, Some(PathBuf::from("marg.xls")));
        assert!(args.pmbi.is_none());
        assert!(args.no_timestamp);
    }

    #[test]
    fn test_unknown_schema_is_rejected() {
        let result = Cli::try_parse_from(["medsync", "import", "a.xls", "--schema", "tally"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_describe_defaults() {
        let loaded = LoadedConfig {
            config: Default::default(),
            source: crate::config::ConfigSource::Defaults,
        };
        assert_eq!(describe_source(&loaded), "# config: built-in defaults");
    }
}
