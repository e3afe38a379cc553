//! Rendering imported records

mod csv;
mod json;
mod xlsx;

pub use self::csv::records_to_csv;
pub use json::{
    ID_KEY, IMPORTED_AT_KEY, RecordView, SyncEntry, error_to_json, records_to_json, sync_to_json,
};
pub use xlsx::records_to_xlsx;

use std::fs;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use clap::ValueEnum;

use crate::ingest::types::{Record, Schema};

/// Output format for imported records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Pretty-printed JSON array
    #[default]
    Json,
    /// Single-line JSON array
    JsonCompact,
    /// Comma-separated values with a header row
    Csv,
    /// Excel workbook (requires --output)
    Xlsx,
}

impl OutputFormat {
    /// Whether the rendered bytes are text that can go to a terminal
    pub fn is_text(&self) -> bool {
        !matches!(self, OutputFormat::Xlsx)
    }
}

/// Render records of one schema in `format`
pub fn render_records(
    records: &[Record],
    schema: Schema,
    format: OutputFormat,
    with_timestamp: bool,
) -> Result<Vec<u8>> {
    let bytes = match format {
        OutputFormat::Json => records_to_json(records, true, with_timestamp)?.into_bytes(),
        OutputFormat::JsonCompact => records_to_json(records, false, with_timestamp)?.into_bytes(),
        OutputFormat::Csv => records_to_csv(records, schema, with_timestamp)?.into_bytes(),
        OutputFormat::Xlsx => records_to_xlsx(records, schema, with_timestamp)?,
    };
    Ok(bytes)
}

/// Write rendered output to `path`, or to stdout when no path is given
pub fn write_output(bytes: &[u8], path: Option<&Path>) -> Result<()> {
    match path {
        Some(path) => fs::write(path, bytes)
            .with_context(|| format!("Failed to write output to: {}", path.display())),
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(bytes).context("Failed to write to stdout")?;
            if !bytes.ends_with(b"\n") {
                stdout.write_all(b"\n").context("Failed to write to stdout")?;
            }
            stdout.flush().context("Failed to write to stdout")
        }
    }
}
