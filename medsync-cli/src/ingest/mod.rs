//! Stock report ingestion
//!
//! Pipeline, leaf first: header normalization, header row detection, field
//! mapping, value coercion, record assembly. [`ImportEngine`] drives it for one
//! sheet; [`import_file`] adds workbook reading in front.

pub mod assemble;
pub mod coerce;
pub mod engine;
pub mod excel;
pub mod header;
pub mod identifier;
pub mod mapping;
pub mod report;
pub mod types;

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};

use crate::config::Config;

pub use engine::{ImportEngine, ImportOutcome};
pub use report::{ImportEvent, ImportReporter, ImportSummary, LogReporter, NullReporter};
pub use types::Schema;

/// Read a workbook and import its first sheet as `schema`
pub fn import_file(
    path: &Path,
    schema: Schema,
    config: &Config,
    reporter: &dyn ImportReporter,
    imported_at: DateTime<Utc>,
) -> Result<ImportOutcome> {
    log::info!("Importing {} as {}", path.display(), schema);

    let grid = excel::read_grid(path)?;
    ImportEngine::new(schema, config, reporter)
        .with_imported_at(imported_at)
        .process_grid(&grid)
        .with_context(|| format!("Failed to import {}", path.display()))
}
