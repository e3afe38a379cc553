//! MARG and PMBI stock report normalization
//!
//! Reads messy stock report spreadsheets, finds the header row, maps columns to a
//! fixed per-schema field set and builds typed records keyed by a sanitized
//! document identifier.

pub mod cli;
pub mod config;
pub mod ingest;
pub mod output;

pub use config::Config;
pub use ingest::{
    ImportEngine, ImportEvent, ImportOutcome, ImportReporter, ImportSummary, LogReporter,
    NullReporter, Schema, import_file,
};
