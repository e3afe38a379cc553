//! JSON rendering of records and sync results

use std::collections::BTreeMap;

use anyhow::{Context, Result};
use serde::Serialize;
use serde::ser::{SerializeMap, Serializer};

use crate::ingest::types::Record;
use crate::ingest::{ImportOutcome, ImportSummary};

/// Key holding the document identifier
pub const ID_KEY: &str = "id";

/// Key holding the import timestamp
pub const IMPORTED_AT_KEY: &str = "_imported_at";

/// Serializes a record as a flat object: identifier, canonical fields in schema
/// order, then the import marker
pub struct RecordView<'a> {
    record: &'a Record,
    with_timestamp: bool,
}

impl<'a> RecordView<'a> {
    pub fn new(record: &'a Record, with_timestamp: bool) -> Self {
        Self {
            record,
            with_timestamp,
        }
    }
}

impl Serialize for RecordView<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let entries = self.record.fields.entries();
        let len = 1 + entries.len() + usize::from(self.with_timestamp);

        let mut map = serializer.serialize_map(Some(len))?;
        map.serialize_entry(ID_KEY, &self.record.id)?;
        for (field, value) in &entries {
            map.serialize_entry(field.label(), value)?;
        }
        if self.with_timestamp {
            map.serialize_entry(IMPORTED_AT_KEY, &self.record.imported_at.to_rfc3339())?;
        }
        map.end()
    }
}

fn views(records: &[Record], with_timestamp: bool) -> Vec<RecordView<'_>> {
    records
        .iter()
        .map(|record| RecordView::new(record, with_timestamp))
        .collect()
}

/// Render records as a JSON array
pub fn records_to_json(records: &[Record], pretty: bool, with_timestamp: bool) -> Result<String> {
    let views = views(records, with_timestamp);
    if pretty {
        serde_json::to_string_pretty(&views).context("Failed to format JSON output")
    } else {
        serde_json::to_string(&views).context("Failed to format JSON output")
    }
}

/// Per-collection entry of a sync document
#[derive(Serialize)]
#[serde(untagged)]
pub enum SyncEntry<'a> {
    Imported {
        items: Vec<RecordView<'a>>,
        summary: ImportSummary,
    },
    Failed {
        error: String,
    },
}

impl<'a> SyncEntry<'a> {
    pub fn from_result(result: &'a Result<ImportOutcome>, with_timestamp: bool) -> Self {
        match result {
            Ok(outcome) => SyncEntry::Imported {
                items: views(&outcome.records, with_timestamp),
                summary: outcome.summary,
            },
            Err(e) => SyncEntry::Failed {
                error: format!("{:#}", e),
            },
        }
    }
}

/// Render a sync run as one object keyed by collection name
pub fn sync_to_json(entries: BTreeMap<&str, SyncEntry<'_>>) -> Result<String> {
    serde_json::to_string_pretty(&entries).context("Failed to format JSON output")
}

/// The `{"error": "..."}` document printed when a command fails
pub fn error_to_json(error: &anyhow::Error) -> String {
    serde_json::json!({ "error": format!("{:#}", error) }).to_string()
}
