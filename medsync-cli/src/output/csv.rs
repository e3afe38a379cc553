//! CSV rendering of records

use anyhow::{Context, Result};
use csv::Writer;

use super::json::{ID_KEY, IMPORTED_AT_KEY};
use crate::ingest::types::{Record, Schema};

/// Render records as CSV: identifier, every canonical field of `schema`, then the import marker
pub fn records_to_csv(records: &[Record], schema: Schema, with_timestamp: bool) -> Result<String> {
    let fields = schema.allowed_fields();
    let mut wtr = Writer::from_writer(Vec::new());

    let mut header: Vec<&str> = vec![ID_KEY];
    header.extend(fields.iter().map(|field| field.label()));
    if with_timestamp {
        header.push(IMPORTED_AT_KEY);
    }
    wtr.write_record(&header)
        .context("Failed to write CSV header")?;

    for record in records {
        let mut row = vec![record.id.clone()];
        row.extend(fields.iter().map(|field| {
            record
                .fields
                .get(*field)
                .map(|value| value.to_string())
                .unwrap_or_default()
        }));
        if with_timestamp {
            row.push(record.imported_at.to_rfc3339());
        }
        wtr.write_record(&row)
            .with_context(|| format!("Failed to write record: {}", record.id))?;
    }

    let bytes = wtr
        .into_inner()
        .map_err(|e| anyhow::anyhow!("Failed to flush CSV writer: {}", e))?;
    String::from_utf8(bytes).context("CSV output is not valid UTF-8")
}
