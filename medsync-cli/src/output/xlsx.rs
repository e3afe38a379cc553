//! Excel rendering of records

use anyhow::{Context, Result};
use rust_xlsxwriter::{Format, Workbook, Worksheet};

use super::json::{ID_KEY, IMPORTED_AT_KEY};
use crate::ingest::types::{FieldValue, Record, Schema};

/// Render records as an `.xlsx` workbook with one sheet named after the collection
pub fn records_to_xlsx(records: &[Record], schema: Schema, with_timestamp: bool) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(schema.collection())?;

    let bold = Format::new().set_bold();
    let fields = schema.allowed_fields();

    // Header
    worksheet.write_string_with_format(0, 0, ID_KEY, &bold)?;
    for (idx, field) in fields.iter().enumerate() {
        worksheet.write_string_with_format(0, (idx + 1) as u16, field.label(), &bold)?;
    }
    let timestamp_col = (fields.len() + 1) as u16;
    if with_timestamp {
        worksheet.write_string_with_format(0, timestamp_col, IMPORTED_AT_KEY, &bold)?;
    }

    // Records
    for (row_idx, record) in records.iter().enumerate() {
        let row = (row_idx + 1) as u32;
        worksheet.write_string(row, 0, &record.id)?;
        for (idx, field) in fields.iter().enumerate() {
            if let Some(value) = record.fields.get(*field) {
                write_value(worksheet, row, (idx + 1) as u16, &value)?;
            }
        }
        if with_timestamp {
            worksheet.write_string(row, timestamp_col, record.imported_at.to_rfc3339())?;
        }
    }

    worksheet.autofit();

    workbook
        .save_to_buffer()
        .context("Failed to build Excel workbook")
}

/// Numbers stay numeric; dates are written as `DD-MM-YY` text like the JSON output
fn write_value(worksheet: &mut Worksheet, row: u32, col: u16, value: &FieldValue) -> Result<()> {
    match value.as_number() {
        Some(n) => worksheet.write_number(row, col, n)?,
        None => worksheet.write_string(row, col, value.to_string())?,
    };
    Ok(())
}
