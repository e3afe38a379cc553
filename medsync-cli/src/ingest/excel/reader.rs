//! Read the first worksheet of a workbook into a raw grid

use std::io::{Cursor, Read, Seek};
use std::path::Path;

use anyhow::{Context, Result};
use calamine::{Data, Range, Reader, Sheets, open_workbook_auto, open_workbook_auto_from_rs};
use chrono::{NaiveDate, NaiveDateTime, TimeDelta};

use crate::ingest::types::{RawCell, RawGrid};

/// Read the first worksheet of an `.xls`, `.xlsx`, `.xlsm`, `.xlsb` or `.ods` file
pub fn read_grid<P: AsRef<Path>>(path: P) -> Result<RawGrid> {
    let path = path.as_ref();
    let mut workbook = open_workbook_auto(path)
        .with_context(|| format!("Failed to open workbook: {}", path.display()))?;
    first_sheet(&mut workbook)
        .with_context(|| format!("Failed to read workbook: {}", path.display()))
}

/// Read the first worksheet of an in-memory workbook
pub fn read_grid_from_bytes(bytes: Vec<u8>) -> Result<RawGrid> {
    let mut workbook =
        open_workbook_auto_from_rs(Cursor::new(bytes)).context("Failed to open workbook")?;
    first_sheet(&mut workbook)
}

fn first_sheet<RS: Read + Seek>(workbook: &mut Sheets<RS>) -> Result<RawGrid> {
    let sheet_name = workbook
        .sheet_names()
        .first()
        .context("Workbook has no sheets")?
        .clone();

    let range = workbook
        .worksheet_range(&sheet_name)
        .with_context(|| format!("Failed to read sheet: {}", sheet_name))?;

    Ok(RawGrid::new(sheet_name, range_to_rows(&range)))
}

/// Convert a sheet range to rows of raw cells.
///
/// Ranges start at the first used cell; leading empty rows are restored so
/// row numbers match what the spreadsheet shows.
fn range_to_rows(range: &Range<Data>) -> Vec<Vec<RawCell>> {
    let leading = range.start().map(|(row, _)| row as usize).unwrap_or(0);

    std::iter::repeat_with(Vec::new)
        .take(leading)
        .chain(range.rows().map(|row| row.iter().map(cell_from_data).collect()))
        .collect()
}

/// Convert one calamine cell
pub fn cell_from_data(cell: &Data) -> RawCell {
    match cell {
        Data::Empty => RawCell::Empty,
        Data::String(s) => RawCell::String(s.clone()),
        Data::Int(i) => RawCell::Int(*i),
        Data::Float(f) => RawCell::Float(*f),
        Data::Bool(b) => RawCell::Bool(*b),
        Data::DateTime(dt) if dt.is_duration() => RawCell::Float(dt.as_f64()),
        Data::DateTime(dt) => match excel_serial_to_datetime(dt.as_f64()) {
            Some(value) => RawCell::DateTime(value),
            None => RawCell::Float(dt.as_f64()),
        },
        Data::DateTimeIso(s) => match s.parse::<NaiveDateTime>() {
            Ok(value) => RawCell::DateTime(value),
            Err(_) => RawCell::String(s.clone()),
        },
        Data::DurationIso(s) => RawCell::String(s.clone()),
        Data::Error(e) => RawCell::Error(e.to_string()),
    }
}

/// Convert an Excel serial date (days since 1899-12-30) to a date-time.
///
/// Serials before 1900-03-01 are off by one day because of Excel's phantom
/// 1900-02-29; stock reports never carry those.
pub fn excel_serial_to_datetime(serial: f64) -> Option<NaiveDateTime> {
    if !serial.is_finite() || serial < 0.0 {
        return None;
    }
    let base = NaiveDate::from_ymd_opt(1899, 12, 30)?.and_hms_opt(0, 0, 0)?;
    let millis = (serial * 86_400_000.0).round() as i64;
    base.checked_add_signed(TimeDelta::try_milliseconds(millis)?)
}
