use std::path::PathBuf;

use chrono::{TimeZone, Utc};
use rust_xlsxwriter::{ExcelDateTime, Format, Workbook};

use medsync::ingest::report::CollectingReporter;
use medsync::ingest::types::{CanonicalField, FieldValue};
use medsync::output::{OutputFormat, render_records};
use medsync::{Config, ImportEvent, NullReporter, Schema, import_file};

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("medsync-it-{}-{}", std::process::id(), name))
}

/// MARG export with a title banner above the header row
fn write_marg_workbook(name: &str) -> PathBuf {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    worksheet.write_string(0, 0, "SHREE MEDICAL STORE").unwrap();
    worksheet.write_string(1, 0, "Stock Report").unwrap();

    for (col, label) in ["Product Name", "Current Stock", "M.R.P.", "EXP", "Batch No"]
        .iter()
        .enumerate()
    {
        worksheet.write_string(3, col as u16, *label).unwrap();
    }

    let date_format = Format::new().set_num_format("dd-mm-yyyy");

    worksheet.write_string(4, 0, "Paracetamol/500mg").unwrap();
    worksheet.write_number(4, 1, 40.0).unwrap();
    worksheet.write_string(4, 2, "1,234.50").unwrap();
    worksheet
        .write_datetime_with_format(4, 3, &ExcelDateTime::from_ymd(2027, 5, 1).unwrap(), &date_format)
        .unwrap();
    worksheet.write_string(4, 4, "B1").unwrap();

    // No product name: skipped
    worksheet.write_number(5, 1, 3.0).unwrap();

    worksheet.write_string(6, 0, "Azithral 500").unwrap();
    worksheet.write_string(6, 1, "12.9").unwrap();
    worksheet.write_string(6, 2, "N.A.").unwrap();
    worksheet.write_string(6, 3, "01-May-27").unwrap();

    let path = temp_path(name);
    workbook.save(&path).unwrap();
    path
}

#[test]
fn imports_marg_workbook() {
    let path = write_marg_workbook("marg.xlsx");
    let reporter = CollectingReporter::new();
    let imported_at = Utc.with_ymd_and_hms(2026, 10, 16, 8, 0, 0).unwrap();

    let outcome = import_file(&path, Schema::Marg, &Config::default(), &reporter, imported_at).unwrap();

    assert_eq!(outcome.header.row, 3);
    assert_eq!(outcome.summary.processed, 2);
    assert_eq!(outcome.summary.skipped, 1);
    assert_eq!(outcome.summary.failed, 0);

    let first = &outcome.records[0];
    assert_eq!(first.id, "Paracetamol-500mg");
    assert_eq!(first.fields.get(CanonicalField::CurrentStock), Some(FieldValue::Integer(40)));
    assert_eq!(first.fields.get(CanonicalField::MargMrp), Some(FieldValue::Number(1234.5)));
    assert_eq!(
        first.fields.get(CanonicalField::Exp).map(|v| v.to_string()),
        Some("01-05-27".to_string())
    );

    let second = &outcome.records[1];
    assert_eq!(second.fields.get(CanonicalField::CurrentStock), Some(FieldValue::Integer(12)));
    assert_eq!(second.fields.get(CanonicalField::MargMrp), Some(FieldValue::Text("N.A.".into())));
    assert_eq!(
        second.fields.get(CanonicalField::Exp).map(|v| v.to_string()),
        Some("01-05-27".to_string())
    );

    let events = reporter.events();
    assert!(events.iter().any(|e| matches!(e, ImportEvent::RowSkipped { row: 6, .. })));
    assert!(events.iter().any(|e| matches!(e, ImportEvent::ColumnsMapped { .. })));

    let json = render_records(&outcome.records, Schema::Marg, OutputFormat::JsonCompact, true).unwrap();
    let value: serde_json::Value = serde_json::from_slice(&json).unwrap();
    assert_eq!(value[0]["M.R.P."], 1234.5);
    assert_eq!(value[0]["EXP"], "01-05-27");
    assert_eq!(value[0]["_imported_at"], "2026-10-16T08:00:00+00:00");
    assert!(value[0].get("Batch No").is_none());

    std::fs::remove_file(&path).ok();
}

#[test]
fn imports_pmbi_workbook_with_code_identifiers() {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    for (col, label) in ["Drug Code", "Drug Name", "U.O.M", "Batch No.", "Expiry", "Qty", "MRP (Rs)"]
        .iter()
        .enumerate()
    {
        worksheet.write_string(0, col as u16, *label).unwrap();
    }
    worksheet.write_number(1, 0, 1001.0).unwrap();
    worksheet.write_string(1, 1, "Amoxicillin 250").unwrap();
    worksheet.write_string(1, 2, "10's").unwrap();
    worksheet.write_string(1, 3, "AMX-22").unwrap();
    worksheet.write_string(1, 4, "05/13/2027").unwrap();
    worksheet.write_number(1, 5, 25.0).unwrap();
    worksheet.write_number(1, 6, 45.5).unwrap();

    worksheet.write_string(2, 1, "Cetirizine 10").unwrap();
    worksheet.write_number(2, 5, 8.0).unwrap();

    let path = temp_path("pmbi.xlsx");
    workbook.save(&path).unwrap();

    let outcome = import_file(&path, Schema::Pmbi, &Config::default(), &NullReporter, Utc::now()).unwrap();
    assert_eq!(outcome.summary.processed, 2);

    let ids: Vec<&str> = outcome.records.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["1001", "Cetirizine 10"]);

    let first = &outcome.records[0];
    assert_eq!(first.fields.get(CanonicalField::Uom), Some(FieldValue::Text("10's".into())));
    assert_eq!(first.fields.get(CanonicalField::BatchNo), Some(FieldValue::Text("AMX-22".into())));
    assert_eq!(first.fields.get(CanonicalField::PmbiMrp), Some(FieldValue::Number(45.5)));
    assert_eq!(
        first.fields.get(CanonicalField::ExpiryDate).map(|v| v.to_string()),
        Some("13-05-27".to_string())
    );

    std::fs::remove_file(&path).ok();
}

#[test]
fn missing_file_is_an_error() {
    let result = import_file(
        &temp_path("does-not-exist.xlsx"),
        Schema::Marg,
        &Config::default(),
        &NullReporter,
        Utc::now(),
    );
    let err = result.unwrap_err();
    assert!(format!("{:#}", err).contains("Failed to open workbook"));
}
