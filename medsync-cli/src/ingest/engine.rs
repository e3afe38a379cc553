//! Sheet import: header detection, mapping and record assembly

use anyhow::Result;
use chrono::{DateTime, Utc};

use crate::config::Config;
use crate::ingest::assemble::{RecordAssembler, RowOutcome};
use crate::ingest::coerce::ValueCoercer;
use crate::ingest::header::{HeaderDetection, HeaderLocator};
use crate::ingest::mapping::{FieldMapper, MapOutcome};
use crate::ingest::report::{ImportEvent, ImportReporter, ImportSummary};
use crate::ingest::types::{RawGrid, Record, Schema, Sheet};

/// Everything produced by importing one sheet
#[derive(Debug, Clone)]
pub struct ImportOutcome {
    pub schema: Schema,
    pub sheet_name: String,
    pub header: HeaderDetection,
    pub headers: Vec<String>,
    /// Mapping outcome per header, in column order
    pub columns: Vec<MapOutcome>,
    pub records: Vec<Record>,
    pub summary: ImportSummary,
}

/// Imports sheets for one schema.
///
/// Holds no mutable state, so one engine can process any number of sheets.
pub struct ImportEngine<'a> {
    schema: Schema,
    config: &'a Config,
    mapper: FieldMapper,
    assembler: RecordAssembler,
    reporter: &'a dyn ImportReporter,
    imported_at: DateTime<Utc>,
}

impl<'a> ImportEngine<'a> {
    pub fn new(schema: Schema, config: &'a Config, reporter: &'a dyn ImportReporter) -> Self {
        Self {
            schema,
            config,
            mapper: FieldMapper::with_aliases(&config.aliases),
            assembler: RecordAssembler::new(
                schema,
                ValueCoercer::new(config.values.numeric_fallback),
                config.identifier,
            ),
            reporter,
            imported_at: Utc::now(),
        }
    }

    /// Stamp records with a fixed import time instead of the engine's creation time
    pub fn with_imported_at(mut self, imported_at: DateTime<Utc>) -> Self {
        self.imported_at = imported_at;
        self
    }

    pub fn schema(&self) -> Schema {
        self.schema
    }

    pub fn mapper(&self) -> &FieldMapper {
        &self.mapper
    }

    /// Find the header row of a grid
    pub fn detect_header(&self, grid: &RawGrid) -> HeaderDetection {
        HeaderLocator::new(self.schema.header_keywords())
            .with_scan_rows(self.config.header.scan_rows)
            .with_strategy(self.config.header.strategy)
            .with_min_keyword_matches(self.config.header.min_keyword_matches)
            .locate(&grid.rows)
    }

    /// Import a raw grid. Fails only when the grid holds no data at all.
    pub fn process_grid(&self, grid: &RawGrid) -> Result<ImportOutcome> {
        if grid.is_empty() {
            anyhow::bail!("Sheet '{}' contains no data", grid.sheet_name);
        }

        let header = self.detect_header(grid);
        self.reporter.report(ImportEvent::HeaderDetected {
            schema: self.schema,
            detection: header,
        });

        let sheet = Sheet::from_grid(grid, header.row);
        let columns = self.mapper.plan(&sheet.headers, self.schema);
        self.reporter.report(ImportEvent::ColumnsMapped {
            schema: self.schema,
            columns: sheet
                .headers
                .iter()
                .cloned()
                .zip(columns.iter().copied())
                .collect(),
        });

        let (records, summary) = self.process_rows(&sheet, &columns);
        self.reporter.report(ImportEvent::Finished {
            schema: self.schema,
            summary,
        });

        Ok(ImportOutcome {
            schema: self.schema,
            sheet_name: grid.sheet_name.clone(),
            header,
            headers: sheet.headers,
            columns,
            records,
            summary,
        })
    }

    /// Assemble every data row of a header-resolved sheet
    pub fn process_sheet(&self, sheet: &Sheet) -> (Vec<Record>, ImportSummary) {
        let columns = self.mapper.plan(&sheet.headers, self.schema);
        self.process_rows(sheet, &columns)
    }

    fn process_rows(&self, sheet: &Sheet, columns: &[MapOutcome]) -> (Vec<Record>, ImportSummary) {
        let mut records = Vec::new();
        let mut summary = ImportSummary::default();

        for row in &sheet.rows {
            match self.assembler.assemble(&sheet.headers, columns, &row.cells) {
                Ok(RowOutcome::Assembled(assembled)) => {
                    for issue in assembled.issues {
                        self.reporter.report(ImportEvent::CellIssue {
                            row: row.number,
                            issue,
                        });
                    }
                    records.push(Record {
                        id: assembled.id,
                        fields: assembled.fields,
                        imported_at: self.imported_at,
                        source_row: row.number,
                    });
                    summary.processed += 1;
                }
                Ok(RowOutcome::Skipped { summary: row_summary }) => {
                    self.reporter.report(ImportEvent::RowSkipped {
                        row: row.number,
                        summary: row_summary,
                    });
                    summary.skipped += 1;
                }
                Err(e) => {
                    let base_value = self
                        .assembler
                        .base_column(&sheet.headers, columns, &row.cells)
                        .map(|col| row.cells[col].to_string())
                        .unwrap_or_default();
                    self.reporter.report(ImportEvent::RowFailed {
                        row: row.number,
                        base_value,
                        reason: e.to_string(),
                    });
                    summary.failed += 1;
                }
            }
        }

        (records, summary)
    }
}
