//! Import progress reporting
//!
//! The engine never writes to a global log sink. Callers pass an
//! [`ImportReporter`] and decide where events go.

use std::sync::Mutex;

use crate::ingest::assemble::CellIssue;
use crate::ingest::header::HeaderDetection;
use crate::ingest::mapping::MapOutcome;
use crate::ingest::types::Schema;

/// Counters for one imported sheet
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct ImportSummary {
    pub processed: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl std::fmt::Display for ImportSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} processed, {} skipped, {} failed",
            self.processed, self.skipped, self.failed
        )
    }
}

/// Something worth telling the operator about during an import
#[derive(Debug, Clone, PartialEq)]
pub enum ImportEvent {
    HeaderDetected {
        schema: Schema,
        detection: HeaderDetection,
    },
    /// One entry per column of the detected header row
    ColumnsMapped {
        schema: Schema,
        columns: Vec<(String, MapOutcome)>,
    },
    RowSkipped {
        row: usize,
        summary: String,
    },
    RowFailed {
        row: usize,
        base_value: String,
        reason: String,
    },
    CellIssue {
        row: usize,
        issue: CellIssue,
    },
    Finished {
        schema: Schema,
        summary: ImportSummary,
    },
}

/// Receives import events
pub trait ImportReporter: Send + Sync {
    fn report(&self, event: ImportEvent);
}

/// Forwards events to the `log` facade
#[derive(Debug, Default, Clone, Copy)]
pub struct LogReporter;

impl ImportReporter for LogReporter {
    fn report(&self, event: ImportEvent) {
        match event {
            ImportEvent::HeaderDetected { schema, detection } => {
                log::info!("{}: header {}", schema, detection);
            }
            ImportEvent::ColumnsMapped { schema, columns } => {
                for (label, outcome) in columns {
                    match outcome {
                        MapOutcome::Mapped(m) => log::info!(
                            "{}: column '{}' -> '{}' {}",
                            schema,
                            label,
                            m.field.label(),
                            m.tier.label()
                        ),
                        MapOutcome::Disallowed(concept) => log::debug!(
                            "{}: column '{}' is {} which {} does not store",
                            schema,
                            label,
                            concept,
                            schema
                        ),
                        MapOutcome::Unmapped => {
                            log::debug!("{}: column '{}' ignored", schema, label)
                        }
                    }
                }
            }
            ImportEvent::RowSkipped { row, summary } => {
                log::warn!("Row {} skipped, no name found: {}", row, summary);
            }
            ImportEvent::RowFailed {
                row,
                base_value,
                reason,
            } => {
                log::error!("Row {} ('{}') failed: {}", row, base_value, reason);
            }
            ImportEvent::CellIssue { row, issue } => match issue {
                CellIssue::FellBack { .. } => log::debug!("Row {}: {}", row, issue),
                CellIssue::ErrorValue { .. } => log::warn!("Row {}: {}", row, issue),
            },
            ImportEvent::Finished { schema, summary } => {
                log::info!("{} import finished: {}", schema, summary);
            }
        }
    }
}

/// Discards every event
#[derive(Debug, Default, Clone, Copy)]
pub struct NullReporter;

impl ImportReporter for NullReporter {
    fn report(&self, _event: ImportEvent) {}
}

/// Keeps every event in memory, in arrival order
#[derive(Debug, Default)]
pub struct CollectingReporter {
    events: Mutex<Vec<ImportEvent>>,
}

impl CollectingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<ImportEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }
}

impl ImportReporter for CollectingReporter {
    fn report(&self, event: ImportEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}
