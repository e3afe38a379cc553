//! Inspect command handler

use std::process::ExitCode;

use anyhow::Result;
use colored::*;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use super::InspectCommands;
use crate::config::Config;
use crate::ingest::excel::read_grid;
use crate::ingest::mapping::MapOutcome;
use crate::ingest::types::{RawCell, RawGrid, Sheet};
use crate::ingest::{ImportEngine, NullReporter, Schema};

/// Widest a cell is printed, in terminal columns
const MAX_CELL_WIDTH: usize = 24;

/// Print raw rows and how each schema would read the sheet
pub fn handle_inspect_command(args: InspectCommands, config: &Config) -> Result<ExitCode> {
    let grid = read_grid(&args.path)?;

    println!(
        "{} {} (sheet '{}', {} rows)",
        "File:".bold(),
        args.path.display(),
        grid.sheet_name,
        grid.rows.len()
    );
    println!();

    for line in render_rows(&grid, args.rows) {
        println!("{}", line);
    }

    for schema in Schema::ALL {
        println!();
        let engine = ImportEngine::new(schema, config, &NullReporter);
        let detection = engine.detect_header(&grid);
        println!(
            "{} header {}",
            format!("{} ({})", schema.label(), schema.collection()).bold(),
            detection
        );

        let sheet = Sheet::from_grid(&grid, detection.row);
        let plan = engine.mapper().plan(&sheet.headers, schema);
        for (header, outcome) in sheet.headers.iter().zip(&plan) {
            println!("  {}", describe_mapping(header, outcome, schema));
        }
    }

    Ok(ExitCode::SUCCESS)
}

/// First `limit` rows as aligned text, prefixed with 1-based row numbers
fn render_rows(grid: &RawGrid, limit: usize) -> Vec<String> {
    let rows: Vec<Vec<String>> = grid
        .rows
        .iter()
        .take(limit)
        .map(|row| row.iter().map(|cell| clip(&display_cell(cell), MAX_CELL_WIDTH)).collect())
        .collect();

    let columns = rows.iter().map(Vec::len).max().unwrap_or(0);
    let widths: Vec<usize> = (0..columns)
        .map(|col| {
            rows.iter()
                .filter_map(|row| row.get(col))
                .map(|text| text.width())
                .max()
                .unwrap_or(0)
        })
        .collect();

    rows.iter()
        .enumerate()
        .map(|(idx, row)| {
            let cells: Vec<String> = row
                .iter()
                .zip(&widths)
                .map(|(text, width)| pad(text, *width))
                .collect();
            format!("{:>4} | {}", idx + 1, cells.join(" | ")).trim_end().to_string()
        })
        .collect()
}

fn display_cell(cell: &RawCell) -> String {
    match cell {
        RawCell::Error(e) => format!("!{}", e),
        other => other.to_string().replace(['\n', '\r', '\t'], " "),
    }
}

/// Cut `text` to at most `max` terminal columns, marking the cut with `…`
fn clip(text: &str, max: usize) -> String {
    if text.width() <= max {
        return text.to_string();
    }
    let mut clipped = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w + 1 > max {
            break;
        }
        clipped.push(c);
        used += w;
    }
    clipped.push('…');
    clipped
}

fn pad(text: &str, width: usize) -> String {
    let fill = width.saturating_sub(text.width());
    format!("{}{}", text, " ".repeat(fill))
}

fn describe_mapping(header: &str, outcome: &MapOutcome, schema: Schema) -> String {
    match outcome {
        MapOutcome::Mapped(m) => format!(
            "{} -> {} {}",
            header,
            m.field.label().green(),
            m.tier.label().dimmed()
        ),
        MapOutcome::Disallowed(concept) => format!(
            "{} -> {}",
            header,
            format!("({} not stored for {})", concept, schema.label()).yellow()
        ),
        MapOutcome::Unmapped => format!("{} -> {}", header, "(ignored)".dimmed()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clip_respects_display_width() {
        assert_eq!(clip("short", 24), "short");
        assert_eq!(clip("abcdefghij", 5), "abcd…");
        // Wide characters take two columns each
        assert_eq!(clip("薬薬薬薬", 5), "薬薬…");
    }

    #[test]
    fn test_render_rows_aligns_columns() {
        let grid = RawGrid::new(
            "Sheet1",
            vec![
                vec!["Product Name".into(), "Stock".into()],
                vec!["Dolo".into(), RawCell::Float(12.0)],
            ],
        );
        let lines = render_rows(&grid, 10);
        assert_eq!(lines[0], "   1 | Product Name | Stock");
        assert_eq!(lines[1], "   2 | Dolo         | 12");
    }

    #[test]
    fn test_render_rows_limit() {
        let grid = RawGrid::new("Sheet1", vec![vec!["a".into()]; 30]);
        assert_eq!(render_rows(&grid, 5).len(), 5);
    }
}
