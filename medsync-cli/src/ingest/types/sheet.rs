//! Raw grid and header-resolved sheet

use super::RawCell;

/// Cells of the first worksheet, read with no header assumed
#[derive(Debug, Clone, Default)]
pub struct RawGrid {
    pub sheet_name: String,
    pub rows: Vec<Vec<RawCell>>,
}

impl RawGrid {
    pub fn new(sheet_name: impl Into<String>, rows: Vec<Vec<RawCell>>) -> Self {
        Self {
            sheet_name: sheet_name.into(),
            rows,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.iter().all(|row| row.iter().all(RawCell::is_blank))
    }

    /// Widest row length
    pub fn width(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }
}

/// A data row below the header
#[derive(Debug, Clone, PartialEq)]
pub struct SheetRow {
    /// 1-based row number within the grid, for error messages
    pub number: usize,
    pub cells: Vec<RawCell>,
}

/// A sheet split into header labels and data rows
#[derive(Debug, Clone)]
pub struct Sheet {
    /// Index of the header row within the grid
    pub header_row: usize,
    /// Column labels, one per column; empty labels become `Unnamed: <index>`
    pub headers: Vec<String>,
    pub rows: Vec<SheetRow>,
}

impl Sheet {
    /// Split a grid at `header_row`. Fully blank data rows are dropped.
    pub fn from_grid(grid: &RawGrid, header_row: usize) -> Self {
        let width = grid.width();
        let header_cells = grid.rows.get(header_row).map(Vec::as_slice).unwrap_or(&[]);

        let headers = (0..width)
            .map(|col| {
                header_cells
                    .get(col)
                    .and_then(RawCell::to_text)
                    .map(|text| text.trim().to_string())
                    .filter(|text| !text.is_empty())
                    .unwrap_or_else(|| format!("Unnamed: {}", col))
            })
            .collect();

        let rows = grid
            .rows
            .iter()
            .enumerate()
            .skip(header_row + 1)
            .filter(|(_, cells)| !cells.iter().all(RawCell::is_blank))
            .map(|(idx, cells)| {
                let mut cells = cells.clone();
                cells.resize(width, RawCell::Empty);
                SheetRow {
                    number: idx + 1,
                    cells,
                }
            })
            .collect();

        Self {
            header_row,
            headers,
            rows,
        }
    }
}
