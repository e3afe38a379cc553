//! Header row detection
//!
//! Real exports prepend title rows, blank rows or merged banners before the
//! actual header, so the header row is searched for instead of assumed.

use serde::{Deserialize, Serialize};

use super::normalize_cell;
use crate::ingest::types::RawCell;

/// Heuristic used to pick the header row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HeaderStrategy {
    /// Keyword match first, then textual density
    #[default]
    Auto,
    /// Rows containing enough of the schema's expected header tokens
    Keywords,
    /// Rows where enough cells are text with letters
    TextDensity,
}

impl std::fmt::Display for HeaderStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HeaderStrategy::Auto => write!(f, "auto"),
            HeaderStrategy::Keywords => write!(f, "keywords"),
            HeaderStrategy::TextDensity => write!(f, "text-density"),
        }
    }
}

/// How the header row was found
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectionMethod {
    /// Matched this many expected keywords
    Keywords { matched: usize },
    /// This many cells held text with letters
    TextDensity { text_cells: usize },
    /// Nothing qualified; row 0 assumed
    Fallback,
}

/// Result of header detection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderDetection {
    /// 0-based index into the grid
    pub row: usize,
    pub method: DetectionMethod,
}

impl std::fmt::Display for HeaderDetection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.method {
            DetectionMethod::Keywords { matched } => {
                write!(f, "row {} ({} keywords matched)", self.row, matched)
            }
            DetectionMethod::TextDensity { text_cells } => {
                write!(f, "row {} ({} text cells)", self.row, text_cells)
            }
            DetectionMethod::Fallback => write!(f, "row {} (fallback)", self.row),
        }
    }
}

/// Finds the most likely header row among the first rows of a grid
#[derive(Debug, Clone)]
pub struct HeaderLocator<'a> {
    pub scan_rows: usize,
    pub strategy: HeaderStrategy,
    pub keywords: &'a [&'a str],
    pub min_keyword_matches: usize,
}

impl<'a> HeaderLocator<'a> {
    pub fn new(keywords: &'a [&'a str]) -> Self {
        Self {
            scan_rows: 20,
            strategy: HeaderStrategy::Auto,
            keywords,
            min_keyword_matches: 2,
        }
    }

    pub fn with_scan_rows(mut self, scan_rows: usize) -> Self {
        self.scan_rows = scan_rows;
        self
    }

    pub fn with_strategy(mut self, strategy: HeaderStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_min_keyword_matches(mut self, min: usize) -> Self {
        self.min_keyword_matches = min;
        self
    }

    /// Pick the first qualifying row, scanning top to bottom; row 0 when none qualifies
    pub fn locate(&self, rows: &[Vec<RawCell>]) -> HeaderDetection {
        let window = &rows[..rows.len().min(self.scan_rows)];

        let found = match self.strategy {
            HeaderStrategy::Keywords => self.by_keywords(window),
            HeaderStrategy::TextDensity => by_text_density(window),
            HeaderStrategy::Auto => self
                .by_keywords(window)
                .or_else(|| by_text_density(window)),
        };

        found.unwrap_or(HeaderDetection {
            row: 0,
            method: DetectionMethod::Fallback,
        })
    }

    fn by_keywords(&self, window: &[Vec<RawCell>]) -> Option<HeaderDetection> {
        window.iter().enumerate().find_map(|(row, cells)| {
            let matched = keyword_matches(cells, self.keywords);
            (matched >= self.min_keyword_matches.max(1)).then_some(HeaderDetection {
                row,
                method: DetectionMethod::Keywords { matched },
            })
        })
    }
}

fn by_text_density(window: &[Vec<RawCell>]) -> Option<HeaderDetection> {
    window.iter().enumerate().find_map(|(row, cells)| {
        let text_cells = text_cell_count(cells);
        looks_like_header(cells).then_some(HeaderDetection {
            row,
            method: DetectionMethod::TextDensity { text_cells },
        })
    })
}

fn text_cell_count(cells: &[RawCell]) -> usize {
    cells.iter().filter(|c| c.has_letters()).count()
}

/// Textual-density test: at least a fifth of the cells (minimum one) are text with letters
pub fn looks_like_header(cells: &[RawCell]) -> bool {
    text_cell_count(cells) >= (cells.len() / 5).max(1)
}

/// Count how many expected keywords appear in the row's concatenated normalized cells
pub fn keyword_matches(cells: &[RawCell], keywords: &[&str]) -> usize {
    let joined: String = cells.iter().map(normalize_cell).collect();
    keywords.iter().filter(|k| joined.contains(*k)).count()
}
