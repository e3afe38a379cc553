//! Header label normalization

use crate::ingest::types::RawCell;

/// Canonicalize a column label into a comparison key.
///
/// Trims, lower-cases and drops every character that is not a letter or digit,
/// so `"M.R.P."`, `"mrp"` and `" MRP "` all become `"mrp"` and `"Product_Name"`
/// becomes `"productname"`.
pub fn normalize_header(label: &str) -> String {
    label
        .trim()
        .to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric())
        .collect()
}

/// Normalize a raw cell used as a label; blank cells yield an empty key
pub fn normalize_cell(cell: &RawCell) -> String {
    cell.to_text()
        .map(|text| normalize_header(&text))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_and_punctuation_insensitive() {
        assert_eq!(normalize_header("M.R.P."), "mrp");
        assert_eq!(normalize_header("mrp"), "mrp");
        assert_eq!(normalize_header(" MRP "), "mrp");
        assert_eq!(normalize_header("Product_Name"), "productname");
        assert_eq!(normalize_header("Batch No."), "batchno");
        assert_eq!(normalize_header("Exp. Date (dd/mm)"), "expdateddmm");
    }

    #[test]
    fn test_idempotent() {
        for label in ["Current Stock", "  Drug-Code ", "U.O.M", ""] {
            let once = normalize_header(label);
            assert_eq!(normalize_header(&once), once);
        }
    }

    #[test]
    fn test_blank_cells() {
        assert_eq!(normalize_cell(&RawCell::Empty), "");
        assert_eq!(normalize_cell(&RawCell::from("   ")), "");
        assert_eq!(normalize_cell(&RawCell::Float(2024.0)), "2024");
    }
}
