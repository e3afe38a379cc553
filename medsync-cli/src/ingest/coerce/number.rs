//! Money and quantity parsing

use crate::ingest::types::RawCell;

/// Remove thousands separators and surrounding whitespace
fn clean_numeric(s: &str) -> String {
    s.trim().replace(',', "")
}

/// Parse a decimal amount. `None` when the cell does not hold a finite number.
pub fn parse_money(cell: &RawCell) -> Option<f64> {
    let value = match cell {
        RawCell::Float(f) => *f,
        RawCell::Int(i) => *i as f64,
        RawCell::String(s) => {
            let cleaned = clean_numeric(s);
            if cleaned.is_empty() {
                return None;
            }
            cleaned.parse::<f64>().ok()?
        }
        _ => return None,
    };
    value.is_finite().then_some(value)
}

/// Parse a whole quantity, truncating any decimal part
pub fn parse_integer(cell: &RawCell) -> Option<i64> {
    match cell {
        RawCell::Int(i) => Some(*i),
        _ => {
            let value = parse_money(cell)?.trunc();
            // Out-of-range values would saturate silently
            (value.abs() < i64::MAX as f64).then_some(value as i64)
        }
    }
}
