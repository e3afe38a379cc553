//! Value coercion: raw cells to typed field values

mod date;
mod number;

use serde::{Deserialize, Serialize};

pub use date::{parse_date, parse_date_text, parse_day_first};
pub use number::{parse_integer, parse_money};

use crate::ingest::types::{CanonicalField, FieldKind, FieldValue, RawCell};

/// What to store when a money or quantity cell does not parse as a number
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NumericFallback {
    /// Keep the cell's original value
    #[default]
    Original,
    /// Store zero
    Zero,
}

impl std::fmt::Display for NumericFallback {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NumericFallback::Original => write!(f, "original"),
            NumericFallback::Zero => write!(f, "zero"),
        }
    }
}

/// Result of coercing one cell
#[derive(Debug, Clone, PartialEq)]
pub struct Coercion {
    pub value: FieldValue,
    /// The cell did not parse as the field's type and a fallback was stored
    pub fell_back: bool,
}

impl Coercion {
    fn parsed(value: FieldValue) -> Self {
        Self {
            value,
            fell_back: false,
        }
    }

    fn fallback(value: FieldValue) -> Self {
        Self {
            value,
            fell_back: true,
        }
    }
}

/// Converts raw cells into the semantic type of their canonical field
#[derive(Debug, Clone, Copy, Default)]
pub struct ValueCoercer {
    fallback: NumericFallback,
}

impl ValueCoercer {
    pub fn new(fallback: NumericFallback) -> Self {
        Self { fallback }
    }

    pub fn numeric_fallback(&self) -> NumericFallback {
        self.fallback
    }

    /// Coerce a cell for `field`. Blank cells yield `None` (the field stays absent).
    pub fn coerce(&self, field: CanonicalField, cell: &RawCell) -> Option<Coercion> {
        if cell.is_blank() {
            return None;
        }

        let coercion = match field.kind() {
            FieldKind::Money => match parse_money(cell) {
                Some(n) => Coercion::parsed(FieldValue::Number(n)),
                None => self.numeric_fallback_value(cell, FieldValue::Number(0.0))?,
            },
            FieldKind::Integer => match parse_integer(cell) {
                Some(n) => Coercion::parsed(FieldValue::Integer(n)),
                None => self.numeric_fallback_value(cell, FieldValue::Integer(0))?,
            },
            FieldKind::Date => match parse_date(cell) {
                Some(d) => Coercion::parsed(FieldValue::Date(d)),
                None => Coercion::fallback(original_value(cell)?),
            },
            FieldKind::Text => {
                let text = cell.to_string();
                let text = text.trim();
                if text.is_empty() {
                    return None;
                }
                Coercion::parsed(FieldValue::Text(text.to_string()))
            }
        };

        Some(coercion)
    }

    fn numeric_fallback_value(&self, cell: &RawCell, zero: FieldValue) -> Option<Coercion> {
        match self.fallback {
            NumericFallback::Original => original_value(cell).map(Coercion::fallback),
            NumericFallback::Zero => Some(Coercion::fallback(zero)),
        }
    }
}

/// The untouched cell value, with surrounding whitespace trimmed from text
fn original_value(cell: &RawCell) -> Option<FieldValue> {
    match FieldValue::from_raw(cell)? {
        FieldValue::Text(s) => Some(FieldValue::Text(s.trim().to_string())),
        other => Some(other),
    }
}
