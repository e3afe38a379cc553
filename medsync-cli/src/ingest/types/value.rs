//! Typed field values produced by coercion

use chrono::NaiveDate;
use serde::{Serialize, Serializer};

use super::RawCell;

/// Output date format (`DD-MM-YY`)
pub const DATE_OUTPUT_FORMAT: &str = "%d-%m-%y";

/// A coerced value stored under a canonical field
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Decimal number (money)
    Number(f64),
    /// Whole number (stock, quantity)
    Integer(i64),
    /// Calendar date (expiry)
    Date(NaiveDate),
    /// Free text, or the original value when coercion fell back
    Text(String),
}

impl FieldValue {
    /// Wrap a raw cell without interpretation, used as the coercion fallback
    pub fn from_raw(cell: &RawCell) -> Option<Self> {
        match cell {
            RawCell::Empty => None,
            RawCell::Float(f) if f.is_nan() => None,
            RawCell::Float(f) => Some(FieldValue::Number(*f)),
            RawCell::Int(i) => Some(FieldValue::Integer(*i)),
            RawCell::DateTime(dt) => Some(FieldValue::Date(dt.date())),
            RawCell::String(s) => Some(FieldValue::Text(s.clone())),
            RawCell::Bool(_) | RawCell::Error(_) => Some(FieldValue::Text(cell.to_string())),
        }
    }

    /// Numeric view of the value, `None` for dates and text
    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Number(f) => Some(*f),
            FieldValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }
}

impl std::fmt::Display for FieldValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldValue::Number(n) => write!(f, "{}", n),
            FieldValue::Integer(i) => write!(f, "{}", i),
            FieldValue::Date(d) => write!(f, "{}", d.format(DATE_OUTPUT_FORMAT)),
            FieldValue::Text(s) => write!(f, "{}", s),
        }
    }
}

impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FieldValue::Number(n) => serializer.serialize_f64(*n),
            FieldValue::Integer(i) => serializer.serialize_i64(*i),
            FieldValue::Date(d) => serializer.collect_str(&d.format(DATE_OUTPUT_FORMAT)),
            FieldValue::Text(s) => serializer.serialize_str(s),
        }
    }
}
