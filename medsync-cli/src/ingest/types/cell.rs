//! Raw spreadsheet cell representation

use chrono::NaiveDateTime;

/// A single cell as read from a spreadsheet grid, before any interpretation
#[derive(Debug, Clone, PartialEq, Default)]
pub enum RawCell {
    /// Empty cell
    #[default]
    Empty,
    /// Text content (untrimmed)
    String(String),
    /// Floating point number
    Float(f64),
    /// Integer number
    Int(i64),
    /// Boolean
    Bool(bool),
    /// Native spreadsheet date/time
    DateTime(NaiveDateTime),
    /// Spreadsheet error value such as `#N/A` or `#REF!`
    Error(String),
}

impl RawCell {
    /// Check if this cell carries no usable value.
    ///
    /// Empty cells, whitespace-only strings, `NaN` floats and the literal text `nan`
    /// all count as blank. Error values are not blank.
    pub fn is_blank(&self) -> bool {
        match self {
            RawCell::Empty => true,
            RawCell::String(s) => {
                let trimmed = s.trim();
                trimmed.is_empty() || trimmed.eq_ignore_ascii_case("nan")
            }
            RawCell::Float(f) => f.is_nan(),
            _ => false,
        }
    }

    /// Check if this is a spreadsheet error value
    pub fn is_error(&self) -> bool {
        matches!(self, RawCell::Error(_))
    }

    /// Check if this is a string containing at least one alphabetic character
    pub fn has_letters(&self) -> bool {
        match self {
            RawCell::String(s) => s.chars().any(char::is_alphabetic),
            _ => false,
        }
    }

    /// Render the cell as text, or `None` when blank
    pub fn to_text(&self) -> Option<String> {
        if self.is_blank() {
            None
        } else {
            Some(self.to_string())
        }
    }
}

impl std::fmt::Display for RawCell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RawCell::Empty => Ok(()),
            RawCell::String(s) => write!(f, "{}", s),
            RawCell::Float(fl) => {
                // Whole numbers render without a fractional part ("1234", not "1234.0")
                if fl.is_finite() && fl.fract() == 0.0 && fl.abs() < i64::MAX as f64 {
                    write!(f, "{}", *fl as i64)
                } else {
                    write!(f, "{}", fl)
                }
            }
            RawCell::Int(i) => write!(f, "{}", i),
            RawCell::Bool(b) => write!(f, "{}", b),
            RawCell::DateTime(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S")),
            RawCell::Error(e) => write!(f, "{}", e),
        }
    }
}

impl From<&str> for RawCell {
    fn from(s: &str) -> Self {
        RawCell::String(s.to_string())
    }
}

impl From<String> for RawCell {
    fn from(s: String) -> Self {
        RawCell::String(s)
    }
}

impl From<f64> for RawCell {
    fn from(f: f64) -> Self {
        RawCell::Float(f)
    }
}

impl From<i64> for RawCell {
    fn from(i: i64) -> Self {
        RawCell::Int(i)
    }
}

impl From<NaiveDateTime> for RawCell {
    fn from(dt: NaiveDateTime) -> Self {
        RawCell::DateTime(dt)
    }
}
