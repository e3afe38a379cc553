//! Expiry date parsing
//!
//! Explicit formats are tried first, in order, and the first success wins.
//! Day-first layouts always precede month-first ones, so `01/05/27` is 1 May 2027.
//! When no format matches, a looser day-first parse handles month names and
//! partial dates such as `May 2027`.

use chrono::{Datelike, NaiveDate, NaiveDateTime};

use crate::ingest::types::RawCell;

struct DateFormat {
    pattern: &'static str,
    /// `%Y` accepts short years, so 4-digit formats reject anything below 1000
    four_digit_year: bool,
    with_time: bool,
}

const fn date(pattern: &'static str, four_digit_year: bool) -> DateFormat {
    DateFormat {
        pattern,
        four_digit_year,
        with_time: false,
    }
}

const fn date_time(pattern: &'static str) -> DateFormat {
    DateFormat {
        pattern,
        four_digit_year: true,
        with_time: true,
    }
}

const DATE_FORMATS: &[DateFormat] = &[
    date("%d-%b-%y", false),
    date("%d-%b-%Y", true),
    date("%d/%m/%y", false),
    date("%d-%m-%y", false),
    date("%d.%m.%y", false),
    date("%d/%m/%Y", true),
    date("%d-%m-%Y", true),
    date("%d.%m.%Y", true),
    date("%Y-%m-%d", true),
    date("%Y/%m/%d", true),
    date("%m/%d/%y", false),
    date("%m/%d/%Y", true),
    date("%d%m%y", false),
    date("%d%m%Y", true),
    date_time("%Y-%m-%d %H:%M:%S"),
    date_time("%Y-%m-%dT%H:%M:%S"),
];

const MONTHS: [&str; 12] = [
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

impl DateFormat {
    fn parse(&self, s: &str) -> Option<NaiveDate> {
        let parsed = if self.with_time {
            NaiveDateTime::parse_from_str(s, self.pattern)
                .ok()
                .map(|dt| dt.date())
        } else {
            NaiveDate::parse_from_str(s, self.pattern).ok()
        }?;

        if self.four_digit_year && parsed.year() < 1000 {
            return None;
        }
        Some(parsed)
    }
}

/// Parse a date cell. Native spreadsheet dates pass through; text and numbers
/// go through the format list.
pub fn parse_date(cell: &RawCell) -> Option<NaiveDate> {
    match cell {
        RawCell::DateTime(dt) => Some(dt.date()),
        RawCell::String(s) => parse_date_text(s),
        RawCell::Float(_) | RawCell::Int(_) => parse_date_text(&cell.to_string()),
        _ => None,
    }
}

/// Parse date text with the ordered format list, then the day-first fallback
pub fn parse_date_text(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    DATE_FORMATS
        .iter()
        .find_map(|format| format.parse(s))
        .or_else(|| parse_day_first(s))
}

fn month_from_name(token: &str) -> Option<u32> {
    let token = token.to_lowercase();
    if token.len() < 3 {
        return None;
    }
    MONTHS
        .iter()
        .position(|name| name.starts_with(&token))
        .map(|idx| idx as u32 + 1)
}

/// Strip ordinal suffixes: "1st" -> "1"
fn strip_ordinal(token: &str) -> Option<&str> {
    let lower = token.to_ascii_lowercase();
    ["st", "nd", "rd", "th"]
        .iter()
        .find(|suffix| lower.ends_with(*suffix))
        .map(|suffix| &token[..token.len() - suffix.len()])
        .filter(|digits| !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()))
}

fn expand_year(token: &str) -> Option<i32> {
    let year: i32 = token.parse().ok()?;
    match token.len() {
        2 if year < 70 => Some(2000 + year),
        2 => Some(1900 + year),
        4 => Some(year),
        _ => None,
    }
}

fn ymd(year: i32, month: u32, day: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day)
        // Day-first reading failed; retry with day and month swapped
        .or_else(|| (day <= 12).then(|| NaiveDate::from_ymd_opt(year, day, month)).flatten())
}

/// General day-first parse, used when no explicit format matched
pub fn parse_day_first(s: &str) -> Option<NaiveDate> {
    // Ignore any time-of-day part
    let date_part: Vec<&str> = s
        .split_whitespace()
        .take_while(|chunk| !chunk.contains(':'))
        .collect();
    let date_part = date_part.join(" ");

    let mut month = None;
    let mut numbers: Vec<&str> = Vec::new();

    for token in date_part
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
    {
        if token.chars().all(|c| c.is_ascii_digit()) {
            numbers.push(token);
        } else if let Some(digits) = strip_ordinal(token) {
            numbers.push(digits);
        } else if let Some(m) = month_from_name(token) {
            if month.replace(m).is_some() {
                return None;
            }
        } else {
            return None;
        }
    }

    match (month, numbers.as_slice()) {
        (Some(m), [a, b]) => {
            let (day, year) = if a.len() == 4 { (b, a) } else { (a, b) };
            NaiveDate::from_ymd_opt(expand_year(year)?, m, day.parse().ok()?)
        }
        (Some(m), [year]) if year.len() == 4 => NaiveDate::from_ymd_opt(expand_year(year)?, m, 1),
        (None, [a, b, c]) => {
            if a.len() == 4 {
                ymd(expand_year(a)?, b.parse().ok()?, c.parse().ok()?)
            } else {
                ymd(expand_year(c)?, b.parse().ok()?, a.parse().ok()?)
            }
        }
        (None, [a, b]) => {
            let (month, year) = if a.len() == 4 { (b, a) } else { (a, b) };
            if year.len() != 4 {
                return None;
            }
            NaiveDate::from_ymd_opt(expand_year(year)?, month.parse().ok()?, 1)
        }
        _ => None,
    }
}
