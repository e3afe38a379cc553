//! Document identifier derivation

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::ingest::types::Schema;

/// Default identifier length bound
pub const DEFAULT_MAX_ID_LENGTH: usize = 150;

/// Largest accepted identifier length bound
pub const MAX_ID_LENGTH_LIMIT: usize = 200;

static DISALLOWED_ID_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^A-Za-z0-9_.\- ]").unwrap());

/// Turn a base value into a storage-safe document identifier.
///
/// Trims, replaces `/` and `\` with `-`, truncates to `max_len` characters, then
/// replaces every character outside `[A-Za-z0-9_.\- ]` with `_`. Returns `None`
/// when nothing is left.
pub fn sanitize_document_id(raw: &str, max_len: usize) -> Option<String> {
    let replaced = raw.trim().replace(['/', '\\'], "-");
    let truncated: String = replaced.chars().take(max_len).collect();
    let sanitized = DISALLOWED_ID_CHARS.replace_all(&truncated, "_");

    if sanitized.is_empty() {
        None
    } else {
        Some(sanitized.into_owned())
    }
}

/// How identifiers are derived for a schema
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IdentifierPolicy {
    /// Maximum identifier length in characters
    pub max_length: usize,
    /// PMBI rows use the Drug Code as identifier source when present
    pub pmbi_prefer_code: bool,
}

impl Default for IdentifierPolicy {
    fn default() -> Self {
        Self {
            max_length: DEFAULT_MAX_ID_LENGTH,
            pmbi_prefer_code: true,
        }
    }
}

impl IdentifierPolicy {
    /// Derive the identifier for a row of `schema`.
    ///
    /// `code` is the row's code value, if any; it only takes part for PMBI with
    /// `pmbi_prefer_code` set. Falls back to the base value.
    pub fn derive(&self, schema: Schema, base_value: &str, code: Option<&str>) -> Option<String> {
        let from_code = match (schema, self.pmbi_prefer_code, code) {
            (Schema::Pmbi, true, Some(code)) => sanitize_document_id(code, self.max_length),
            _ => None,
        };
        from_code.or_else(|| sanitize_document_id(base_value, self.max_length))
    }
}
