//! Header to canonical field mapping

use std::collections::BTreeMap;

use super::rules::{BUILTIN_RULES, Concept, MatchTier};
use crate::ingest::header::normalize_header;
use crate::ingest::types::{CanonicalField, Schema};

/// A header resolved to a field of the active schema
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderMapping {
    pub field: CanonicalField,
    pub concept: Concept,
    pub tier: MatchTier,
}

/// Outcome of mapping one header against one schema
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapOutcome {
    Mapped(HeaderMapping),
    /// Recognized, but the concept has no field in the active schema
    Disallowed(Concept),
    Unmapped,
}

impl MapOutcome {
    pub fn mapping(&self) -> Option<HeaderMapping> {
        match self {
            MapOutcome::Mapped(m) => Some(*m),
            _ => None,
        }
    }
}

/// Maps normalized header keys to canonical fields through the rule table
#[derive(Debug, Clone, Default)]
pub struct FieldMapper {
    /// Extra exact aliases (normalized key -> concept), checked before built-in rules
    custom: Vec<(String, Concept)>,
}

impl FieldMapper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a mapper with extra aliases per concept; aliases are normalized here
    pub fn with_aliases(aliases: &BTreeMap<Concept, Vec<String>>) -> Self {
        let custom = aliases
            .iter()
            .flat_map(|(concept, labels)| {
                labels
                    .iter()
                    .map(|label| normalize_header(label))
                    .filter(|key| !key.is_empty())
                    .map(move |key| (key, *concept))
            })
            .collect();
        Self { custom }
    }

    /// Identify the concept of a normalized key, independent of any schema
    pub fn classify(&self, key: &str) -> Option<(Concept, MatchTier)> {
        if key.is_empty() {
            return None;
        }

        if let Some((_, concept)) = self.custom.iter().find(|(alias, _)| alias == key) {
            return Some((*concept, MatchTier::Custom));
        }

        BUILTIN_RULES
            .iter()
            .find(|rule| rule.matcher.matches(key))
            .map(|rule| (rule.concept, rule.matcher.tier()))
    }

    /// Map a normalized key for the active schema
    pub fn map_key(&self, key: &str, schema: Schema) -> MapOutcome {
        match self.classify(key) {
            Some((concept, tier)) => match concept.resolve(schema) {
                Some(field) if schema.allows(field) => MapOutcome::Mapped(HeaderMapping {
                    field,
                    concept,
                    tier,
                }),
                _ => MapOutcome::Disallowed(concept),
            },
            None => MapOutcome::Unmapped,
        }
    }

    /// Normalize a raw header label and map it
    pub fn map_header(&self, label: &str, schema: Schema) -> MapOutcome {
        self.map_key(&normalize_header(label), schema)
    }

    /// Map every header of a sheet once, in column order
    pub fn plan(&self, headers: &[String], schema: Schema) -> Vec<MapOutcome> {
        headers
            .iter()
            .map(|header| self.map_header(header, schema))
            .collect()
    }
}
