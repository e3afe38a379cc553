//! Field mapping: rule table and schema-aware mapper

mod mapper;
mod rules;

pub use mapper::{FieldMapper, HeaderMapping, MapOutcome};
pub use rules::{BUILTIN_RULES, Concept, MappingRule, MatchTier, Matcher};
