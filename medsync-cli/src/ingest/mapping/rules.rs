//! Prioritized header rule table
//!
//! Rules are evaluated top to bottom and the first match wins, so exact aliases
//! sit above the looser substring rules. Rules only identify a [`Concept`]; the
//! schema-specific canonical field is chosen afterwards.

use serde::{Deserialize, Serialize};

use crate::ingest::types::{CanonicalField, Schema};

/// Abstract notion a header refers to, independent of the target schema
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Concept {
    ProductName,
    DrugName,
    DrugCode,
    Quantity,
    Money,
    Expiry,
    Batch,
    Uom,
}

impl Concept {
    /// Canonical field this concept takes in `schema`, if the schema has one
    pub fn resolve(&self, schema: Schema) -> Option<CanonicalField> {
        match (self, schema) {
            (Concept::ProductName, Schema::Marg) => Some(CanonicalField::ProductName),
            (Concept::Quantity, Schema::Marg) => Some(CanonicalField::CurrentStock),
            (Concept::Money, Schema::Marg) => Some(CanonicalField::MargMrp),
            (Concept::Expiry, Schema::Marg) => Some(CanonicalField::Exp),
            (Concept::DrugName, Schema::Pmbi) => Some(CanonicalField::DrugName),
            (Concept::DrugCode, Schema::Pmbi) => Some(CanonicalField::DrugCode),
            (Concept::Quantity, Schema::Pmbi) => Some(CanonicalField::Qty),
            (Concept::Money, Schema::Pmbi) => Some(CanonicalField::PmbiMrp),
            (Concept::Expiry, Schema::Pmbi) => Some(CanonicalField::ExpiryDate),
            (Concept::Batch, Schema::Pmbi) => Some(CanonicalField::BatchNo),
            (Concept::Uom, Schema::Pmbi) => Some(CanonicalField::Uom),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Concept::ProductName => "product_name",
            Concept::DrugName => "drug_name",
            Concept::DrugCode => "drug_code",
            Concept::Quantity => "quantity",
            Concept::Money => "money",
            Concept::Expiry => "expiry",
            Concept::Batch => "batch",
            Concept::Uom => "uom",
        }
    }
}

impl std::fmt::Display for Concept {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// How a header matched its rule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchTier {
    /// Configured alias, checked before the built-in table
    Custom,
    /// Exact alias from the built-in table
    Alias,
    /// Substring/prefix rule
    Substring,
}

impl MatchTier {
    pub fn label(&self) -> &'static str {
        match self {
            MatchTier::Custom => "[Custom]",
            MatchTier::Alias => "[Alias]",
            MatchTier::Substring => "[Substring]",
        }
    }
}

/// Predicate over a normalized header key
#[derive(Debug, Clone, Copy)]
pub enum Matcher {
    /// Key equals one of these aliases
    OneOf(&'static [&'static str]),
    /// Key contains this token
    Contains(&'static str),
    /// Key contains every one of these tokens
    ContainsAll(&'static [&'static str]),
    /// Key starts with this token
    StartsWith(&'static str),
}

impl Matcher {
    pub fn matches(&self, key: &str) -> bool {
        match self {
            Matcher::OneOf(aliases) => aliases.iter().any(|alias| *alias == key),
            Matcher::Contains(token) => key.contains(token),
            Matcher::ContainsAll(tokens) => tokens.iter().all(|t| key.contains(t)),
            Matcher::StartsWith(token) => key.starts_with(token),
        }
    }

    pub fn tier(&self) -> MatchTier {
        match self {
            Matcher::OneOf(_) => MatchTier::Alias,
            _ => MatchTier::Substring,
        }
    }
}

/// One (predicate, concept) pair of the rule table
#[derive(Debug, Clone, Copy)]
pub struct MappingRule {
    pub matcher: Matcher,
    pub concept: Concept,
}

const fn rule(matcher: Matcher, concept: Concept) -> MappingRule {
    MappingRule { matcher, concept }
}

/// Built-in rules in priority order
pub const BUILTIN_RULES: &[MappingRule] = &[
    // Exact aliases
    rule(
        Matcher::OneOf(&["productname", "product", "name", "itemname"]),
        Concept::ProductName,
    ),
    rule(
        Matcher::OneOf(&["currentstock", "stock", "quantity", "qty", "qnty", "closingstock"]),
        Concept::Quantity,
    ),
    rule(Matcher::OneOf(&["drugcode", "code"]), Concept::DrugCode),
    rule(Matcher::OneOf(&["drugname"]), Concept::DrugName),
    rule(Matcher::OneOf(&["batchno", "batch"]), Concept::Batch),
    rule(Matcher::OneOf(&["uom"]), Concept::Uom),
    rule(Matcher::OneOf(&["mrp", "price", "rate"]), Concept::Money),
    rule(Matcher::OneOf(&["exp", "bb"]), Concept::Expiry),
    // Substring rules
    rule(Matcher::Contains("mrp"), Concept::Money),
    rule(Matcher::StartsWith("exp"), Concept::Expiry),
    rule(Matcher::Contains("expiry"), Concept::Expiry),
    rule(Matcher::Contains("bestbefore"), Concept::Expiry),
    rule(Matcher::Contains("drugcode"), Concept::DrugCode),
    rule(Matcher::Contains("drugname"), Concept::DrugName),
    rule(Matcher::ContainsAll(&["drug", "name"]), Concept::DrugName),
    rule(Matcher::Contains("batch"), Concept::Batch),
];
