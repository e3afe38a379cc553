//! Canonical per-schema records

use chrono::{DateTime, Utc};

use super::{CanonicalField, FieldValue, Schema};

/// A MARG stock line
#[derive(Debug, Clone, PartialEq)]
pub struct MargRecord {
    pub product_name: String,
    pub current_stock: Option<FieldValue>,
    pub mrp: Option<FieldValue>,
    pub exp: Option<FieldValue>,
}

/// A PMBI stock line
#[derive(Debug, Clone, PartialEq)]
pub struct PmbiRecord {
    pub drug_code: Option<String>,
    pub drug_name: String,
    pub uom: Option<String>,
    pub batch_no: Option<String>,
    pub expiry_date: Option<FieldValue>,
    pub qty: Option<FieldValue>,
    pub mrp: Option<FieldValue>,
}

/// Record body, one closed variant per schema
#[derive(Debug, Clone, PartialEq)]
pub enum RecordFields {
    Marg(MargRecord),
    Pmbi(PmbiRecord),
}

impl RecordFields {
    pub fn schema(&self) -> Schema {
        match self {
            RecordFields::Marg(_) => Schema::Marg,
            RecordFields::Pmbi(_) => Schema::Pmbi,
        }
    }

    /// Get the value stored under a canonical field, if present
    pub fn get(&self, field: CanonicalField) -> Option<FieldValue> {
        let text = |s: &Option<String>| s.clone().map(FieldValue::Text);
        match (self, field) {
            (RecordFields::Marg(r), CanonicalField::ProductName) => {
                Some(FieldValue::Text(r.product_name.clone()))
            }
            (RecordFields::Marg(r), CanonicalField::CurrentStock) => r.current_stock.clone(),
            (RecordFields::Marg(r), CanonicalField::MargMrp) => r.mrp.clone(),
            (RecordFields::Marg(r), CanonicalField::Exp) => r.exp.clone(),
            (RecordFields::Pmbi(r), CanonicalField::DrugCode) => text(&r.drug_code),
            (RecordFields::Pmbi(r), CanonicalField::DrugName) => {
                Some(FieldValue::Text(r.drug_name.clone()))
            }
            (RecordFields::Pmbi(r), CanonicalField::Uom) => text(&r.uom),
            (RecordFields::Pmbi(r), CanonicalField::BatchNo) => text(&r.batch_no),
            (RecordFields::Pmbi(r), CanonicalField::ExpiryDate) => r.expiry_date.clone(),
            (RecordFields::Pmbi(r), CanonicalField::Qty) => r.qty.clone(),
            (RecordFields::Pmbi(r), CanonicalField::PmbiMrp) => r.mrp.clone(),
            _ => None,
        }
    }

    /// All present fields, in the schema's output order
    pub fn entries(&self) -> Vec<(CanonicalField, FieldValue)> {
        self.schema()
            .allowed_fields()
            .iter()
            .filter_map(|field| self.get(*field).map(|value| (*field, value)))
            .collect()
    }

    /// The row's human-readable name (Product Name or Drug Name)
    pub fn name(&self) -> &str {
        match self {
            RecordFields::Marg(r) => &r.product_name,
            RecordFields::Pmbi(r) => &r.drug_name,
        }
    }
}

/// One emitted record: typed fields, document identifier and import marker
#[derive(Debug, Clone)]
pub struct Record {
    /// Sanitized document identifier, used as the storage key
    pub id: String,
    pub fields: RecordFields,
    /// When the run that produced this record started; ignored by equality
    pub imported_at: DateTime<Utc>,
    /// 1-based sheet row the record was built from
    pub source_row: usize,
}

impl Record {
    pub fn schema(&self) -> Schema {
        self.fields.schema()
    }
}

impl PartialEq for Record {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && self.fields == other.fields && self.source_row == other.source_row
    }
}

/// Fields accumulated while assembling a row, before the name is guaranteed
#[derive(Debug, Clone)]
pub struct RecordDraft {
    schema: Schema,
    values: Vec<(CanonicalField, FieldValue)>,
}

impl RecordDraft {
    pub fn new(schema: Schema) -> Self {
        Self {
            schema,
            values: Vec::new(),
        }
    }

    /// Store a value; later values for the same field replace earlier ones.
    /// Fields outside the draft's schema are ignored and reported as `false`.
    pub fn set(&mut self, field: CanonicalField, value: FieldValue) -> bool {
        if !self.schema.allows(field) {
            return false;
        }
        if let Some(slot) = self.values.iter_mut().find(|(f, _)| *f == field) {
            slot.1 = value;
        } else {
            self.values.push((field, value));
        }
        true
    }

    pub fn get(&self, field: CanonicalField) -> Option<&FieldValue> {
        self.values.iter().find(|(f, _)| *f == field).map(|(_, v)| v)
    }

    pub fn contains(&self, field: CanonicalField) -> bool {
        self.get(field).is_some()
    }

    /// Finish the draft, using `fallback_name` when no column supplied the primary name
    pub fn finish(mut self, fallback_name: &str) -> RecordFields {
        let primary = self.schema.primary_name_field();
        if !self.contains(primary) {
            self.set(primary, FieldValue::Text(fallback_name.to_string()));
        }

        let mut take = |field: CanonicalField| -> Option<FieldValue> {
            self.values
                .iter()
                .position(|(f, _)| *f == field)
                .map(|idx| self.values.swap_remove(idx).1)
        };
        let as_text = |value: Option<FieldValue>| value.map(|v| v.to_string());

        match self.schema {
            Schema::Marg => RecordFields::Marg(MargRecord {
                product_name: as_text(take(CanonicalField::ProductName)).unwrap_or_default(),
                current_stock: take(CanonicalField::CurrentStock),
                mrp: take(CanonicalField::MargMrp),
                exp: take(CanonicalField::Exp),
            }),
            Schema::Pmbi => RecordFields::Pmbi(PmbiRecord {
                drug_code: as_text(take(CanonicalField::DrugCode)),
                drug_name: as_text(take(CanonicalField::DrugName)).unwrap_or_default(),
                uom: as_text(take(CanonicalField::Uom)),
                batch_no: as_text(take(CanonicalField::BatchNo)),
                expiry_date: take(CanonicalField::ExpiryDate),
                qty: take(CanonicalField::Qty),
                mrp: take(CanonicalField::PmbiMrp),
            }),
        }
    }
}
