//! Target schemas and their canonical fields

use std::str::FromStr;

/// One of the two supported stock report families
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Schema {
    /// MARG export, stored as `medicine-1`
    Marg,
    /// PMBI export, stored as `medicine-2`
    Pmbi,
}

/// Semantic type of a canonical field, drives value coercion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Money,
    Integer,
    Date,
    Text,
}

/// A fixed output field name that downstream storage expects verbatim
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CanonicalField {
    // MARG
    ProductName,
    CurrentStock,
    MargMrp,
    Exp,
    // PMBI
    DrugCode,
    DrugName,
    Uom,
    BatchNo,
    ExpiryDate,
    Qty,
    PmbiMrp,
}

const MARG_FIELDS: &[CanonicalField] = &[
    CanonicalField::ProductName,
    CanonicalField::CurrentStock,
    CanonicalField::MargMrp,
    CanonicalField::Exp,
];

const PMBI_FIELDS: &[CanonicalField] = &[
    CanonicalField::DrugCode,
    CanonicalField::DrugName,
    CanonicalField::Uom,
    CanonicalField::BatchNo,
    CanonicalField::ExpiryDate,
    CanonicalField::Qty,
    CanonicalField::PmbiMrp,
];

const MARG_BASE_CANDIDATES: &[&str] = &["Product Name", "ProductName", "product name", "Product", "name"];
const PMBI_BASE_CANDIDATES: &[&str] = &["Drug Name", "DrugName", "drug name", "Drug", "name"];

const MARG_KEYWORDS: &[&str] = &["productname", "currentstock", "mrp", "exp"];
const PMBI_KEYWORDS: &[&str] = &["drugname", "drugcode", "mrp", "expirydate", "qty"];

impl Schema {
    pub const ALL: [Schema; 2] = [Schema::Marg, Schema::Pmbi];

    /// Short label used in logs and CLI arguments
    pub fn label(&self) -> &'static str {
        match self {
            Schema::Marg => "MARG",
            Schema::Pmbi => "PMBI",
        }
    }

    /// Name of the collection the records of this schema belong to
    pub fn collection(&self) -> &'static str {
        match self {
            Schema::Marg => "medicine-1",
            Schema::Pmbi => "medicine-2",
        }
    }

    /// Canonical fields allowed in this schema's records, in output order
    pub fn allowed_fields(&self) -> &'static [CanonicalField] {
        match self {
            Schema::Marg => MARG_FIELDS,
            Schema::Pmbi => PMBI_FIELDS,
        }
    }

    pub fn allows(&self, field: CanonicalField) -> bool {
        field.schema() == *self
    }

    /// The field that always carries the row's human-readable name
    pub fn primary_name_field(&self) -> CanonicalField {
        match self {
            Schema::Marg => CanonicalField::ProductName,
            Schema::Pmbi => CanonicalField::DrugName,
        }
    }

    /// Header labels tried, in order, when looking for the row's base value
    pub fn base_candidates(&self) -> &'static [&'static str] {
        match self {
            Schema::Marg => MARG_BASE_CANDIDATES,
            Schema::Pmbi => PMBI_BASE_CANDIDATES,
        }
    }

    /// Normalized tokens expected somewhere in this schema's header row
    pub fn header_keywords(&self) -> &'static [&'static str] {
        match self {
            Schema::Marg => MARG_KEYWORDS,
            Schema::Pmbi => PMBI_KEYWORDS,
        }
    }
}

impl std::fmt::Display for Schema {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for Schema {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "marg" | "medicine-1" => Ok(Schema::Marg),
            "pmbi" | "medicine-2" => Ok(Schema::Pmbi),
            other => Err(format!("unknown schema '{}', expected 'marg' or 'pmbi'", other)),
        }
    }
}

impl CanonicalField {
    /// The verbatim field name used in output
    pub fn label(&self) -> &'static str {
        match self {
            CanonicalField::ProductName => "Product Name",
            CanonicalField::CurrentStock => "Current Stock",
            CanonicalField::MargMrp => "M.R.P.",
            CanonicalField::Exp => "EXP",
            CanonicalField::DrugCode => "Drug Code",
            CanonicalField::DrugName => "Drug Name",
            CanonicalField::Uom => "UOM",
            CanonicalField::BatchNo => "Batch No",
            CanonicalField::ExpiryDate => "Expiry Date",
            CanonicalField::Qty => "Qty",
            CanonicalField::PmbiMrp => "MRP",
        }
    }

    /// The schema this field belongs to
    pub fn schema(&self) -> Schema {
        match self {
            CanonicalField::ProductName
            | CanonicalField::CurrentStock
            | CanonicalField::MargMrp
            | CanonicalField::Exp => Schema::Marg,
            _ => Schema::Pmbi,
        }
    }

    pub fn kind(&self) -> FieldKind {
        match self {
            CanonicalField::MargMrp | CanonicalField::PmbiMrp => FieldKind::Money,
            CanonicalField::CurrentStock | CanonicalField::Qty => FieldKind::Integer,
            CanonicalField::Exp | CanonicalField::ExpiryDate => FieldKind::Date,
            _ => FieldKind::Text,
        }
    }
}

impl std::fmt::Display for CanonicalField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allowed_fields_belong_to_schema() {
        for schema in Schema::ALL {
            for field in schema.allowed_fields() {
                assert_eq!(field.schema(), schema);
                assert!(schema.allows(*field));
            }
        }
        assert!(!Schema::Marg.allows(CanonicalField::BatchNo));
        assert!(!Schema::Pmbi.allows(CanonicalField::MargMrp));
    }

    #[test]
    fn test_parse_schema() {
        assert_eq!("marg".parse::<Schema>(), Ok(Schema::Marg));
        assert_eq!(" PMBI ".parse::<Schema>(), Ok(Schema::Pmbi));
        assert_eq!("medicine-2".parse::<Schema>(), Ok(Schema::Pmbi));
        assert!("stock".parse::<Schema>().is_err());
    }

    #[test]
    fn test_field_labels_are_verbatim() {
        let marg: Vec<&str> = Schema::Marg.allowed_fields().iter().map(|f| f.label()).collect();
        assert_eq!(marg, vec!["Product Name", "Current Stock", "M.R.P.", "EXP"]);
        assert_eq!(CanonicalField::PmbiMrp.label(), "MRP");
        assert_eq!(CanonicalField::ExpiryDate.kind(), FieldKind::Date);
    }
}
