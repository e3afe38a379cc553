//! Row to record assembly

use crate::ingest::coerce::ValueCoercer;
use crate::ingest::header::normalize_header;
use crate::ingest::identifier::IdentifierPolicy;
use crate::ingest::mapping::MapOutcome;
use crate::ingest::types::{CanonicalField, RawCell, RecordDraft, RecordFields, Schema};

/// Number of `header:value` pairs shown in a row summary
const SUMMARY_PAIRS: usize = 4;

/// Characters kept from each value in a row summary
const SUMMARY_VALUE_CHARS: usize = 18;

/// Row-level hard failures
#[derive(Debug, Clone, PartialEq)]
pub enum AssembleError {
    /// The base value cell holds a spreadsheet error such as `#N/A`
    ErrorValue { header: String, value: String },
    /// Sanitizing the base value left nothing usable as an identifier
    EmptyIdentifier { base_value: String },
    /// The mapping plan does not cover the row's columns
    ColumnMismatch { expected: usize, found: usize },
}

impl std::fmt::Display for AssembleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AssembleError::ErrorValue { header, value } => {
                write!(f, "column '{}' holds spreadsheet error {}", header, value)
            }
            AssembleError::EmptyIdentifier { base_value } => {
                write!(f, "no usable identifier in '{}'", base_value)
            }
            AssembleError::ColumnMismatch { expected, found } => {
                write!(f, "expected {} columns, found {}", expected, found)
            }
        }
    }
}

impl std::error::Error for AssembleError {}

/// A cell that did not end up stored as its field's type
#[derive(Debug, Clone, PartialEq)]
pub enum CellIssue {
    /// Coercion failed; the fallback value was stored
    FellBack { field: CanonicalField, raw: String },
    /// Spreadsheet error value; the field was left absent
    ErrorValue { field: CanonicalField, raw: String },
}

impl std::fmt::Display for CellIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CellIssue::FellBack { field, raw } => {
                write!(f, "'{}' value '{}' kept as fallback", field.label(), raw)
            }
            CellIssue::ErrorValue { field, raw } => {
                write!(f, "'{}' holds spreadsheet error {}, left empty", field.label(), raw)
            }
        }
    }
}

/// A successfully assembled row
#[derive(Debug, Clone, PartialEq)]
pub struct AssembledRow {
    pub id: String,
    pub base_value: String,
    pub fields: RecordFields,
    pub issues: Vec<CellIssue>,
}

/// Result of assembling one row
#[derive(Debug, Clone, PartialEq)]
pub enum RowOutcome {
    Assembled(AssembledRow),
    /// No base value in the row
    Skipped { summary: String },
}

/// Builds schema records from header-mapped rows
#[derive(Debug, Clone)]
pub struct RecordAssembler {
    schema: Schema,
    coercer: ValueCoercer,
    ids: IdentifierPolicy,
}

impl RecordAssembler {
    pub fn new(schema: Schema, coercer: ValueCoercer, ids: IdentifierPolicy) -> Self {
        Self {
            schema,
            coercer,
            ids,
        }
    }

    pub fn schema(&self) -> Schema {
        self.schema
    }

    /// Column holding the row's base value.
    ///
    /// Name columns come first, see [`find_base_value`]. A PMBI row without a
    /// usable name falls back to its Drug Code column while codes are preferred
    /// for identifiers.
    pub fn base_column(
        &self,
        headers: &[String],
        plan: &[MapOutcome],
        cells: &[RawCell],
    ) -> Option<usize> {
        find_base_value(self.schema, headers, cells).or_else(|| {
            if self.schema != Schema::Pmbi || !self.ids.pmbi_prefer_code {
                return None;
            }
            plan.iter().zip(cells).position(|(outcome, cell)| {
                outcome
                    .mapping()
                    .is_some_and(|m| m.field == CanonicalField::DrugCode)
                    && !cell.is_blank()
            })
        })
    }

    /// Assemble one row. `plan` holds the mapping outcome of each header, in column order.
    pub fn assemble(
        &self,
        headers: &[String],
        plan: &[MapOutcome],
        cells: &[RawCell],
    ) -> Result<RowOutcome, AssembleError> {
        if plan.len() != headers.len() || cells.len() < headers.len() {
            return Err(AssembleError::ColumnMismatch {
                expected: headers.len(),
                found: cells.len().min(plan.len()),
            });
        }

        let Some(base_col) = self.base_column(headers, plan, cells) else {
            return Ok(RowOutcome::Skipped {
                summary: row_summary(headers, cells),
            });
        };

        let base_cell = &cells[base_col];
        if base_cell.is_error() {
            return Err(AssembleError::ErrorValue {
                header: headers[base_col].clone(),
                value: base_cell.to_string(),
            });
        }
        let base_value = base_cell.to_string().trim().to_string();

        let mut draft = RecordDraft::new(self.schema);
        let mut issues = Vec::new();

        for (outcome, cell) in plan.iter().zip(cells) {
            let Some(mapping) = outcome.mapping() else {
                continue;
            };

            if let RawCell::Error(raw) = cell {
                issues.push(CellIssue::ErrorValue {
                    field: mapping.field,
                    raw: raw.clone(),
                });
                continue;
            }

            // Blank cells never overwrite an earlier value
            let Some(coercion) = self.coercer.coerce(mapping.field, cell) else {
                continue;
            };
            if coercion.fell_back {
                issues.push(CellIssue::FellBack {
                    field: mapping.field,
                    raw: cell.to_string(),
                });
            }
            draft.set(mapping.field, coercion.value);
        }

        let fields = draft.finish(&base_value);

        let code = fields
            .get(CanonicalField::DrugCode)
            .map(|value| value.to_string());
        let id = self
            .ids
            .derive(self.schema, &base_value, code.as_deref())
            .ok_or_else(|| AssembleError::EmptyIdentifier {
                base_value: base_value.clone(),
            })?;

        Ok(RowOutcome::Assembled(AssembledRow {
            id,
            base_value,
            fields,
            issues,
        }))
    }
}

/// Find the column holding the row's base value.
///
/// Tried in order: exact header match against the schema's candidates (candidate
/// order), normalized header match (column order), then any header whose key
/// contains `name` together with `product` or `drug`. Blank cells never qualify.
pub fn find_base_value(schema: Schema, headers: &[String], cells: &[RawCell]) -> Option<usize> {
    let usable = |col: &usize| cells.get(*col).is_some_and(|cell| !cell.is_blank());
    let candidates = schema.base_candidates();

    let exact = candidates.iter().find_map(|candidate| {
        headers
            .iter()
            .position(|header| header == candidate)
            .filter(usable)
    });
    if exact.is_some() {
        return exact;
    }

    let normalized: Vec<String> = candidates.iter().map(|c| normalize_header(c)).collect();
    let keys: Vec<String> = headers.iter().map(|h| normalize_header(h)).collect();

    let by_key = (0..keys.len())
        .filter(usable)
        .find(|col| normalized.contains(&keys[*col]));
    if by_key.is_some() {
        return by_key;
    }

    (0..keys.len()).filter(usable).find(|col| {
        let key = &keys[*col];
        key.contains("name") && (key.contains("product") || key.contains("drug"))
    })
}

/// Short `header:value | header:value` summary of a row's first columns
pub fn row_summary(headers: &[String], cells: &[RawCell]) -> String {
    headers
        .iter()
        .zip(cells)
        .take(SUMMARY_PAIRS)
        .map(|(header, cell)| {
            let value: String = cell.to_string().chars().take(SUMMARY_VALUE_CHARS).collect();
            format!("{}:{}", header, value)
        })
        .collect::<Vec<_>>()
        .join(" | ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::coerce::NumericFallback;
    use crate::ingest::mapping::FieldMapper;
    use crate::ingest::types::{FieldValue, MargRecord};
    use chrono::NaiveDate;

    fn headers(labels: &[&str]) -> Vec<String> {
        labels.iter().map(|s| s.to_string()).collect()
    }

    fn assemble(schema: Schema, labels: &[&str], cells: Vec<RawCell>) -> RowOutcome {
        let headers = headers(labels);
        let plan = FieldMapper::new().plan(&headers, schema);
        RecordAssembler::new(schema, ValueCoercer::default(), IdentifierPolicy::default())
            .assemble(&headers, &plan, &cells)
            .unwrap()
    }

    fn assembled(outcome: RowOutcome) -> AssembledRow {
        match outcome {
            RowOutcome::Assembled(row) => row,
            RowOutcome::Skipped { summary } => panic!("row skipped: {}", summary),
        }
    }

    #[test]
    fn test_marg_row() {
        let row = assembled(assemble(
            Schema::Marg,
            &["Product Name", "Current Stock", "M.R.P.", "EXP", "Batch No"],
            vec![
                "Paracetamol/500mg".into(),
                RawCell::Float(40.0),
                "1,234.50".into(),
                "01-05-27".into(),
                "B12".into(),
            ],
        ));

        assert_eq!(row.id, "Paracetamol-500mg");
        assert_eq!(
            row.fields,
            RecordFields::Marg(MargRecord {
                product_name: "Paracetamol/500mg".into(),
                current_stock: Some(FieldValue::Integer(40)),
                mrp: Some(FieldValue::Number(1234.5)),
                exp: Some(FieldValue::Date(NaiveDate::from_ymd_opt(2027, 5, 1).unwrap())),
            })
        );
        assert!(row.issues.is_empty());
    }

    #[test]
    fn test_pmbi_prefers_drug_code_for_id() {
        let row = assembled(assemble(
            Schema::Pmbi,
            &["Drug Code", "Drug Name", "Qty", "MRP"],
            vec![RawCell::Float(1001.0), "Amoxicillin 250".into(), "12".into(), "abc".into()],
        ));
        assert_eq!(row.id, "1001");
        assert_eq!(row.fields.name(), "Amoxicillin 250");
        assert_eq!(
            row.fields.get(CanonicalField::PmbiMrp),
            Some(FieldValue::Text("abc".into()))
        );
        assert_eq!(
            row.issues,
            vec![CellIssue::FellBack {
                field: CanonicalField::PmbiMrp,
                raw: "abc".into()
            }]
        );
    }

    #[test]
    fn test_pmbi_without_code_uses_name() {
        let row = assembled(assemble(
            Schema::Pmbi,
            &["Drug Code", "Drug Name"],
            vec![RawCell::Empty, "Amoxicillin 250".into()],
        ));
        assert_eq!(row.id, "Amoxicillin 250");
    }

    #[test]
    fn test_pmbi_code_only_row() {
        let row = assembled(assemble(
            Schema::Pmbi,
            &["Drug Code", "Qty", "MRP"],
            vec!["D-204".into(), RawCell::Int(6), RawCell::Float(18.0)],
        ));
        assert_eq!(row.id, "D-204");
        assert_eq!(row.base_value, "D-204");
        assert_eq!(row.fields.name(), "D-204");
        assert_eq!(row.fields.get(CanonicalField::Qty), Some(FieldValue::Integer(6)));
    }

    #[test]
    fn test_code_fallback_follows_policy() {
        let labels = headers(&["Drug Code", "Qty"]);
        let plan = FieldMapper::new().plan(&labels, Schema::Pmbi);
        let cells = vec!["D-204".into(), RawCell::Int(6)];
        let policy = IdentifierPolicy {
            pmbi_prefer_code: false,
            ..IdentifierPolicy::default()
        };
        let outcome = RecordAssembler::new(Schema::Pmbi, ValueCoercer::default(), policy)
            .assemble(&labels, &plan, &cells)
            .unwrap();
        assert!(matches!(outcome, RowOutcome::Skipped { .. }));

        // Names still win over the code column
        let labels = headers(&["Drug Code", "Drug Name"]);
        let plan = FieldMapper::new().plan(&labels, Schema::Pmbi);
        let assembler =
            RecordAssembler::new(Schema::Pmbi, ValueCoercer::default(), IdentifierPolicy::default());
        let cells = vec!["D-204".into(), "Cetirizine 10".into()];
        assert_eq!(assembler.base_column(&labels, &plan, &cells), Some(1));
        let cells = vec!["D-204".into(), RawCell::Empty];
        assert_eq!(assembler.base_column(&labels, &plan, &cells), Some(0));
    }

    #[test]
    fn test_row_without_name_is_skipped() {
        let outcome = assemble(
            Schema::Marg,
            &["Current Stock", "M.R.P."],
            vec![RawCell::Int(4), RawCell::Float(10.0)],
        );
        assert_eq!(
            outcome,
            RowOutcome::Skipped {
                summary: "Current Stock:4 | M.R.P.:10".into()
            }
        );
    }

    #[test]
    fn test_blank_name_is_skipped() {
        let outcome = assemble(
            Schema::Marg,
            &["Product Name", "Current Stock"],
            vec!["  ".into(), RawCell::Int(4)],
        );
        assert!(matches!(outcome, RowOutcome::Skipped { .. }));
    }

    #[test]
    fn test_primary_name_defaults_to_base_value() {
        // Not a known alias, found through the name+product rule
        let row = assembled(assemble(
            Schema::Marg,
            &["Name of Product", "Stock"],
            vec!["Cetirizine".into(), RawCell::Int(9)],
        ));
        assert_eq!(row.fields.name(), "Cetirizine");
        assert_eq!(row.fields.get(CanonicalField::CurrentStock), Some(FieldValue::Integer(9)));
    }

    #[test]
    fn test_blank_values_do_not_overwrite() {
        let row = assembled(assemble(
            Schema::Marg,
            &["Product Name", "MRP", "Rate"],
            vec!["Dolo".into(), RawCell::Float(30.5), RawCell::Empty],
        ));
        assert_eq!(row.fields.get(CanonicalField::MargMrp), Some(FieldValue::Number(30.5)));
    }

    #[test]
    fn test_error_base_value_fails_row() {
        let headers = headers(&["Product Name", "Stock"]);
        let plan = FieldMapper::new().plan(&headers, Schema::Marg);
        let assembler =
            RecordAssembler::new(Schema::Marg, ValueCoercer::default(), IdentifierPolicy::default());
        let err = assembler
            .assemble(&headers, &plan, &[RawCell::Error("#N/A".into()), RawCell::Int(1)])
            .unwrap_err();
        assert_eq!(
            err,
            AssembleError::ErrorValue {
                header: "Product Name".into(),
                value: "#N/A".into()
            }
        );
    }

    #[test]
    fn test_error_cells_elsewhere_are_left_empty() {
        let row = assembled(assemble(
            Schema::Marg,
            &["Product Name", "MRP"],
            vec!["Dolo".into(), RawCell::Error("#REF!".into())],
        ));
        assert_eq!(row.fields.get(CanonicalField::MargMrp), None);
        assert_eq!(row.issues.len(), 1);
    }

    #[test]
    fn test_zero_fallback_policy() {
        let headers = headers(&["Product Name", "Current Stock"]);
        let plan = FieldMapper::new().plan(&headers, Schema::Marg);
        let assembler = RecordAssembler::new(
            Schema::Marg,
            ValueCoercer::new(NumericFallback::Zero),
            IdentifierPolicy::default(),
        );
        let outcome = assembler
            .assemble(&headers, &plan, &["Dolo".into(), "many".into()])
            .unwrap();
        let RowOutcome::Assembled(row) = outcome else {
            panic!("row skipped")
        };
        assert_eq!(row.fields.get(CanonicalField::CurrentStock), Some(FieldValue::Integer(0)));
    }

    #[test]
    fn test_base_value_tiers() {
        let labels = headers(&["name", "Product Name"]);
        let cells = vec!["generic".into(), "specific".into()];
        // Exact candidates are tried in candidate order, so "Product Name" beats "name"
        assert_eq!(find_base_value(Schema::Marg, &labels, &cells), Some(1));

        let labels = headers(&["PRODUCT NAME", "Item"]);
        let cells = vec!["Dolo".into(), "x".into()];
        assert_eq!(find_base_value(Schema::Marg, &labels, &cells), Some(0));

        let labels = headers(&["Code", "Name of the Drug"]);
        let cells = vec!["1".into(), "Dolo".into()];
        assert_eq!(find_base_value(Schema::Pmbi, &labels, &cells), Some(1));

        let labels = headers(&["Product Name", "name"]);
        let cells = vec![RawCell::Empty, "fallback".into()];
        assert_eq!(find_base_value(Schema::Marg, &labels, &cells), Some(1));
    }

    #[test]
    fn test_row_summary_clips_values() {
        let labels = headers(&["A", "B", "C", "D", "E"]);
        let cells = vec![
            "a very long product description".into(),
            RawCell::Int(1),
            RawCell::Empty,
            "d".into(),
            "e".into(),
        ];
        assert_eq!(
            row_summary(&labels, &cells),
            "A:a very long produc | B:1 | C: | D:d"
        );
    }
}
