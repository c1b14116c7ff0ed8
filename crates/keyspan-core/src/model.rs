use crate::{MAX_INDEX_FIELDS, error::ScanError, value::Row, value::Value};
use std::sync::Arc;

///
/// IndexField
///
/// One indexed column: its name (diagnostics) and its position in the table
/// row tuple (key extraction).
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct IndexField {
    pub name: String,
    pub position: usize,
}

impl IndexField {
    #[must_use]
    pub fn new(name: impl Into<String>, position: usize) -> Self {
        Self {
            name: name.into(),
            position,
        }
    }
}

///
/// IndexModel
///
/// Static description of one sorted index: which table it belongs to and the
/// ordered column list forming its composite key. Shared immutably between
/// the index and every scan invocation against it.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct IndexModel {
    pub name: String,
    pub table: String,
    pub fields: Vec<IndexField>,
}

impl IndexModel {
    /// Build an index model, enforcing the composite-width cap.
    pub fn try_new(
        name: impl Into<String>,
        table: impl Into<String>,
        fields: Vec<IndexField>,
    ) -> Result<Arc<Self>, ScanError> {
        let name = name.into();

        if fields.is_empty() {
            return Err(ScanError::invalid_bound(format!(
                "index '{name}' has no indexed fields"
            )));
        }
        if fields.len() > MAX_INDEX_FIELDS {
            return Err(ScanError::invalid_bound(format!(
                "index '{name}' has {} fields (max {MAX_INDEX_FIELDS})",
                fields.len()
            )));
        }

        Ok(Arc::new(Self {
            name,
            table: table.into(),
            fields,
        }))
    }

    /// Number of key columns in this index.
    #[must_use]
    pub const fn key_width(&self) -> usize {
        self.fields.len()
    }

    /// Extract the composite key tuple for one table row.
    ///
    /// Missing positions are a row/model mismatch and surface immediately.
    pub fn key_of(&self, row: &Row) -> Result<Vec<Value>, ScanError> {
        self.fields
            .iter()
            .map(|field| {
                row.get(field.position).cloned().ok_or_else(|| {
                    ScanError::invalid_bound(format!(
                        "row of width {} is missing indexed column '{}' (position {})",
                        row.len(),
                        field.name,
                        field.position
                    ))
                })
            })
            .collect()
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::{IndexField, IndexModel};
    use crate::value::Value;

    fn two_column_model() -> std::sync::Arc<IndexModel> {
        IndexModel::try_new(
            "t_idx",
            "t",
            vec![IndexField::new("i1", 0), IndexField::new("i2", 1)],
        )
        .expect("model must build")
    }

    #[test]
    fn key_extraction_follows_field_positions() {
        let model = two_column_model();
        let row = vec![Value::Int(2), Value::Int(7), Value::Text("x".into())];

        let key = model.key_of(&row).expect("key must extract");
        assert_eq!(key, vec![Value::Int(2), Value::Int(7)]);
    }

    #[test]
    fn key_extraction_rejects_narrow_rows() {
        let model = two_column_model();
        let row = vec![Value::Int(2)];

        assert!(model.key_of(&row).is_err());
    }

    #[test]
    fn model_rejects_excess_composite_width() {
        let fields = (0..5).map(|i| IndexField::new(format!("c{i}"), i)).collect();

        assert!(IndexModel::try_new("wide_idx", "t", fields).is_err());
    }
}
