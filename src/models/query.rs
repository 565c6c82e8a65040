//! Query-related data models.
//!
//! This module defines the normalized shapes returned by `execute_query`.

use serde::ser::{Serialize, SerializeMap, Serializer};

/// A single result cell.
///
/// Every driver value is reduced to one of these before it leaves the
/// database layer.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(untagged)]
pub enum CellValue {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
}

impl CellValue {
    /// Float cell, with NaN and infinities reduced to NULL.
    pub fn float(value: f64) -> Self {
        if value.is_finite() {
            Self::Float(value)
        } else {
            Self::Null
        }
    }
}

/// One result row as ordered column-name/value pairs.
///
/// Serializes as a JSON object whose keys follow result-set column order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RowMap {
    cells: Vec<(String, CellValue)>,
}

impl RowMap {
    /// Cell for the given column name.
    pub fn get(&self, column: &str) -> Option<&CellValue> {
        self.cells
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.cells.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl FromIterator<(String, CellValue)> for RowMap {
    fn from_iter<I: IntoIterator<Item = (String, CellValue)>>(iter: I) -> Self {
        Self {
            cells: iter.into_iter().collect(),
        }
    }
}

impl Serialize for RowMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.cells.len()))?;
        for (name, value) in &self.cells {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// Result of `execute_query`: rows for reads, an affected-row count for writes.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(untagged)]
pub enum QueryOutcome {
    Rows { rows: Vec<RowMap> },
    Affected { success: bool, rows_affected: u64 },
}

impl QueryOutcome {
    pub fn rows(rows: Vec<RowMap>) -> Self {
        Self::Rows { rows }
    }

    /// Outcome of a committed write.
    pub fn affected(rows_affected: u64) -> Self {
        Self::Affected {
            success: true,
            rows_affected,
        }
    }

    /// Number of rows returned or affected.
    pub fn row_count(&self) -> u64 {
        match self {
            Self::Rows { rows } => rows.len() as u64,
            Self::Affected { rows_affected, .. } => *rows_affected,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_cell_value_json_primitives() {
        assert_eq!(serde_json::to_value(CellValue::Null).unwrap(), json!(null));
        assert_eq!(serde_json::to_value(CellValue::Bool(true)).unwrap(), json!(true));
        assert_eq!(serde_json::to_value(CellValue::Integer(-7)).unwrap(), json!(-7));
        assert_eq!(serde_json::to_value(CellValue::Float(1.5)).unwrap(), json!(1.5));
        assert_eq!(serde_json::to_value(CellValue::Text("abc".to_string())).unwrap(), json!("abc"));
    }

    #[test]
    fn test_non_finite_float_is_null() {
        assert_eq!(CellValue::float(f64::NAN), CellValue::Null);
        assert_eq!(CellValue::float(f64::INFINITY), CellValue::Null);
        assert_eq!(CellValue::float(2.25), CellValue::Float(2.25));
    }

    #[test]
    fn test_row_keeps_column_order() {
        let row: RowMap = [
            ("ZETA".to_string(), CellValue::Integer(1)),
            ("ALPHA".to_string(), CellValue::Integer(2)),
            ("MID".to_string(), CellValue::Null),
        ]
        .into_iter()
        .collect();
        let text = serde_json::to_string(&row).unwrap();
        assert_eq!(text, r#"{"ZETA":1,"ALPHA":2,"MID":null}"#);
        assert_eq!(row.columns().collect::<Vec<_>>(), vec!["ZETA", "ALPHA", "MID"]);
        assert_eq!(row.get("ALPHA"), Some(&CellValue::Integer(2)));
    }

    #[test]
    fn test_outcome_shapes() {
        let row: RowMap = std::iter::once(("CONSTANT".to_string(), CellValue::Integer(1))).collect();
        let read = serde_json::to_value(QueryOutcome::rows(vec![row])).unwrap();
        assert_eq!(read, json!({"rows": [{"CONSTANT": 1}]}));

        let write = serde_json::to_value(QueryOutcome::affected(3)).unwrap();
        assert_eq!(write, json!({"success": true, "rows_affected": 3}));
    }

    #[test]
    fn test_empty_rows_shape() {
        let value = serde_json::to_value(QueryOutcome::rows(Vec::new())).unwrap();
        assert_eq!(value, json!({"rows": []}));
        assert_eq!(QueryOutcome::rows(Vec::new()).row_count(), 0);
    }
}
