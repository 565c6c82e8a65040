//! Schema-related data models.
//!
//! This module defines types for Firebird catalog introspection.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A user table and its columns in field-position order.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct TableDescriptor {
    pub table_name: String,
    pub columns: Vec<ColumnDescriptor>,
}

impl TableDescriptor {
    /// Create a descriptor with no columns.
    pub fn new(table_name: impl Into<String>) -> Self {
        Self {
            table_name: table_name.into(),
            columns: Vec::new(),
        }
    }

    /// Append a column.
    pub fn with_column(mut self, column: ColumnDescriptor) -> Self {
        self.columns.push(column);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ColumnDescriptor {
    pub name: String,
    /// Type label, e.g. `VARCHAR`, `NUMERIC`, `BLOB SUB_TYPE TEXT`
    #[serde(rename = "type")]
    pub data_type: String,
    /// Characters for CHAR/VARCHAR/CSTRING
    #[serde(skip_serializing_if = "Option::is_none")]
    pub length: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub precision: Option<i64>,
    /// Digits after the decimal point (positive)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale: Option<i64>,
    pub nullable: bool,
    /// Default expression without the `DEFAULT` keyword
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
    #[serde(default)]
    pub is_primary_key: bool,
    #[serde(default)]
    pub is_foreign_key: bool,
    #[serde(default)]
    pub is_unique: bool,
    /// First constraint covering the column, e.g. `PRIMARY KEY`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub constraint_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub constraint_name: Option<String>,
}

impl ColumnDescriptor {
    /// Create a new column descriptor.
    pub fn new(name: impl Into<String>, data_type: impl Into<String>, nullable: bool) -> Self {
        Self {
            name: name.into(),
            data_type: data_type.into(),
            length: None,
            precision: None,
            scale: None,
            nullable,
            default: None,
            is_primary_key: false,
            is_foreign_key: false,
            is_unique: false,
            constraint_type: None,
            constraint_name: None,
        }
    }

    pub fn with_length(mut self, length: i64) -> Self {
        self.length = Some(length);
        self
    }

    /// Set precision and scale for exact numerics.
    pub fn with_precision(mut self, precision: i64, scale: i64) -> Self {
        self.precision = Some(precision);
        self.scale = Some(scale);
        self
    }

    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }

    pub fn with_primary_key(mut self, is_pk: bool) -> Self {
        self.is_primary_key = is_pk;
        self
    }

    pub fn with_foreign_key(mut self, is_fk: bool) -> Self {
        self.is_foreign_key = is_fk;
        self
    }

    pub fn with_unique(mut self, is_unique: bool) -> Self {
        self.is_unique = is_unique;
        self
    }

    /// Record the constraint that covers this column.
    pub fn with_constraint(
        mut self,
        constraint_type: impl Into<String>,
        constraint_name: impl Into<String>,
    ) -> Self {
        self.constraint_type = Some(constraint_type.into());
        self.constraint_name = Some(constraint_name.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_serializes_type_key() {
        let col = ColumnDescriptor::new("NAME", "VARCHAR", true).with_length(50);
        let json = serde_json::to_value(&col).unwrap();
        assert_eq!(json["type"], "VARCHAR");
        assert_eq!(json["length"], 50);
        assert!(json.get("data_type").is_none());
        assert!(json.get("precision").is_none());
        assert!(json.get("default").is_none());
        assert!(json.get("constraint_type").is_none());
        assert_eq!(json["is_unique"], false);
    }

    #[test]
    fn test_constraint_fields() {
        let col = ColumnDescriptor::new("EMAIL", "VARCHAR", false)
            .with_unique(true)
            .with_constraint("UNIQUE", "UQ_USERS_EMAIL");
        let json = serde_json::to_value(&col).unwrap();
        assert_eq!(json["is_unique"], true);
        assert_eq!(json["constraint_type"], "UNIQUE");
        assert_eq!(json["constraint_name"], "UQ_USERS_EMAIL");
    }

    #[test]
    fn test_numeric_column() {
        let col = ColumnDescriptor::new("PRICE", "NUMERIC", false)
            .with_precision(18, 2)
            .with_default("0");
        let json = serde_json::to_value(&col).unwrap();
        assert_eq!(json["precision"], 18);
        assert_eq!(json["scale"], 2);
        assert_eq!(json["default"], "0");
        assert_eq!(json["nullable"], false);
    }

    #[test]
    fn test_primary_key_columns() {
        let table = TableDescriptor::new("ORDERS")
            .with_column(ColumnDescriptor::new("ID", "INTEGER", false).with_primary_key(true))
            .with_column(ColumnDescriptor::new("CUSTOMER_ID", "INTEGER", true).with_foreign_key(true));
        assert!(table.columns[0].is_primary_key);
        assert!(table.columns[1].is_foreign_key);
    }

    #[test]
    fn test_empty_descriptor_serializes_empty_columns() {
        let json = serde_json::to_string(&TableDescriptor::new("NO_SUCH_TABLE")).unwrap();
        assert_eq!(json, r#"{"table_name":"NO_SUCH_TABLE","columns":[]}"#);
    }
}
