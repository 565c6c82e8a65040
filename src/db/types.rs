//! Firebird type mappings.
//!
//! This module maps driver values onto [`CellValue`] and catalog type codes
//! onto the labels reported by `describe_table`.
//!
//! # Conversion table
//!
//! | Driver value            | Cell value                                  |
//! |-------------------------|---------------------------------------------|
//! | NULL                    | `Null`                                      |
//! | integer                 | `Integer`                                   |
//! | float / double          | `Float`, non-finite values become `Null`    |
//! | text                    | `Text`, CHAR padding kept                   |
//! | boolean                 | `Bool`                                      |
//! | date / time / timestamp | `Text`, ISO-8601 `YYYY-MM-DDTHH:MM:SS[.f]`  |
//! | binary                  | `Text`, UTF-8 when valid, otherwise base64  |
//!
//! The wire client coerces every temporal column to a timestamp: DATE values
//! carry a `00:00:00` time and TIME values carry the date the server filled
//! in, so only the time part of a TIME cell is meaningful.
//!
//! NUMERIC and DECIMAL arrive as doubles. INT128, DECFLOAT and the WITH TIME
//! ZONE types are only readable because each attachment binds them to their
//! legacy equivalents (see [`crate::db::backend::SESSION_BINDS`]); they then
//! arrive as integer, double and zone-less timestamp values.

use std::collections::HashSet;

use rsfbclient::SqlType;

use crate::error::{DbError, DbResult};
use crate::models::{CellValue, RowMap};

/// ISO-8601 layout used for temporal values.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

// =============================================================================
// Value Conversion
// =============================================================================

/// Convert a single driver value to a cell value.
pub fn cell_value(value: SqlType) -> CellValue {
    match value {
        SqlType::Null => CellValue::Null,
        SqlType::Integer(i) => CellValue::Integer(i),
        SqlType::Floating(f) => CellValue::float(f),
        SqlType::Text(s) => CellValue::Text(s),
        SqlType::Boolean(b) => CellValue::Bool(b),
        SqlType::Timestamp(ts) => CellValue::Text(ts.format(TIMESTAMP_FORMAT).to_string()),
        SqlType::Binary(bytes) => decode_binary_value(&bytes),
    }
}

/// Decode binary data to a text cell.
///
/// Valid UTF-8 is returned as-is, anything else as standard base64.
pub fn decode_binary_value(bytes: &[u8]) -> CellValue {
    use base64::{Engine as _, engine::general_purpose::STANDARD};

    match std::str::from_utf8(bytes) {
        Ok(s) => CellValue::Text(s.to_string()),
        Err(_) => CellValue::Text(STANDARD.encode(bytes)),
    }
}

// =============================================================================
// Rows
// =============================================================================

/// A fetched row before normalization: column names with raw driver values.
#[derive(Debug, Clone, Default)]
pub struct FbRow {
    columns: Vec<(String, SqlType)>,
}

impl FbRow {
    pub fn new(columns: Vec<(String, SqlType)>) -> Self {
        Self { columns }
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Normalize into an ordered row mapping.
    ///
    /// Repeated column names (`SELECT 1, 2 FROM RDB$DATABASE` yields two
    /// `CONSTANT` columns) get `_1`, `_2`, ... suffixes so no value is lost.
    pub fn into_row_map(self) -> RowMap {
        let mut seen = HashSet::with_capacity(self.columns.len());
        self.columns
            .into_iter()
            .map(|(name, value)| (unique_name(&mut seen, name), cell_value(value)))
            .collect()
    }

    fn column(&self, idx: usize) -> DbResult<&(String, SqlType)> {
        self.columns.get(idx).ok_or_else(|| {
            DbError::query(
                format!(
                    "Catalog row has {} columns, expected at least {}",
                    self.columns.len(),
                    idx + 1
                ),
                None,
                "Check that the server is a supported Firebird version",
            )
        })
    }

    /// Read a nullable text column, with CHAR padding removed.
    pub fn text(&self, idx: usize) -> DbResult<Option<String>> {
        match self.column(idx)? {
            (_, SqlType::Null) => Ok(None),
            (_, SqlType::Text(s)) => Ok(Some(s.trim_end().to_string())),
            (_, SqlType::Binary(bytes)) => Ok(Some(
                String::from_utf8_lossy(bytes).trim_end().to_string(),
            )),
            (name, other) => Err(unexpected_type(name, "text", other)),
        }
    }

    /// Read a nullable integer column.
    pub fn int(&self, idx: usize) -> DbResult<Option<i64>> {
        match self.column(idx)? {
            (_, SqlType::Null) => Ok(None),
            (_, SqlType::Integer(i)) => Ok(Some(*i)),
            (name, other) => Err(unexpected_type(name, "integer", other)),
        }
    }
}

impl From<rsfbclient::Row> for FbRow {
    fn from(row: rsfbclient::Row) -> Self {
        Self {
            columns: row.cols.into_iter().map(|c| (c.name, c.value)).collect(),
        }
    }
}

fn unique_name(seen: &mut HashSet<String>, name: String) -> String {
    if seen.insert(name.clone()) {
        return name;
    }
    let mut suffix = 1;
    loop {
        let candidate = format!("{name}_{suffix}");
        if seen.insert(candidate.clone()) {
            return candidate;
        }
        suffix += 1;
    }
}

fn unexpected_type(column: &str, expected: &str, actual: &SqlType) -> DbError {
    DbError::query(
        format!(
            "Unexpected value in catalog column {column}: expected {expected}, got {}",
            sql_type_name(actual)
        ),
        None,
        "Check that the server is a supported Firebird version",
    )
}

fn sql_type_name(value: &SqlType) -> &'static str {
    match value {
        SqlType::Null => "null",
        SqlType::Integer(_) => "integer",
        SqlType::Floating(_) => "float",
        SqlType::Text(_) => "text",
        SqlType::Boolean(_) => "boolean",
        SqlType::Timestamp(_) => "timestamp",
        SqlType::Binary(_) => "binary",
    }
}

// =============================================================================
// Catalog Type Labels
// =============================================================================

/// `RDB$FIELD_TYPE` codes for character types.
const CHARACTER_TYPES: [i64; 3] = [14, 37, 40];

/// `RDB$FIELD_TYPE` codes for types that may carry a NUMERIC/DECIMAL sub-type.
const SCALED_INTEGER_TYPES: [i64; 4] = [7, 8, 16, 26];

/// Map `RDB$FIELD_TYPE` / `RDB$FIELD_SUB_TYPE` to a type label.
pub fn type_label(field_type: i64, sub_type: Option<i64>) -> &'static str {
    if SCALED_INTEGER_TYPES.contains(&field_type) {
        match sub_type {
            Some(1) => return "NUMERIC",
            Some(2) => return "DECIMAL",
            _ => {}
        }
    }

    match field_type {
        7 => "SMALLINT",
        8 => "INTEGER",
        9 => "QUAD",
        10 => "FLOAT",
        11 => "D_FLOAT",
        12 => "DATE",
        13 => "TIME",
        14 => "CHAR",
        16 => "BIGINT",
        23 => "BOOLEAN",
        24 => "DECFLOAT(16)",
        25 => "DECFLOAT(34)",
        26 => "INT128",
        27 => "DOUBLE PRECISION",
        28 => "TIME WITH TIME ZONE",
        29 => "TIMESTAMP WITH TIME ZONE",
        35 => "TIMESTAMP",
        37 => "VARCHAR",
        40 => "CSTRING",
        261 if sub_type == Some(1) => "BLOB SUB_TYPE TEXT",
        261 => "BLOB",
        _ => "UNKNOWN",
    }
}

/// True for CHAR, VARCHAR and CSTRING.
pub fn is_character_type(field_type: i64) -> bool {
    CHARACTER_TYPES.contains(&field_type)
}

/// True when the type code and sub-type describe NUMERIC or DECIMAL.
pub fn is_exact_numeric(field_type: i64, sub_type: Option<i64>) -> bool {
    SCALED_INTEGER_TYPES.contains(&field_type) && matches!(sub_type, Some(1) | Some(2))
}

/// Strip the leading `DEFAULT` keyword from `RDB$DEFAULT_SOURCE`.
pub fn strip_default_keyword(source: &str) -> Option<String> {
    let trimmed = source.trim();
    let value = match trimmed.get(..7) {
        Some(prefix) if prefix.eq_ignore_ascii_case("DEFAULT") => trimmed[7..].trim_start(),
        _ => trimmed,
    };
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}
