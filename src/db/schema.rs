//! Schema introspection module.
//!
//! This module reads table and column metadata from the Firebird system
//! catalog (`RDB$RELATIONS`, `RDB$RELATION_FIELDS`, `RDB$FIELDS`,
//! `RDB$RELATION_CONSTRAINTS`, `RDB$INDEX_SEGMENTS`). Nothing is cached: every
//! call runs the catalog queries again.

use rsfbclient::SqlType;
use tracing::{debug, info};

use crate::db::connection::ConnectionManager;
use crate::db::types::{self, FbRow};
use crate::error::{DbError, DbResult};
use crate::models::{ColumnDescriptor, TableDescriptor};

// =============================================================================
// SQL Query Templates
// =============================================================================

mod queries {
    /// User tables only: no views, no system relations.
    pub const LIST_TABLES: &str = r#"
        SELECT TRIM(r.RDB$RELATION_NAME) AS TABLE_NAME
        FROM RDB$RELATIONS r
        WHERE r.RDB$VIEW_BLR IS NULL
          AND (r.RDB$SYSTEM_FLAG IS NULL OR r.RDB$SYSTEM_FLAG = 0)
        ORDER BY r.RDB$RELATION_NAME
    "#;

    /// Columns of one relation in field-position order.
    ///
    /// Result columns, by index:
    /// 0 name, 1 type code, 2 sub-type, 3 byte length, 4 character length,
    /// 5 precision, 6 scale, 7 not-null flag, 8 default source,
    /// 9 primary key member, 10 foreign key member, 11 unique member,
    /// 12 constraint type, 13 constraint name. 12 and 13 describe the first
    /// covering constraint by type then name.
    pub const DESCRIBE_TABLE: &str = r#"
        SELECT
            TRIM(rf.RDB$FIELD_NAME) AS FIELD_NAME,
            f.RDB$FIELD_TYPE AS FIELD_TYPE,
            f.RDB$FIELD_SUB_TYPE AS FIELD_SUB_TYPE,
            f.RDB$FIELD_LENGTH AS FIELD_LENGTH,
            f.RDB$CHARACTER_LENGTH AS CHARACTER_LENGTH,
            f.RDB$FIELD_PRECISION AS FIELD_PRECISION,
            f.RDB$FIELD_SCALE AS FIELD_SCALE,
            COALESCE(rf.RDB$NULL_FLAG, f.RDB$NULL_FLAG, 0) AS NOT_NULL,
            CAST(COALESCE(rf.RDB$DEFAULT_SOURCE, f.RDB$DEFAULT_SOURCE) AS VARCHAR(1024)) AS DEFAULT_SOURCE,
            CASE WHEN EXISTS (
                SELECT 1
                FROM RDB$RELATION_CONSTRAINTS rc
                JOIN RDB$INDEX_SEGMENTS s ON s.RDB$INDEX_NAME = rc.RDB$INDEX_NAME
                WHERE rc.RDB$RELATION_NAME = rf.RDB$RELATION_NAME
                  AND rc.RDB$CONSTRAINT_TYPE = 'PRIMARY KEY'
                  AND s.RDB$FIELD_NAME = rf.RDB$FIELD_NAME
            ) THEN 1 ELSE 0 END AS IS_PRIMARY_KEY,
            CASE WHEN EXISTS (
                SELECT 1
                FROM RDB$RELATION_CONSTRAINTS rc
                JOIN RDB$INDEX_SEGMENTS s ON s.RDB$INDEX_NAME = rc.RDB$INDEX_NAME
                WHERE rc.RDB$RELATION_NAME = rf.RDB$RELATION_NAME
                  AND rc.RDB$CONSTRAINT_TYPE = 'FOREIGN KEY'
                  AND s.RDB$FIELD_NAME = rf.RDB$FIELD_NAME
            ) THEN 1 ELSE 0 END AS IS_FOREIGN_KEY,
            CASE WHEN EXISTS (
                SELECT 1
                FROM RDB$RELATION_CONSTRAINTS rc
                JOIN RDB$INDEX_SEGMENTS s ON s.RDB$INDEX_NAME = rc.RDB$INDEX_NAME
                WHERE rc.RDB$RELATION_NAME = rf.RDB$RELATION_NAME
                  AND rc.RDB$CONSTRAINT_TYPE = 'UNIQUE'
                  AND s.RDB$FIELD_NAME = rf.RDB$FIELD_NAME
            ) THEN 1 ELSE 0 END AS IS_UNIQUE,
            (
                SELECT FIRST 1 TRIM(rc.RDB$CONSTRAINT_TYPE)
                FROM RDB$RELATION_CONSTRAINTS rc
                JOIN RDB$INDEX_SEGMENTS s ON s.RDB$INDEX_NAME = rc.RDB$INDEX_NAME
                WHERE rc.RDB$RELATION_NAME = rf.RDB$RELATION_NAME
                  AND s.RDB$FIELD_NAME = rf.RDB$FIELD_NAME
                ORDER BY rc.RDB$CONSTRAINT_TYPE, rc.RDB$CONSTRAINT_NAME
            ) AS CONSTRAINT_TYPE,
            (
                SELECT FIRST 1 TRIM(rc.RDB$CONSTRAINT_NAME)
                FROM RDB$RELATION_CONSTRAINTS rc
                JOIN RDB$INDEX_SEGMENTS s ON s.RDB$INDEX_NAME = rc.RDB$INDEX_NAME
                WHERE rc.RDB$RELATION_NAME = rf.RDB$RELATION_NAME
                  AND s.RDB$FIELD_NAME = rf.RDB$FIELD_NAME
                ORDER BY rc.RDB$CONSTRAINT_TYPE, rc.RDB$CONSTRAINT_NAME
            ) AS CONSTRAINT_NAME
        FROM RDB$RELATION_FIELDS rf
        JOIN RDB$FIELDS f ON f.RDB$FIELD_NAME = rf.RDB$FIELD_SOURCE
        WHERE rf.RDB$RELATION_NAME = ?
        ORDER BY rf.RDB$FIELD_POSITION
    "#;
}

pub use queries::{DESCRIBE_TABLE, LIST_TABLES};

/// Reads table metadata through the shared connection.
#[derive(Debug, Clone)]
pub struct CatalogReader {
    connections: ConnectionManager,
}

impl CatalogReader {
    pub fn new(connections: ConnectionManager) -> Self {
        Self { connections }
    }

    /// Names of all user tables, sorted.
    pub async fn list_tables(&self) -> DbResult<Vec<String>> {
        let rows = self
            .connections
            .with_backend(|b| b.fetch(LIST_TABLES, Vec::new()))
            .await?;

        let tables = rows
            .iter()
            .map(|row| {
                row.text(0)?
                    .ok_or_else(|| catalog_error("Catalog returned a table without a name"))
            })
            .collect::<DbResult<Vec<_>>>()?;

        info!(count = tables.len(), "Listed tables");
        Ok(tables)
    }

    /// Columns of `table_name` in field-position order.
    ///
    /// An unknown table yields a descriptor with no columns.
    pub async fn describe_table(&self, table_name: &str) -> DbResult<TableDescriptor> {
        let table_name = table_name.trim();
        if table_name.is_empty() {
            return Err(DbError::invalid_input("table_name must not be empty"));
        }

        debug!(table = %table_name, "Describing table");
        let param = vec![SqlType::Text(table_name.to_string())];
        let rows = self
            .connections
            .with_backend(move |b| b.fetch(DESCRIBE_TABLE, param))
            .await?;

        let descriptor = rows
            .iter()
            .map(column_from_row)
            .collect::<DbResult<Vec<_>>>()?
            .into_iter()
            .fold(TableDescriptor::new(table_name), TableDescriptor::with_column);

        info!(
            table = %table_name,
            columns = descriptor.columns.len(),
            "Described table"
        );
        Ok(descriptor)
    }
}

/// Build a column descriptor from one `DESCRIBE_TABLE` row.
pub fn column_from_row(row: &FbRow) -> DbResult<ColumnDescriptor> {
    let name = row
        .text(0)?
        .ok_or_else(|| catalog_error("Catalog returned a column without a name"))?;
    let field_type = row.int(1)?.unwrap_or_default();
    let sub_type = row.int(2)?;
    let not_null = row.int(7)?.unwrap_or_default() != 0;

    let mut column =
        ColumnDescriptor::new(name, types::type_label(field_type, sub_type), !not_null);

    if types::is_character_type(field_type) {
        if let Some(length) = row.int(4)?.or(row.int(3)?) {
            column = column.with_length(length);
        }
    }

    if types::is_exact_numeric(field_type, sub_type) {
        let precision = row.int(5)?.unwrap_or_default();
        let scale = row.int(6)?.unwrap_or_default().abs();
        column = column.with_precision(precision, scale);
    }

    if let Some(default) = row.text(8)?.as_deref().and_then(types::strip_default_keyword) {
        column = column.with_default(default);
    }

    column = column
        .with_primary_key(row.int(9)?.unwrap_or_default() != 0)
        .with_foreign_key(row.int(10)?.unwrap_or_default() != 0)
        .with_unique(row.int(11)?.unwrap_or_default() != 0);

    if let (Some(kind), Some(name)) = (row.text(12)?, row.text(13)?) {
        column = column.with_constraint(kind, name);
    }

    Ok(column)
}

fn catalog_error(message: &str) -> DbError {
    DbError::query(message, None, "Check the Firebird system catalog")
}
