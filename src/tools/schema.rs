//! Schema introspection tools.
//!
//! This module implements the `list_tables` and `describe_table` MCP tools.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::db::{CatalogReader, ConnectionManager};
use crate::error::DbResult;
use crate::models::{ColumnDescriptor, TableDescriptor};

/// Output from the list_tables tool.
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct ListTablesOutput {
    /// User table names, sorted
    pub tables: Vec<String>,
    /// Total number of tables returned
    pub count: usize,
}

/// Input for the describe_table tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct DescribeTableInput {
    /// Name of the table to describe, as stored in the catalog (unquoted names are upper case)
    pub table_name: String,
}

/// Output from the describe_table tool.
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct DescribeTableOutput {
    /// Name of the described table
    pub table_name: String,
    /// Columns in field-position order; empty when the table does not exist
    pub columns: Vec<ColumnDescriptor>,
}

impl From<TableDescriptor> for DescribeTableOutput {
    fn from(table: TableDescriptor) -> Self {
        Self {
            table_name: table.table_name,
            columns: table.columns,
        }
    }
}

/// Handler for the catalog tools.
#[derive(Debug, Clone)]
pub struct SchemaToolHandler {
    catalog: CatalogReader,
}

impl SchemaToolHandler {
    pub fn new(connections: ConnectionManager) -> Self {
        Self {
            catalog: CatalogReader::new(connections),
        }
    }

    pub async fn list_tables(&self) -> DbResult<ListTablesOutput> {
        let tables = self.catalog.list_tables().await?;
        Ok(ListTablesOutput {
            count: tables.len(),
            tables,
        })
    }

    pub async fn describe_table(&self, input: DescribeTableInput) -> DbResult<DescribeTableOutput> {
        let table = self.catalog.describe_table(&input.table_name).await?;
        Ok(table.into())
    }
}
