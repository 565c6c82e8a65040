//! MCP tool implementations.
//!
//! This module contains the database tool handlers:
//! - `list_tables`: List user tables
//! - `describe_table`: Get the columns of a table
//! - `execute_query`: Run arbitrary SQL

pub mod query;
pub mod schema;

pub use query::{ExecuteQueryInput, QueryToolHandler};
pub use schema::{DescribeTableInput, DescribeTableOutput, ListTablesOutput, SchemaToolHandler};
