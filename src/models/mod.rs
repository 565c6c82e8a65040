//! Data models for the Firebird MCP Server.
//!
//! This module re-exports all model types used throughout the application.

pub mod connection;
pub mod query;
pub mod schema;

// Re-export commonly used types
pub use connection::{ConnectionParams, ConnectionParamsError, DEFAULT_FIREBIRD_PORT};
pub use query::{CellValue, QueryOutcome, RowMap};
pub use schema::{ColumnDescriptor, TableDescriptor};
