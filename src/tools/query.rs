//! Query tool.
//!
//! This module implements the `execute_query` MCP tool. Any statement is
//! accepted, including DDL and destructive DML.

use schemars::JsonSchema;
use serde::Deserialize;

use crate::db::{ConnectionManager, QueryExecutor};
use crate::error::DbResult;
use crate::models::QueryOutcome;

/// Input for the execute_query tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ExecuteQueryInput {
    /// SQL statement to execute. SELECT returns rows; other statements are committed and return the affected row count.
    pub sql: String,
}

/// Handler for the execute_query tool.
#[derive(Debug, Clone)]
pub struct QueryToolHandler {
    executor: QueryExecutor,
}

impl QueryToolHandler {
    pub fn new(connections: ConnectionManager) -> Self {
        Self {
            executor: QueryExecutor::new(connections),
        }
    }

    pub async fn execute_query(&self, input: ExecuteQueryInput) -> DbResult<QueryOutcome> {
        self.executor.execute_query(&input.sql).await
    }
}
