//! Query execution engine.
//!
//! Runs caller-supplied SQL unmodified; the engine is the only validator.
//! Reads are fully materialized, writes are committed before returning.

use std::time::Instant;

use tracing::{debug, info};

use crate::db::backend::StatementOutcome;
use crate::db::connection::ConnectionManager;
use crate::error::{DbError, DbResult};
use crate::models::QueryOutcome;

/// Query executor that handles arbitrary SQL.
#[derive(Debug, Clone)]
pub struct QueryExecutor {
    connections: ConnectionManager,
}

impl QueryExecutor {
    pub fn new(connections: ConnectionManager) -> Self {
        Self { connections }
    }

    /// Execute `sql` and normalize the result.
    pub async fn execute_query(&self, sql: &str) -> DbResult<QueryOutcome> {
        if sql.trim().is_empty() {
            return Err(DbError::invalid_input("sql must not be empty"));
        }

        let start = Instant::now();
        debug!(sql = %sql, "Executing query");

        let owned = sql.to_string();
        let outcome = self
            .connections
            .with_backend(move |b| b.run(&owned))
            .await?;

        let outcome = match outcome {
            StatementOutcome::Rows(rows) => {
                QueryOutcome::rows(rows.into_iter().map(|r| r.into_row_map()).collect())
            }
            StatementOutcome::Affected(count) => QueryOutcome::affected(count),
        };

        info!(
            rows = outcome.row_count(),
            execution_time_ms = start.elapsed().as_millis() as u64,
            "Query executed"
        );
        Ok(outcome)
    }
}
