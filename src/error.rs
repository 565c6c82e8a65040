//! Error types for the Firebird MCP Server.
//!
//! This module defines all error types using `thiserror` for ergonomic error handling.
//! Driver messages are carried verbatim so the calling assistant sees exactly what
//! Firebird reported.

use thiserror::Error;

/// SQLCODE Firebird reports for network failures, lost connections and shutdowns.
pub const SQLCODE_CONNECTION_LOST: i32 = -902;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("Connection failed: {message}")]
    Connection { message: String, suggestion: String },

    #[error("Query failed: {message}")]
    Query {
        message: String,
        /// Firebird SQLCODE, e.g. -204 for an unknown table
        sqlcode: Option<i32>,
        suggestion: String,
    },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl DbError {
    /// Create a connection error with a helpful suggestion.
    pub fn connection(message: impl Into<String>, suggestion: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
            suggestion: suggestion.into(),
        }
    }

    /// Create a query error with optional SQLCODE.
    pub fn query(
        message: impl Into<String>,
        sqlcode: Option<i32>,
        suggestion: impl Into<String>,
    ) -> Self {
        Self::Query {
            message: message.into(),
            sqlcode,
            suggestion: suggestion.into(),
        }
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create an invalid input error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Get the suggestion for this error, if available.
    pub fn suggestion(&self) -> Option<&str> {
        match self {
            Self::Connection { suggestion, .. } => Some(suggestion),
            Self::Query { suggestion, .. } => Some(suggestion),
            _ => None,
        }
    }

    /// True when the connection handle should be thrown away and reopened.
    pub fn is_connection_lost(&self) -> bool {
        matches!(self, Self::Connection { .. })
    }
}

/// Convert driver errors to DbError.
impl From<rsfbclient::FbError> for DbError {
    fn from(err: rsfbclient::FbError) -> Self {
        match err {
            rsfbclient::FbError::Sql { msg, code } if code == SQLCODE_CONNECTION_LOST => {
                DbError::connection(
                    msg,
                    "Check that the Firebird server is running and reachable",
                )
            }
            rsfbclient::FbError::Sql { msg, code } => DbError::query(
                msg,
                Some(code),
                "Check the SQL syntax and referenced objects",
            ),
            rsfbclient::FbError::Io(io_err) => DbError::connection(
                format!("I/O error: {}", io_err),
                "Check network connectivity and database server status",
            ),
            other => DbError::query(
                other.to_string(),
                None,
                "Check the SQL statement and the column types involved",
            ),
        }
    }
}

/// Result type alias for database operations.
pub type DbResult<T> = Result<T, DbError>;

/// Build error data as JSON value.
fn error_data(suggestion: Option<&str>, sqlcode: Option<i32>) -> Option<serde_json::Value> {
    match (suggestion, sqlcode) {
        (None, None) => None,
        (Some(s), None) => Some(serde_json::json!({ "suggestion": s })),
        (None, Some(code)) => Some(serde_json::json!({ "sqlcode": code })),
        (Some(s), Some(code)) => Some(serde_json::json!({ "suggestion": s, "sqlcode": code })),
    }
}

/// Convert DbError to MCP ErrorData for semantic error categorization.
impl From<DbError> for rmcp::ErrorData {
    fn from(err: DbError) -> Self {
        match &err {
            DbError::InvalidInput { .. } => {
                rmcp::ErrorData::invalid_params(err.to_string(), error_data(None, None))
            }

            // Engine-side failures are the caller's SQL, so they count as bad params
            DbError::Query {
                sqlcode,
                suggestion,
                ..
            } => rmcp::ErrorData::invalid_params(
                err.to_string(),
                error_data(Some(suggestion), *sqlcode),
            ),

            DbError::Connection { suggestion, .. } => {
                rmcp::ErrorData::internal_error(err.to_string(), error_data(Some(suggestion), None))
            }

            DbError::Configuration { .. } | DbError::Internal { .. } => {
                rmcp::ErrorData::internal_error(err.to_string(), error_data(None, None))
            }
        }
    }
}
