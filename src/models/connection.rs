//! Connection-related data models.
//!
//! This module defines the parameters used to attach to a Firebird database.

use serde::Serialize;

/// Default Firebird server port.
pub const DEFAULT_FIREBIRD_PORT: u16 = 3050;

/// Parameters for attaching to a Firebird database.
///
/// Fixed at process start. The password is never serialized or printed.
#[derive(Clone, Serialize)]
pub struct ConnectionParams {
    pub host: String,
    pub port: u16,
    /// Database path or alias as known to the server
    pub database: String,
    pub user: String,
    /// Contains sensitive data - never log
    #[serde(skip_serializing)]
    pub password: String,
}

impl ConnectionParams {
    /// Create connection parameters, rejecting blank host, database or user.
    pub fn new(
        host: impl Into<String>,
        port: u16,
        database: impl Into<String>,
        user: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Self, ConnectionParamsError> {
        let host = host.into().trim().to_string();
        let database = database.into().trim().to_string();
        let user = user.into().trim().to_string();

        if host.is_empty() {
            return Err(ConnectionParamsError::EmptyHost);
        }
        if database.is_empty() {
            return Err(ConnectionParamsError::EmptyDatabase);
        }
        if user.is_empty() {
            return Err(ConnectionParamsError::EmptyUser);
        }
        if port == 0 {
            return Err(ConnectionParamsError::InvalidPort);
        }

        Ok(Self {
            host,
            port,
            database,
            user,
            password: password.into(),
        })
    }

    /// Firebird-style connection target, e.g. `localhost/3050:/data/employee.fdb`.
    pub fn target(&self) -> String {
        format!("{}/{}:{}", self.host, self.port, self.database)
    }

    /// Display-safe description including the user but never the password.
    pub fn masked(&self) -> String {
        format!("{}:****@{}", self.user, self.target())
    }
}

impl std::fmt::Debug for ConnectionParams {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionParams")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database", &self.database)
            .field("user", &self.user)
            .field("password", &"****")
            .finish()
    }
}

/// Errors that can occur when building connection parameters.
#[derive(Debug, thiserror::Error)]
pub enum ConnectionParamsError {
    #[error(
        "Firebird database path must be provided via --fb-database or the FIREBIRD_BASE environment variable"
    )]
    EmptyDatabase,

    #[error("Firebird host cannot be empty")]
    EmptyHost,

    #[error("Firebird user cannot be empty")]
    EmptyUser,

    #[error("Firebird port must be between 1 and 65535")]
    InvalidPort,
}
