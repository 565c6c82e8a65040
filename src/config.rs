//! Configuration handling for the Firebird MCP Server.
//!
//! This module provides configuration management via CLI arguments and environment variables.

use clap::{Parser, ValueEnum};

use crate::error::{DbError, DbResult};
use crate::models::{ConnectionParams, DEFAULT_FIREBIRD_PORT};

pub const DEFAULT_FIREBIRD_HOST: &str = "localhost";
pub const DEFAULT_FIREBIRD_USER: &str = "sysdba";
pub const DEFAULT_FIREBIRD_PASSWORD: &str = "masterkey";
pub const DEFAULT_HTTP_HOST: &str = "localhost";
pub const DEFAULT_HTTP_PORT: u16 = 8131;
pub const DEFAULT_MCP_ENDPOINT: &str = "/mcp";

/// Transport mode for the MCP server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum TransportMode {
    /// Standard input/output (for CLI integration)
    #[default]
    Stdio,
    /// Streamable HTTP (for web clients)
    Http,
}

impl std::fmt::Display for TransportMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Stdio => write!(f, "stdio"),
            Self::Http => write!(f, "http"),
        }
    }
}

/// Configuration for the Firebird MCP Server.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "firebird-mcp-server",
    about = "MCP server for Firebird databases - lets AI assistants inspect tables and run SQL",
    version,
    author
)]
pub struct Config {
    /// Firebird server host
    #[arg(long, default_value = DEFAULT_FIREBIRD_HOST, env = "FIREBIRD_HOST")]
    pub fb_host: String,

    /// Firebird server port
    #[arg(long, default_value_t = DEFAULT_FIREBIRD_PORT, env = "FIREBIRD_PORT")]
    pub fb_port: u16,

    /// Firebird user
    #[arg(long, default_value = DEFAULT_FIREBIRD_USER, env = "FIREBIRD_USER")]
    pub fb_user: String,

    /// Firebird password
    #[arg(
        long,
        default_value = DEFAULT_FIREBIRD_PASSWORD,
        env = "FIREBIRD_PASSWD",
        hide_default_value = true,
        hide_env_values = true
    )]
    pub fb_password: String,

    /// Firebird database path or alias (required)
    #[arg(long, value_name = "PATH", env = "FIREBIRD_BASE")]
    pub fb_database: Option<String>,

    /// Transport mode (stdio or http)
    #[arg(
        short,
        long,
        value_enum,
        default_value = "stdio",
        env = "MCP_TRANSPORT"
    )]
    pub transport: TransportMode,

    /// HTTP host to bind to (only used with http transport)
    #[arg(long = "host", default_value = DEFAULT_HTTP_HOST, env = "MCP_HTTP_HOST")]
    pub http_host: String,

    /// HTTP port to bind to (only used with http transport)
    #[arg(long = "port", default_value_t = DEFAULT_HTTP_PORT, env = "MCP_HTTP_PORT")]
    pub http_port: u16,

    /// MCP endpoint path (only used with http transport)
    #[arg(
        long = "endpoint",
        default_value = DEFAULT_MCP_ENDPOINT,
        env = "MCP_ENDPOINT"
    )]
    pub mcp_endpoint: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", env = "MCP_LOG_LEVEL")]
    pub log_level: String,

    /// Enable JSON logging format
    #[arg(long, env = "MCP_JSON_LOGS")]
    pub json_logs: bool,
}

impl Config {
    /// Parse configuration from command line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Create a default configuration (useful for testing).
    pub fn default_config() -> Self {
        Self {
            fb_host: DEFAULT_FIREBIRD_HOST.to_string(),
            fb_port: DEFAULT_FIREBIRD_PORT,
            fb_user: DEFAULT_FIREBIRD_USER.to_string(),
            fb_password: DEFAULT_FIREBIRD_PASSWORD.to_string(),
            fb_database: None,
            transport: TransportMode::Stdio,
            http_host: DEFAULT_HTTP_HOST.to_string(),
            http_port: DEFAULT_HTTP_PORT,
            mcp_endpoint: DEFAULT_MCP_ENDPOINT.to_string(),
            log_level: "info".to_string(),
            json_logs: false,
        }
    }

    /// Build the Firebird connection parameters.
    ///
    /// Fails with a configuration error when no database path was given.
    pub fn connection_params(&self) -> DbResult<ConnectionParams> {
        ConnectionParams::new(
            &self.fb_host,
            self.fb_port,
            self.fb_database.as_deref().unwrap_or_default(),
            &self.fb_user,
            &self.fb_password,
        )
        .map_err(|e| DbError::configuration(e.to_string()))
    }

    /// Get the HTTP bind address.
    pub fn http_bind_addr(&self) -> String {
        format!("{}:{}", self.http_host, self.http_port)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::default_config()
    }
}
