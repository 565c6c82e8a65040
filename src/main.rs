//! Firebird MCP Server - Main entry point.
//!
//! This server provides MCP (Model Context Protocol) tools for AI assistants
//! to inspect and query a Firebird database.

use firebird_mcp_server::config::{Config, TransportMode};
use firebird_mcp_server::db::ConnectionManager;
use firebird_mcp_server::transport::{HttpTransport, StdioTransport, Transport};
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Initialize the tracing subscriber for logging.
///
/// Logs are written to stderr; stdout carries the stdio transport.
fn init_tracing(config: &Config) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let subscriber = tracing_subscriber::registry().with(filter);

    if config.json_logs {
        subscriber
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        subscriber
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_thread_ids(false),
            )
            .init();
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // A missing .env file is fine
    dotenvy::dotenv().ok();

    let config = Config::parse_args();
    init_tracing(&config);

    let params = match config.connection_params() {
        Ok(params) => params,
        Err(e) => {
            eprintln!("Error: {e}");
            eprintln!();
            eprintln!("Usage: firebird-mcp-server --fb-database <path> [--fb-host <host>] [--fb-port <port>]");
            eprintln!("       FIREBIRD_BASE=/data/employee.fdb firebird-mcp-server");
            std::process::exit(1);
        }
    };

    info!(
        transport = %config.transport,
        database = %params.masked(),
        "Starting Firebird MCP Server v{}",
        env!("CARGO_PKG_VERSION")
    );

    let connections = ConnectionManager::from_params(params);
    if let Err(e) = connections.connect().await {
        error!(error = %e, "Initial connection failed");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }

    let result = match config.transport {
        TransportMode::Stdio => {
            let transport = StdioTransport::new(connections);
            info!(transport = transport.name(), "Using stdio transport");
            transport.run().await
        }
        TransportMode::Http => {
            info!(
                bind_addr = %config.http_bind_addr(),
                endpoint = %config.mcp_endpoint,
                "Using HTTP transport"
            );
            let transport = HttpTransport::new(
                connections,
                &config.http_host,
                config.http_port,
                &config.mcp_endpoint,
            );
            transport.run().await
        }
    };

    if let Err(e) = result {
        error!(error = %e, "Server error");
        return Err(e.into());
    }

    info!("Server shutdown complete");
    Ok(())
}
