//! Database abstraction layer.
//!
//! This module provides database access functionality:
//! - Driver seam and the `rsfbclient` adapter
//! - Connection lifecycle
//! - Statement routing
//! - Query execution
//! - Catalog introspection
//! - Type mappings

pub mod backend;
pub mod connection;
pub mod executor;
pub mod schema;
pub mod statement;
pub mod types;

pub use backend::{Connector, FirebirdBackend, FirebirdConnector, StatementOutcome};
pub use connection::ConnectionManager;
pub use executor::QueryExecutor;
pub use schema::CatalogReader;
pub use statement::StatementShape;
pub use types::FbRow;
