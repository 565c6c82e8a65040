//! Driver seam.
//!
//! [`FirebirdBackend`] is the narrow interface the rest of the crate needs
//! from a live attachment; [`Connector`] opens one. The production
//! implementations wrap `rsfbclient`'s pure-Rust client.

use rsfbclient::{
    Connection, Execute, FbError, FirebirdClientFactory, PureRustConnectionBuilder, Queryable, Row,
    SqlType,
};
use tracing::debug;

use crate::db::statement::{self, StatementShape};
use crate::db::types::FbRow;
use crate::models::ConnectionParams;

/// What a caller-supplied statement produced.
#[derive(Debug, Clone)]
pub enum StatementOutcome {
    Rows(Vec<FbRow>),
    /// Rows affected by a committed statement
    Affected(u64),
}

/// A live database attachment.
///
/// All methods block; callers run them on the blocking thread pool.
pub trait FirebirdBackend: Send {
    /// Run a parameterized query and fetch every row.
    fn fetch(&mut self, sql: &str, params: Vec<SqlType>) -> Result<Vec<FbRow>, FbError>;

    /// Run arbitrary SQL. Statements without a result set are committed.
    fn run(&mut self, sql: &str) -> Result<StatementOutcome, FbError>;

    /// Detach from the database.
    fn close(self: Box<Self>) -> Result<(), FbError>;
}

/// Opens new attachments.
pub trait Connector: Send + Sync {
    fn connect(&self) -> Result<Box<dyn FirebirdBackend>, FbError>;

    /// Display-safe description of the target, used in logs.
    fn target(&self) -> String;
}

/// Attachment opened by the pure-Rust wire protocol client.
pub type PureRustConnection = Connection<<PureRustConnectionBuilder as FirebirdClientFactory>::C>;

// Every call runs in its own transaction: committed on success, rolled back
// on error, so nothing stays pending between tool calls.
impl FirebirdBackend for PureRustConnection {
    fn fetch(&mut self, sql: &str, params: Vec<SqlType>) -> Result<Vec<FbRow>, FbError> {
        let rows: Vec<Row> = self.with_transaction(|tr| tr.query(sql, params))?;
        Ok(rows.into_iter().map(FbRow::from).collect())
    }

    fn run(&mut self, sql: &str) -> Result<StatementOutcome, FbError> {
        match statement::classify(sql) {
            StatementShape::Rows => {
                debug!("Routing statement to cursor path");
                let rows: Vec<Row> = self.with_transaction(|tr| tr.query(sql, ()))?;
                Ok(StatementOutcome::Rows(
                    rows.into_iter().map(FbRow::from).collect(),
                ))
            }
            StatementShape::Returning => {
                debug!("Routing statement to singleton output path");
                let row: Row = self.execute_returnable(sql, ())?;
                if row.cols.is_empty() {
                    // Procedure without output parameters
                    return Ok(StatementOutcome::Affected(0));
                }
                Ok(StatementOutcome::Rows(vec![FbRow::from(row)]))
            }
            StatementShape::Affected => {
                debug!("Routing statement to execute path");
                let affected = self.with_transaction(|tr| tr.execute(sql, ()))?;
                Ok(StatementOutcome::Affected(affected as u64))
            }
        }
    }

    fn close(self: Box<Self>) -> Result<(), FbError> {
        Connection::close(*self)
    }
}

/// Session statements issued right after attaching.
///
/// The wire client cannot decode INT128, DECFLOAT or the WITH TIME ZONE
/// types, which Firebird 4+ returns for e.g. `SUM` over BIGINT. These map
/// them to BIGINT, DOUBLE PRECISION and the zone-less types.
pub const SESSION_BINDS: [&str; 3] = [
    "SET BIND OF INT128 TO LEGACY",
    "SET BIND OF DECFLOAT TO LEGACY",
    "SET BIND OF TIME ZONE TO LEGACY",
];

/// Apply [`SESSION_BINDS`]. Servers before Firebird 4 reject them, which is
/// ignored.
pub fn apply_session_binds(backend: &mut dyn FirebirdBackend) {
    for sql in SESSION_BINDS {
        if let Err(e) = backend.run(sql) {
            debug!(statement = sql, error = %e, "Session bind not applied");
        }
    }
}

/// Connects with the pure-Rust wire protocol client.
#[derive(Debug, Clone)]
pub struct FirebirdConnector {
    params: ConnectionParams,
}

impl FirebirdConnector {
    pub fn new(params: ConnectionParams) -> Self {
        Self { params }
    }
}

impl Connector for FirebirdConnector {
    fn connect(&self) -> Result<Box<dyn FirebirdBackend>, FbError> {
        let conn = rsfbclient::builder_pure_rust()
            .host(self.params.host.as_str())
            .port(self.params.port)
            .db_name(self.params.database.as_str())
            .user(self.params.user.as_str())
            .pass(self.params.password.as_str())
            .connect()?;
        let mut conn: Box<dyn FirebirdBackend> = Box::new(conn);
        apply_session_binds(conn.as_mut());
        Ok(conn)
    }

    fn target(&self) -> String {
        self.params.masked()
    }
}
