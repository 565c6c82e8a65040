//! Connection lifecycle.
//!
//! [`ConnectionManager`] owns the single Firebird attachment used by every
//! tool call. Calls are serialized on an async mutex and the blocking driver
//! work runs on tokio's blocking pool. A handle that fails with a
//! connection-class error is discarded and reopened by the next call.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::db::backend::{Connector, FirebirdBackend, FirebirdConnector};
use crate::error::{DbError, DbResult};
use crate::models::ConnectionParams;

type Handle = Option<Box<dyn FirebirdBackend>>;

#[derive(Clone)]
pub struct ConnectionManager {
    connector: Arc<dyn Connector>,
    handle: Arc<Mutex<Handle>>,
}

impl ConnectionManager {
    /// Create a manager that opens attachments with `connector`.
    pub fn new(connector: impl Connector + 'static) -> Self {
        Self {
            connector: Arc::new(connector),
            handle: Arc::new(Mutex::new(None)),
        }
    }

    /// Create a manager for a Firebird server.
    pub fn from_params(params: ConnectionParams) -> Self {
        Self::new(FirebirdConnector::new(params))
    }

    /// Display-safe description of the database target.
    pub fn target(&self) -> String {
        self.connector.target()
    }

    /// Open the attachment now instead of on first use.
    pub async fn connect(&self) -> DbResult<()> {
        self.with_backend(|_| Ok(())).await
    }

    /// Run `f` against the live attachment, connecting first if needed.
    ///
    /// The lock is held for the whole call.
    pub async fn with_backend<T, F>(&self, f: F) -> DbResult<T>
    where
        F: FnOnce(&mut dyn FirebirdBackend) -> Result<T, rsfbclient::FbError> + Send + 'static,
        T: Send + 'static,
    {
        let mut guard = self.handle.clone().lock_owned().await;
        let connector = Arc::clone(&self.connector);

        tokio::task::spawn_blocking(move || {
            if guard.is_none() {
                *guard = Some(open(connector.as_ref())?);
            }
            let backend = guard
                .as_mut()
                .ok_or_else(|| DbError::internal("Connection handle missing after connect"))?;

            let result = f(backend.as_mut()).map_err(DbError::from);
            if let Err(e) = &result {
                if e.is_connection_lost() {
                    warn!(error = %e, "Discarding lost Firebird connection");
                    *guard = None;
                }
            }
            result
        })
        .await
        .map_err(|e| DbError::internal(format!("Database task failed: {e}")))?
    }

    /// Whether an attachment is currently open.
    pub async fn is_connected(&self) -> bool {
        self.handle.lock().await.is_some()
    }

    /// Detach from the database, if attached.
    pub async fn close(&self) {
        let Some(backend) = self.handle.lock().await.take() else {
            return;
        };
        info!(target_db = %self.target(), "Closing connection");
        match tokio::task::spawn_blocking(move || backend.close()).await {
            Ok(Ok(())) => info!("Connection closed"),
            Ok(Err(e)) => warn!(error = %e, "Error while closing connection"),
            Err(e) => warn!(error = %e, "Close task failed"),
        }
    }
}

impl std::fmt::Debug for ConnectionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionManager")
            .field("target", &self.connector.target())
            .finish()
    }
}

fn open(connector: &dyn Connector) -> DbResult<Box<dyn FirebirdBackend>> {
    let target = connector.target();
    info!(target_db = %target, "Connecting to Firebird");
    let backend = connector.connect().map_err(|e| {
        DbError::connection(
            format!("Unable to connect to {target}: {e}"),
            "Check the host, port, database path and credentials",
        )
    })?;
    info!(target_db = %target, "Connected successfully");
    Ok(backend)
}
