mod connection;
pub(crate) mod schema;
mod store;

use rusqlite::Connection;
use rust_decimal::Decimal;
use std::path::PathBuf;
use tracing::{debug, warn};

pub use connection::{ConnectionManager, ConnectionPolicy, Handle, Location};
pub use schema::{SchemaManager, SchemaState};

use crate::error::{Error, Result};
use crate::models::{Transaction, TransactionType};

/// Extra attempts `list_all` makes after a transient failure.
const LIST_RETRIES: u32 = 1;

/// The record store: every operation acquires a connection, ensures the
/// schema, runs one statement and releases the connection.
#[derive(Debug)]
pub struct Database {
    connections: ConnectionManager,
    schema: SchemaManager,
}

impl Database {
    pub fn new(connections: ConnectionManager) -> Self {
        Self {
            connections,
            schema: SchemaManager::new(),
        }
    }

    /// Nothing is opened until the first operation.
    pub fn open(path: impl Into<PathBuf>, policy: ConnectionPolicy) -> Self {
        Self::new(ConnectionManager::new(path, policy))
    }

    pub fn open_in_memory() -> Self {
        Self::new(ConnectionManager::in_memory())
    }

    pub fn policy(&self) -> ConnectionPolicy {
        self.connections.policy()
    }

    pub fn schema_state(&self) -> SchemaState {
        self.schema.state()
    }

    /// Create the table and run the `type` column migration. A
    /// [`Error::Migration`] here is worth logging but reads keep working.
    pub fn ensure_schema(&self) -> Result<SchemaState> {
        self.with_connection(|conn| self.schema.ensure_schema(conn))
    }

    // ── Transactions ──────────────────────────────────────────

    pub fn insert(
        &self,
        description: &str,
        amount: Decimal,
        date: &str,
        kind: TransactionType,
    ) -> Result<i64> {
        let id = self.with_schema(|conn, _| {
            store::insert(conn, description, amount, date, kind).map_err(Error::Store)
        })?;
        debug!("Inserted transaction {id} ({kind})");
        Ok(id)
    }

    /// All records, newest first. Retried on transient connection failures.
    pub fn list_all(&self) -> Result<Vec<Transaction>> {
        let mut attempt = 0;
        loop {
            let result = self.with_schema(|conn, state| {
                store::list_all(conn, state != SchemaState::Degraded).map_err(Error::Store)
            });
            match result {
                Err(e) if e.is_transient() && attempt < LIST_RETRIES => {
                    attempt += 1;
                    warn!("Listing transactions failed ({e}), retrying");
                }
                other => return other,
            }
        }
    }

    /// Updating an id that does not exist touches no rows and is not an error.
    pub fn update(
        &self,
        id: i64,
        description: &str,
        amount: Decimal,
        date: &str,
        kind: TransactionType,
    ) -> Result<()> {
        let changed = self.with_schema(|conn, _| {
            store::update(conn, id, description, amount, date, kind).map_err(Error::Store)
        })?;
        if changed == 0 {
            debug!("No transaction with id {id} to update");
        } else {
            debug!("Updated transaction {id}");
        }
        Ok(())
    }

    /// Deleting an id that does not exist is not an error.
    pub fn delete(&self, id: i64) -> Result<()> {
        let changed =
            self.with_schema(|conn, _| store::delete(conn, id).map_err(Error::Store))?;
        if changed == 0 {
            debug!("No transaction with id {id} to delete");
        } else {
            debug!("Deleted transaction {id}");
        }
        Ok(())
    }

    // ── Connection plumbing ───────────────────────────────────

    pub(crate) fn with_connection<T>(
        &self,
        f: impl FnOnce(&Connection) -> Result<T>,
    ) -> Result<T> {
        let handle = self.connections.acquire()?;
        let result = {
            let conn = handle.lock()?;
            f(&conn)
        };
        settle(self.connections.release(handle), result)
    }

    fn with_schema<T>(&self, f: impl FnOnce(&Connection, SchemaState) -> Result<T>) -> Result<T> {
        self.with_connection(|conn| {
            let state = match self.schema.ensure_schema(conn) {
                Ok(state) => state,
                Err(Error::Migration(e)) => {
                    warn!("Type column migration failed, legacy rows read as expense: {e}");
                    SchemaState::Degraded
                }
                Err(e) => return Err(e),
            };
            f(conn, state)
        })
    }
}

/// The statement outcome wins over a failed close: a committed write must
/// not be reported as failed.
fn settle<T>(released: Result<()>, result: Result<T>) -> Result<T> {
    if let Err(e) = released {
        warn!("Releasing connection failed: {e}");
    }
    result
}
