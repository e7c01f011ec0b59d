//! Table definition and the idempotent `type` column migration.
//!
//! The quick-add path runs exactly this code against the same file, so the
//! DDL text and version constants live here and nowhere else.

use rusqlite::Connection;
use std::sync::Mutex;
use tracing::{debug, info, warn};

use crate::error::{Error, Result};

pub(crate) const TABLE: &str = "transactions";

pub(crate) const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS transactions (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    description TEXT,
    amount      REAL,
    date        TEXT,
    type        TEXT DEFAULT 'expense'
);
"#;

pub(crate) const ADD_TYPE_COLUMN: &str =
    "ALTER TABLE transactions ADD COLUMN type TEXT DEFAULT 'expense'";

/// Version 1 had no `type` column; version 2 is the current table.
pub(crate) const CURRENT_VERSION: i32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaState {
    Uninitialized,
    Ready,
    /// The table exists but the `type` column could not be added.
    Degraded,
}

/// Session-scoped record of whether the table has been ensured.
#[derive(Debug)]
pub struct SchemaManager {
    state: Mutex<SchemaState>,
}

impl Default for SchemaManager {
    fn default() -> Self {
        Self::new()
    }
}

impl SchemaManager {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(SchemaState::Uninitialized),
        }
    }

    pub fn state(&self) -> SchemaState {
        match self.state.lock() {
            Ok(guard) => *guard,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }

    /// Create the table and retrofit the `type` column once per session.
    ///
    /// A migration failure is returned the first time only; the manager then
    /// stays `Degraded` and later calls succeed so reads keep working.
    pub fn ensure_schema(&self, conn: &Connection) -> Result<SchemaState> {
        let mut state = self
            .state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if *state != SchemaState::Uninitialized {
            return Ok(*state);
        }

        check_version(conn)?;
        conn.execute_batch(SCHEMA).map_err(Error::Schema)?;

        match ensure_type_column(conn) {
            Ok(()) => {
                stamp_version(conn, CURRENT_VERSION)?;
                *state = SchemaState::Ready;
                debug!("Schema ready at version {CURRENT_VERSION}");
                Ok(*state)
            }
            Err(e) => {
                stamp_version(conn, 1)?;
                *state = SchemaState::Degraded;
                Err(e)
            }
        }
    }
}

/// Add the `type` column if the table predates it. No-op otherwise.
pub fn ensure_type_column(conn: &Connection) -> Result<()> {
    if has_column(conn, "type").map_err(Error::Migration)? {
        return Ok(());
    }
    conn.execute(ADD_TYPE_COLUMN, []).map_err(Error::Migration)?;
    info!("Added type column to {TABLE}; existing rows default to expense");
    Ok(())
}

pub(crate) fn has_column(conn: &Connection, column: &str) -> rusqlite::Result<bool> {
    conn.query_row(
        "SELECT COUNT(*) > 0 FROM pragma_table_info(?1) WHERE name = ?2",
        [TABLE, column],
        |row| row.get(0),
    )
}

pub(crate) fn schema_version(conn: &Connection) -> rusqlite::Result<i32> {
    conn.query_row("PRAGMA user_version", [], |row| row.get(0))
}

fn check_version(conn: &Connection) -> Result<()> {
    let found = schema_version(conn).map_err(Error::Schema)?;
    if found > CURRENT_VERSION {
        warn!("Database schema version {found} is newer than {CURRENT_VERSION}");
        return Err(Error::UnsupportedSchemaVersion {
            found,
            supported: CURRENT_VERSION,
        });
    }
    Ok(())
}

fn stamp_version(conn: &Connection, version: i32) -> Result<()> {
    if schema_version(conn).map_err(Error::Schema)? < version {
        conn.execute_batch(&format!("PRAGMA user_version = {version}"))
            .map_err(Error::Schema)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::panic)]

    use super::*;

    #[test]
    fn test_poisoned_state_lock_still_ensures() {
        let manager = SchemaManager::new();
        let _ = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _guard = manager.state.lock().unwrap();
            panic!("holder died");
        }));
        assert!(manager.state.is_poisoned());

        let conn = Connection::open_in_memory().unwrap();
        assert_eq!(manager.ensure_schema(&conn).unwrap(), SchemaState::Ready);
        assert_eq!(manager.state(), SchemaState::Ready);
        assert!(has_column(&conn, "type").unwrap());
    }
}
