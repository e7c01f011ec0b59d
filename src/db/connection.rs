//! Lifetime of the SQLite handle.

use once_cell::sync::OnceCell;
use rusqlite::Connection;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tracing::{debug, trace, warn};

use crate::error::{Error, Result};

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionPolicy {
    /// Open once, reuse for the life of the process.
    #[default]
    Singleton,
    /// Open on every acquire, close on every release.
    PerCall,
}

impl ConnectionPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Singleton => "singleton",
            Self::PerCall => "per-call",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "singleton" | "shared" => Some(Self::Singleton),
            "per-call" | "percall" | "per_call" => Some(Self::PerCall),
            _ => None,
        }
    }
}

impl std::fmt::Display for ConnectionPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    File(PathBuf),
    Memory,
}

/// A live connection. Clones share the same underlying handle.
#[derive(Debug, Clone)]
pub struct Handle {
    conn: Arc<Mutex<Connection>>,
}

impl Handle {
    fn new(conn: Connection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
        }
    }

    #[cfg(test)]
    pub(crate) fn shares_connection_with(&self, other: &Handle) -> bool {
        Arc::ptr_eq(&self.conn, &other.conn)
    }

    /// Exclusive access for the duration of one statement sequence.
    pub fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| Error::ConnectionPoisoned)
    }
}

#[derive(Debug)]
pub struct ConnectionManager {
    location: Location,
    policy: ConnectionPolicy,
    shared: OnceCell<Handle>,
}

impl ConnectionManager {
    pub fn new(path: impl Into<PathBuf>, policy: ConnectionPolicy) -> Self {
        Self {
            location: Location::File(path.into()),
            policy,
            shared: OnceCell::new(),
        }
    }

    /// An in-memory database only exists while its handle is open, so it is
    /// always shared.
    pub fn in_memory() -> Self {
        Self {
            location: Location::Memory,
            policy: ConnectionPolicy::Singleton,
            shared: OnceCell::new(),
        }
    }

    pub fn policy(&self) -> ConnectionPolicy {
        self.policy
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    pub fn acquire(&self) -> Result<Handle> {
        match self.policy {
            ConnectionPolicy::Singleton => self
                .shared
                .get_or_try_init(|| open(&self.location).map(Handle::new))
                .cloned(),
            ConnectionPolicy::PerCall => open(&self.location).map(Handle::new),
        }
    }

    /// Give a handle back. Closes it under the per-call policy, otherwise the
    /// handle stays cached for the next acquire.
    pub fn release(&self, handle: Handle) -> Result<()> {
        if self.policy == ConnectionPolicy::Singleton {
            return Ok(());
        }
        match Arc::try_unwrap(handle.conn) {
            Ok(mutex) => {
                let conn = mutex.into_inner().map_err(|_| Error::ConnectionPoisoned)?;
                conn.close().map_err(|(_, e)| Error::Connection(e))?;
                trace!("Closed per-call connection");
                Ok(())
            }
            Err(_) => {
                warn!("Connection released while still shared, closing on last drop");
                Ok(())
            }
        }
    }
}

fn open(location: &Location) -> Result<Connection> {
    match location {
        Location::File(path) => open_file(path),
        Location::Memory => {
            debug!("Opening in-memory database");
            Connection::open_in_memory().map_err(Error::Connection)
        }
    }
}

/// Open a file connection with the pragmas every writer of the file uses.
fn open_file(path: &Path) -> Result<Connection> {
    debug!("Opening database {}", path.display());
    let conn = Connection::open(path).map_err(Error::Connection)?;
    conn.execute_batch("PRAGMA journal_mode=WAL;").map_err(Error::Connection)?;
    conn.busy_timeout(BUSY_TIMEOUT).map_err(Error::Connection)?;
    Ok(conn)
}
