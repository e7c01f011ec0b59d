//! Error taxonomy for the persistence core.

/// Errors raised by the schema manager, connection manager and record store.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The storage file could not be opened or the handle is unusable.
    #[error("could not open the transaction database: {0}")]
    Connection(#[source] rusqlite::Error),

    /// The connection mutex was poisoned by a panicking holder.
    #[error("the database connection is no longer usable")]
    ConnectionPoisoned,

    /// The DDL statement was rejected on a reachable connection.
    #[error("could not create the transactions table: {0}")]
    Schema(#[source] rusqlite::Error),

    /// The file was written by a newer build with a schema this build does not know.
    #[error("database schema version {found} is newer than the supported version {supported}")]
    UnsupportedSchemaVersion { found: i32, supported: i32 },

    /// Adding the retrofitted `type` column failed.
    #[error("could not add the type column: {0}")]
    Migration(#[source] rusqlite::Error),

    /// A CRUD statement failed.
    #[error("transaction store error: {0}")]
    Store(#[source] rusqlite::Error),

    /// Caller supplied input was rejected before reaching storage.
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl Error {
    /// Whether a read-only operation may be retried after this error.
    pub(crate) fn is_transient(&self) -> bool {
        match self {
            Self::Connection(_) => true,
            Self::Store(rusqlite::Error::SqliteFailure(e, _)) => matches!(
                e.code,
                rusqlite::ErrorCode::DatabaseBusy | rusqlite::ErrorCode::DatabaseLocked
            ),
            _ => false,
        }
    }
}

/// Reasons a submitted form is rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("description is required")]
    EmptyDescription,

    #[error("amount is required")]
    EmptyAmount,

    #[error("\"{0}\" is not a valid amount")]
    InvalidAmount(String),

    #[error("amount cannot be negative, choose income or expense instead")]
    NegativeAmount,
}

pub type Result<T> = std::result::Result<T, Error>;
