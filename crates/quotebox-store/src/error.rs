//! Error types for the data access layer.

use quotebox_db::PoolError;

/// Errors that can occur while opening or querying the quote store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// No storage binding was configured. Nothing can be served.
    #[error("unable to connect to database: no storage binding configured")]
    MissingBinding,

    /// The pool could not be built or its schema migrated.
    #[error(transparent)]
    Pool(#[from] PoolError),

    /// No pooled connection could be checked out.
    #[error("failed to check out database connection: {0}")]
    Connection(#[from] r2d2::Error),

    /// A query was rejected by SQLite.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
}
