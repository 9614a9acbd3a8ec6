//! Connection pool for the quote database.
//!
//! The pool owns the schema: [`open_pool`] migrates before handing the pool
//! out, so every connection it yields can see the `quotes` table.

use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{Connection, OpenFlags};
use thiserror::Error;

use crate::migrations::{run_migrations, MigrationError};

/// Path that makes SQLite open a private, connection-local database.
const IN_MEMORY_PATH: &str = ":memory:";

/// Runtime tunables for SQLite connection behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DbRuntimeSettings {
    /// How long a writer waits on a locked database, in milliseconds.
    pub busy_timeout_ms: u64,

    /// Upper bound on pooled connections. Must be at least 1.
    pub pool_max_size: u32,
}

impl Default for DbRuntimeSettings {
    fn default() -> Self {
        Self {
            busy_timeout_ms: 5_000,
            pool_max_size: 8,
        }
    }
}

pub type DbPool = Pool<SqliteConnectionManager>;

#[derive(Debug, Error)]
pub enum PoolError {
    #[error("invalid database settings: {0}")]
    InvalidSettings(&'static str),

    #[error("database connection pool unavailable: {0}")]
    Unavailable(#[from] r2d2::Error),

    #[error(transparent)]
    Migration(#[from] MigrationError),
}

/// Whether `path` names an in-memory database.
///
/// Each connection to such a path gets its own empty database, so sharing
/// one across a pool needs exactly one long-lived connection.
pub fn is_in_memory(path: &str) -> bool {
    path == IN_MEMORY_PATH
}

fn init_connection(conn: &mut Connection, busy_timeout_ms: u64) -> rusqlite::Result<()> {
    // In-memory databases answer "memory"; anything else means WAL was refused.
    let journal_mode: String =
        conn.query_row("PRAGMA journal_mode = WAL;", [], |row| row.get(0))?;
    if journal_mode != "wal" && journal_mode != "memory" {
        return Err(rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_ERROR),
            Some(format!("journal mode stuck at {journal_mode}")),
        ));
    }
    conn.busy_timeout(std::time::Duration::from_millis(busy_timeout_ms))?;
    conn.execute_batch("PRAGMA foreign_keys = ON;")
}

/// Opens a pool over the quote database at `path` and migrates it.
///
/// For `:memory:` the pool is pinned to a single connection that is never
/// recycled, whatever `pool_max_size` says; otherwise the data would be
/// split across connections and lost on recycle.
///
/// # Errors
///
/// - `PoolError::InvalidSettings` when `pool_max_size` is zero.
/// - `PoolError::Unavailable` when no connection can be opened.
/// - `PoolError::Migration` when the schema cannot be brought up to date.
pub fn open_pool(path: &str, settings: DbRuntimeSettings) -> Result<DbPool, PoolError> {
    if settings.pool_max_size == 0 {
        return Err(PoolError::InvalidSettings("pool_max_size must be at least 1"));
    }

    let busy_timeout_ms = settings.busy_timeout_ms;
    let manager = SqliteConnectionManager::file(path)
        .with_flags(
            OpenFlags::SQLITE_OPEN_READ_WRITE
                | OpenFlags::SQLITE_OPEN_CREATE
                | OpenFlags::SQLITE_OPEN_FULL_MUTEX,
        )
        .with_init(move |conn| init_connection(conn, busy_timeout_ms));

    let builder = if is_in_memory(path) {
        if settings.pool_max_size > 1 {
            tracing::warn!(
                requested = settings.pool_max_size,
                "in-memory database pinned to a single connection"
            );
        }
        Pool::builder()
            .max_size(1)
            .min_idle(Some(1))
            .idle_timeout(None)
            .max_lifetime(None)
    } else {
        Pool::builder().max_size(settings.pool_max_size)
    };
    let pool = builder.build(manager)?;

    let applied = run_migrations(&*pool.get()?)?;
    if applied > 0 {
        tracing::info!(count = applied, path, "applied database migrations");
    }
    tracing::debug!(path, max_size = pool.max_size(), "database pool ready");

    Ok(pool)
}
