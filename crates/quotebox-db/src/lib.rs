//! Database layer for quotebox.
//!
//! Provides the SQLite connection pool (via `r2d2`) and the embedded SQL
//! migrations that create the `quotes` table. [`open_pool`] applies the
//! migrations itself, so callers never see an unmigrated connection.
//!
//! # Design decisions
//!
//! - **SQLite with WAL mode**: concurrent readers alongside a single writer,
//!   which is all a like counter needs. Increments are single `UPDATE`
//!   statements, so the engine serializes them.
//! - **`r2d2` connection pool**: bounded connection reuse. A `:memory:`
//!   database is pinned to one connection, since SQLite gives every
//!   connection its own private in-memory database.
//! - **Embedded migrations**: SQL files are compiled into the binary via
//!   `include_str!`, so the schema ships with the server.

mod migrations;
mod pool;

pub use migrations::{run_migrations, MigrationError};
pub use pool::{is_in_memory, open_pool, DbPool, DbRuntimeSettings, PoolError};
