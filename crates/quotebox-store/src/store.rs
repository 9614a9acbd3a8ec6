//! Pool-owning façade over the quote queries.

use quotebox_db::{open_pool, DbPool, DbRuntimeSettings};

use crate::error::StoreError;
use crate::quote::{self, CreatedQuote, Quote, QuoteStats};

/// Handle to the quote table.
///
/// Cloning is cheap (the pool is reference counted) and the store keeps no
/// per-request state, so one instance can serve every request of a process.
#[derive(Clone)]
pub struct QuoteStore {
    pool: DbPool,
}

impl std::fmt::Debug for QuoteStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QuoteStore")
            .field("max_size", &self.pool.max_size())
            .finish()
    }
}

impl QuoteStore {
    /// Opens the store behind `binding` and brings its schema up to date.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::MissingBinding`] without touching the disk when
    /// `binding` is `None` or blank. Pool and migration failures are returned
    /// as [`StoreError::Pool`].
    pub fn open(binding: Option<&str>, settings: DbRuntimeSettings) -> Result<Self, StoreError> {
        let path = binding
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .ok_or(StoreError::MissingBinding)?;

        let pool = open_pool(path, settings)?;
        tracing::debug!(path, "quote store opened");

        Ok(Self { pool })
    }

    /// Total number of quotes and the highest like count.
    pub fn stats(&self) -> Result<QuoteStats, StoreError> {
        let conn = self.pool.get()?;
        quote::quote_stats(&conn)
    }

    pub fn quote_by_id(&self, id: i64) -> Result<Option<Quote>, StoreError> {
        let conn = self.pool.get()?;
        quote::get_quote_by_id(&conn, id)
    }

    pub fn all_quotes(&self) -> Result<Vec<Quote>, StoreError> {
        let conn = self.pool.get()?;
        quote::list_quotes(&conn)
    }

    pub fn quotes_with_likes_at_least(&self, threshold: i64) -> Result<Vec<Quote>, StoreError> {
        let conn = self.pool.get()?;
        quote::list_quotes_with_likes_at_least(&conn, threshold)
    }

    pub fn create_quote(&self, name: &str, body: &str) -> Result<CreatedQuote, StoreError> {
        let conn = self.pool.get()?;
        quote::create_quote(&conn, name, body)
    }

    /// Adds one like; returns the rows affected (`0` for an unknown id).
    pub fn increment_likes(&self, id: i64) -> Result<usize, StoreError> {
        let conn = self.pool.get()?;
        quote::increment_likes(&conn, id)
    }
}
