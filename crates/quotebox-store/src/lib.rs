//! Data access for quotebox.
//!
//! Two layers live here:
//!
//! - Plain functions over a borrowed [`rusqlite::Connection`], one per query
//!   shape (`quote_stats`, `get_quote_by_id`, `list_quotes`,
//!   `list_quotes_with_likes_at_least`, `create_quote`, `increment_likes`).
//! - [`QuoteStore`], a cloneable façade that owns the connection pool, checks
//!   out a connection per call and forwards to those functions.
//!
//! Everything is synchronous; async callers are expected to run store calls
//! on a blocking thread.
//!
//! # Usage
//!
//! ```rust,ignore
//! use quotebox_store::QuoteStore;
//!
//! let store = QuoteStore::open(Some("quotes.db"), Default::default())?;
//! let created = store.create_quote("Ada", "That brain of mine is more than merely mortal")?;
//! store.increment_likes(created.id)?;
//! ```

mod error;
mod quote;
mod store;

pub use error::StoreError;
pub use quote::{
    create_quote, get_quote_by_id, increment_likes, likes_threshold, list_quotes,
    list_quotes_with_likes_at_least, quote_stats, CreatedQuote, Quote, QuoteStats,
};
pub use store::QuoteStore;

#[cfg(test)]
mod tests;
