//! The `quotes` relation and the queries issued against it.

use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::{Deserialize, Serialize};

use crate::error::StoreError;

/// A stored quotation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    /// Engine-assigned identifier, strictly positive and never reused.
    pub id: i64,
    /// Attributed author or submitter.
    pub name: String,
    /// The quotation body.
    pub quote: String,
    /// Like counter; starts at zero and only ever grows.
    pub likes: i64,
}

/// Aggregate figures over the whole table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteStats {
    /// Number of stored quotes.
    pub count: i64,
    /// Highest like count, `None` when the table is empty.
    #[serde(rename = "maxLikes")]
    pub max_likes: Option<i64>,
}

/// Identifier of a freshly inserted quote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedQuote {
    pub id: i64,
}

fn map_row_to_quote(row: &Row<'_>) -> rusqlite::Result<Quote> {
    Ok(Quote {
        id: row.get(0)?,
        name: row.get(1)?,
        quote: row.get(2)?,
        likes: row.get(3)?,
    })
}

/// Minimum like count for a quote to count as popular: 75% of the current
/// maximum, rounded up. An empty table (`None`) yields a threshold of zero.
pub fn likes_threshold(max_likes: Option<i64>) -> i64 {
    let max = max_likes.unwrap_or(0).max(0);
    // ceil(3 * max / 4) == max - floor(max / 4), and cannot overflow
    max - max / 4
}

/// Returns the row count and the maximum like count.
pub fn quote_stats(conn: &Connection) -> Result<QuoteStats, StoreError> {
    let stats = conn.query_row("SELECT COUNT(*), MAX(likes) FROM quotes", [], |row| {
        Ok(QuoteStats {
            count: row.get(0)?,
            max_likes: row.get(1)?,
        })
    })?;
    Ok(stats)
}

/// Looks up a single quote by its exact id.
pub fn get_quote_by_id(conn: &Connection, id: i64) -> Result<Option<Quote>, StoreError> {
    let quote = conn
        .query_row(
            "SELECT id, name, quote, likes FROM quotes WHERE id = ?1",
            [id],
            map_row_to_quote,
        )
        .optional()?;
    Ok(quote)
}

/// Returns every stored quote. Callers must not rely on the order.
pub fn list_quotes(conn: &Connection) -> Result<Vec<Quote>, StoreError> {
    let mut stmt = conn.prepare("SELECT id, name, quote, likes FROM quotes")?;
    let rows = stmt.query_map([], map_row_to_quote)?;
    let mut quotes = Vec::new();
    for row in rows {
        quotes.push(row?);
    }
    Ok(quotes)
}

/// Returns all quotes whose like count is at least `threshold`.
pub fn list_quotes_with_likes_at_least(
    conn: &Connection,
    threshold: i64,
) -> Result<Vec<Quote>, StoreError> {
    let mut stmt =
        conn.prepare("SELECT id, name, quote, likes FROM quotes WHERE likes >= ?1")?;
    let rows = stmt.query_map([threshold], map_row_to_quote)?;
    let mut quotes = Vec::new();
    for row in rows {
        quotes.push(row?);
    }
    Ok(quotes)
}

/// Inserts a new quote with zero likes and returns its assigned id.
pub fn create_quote(
    conn: &Connection,
    name: &str,
    quote: &str,
) -> Result<CreatedQuote, StoreError> {
    let id = conn.query_row(
        "INSERT INTO quotes (name, quote) VALUES (?1, ?2) RETURNING id",
        params![name, quote],
        |row| row.get(0),
    )?;
    Ok(CreatedQuote { id })
}

/// Adds one like to the quote with the given id.
///
/// The increment happens inside SQLite, so concurrent calls never lose
/// updates. Returns the number of rows touched; an unknown id is `0`, not an
/// error.
pub fn increment_likes(conn: &Connection, id: i64) -> Result<usize, StoreError> {
    let changed = conn.execute("UPDATE quotes SET likes = likes + 1 WHERE id = ?1", [id])?;
    Ok(changed)
}
