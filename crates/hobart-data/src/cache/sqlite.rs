//! SQLite caching layer for daily bars.

use crate::error::{DataError, Result};
use chrono::{NaiveDate, Utc};
use hobart_detect::DailyBar;
use rusqlite::{Connection, params};
use serde::Serialize;
use std::path::Path;

/// SQLite cache for daily bars.
#[derive(Debug)]
pub struct SqliteCache {
    conn: Connection,
}

impl SqliteCache {
    /// Create a new SQLite cache.
    ///
    /// # Arguments
    /// * `path` - Path to the SQLite database file
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        let cache = Self { conn };
        cache.initialize_schema()?;
        Ok(cache)
    }

    /// Create an in-memory cache (useful for testing).
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let cache = Self { conn };
        cache.initialize_schema()?;
        Ok(cache)
    }

    /// Initialize the database schema.
    fn initialize_schema(&self) -> Result<()> {
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS bars (
                symbol TEXT NOT NULL,
                date TEXT NOT NULL,
                close REAL NOT NULL,
                volume INTEGER NOT NULL,
                cached_at TEXT NOT NULL,
                PRIMARY KEY (symbol, date)
            )",
            [],
        )?;

        self.conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_bars_symbol_date ON bars(symbol, date)",
            [],
        )?;

        Ok(())
    }

    /// Check if bars are cached for a symbol and date range.
    ///
    /// Coverage is judged heuristically: markets close on weekends and
    /// holidays, so a range counts as cached once roughly 60% of its
    /// calendar days have a row.
    pub fn has_bars(&self, symbol: &str, start: NaiveDate, end: NaiveDate) -> Result<bool> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM bars
             WHERE symbol = ?1 AND date >= ?2 AND date <= ?3",
            params![symbol, start.to_string(), end.to_string()],
            |row| row.get(0),
        )?;

        let days = (end - start).num_days();
        let expected_count = (days as f64 * 0.6) as i64;

        Ok(count >= expected_count && count > 0)
    }

    /// Get cached bars for a symbol and date range, sorted ascending.
    pub fn get_bars(&self, symbol: &str, start: NaiveDate, end: NaiveDate) -> Result<Vec<DailyBar>> {
        let mut stmt = self.conn.prepare(
            "SELECT date, close, volume FROM bars
             WHERE symbol = ?1 AND date >= ?2 AND date <= ?3
             ORDER BY date ASC",
        )?;

        let rows = stmt.query_map(params![symbol, start.to_string(), end.to_string()], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, f64>(1)?,
                row.get::<_, i64>(2)?,
            ))
        })?;

        let mut bars = Vec::new();
        for row in rows {
            let (date, close, volume) = row?;
            let date = date
                .parse::<NaiveDate>()
                .map_err(|e| DataError::Parse(format!("Bad cached date {date}: {e}")))?;
            bars.push(DailyBar::new(date, close, volume as u64));
        }

        if bars.is_empty() {
            return Err(DataError::MissingData {
                symbol: symbol.to_string(),
                reason: "No cached data found".to_string(),
            });
        }

        Ok(bars)
    }

    /// Store bars for a symbol, replacing rows that already exist.
    pub fn put_bars(&self, symbol: &str, bars: &[DailyBar]) -> Result<()> {
        let cached_at = Utc::now().to_rfc3339();
        let mut stmt = self.conn.prepare(
            "INSERT OR REPLACE INTO bars (symbol, date, close, volume, cached_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )?;

        for bar in bars {
            stmt.execute(params![
                symbol,
                bar.date.to_string(),
                bar.close,
                bar.volume as i64,
                cached_at
            ])?;
        }

        Ok(())
    }

    /// Clear all cached data.
    pub fn clear_all(&self) -> Result<()> {
        self.conn.execute("DELETE FROM bars", [])?;
        Ok(())
    }

    /// Clear cached data for a specific symbol.
    pub fn clear_symbol(&self, symbol: &str) -> Result<()> {
        self.conn
            .execute("DELETE FROM bars WHERE symbol = ?1", params![symbol])?;
        Ok(())
    }

    /// Get cache statistics.
    pub fn get_stats(&self) -> Result<CacheStats> {
        let total_bars: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM bars", [], |row| row.get(0))?;

        let unique_symbols: i64 =
            self.conn
                .query_row("SELECT COUNT(DISTINCT symbol) FROM bars", [], |row| {
                    row.get(0)
                })?;

        Ok(CacheStats {
            total_bars: total_bars as usize,
            unique_symbols: unique_symbols as usize,
        })
    }
}

/// Cache statistics.
#[derive(Debug, Clone, Serialize)]
pub struct CacheStats {
    /// Total number of bar records
    pub total_bars: usize,
    /// Number of unique symbols
    pub unique_symbols: usize,
}
