//! Daily bar fetching from Yahoo Finance.

use crate::error::{DataError, Result};
use chrono::{DateTime, Utc};
use hobart_detect::DailyBar;
use std::time::Duration;
use tokio::time::sleep;
use yahoo_finance_api as yahoo;

/// Yahoo Finance daily-bar provider with rate limiting.
pub struct YahooBarProvider {
    provider: yahoo::YahooConnector,
    rate_limit_delay: Duration,
}

impl std::fmt::Debug for YahooBarProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("YahooBarProvider")
            .field("rate_limit_delay", &self.rate_limit_delay)
            .finish_non_exhaustive()
    }
}

impl YahooBarProvider {
    /// Create a new provider with default rate limiting (1 req/sec).
    pub fn new() -> Self {
        Self::with_rate_limit(Duration::from_millis(1000))
    }

    /// Create a new provider with custom rate limiting.
    pub fn with_rate_limit(rate_limit_delay: Duration) -> Self {
        Self {
            provider: yahoo::YahooConnector::new().expect("Failed to create Yahoo connector"),
            rate_limit_delay,
        }
    }

    /// Fetch daily bars for a single symbol.
    ///
    /// Bars come back sorted ascending with duplicate dates collapsed; the
    /// detector relies on dates being unique per instrument.
    ///
    /// # Arguments
    /// * `symbol` - The ticker symbol (e.g., "AAPL" or "^GSPC")
    /// * `start` - Start of the date range
    /// * `end` - End of the date range
    pub async fn fetch_daily_bars(
        &self,
        symbol: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<DailyBar>> {
        if start > end {
            return Err(DataError::InvalidDateRange {
                start: start.to_rfc3339(),
                end: end.to_rfc3339(),
            });
        }

        if symbol.is_empty() {
            return Err(DataError::InvalidSymbol("Empty symbol".to_string()));
        }

        // Convert chrono DateTime to time::OffsetDateTime
        let start_time = time::OffsetDateTime::from_unix_timestamp(start.timestamp())
            .map_err(|e| DataError::TimeConversion(e.to_string()))?;
        let end_time = time::OffsetDateTime::from_unix_timestamp(end.timestamp())
            .map_err(|e| DataError::TimeConversion(e.to_string()))?;

        let response = self
            .provider
            .get_quote_history(symbol, start_time, end_time)
            .await?;

        let quotes = response
            .quotes()
            .map_err(|e| DataError::YahooApi(e.to_string()))?;

        if quotes.is_empty() {
            return Err(DataError::MissingData {
                symbol: symbol.to_string(),
                reason: "No data returned from Yahoo Finance".to_string(),
            });
        }

        let mut bars: Vec<DailyBar> = quotes
            .iter()
            .map(|q| {
                let date = DateTime::<Utc>::from_timestamp(q.timestamp, 0)
                    .ok_or_else(|| {
                        DataError::TimeConversion(format!("Bad quote timestamp: {}", q.timestamp))
                    })?
                    .date_naive();
                Ok(DailyBar::new(date, q.close, q.volume))
            })
            .collect::<Result<_>>()?;

        bars.sort_by_key(|bar| bar.date);
        bars.dedup_by_key(|bar| bar.date);

        // Apply rate limiting
        sleep(self.rate_limit_delay).await;

        Ok(bars)
    }
}

impl Default for YahooBarProvider {
    fn default() -> Self {
        Self::new()
    }
}
