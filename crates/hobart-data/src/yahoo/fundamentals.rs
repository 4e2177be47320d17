//! Fundamentals-sourced beta from Yahoo Finance.
//!
//! The detector can run with a provider-supplied beta instead of the
//! locally estimated one. Yahoo publishes a (5y monthly) beta in its
//! quote-summary statistics; this provider fetches just that field.

use crate::error::{DataError, Result};
use std::time::Duration;
use tokio::time::sleep;

const QUOTE_SUMMARY_URL: &str = "https://query1.finance.yahoo.com/v10/finance/quoteSummary";

/// Yahoo Finance fundamentals provider with rate limiting.
#[derive(Debug)]
pub struct YahooFundamentalsProvider {
    client: reqwest::Client,
    rate_limit_delay: Duration,
}

impl YahooFundamentalsProvider {
    /// Create a new provider with default rate limiting (1 req/sec).
    pub fn new() -> Self {
        Self::with_rate_limit(Duration::from_millis(1000))
    }

    /// Create a new provider with custom rate limiting.
    pub fn with_rate_limit(rate_limit_delay: Duration) -> Self {
        Self {
            client: reqwest::Client::builder()
                .user_agent("Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7)")
                .build()
                .expect("Failed to create HTTP client"),
            rate_limit_delay,
        }
    }

    /// Fetch the provider-published beta for a symbol.
    ///
    /// Returns `None` when Yahoo has no beta for the symbol (common for
    /// indices, recent listings, and thinly covered names); callers fall
    /// back to the locally estimated coefficient.
    pub async fn fetch_beta(&self, symbol: &str) -> Result<Option<f64>> {
        if symbol.is_empty() {
            return Err(DataError::InvalidSymbol("Empty symbol".to_string()));
        }

        let url = format!("{QUOTE_SUMMARY_URL}/{symbol}?modules=summaryDetail");
        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(DataError::YahooApi(format!(
                "quoteSummary returned HTTP {}",
                response.status()
            )));
        }
        let body: serde_json::Value = response.json().await?;

        let beta = body
            .pointer("/quoteSummary/result/0/summaryDetail/beta/raw")
            .and_then(serde_json::Value::as_f64);

        sleep(self.rate_limit_delay).await;

        Ok(beta)
    }
}

impl Default for YahooFundamentalsProvider {
    fn default() -> Self {
        Self::new()
    }
}
