//! Data pipeline for fetching detection windows.
//!
//! Fetches daily bars for a security and its benchmark over the lookback
//! window, checking the SQLite cache before hitting Yahoo Finance. Multi-
//! symbol scans fan out with bounded concurrency; each symbol's detection
//! is independent, so no ordering between them matters.

use super::cache_manager;
use chrono::{DateTime, NaiveDate, Utc};
use futures::stream::{self, StreamExt};
use hobart_detect::{AnomalyDetector, DailyBar, Detection};
use indicatif::ProgressBar;

/// Error type for data pipeline operations.
#[derive(Debug, thiserror::Error)]
pub(crate) enum DataPipelineError {
    /// Data fetch error from Yahoo.
    #[error("Data fetch error: {0}")]
    Fetch(#[from] hobart_data::error::DataError),
}

/// Configuration for data fetching.
#[derive(Debug, Clone)]
pub(crate) struct FetchConfig {
    /// Whether to use the cache.
    pub use_cache: bool,
    /// Whether to force refresh (ignore cache).
    pub force_refresh: bool,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            use_cache: true,
            force_refresh: false,
        }
    }
}

/// Default number of concurrent fetches during a scan.
const DEFAULT_CONCURRENCY: usize = 5;

/// Convert DateTime<Utc> to NaiveDate for cache lookups.
fn to_naive_date(dt: DateTime<Utc>) -> NaiveDate {
    dt.date_naive()
}

/// Fetch a single symbol's bars with caching support.
pub(crate) async fn fetch_symbol_bars(
    provider: &hobart_data::yahoo::YahooBarProvider,
    symbol: &str,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    config: &FetchConfig,
) -> Result<Vec<DailyBar>, DataPipelineError> {
    let start_date = to_naive_date(start);
    let end_date = to_naive_date(end);

    // Try cache first if enabled
    if config.use_cache
        && !config.force_refresh
        && let Ok(cache) = cache_manager::open_cache()
        && cache.has_bars(symbol, start_date, end_date).unwrap_or(false)
        && let Ok(bars) = cache.get_bars(symbol, start_date, end_date)
    {
        return Ok(bars);
    }

    // Fetch from Yahoo
    let bars = provider.fetch_daily_bars(symbol, start, end).await?;

    // Cache the result
    if config.use_cache
        && let Ok(cache) = cache_manager::open_cache()
        && let Err(e) = cache.put_bars(symbol, &bars)
    {
        eprintln!("Warning: Failed to cache bars for {}: {}", symbol, e);
    }

    Ok(bars)
}

/// One symbol's outcome within a scan.
pub(crate) struct ScanOutcome {
    /// Scanned symbol.
    pub symbol: String,
    /// Detection result, or the fetch error that prevented one.
    pub result: Result<Detection, DataPipelineError>,
}

/// Run detections for many symbols against one pre-fetched benchmark
/// window.
///
/// Fetches fan out with bounded concurrency; the detector itself is pure
/// and runs inline once a symbol's bars arrive. Failed symbols surface in
/// their outcome rather than aborting the scan.
#[allow(clippy::too_many_arguments)]
pub(crate) async fn scan_symbols(
    provider: &hobart_data::yahoo::YahooBarProvider,
    detector: &AnomalyDetector,
    symbols: &[String],
    benchmark_bars: &[DailyBar],
    beta_override: Option<f64>,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    config: &FetchConfig,
    progress: Option<&ProgressBar>,
) -> Vec<ScanOutcome> {
    let mut outcomes: Vec<ScanOutcome> = stream::iter(symbols.iter().cloned())
        .map(|symbol| async move {
            let result = fetch_symbol_bars(provider, &symbol, start, end, config)
                .await
                .map(|bars| detector.detect(&bars, benchmark_bars, beta_override));
            if let Some(pb) = progress {
                pb.inc(1);
            }
            ScanOutcome { symbol, result }
        })
        .buffer_unordered(DEFAULT_CONCURRENCY)
        .collect()
        .await;

    outcomes.sort_by(|a, b| a.symbol.cmp(&b.symbol));
    outcomes
}
