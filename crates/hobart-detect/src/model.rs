//! Core data model for anomaly detection.
//!
//! Input bars, output events, and the diagnostic values a caller needs to
//! distinguish "nothing anomalous" from "not enough data".

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One trading day of one instrument, as retrieved from a data provider.
///
/// Immutable once retrieved. Bars with a non-positive or non-finite close are
/// rejected at alignment; `volume` is unsigned, so negative volume is
/// unrepresentable by construction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyBar {
    /// Calendar date (unique per instrument).
    pub date: NaiveDate,
    /// Closing price.
    pub close: f64,
    /// Share volume.
    pub volume: u64,
}

impl DailyBar {
    /// Create a new daily bar.
    pub const fn new(date: NaiveDate, close: f64, volume: u64) -> Self {
        Self {
            date,
            close,
            volume,
        }
    }

    /// Whether this bar is usable for return computation.
    pub const fn is_valid(&self) -> bool {
        self.close.is_finite() && self.close > 0.0
    }
}

/// Why a day was flagged as anomalous.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnomalyKind {
    /// Idiosyncratic move not explained by market exposure.
    CompanySpecific,
    /// The move tracks a large market move and is unremarkable once beta
    /// exposure is accounted for.
    MarketCorrelated,
    /// The market moved, but the security moved well beyond what beta alone
    /// explains.
    Hybrid,
}

impl fmt::Display for AnomalyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CompanySpecific => write!(f, "company_specific"),
            Self::MarketCorrelated => write!(f, "market_correlated"),
            Self::Hybrid => write!(f, "hybrid"),
        }
    }
}

/// Severity bucket for an anomalous day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// `|z| > 3` or `|residual| > 5%`.
    High,
    /// `|z| > 2` or `|residual| > 3%`.
    Medium,
    /// Everything else that still crossed the anomaly threshold.
    Low,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::High => write!(f, "high"),
            Self::Medium => write!(f, "medium"),
            Self::Low => write!(f, "low"),
        }
    }
}

/// Provenance of the beta used in a detection run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BetaSource {
    /// Estimated from the aligned window by [`crate::BetaEstimator`].
    Computed,
    /// The window was degenerate (too short, or zero market variance) and
    /// the default fell in.
    DefaultFallback,
    /// Supplied by the caller, e.g. from a fundamentals provider.
    Override,
}

/// One detected anomaly.
///
/// Events are created fresh on every detection run and never mutated. The
/// `id` is derived from the date and the day's index within the window, so
/// repeated runs over the same input produce the same ids.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnomalyEvent {
    /// Stable identifier: `<date>-<window index>`.
    pub id: String,
    /// Calendar date of the anomalous day. Downstream news-correlation
    /// collaborators join on this field.
    pub date: NaiveDate,
    /// Classification of the move.
    #[serde(rename = "type")]
    pub kind: AnomalyKind,
    /// Severity bucket.
    pub severity: Severity,
    /// Deterministic symbolic fingerprint, see [`crate::sequence`].
    pub sequence: String,
    /// The security's return that day, in percent.
    pub stock_return: f64,
    /// The benchmark's return that day, in percent.
    pub market_return: f64,
    /// `beta * market_return`, in percent.
    pub expected_return: f64,
    /// `stock_return - expected_return`, in percent.
    pub residual_return: f64,
    /// Beta used for this run (shared across all events of the run).
    pub beta: f64,
    /// Residual z-score relative to the window's residual distribution.
    pub z_score: f64,
    /// Same-day volume over the trailing baseline volume.
    pub volume_ratio: f64,
    /// Presentation heuristic in `0..=95`, not a statistical confidence
    /// interval.
    pub confidence: u8,
    /// Fractional index within the window, `0` = oldest day, `100` = most
    /// recent. Used only for visual placement.
    pub position: f64,
}

/// Diagnostics for one detection run.
///
/// An empty event list with a small `window_size` means "not enough data",
/// not "nothing anomalous".
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostics {
    /// Number of aligned trading days actually analyzed.
    pub window_size: usize,
    /// Beta estimated from the window, when the window supported estimation.
    pub computed_beta: Option<f64>,
    /// Beta applied to the market model.
    pub beta: f64,
    /// Where the applied beta came from.
    pub beta_source: BetaSource,
}

impl Diagnostics {
    /// Whether the run fell back to the default beta.
    pub const fn used_default_beta(&self) -> bool {
        matches!(self.beta_source, BetaSource::DefaultFallback)
    }
}
