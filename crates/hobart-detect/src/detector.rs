//! Detection pipeline orchestration.
//!
//! Wires alignment, beta estimation, residual analysis, volume baselines,
//! classification, sequence encoding, and ranking into one pure pass over a
//! window of bars. Detection runs hold no state between invocations, so a
//! caller may run many symbols concurrently, one independent task per
//! symbol.

use crate::align::{self, AlignedDay};
use crate::beta::{BetaConfig, BetaEstimator};
use crate::classify::{Classification, Classifier, ClassifierConfig};
use crate::model::{AnomalyEvent, DailyBar, Diagnostics};
use crate::rank::{self, DEFAULT_MAX_RESULTS};
use crate::residual;
use crate::sequence;
use crate::volume::{self, VolumeConfig};
use serde::{Deserialize, Serialize};

/// Default calendar lookback a caller should fetch bars for.
pub const DEFAULT_LOOKBACK_DAYS: u32 = 90;

/// Default cap on aligned trading days used for the regression window.
pub const DEFAULT_REGRESSION_DAYS: usize = 60;

/// Configuration for a detection run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectorConfig {
    /// Most-recent aligned days kept for analysis (default: 60).
    pub regression_days: usize,
    /// Maximum events returned (default: 6).
    pub max_results: usize,
    /// Beta estimation settings.
    pub beta: BetaConfig,
    /// Volume baseline settings.
    pub volume: VolumeConfig,
    /// Classification thresholds.
    pub classifier: ClassifierConfig,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            regression_days: DEFAULT_REGRESSION_DAYS,
            max_results: DEFAULT_MAX_RESULTS,
            beta: BetaConfig::default(),
            volume: VolumeConfig::default(),
            classifier: ClassifierConfig::default(),
        }
    }
}

/// Result of one detection run: ranked events plus the diagnostics a caller
/// needs to tell "nothing anomalous" from "not enough data".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    /// Flagged days, most recent first, capped at the configured maximum.
    pub events: Vec<AnomalyEvent>,
    /// Window and beta provenance for this run.
    pub diagnostics: Diagnostics,
}

/// Beta-adjusted anomaly detector over paired daily bar series.
#[derive(Debug, Default)]
pub struct AnomalyDetector {
    config: DetectorConfig,
}

impl AnomalyDetector {
    /// Create a detector with the given configuration.
    pub const fn new(config: DetectorConfig) -> Self {
        Self { config }
    }

    /// Access the configuration.
    pub const fn config(&self) -> &DetectorConfig {
        &self.config
    }

    /// Run the full pipeline over one security's bars and the benchmark's
    /// bars.
    ///
    /// Both inputs may be unordered; invalid bars are dropped during
    /// alignment. Only the most recent `regression_days` aligned days are
    /// analyzed. A `beta_override` (e.g. a fundamentals-provider beta)
    /// replaces the locally estimated coefficient for the whole run.
    ///
    /// Never fails: degenerate inputs produce an empty event list and
    /// diagnostics describing the degeneracy.
    pub fn detect(
        &self,
        stock_bars: &[DailyBar],
        market_bars: &[DailyBar],
        beta_override: Option<f64>,
    ) -> Detection {
        let mut aligned = align::align(stock_bars, market_bars);
        if aligned.len() > self.config.regression_days {
            aligned.drain(..aligned.len() - self.config.regression_days);
        }

        let estimate =
            BetaEstimator::new(self.config.beta.clone()).estimate(&aligned, beta_override);
        let beta = estimate.value;

        let residuals = residual::market_model_residuals(&aligned, beta);
        let ratios = volume::volume_ratios(&aligned, &self.config.volume);
        let classifier = Classifier::new(self.config.classifier.clone());

        let events = aligned
            .iter()
            .zip(residuals.iter())
            .zip(ratios.iter())
            .enumerate()
            .filter_map(|(index, ((day, day_residual), &volume_ratio))| {
                let classification = classifier.classify(day, day_residual, volume_ratio);
                classification.is_anomaly.then(|| {
                    build_event(
                        index,
                        aligned.len(),
                        day,
                        day_residual,
                        volume_ratio,
                        beta,
                        &classification,
                    )
                })
            })
            .collect();

        Detection {
            events: rank::rank(events, self.config.max_results),
            diagnostics: Diagnostics {
                window_size: aligned.len(),
                computed_beta: estimate.computed,
                beta,
                beta_source: estimate.source,
            },
        }
    }
}

/// Assemble one event from the per-day pipeline outputs.
fn build_event(
    index: usize,
    window_len: usize,
    day: &AlignedDay,
    day_residual: &residual::DayResidual,
    volume_ratio: f64,
    beta: f64,
    classification: &Classification,
) -> AnomalyEvent {
    AnomalyEvent {
        id: format!("{}-{}", day.date, index),
        date: day.date,
        kind: classification.kind,
        severity: classification.severity,
        sequence: sequence::encode(day.stock_return, day_residual.residual_return, volume_ratio),
        stock_return: day.stock_return,
        market_return: day.market_return,
        expected_return: day_residual.expected_return,
        residual_return: day_residual.residual_return,
        beta,
        z_score: day_residual.z_score,
        volume_ratio,
        confidence: classification.confidence,
        position: index as f64 * 100.0 / (window_len - 1).max(1) as f64,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AnomalyKind, BetaSource, Severity};
    use approx::assert_abs_diff_eq;
    use chrono::NaiveDate;

    /// Build consecutive-day bars from a starting close and a list of
    /// percent returns. `n` returns produce `n + 1` bars.
    fn bars_from_returns(start_close: f64, returns: &[(f64, u64)]) -> Vec<DailyBar> {
        let start_date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let mut bars = vec![DailyBar::new(start_date, start_close, 1_000)];
        let mut close = start_close;
        for (i, &(pct, volume)) in returns.iter().enumerate() {
            close *= 1.0 + pct / 100.0;
            bars.push(DailyBar::new(
                start_date + chrono::Days::new(i as u64 + 1),
                close,
                volume,
            ));
        }
        bars
    }

    #[test]
    fn test_company_specific_spike_end_to_end() {
        // 60 aligned days; day index 30 has stock +12%, market +1%, triple
        // volume. Everything else is flat. Beta is supplied as 1.0.
        let mut stock_returns = vec![(0.0, 1_000u64); 60];
        let mut market_returns = vec![(0.0, 0u64); 60];
        stock_returns[30] = (12.0, 3_000);
        market_returns[30] = (1.0, 0);

        let stock = bars_from_returns(100.0, &stock_returns);
        let market = bars_from_returns(50.0, &market_returns);

        let detection = AnomalyDetector::default().detect(&stock, &market, Some(1.0));
        assert_eq!(detection.diagnostics.window_size, 60);
        assert_eq!(detection.diagnostics.beta_source, BetaSource::Override);

        assert_eq!(detection.events.len(), 1);
        let event = &detection.events[0];
        assert_eq!(event.kind, AnomalyKind::CompanySpecific);
        assert_eq!(event.severity, Severity::High);
        assert_eq!(event.confidence, 95);
        assert_abs_diff_eq!(event.stock_return, 12.0, epsilon = 1e-9);
        assert_abs_diff_eq!(event.market_return, 1.0, epsilon = 1e-9);
        assert_abs_diff_eq!(event.expected_return, 1.0, epsilon = 1e-9);
        assert_abs_diff_eq!(event.residual_return, 11.0, epsilon = 1e-9);
        assert_abs_diff_eq!(event.volume_ratio, 3.0, epsilon = 1e-9);
        assert_eq!(event.sequence, "SPK-RHI-VHI");
        // Day 30 of indices 0..=59.
        assert_abs_diff_eq!(event.position, 3_000.0 / 59.0, epsilon = 1e-9);
        assert_eq!(event.id, format!("{}-30", event.date));
    }

    #[test]
    fn test_market_correlated_day_end_to_end() {
        // Stock tracks the market exactly (beta estimates to 1), one broad
        // +3% day on triple volume: the event is market-correlated.
        let mut stock_returns: Vec<(f64, u64)> = (0..30)
            .map(|i| (((i as f64) * 0.9).sin() * 0.4, 1_000))
            .collect();
        let mut market_returns = stock_returns.clone();
        stock_returns[20] = (3.0, 3_000);
        market_returns[20] = (3.0, 0);

        // Identical starting closes keep the two return series bitwise
        // identical, so every residual is exactly zero.
        let stock = bars_from_returns(100.0, &stock_returns);
        let market = bars_from_returns(100.0, &market_returns);

        let detection = AnomalyDetector::default().detect(&stock, &market, None);
        assert_eq!(detection.diagnostics.beta_source, BetaSource::Computed);
        assert_abs_diff_eq!(detection.diagnostics.beta, 1.0, epsilon = 1e-9);

        assert_eq!(detection.events.len(), 1);
        let event = &detection.events[0];
        assert_eq!(event.kind, AnomalyKind::MarketCorrelated);
        assert!(event.residual_return.abs() < 1e-9);
    }

    #[test]
    fn test_insufficient_data_yields_empty_with_diagnostics() {
        let stock = bars_from_returns(100.0, &[(1.0, 1_000)]);
        let market: Vec<DailyBar> = Vec::new();

        let detection = AnomalyDetector::default().detect(&stock, &market, None);
        assert!(detection.events.is_empty());
        assert_eq!(detection.diagnostics.window_size, 0);
        assert!(detection.diagnostics.used_default_beta());
        assert_eq!(detection.diagnostics.beta, 1.0);
    }

    #[test]
    fn test_window_is_capped_to_regression_days() {
        let returns: Vec<(f64, u64)> = (0..80).map(|_| (0.1, 1_000)).collect();
        let stock = bars_from_returns(100.0, &returns);
        let market = bars_from_returns(50.0, &returns);

        let detection = AnomalyDetector::default().detect(&stock, &market, None);
        assert_eq!(detection.diagnostics.window_size, DEFAULT_REGRESSION_DAYS);
    }

    #[test]
    fn test_events_are_capped_and_newest_first() {
        // Alternate violent idiosyncratic days so more than max_results
        // days flag.
        let mut stock_returns = vec![(0.0, 1_000u64); 59];
        for i in (4..59).step_by(5) {
            stock_returns[i] = (9.0, 4_000);
        }
        let market_returns = vec![(0.0, 0u64); 59];

        let stock = bars_from_returns(100.0, &stock_returns);
        let market = bars_from_returns(50.0, &market_returns);

        let detection = AnomalyDetector::default().detect(&stock, &market, Some(1.0));
        assert_eq!(detection.events.len(), DEFAULT_MAX_RESULTS);
        assert!(
            detection
                .events
                .windows(2)
                .all(|pair| pair[0].date > pair[1].date)
        );
    }

    #[test]
    fn test_repeated_runs_produce_identical_ids() {
        let mut stock_returns = vec![(0.0, 1_000u64); 40];
        stock_returns[25] = (8.0, 5_000);
        let market_returns = vec![(0.0, 0u64); 40];

        let stock = bars_from_returns(100.0, &stock_returns);
        let market = bars_from_returns(50.0, &market_returns);

        let detector = AnomalyDetector::default();
        let first = detector.detect(&stock, &market, Some(1.0));
        let second = detector.detect(&stock, &market, Some(1.0));
        assert_eq!(first, second);
    }
}
