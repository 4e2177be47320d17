//! Anomaly flagging, kind, severity, and confidence.
//!
//! The thresholds here are deliberately simple, fixed constants so that
//! outputs stay reproducible and unit-testable. They are empirically chosen
//! screening defaults, not tuned or guaranteed-optimal values; anyone
//! substituting adaptive thresholds must update the test suite with them.

use crate::align::AlignedDay;
use crate::model::{AnomalyKind, Severity};
use crate::residual::DayResidual;
use serde::{Deserialize, Serialize};

/// A market move larger than this (percent, absolute) makes a quiet-residual
/// day market-correlated.
const MARKET_MOVE_THRESHOLD: f64 = 2.0;

/// A residual below this (percent, absolute) counts as quiet.
const QUIET_RESIDUAL_THRESHOLD: f64 = 1.0;

/// Market move (percent, absolute) above which an amplified residual is
/// hybrid rather than purely company-specific.
const HYBRID_MARKET_THRESHOLD: f64 = 1.0;

/// Residual (percent, absolute) above which a market-accompanied move is
/// hybrid.
const HYBRID_RESIDUAL_THRESHOLD: f64 = 2.0;

/// Screening thresholds for the classifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// Absolute residual z-score above which a day is anomalous
    /// (default: 1.5).
    pub z_score_threshold: f64,
    /// Volume ratio above which a day is anomalous (default: 2.0).
    pub volume_ratio_threshold: f64,
    /// Absolute z-score for high severity (default: 3.0).
    pub high_z_score: f64,
    /// Absolute residual percent for high severity (default: 5.0).
    pub high_residual: f64,
    /// Absolute z-score for medium severity (default: 2.0).
    pub medium_z_score: f64,
    /// Absolute residual percent for medium severity (default: 3.0).
    pub medium_residual: f64,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            z_score_threshold: 1.5,
            volume_ratio_threshold: 2.0,
            high_z_score: 3.0,
            high_residual: 5.0,
            medium_z_score: 2.0,
            medium_residual: 3.0,
        }
    }
}

/// Classification of one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    /// Whether the day crossed an anomaly threshold at all.
    pub is_anomaly: bool,
    /// Why the day is anomalous.
    pub kind: AnomalyKind,
    /// How severe the day is.
    pub severity: Severity,
    /// Presentation heuristic in `0..=95`: `min(95, 60 + |z| * 10)`. This is
    /// not a statistical confidence interval.
    pub confidence: u8,
}

/// Applies fixed thresholds to a day's residual and volume characteristics.
#[derive(Debug, Default)]
pub struct Classifier {
    config: ClassifierConfig,
}

impl Classifier {
    /// Create a new classifier.
    pub const fn new(config: ClassifierConfig) -> Self {
        Self { config }
    }

    /// Access the configuration.
    pub const fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    /// Classify one day. Pure: identical inputs always produce identical
    /// output.
    pub fn classify(
        &self,
        day: &AlignedDay,
        residual: &DayResidual,
        volume_ratio: f64,
    ) -> Classification {
        let z = residual.z_score.abs();
        let r = residual.residual_return.abs();
        let m = day.market_return.abs();

        let is_anomaly =
            z > self.config.z_score_threshold || volume_ratio > self.config.volume_ratio_threshold;

        let kind = if m > MARKET_MOVE_THRESHOLD && r < QUIET_RESIDUAL_THRESHOLD {
            AnomalyKind::MarketCorrelated
        } else if m > HYBRID_MARKET_THRESHOLD && r > HYBRID_RESIDUAL_THRESHOLD {
            AnomalyKind::Hybrid
        } else {
            AnomalyKind::CompanySpecific
        };

        let severity = if z > self.config.high_z_score || r > self.config.high_residual {
            Severity::High
        } else if z > self.config.medium_z_score || r > self.config.medium_residual {
            Severity::Medium
        } else {
            Severity::Low
        };

        let confidence = (60.0 + z * 10.0).clamp(0.0, 95.0) as u8;

        Classification {
            is_anomaly,
            kind,
            severity,
            confidence,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rstest::rstest;

    fn day(stock_return: f64, market_return: f64) -> AlignedDay {
        AlignedDay {
            date: NaiveDate::from_ymd_opt(2024, 5, 10).unwrap(),
            stock_return,
            market_return,
            volume: 1_000,
        }
    }

    fn residual(residual_return: f64, z_score: f64) -> DayResidual {
        DayResidual {
            expected_return: 0.0,
            residual_return,
            z_score,
        }
    }

    #[rstest]
    // Quiet day: nothing crosses a threshold.
    #[case(0.2, 0.1, 0.2, 0.3, 1.0, false)]
    // z-score alone flags.
    #[case(2.0, 0.0, 2.0, 1.6, 1.0, true)]
    // Volume alone flags.
    #[case(0.5, 0.0, 0.5, 0.2, 2.5, true)]
    // Exactly at the thresholds does not flag (strict inequality).
    #[case(1.0, 0.0, 1.0, 1.5, 2.0, false)]
    fn test_anomaly_gate(
        #[case] stock: f64,
        #[case] market: f64,
        #[case] resid: f64,
        #[case] z: f64,
        #[case] ratio: f64,
        #[case] expected: bool,
    ) {
        let c = Classifier::default().classify(&day(stock, market), &residual(resid, z), ratio);
        assert_eq!(c.is_anomaly, expected);
    }

    #[test]
    fn test_market_correlated_kind() {
        // Big market day, residual quiet once beta is accounted for.
        let c = Classifier::default().classify(&day(3.0, 3.0), &residual(0.1, 0.2), 1.0);
        assert_eq!(c.kind, AnomalyKind::MarketCorrelated);
    }

    #[test]
    fn test_hybrid_kind() {
        // Market moved, and the stock moved well beyond beta's share.
        let c = Classifier::default().classify(&day(5.5, 1.5), &residual(4.0, 2.5), 1.0);
        assert_eq!(c.kind, AnomalyKind::Hybrid);
    }

    #[test]
    fn test_company_specific_is_the_default_kind() {
        let c = Classifier::default().classify(&day(12.0, 0.5), &residual(11.5, 4.0), 3.0);
        assert_eq!(c.kind, AnomalyKind::CompanySpecific);
    }

    #[rstest]
    #[case(11.0, 4.0, Severity::High)] // both gates
    #[case(6.0, 1.0, Severity::High)] // residual gate alone
    #[case(1.0, 3.5, Severity::High)] // z gate alone
    #[case(3.5, 1.0, Severity::Medium)]
    #[case(1.0, 2.5, Severity::Medium)]
    #[case(1.0, 1.8, Severity::Low)]
    fn test_severity_cascade(#[case] resid: f64, #[case] z: f64, #[case] expected: Severity) {
        let c = Classifier::default().classify(&day(resid, 0.0), &residual(resid, z), 1.0);
        assert_eq!(c.severity, expected);
    }

    #[rstest]
    #[case(0.0, 60)]
    #[case(1.5, 75)]
    #[case(3.5, 95)] // clamped
    #[case(10.0, 95)] // clamped
    fn test_confidence_heuristic(#[case] z: f64, #[case] expected: u8) {
        let c = Classifier::default().classify(&day(1.0, 0.0), &residual(1.0, z), 1.0);
        assert_eq!(c.confidence, expected);
    }

    #[test]
    fn test_classification_is_deterministic() {
        let classifier = Classifier::default();
        let d = day(4.2, 1.1);
        let r = residual(3.1, 2.2);
        let first = classifier.classify(&d, &r, 1.9);
        for _ in 0..10 {
            assert_eq!(classifier.classify(&d, &r, 1.9), first);
        }
    }

    #[test]
    fn test_negative_z_counts_by_magnitude() {
        let c = Classifier::default().classify(&day(-8.0, 0.0), &residual(-8.0, -3.5), 1.0);
        assert!(c.is_anomaly);
        assert_eq!(c.severity, Severity::High);
        assert_eq!(c.confidence, 95);
    }
}
