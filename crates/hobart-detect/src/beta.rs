//! Market-model beta estimation.
//!
//! Beta measures the sensitivity of a security's returns to benchmark
//! returns under a single-factor linear model:
//!
//! `beta = cov(stock_returns, market_returns) / var(market_returns)`
//!
//! Both moments are population moments (divide by `N`, see [`crate::stats`]).
//! This is a heuristic screening tool and must degrade gracefully: a window
//! that is too short, or one with zero market variance, falls back to a
//! default beta instead of failing.

use crate::align::AlignedDay;
use crate::model::BetaSource;
use crate::stats;
use ndarray::Array1;
use serde::{Deserialize, Serialize};

/// Configuration for the beta estimator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BetaConfig {
    /// Minimum aligned observations required for estimation (default: 20).
    pub min_observations: usize,
    /// Beta used when the window is degenerate (default: 1.0).
    pub fallback_beta: f64,
}

impl Default for BetaConfig {
    fn default() -> Self {
        Self {
            min_observations: 20,
            fallback_beta: 1.0,
        }
    }
}

/// Outcome of one beta estimation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BetaEstimate {
    /// Beta applied downstream.
    pub value: f64,
    /// Beta estimated from the window, kept for diagnostics even when an
    /// override replaces it.
    pub computed: Option<f64>,
    /// Provenance of `value`.
    pub source: BetaSource,
}

/// Estimates beta from an aligned-return window, honoring caller overrides.
#[derive(Debug, Default)]
pub struct BetaEstimator {
    config: BetaConfig,
}

impl BetaEstimator {
    /// Create a new estimator.
    pub const fn new(config: BetaConfig) -> Self {
        Self { config }
    }

    /// Access the configuration.
    pub const fn config(&self) -> &BetaConfig {
        &self.config
    }

    /// Estimate beta over the full aligned window.
    ///
    /// A non-null `override_beta` (e.g. a fundamentals-provider beta)
    /// replaces the computed value for all downstream steps; the computed
    /// value is still reported when the window supports estimation.
    ///
    /// # Arguments
    /// * `days` - Aligned return window, any order
    /// * `override_beta` - Externally sourced beta, if any
    pub fn estimate(&self, days: &[AlignedDay], override_beta: Option<f64>) -> BetaEstimate {
        let computed = self.compute(days);

        match override_beta {
            Some(value) => BetaEstimate {
                value,
                computed,
                source: BetaSource::Override,
            },
            None => computed.map_or(
                BetaEstimate {
                    value: self.config.fallback_beta,
                    computed: None,
                    source: BetaSource::DefaultFallback,
                },
                |value| BetaEstimate {
                    value,
                    computed,
                    source: BetaSource::Computed,
                },
            ),
        }
    }

    /// Compute beta from the window, or `None` when the window is
    /// degenerate.
    fn compute(&self, days: &[AlignedDay]) -> Option<f64> {
        if days.len() < self.config.min_observations {
            return None;
        }

        let stock = Array1::from_iter(days.iter().map(|d| d.stock_return));
        let market = Array1::from_iter(days.iter().map(|d| d.market_return));

        let market_variance = stats::variance(&market);
        if market_variance == 0.0 {
            return None;
        }

        Some(stats::covariance(&stock, &market) / market_variance)
    }
}
