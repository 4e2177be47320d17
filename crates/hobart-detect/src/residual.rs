//! Market-model residuals and residual z-scores.
//!
//! For each aligned day the expected return is `beta * market_return` and
//! the residual is the portion the market model does not explain. Residual
//! statistics (population mean and standard deviation) are computed once
//! over the whole window, then z-scores in a second pass — one distribution
//! per window, not one per day.

use crate::align::AlignedDay;
use crate::stats;
use ndarray::Array1;
use serde::{Deserialize, Serialize};

/// Market-model decomposition of one aligned day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DayResidual {
    /// `beta * market_return`, in percent.
    pub expected_return: f64,
    /// `stock_return - expected_return`, in percent.
    pub residual_return: f64,
    /// Deviation of the residual from the window's mean residual, in units
    /// of the window's residual standard deviation. Zero when the window's
    /// residual standard deviation is zero.
    pub z_score: f64,
}

/// Decompose every aligned day against the market model.
///
/// Output order matches input order, one entry per day. With fewer than two
/// distinct residuals the standard deviation is zero and every z-score is
/// defined as zero; otherwise the emitted z-scores sum to numerically zero
/// across the window.
pub fn market_model_residuals(days: &[AlignedDay], beta: f64) -> Vec<DayResidual> {
    let residuals = Array1::from_iter(
        days.iter()
            .map(|day| day.stock_return - beta * day.market_return),
    );

    let mu = stats::mean(&residuals);
    let sigma = stats::std_dev(&residuals);

    days.iter()
        .zip(residuals.iter())
        .map(|(day, &residual_return)| DayResidual {
            expected_return: beta * day.market_return,
            residual_return,
            z_score: if sigma == 0.0 {
                0.0
            } else {
                (residual_return - mu) / sigma
            },
        })
        .collect()
}
