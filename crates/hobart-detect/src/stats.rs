//! Population statistics over return series.
//!
//! All moments here divide by `N`, not `N - 1`. The detector uses population
//! covariance and variance throughout so that beta, residual mean, and
//! residual standard deviation are internally consistent; this is a known
//! source of small floating-point disagreement with implementations that use
//! sample moments.

use ndarray::Array1;

/// Population mean. Zero for an empty series.
pub fn mean(series: &Array1<f64>) -> f64 {
    series.mean().unwrap_or(0.0)
}

/// Population variance (divide by `N`). Zero for an empty series.
pub fn variance(series: &Array1<f64>) -> f64 {
    if series.is_empty() {
        return 0.0;
    }
    let mu = mean(series);
    series.iter().map(|&x| (x - mu).powi(2)).sum::<f64>() / series.len() as f64
}

/// Population standard deviation.
pub fn std_dev(series: &Array1<f64>) -> f64 {
    variance(series).sqrt()
}

/// Population covariance of two equal-length series (divide by `N`).
///
/// Zero when the series are empty or their lengths differ.
pub fn covariance(xs: &Array1<f64>, ys: &Array1<f64>) -> f64 {
    if xs.is_empty() || xs.len() != ys.len() {
        return 0.0;
    }
    let mx = mean(xs);
    let my = mean(ys);
    xs.iter()
        .zip(ys.iter())
        .map(|(&x, &y)| (x - mx) * (y - my))
        .sum::<f64>()
        / xs.len() as f64
}
