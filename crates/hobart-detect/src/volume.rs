//! Trailing-baseline volume ratios.
//!
//! Each day's volume is compared against the mean volume of the days that
//! precede it in the window (the current day is excluded from its own
//! baseline). The first day has no history and gets a neutral ratio.

use crate::align::AlignedDay;
use serde::{Deserialize, Serialize};

/// Configuration for the volume baseline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VolumeConfig {
    /// Maximum number of preceding days in the baseline (default: 20).
    pub baseline_days: usize,
}

impl Default for VolumeConfig {
    fn default() -> Self {
        Self { baseline_days: 20 }
    }
}

/// Compute the volume ratio for every day of an ascending window.
///
/// For the day at index `i` the baseline is the mean volume of the
/// preceding `min(baseline_days, i)` days. The ratio is neutral (`1.0`)
/// when there are no preceding days or the baseline is zero, so a day can
/// never be flagged by volume alone without history.
pub fn volume_ratios(days: &[AlignedDay], config: &VolumeConfig) -> Vec<f64> {
    days.iter()
        .enumerate()
        .map(|(i, day)| {
            let lookback = config.baseline_days.min(i);
            if lookback == 0 {
                return 1.0;
            }

            let window = &days[i - lookback..i];
            let baseline =
                window.iter().map(|d| d.volume as f64).sum::<f64>() / lookback as f64;
            if baseline == 0.0 {
                1.0
            } else {
                day.volume as f64 / baseline
            }
        })
        .collect()
}
