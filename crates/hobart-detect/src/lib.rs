#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/hobartlabs/hobart/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod align;
pub mod beta;
pub mod classify;
pub mod detector;
pub mod model;
pub mod rank;
pub mod residual;
pub mod sequence;
pub mod stats;
pub mod volume;

// Re-export main types
pub use align::{AlignedDay, align};
pub use beta::{BetaConfig, BetaEstimate, BetaEstimator};
pub use classify::{Classification, Classifier, ClassifierConfig};
pub use detector::{AnomalyDetector, Detection, DetectorConfig};
pub use model::{AnomalyEvent, AnomalyKind, BetaSource, DailyBar, Diagnostics, Severity};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
