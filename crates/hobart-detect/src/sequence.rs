//! Symbolic sequence encoding.
//!
//! Maps an anomaly's numeric characteristics onto a short, stable
//! fingerprint for compact display and storage. The encoding is a total,
//! deterministic function over a closed 4 x 3 x 3 bucket space: two
//! anomalies in the same buckets always share a string, two anomalies in
//! different buckets never collide. The tokens carry no meaning beyond
//! being visually distinct.
//!
//! Token table (three dash-joined groups):
//!
//! | Group | Bucket | Token |
//! |-------|--------|-------|
//! | stock return | > +5% | `SPK` |
//! | | > 0% | `UP` |
//! | | < -5% | `PLG` |
//! | | otherwise | `DIP` |
//! | abs residual | > 3% | `RHI` |
//! | | > 1% | `RMD` |
//! | | otherwise | `RLO` |
//! | volume ratio | > 2.0 | `VHI` |
//! | | > 1.5 | `VMD` |
//! | | otherwise | `VLO` |

/// Encode a day's characteristics as a three-group fingerprint, e.g.
/// `SPK-RHI-VHI`.
pub fn encode(stock_return: f64, residual_return: f64, volume_ratio: f64) -> String {
    format!(
        "{}-{}-{}",
        direction_token(stock_return),
        residual_token(residual_return),
        volume_token(volume_ratio)
    )
}

/// Return direction/magnitude bucket.
const fn direction_token(stock_return: f64) -> &'static str {
    if stock_return > 5.0 {
        "SPK"
    } else if stock_return > 0.0 {
        "UP"
    } else if stock_return < -5.0 {
        "PLG"
    } else {
        "DIP"
    }
}

/// Idiosyncratic-magnitude bucket.
const fn residual_token(residual_return: f64) -> &'static str {
    let magnitude = residual_return.abs();
    if magnitude > 3.0 {
        "RHI"
    } else if magnitude > 1.0 {
        "RMD"
    } else {
        "RLO"
    }
}

/// Volume-magnitude bucket.
const fn volume_token(volume_ratio: f64) -> &'static str {
    if volume_ratio > 2.0 {
        "VHI"
    } else if volume_ratio > 1.5 {
        "VMD"
    } else {
        "VLO"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(12.0, 11.0, 3.0, "SPK-RHI-VHI")]
    #[case(2.0, 1.5, 1.7, "UP-RMD-VMD")]
    #[case(-8.0, -4.0, 1.0, "PLG-RHI-VLO")]
    #[case(-2.0, -0.5, 1.0, "DIP-RLO-VLO")]
    #[case(0.0, 0.0, 0.0, "DIP-RLO-VLO")]
    fn test_encoding_table(
        #[case] stock: f64,
        #[case] resid: f64,
        #[case] ratio: f64,
        #[case] expected: &str,
    ) {
        assert_eq!(encode(stock, resid, ratio), expected);
    }

    #[test]
    fn test_same_buckets_collide_different_buckets_do_not() {
        // Same buckets, different raw values.
        assert_eq!(encode(6.0, 3.5, 2.5), encode(40.0, 9.9, 7.0));
        // Nudging any one value into a neighbor bucket changes the string.
        assert_ne!(encode(6.0, 3.5, 2.5), encode(4.0, 3.5, 2.5));
        assert_ne!(encode(6.0, 3.5, 2.5), encode(6.0, 2.5, 2.5));
        assert_ne!(encode(6.0, 3.5, 2.5), encode(6.0, 3.5, 1.8));
    }

    #[test]
    fn test_every_bucket_combination_is_distinct() {
        // One representative value per bucket of each group.
        let stocks = [6.0, 1.0, -6.0, -1.0];
        let residuals = [4.0, 2.0, 0.5];
        let ratios = [2.5, 1.8, 1.0];

        let mut seen = std::collections::HashSet::new();
        for &s in &stocks {
            for &r in &residuals {
                for &v in &ratios {
                    assert!(seen.insert(encode(s, r, v)));
                }
            }
        }
        assert_eq!(seen.len(), 36);
    }

    #[test]
    fn test_residual_sign_is_ignored() {
        assert_eq!(encode(1.0, 4.0, 1.0), encode(1.0, -4.0, 1.0));
    }
}
