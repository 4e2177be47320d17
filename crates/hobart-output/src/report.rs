//! Report generation for anomaly detections.

use chrono::NaiveDate;
use hobart_detect::{Detection, Diagnostics};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A detection run packaged for presentation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnomalyReport {
    /// Symbol that was analyzed.
    pub symbol: String,
    /// Benchmark symbol used for the market model.
    pub benchmark: String,
    /// Start of the analysis period.
    pub period_start: NaiveDate,
    /// End of the analysis period.
    pub period_end: NaiveDate,
    /// The detection result.
    pub detection: Detection,
}

impl AnomalyReport {
    /// Create a new report.
    pub fn new(
        symbol: impl Into<String>,
        benchmark: impl Into<String>,
        period_start: NaiveDate,
        period_end: NaiveDate,
        detection: Detection,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            benchmark: benchmark.into(),
            period_start,
            period_end,
            detection,
        }
    }

    /// Shorthand for the run's diagnostics.
    pub const fn diagnostics(&self) -> &Diagnostics {
        &self.detection.diagnostics
    }

    /// Format as a fixed-width table for terminal display.
    pub fn to_ascii_table(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "Anomalies for {} vs {} ({} to {})\n",
            self.symbol, self.benchmark, self.period_start, self.period_end
        ));
        output.push_str(&self.diagnostics_line());
        output.push('\n');

        if self.detection.events.is_empty() {
            output.push_str("No anomalies detected.\n");
            return output;
        }

        output.push_str(&format!(
            "{:<12} {:<17} {:<8} {:>8} {:>9} {:>8} {:>7} {:>6} {:<14}\n",
            "Date", "Type", "Severity", "Return", "Residual", "Z-Score", "Volume", "Conf", "Sequence"
        ));
        output.push_str(&"-".repeat(96));
        output.push('\n');

        for event in &self.detection.events {
            output.push_str(&format!(
                "{:<12} {:<17} {:<8} {:>7.2}% {:>8.2}% {:>8.2} {:>6.1}x {:>5}% {:<14}\n",
                event.date.to_string(),
                event.kind.to_string(),
                event.severity.to_string(),
                event.stock_return,
                event.residual_return,
                event.z_score,
                event.volume_ratio,
                event.confidence,
                event.sequence
            ));
        }

        output
    }

    /// Format as a Markdown document.
    pub fn to_markdown(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!("# Anomaly Report: {}\n\n", self.symbol));
        output.push_str(&format!(
            "**Benchmark:** {} | **Period:** {} to {}\n\n",
            self.benchmark, self.period_start, self.period_end
        ));
        output.push_str(&format!("{}\n\n", self.diagnostics_line()));

        if self.detection.events.is_empty() {
            output.push_str("No anomalies detected.\n");
            return output;
        }

        output.push_str(
            "| Date | Type | Severity | Return | Residual | Z-Score | Volume | Confidence | Sequence |\n",
        );
        output.push_str(
            "|------|------|----------|--------|----------|---------|--------|------------|----------|\n",
        );

        for event in &self.detection.events {
            output.push_str(&format!(
                "| {} | {} | {} | {:.2}% | {:.2}% | {:.2} | {:.1}x | {}% | `{}` |\n",
                event.date,
                event.kind,
                event.severity,
                event.stock_return,
                event.residual_return,
                event.z_score,
                event.volume_ratio,
                event.confidence,
                event.sequence
            ));
        }

        output
    }

    /// One-line summary of window size and beta provenance.
    fn diagnostics_line(&self) -> String {
        let diag = self.diagnostics();
        let beta = match diag.computed_beta {
            Some(computed) if (computed - diag.beta).abs() > f64::EPSILON => {
                format!("beta {:.2} ({:?}, computed {:.2})", diag.beta, diag.beta_source, computed)
            }
            _ => format!("beta {:.2} ({:?})", diag.beta, diag.beta_source),
        };
        format!(
            "Window: {} aligned trading days | {}",
            diag.window_size, beta
        )
    }
}

impl fmt::Display for AnomalyReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_ascii_table())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hobart_detect::{AnomalyEvent, AnomalyKind, BetaSource, Severity};

    fn sample_report(events: Vec<AnomalyEvent>) -> AnomalyReport {
        AnomalyReport::new(
            "AAPL",
            "^GSPC",
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 31).unwrap(),
            Detection {
                events,
                diagnostics: Diagnostics {
                    window_size: 60,
                    computed_beta: Some(1.21),
                    beta: 1.21,
                    beta_source: BetaSource::Computed,
                },
            },
        )
    }

    fn sample_event() -> AnomalyEvent {
        AnomalyEvent {
            id: "2024-02-14-31".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 2, 14).unwrap(),
            kind: AnomalyKind::CompanySpecific,
            severity: Severity::High,
            sequence: "SPK-RHI-VHI".to_string(),
            stock_return: 12.0,
            market_return: 1.0,
            expected_return: 1.21,
            residual_return: 10.79,
            beta: 1.21,
            z_score: 4.3,
            volume_ratio: 3.2,
            confidence: 95,
            position: 51.7,
        }
    }

    #[test]
    fn test_ascii_table_contains_events() {
        let ascii = sample_report(vec![sample_event()]).to_ascii_table();
        assert!(ascii.contains("AAPL"));
        assert!(ascii.contains("^GSPC"));
        assert!(ascii.contains("company_specific"));
        assert!(ascii.contains("SPK-RHI-VHI"));
        assert!(ascii.contains("60 aligned trading days"));
    }

    #[test]
    fn test_ascii_table_empty_run() {
        let ascii = sample_report(Vec::new()).to_ascii_table();
        assert!(ascii.contains("No anomalies detected."));
    }

    #[test]
    fn test_markdown_shape() {
        let markdown = sample_report(vec![sample_event()]).to_markdown();
        assert!(markdown.contains("# Anomaly Report: AAPL"));
        assert!(markdown.contains("| Date |"));
        assert!(markdown.contains("| 2024-02-14 | company_specific | high |"));
    }

    #[test]
    fn test_display_matches_ascii() {
        let report = sample_report(vec![sample_event()]);
        assert_eq!(report.to_string(), report.to_ascii_table());
    }
}
