//! Integration tests for detection reporting and export.

use chrono::NaiveDate;
use hobart_detect::{AnomalyDetector, DailyBar};
use hobart_output::{AnomalyReport, ExportFormat, export_to_file, to_csv_string, to_json_string};

/// Sixty-one flat bars with one violent idiosyncratic day near the middle.
fn synthetic_series() -> (Vec<DailyBar>, Vec<DailyBar>) {
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let mut stock = Vec::new();
    let mut market = Vec::new();
    let mut close = 100.0;

    for i in 0..61u64 {
        let date = start + chrono::Days::new(i);
        // Bar 31 closes the +12% day (aligned-day index 30).
        let (pct, volume) = if i == 31 { (12.0, 3_000) } else { (0.0, 1_000) };
        close *= 1.0 + pct / 100.0;
        stock.push(DailyBar::new(date, close, volume));
        market.push(DailyBar::new(date, 50.0, 0));
    }

    (stock, market)
}

#[test]
fn test_full_report_workflow() {
    let (stock, market) = synthetic_series();
    let detection = AnomalyDetector::default().detect(&stock, &market, Some(1.0));
    assert_eq!(detection.events.len(), 1);

    let report = AnomalyReport::new(
        "AAPL",
        "^GSPC",
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
        detection,
    );

    let ascii = report.to_ascii_table();
    assert!(ascii.contains("AAPL"));
    assert!(ascii.contains("company_specific"));
    assert!(ascii.contains("high"));

    let markdown = report.to_markdown();
    assert!(markdown.contains("# Anomaly Report: AAPL"));
    assert!(markdown.contains("| Date |"));
    assert!(markdown.contains("2024-02-01"));
}

#[test]
fn test_full_export_workflow() {
    let (stock, market) = synthetic_series();
    let detection = AnomalyDetector::default().detect(&stock, &market, Some(1.0));

    let csv = to_csv_string(&detection.events).unwrap();
    assert!(csv.lines().next().unwrap().contains("sequence"));
    assert!(csv.contains("SPK-RHI-VHI"));

    let json = to_json_string(&detection.events, false).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value.as_array().unwrap().len(), 1);
    assert_eq!(value[0]["type"], "company_specific");
    assert_eq!(value[0]["confidence"], 95);

    let path = std::env::temp_dir().join("hobart-export-test.json");
    export_to_file(&detection.events, ExportFormat::PrettyJson, &path).unwrap();
    let written = std::fs::read_to_string(&path).unwrap();
    assert!(written.contains("SPK-RHI-VHI"));
    std::fs::remove_file(&path).ok();
}
