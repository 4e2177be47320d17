//! Export functionality for anomaly events.
//!
//! CSV for spreadsheets, JSON (compact or pretty) for downstream tooling
//! such as news-correlation jobs. The event's `date` field is the join key
//! such consumers need.

use hobart_detect::AnomalyEvent;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during export operations.
#[derive(Debug, Error)]
pub enum ExportError {
    /// CSV serialization error.
    #[error("CSV serialization error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization error.
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Export format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Comma-separated values format.
    Csv,

    /// Compact JSON format.
    Json,

    /// Pretty-printed JSON format.
    PrettyJson,
}

impl ExportFormat {
    /// Get the file extension for this format.
    pub const fn extension(&self) -> &str {
        match self {
            Self::Csv => "csv",
            Self::Json | Self::PrettyJson => "json",
        }
    }
}

/// Serialize events to a CSV string with a header row.
pub fn to_csv_string(events: &[AnomalyEvent]) -> Result<String, ExportError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for event in events {
        writer.serialize(event)?;
    }
    let bytes = writer.into_inner().map_err(|e| e.into_error())?;
    Ok(String::from_utf8(bytes).expect("CSV output is valid UTF-8"))
}

/// Serialize events to a JSON array string.
pub fn to_json_string(events: &[AnomalyEvent], pretty: bool) -> Result<String, ExportError> {
    let json = if pretty {
        serde_json::to_string_pretty(events)?
    } else {
        serde_json::to_string(events)?
    };
    Ok(json)
}

/// Write events to a file in the given format.
pub fn export_to_file<P: AsRef<Path>>(
    events: &[AnomalyEvent],
    format: ExportFormat,
    path: P,
) -> Result<(), ExportError> {
    let contents = match format {
        ExportFormat::Csv => to_csv_string(events)?,
        ExportFormat::Json => to_json_string(events, false)?,
        ExportFormat::PrettyJson => to_json_string(events, true)?,
    };

    let mut file = File::create(path)?;
    file.write_all(contents.as_bytes())?;
    Ok(())
}
