#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/hobartlabs/hobart/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod export;
pub mod report;

pub use export::{ExportError, ExportFormat, export_to_file, to_csv_string, to_json_string};
pub use report::AnomalyReport;
