#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/paddock-labs/paddock/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod export;
pub mod report;

pub use export::{ExportError, ExportFormat, Exporter, MetricRow};
pub use report::{DEFAULT_ARTIFACT_PATH, EvaluationReport, ReportError};
