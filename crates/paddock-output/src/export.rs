//! Export functionality for evaluation results.
//!
//! Flattens the per-model metric mapping into rows for CSV, or serializes
//! the full report as JSON.

use crate::report::EvaluationReport;
use serde::{Deserialize, Serialize};
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

/// One model's final metrics as a flat record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MetricRow {
    /// Model identifier.
    pub model: String,
    /// Mean logarithmic loss.
    pub logloss: f64,
    /// Mean Brier score.
    pub brier: f64,
    /// Mean top-1 hit rate.
    pub top1_hit_rate: f64,
}

impl EvaluationReport {
    /// Flatten the per-model mapping into rows, sorted by model id.
    pub fn metric_rows(&self) -> Vec<MetricRow> {
        self.models
            .iter()
            .map(|(model, summary)| MetricRow {
                model: model.clone(),
                logloss: summary.logloss,
                brier: summary.brier,
                top1_hit_rate: summary.top1_hit_rate,
            })
            .collect()
    }
}

/// Trait for exporting data in various formats.
pub trait Exporter {
    /// Export data to a string in the specified format.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError>;

    /// Export data to a file in the specified format.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or file writing fails.
    fn export_to_file(&self, path: &Path, format: ExportFormat) -> Result<(), ExportError> {
        let content = self.export_to_string(format)?;
        let mut file = File::create(path)?;
        file.write_all(content.as_bytes())?;
        Ok(())
    }
}

impl Exporter for EvaluationReport {
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError> {
        match format {
            ExportFormat::Csv => {
                let mut wtr = csv::Writer::from_writer(vec![]);
                for row in self.metric_rows() {
                    wtr.serialize(&row)?;
                }
                let data = String::from_utf8(wtr.into_inner().map_err(|e| e.into_error())?)
                    .expect("csv output is utf-8");
                Ok(data)
            }
            ExportFormat::Json => Ok(serde_json::to_string(self)?),
            ExportFormat::PrettyJson => Ok(serde_json::to_string_pretty(self)?),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use paddock_eval::MetricSummary;
    use std::collections::BTreeMap;

    fn report() -> EvaluationReport {
        let mut models = BTreeMap::new();
        models.insert(
            "logreg".to_string(),
            MetricSummary {
                logloss: 0.41,
                brier: 0.18,
                top1_hit_rate: 0.6,
            },
        );
        models.insert(
            "gbdt".to_string(),
            MetricSummary {
                logloss: 0.38,
                brier: 0.16,
                top1_hit_rate: 0.7,
            },
        );
        EvaluationReport::new(5, 5, "event_date".to_string(), models)
    }

    #[test]
    fn test_csv_export_has_one_row_per_model() {
        let csv = report().export_to_string(ExportFormat::Csv).unwrap();
        assert!(csv.contains("gbdt"));
        assert!(csv.contains("logreg"));
        assert!(csv.contains("0.41"));
        assert_eq!(csv.lines().count(), 3);
    }

    #[test]
    fn test_json_export_round_trips() {
        let json = report().export_to_string(ExportFormat::Json).unwrap();
        let parsed: EvaluationReport = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.models.len(), 2);
        assert_eq!(parsed.n_splits, 5);
    }

    #[test]
    fn test_export_to_file() {
        let path = std::env::temp_dir().join("paddock_export_test.csv");
        report().export_to_file(&path, ExportFormat::Csv).unwrap();
        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("logreg"));
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_export_format_extension() {
        assert_eq!(ExportFormat::Csv.extension(), "csv");
        assert_eq!(ExportFormat::Json.extension(), "json");
        assert_eq!(ExportFormat::PrettyJson.extension(), "json");
    }
}
