//! Report generation for evaluation runs.

use chrono::{DateTime, Utc};
use paddock_eval::MetricSummary;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Default artifact path for the persisted metrics document.
pub const DEFAULT_ARTIFACT_PATH: &str = "artifacts/baseline_metrics.json";

/// Errors that can occur during report generation.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Aggregated evaluation results for one run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationReport {
    /// Report generation timestamp.
    pub generated_at: DateTime<Utc>,

    /// Trailing window length used by the feature engine.
    pub window: usize,

    /// Number of cross-validation folds.
    pub n_splits: usize,

    /// Column that defined the leakage groups.
    pub group_key: String,

    /// Final metrics per model identifier.
    pub models: BTreeMap<String, MetricSummary>,
}

impl EvaluationReport {
    /// Create a report stamped with the current time.
    pub fn new(
        window: usize,
        n_splits: usize,
        group_key: String,
        models: BTreeMap<String, MetricSummary>,
    ) -> Self {
        Self {
            generated_at: Utc::now(),
            window,
            n_splits,
            group_key,
            models,
        }
    }

    /// Convert the report to a pretty JSON string.
    ///
    /// Non-finite metric values become JSON `null`.
    pub fn to_json(&self) -> Result<String, ReportError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the JSON document, creating parent directories as needed.
    pub fn write_json(&self, path: &Path) -> Result<(), ReportError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(path, self.to_json()?)?;
        Ok(())
    }
}
