//! End-to-end evaluation pipeline.
//!
//! Raw table → feature engine → required-feature filtering → grouped
//! cross-validation → NaN-aware aggregation → report. Mirrors what the CLI
//! runs; kept in the library so integration tests can drive the exact same
//! path.

use paddock_data::error::DataError;
use paddock_eval::{
    EstimatorFactory, EvalError, EvaluatorConfig, FEATURE_COLUMNS, GroupedEvaluator,
    OPTIONAL_FEATURE_COLUMNS, aggregate,
};
use paddock_features::{FeatureConfig, FeatureEngine, FeatureError};
use paddock_output::{EvaluationReport, ReportError};
use polars::prelude::*;
use thiserror::Error;

/// Errors surfaced by the end-to-end pipeline.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Data validation or loading failure.
    #[error(transparent)]
    Data(#[from] DataError),

    /// Feature computation failure.
    #[error(transparent)]
    Feature(#[from] FeatureError),

    /// Evaluation failure.
    #[error(transparent)]
    Eval(#[from] EvalError),

    /// Report serialization failure.
    #[error(transparent)]
    Report(#[from] ReportError),

    /// Polars error
    #[error("Polars error: {0}")]
    Polars(#[from] polars::prelude::PolarsError),
}

/// Configuration for one evaluation run.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Trailing window length for driver form.
    pub window: usize,
    /// Number of cross-validation folds.
    pub n_splits: usize,
    /// Column whose values define the leakage groups.
    pub group_key: String,
    /// Model identifiers to evaluate.
    pub models: Vec<String>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            window: 5,
            n_splits: 5,
            group_key: paddock_data::schema::EVENT_DATE.to_string(),
            models: vec!["logreg".to_string(), "gbdt".to_string()],
        }
    }
}

/// Drop rows missing any required (non-optional) feature that is present.
///
/// The evaluator itself leaves missing-value policy to its caller; this is
/// the caller.
pub fn drop_missing_required(df: &DataFrame) -> Result<DataFrame, PipelineError> {
    let present = df.get_column_names_str();
    let required: Vec<&str> = FEATURE_COLUMNS
        .iter()
        .filter(|name| !OPTIONAL_FEATURE_COLUMNS.contains(name))
        .filter(|name| present.contains(*name))
        .copied()
        .collect();

    let mut keep = lit(true);
    for name in required {
        keep = keep.and(col(name).is_not_null());
    }
    let filtered = df.clone().lazy().filter(keep).collect()?;
    Ok(filtered)
}

/// Run the full evaluation over a raw event table.
pub fn run_evaluation(
    records: &DataFrame,
    config: &PipelineConfig,
    factory: &EstimatorFactory,
) -> Result<EvaluationReport, PipelineError> {
    let engine = FeatureEngine::new(FeatureConfig {
        window: config.window,
    });
    let enriched = engine.enrich(records)?;
    let filtered = drop_missing_required(&enriched)?;

    let evaluator = GroupedEvaluator::new(EvaluatorConfig {
        n_splits: config.n_splits,
        group_key: config.group_key.clone(),
        feature_columns: FEATURE_COLUMNS.iter().map(|s| s.to_string()).collect(),
    });
    let model_ids: Vec<&str> = config.models.iter().map(String::as_str).collect();
    let per_fold = evaluator.evaluate(&filtered, &model_ids, factory)?;
    let models = aggregate(&per_fold);

    Ok(EvaluationReport::new(
        config.window,
        config.n_splits,
        config.group_key.clone(),
        models,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use paddock_data::schema;
    use paddock_data::synthetic::{sample_season, sample_two_seasons};

    #[test]
    fn test_drop_missing_required_removes_history_free_rows() {
        let raw = sample_two_seasons().unwrap();
        let enriched = FeatureEngine::default().enrich(&raw).unwrap();
        let filtered = drop_missing_required(&enriched).unwrap();
        // First-season rows lack either form or track history; only the
        // second season survives.
        assert_eq!(filtered.height(), 12);
        let dates = filtered
            .column(schema::EVENT_DATE)
            .unwrap()
            .as_materialized_series()
            .clone();
        let dates = dates.str().unwrap();
        assert!(dates.into_iter().all(|d| d.unwrap().starts_with("2025")));
    }

    #[test]
    fn test_first_season_only_input_filters_to_empty() {
        let raw = sample_season().unwrap();
        let enriched = FeatureEngine::default().enrich(&raw).unwrap();
        // No event name repeats, so track history is missing everywhere.
        let filtered = drop_missing_required(&enriched).unwrap();
        assert_eq!(filtered.height(), 0);
    }
}
