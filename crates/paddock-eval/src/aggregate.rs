//! Metric aggregation.
//!
//! Reduces per-fold metric vectors into one scalar per metric per model with
//! a NaN-aware mean. A metric that is missing in every fold aggregates to
//! NaN, never to zero.

use crate::evaluator::ModelFoldMetrics;
use crate::metrics::nan_mean;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Final scalar metrics for one model.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MetricSummary {
    /// Mean logarithmic loss across folds.
    pub logloss: f64,
    /// Mean Brier score across folds.
    pub brier: f64,
    /// Mean event top-1 hit rate across folds with a determinable winner.
    pub top1_hit_rate: f64,
}

/// Reduce per-fold metrics into per-model scalars.
pub fn aggregate(per_fold: &BTreeMap<String, ModelFoldMetrics>) -> BTreeMap<String, MetricSummary> {
    per_fold
        .iter()
        .map(|(model_id, metrics)| {
            (
                model_id.clone(),
                MetricSummary {
                    logloss: nan_mean(&metrics.logloss),
                    brier: nan_mean(&metrics.brier),
                    top1_hit_rate: nan_mean(&metrics.top1_hit_rate),
                },
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_aggregate_means_over_folds() {
        let mut per_fold = BTreeMap::new();
        per_fold.insert(
            "logreg".to_string(),
            ModelFoldMetrics {
                logloss: vec![0.6, 0.4],
                brier: vec![0.2, 0.3],
                top1_hit_rate: vec![1.0, 0.5],
            },
        );
        let summary = aggregate(&per_fold);
        let logreg = &summary["logreg"];
        assert_relative_eq!(logreg.logloss, 0.5);
        assert_relative_eq!(logreg.brier, 0.25);
        assert_relative_eq!(logreg.top1_hit_rate, 0.75);
    }

    #[test]
    fn test_missing_folds_are_skipped_not_zeroed() {
        let mut per_fold = BTreeMap::new();
        per_fold.insert(
            "gbdt".to_string(),
            ModelFoldMetrics {
                logloss: vec![0.5, f64::NAN],
                brier: vec![0.1, f64::NAN],
                top1_hit_rate: vec![f64::NAN, f64::NAN],
            },
        );
        let summary = aggregate(&per_fold);
        let gbdt = &summary["gbdt"];
        assert_relative_eq!(gbdt.logloss, 0.5);
        assert_relative_eq!(gbdt.brier, 0.1);
        assert!(gbdt.top1_hit_rate.is_nan());
    }
}
