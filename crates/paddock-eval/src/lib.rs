#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/paddock-labs/paddock/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod aggregate;
pub mod baseline;
pub mod error;
pub mod estimator;
pub mod evaluator;
pub mod gbdt;
pub mod logistic;
pub mod matrix;
pub mod metrics;
pub mod split;

pub use aggregate::{MetricSummary, aggregate};
pub use baseline::ConstantProbability;
pub use error::{EvalError, Result};
pub use estimator::{Estimator, EstimatorFactory};
pub use evaluator::{EvaluatorConfig, GroupedEvaluator, ModelFoldMetrics};
pub use gbdt::{GradientBoostedTrees, GradientBoostingConfig};
pub use logistic::{LogisticRegression, LogisticRegressionConfig};
pub use matrix::{FEATURE_COLUMNS, OPTIONAL_FEATURE_COLUMNS, prepare_matrix};
pub use split::{FoldIndices, GroupKFold};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
