//! Error types for evaluation.

use thiserror::Error;

/// Result type for evaluation operations.
pub type Result<T> = std::result::Result<T, EvalError>;

/// Errors that can occur during cross-validation and scoring.
#[derive(Debug, Error)]
pub enum EvalError {
    /// A requested model identifier has no registered estimator builder.
    ///
    /// Reported before any fold runs; never silently skipped.
    #[error("no estimator registered for model id '{0}'")]
    UnknownModel(String),

    /// The input table has no rows.
    ///
    /// Distinct from [`EvalError::NoWinners`] so operators can tell which
    /// upstream stage is broken.
    #[error("no data: input table is empty after required-feature filtering")]
    EmptyInput,

    /// The input table has rows but no positive winner labels.
    #[error("no winners: label column sums to zero; check winner detection upstream")]
    NoWinners,

    /// A column needed for evaluation is absent.
    #[error("missing required columns: {}", columns.join(", "))]
    MissingColumns {
        /// Names of every absent column.
        columns: Vec<String>,
    },

    /// Fewer distinct groups than requested folds.
    #[error("cannot split {groups} group(s) into {splits} folds")]
    NotEnoughGroups {
        /// Number of distinct groups in the input.
        groups: usize,
        /// Requested number of folds.
        splits: usize,
    },

    /// Estimator-level failure (dimension mismatch, predict before fit).
    #[error("estimator error: {0}")]
    Estimator(String),

    /// Polars error
    #[error("Polars error: {0}")]
    Polars(#[from] polars::prelude::PolarsError),
}
