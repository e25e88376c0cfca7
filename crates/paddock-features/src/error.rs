//! Error types for feature computation.

use thiserror::Error;

/// Errors that can occur while deriving features.
#[derive(Debug, Error)]
pub enum FeatureError {
    /// Required structural columns are absent from the input schema.
    ///
    /// Value-level malformation is never an error; it is coerced to missing.
    #[error("missing required columns: {}", columns.join(", "))]
    MissingColumns {
        /// Names of every absent required column.
        columns: Vec<String>,
    },

    /// Polars computation error.
    #[error("feature computation error: {0}")]
    Computation(#[from] polars::prelude::PolarsError),
}
