//! Feature engine.
//!
//! Holds the feature set and runs the full enrichment pass: schema
//! validation, numeric coercion, feature application, optional-column
//! materialization. Strictly additive: the output is a new frame with the
//! same rows in the same order and a superset of the input columns.

use crate::error::FeatureError;
use crate::form::{DriverFormConfig, DriverFormFeature};
use crate::points::ConstructorPointsFeature;
use crate::reliability::ReliabilityFeature;
use crate::track::TrackHistoryFeature;
use paddock_data::schema;
use polars::prelude::*;
use serde::{Deserialize, Serialize};

const ROW_INDEX: &str = "__row_index";

/// A derived feature computed over the event table.
///
/// Implementations append their output columns to the frame and may re-sort
/// it internally; the engine restores input row order afterwards.
pub trait Feature {
    /// Feature name (unique identifier).
    fn name(&self) -> &str;

    /// Input columns this feature reads.
    fn required_columns(&self) -> &[&str];

    /// Columns this feature appends.
    fn output_columns(&self) -> &[&str];

    /// Append the feature's columns to the frame.
    fn apply(&self, lf: LazyFrame) -> Result<LazyFrame, FeatureError>;
}

/// Configuration for the feature engine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureConfig {
    /// Trailing window length, in events, for driver form (default: 5)
    pub window: usize,
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self { window: 5 }
    }
}

/// Engine holding the full feature set.
#[derive(Debug)]
pub struct FeatureEngine {
    form: DriverFormFeature,
    points: ConstructorPointsFeature,
    track: TrackHistoryFeature,
    reliability: ReliabilityFeature,
}

impl Default for FeatureEngine {
    fn default() -> Self {
        Self::new(FeatureConfig::default())
    }
}

impl FeatureEngine {
    /// Create an engine with the given configuration.
    pub const fn new(config: FeatureConfig) -> Self {
        Self {
            form: DriverFormFeature::with_config(DriverFormConfig {
                window: config.window,
            }),
            points: ConstructorPointsFeature,
            track: TrackHistoryFeature,
            reliability: ReliabilityFeature,
        }
    }

    fn features(&self) -> [&dyn Feature; 4] {
        [&self.form, &self.points, &self.track, &self.reliability]
    }

    /// Names of the features this engine computes.
    pub fn feature_names(&self) -> Vec<&str> {
        self.features().iter().map(|f| f.name()).collect()
    }

    /// Enrich the raw event table with derived features.
    ///
    /// Fails only on missing required structural columns. Value-level
    /// malformation is coerced to missing, never an error. The input is not
    /// mutated; row count and row order are preserved.
    pub fn enrich(&self, records: &DataFrame) -> Result<DataFrame, FeatureError> {
        let present = records.get_column_names_str();
        let missing: Vec<String> = schema::REQUIRED_COLUMNS
            .iter()
            .filter(|name| !present.contains(*name))
            .map(|name| (*name).to_string())
            .collect();
        if !missing.is_empty() {
            return Err(FeatureError::MissingColumns { columns: missing });
        }

        let mut lf = records.clone().lazy().with_row_index(ROW_INDEX, None);

        // Coerce positions to numeric; unparsable values become missing.
        let mut coercions = vec![col(schema::FINISH_POSITION).cast(DataType::Float64)];
        if present.contains(&schema::GRID_POSITION) {
            coercions.push(col(schema::GRID_POSITION).cast(DataType::Float64));
        } else {
            coercions.push(
                lit(NULL)
                    .cast(DataType::Float64)
                    .alias(schema::GRID_POSITION),
            );
        }
        lf = lf.with_columns(coercions);

        for feature in self.features() {
            lf = feature.apply(lf)?;
        }

        // Stable schema for downstream consumers: absent optional columns
        // materialize as all-missing.
        let absent_optional: Vec<Expr> = schema::OPTIONAL_COLUMNS
            .iter()
            .filter(|name| !present.contains(*name))
            .map(|name| lit(NULL).cast(DataType::Float64).alias(*name))
            .collect();
        if !absent_optional.is_empty() {
            lf = lf.with_columns(absent_optional);
        }

        let enriched = lf
            .sort([ROW_INDEX], Default::default())
            .drop([ROW_INDEX])
            .collect()?;
        Ok(enriched)
    }
}
