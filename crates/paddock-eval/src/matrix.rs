//! Feature selection and matrix preparation.
//!
//! Turns an enriched event table into the dense matrix and label vector the
//! estimators consume. The ordered feature list is threaded in explicitly so
//! tests can substitute a reduced set; there is no ambient configuration.

use crate::error::{EvalError, Result};
use ndarray::{Array1, Array2};
use paddock_data::schema;
use paddock_features as features;
use polars::prelude::*;

/// Fixed, ordered feature list used by the default evaluation run.
///
/// Intersected with whatever columns are actually present in the frame.
pub const FEATURE_COLUMNS: [&str; 9] = [
    schema::GRID_POSITION,
    features::DRIVER_FORM_AVG_FINISH,
    features::CONSTRUCTOR_POINTS_SUM,
    features::DRIVER_TRACK_HISTORY_AVG_FINISH,
    features::DRIVER_DNF_FLAG,
    features::TEAM_DNF_RATE,
    schema::QUALI_DELTA_TO_POLE_SECONDS,
    schema::PRACTICE_BEST_LAP_SECONDS,
    schema::WEATHER_RAIN_PROBABILITY,
];

/// Features whose missing entries are filled with a neutral zero.
///
/// Everything else keeps its missing values (as NaN); dropping or imputing
/// rows with missing required features is the caller's responsibility.
pub const OPTIONAL_FEATURE_COLUMNS: [&str; 3] = [
    schema::QUALI_DELTA_TO_POLE_SECONDS,
    schema::PRACTICE_BEST_LAP_SECONDS,
    schema::WEATHER_RAIN_PROBABILITY,
];

fn column_values(df: &DataFrame, name: &str, fill_missing: Option<f64>) -> Result<Vec<f64>> {
    let series = df
        .column(name)?
        .as_materialized_series()
        .cast(&DataType::Float64)?;
    let values = series
        .f64()?
        .into_iter()
        .map(|value| value.unwrap_or_else(|| fill_missing.unwrap_or(f64::NAN)))
        .collect();
    Ok(values)
}

/// Build `(X, y)` from an enriched table.
///
/// `feature_columns` is intersected with the columns present in the frame;
/// the winner label is cast to 0.0/1.0.
pub fn prepare_matrix(
    df: &DataFrame,
    feature_columns: &[&str],
) -> Result<(Array2<f64>, Array1<f64>)> {
    let present = df.get_column_names_str();
    if !present.contains(&schema::IS_WINNER) {
        return Err(EvalError::MissingColumns {
            columns: vec![schema::IS_WINNER.to_string()],
        });
    }

    let selected: Vec<&str> = feature_columns
        .iter()
        .filter(|name| present.contains(*name))
        .copied()
        .collect();

    let rows = df.height();
    let mut data = Vec::with_capacity(rows * selected.len());
    let mut columns = Vec::with_capacity(selected.len());
    for name in &selected {
        let fill = OPTIONAL_FEATURE_COLUMNS
            .contains(name)
            .then_some(0.0);
        columns.push(column_values(df, name, fill)?);
    }
    for row in 0..rows {
        for column in &columns {
            data.push(column[row]);
        }
    }
    let x = Array2::from_shape_vec((rows, selected.len()), data)
        .map_err(|e| EvalError::Estimator(e.to_string()))?;

    let labels = column_values(df, schema::IS_WINNER, Some(0.0))?;
    let y = Array1::from_vec(labels);

    Ok((x, y))
}
