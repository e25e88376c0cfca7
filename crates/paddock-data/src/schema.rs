//! Canonical participant-event record layout.
//!
//! One row per (driver, event). An event is identified by
//! `(event_date, event_name)`; `event_date` is an ISO `YYYY-MM-DD` string so
//! lexicographic order equals chronological order.

use crate::error::{DataError, Result};
use polars::prelude::*;

/// Stable driver identifier.
pub const DRIVER_ID: &str = "driver_id";
/// Stable constructor (team) identifier.
pub const CONSTRUCTOR_ID: &str = "constructor_id";
/// Event date, ISO `YYYY-MM-DD`.
pub const EVENT_DATE: &str = "event_date";
/// Event name; together with the date it identifies the event.
pub const EVENT_NAME: &str = "event_name";
/// Numeric starting position; may be missing or non-numeric in raw data.
pub const GRID_POSITION: &str = "grid_position";
/// Numeric classification result; may be missing or non-numeric in raw data.
pub const FINISH_POSITION: &str = "finish_position";
/// Free-text finish status, used to derive the DNF flag.
pub const STATUS: &str = "status";
/// 0/1 winner label; exactly one `1` per event under normal data.
pub const IS_WINNER: &str = "is_winner";

/// Qualifying gap to pole in seconds (optional raw feature).
pub const QUALI_DELTA_TO_POLE_SECONDS: &str = "quali_delta_to_pole_seconds";
/// Best practice lap in seconds (optional raw feature).
pub const PRACTICE_BEST_LAP_SECONDS: &str = "practice_best_lap_seconds";
/// Forecast rain probability (optional raw feature).
pub const WEATHER_RAIN_PROBABILITY: &str = "weather_rain_probability";

/// Columns that must be present before any feature computation runs.
///
/// `grid_position` and `is_winner` are deliberately not in this list:
/// the grid is materialized as missing when absent, and the winner label is
/// only needed at evaluation time.
pub const REQUIRED_COLUMNS: [&str; 6] = [
    DRIVER_ID,
    CONSTRUCTOR_ID,
    EVENT_DATE,
    EVENT_NAME,
    FINISH_POSITION,
    STATUS,
];

/// Raw feature columns that may be entirely absent from the input.
pub const OPTIONAL_COLUMNS: [&str; 3] = [
    QUALI_DELTA_TO_POLE_SECONDS,
    PRACTICE_BEST_LAP_SECONDS,
    WEATHER_RAIN_PROBABILITY,
];

/// Validate that every required structural column is present.
///
/// Reports the full list of offending columns at once so operators can fix
/// the upstream extract in one pass. Value-level malformation (non-numeric
/// positions, odd status strings) is not an error here; it is coerced to
/// missing downstream.
pub fn validate_schema(df: &DataFrame) -> Result<()> {
    let present = df.get_column_names_str();
    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|name| !present.contains(*name))
        .map(|name| (*name).to_string())
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(DataError::MissingColumns { columns: missing })
    }
}

/// Events whose winner-label sum is not exactly one.
///
/// The uniqueness of `is_winner` per event is a data-quality precondition:
/// it is checked and reported, never repaired. Returns an empty list when the
/// label column is absent, since there is nothing to check.
pub fn winner_uniqueness_violations(df: &DataFrame) -> Result<Vec<(String, String)>> {
    if !df.get_column_names_str().contains(&IS_WINNER) {
        return Ok(Vec::new());
    }

    let counts = df
        .clone()
        .lazy()
        .group_by([col(EVENT_DATE), col(EVENT_NAME)])
        .agg([col(IS_WINNER).cast(DataType::Float64).sum().alias("__winners")])
        .filter(col("__winners").neq(lit(1.0)))
        .sort([EVENT_DATE, EVENT_NAME], Default::default())
        .collect()?;

    let dates = counts.column(EVENT_DATE)?.as_materialized_series().clone();
    let names = counts.column(EVENT_NAME)?.as_materialized_series().clone();
    let dates = dates.str()?;
    let names = names.str()?;

    let mut violations = Vec::with_capacity(counts.height());
    for (date, name) in dates.into_iter().zip(names) {
        violations.push((
            date.unwrap_or_default().to_string(),
            name.unwrap_or_default().to_string(),
        ));
    }
    Ok(violations)
}
