//! Track History Feature
//!
//! Expanding mean of the driver's prior finish positions at events sharing
//! the same event name. All history, not a fixed window; strictly before the
//! current row.

use crate::engine::Feature;
use crate::error::FeatureError;
use paddock_data::schema::{DRIVER_ID, EVENT_DATE, EVENT_NAME, FINISH_POSITION};
use polars::prelude::*;

const PRIOR_FINISH: &str = "__prior_track_finish";
const PRIOR_SUM: &str = "__track_sum";
const PRIOR_COUNT: &str = "__track_count";

/// TrackHistory computes the expanding mean of prior finishes per (driver, event name)
#[derive(Debug, Default)]
pub struct TrackHistoryFeature;

impl Feature for TrackHistoryFeature {
    fn name(&self) -> &str {
        "track_history"
    }

    fn required_columns(&self) -> &[&str] {
        &[DRIVER_ID, EVENT_NAME, EVENT_DATE, FINISH_POSITION]
    }

    fn output_columns(&self) -> &[&str] {
        &[crate::DRIVER_TRACK_HISTORY_AVG_FINISH]
    }

    fn apply(&self, lf: LazyFrame) -> Result<LazyFrame, FeatureError> {
        let group = [col(DRIVER_ID), col(EVENT_NAME)];

        // Shift-then-accumulate: the cumulative sum/count of the shifted
        // series is an expanding mean that never sees the current row.
        // Null finishes are skipped (they add nothing to sum or count).
        let result = lf
            .sort(
                [DRIVER_ID, EVENT_NAME, EVENT_DATE],
                SortMultipleOptions::default().with_maintain_order(true),
            )
            .with_columns([col(FINISH_POSITION)
                .shift(lit(1))
                .over(group.clone())
                .alias(PRIOR_FINISH)])
            .with_columns([
                col(PRIOR_FINISH)
                    .fill_null(lit(0.0))
                    .cum_sum(false)
                    .over(group.clone())
                    .alias(PRIOR_SUM),
                col(PRIOR_FINISH)
                    .cum_count(false)
                    .over(group)
                    .alias(PRIOR_COUNT),
            ])
            .with_columns([when(col(PRIOR_COUNT).gt(lit(0)))
                .then(col(PRIOR_SUM) / col(PRIOR_COUNT).cast(DataType::Float64))
                .otherwise(lit(NULL))
                .alias(crate::DRIVER_TRACK_HISTORY_AVG_FINISH)])
            .drop([PRIOR_FINISH, PRIOR_SUM, PRIOR_COUNT]);

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn history_values(df: DataFrame) -> Vec<Option<f64>> {
        let out = TrackHistoryFeature
            .apply(df.lazy())
            .unwrap()
            .collect()
            .unwrap();
        out.column(crate::DRIVER_TRACK_HISTORY_AVG_FINISH)
            .unwrap()
            .as_materialized_series()
            .f64()
            .unwrap()
            .into_iter()
            .collect()
    }

    #[test]
    fn test_expanding_mean_over_all_prior_visits() {
        let df = df!(
            DRIVER_ID => vec!["ver"; 4],
            EVENT_NAME => vec!["monaco"; 4],
            EVENT_DATE => ["2021-05-23", "2022-05-29", "2023-05-28", "2024-05-26"],
            FINISH_POSITION => [2.0, 1.0, 3.0, 1.0],
        )
        .unwrap();
        let values = history_values(df);
        assert!(values[0].is_none());
        assert_relative_eq!(values[1].unwrap(), 2.0);
        assert_relative_eq!(values[2].unwrap(), 1.5);
        assert_relative_eq!(values[3].unwrap(), 2.0);
    }

    #[test]
    fn test_history_is_scoped_to_event_name() {
        let df = df!(
            DRIVER_ID => vec!["ver"; 3],
            EVENT_NAME => ["monaco", "monza", "monaco"],
            EVENT_DATE => ["2023-05-28", "2023-09-03", "2024-05-26"],
            FINISH_POSITION => [1.0, 9.0, 4.0],
        )
        .unwrap();
        // Sorted output groups monaco rows together; the monza visit never
        // leaks into the monaco history.
        let out = TrackHistoryFeature
            .apply(df.lazy())
            .unwrap()
            .collect()
            .unwrap();
        let names: Vec<&str> = out
            .column(EVENT_NAME)
            .unwrap()
            .as_materialized_series()
            .str()
            .unwrap()
            .into_iter()
            .map(|v| v.unwrap())
            .collect();
        let values: Vec<Option<f64>> = out
            .column(crate::DRIVER_TRACK_HISTORY_AVG_FINISH)
            .unwrap()
            .as_materialized_series()
            .f64()
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(names, vec!["monaco", "monaco", "monza"]);
        assert_eq!(values, vec![None, Some(1.0), None]);
    }

    #[test]
    fn test_null_prior_finish_is_skipped() {
        let df = df!(
            DRIVER_ID => vec!["ver"; 3],
            EVENT_NAME => vec!["monaco"; 3],
            EVENT_DATE => ["2022-05-29", "2023-05-28", "2024-05-26"],
            FINISH_POSITION => [Some(4.0), None, Some(2.0)],
        )
        .unwrap();
        let values = history_values(df);
        assert_eq!(values, vec![None, Some(4.0), Some(4.0)]);
    }
}
