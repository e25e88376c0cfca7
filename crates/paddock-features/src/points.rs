//! Constructor Points Feature
//!
//! Maps each numeric finish position to the fixed championship points table
//! and sums per constructor within the same event. The sum is broadcast back
//! to every row of the group.
//!
//! This is a post-race proxy: the points a team scored at the event are only
//! known after it concludes. Kept as-is by design; do not mistake it for a
//! pre-race signal.

use crate::engine::Feature;
use crate::error::FeatureError;
use paddock_data::schema::{CONSTRUCTOR_ID, EVENT_DATE, EVENT_NAME, FINISH_POSITION};
use polars::prelude::*;

const EVENT_POINTS: &str = "__event_points";

/// Points awarded per finish position; 11th and below score nothing.
pub const POINTS_TABLE: [(f64, f64); 10] = [
    (1.0, 25.0),
    (2.0, 18.0),
    (3.0, 15.0),
    (4.0, 12.0),
    (5.0, 10.0),
    (6.0, 8.0),
    (7.0, 6.0),
    (8.0, 4.0),
    (9.0, 2.0),
    (10.0, 1.0),
];

/// Points expression for a single row; missing finishes contribute zero.
fn points_expr() -> Expr {
    POINTS_TABLE.iter().fold(lit(0.0), |acc, (position, points)| {
        when(col(FINISH_POSITION).eq(lit(*position)))
            .then(lit(*points))
            .otherwise(acc)
    })
}

/// ConstructorPoints computes the same-event points sum per constructor
#[derive(Debug, Default)]
pub struct ConstructorPointsFeature;

impl Feature for ConstructorPointsFeature {
    fn name(&self) -> &str {
        "constructor_points"
    }

    fn required_columns(&self) -> &[&str] {
        &[CONSTRUCTOR_ID, EVENT_DATE, EVENT_NAME, FINISH_POSITION]
    }

    fn output_columns(&self) -> &[&str] {
        &[crate::CONSTRUCTOR_POINTS_SUM]
    }

    fn apply(&self, lf: LazyFrame) -> Result<LazyFrame, FeatureError> {
        let result = lf
            .with_columns([points_expr().alias(EVENT_POINTS)])
            .with_columns([col(EVENT_POINTS)
                .sum()
                .over([col(CONSTRUCTOR_ID), col(EVENT_DATE), col(EVENT_NAME)])
                .alias(crate::CONSTRUCTOR_POINTS_SUM)])
            .drop([EVENT_POINTS]);

        Ok(result)
    }
}
