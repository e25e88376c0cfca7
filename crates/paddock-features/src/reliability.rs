//! Reliability Feature
//!
//! Derives a DNF flag from the free-text status and the same-event mean of
//! that flag per constructor.
//!
//! `team_dnf_rate` is a post-race proxy like the constructor points sum: it
//! averages outcomes of the event being predicted.

use crate::engine::Feature;
use crate::error::FeatureError;
use paddock_data::schema::{CONSTRUCTOR_ID, EVENT_DATE, STATUS};
use polars::prelude::*;

/// Case-insensitive substrings that mark a non-finish.
pub const DNF_KEYWORDS: [&str; 5] = ["dnf", "accident", "mechanical", "collision", "engine"];

fn dnf_condition() -> Expr {
    let lowered = col(STATUS).str().to_lowercase();
    DNF_KEYWORDS.iter().fold(lit(false), |acc, keyword| {
        acc.or(lowered.clone().str().contains_literal(lit(*keyword)))
    })
}

/// Reliability derives the driver DNF flag and the team same-event DNF rate
#[derive(Debug, Default)]
pub struct ReliabilityFeature;

impl Feature for ReliabilityFeature {
    fn name(&self) -> &str {
        "reliability"
    }

    fn required_columns(&self) -> &[&str] {
        &[CONSTRUCTOR_ID, EVENT_DATE, STATUS]
    }

    fn output_columns(&self) -> &[&str] {
        &[crate::DRIVER_DNF_FLAG, crate::TEAM_DNF_RATE]
    }

    fn apply(&self, lf: LazyFrame) -> Result<LazyFrame, FeatureError> {
        let result = lf
            .with_columns([when(dnf_condition())
                .then(lit(1.0))
                .otherwise(lit(0.0))
                .alias(crate::DRIVER_DNF_FLAG)])
            .with_columns([col(crate::DRIVER_DNF_FLAG)
                .mean()
                .over([col(CONSTRUCTOR_ID), col(EVENT_DATE)])
                .alias(crate::TEAM_DNF_RATE)]);

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn flags_and_rates(df: DataFrame) -> (Vec<f64>, Vec<f64>) {
        let out = ReliabilityFeature
            .apply(df.lazy())
            .unwrap()
            .collect()
            .unwrap();
        let flags = out
            .column(crate::DRIVER_DNF_FLAG)
            .unwrap()
            .as_materialized_series()
            .f64()
            .unwrap()
            .into_iter()
            .map(|v| v.unwrap())
            .collect();
        let rates = out
            .column(crate::TEAM_DNF_RATE)
            .unwrap()
            .as_materialized_series()
            .f64()
            .unwrap()
            .into_iter()
            .map(|v| v.unwrap())
            .collect();
        (flags, rates)
    }

    #[rstest]
    #[case("Finished", 0.0)]
    #[case("+1 Lap", 0.0)]
    #[case("DNF", 1.0)]
    #[case("Accident", 1.0)]
    #[case("Mechanical failure", 1.0)]
    #[case("Collision damage", 1.0)]
    #[case("Engine", 1.0)]
    #[case("ENGINE BLOWN", 1.0)]
    fn test_dnf_keyword_match(#[case] status: &str, #[case] expected: f64) {
        let df = df!(
            CONSTRUCTOR_ID => ["red"],
            EVENT_DATE => ["2024-03-01"],
            STATUS => [status],
        )
        .unwrap();
        let (flags, _) = flags_and_rates(df);
        assert_eq!(flags, vec![expected]);
    }

    #[test]
    fn test_team_rate_is_same_event_mean() {
        let df = df!(
            CONSTRUCTOR_ID => ["red", "red", "blue", "blue"],
            EVENT_DATE => vec!["2024-03-01"; 4],
            STATUS => ["Finished", "Engine", "Finished", "Finished"],
        )
        .unwrap();
        let (flags, rates) = flags_and_rates(df);
        assert_eq!(flags, vec![0.0, 1.0, 0.0, 0.0]);
        assert_eq!(rates, vec![0.5, 0.5, 0.0, 0.0]);
    }

    #[test]
    fn test_rate_does_not_cross_event_dates() {
        let df = df!(
            CONSTRUCTOR_ID => ["red", "red"],
            EVENT_DATE => ["2024-03-01", "2024-03-08"],
            STATUS => ["Engine", "Finished"],
        )
        .unwrap();
        let (_, rates) = flags_and_rates(df);
        assert_eq!(rates, vec![1.0, 0.0]);
    }
}
