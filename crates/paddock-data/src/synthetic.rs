//! Deterministic synthetic seasons for tests and demos.
//!
//! Fixtures are hand-written, not randomized, so every expected metric value
//! in the test suites can be computed literally.

use crate::error::Result;
use crate::schema;
use polars::prelude::*;

/// One participant classification inside a synthetic event.
#[derive(Debug, Clone)]
pub struct SyntheticEntry {
    /// Driver identifier.
    pub driver: &'static str,
    /// Constructor identifier.
    pub constructor: &'static str,
    /// Starting position.
    pub grid: f64,
    /// Finishing position; `None` models an unclassified result.
    pub finish: Option<f64>,
    /// Free-text finish status.
    pub status: &'static str,
}

/// Builder for a synthetic season frame.
///
/// The winner label is derived from the finish order (`finish == 1`), so a
/// well-formed fixture automatically satisfies the one-winner-per-event
/// precondition.
#[derive(Debug, Default)]
pub struct SeasonBuilder {
    rows: Vec<(String, String, SyntheticEntry)>,
}

impl SeasonBuilder {
    /// Create an empty season.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one event's classification, in input row order.
    pub fn event(mut self, date: &str, name: &str, entries: &[SyntheticEntry]) -> Self {
        for entry in entries {
            self.rows
                .push((date.to_string(), name.to_string(), entry.clone()));
        }
        self
    }

    /// Materialize the season as an event table.
    pub fn build(self) -> Result<DataFrame> {
        let mut driver_ids = Vec::with_capacity(self.rows.len());
        let mut constructor_ids = Vec::with_capacity(self.rows.len());
        let mut dates = Vec::with_capacity(self.rows.len());
        let mut names = Vec::with_capacity(self.rows.len());
        let mut grids = Vec::with_capacity(self.rows.len());
        let mut finishes = Vec::with_capacity(self.rows.len());
        let mut statuses = Vec::with_capacity(self.rows.len());
        let mut winners = Vec::with_capacity(self.rows.len());

        for (date, name, entry) in self.rows {
            driver_ids.push(entry.driver.to_string());
            constructor_ids.push(entry.constructor.to_string());
            dates.push(date);
            names.push(name);
            grids.push(Some(entry.grid));
            finishes.push(entry.finish);
            statuses.push(entry.status.to_string());
            winners.push(i32::from(entry.finish == Some(1.0)));
        }

        let df = df!(
            schema::DRIVER_ID => driver_ids,
            schema::CONSTRUCTOR_ID => constructor_ids,
            schema::EVENT_DATE => dates,
            schema::EVENT_NAME => names,
            schema::GRID_POSITION => grids,
            schema::FINISH_POSITION => finishes,
            schema::STATUS => statuses,
            schema::IS_WINNER => winners,
        )?;
        Ok(df)
    }
}

/// Shorthand for a finished entry.
pub const fn entry(
    driver: &'static str,
    constructor: &'static str,
    grid: f64,
    finish: f64,
) -> SyntheticEntry {
    SyntheticEntry {
        driver,
        constructor,
        grid,
        finish: Some(finish),
        status: "Finished",
    }
}

/// Three events of four drivers across two constructors, deterministic
/// finish orders. The canonical fixture for the end-to-end properties.
pub fn sample_season() -> Result<DataFrame> {
    SeasonBuilder::new()
        .event(
            "2024-03-01",
            "bahrain",
            &[
                entry("ver", "redline", 1.0, 1.0),
                entry("per", "redline", 2.0, 2.0),
                entry("ham", "silver", 3.0, 3.0),
                entry("rus", "silver", 4.0, 4.0),
            ],
        )
        .event(
            "2024-03-08",
            "jeddah",
            &[
                entry("ver", "redline", 1.0, 2.0),
                entry("per", "redline", 3.0, 1.0),
                entry("ham", "silver", 2.0, 3.0),
                entry("rus", "silver", 4.0, 4.0),
            ],
        )
        .event(
            "2024-03-22",
            "melbourne",
            &[
                entry("ver", "redline", 1.0, 1.0),
                entry("per", "redline", 4.0, 3.0),
                entry("ham", "silver", 2.0, 2.0),
                entry("rus", "silver", 3.0, 4.0),
            ],
        )
        .build()
}

/// Two consecutive seasons over the same three event names.
///
/// From the second season onward every driver has both form history and
/// track history, so rows survive required-feature filtering.
pub fn sample_two_seasons() -> Result<DataFrame> {
    let mut builder = SeasonBuilder::new();
    for (year, flip) in [("2024", false), ("2025", true)] {
        for (month_day, name) in [
            ("03-01", "bahrain"),
            ("03-08", "jeddah"),
            ("03-22", "melbourne"),
        ] {
            let date = format!("{year}-{month_day}");
            let entries = if flip {
                [
                    entry("ham", "silver", 1.0, 1.0),
                    entry("rus", "silver", 2.0, 3.0),
                    entry("ver", "redline", 3.0, 2.0),
                    entry("per", "redline", 4.0, 4.0),
                ]
            } else {
                [
                    entry("ver", "redline", 1.0, 1.0),
                    entry("per", "redline", 2.0, 2.0),
                    entry("ham", "silver", 3.0, 3.0),
                    entry("rus", "silver", 4.0, 4.0),
                ]
            };
            builder = builder.event(&date, name, &entries);
        }
    }
    builder.build()
}
