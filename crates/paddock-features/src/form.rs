//! Driver Form Feature
//!
//! Mean finish position over the driver's N most recent prior events.
//! Smaller is better. The series is shifted by one event before windowing so
//! the current event never contributes to its own feature value.

use crate::engine::Feature;
use crate::error::FeatureError;
use paddock_data::schema::{DRIVER_ID, EVENT_DATE, FINISH_POSITION};
use polars::prelude::*;
use serde::{Deserialize, Serialize};

const PRIOR_FINISH: &str = "__prior_finish";

/// Configuration for the DriverForm feature
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DriverFormConfig {
    /// Trailing window length in events (default: 5)
    pub window: usize,
}

impl Default for DriverFormConfig {
    fn default() -> Self {
        Self { window: 5 }
    }
}

/// DriverForm computes the trailing mean of prior finish positions per driver
#[derive(Debug)]
pub struct DriverFormFeature {
    config: DriverFormConfig,
}

impl DriverFormFeature {
    /// Create the feature with an explicit window.
    pub const fn with_config(config: DriverFormConfig) -> Self {
        Self { config }
    }
}

impl Default for DriverFormFeature {
    fn default() -> Self {
        Self::with_config(DriverFormConfig::default())
    }
}

impl Feature for DriverFormFeature {
    fn name(&self) -> &str {
        "driver_form"
    }

    fn required_columns(&self) -> &[&str] {
        &[DRIVER_ID, EVENT_DATE, FINISH_POSITION]
    }

    fn output_columns(&self) -> &[&str] {
        &[crate::DRIVER_FORM_AVG_FINISH]
    }

    fn apply(&self, lf: LazyFrame) -> Result<LazyFrame, FeatureError> {
        let window = self.config.window.max(1);

        // 1. Sort chronologically within each driver
        // 2. Shift by one so the window only sees strictly earlier events
        // 3. Trailing mean over however many prior events exist (min 1)
        let result = lf
            .sort(
                [DRIVER_ID, EVENT_DATE],
                SortMultipleOptions::default().with_maintain_order(true),
            )
            .with_columns([col(FINISH_POSITION)
                .shift(lit(1))
                .over([col(DRIVER_ID)])
                .alias(PRIOR_FINISH)])
            .with_columns([col(PRIOR_FINISH)
                .rolling_mean(RollingOptionsFixedWindow {
                    window_size: window,
                    min_periods: 1,
                    ..Default::default()
                })
                .over([col(DRIVER_ID)])
                .alias(crate::DRIVER_FORM_AVG_FINISH)])
            .drop([PRIOR_FINISH]);

        Ok(result)
    }
}
