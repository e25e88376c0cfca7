//! Feature Registry
//!
//! Central metadata for all derived features. Allows lookup by name without
//! instantiating the engine.

use paddock_data::schema;
use std::collections::HashMap;

/// Feature metadata
#[derive(Debug, Clone)]
pub struct FeatureInfo {
    /// Feature name (unique identifier)
    pub name: &'static str,
    /// Brief description of what the feature measures
    pub description: &'static str,
    /// Required column names in input data
    pub required_columns: &'static [&'static str],
    /// Columns the feature appends to the table
    pub output_columns: &'static [&'static str],
    /// Whether the feature aggregates same-event peer information that is
    /// only known after the event (a post-race proxy)
    pub post_race_proxy: bool,
}

/// Get all available feature info
pub fn available_features() -> Vec<FeatureInfo> {
    vec![
        FeatureInfo {
            name: "driver_form",
            description: "Mean finish over the driver's trailing prior events",
            required_columns: &[schema::DRIVER_ID, schema::EVENT_DATE, schema::FINISH_POSITION],
            output_columns: &[crate::DRIVER_FORM_AVG_FINISH],
            post_race_proxy: false,
        },
        FeatureInfo {
            name: "constructor_points",
            description: "Same-event constructor points sum from the fixed points table",
            required_columns: &[
                schema::CONSTRUCTOR_ID,
                schema::EVENT_DATE,
                schema::EVENT_NAME,
                schema::FINISH_POSITION,
            ],
            output_columns: &[crate::CONSTRUCTOR_POINTS_SUM],
            post_race_proxy: true,
        },
        FeatureInfo {
            name: "track_history",
            description: "Expanding mean of the driver's prior finishes at this event name",
            required_columns: &[
                schema::DRIVER_ID,
                schema::EVENT_NAME,
                schema::EVENT_DATE,
                schema::FINISH_POSITION,
            ],
            output_columns: &[crate::DRIVER_TRACK_HISTORY_AVG_FINISH],
            post_race_proxy: false,
        },
        FeatureInfo {
            name: "reliability",
            description: "Driver DNF flag from status keywords and team same-event DNF rate",
            required_columns: &[schema::CONSTRUCTOR_ID, schema::EVENT_DATE, schema::STATUS],
            output_columns: &[crate::DRIVER_DNF_FLAG, crate::TEAM_DNF_RATE],
            post_race_proxy: true,
        },
    ]
}

/// Get feature info by name
pub fn get_feature_info(name: &str) -> Option<FeatureInfo> {
    available_features().into_iter().find(|f| f.name == name)
}

/// Get a map of all features indexed by name
pub fn feature_map() -> HashMap<&'static str, FeatureInfo> {
    available_features()
        .into_iter()
        .map(|f| (f.name, f))
        .collect()
}

/// List all feature names
pub fn list_feature_names() -> Vec<&'static str> {
    available_features().into_iter().map(|f| f.name).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_available_features_count() {
        assert_eq!(available_features().len(), 4);
    }

    #[test]
    fn test_get_feature_info() {
        let form = get_feature_info("driver_form");
        assert!(form.is_some());
        let form = form.unwrap();
        assert_eq!(form.name, "driver_form");
        assert!(!form.post_race_proxy);
        assert!(form.required_columns.contains(&schema::EVENT_DATE));

        let nonexistent = get_feature_info("nonexistent_feature");
        assert!(nonexistent.is_none());
    }

    #[test]
    fn test_proxies_are_flagged() {
        let map = feature_map();
        assert!(map["constructor_points"].post_race_proxy);
        assert!(map["reliability"].post_race_proxy);
        assert!(!map["track_history"].post_race_proxy);
    }

    #[test]
    fn test_registry_matches_engine() {
        let engine = crate::FeatureEngine::default();
        assert_eq!(engine.feature_names(), list_feature_names());
    }

    #[test]
    fn test_all_features_have_required_columns() {
        for feature in available_features() {
            assert!(
                !feature.required_columns.is_empty(),
                "Feature {} has no required columns",
                feature.name
            );
            assert!(
                !feature.output_columns.is_empty(),
                "Feature {} has no output columns",
                feature.name
            );
        }
    }
}
