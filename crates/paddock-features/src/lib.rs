#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/paddock-labs/paddock/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod engine;
pub mod error;
pub mod form;
pub mod points;
pub mod registry;
pub mod reliability;
pub mod track;

pub use engine::{Feature, FeatureConfig, FeatureEngine};
pub use error::FeatureError;
pub use form::{DriverFormConfig, DriverFormFeature};
pub use points::ConstructorPointsFeature;
pub use registry::{FeatureInfo, available_features, get_feature_info};
pub use reliability::ReliabilityFeature;
pub use track::TrackHistoryFeature;

/// Derived column: mean finish over the driver's trailing prior events.
pub const DRIVER_FORM_AVG_FINISH: &str = "driver_form_avg_finish";
/// Derived column: same-event constructor points sum (post-race proxy).
pub const CONSTRUCTOR_POINTS_SUM: &str = "constructor_points_sum";
/// Derived column: expanding mean of the driver's prior finishes at this event name.
pub const DRIVER_TRACK_HISTORY_AVG_FINISH: &str = "driver_track_history_avg_finish";
/// Derived column: 1 when the status text matches a failure keyword.
pub const DRIVER_DNF_FLAG: &str = "driver_dnf_flag";
/// Derived column: same-event mean DNF flag per constructor (post-race proxy).
pub const TEAM_DNF_RATE: &str = "team_dnf_rate";
