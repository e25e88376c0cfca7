#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/paddock-labs/paddock/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod pipeline;

// Re-export main types from sub-crates
pub use paddock_data as data;
pub use paddock_eval as eval;
pub use paddock_features as features;
pub use paddock_output as output;

pub use pipeline::{PipelineConfig, PipelineError, run_evaluation};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
