#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/paddock-labs/paddock/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod error;
pub mod loader;
pub mod schema;
pub mod synthetic;

pub use error::{DataError, Result};
pub use loader::read_events_csv;
pub use schema::{validate_schema, winner_uniqueness_violations};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
