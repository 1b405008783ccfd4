//! Query-side model: targets, metric and bucket aggregation definitions
//!
//! These mirror what the dashboard stores for each query, deserialized from
//! its camelCase JSON.

pub mod defs;
mod types;

pub use defs::{describe_metric, metric_label, HighlightTags};
pub use types::*;
