//! Aggregation tree processing
//!
//! The engine returns nested buckets keyed by aggregation id. The walker in
//! [`walker`] descends them depth-first, binding group-by values into
//! [`Props`] along the way, and hands the leaf level either to the
//! metric-series builder ([`metrics`]) for date histograms or to the
//! table-row builder ([`table`]) for everything else.

pub mod buckets;
pub mod metrics;
pub mod props;
pub mod series;
pub mod table;
pub mod walker;

pub use buckets::{buckets, normalize_agg_id, Bucket};
pub use props::{display_value, PropMap, Props};
pub use series::{trim_datapoints, Datapoint, TimeSeries};
pub use table::{Column, TableModel};
pub use walker::process_buckets;
