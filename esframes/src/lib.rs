//! Elasticsearch response reshaping for visualization data sources
//!
//! This crate turns the body of an Elasticsearch `_msearch` response, together
//! with the queries (targets) that produced it, into the shapes a dashboard
//! understands:
//!
//! - time series, one per metric and group-by path of a date histogram
//! - tables, one row per bucket of a terms/filters aggregation
//! - document series and wide data frames built from raw hits
//!
//! # Supported aggregations
//!
//! Bucket aggregations:
//! - `date_histogram` (leaf level produces time series)
//! - `terms`, `filters`, `histogram`, `geohash_grid` (leaf level produces tables)
//!
//! Metric aggregations:
//! - `count`, `avg`, `sum`, `min`, `max`, `cardinality`
//! - `percentiles` / `extended_stats`
//! - pipeline aggregations (`derivative`, `moving_avg`, `bucket_script`, ...)

pub mod aggregations;
pub mod config;
pub mod error;
pub mod flatten;
pub mod frame;
pub mod hits;
pub mod naming;
pub mod query;
pub mod response;

pub use config::Config;
pub use error::{Error, Result};
pub use frame::{DataFrame, Field, FieldType};
pub use query::{BucketAgg, BucketAggType, MetricAgg, MetricType, SourceQuery, Target};
pub use response::{DataQueryResponse, EventResponse, MSearchResponse, ResponseData};
