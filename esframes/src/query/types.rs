use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One configured query and the definition it was built from
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Target {
    /// Correlates the query with its sub-response and output frames
    pub ref_id: String,

    /// Time field used for hit frames
    #[serde(default)]
    pub time_field: Option<String>,

    #[serde(default)]
    pub source_query: SourceQuery,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceQuery {
    #[serde(default)]
    pub metrics: Vec<MetricAgg>,

    /// Bucket aggregations, outermost first
    #[serde(default)]
    pub bucket_aggs: Vec<BucketAgg>,

    /// Series name template, e.g. `{{term host}} {{metric}}`
    #[serde(default)]
    pub alias: Option<String>,

    /// Lucene query text (not interpreted here)
    #[serde(default)]
    pub query: Option<String>,
}

impl SourceQuery {
    pub fn find_metric(&self, id: &str) -> Option<&MetricAgg> {
        self.metrics.iter().find(|m| m.id == id)
    }

    pub fn find_bucket_agg(&self, id: &str) -> Option<&BucketAgg> {
        self.bucket_aggs.iter().find(|b| b.id == id)
    }

    /// The first date histogram, if any
    pub fn date_histogram(&self) -> Option<&BucketAgg> {
        self.bucket_aggs
            .iter()
            .find(|b| b.agg_type == BucketAggType::DateHistogram)
    }

    pub fn has_raw_data(&self) -> bool {
        self.metrics
            .iter()
            .any(|m| m.metric_type == MetricType::RawData)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricAgg {
    pub id: String,

    #[serde(rename = "type")]
    pub metric_type: MetricType,

    #[serde(default)]
    pub field: Option<String>,

    #[serde(default)]
    pub hide: bool,

    /// Per-stat switches for `extended_stats`
    #[serde(default)]
    pub meta: Option<Map<String, Value>>,

    #[serde(default)]
    pub settings: Option<Map<String, Value>>,

    #[serde(default)]
    pub pipeline_variables: Vec<PipelineVariable>,
}

impl MetricAgg {
    pub fn new(id: impl Into<String>, metric_type: MetricType) -> Self {
        Self {
            id: id.into(),
            metric_type,
            field: None,
            hide: false,
            meta: None,
            settings: None,
            pipeline_variables: Vec::new(),
        }
    }

    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    /// Names of the extended stats switched on in `meta`, in declared order
    pub fn enabled_stats(&self) -> Vec<&str> {
        self.meta
            .iter()
            .flat_map(|meta| meta.iter())
            .filter(|(_, on)| is_truthy(on))
            .map(|(name, _)| name.as_str())
            .collect()
    }

    /// Script text of a bucket script, either inline or `{inline: ...}`
    pub fn script(&self) -> Option<&str> {
        let script = self.settings.as_ref()?.get("script")?;
        match script {
            Value::String(s) if !s.is_empty() => Some(s.as_str()),
            Value::Object(obj) => obj
                .get("inline")
                .and_then(|s| s.as_str())
                .filter(|s| !s.is_empty()),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineVariable {
    pub name: String,
    /// Id of the metric this variable reads from
    pub pipeline_agg: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BucketAgg {
    pub id: String,

    #[serde(rename = "type")]
    pub agg_type: BucketAggType,

    #[serde(default)]
    pub field: Option<String>,

    #[serde(default)]
    pub settings: Option<Map<String, Value>>,
}

impl BucketAgg {
    pub fn new(id: impl Into<String>, agg_type: BucketAggType) -> Self {
        Self {
            id: id.into(),
            agg_type,
            field: None,
            settings: None,
        }
    }

    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    /// Name under which this aggregation's bucket keys are grouped.
    /// Aggregations without a field (filters) group under `filter`.
    pub fn group_field(&self) -> &str {
        self.field.as_deref().unwrap_or("filter")
    }

    /// `settings.trimEdges`, stored either as a number or a numeric string
    pub fn trim_edges(&self) -> Option<usize> {
        let raw = self.settings.as_ref()?.get("trimEdges")?;
        let trim = match raw {
            Value::Number(n) => n.as_u64().map(|n| n as usize),
            Value::String(s) => s.trim().parse::<usize>().ok(),
            _ => None,
        }?;
        (trim > 0).then_some(trim)
    }
}

/// Metric aggregation types
///
/// Unknown types deserialize to `Other` and are treated as plain value
/// metrics.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(from = "String", into = "String")]
pub enum MetricType {
    Count,
    Avg,
    Sum,
    Max,
    Min,
    ExtendedStats,
    Percentiles,
    Cardinality,
    MovingAvg,
    MovingFn,
    Derivative,
    CumulativeSum,
    BucketScript,
    SerialDiff,
    RawDocument,
    RawData,
    Logs,
    Other(String),
}

impl MetricType {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Count => "count",
            Self::Avg => "avg",
            Self::Sum => "sum",
            Self::Max => "max",
            Self::Min => "min",
            Self::ExtendedStats => "extended_stats",
            Self::Percentiles => "percentiles",
            Self::Cardinality => "cardinality",
            Self::MovingAvg => "moving_avg",
            Self::MovingFn => "moving_fn",
            Self::Derivative => "derivative",
            Self::CumulativeSum => "cumulative_sum",
            Self::BucketScript => "bucket_script",
            Self::SerialDiff => "serial_diff",
            Self::RawDocument => "raw_document",
            Self::RawData => "raw_data",
            Self::Logs => "logs",
            Self::Other(s) => s,
        }
    }

    /// Pipeline aggregations read other metrics instead of documents
    pub fn is_pipeline(&self) -> bool {
        matches!(
            self,
            Self::MovingAvg
                | Self::MovingFn
                | Self::Derivative
                | Self::CumulativeSum
                | Self::BucketScript
                | Self::SerialDiff
        )
    }

    /// Pipeline aggregations that reference several metrics through variables
    pub fn has_multiple_bucket_paths(&self) -> bool {
        matches!(self, Self::BucketScript)
    }
}

impl From<String> for MetricType {
    fn from(s: String) -> Self {
        match s.as_str() {
            "count" => Self::Count,
            "avg" => Self::Avg,
            "sum" => Self::Sum,
            "max" => Self::Max,
            "min" => Self::Min,
            "extended_stats" => Self::ExtendedStats,
            "percentiles" => Self::Percentiles,
            "cardinality" => Self::Cardinality,
            "moving_avg" => Self::MovingAvg,
            "moving_fn" => Self::MovingFn,
            "derivative" => Self::Derivative,
            "cumulative_sum" => Self::CumulativeSum,
            "bucket_script" => Self::BucketScript,
            "serial_diff" => Self::SerialDiff,
            "raw_document" => Self::RawDocument,
            "raw_data" => Self::RawData,
            "logs" => Self::Logs,
            _ => Self::Other(s),
        }
    }
}

impl From<MetricType> for String {
    fn from(t: MetricType) -> Self {
        match t {
            MetricType::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

/// Bucket aggregation types
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(from = "String", into = "String")]
pub enum BucketAggType {
    DateHistogram,
    Histogram,
    Terms,
    Filters,
    GeohashGrid,
    Other(String),
}

impl BucketAggType {
    pub fn as_str(&self) -> &str {
        match self {
            Self::DateHistogram => "date_histogram",
            Self::Histogram => "histogram",
            Self::Terms => "terms",
            Self::Filters => "filters",
            Self::GeohashGrid => "geohash_grid",
            Self::Other(s) => s,
        }
    }
}

impl From<String> for BucketAggType {
    fn from(s: String) -> Self {
        match s.as_str() {
            "date_histogram" => Self::DateHistogram,
            "histogram" => Self::Histogram,
            "terms" => Self::Terms,
            "filters" => Self::Filters,
            "geohash_grid" => Self::GeohashGrid,
            _ => Self::Other(s),
        }
    }
}

impl From<BucketAggType> for String {
    fn from(t: BucketAggType) -> Self {
        match t {
            BucketAggType::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

/// Loose truthiness for switches stored as bools, numbers or strings
fn is_truthy(v: &Value) -> bool {
    match v {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Null => false,
        Value::Array(_) | Value::Object(_) => true,
    }
}
