use super::props::PropMap;
use crate::query::SourceQuery;
use serde::ser::SerializeTuple;
use serde::{Serialize, Serializer};
use serde_json::Value;

/// One `[value, key]` pair of a time series.
///
/// The value is kept exactly as the engine reported it; missing values are
/// `null`.
#[derive(Debug, Clone, PartialEq)]
pub struct Datapoint {
    pub value: Value,
    pub key: Value,
}

impl Datapoint {
    pub fn new(value: Value, key: Value) -> Self {
        Self { value, key }
    }
}

impl Serialize for Datapoint {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut tup = serializer.serialize_tuple(2)?;
        tup.serialize_element(&self.value)?;
        tup.serialize_element(&self.key)?;
        tup.end()
    }
}

/// Series produced at the leaf level of a date histogram
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSeries {
    /// Display name, filled in by the namer
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    pub datapoints: Vec<Datapoint>,
    /// Metric type, percentile (`p95`) or extended stat name
    pub metric: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metric_id: Option<String>,
    pub props: PropMap,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ref_id: Option<String>,
}

impl TimeSeries {
    pub fn new(metric: impl Into<String>, props: PropMap) -> Self {
        Self {
            target: None,
            datapoints: Vec::new(),
            metric: metric.into(),
            field: None,
            metric_id: None,
            props,
            ref_id: None,
        }
    }

    pub fn with_field(mut self, field: Option<&str>) -> Self {
        self.field = field.map(str::to_string);
        self
    }

    pub fn with_metric_id(mut self, metric_id: &str) -> Self {
        self.metric_id = Some(metric_id.to_string());
        self
    }

    pub fn push(&mut self, value: Value, key: Value) {
        self.datapoints.push(Datapoint::new(value, key));
    }
}

/// Drop `trimEdges` datapoints from both ends of every series.
///
/// Series with `2 * trimEdges` points or fewer are left untouched.
pub fn trim_datapoints(series_list: &mut [TimeSeries], query: &SourceQuery) {
    let Some(trim) = query.date_histogram().and_then(|h| h.trim_edges()) else {
        return;
    };

    for series in series_list.iter_mut() {
        let len = series.datapoints.len();
        if len > trim * 2 {
            series.datapoints.truncate(len - trim);
            series.datapoints.drain(..trim);
        }
    }
}
