use super::buckets::Bucket;
use super::metrics::{hoisted_stats, percentile_levels, percentile_value};
use super::props::PropMap;
use crate::query::{metric_label, BucketAgg, MetricType, SourceQuery};
use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Column {
    pub text: String,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub filterable: bool,
}

/// Table built from the leaf level of a non-histogram aggregation
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableModel {
    pub columns: Vec<Column>,
    pub rows: Vec<Vec<Value>>,
    #[serde(rename = "type")]
    pub kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ref_id: Option<String>,
}

impl TableModel {
    pub fn new() -> Self {
        Self {
            kind: "table",
            ..Default::default()
        }
    }

    /// Add a column unless one with the same text exists
    pub fn add_column(&mut self, text: impl Into<String>, filterable: bool) {
        let text = text.into();
        if self.columns.iter().any(|c| c.text == text) {
            return;
        }
        self.columns.push(Column { text, filterable });
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Emit one table row per bucket of a terms/filters style aggregation.
///
/// Group-by columns are set up from the first call only; metric columns are
/// added as values are produced. Every metric gets a value, hidden or not.
pub fn process_aggregation_docs(
    buckets: &[Bucket<'_>],
    agg_def: &BucketAgg,
    query: &SourceQuery,
    table: &mut TableModel,
    props: &PropMap,
) {
    if table.columns.is_empty() {
        for key in props.keys() {
            table.add_column(key.as_str(), true);
        }
        table.add_column(agg_def.group_field(), true);
    }

    for bucket in buckets {
        let mut values: Vec<Value> = props.values().cloned().collect();
        values.push(bucket.key_value());

        for metric in &query.metrics {
            match &metric.metric_type {
                MetricType::Count => {
                    table.add_column(metric_label("count"), false);
                    values.push(bucket.body.get("doc_count").cloned().unwrap_or(Value::Null));
                }
                MetricType::ExtendedStats => {
                    let stats = hoisted_stats(bucket, &metric.id);
                    for stat in metric.enabled_stats() {
                        table.add_column(metric_label(stat), false);
                        let value = stats
                            .as_ref()
                            .and_then(|s| s.get(stat))
                            .cloned()
                            .unwrap_or(Value::Null);
                        values.push(value);
                    }
                }
                MetricType::Percentiles => {
                    for level in percentile_levels(bucket, &metric.id) {
                        let column = match metric.field.as_deref() {
                            Some(field) if !field.is_empty() => format!("p{} {}", level, field),
                            _ => format!("p{}", level),
                        };
                        table.add_column(column, false);
                        values.push(percentile_value(bucket, &metric.id, &level));
                    }
                }
                other => {
                    let mut name = metric_label(other.as_str()).to_string();
                    // Several metrics of one type are told apart by field
                    let same_type = query
                        .metrics
                        .iter()
                        .filter(|m| &m.metric_type == other)
                        .count();
                    if same_type > 1 {
                        name = format!("{} {}", name, metric.field.as_deref().unwrap_or_default());
                    }
                    table.add_column(name, false);
                    let value = bucket.metric(&metric.id).and_then(|m| m.get("value"));
                    values.push(value.cloned().unwrap_or(Value::Null));
                }
            }
        }

        table.rows.push(values);
    }
}
