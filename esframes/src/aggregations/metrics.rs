//! Metric values at the leaf level of the bucket tree
//!
//! [`process_metrics`] turns the buckets of a date histogram into one time
//! series per visible metric (or per percentile / enabled stat). The value
//! helpers are shared with the table builder.

use super::buckets::Bucket;
use super::props::PropMap;
use super::series::TimeSeries;
use crate::query::{MetricType, SourceQuery};
use serde_json::{Map, Value};

const BOUNDS_UPPER: &str = "std_deviation_bounds_upper";
const BOUNDS_LOWER: &str = "std_deviation_bounds_lower";

/// Emit one series per visible metric for the buckets of a date histogram.
pub fn process_metrics(
    buckets: &[Bucket<'_>],
    query: &SourceQuery,
    series_list: &mut Vec<TimeSeries>,
    props: &PropMap,
) {
    for metric in query.metrics.iter().filter(|m| !m.hide) {
        match &metric.metric_type {
            MetricType::Count => {
                let mut series = TimeSeries::new("count", props.clone());
                for bucket in buckets {
                    series.push(bucket.doc_count.cloned().unwrap_or(Value::Null), bucket.key_value());
                }
                series_list.push(series);
            }
            MetricType::Percentiles => {
                let Some(first) = buckets.first() else {
                    continue;
                };
                // Percentile levels are read from the first bucket only
                for level in percentile_levels(first, &metric.id) {
                    let mut series = TimeSeries::new(format!("p{}", level), props.clone())
                        .with_field(metric.field.as_deref());
                    for bucket in buckets {
                        series.push(percentile_value(bucket, &metric.id, &level), bucket.key_value());
                    }
                    series_list.push(series);
                }
            }
            MetricType::ExtendedStats => {
                let stats: Vec<Option<Map<String, Value>>> = buckets
                    .iter()
                    .map(|b| hoisted_stats(b, &metric.id))
                    .collect();

                for stat in metric.enabled_stats() {
                    let mut series =
                        TimeSeries::new(stat, props.clone()).with_field(metric.field.as_deref());
                    for (bucket, stats) in buckets.iter().zip(&stats) {
                        let value = stats.as_ref().and_then(|s| s.get(stat)).cloned();
                        series.push(value.unwrap_or(Value::Null), bucket.key_value());
                    }
                    series_list.push(series);
                }
            }
            other => {
                let mut series = TimeSeries::new(other.as_str(), props.clone())
                    .with_field(metric.field.as_deref())
                    .with_metric_id(&metric.id);
                for bucket in buckets {
                    // Buckets without this metric contribute no datapoint
                    if let Some(value) = bucket.metric(&metric.id) {
                        series.push(metric_value(value), bucket.key_value());
                    }
                }
                series_list.push(series);
            }
        }
    }
}

/// Percentile levels reported in a bucket, in response order
pub(crate) fn percentile_levels(bucket: &Bucket<'_>, metric_id: &str) -> Vec<String> {
    bucket
        .metric(metric_id)
        .and_then(|m| m.get("values"))
        .and_then(Value::as_object)
        .map(|values| values.keys().cloned().collect())
        .unwrap_or_default()
}

pub(crate) fn percentile_value(bucket: &Bucket<'_>, metric_id: &str, level: &str) -> Value {
    bucket
        .metric(metric_id)
        .and_then(|m| m.get("values"))
        .and_then(|v| v.get(level))
        .cloned()
        .unwrap_or(Value::Null)
}

/// Value of a single-value metric object.
///
/// Pipeline aggregations may report a `normalized_value` next to `value`; it
/// takes precedence when set and non-zero.
fn metric_value(value: &Value) -> Value {
    value
        .get("normalized_value")
        .filter(|n| n.as_f64().is_some_and(|n| n != 0.0))
        .or_else(|| value.get("value"))
        .cloned()
        .unwrap_or(Value::Null)
}

/// Copy of a bucket's extended stats with the nested standard deviation
/// bounds lifted to `std_deviation_bounds_upper` / `_lower`.
pub(crate) fn hoisted_stats(bucket: &Bucket<'_>, metric_id: &str) -> Option<Map<String, Value>> {
    let mut stats = bucket.metric(metric_id)?.as_object()?.clone();
    let bounds = stats.get("std_deviation_bounds").cloned();
    let upper = bounds.as_ref().and_then(|b| b.get("upper")).cloned();
    let lower = bounds.as_ref().and_then(|b| b.get("lower")).cloned();
    stats.insert(BOUNDS_UPPER.to_string(), upper.unwrap_or(Value::Null));
    stats.insert(BOUNDS_LOWER.to_string(), lower.unwrap_or(Value::Null));
    Some(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregations::buckets::buckets;
    use crate::query::MetricAgg;
    use serde_json::json;

    fn query(metrics: Vec<MetricAgg>) -> SourceQuery {
        SourceQuery {
            metrics,
            ..Default::default()
        }
    }

    #[test]
    fn test_count_series() {
        let agg = json!({ "buckets": [
            { "key": 100, "doc_count": 5 },
            { "key": 200, "doc_count": 2 },
            { "key": 300, "doc_count": 9 }
        ]});
        let mut out = Vec::new();
        process_metrics(
            &buckets(&agg),
            &query(vec![MetricAgg::new("1", MetricType::Count)]),
            &mut out,
            &PropMap::new(),
        );
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].metric, "count");
        let points: Vec<_> = out[0]
            .datapoints
            .iter()
            .map(|d| (d.value.clone(), d.key.clone()))
            .collect();
        assert_eq!(
            points,
            vec![
                (json!(5), json!(100)),
                (json!(2), json!(200)),
                (json!(9), json!(300))
            ]
        );
    }

    #[test]
    fn test_percentiles_from_first_bucket() {
        let agg = json!({ "buckets": [
            { "key": 1, "doc_count": 1, "3": { "values": { "25.0": 1.0, "75.0": 3.0 } } },
            { "key": 2, "doc_count": 1, "3": { "values": { "25.0": 2.0 } } }
        ]});
        let metric = MetricAgg::new("3", MetricType::Percentiles).with_field("latency");
        let mut out = Vec::new();
        process_metrics(&buckets(&agg), &query(vec![metric]), &mut out, &PropMap::new());

        assert_eq!(out.len(), 2);
        assert_eq!(out[0].metric, "p25.0");
        assert_eq!(out[1].metric, "p75.0");
        assert_eq!(out[0].field.as_deref(), Some("latency"));
        assert_eq!(out[1].datapoints[0].value, json!(3.0));
        assert_eq!(out[1].datapoints[1].value, Value::Null);
    }

    #[test]
    fn test_percentiles_without_buckets() {
        let agg = json!({ "buckets": [] });
        let mut out = Vec::new();
        process_metrics(
            &buckets(&agg),
            &query(vec![MetricAgg::new("3", MetricType::Percentiles)]),
            &mut out,
            &PropMap::new(),
        );
        assert!(out.is_empty());
    }

    #[test]
    fn test_extended_stats_hoists_bounds() {
        let agg = json!({ "buckets": [
            { "key": 1, "doc_count": 1, "4": {
                "max": 10.0,
                "std_deviation_bounds": { "upper": 7.5, "lower": 1.5 }
            }}
        ]});
        let mut metric = MetricAgg::new("4", MetricType::ExtendedStats).with_field("bytes");
        metric.meta = json!({ "max": true, "avg": false, "std_deviation_bounds_lower": true })
            .as_object()
            .cloned();
        let mut out = Vec::new();
        process_metrics(&buckets(&agg), &query(vec![metric]), &mut out, &PropMap::new());

        assert_eq!(out.len(), 2);
        assert_eq!(out[0].metric, "max");
        assert_eq!(out[0].datapoints[0].value, json!(10.0));
        assert_eq!(out[1].metric, "std_deviation_bounds_lower");
        assert_eq!(out[1].datapoints[0].value, json!(1.5));
        // Response itself is untouched
        assert!(agg["buckets"][0]["4"].get(BOUNDS_LOWER).is_none());
    }

    #[test]
    fn test_value_metric_skips_missing_buckets() {
        let agg = json!({ "buckets": [
            { "key": 1, "doc_count": 1, "5": { "value": 2.5 } },
            { "key": 2, "doc_count": 1 },
            { "key": 3, "doc_count": 1, "5": { "value": 1.0, "normalized_value": 0.5 } }
        ]});
        let metric = MetricAgg::new("5", MetricType::Avg).with_field("cpu");
        let mut out = Vec::new();
        process_metrics(&buckets(&agg), &query(vec![metric]), &mut out, &PropMap::new());

        assert_eq!(out.len(), 1);
        assert_eq!(out[0].metric, "avg");
        assert_eq!(out[0].metric_id.as_deref(), Some("5"));
        assert_eq!(out[0].datapoints.len(), 2);
        assert_eq!(out[0].datapoints[1].value, json!(0.5));
    }

    #[test]
    fn test_values_pass_through_unconverted() {
        let agg = json!({ "buckets": [
            { "key": 100, "doc_count": 5, "3": { "value": 9007199254740993u64 } },
            { "key": 200, "doc_count": 2, "3": { "value": 4, "normalized_value": 0 } }
        ]});
        let query = query(vec![
            MetricAgg::new("1", MetricType::Count),
            MetricAgg::new("3", MetricType::Sum).with_field("bytes"),
        ]);
        let mut out = Vec::new();
        process_metrics(&buckets(&agg), &query, &mut out, &PropMap::new());

        assert_eq!(
            serde_json::to_value(&out[0].datapoints).unwrap(),
            json!([[5, 100], [2, 200]])
        );
        assert_eq!(
            serde_json::to_string(&out[1].datapoints).unwrap(),
            "[[9007199254740993,100],[4,200]]"
        );
    }

    #[test]
    fn test_hidden_metrics_skipped() {
        let agg = json!({ "buckets": [{ "key": 1, "doc_count": 1 }] });
        let mut hidden = MetricAgg::new("1", MetricType::Count);
        hidden.hide = true;
        let mut out = Vec::new();
        process_metrics(&buckets(&agg), &query(vec![hidden]), &mut out, &PropMap::new());
        assert!(out.is_empty());
    }

    #[test]
    fn test_series_carry_props() {
        let agg = json!({ "buckets": [{ "key": 1, "doc_count": 1 }] });
        let mut props = PropMap::new();
        props.insert("host".to_string(), json!("web1"));
        let mut out = Vec::new();
        process_metrics(
            &buckets(&agg),
            &query(vec![MetricAgg::new("1", MetricType::Count)]),
            &mut out,
            &props,
        );
        assert_eq!(out[0].props["host"], json!("web1"));
    }
}
