//! Display labels and highlight markers shared by the response builders

use super::MetricAgg;
use crate::config::HighlightConfig;
use crate::error::Result;
use regex::Regex;

/// Labels for metric aggregation types
const METRIC_AGG_LABELS: &[(&str, &str)] = &[
    ("count", "Count"),
    ("avg", "Average"),
    ("sum", "Sum"),
    ("max", "Max"),
    ("min", "Min"),
    ("extended_stats", "Extended Stats"),
    ("percentiles", "Percentiles"),
    ("cardinality", "Unique Count"),
    ("moving_avg", "Moving Average"),
    ("moving_fn", "Moving Function"),
    ("derivative", "Derivative"),
    ("cumulative_sum", "Cumulative Sum"),
    ("bucket_script", "Bucket Script"),
    ("serial_diff", "Serial Difference"),
    ("raw_document", "Raw Document"),
    ("raw_data", "Raw Data"),
    ("logs", "Logs"),
];

/// Labels for the individual statistics of `extended_stats`
const EXTENDED_STAT_LABELS: &[(&str, &str)] = &[
    ("avg", "Avg"),
    ("min", "Min"),
    ("max", "Max"),
    ("sum", "Sum"),
    ("count", "Count"),
    ("std_deviation", "Std Dev"),
    ("std_deviation_bounds_upper", "Std Dev Upper"),
    ("std_deviation_bounds_lower", "Std Dev Lower"),
];

/// Display label for a metric type or extended stat name.
///
/// Metric types are looked up first, then extended stats; unknown names
/// (including percentile series such as `p95`) are returned as-is.
pub fn metric_label(name: &str) -> &str {
    METRIC_AGG_LABELS
        .iter()
        .chain(EXTENDED_STAT_LABELS.iter())
        .find(|(value, _)| *value == name)
        .map(|(_, text)| *text)
        .unwrap_or(name)
}

/// Human description of a metric, e.g. `Average bytes`
pub fn describe_metric(metric: &MetricAgg) -> String {
    let label = metric_label(metric.metric_type.as_str());
    match metric.field.as_deref() {
        Some(field) if !field.is_empty() => format!("{} {}", label, field),
        _ => label.to_string(),
    }
}

/// Compiled highlight marker pattern
#[derive(Debug, Clone)]
pub struct HighlightTags {
    pattern: Regex,
}

impl HighlightTags {
    pub fn new(pre: &str, post: &str) -> Result<Self> {
        let pattern = Regex::new(&format!(
            "{}([^@]+?){}",
            regex::escape(pre),
            regex::escape(post)
        ))?;
        Ok(Self { pattern })
    }

    pub fn from_config(config: &HighlightConfig) -> Result<Self> {
        Self::new(&config.pre_tag, &config.post_tag)
    }

    /// Words wrapped in highlight markers, in order of appearance
    pub fn extract<'a>(&'a self, line: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.pattern
            .find_iter(line)
            .filter_map(|part| self.pattern.captures(part.as_str()))
            .filter_map(|caps| caps.get(1))
            .map(|m| m.as_str())
            .filter(|w| !w.is_empty())
    }
}
