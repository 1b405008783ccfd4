//! Display names for time series

use crate::aggregations::{display_value, TimeSeries};
use crate::query::{describe_metric, metric_label, MetricType, SourceQuery};
use lazy_static::lazy_static;
use regex::{Captures, Regex};
use std::collections::HashSet;

lazy_static! {
    static ref ALIAS_TOKEN: Regex = Regex::new(r"\{\{([\s\S]+?)\}\}").unwrap();
}

const UNSET: &str = "Unset";

/// Set `target` on every series of one query.
///
/// The metric name is left out of prop-based names when every series carries
/// the same metric.
pub fn name_series(series_list: &mut [TimeSeries], query: &SourceQuery) {
    let metric_type_count = series_list
        .iter()
        .map(|s| s.metric.as_str())
        .collect::<HashSet<_>>()
        .len();

    for series in series_list.iter_mut() {
        series.target = Some(series_name(series, query, metric_type_count));
    }
}

/// Name a single series.
///
/// With an alias template each `{{token}}` is substituted from the series;
/// tokens that resolve to nothing stay as written. Without an alias the name
/// is built from the group-by values and the metric description.
pub fn series_name(series: &TimeSeries, query: &SourceQuery, metric_type_count: usize) -> String {
    let label = metric_label(&series.metric);

    if let Some(alias) = query.alias.as_deref().filter(|a| !a.is_empty()) {
        return expand_alias(alias, series, label);
    }

    let metric_name = metric_name(series, query, label);

    if series.props.is_empty() {
        return metric_name;
    }

    let props = series
        .props
        .values()
        .map(display_value)
        .collect::<Vec<_>>()
        .join(" ");
    let props = props.trim();

    if metric_type_count == 1 {
        props.to_string()
    } else {
        format!("{} {}", props, metric_name)
    }
}

fn expand_alias(alias: &str, series: &TimeSeries, label: &str) -> String {
    ALIAS_TOKEN
        .replace_all(alias, |caps: &Captures<'_>| {
            let whole = &caps[0];
            let group = &caps[1];

            if let Some(prop) = group.strip_prefix("term ") {
                return series
                    .props
                    .get(prop)
                    .map(display_value)
                    .unwrap_or_else(|| whole.to_string());
            }
            if let Some(value) = series.props.get(group) {
                return display_value(value);
            }
            match group {
                "metric" => label.to_string(),
                "field" => series.field.clone().unwrap_or_default(),
                _ => whole.to_string(),
            }
        })
        .into_owned()
}

fn metric_name(series: &TimeSeries, query: &SourceQuery, label: &str) -> String {
    let metric_type = MetricType::from(series.metric.clone());

    if metric_type.has_multiple_bucket_paths() {
        return script_name(series, query).unwrap_or_else(|| UNSET.to_string());
    }

    match series.field.as_deref() {
        Some(field) if metric_type.is_pipeline() && !field.is_empty() => {
            match query.find_metric(field) {
                Some(applied) => format!("{} {}", label, describe_metric(applied)),
                None => UNSET.to_string(),
            }
        }
        Some(field) if !field.is_empty() => format!("{} {}", label, field),
        _ => label.to_string(),
    }
}

/// Bucket script text with each `params.<var>` replaced by the description
/// of the metric the variable points at
fn script_name(series: &TimeSeries, query: &SourceQuery) -> Option<String> {
    let agg = query.find_metric(series.metric_id.as_deref()?)?;
    let mut name = agg.script()?.to_string();

    // longest names first so `params.var1` never clobbers `params.var10`
    let mut vars: Vec<_> = agg.pipeline_variables.iter().collect();
    vars.sort_by_key(|pv| std::cmp::Reverse(pv.name.len()));

    for pv in vars {
        let applied = query.find_metric(&pv.pipeline_agg)?;
        name = name.replace(&format!("params.{}", pv.name), &describe_metric(applied));
    }
    Some(name)
}
