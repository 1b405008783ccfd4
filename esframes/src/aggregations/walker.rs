use super::buckets::{buckets, normalize_agg_id};
use super::metrics::process_metrics;
use super::props::Props;
use super::series::TimeSeries;
use super::table::{process_aggregation_docs, TableModel};
use crate::query::{BucketAggType, SourceQuery};
use serde_json::{Map, Value};
use tracing::{debug, trace};

/// Walk the aggregation tree depth-first.
///
/// `aggs` is either the top-level `aggregations` object or a bucket whose
/// entries hold the next level. At the last configured bucket aggregation the
/// buckets are handed to the series builder (date histograms) or the table
/// builder (everything else). Aggregation ids with no matching definition are
/// skipped.
pub fn process_buckets(
    aggs: &Map<String, Value>,
    query: &SourceQuery,
    series_list: &mut Vec<TimeSeries>,
    table: &mut TableModel,
    props: &Props<'_>,
    depth: usize,
) {
    let max_depth = query.bucket_aggs.len().saturating_sub(1);

    for (agg_id, es_agg) in aggs {
        let Some(agg_def) = query.find_bucket_agg(normalize_agg_id(agg_id)) else {
            trace!(agg_id = %agg_id, depth, "no bucket aggregation definition, skipping");
            continue;
        };

        let agg_buckets = buckets(es_agg);

        if depth == max_depth {
            let leaf_props = props.to_map();
            if agg_def.agg_type == BucketAggType::DateHistogram {
                debug!(agg_id = %agg_id, buckets = agg_buckets.len(), "building metric series");
                process_metrics(&agg_buckets, query, series_list, &leaf_props);
            } else {
                debug!(agg_id = %agg_id, buckets = agg_buckets.len(), "building table rows");
                process_aggregation_docs(&agg_buckets, agg_def, query, table, &leaf_props);
            }
            continue;
        }

        let field = agg_def.group_field();
        for bucket in &agg_buckets {
            let keyed = match bucket.key {
                Some(key) => props.bind(field, key.clone()),
                None => props.bind("filter", Value::String(bucket.name.clone())),
            };
            let labelled;
            let child = match bucket.key_as_string {
                Some(label) => {
                    labelled = keyed.bind(field, Value::String(label.to_string()));
                    &labelled
                }
                None => &keyed,
            };
            process_buckets(bucket.body, query, series_list, table, child, depth + 1);
        }
    }
}
