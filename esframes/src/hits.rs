//! Hit documents to docs series and data frames

use crate::flatten::flatten;
use crate::frame::{DataFrame, Field, FieldConfig, FieldType};
use crate::query::{HighlightTags, Target};
use crate::response::{Hit, Hits};
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::trace;

/// Legacy `docs` series: one raw document per hit
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocsSeries {
    pub target: String,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub ref_id: String,
    pub datapoints: Vec<Map<String, Value>>,
    pub total: u64,
    pub filterable: bool,
}

/// Build the docs series for one target.
///
/// Each datapoint starts with the hit metadata (`_id`, `_type`, `_index`,
/// `sort`, `highlight`), followed by the `_source` keys and then the `fields`
/// keys. Later keys overwrite earlier ones in place.
pub fn process_hits(hits: &Hits, target: &Target) -> DocsSeries {
    let datapoints = hits
        .hits
        .iter()
        .map(|hit| {
            let mut doc: Map<String, Value> = hit
                .meta_entries()
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect();
            if let Some(Value::Object(source)) = &hit.source {
                for (k, v) in source {
                    doc.insert(k.clone(), v.clone());
                }
            }
            for (k, v) in hit.fields.iter().flatten() {
                doc.insert(k.clone(), v.clone());
            }
            doc
        })
        .collect();

    DocsSeries {
        target: target.ref_id.clone(),
        kind: "docs",
        ref_id: target.ref_id.clone(),
        datapoints,
        total: hits.total_value(),
        filterable: true,
    }
}

/// Flattened hit documents plus the sorted union of their keys
#[derive(Debug, Clone, Default)]
pub struct FlattenedHits {
    pub docs: Vec<Map<String, Value>>,
    pub prop_names: Vec<String>,
}

/// Flatten each hit's `_source` into dotted keys.
///
/// A doc holds the hit metadata, `_source` (the flattened copy), and then
/// every flattened key at top level.
pub fn flatten_hits(hits: &[Hit]) -> FlattenedHits {
    let mut docs = Vec::with_capacity(hits.len());
    let mut prop_names: Vec<String> = Vec::new();

    for hit in hits {
        let flattened = hit.source.as_ref().map(flatten).unwrap_or_default();

        let mut doc: Map<String, Value> = hit
            .meta_entries()
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect();
        doc.insert("_source".to_string(), Value::Object(flattened.clone()));
        doc.extend(flattened);

        for name in doc.keys() {
            if !prop_names.contains(name) {
                prop_names.push(name.clone());
            }
        }
        docs.push(doc);
    }

    prop_names.sort();
    FlattenedHits { docs, prop_names }
}

/// Options for turning hits into a frame
#[derive(Debug, Clone, Copy)]
pub struct HitsFrameOptions<'a> {
    pub time_field: &'a str,
    pub is_logs: bool,
    pub message_field: Option<&'a str>,
    pub level_field: Option<&'a str>,
}

/// Empty frame with one field per prop.
///
/// Field order: time field, log message field, `level`, then the remaining
/// props. Props already registered are skipped, as is `_source` outside logs
/// requests.
pub fn create_empty_data_frame(
    props: &[(String, FieldType)],
    opts: &HitsFrameOptions<'_>,
) -> DataFrame {
    let mut frame = DataFrame::new();
    frame.add_field(
        Field::new(opts.time_field, FieldType::Time).with_config(FieldConfig::filterable()),
    );

    if let Some(message) = opts.message_field {
        frame.add_field(Field::new(message, FieldType::String).empty_if_missing());
    }
    if opts.level_field.is_some() {
        frame.add_field(Field::new("level", FieldType::String).empty_if_missing());
    }

    for (name, field_type) in props {
        if frame.has_field(name) {
            continue;
        }
        if !opts.is_logs && name == "_source" {
            continue;
        }
        frame.add_field(
            Field::new(name.as_str(), *field_type)
                .with_config(FieldConfig::filterable())
                .empty_if_missing(),
        );
    }
    frame
}

/// Build the hits frame for one sub-response.
///
/// Returns `None` when there are no hits.
pub fn hits_to_data_frame(
    hits: &[Hit],
    opts: &HitsFrameOptions<'_>,
    tags: &HighlightTags,
) -> Option<DataFrame> {
    let FlattenedHits {
        mut docs,
        prop_names,
    } = flatten_hits(hits);
    if docs.is_empty() {
        return None;
    }

    let props: Vec<(String, FieldType)> = prop_names
        .into_iter()
        .map(|name| {
            let field_type = docs
                .iter()
                .filter_map(|doc| doc.get(&name))
                .find(|v| !v.is_null())
                .map(FieldType::guess)
                .unwrap_or(FieldType::Other);
            (name, field_type)
        })
        .collect();

    let mut frame = create_empty_data_frame(&props, opts);

    for (doc, hit) in docs.iter_mut().zip(hits) {
        if let Some(level_field) = opts.level_field {
            let level = doc.get(level_field).cloned().unwrap_or(Value::Null);
            doc.insert("level".to_string(), level);
        }

        if hit.highlight.is_some() {
            let words: Vec<String> = hit
                .highlight_lines()
                .flat_map(|line| tags.extract(line))
                .map(str::to_string)
                .collect();
            trace!(id = ?hit.id, words = words.len(), "highlight words");
            frame.add_search_words(words);
        }

        frame.add_row(doc);
    }

    Some(frame)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HighlightConfig;
    use serde_json::json;

    fn hits(value: Value) -> Hits {
        serde_json::from_value(value).unwrap()
    }

    fn tags() -> HighlightTags {
        HighlightTags::from_config(&HighlightConfig::default()).unwrap()
    }

    fn target() -> Target {
        Target {
            ref_id: "A".to_string(),
            ..Default::default()
        }
    }

    // ========================================================================
    // Docs series
    // ========================================================================

    #[test]
    fn test_process_hits_docs_series() {
        let hits = hits(json!({
            "total": { "value": 100, "relation": "eq" },
            "hits": [
                { "_id": "1", "_type": "_doc", "_index": "logs",
                  "_source": { "message": "hello", "host": "web1" },
                  "fields": { "host": ["web1-override"] } },
                { "_id": "2", "_index": "logs" }
            ]
        }));
        let series = process_hits(&hits, &target());

        assert_eq!(series.target, "A");
        assert_eq!(series.kind, "docs");
        assert_eq!(series.total, 100);
        assert_eq!(series.datapoints.len(), 2);

        let first = &series.datapoints[0];
        let keys: Vec<_> = first.keys().map(String::as_str).collect();
        assert_eq!(
            keys,
            vec!["_id", "_type", "_index", "sort", "highlight", "message", "host"]
        );
        assert_eq!(first["host"], json!(["web1-override"]));
        assert_eq!(series.datapoints[1]["_type"], Value::Null);
    }

    #[test]
    fn test_process_hits_bare_total() {
        let series = process_hits(&hits(json!({ "total": 7, "hits": [] })), &target());
        assert_eq!(series.total, 7);
        assert!(series.datapoints.is_empty());

        let v = serde_json::to_value(&series).unwrap();
        assert_eq!(v["type"], "docs");
        assert_eq!(v["refId"], "A");
        assert_eq!(v["filterable"], true);
    }

    // ========================================================================
    // Flattening
    // ========================================================================

    #[test]
    fn test_flatten_hits_prop_names_sorted() {
        let hits = hits(json!({
            "hits": [
                { "_id": "1", "_source": { "b": { "c": 1 }, "a": "x" } },
                { "_id": "2", "_source": { "z": true } }
            ]
        }));
        let flat = flatten_hits(&hits.hits);
        assert_eq!(
            flat.prop_names,
            vec!["_id", "_index", "_source", "_type", "a", "b.c", "highlight", "sort", "z"]
        );
        assert_eq!(flat.docs[0]["b.c"], json!(1));
        assert_eq!(flat.docs[0]["_source"], json!({ "b.c": 1, "a": "x" }));
    }

    // ========================================================================
    // Data frames
    // ========================================================================

    #[test]
    fn test_empty_frame_field_order() {
        let props = vec![
            ("@timestamp".to_string(), FieldType::String),
            ("_source".to_string(), FieldType::Other),
            ("host".to_string(), FieldType::String),
            ("msg".to_string(), FieldType::String),
        ];
        let opts = HitsFrameOptions {
            time_field: "@timestamp",
            is_logs: false,
            message_field: Some("msg"),
            level_field: Some("severity"),
        };
        let frame = create_empty_data_frame(&props, &opts);
        let names: Vec<_> = frame.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["@timestamp", "msg", "level", "host"]);
        assert_eq!(frame.fields[0].field_type, FieldType::Time);

        let logs = create_empty_data_frame(&props, &HitsFrameOptions { is_logs: true, ..opts });
        assert!(logs.has_field("_source"));
    }

    #[test]
    fn test_hits_frame_rows_and_level_remap() {
        let hits = hits(json!({
            "hits": [
                { "_id": "1", "_source": { "@timestamp": 1000, "msg": "boot", "sev": "info" } },
                { "_id": "2", "_source": { "@timestamp": 2000, "sev": "error", "code": 5 } }
            ]
        }));
        let opts = HitsFrameOptions {
            time_field: "@timestamp",
            is_logs: true,
            message_field: Some("msg"),
            level_field: Some("sev"),
        };
        let frame = hits_to_data_frame(&hits.hits, &opts, &tags()).unwrap();

        assert_eq!(frame.len(), 2);
        let level = frame.field("level").unwrap();
        assert_eq!(level.values, vec![json!("info"), json!("error")]);
        let msg = frame.field("msg").unwrap();
        assert_eq!(msg.values, vec![json!("boot"), json!("")]);
        let code = frame.field("code").unwrap();
        assert_eq!(code.field_type, FieldType::Number);
        assert_eq!(code.values, vec![json!(""), json!(5)]);
    }

    #[test]
    fn test_hits_frame_search_words() {
        let hits = hits(json!({
            "hits": [
                { "_id": "1", "_source": { "@timestamp": 1 },
                  "highlight": { "msg": ["an @HIGHLIGHT@error@/HIGHLIGHT@ on @HIGHLIGHT@disk@/HIGHLIGHT@"] } },
                { "_id": "2", "_source": { "@timestamp": 2 },
                  "highlight": { "msg": ["@HIGHLIGHT@error@/HIGHLIGHT@ again"] } }
            ]
        }));
        let opts = HitsFrameOptions {
            time_field: "@timestamp",
            is_logs: false,
            message_field: None,
            level_field: None,
        };
        let frame = hits_to_data_frame(&hits.hits, &opts, &tags()).unwrap();
        assert_eq!(
            frame.meta.unwrap().search_words.unwrap(),
            vec!["error", "disk"]
        );
    }

    #[test]
    fn test_no_hits_no_frame() {
        let opts = HitsFrameOptions {
            time_field: "@timestamp",
            is_logs: false,
            message_field: None,
            level_field: None,
        };
        assert!(hits_to_data_frame(&[], &opts, &tags()).is_none());
    }
}
