//! Engine response types (`_msearch` body)

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Multi-search response: one sub-response per target, in target order
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct MSearchResponse {
    #[serde(default)]
    pub took: Option<u64>,
    #[serde(default)]
    pub responses: Vec<SubResponse>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SubResponse {
    /// Engine error body; its presence fails the whole batch
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hits: Option<Hits>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aggregations: Option<Map<String, Value>>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Hits {
    #[serde(default)]
    pub total: Option<TotalHits>,
    #[serde(default)]
    pub hits: Vec<Hit>,
}

impl Hits {
    pub fn total_value(&self) -> u64 {
        self.total.as_ref().map(TotalHits::value).unwrap_or(0)
    }
}

/// `hits.total`: a bare number before Elasticsearch 7, an object after
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(untagged)]
pub enum TotalHits {
    Count(u64),
    Object {
        value: u64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        relation: Option<String>,
    },
}

impl TotalHits {
    pub fn value(&self) -> u64 {
        match self {
            TotalHits::Count(n) => *n,
            TotalHits::Object { value, .. } => *value,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Hit {
    #[serde(rename = "_id", default)]
    pub id: Option<String>,
    #[serde(rename = "_type", default)]
    pub doc_type: Option<String>,
    #[serde(rename = "_index", default)]
    pub index: Option<String>,
    #[serde(default)]
    pub sort: Option<Value>,
    /// Field name to highlighted snippets
    #[serde(default)]
    pub highlight: Option<Map<String, Value>>,
    #[serde(rename = "_source", default)]
    pub source: Option<Value>,
    #[serde(default)]
    pub fields: Option<Map<String, Value>>,
}

impl Hit {
    /// `_id`, `_type`, `_index`, `sort`, `highlight`; absent ones as null
    pub fn meta_entries(&self) -> [(&'static str, Value); 5] {
        [
            ("_id", opt_string(&self.id)),
            ("_type", opt_string(&self.doc_type)),
            ("_index", opt_string(&self.index)),
            ("sort", self.sort.clone().unwrap_or(Value::Null)),
            (
                "highlight",
                self.highlight
                    .clone()
                    .map(Value::Object)
                    .unwrap_or(Value::Null),
            ),
        ]
    }

    /// All highlighted snippets, field by field
    pub fn highlight_lines(&self) -> impl Iterator<Item = &str> {
        self.highlight
            .iter()
            .flat_map(|h| h.values())
            .filter_map(Value::as_array)
            .flatten()
            .filter_map(Value::as_str)
    }
}

fn opt_string(s: &Option<String>) -> Value {
    s.clone().map(Value::String).unwrap_or(Value::Null)
}
