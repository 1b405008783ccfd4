use serde_json::{Map, Value};

/// Map an engine aggregation id back to the id used in the query.
///
/// Some aggregations come back namespaced as `type#id`; only the part after
/// the last `#` is kept.
pub fn normalize_agg_id(id: &str) -> &str {
    id.rsplit_once('#').map(|(_, tail)| tail).unwrap_or(id)
}

/// Borrowed view of one bucket of a bucket aggregation
#[derive(Debug, Clone)]
pub struct Bucket<'a> {
    /// Bucket name for keyed buckets, array index otherwise
    pub name: String,
    pub key: Option<&'a Value>,
    pub key_as_string: Option<&'a str>,
    pub doc_count: Option<&'a Value>,
    /// Whole bucket object, holding metric values and sub-aggregations
    pub body: &'a Map<String, Value>,
}

impl<'a> Bucket<'a> {
    fn from_value(name: String, value: &'a Value) -> Option<Self> {
        let body = value.as_object()?;
        Some(Self {
            name,
            key: body.get("key").filter(|k| !k.is_null()),
            key_as_string: body.get("key_as_string").and_then(|k| k.as_str()),
            doc_count: body.get("doc_count"),
            body,
        })
    }

    /// Bucket key, falling back to the bucket name for keyed buckets
    pub fn key_value(&self) -> Value {
        self.key
            .cloned()
            .unwrap_or_else(|| Value::String(self.name.clone()))
    }

    /// Metric value object stored under `metric_id`
    pub fn metric(&self, metric_id: &str) -> Option<&'a Value> {
        self.body.get(metric_id)
    }
}

/// Buckets of an aggregation result, in response order.
///
/// Handles both array buckets and keyed (object) buckets. Anything else,
/// including metric value objects, yields no buckets.
pub fn buckets(agg: &Value) -> Vec<Bucket<'_>> {
    match agg.get("buckets") {
        Some(Value::Array(items)) => items
            .iter()
            .enumerate()
            .filter_map(|(i, b)| Bucket::from_value(i.to_string(), b))
            .collect(),
        Some(Value::Object(keyed)) => keyed
            .iter()
            .filter_map(|(name, b)| Bucket::from_value(name.clone(), b))
            .collect(),
        _ => Vec::new(),
    }
}
