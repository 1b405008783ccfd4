//! Group-by bindings accumulated while descending the bucket tree

use serde_json::{Map, Value};

/// Materialized group-by values: field name to bucket value, in binding order
pub type PropMap = Map<String, Value>;

/// Persistent chain of group-by bindings.
///
/// Each level of the walk borrows its parent and adds one binding, so sibling
/// subtrees never see each other's values and nothing is cloned on the way
/// down.
#[derive(Debug)]
pub enum Props<'a> {
    Root,
    Bound {
        parent: &'a Props<'a>,
        key: &'a str,
        value: Value,
    },
}

impl<'a> Props<'a> {
    pub fn bind(&'a self, key: &'a str, value: Value) -> Props<'a> {
        Props::Bound {
            parent: self,
            key,
            value,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Props::Root)
    }

    /// Flatten the chain into an ordered map.
    ///
    /// A key bound twice keeps the position of its first binding and the
    /// value of its last one.
    pub fn to_map(&self) -> PropMap {
        let mut chain = Vec::new();
        let mut node = self;
        while let Props::Bound { parent, key, value } = node {
            chain.push((*key, value));
            node = *parent;
        }

        let mut map = PropMap::new();
        for (key, value) in chain.into_iter().rev() {
            map.insert(key.to_string(), value.clone());
        }
        map
    }
}

/// String form of a bucket value as used in names and labels
pub fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => match (n.as_i64(), n.as_u64(), n.as_f64()) {
            (Some(i), _, _) => i.to_string(),
            (_, Some(u), _) => u.to_string(),
            (_, _, Some(f)) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", f as i64),
            _ => n.to_string(),
        },
        Value::Null => "null".to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_root_is_empty() {
        let root = Props::Root;
        assert!(root.is_empty());
        assert!(root.to_map().is_empty());
    }

    #[test]
    fn test_bindings_in_order() {
        let root = Props::Root;
        let host = root.bind("host", json!("web1"));
        let dc = host.bind("dc", json!("eu"));
        let map = dc.to_map();
        let keys: Vec<_> = map.keys().cloned().collect();
        assert_eq!(keys, vec!["host", "dc"]);
        assert_eq!(map["dc"], json!("eu"));
    }

    #[test]
    fn test_siblings_do_not_share() {
        let root = Props::Root;
        let a = root.bind("host", json!("a"));
        let b = root.bind("host", json!("b"));
        assert_eq!(a.to_map()["host"], json!("a"));
        assert_eq!(b.to_map()["host"], json!("b"));
        assert!(root.to_map().is_empty());
    }

    #[test]
    fn test_rebinding_keeps_position() {
        let root = Props::Root;
        let ts = root.bind("@timestamp", json!(1000));
        let filter = ts.bind("filter", json!("0"));
        let labelled = filter.bind("@timestamp", json!("2024-01-01"));
        let map = labelled.to_map();
        let keys: Vec<_> = map.keys().cloned().collect();
        assert_eq!(keys, vec!["@timestamp", "filter"]);
        assert_eq!(map["@timestamp"], json!("2024-01-01"));
    }

    #[test]
    fn test_display_value() {
        assert_eq!(display_value(&json!("web1")), "web1");
        assert_eq!(display_value(&json!(100)), "100");
        assert_eq!(display_value(&json!(100.0)), "100");
        assert_eq!(display_value(&json!(1.5)), "1.5");
        assert_eq!(display_value(&json!(true)), "true");
        assert_eq!(display_value(&json!(null)), "null");
    }
}
