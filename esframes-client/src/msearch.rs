//! Newline-delimited `_msearch` request bodies

use crate::error::Result;
use serde::Deserialize;
use serde_json::{Map, Value};

/// One search of a multi-search request
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchRequest {
    /// Header line (`index`, `search_type`, ...)
    #[serde(default)]
    pub header: Map<String, Value>,
    pub body: Value,
}

/// Multi-search body: a header line and a body line per search
#[derive(Debug, Clone, Default)]
pub struct MultiSearchBody {
    searches: Vec<SearchRequest>,
}

impl MultiSearchBody {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, search: SearchRequest) {
        self.searches.push(search);
    }

    pub fn len(&self) -> usize {
        self.searches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.searches.is_empty()
    }

    /// Render as NDJSON, each line terminated by `\n`
    pub fn to_ndjson(&self) -> Result<String> {
        let mut out = String::new();
        for search in &self.searches {
            out.push_str(&serde_json::to_string(&search.header)?);
            out.push('\n');
            out.push_str(&serde_json::to_string(&search.body)?);
            out.push('\n');
        }
        Ok(out)
    }
}

impl FromIterator<SearchRequest> for MultiSearchBody {
    fn from_iter<I: IntoIterator<Item = SearchRequest>>(iter: I) -> Self {
        Self {
            searches: iter.into_iter().collect(),
        }
    }
}
