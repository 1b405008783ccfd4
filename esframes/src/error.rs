use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// The engine reported an error for one of the sub-responses.
    /// `data` holds the pretty-printed error body for diagnostics.
    #[error("{message}")]
    EngineQuery { message: String, data: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),
}

impl Error {
    /// Build the engine error raised for a sub-response carrying `error`.
    ///
    /// The message comes from `root_cause[0].reason`, then `reason`, then a
    /// fixed fallback.
    pub fn from_engine_error(err: &serde_json::Value) -> Self {
        let data = serde_json::to_string_pretty(err).unwrap_or_else(|_| err.to_string());

        let root_reason = err
            .get("root_cause")
            .and_then(|rc| rc.as_array())
            .and_then(|rc| rc.first())
            .and_then(|first| first.get("reason"))
            .and_then(|r| r.as_str())
            .filter(|r| !r.is_empty());

        let message = root_reason
            .or_else(|| {
                err.get("reason")
                    .and_then(|r| r.as_str())
                    .filter(|r| !r.is_empty())
            })
            .unwrap_or("Unknown event error response")
            .to_string();

        Error::EngineQuery { message, data }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_root_cause_reason_wins() {
        let err = json!({
            "root_cause": [{ "type": "query_shard_exception", "reason": "x" }],
            "reason": "all shards failed"
        });
        match Error::from_engine_error(&err) {
            Error::EngineQuery { message, data } => {
                assert_eq!(message, "x");
                assert!(data.contains("query_shard_exception"));
                assert!(data.contains('\n'));
            }
            other => panic!("Expected EngineQuery, got {:?}", other),
        }
    }

    #[test]
    fn test_reason_fallback() {
        let err = json!({ "root_cause": [], "reason": "all shards failed" });
        let e = Error::from_engine_error(&err);
        assert_eq!(e.to_string(), "all shards failed");
    }

    #[test]
    fn test_fixed_fallback() {
        let err = json!({ "type": "weird" });
        let e = Error::from_engine_error(&err);
        assert_eq!(e.to_string(), "Unknown event error response");
    }
}
