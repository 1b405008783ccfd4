use serde_json::Value;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Connection failed: {0}")]
    Connection(#[from] reqwest::Error),

    /// Non-success response whose body carried an engine `error` object
    #[error("{message}")]
    Remote {
        message: String,
        error: Value,
        status: u16,
        status_text: String,
    },

    /// Non-success response without an engine error body
    #[error("Request failed ({status} {status_text}): {body}")]
    Status {
        status: u16,
        status_text: String,
        body: String,
    },

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Transform(#[from] esframes::Error),
}

pub type Result<T> = std::result::Result<T, ClientError>;
