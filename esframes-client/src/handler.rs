//! Request handlers: the HTTP plumbing and the event query handler built on it

use crate::auth::AuthState;
use crate::error::{ClientError, Result};
use crate::msearch::{MultiSearchBody, SearchRequest};
use async_trait::async_trait;
use esframes::{Config, DataQueryResponse, EventResponse, MSearchResponse, Target};
use reqwest::header::{HeaderValue, CONTENT_TYPE};
use reqwest::{Client, Method, Request, Response};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

/// A query request: the targets and the search sent for each of them
#[derive(Debug, Clone, Default)]
pub struct QueryRequest {
    pub targets: Vec<Target>,
    pub searches: Vec<SearchRequest>,
}

/// Runs a query request and reshapes the engine response
#[async_trait]
pub trait RequestHandler: Send + Sync {
    async fn handle_request(&self, request: QueryRequest) -> Result<DataQueryResponse>;
}

/// JSON requests against a base URL with bearer authentication
pub struct HttpRequester {
    client: Client,
    base_url: Url,
    auth: Arc<AuthState>,
}

impl HttpRequester {
    pub fn new(base_url: &str, timeout: Duration, auth: Arc<AuthState>) -> Result<Self> {
        let base_url = Url::parse(base_url)?;
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url,
            auth,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// `base_url/path`
    pub fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// Build a request with the JSON content type and, when a token is set,
    /// the bearer header
    pub fn build_request(&self, method: Method, path: &str, body: Option<String>) -> Result<Request> {
        let mut builder = self
            .client
            .request(method, self.url(path))
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        match self.auth.token() {
            Some(token) => builder = builder.bearer_auth(token),
            None => warn!("no access token available, sending request without Authorization"),
        }

        if let Some(body) = body {
            builder = builder.body(body);
        }
        Ok(builder.build()?)
    }

    /// Send a request; non-success statuses become [`ClientError::Status`]
    pub async fn request(&self, method: Method, path: &str, body: Option<String>) -> Result<Response> {
        let request = self.build_request(method, path, body)?;
        debug!(method = %request.method(), url = %request.url(), "sending request");

        let response = self.client.execute(request).await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(ClientError::Status {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or_default().to_string(),
            body,
        })
    }

    /// POST, surfacing engine error bodies as [`ClientError::Remote`]
    pub async fn post(&self, path: &str, body: String) -> Result<Response> {
        self.request(Method::POST, path, Some(body))
            .await
            .map_err(remap_error)
    }
}

/// Turn a failed response carrying `{"error": {...}}` into a remote error
/// whose message is `Error: <reason>`; anything else passes through
pub fn remap_error(err: ClientError) -> ClientError {
    let (status, status_text, body) = match err {
        ClientError::Status {
            status,
            status_text,
            body,
        } => (status, status_text, body),
        other => return other,
    };

    let engine_error = serde_json::from_str::<Value>(&body)
        .ok()
        .and_then(|v| v.get("error").cloned())
        .filter(|e| !e.is_null());

    match engine_error {
        Some(error) => {
            let reason = match error.get("reason") {
                Some(Value::String(s)) => s.clone(),
                Some(other) => other.to_string(),
                None => match &error {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                },
            };
            ClientError::Remote {
                message: format!("Error: {}", reason),
                error,
                status,
                status_text,
            }
        }
        None => ClientError::Status {
            status,
            status_text,
            body,
        },
    }
}

/// Posts a multi-search and reshapes the response with [`EventResponse`]
pub struct EventQueryHandler {
    requester: HttpRequester,
    path: String,
    config: Config,
}

impl EventQueryHandler {
    pub fn new(requester: HttpRequester, config: Config) -> Self {
        Self {
            requester,
            path: "_msearch".to_string(),
            config,
        }
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }
}

#[async_trait]
impl RequestHandler for EventQueryHandler {
    async fn handle_request(&self, request: QueryRequest) -> Result<DataQueryResponse> {
        if request.searches.len() != request.targets.len() {
            warn!(
                targets = request.targets.len(),
                searches = request.searches.len(),
                "search count does not match target count"
            );
        }

        let body: MultiSearchBody = request.searches.into_iter().collect();
        let response = self.requester.post(&self.path, body.to_ndjson()?).await?;
        let response: MSearchResponse = response.json().await?;
        debug!(responses = response.responses.len(), "multi-search response received");

        let event = EventResponse::with_config(request.targets, response, &self.config)?;
        Ok(event.time_series()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::AUTHORIZATION;
    use serde_json::json;

    fn requester(token: Option<&str>) -> HttpRequester {
        let auth = Arc::new(AuthState::new());
        if let Some(token) = token {
            auth.set_token(token);
        }
        HttpRequester::new("http://localhost:9200/insights/", Duration::from_secs(5), auth).unwrap()
    }

    #[test]
    fn test_url_joins_with_single_slash() {
        let r = requester(None);
        assert_eq!(r.url("_msearch"), "http://localhost:9200/insights/_msearch");
        assert_eq!(r.url("/_msearch"), "http://localhost:9200/insights/_msearch");
    }

    #[test]
    fn test_build_request_headers() {
        let r = requester(Some("jwt-123"));
        let req = r
            .build_request(Method::POST, "_msearch", Some("{}\n{}\n".to_string()))
            .unwrap();

        assert_eq!(req.method(), &Method::POST);
        assert_eq!(req.headers()[CONTENT_TYPE], "application/json");
        assert_eq!(req.headers()[AUTHORIZATION], "Bearer jwt-123");
        assert!(req.body().is_some());
    }

    #[test]
    fn test_build_request_without_token() {
        let r = requester(None);
        let req = r.build_request(Method::GET, "_cluster/health", None).unwrap();
        assert!(req.headers().get(AUTHORIZATION).is_none());
        assert!(req.body().is_none());
    }

    #[test]
    fn test_invalid_base_url() {
        let err = HttpRequester::new("not a url", Duration::from_secs(1), Arc::default());
        assert!(matches!(err, Err(ClientError::InvalidUrl(_))));
    }

    #[test]
    fn test_remap_engine_error() {
        let err = remap_error(ClientError::Status {
            status: 400,
            status_text: "Bad Request".to_string(),
            body: json!({ "error": { "reason": "parse failure", "type": "x" } }).to_string(),
        });
        match err {
            ClientError::Remote {
                message,
                error,
                status,
                status_text,
            } => {
                assert_eq!(message, "Error: parse failure");
                assert_eq!(error["type"], "x");
                assert_eq!(status, 400);
                assert_eq!(status_text, "Bad Request");
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_remap_passes_other_errors_through() {
        let err = remap_error(ClientError::Status {
            status: 502,
            status_text: "Bad Gateway".to_string(),
            body: "<html>upstream down</html>".to_string(),
        });
        assert!(matches!(err, ClientError::Status { status: 502, .. }));

        let err = remap_error(ClientError::Transform(esframes::Error::InvalidResponse(
            "x".to_string(),
        )));
        assert!(matches!(err, ClientError::Transform(_)));
    }

    #[tokio::test]
    async fn test_post_connection_error_propagates() {
        let auth = Arc::new(AuthState::new());
        let r = HttpRequester::new("http://127.0.0.1:1", Duration::from_millis(500), auth).unwrap();
        let err = r.post("_msearch", String::new()).await.unwrap_err();
        assert!(matches!(err, ClientError::Connection(_)));
    }
}
