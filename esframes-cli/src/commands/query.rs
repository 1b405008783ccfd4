use super::read_json;
use anyhow::{Context, Result};
use esframes::{Config, Target};
use esframes_client::{
    AuthState, EventQueryHandler, HttpRequester, QueryRequest, RequestHandler, SearchRequest,
};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

/// Run query command: post the searches, transform and print the envelope
pub async fn run_query(
    config: &Config,
    targets_path: &Path,
    body_path: &Path,
    path: &str,
    token: Option<String>,
) -> Result<()> {
    let targets: Vec<Target> = read_json(targets_path)?;
    let searches: Vec<SearchRequest> = read_json(body_path)?;

    let auth = Arc::new(AuthState::new());
    if let Some(token) = token {
        auth.set_token(token);
    }

    let requester = HttpRequester::new(
        &config.client.base_url,
        Duration::from_millis(config.client.timeout_ms),
        auth,
    )
    .with_context(|| format!("Invalid base URL {}", config.client.base_url))?;

    tracing::info!(
        "Querying {}/{} with {} searches",
        config.client.base_url.trim_end_matches('/'),
        path,
        searches.len()
    );

    let handler = EventQueryHandler::new(requester, config.clone()).with_path(path);
    let out = handler
        .handle_request(QueryRequest { targets, searches })
        .await
        .context("Query failed")?;

    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}
