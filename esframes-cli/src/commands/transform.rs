use super::read_json;
use anyhow::{Context, Result};
use esframes::{Config, DataQueryResponse, EventResponse, MSearchResponse, Target};
use std::path::Path;

#[derive(Debug, Clone, Default)]
pub struct TransformOptions {
    pub frames: bool,
    pub logs: bool,
    pub message_field: Option<String>,
    pub level_field: Option<String>,
}

/// Reshape a parsed response.
///
/// Logs requests and `--frames` take the data frame path; otherwise the
/// path is chosen from the targets.
pub fn transform(
    config: &Config,
    targets: Vec<Target>,
    response: MSearchResponse,
    opts: &TransformOptions,
) -> Result<DataQueryResponse> {
    let event = EventResponse::with_config(targets, response, config)?;

    let out = if opts.logs || opts.frames {
        event.process_response_to_data_frames(
            opts.logs,
            opts.message_field.as_deref(),
            opts.level_field.as_deref(),
        )?
    } else {
        event.time_series()?
    };
    Ok(out)
}

/// Run transform command on saved files and print the envelope
pub fn run_transform(
    config: &Config,
    targets_path: &Path,
    response_path: &Path,
    opts: &TransformOptions,
) -> Result<()> {
    let targets: Vec<Target> = read_json(targets_path)?;
    let response: MSearchResponse = read_json(response_path)?;
    tracing::info!(
        "Transforming {} sub-responses for {} targets",
        response.responses.len(),
        targets.len()
    );

    let out = transform(config, targets, response, opts)?;
    let json = serde_json::to_string_pretty(&out).context("Failed to serialize output")?;
    println!("{}", json);
    Ok(())
}
