pub mod config;
pub mod query;
pub mod transform;

pub use config::{run_config_init, run_config_show};
pub use query::run_query;
pub use transform::{run_transform, TransformOptions};

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use std::path::Path;

/// Read and parse a JSON input file
pub(crate) fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {:?}", path))?;
    serde_json::from_str(&content).with_context(|| format!("Failed to parse {:?}", path))
}
