use anyhow::{Context, Result};
use esframes::Config;
use std::path::Path;

/// Write the default configuration file
pub fn run_config_init(path: &Path, force: bool) -> Result<()> {
    let path = esframes::config::expand_tilde(path)?;
    if path.exists() && !force {
        anyhow::bail!(
            "Config file {:?} already exists. Use --force to overwrite.",
            path
        );
    }

    Config::default()
        .save(&path)
        .with_context(|| format!("Failed to write {:?}", path))?;
    println!("Wrote default config to {}", path.display());
    Ok(())
}

/// Print the effective configuration as TOML
pub fn run_config_show(path: &Path) -> Result<()> {
    let path = esframes::config::expand_tilde(path)?;
    let config = if path.exists() {
        Config::load(&path)?
    } else {
        Config::default()
    };

    println!("# {}", path.display());
    print!("{}", config.to_toml()?);
    Ok(())
}
