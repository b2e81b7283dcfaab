//! Loading [`CascadeConfig`] from an optional TOML file.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use cascade_model::{CascadeConfig, LevelChain};
use tracing::debug;

/// Read `path` as TOML, or fall back to defaults when no path is given.
///
/// An unreadable or malformed file is an error; missing keys are not.
pub fn load_config(path: Option<&Path>) -> Result<CascadeConfig> {
    let Some(path) = path else {
        return Ok(CascadeConfig::default());
    };
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("read config {}", path.display()))?;
    let config: CascadeConfig =
        toml::from_str(&content).with_context(|| format!("parse config {}", path.display()))?;
    debug!(path = %path.display(), levels = config.levels.len(), "config loaded");
    Ok(config)
}

/// Effective settings after CLI overrides.
#[derive(Debug, Clone)]
pub struct Settings {
    pub chain: LevelChain,
    /// Where `save` writes when no path is given.
    pub export_path: PathBuf,
}

impl Settings {
    /// Validate the chain and resolve the export path.
    pub fn resolve(
        config: CascadeConfig,
        output_dir: Option<&Path>,
        export_file: Option<&str>,
    ) -> Result<Self> {
        let chain = config.chain().context("invalid level configuration")?;
        let file = export_file.unwrap_or(&config.export_file);
        let export_path = match output_dir {
            Some(dir) => dir.join(file),
            None => PathBuf::from(file),
        };
        Ok(Self { chain, export_path })
    }
}
