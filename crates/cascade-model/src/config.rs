//! User-facing configuration for a cascade session.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::level::{LevelChain, LevelSpec};

/// Default name of the exported newline-delimited JSON file.
pub const DEFAULT_EXPORT_FILE: &str = "combinations.jsonl";

/// MIME type of the export blob.
pub const EXPORT_MIME_TYPE: &str = "application/jsonl";

/// Settings read from an optional TOML file. Missing keys fall back to defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CascadeConfig {
    /// File name used by `save` when no explicit path is given.
    pub export_file: String,
    /// Level descriptors in parent-to-child order.
    pub levels: Vec<LevelSpec>,
}

impl Default for CascadeConfig {
    fn default() -> Self {
        Self {
            export_file: DEFAULT_EXPORT_FILE.to_string(),
            levels: LevelChain::default().iter().cloned().collect(),
        }
    }
}

impl CascadeConfig {
    /// Validate the configured levels into a chain.
    pub fn chain(&self) -> Result<LevelChain> {
        LevelChain::new(self.levels.clone())
    }

    #[must_use]
    pub fn with_export_file(mut self, name: impl Into<String>) -> Self {
        self.export_file = name.into();
        self
    }
}
