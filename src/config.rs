//! Workspace configuration.
//!
//! The core consumes exactly one key, `hunt_prefix`; everything else in the
//! config file (SIEM/EDR names and the like) belongs to display layers and
//! is ignored here.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Config file name at the workspace root.
pub const CONFIG_FILE: &str = ".huntlock.yaml";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WorkspaceConfig {
    /// Identifier prefix for new hunts: ids take the form `<prefix>-NNNN`.
    pub hunt_prefix: String,
    /// Default hunter name stamped into new records.
    pub hunter: Option<String>,
}

impl Default for WorkspaceConfig {
    fn default() -> Self {
        WorkspaceConfig {
            hunt_prefix: "H".to_string(),
            hunter: None,
        }
    }
}

/// Load the workspace config, falling back to defaults when no file exists.
pub fn load(workspace: &Path) -> Result<WorkspaceConfig> {
    let path = workspace.join(CONFIG_FILE);
    if !path.is_file() {
        return Ok(WorkspaceConfig::default());
    }
    let text = fs::read_to_string(&path)
        .with_context(|| format!("read config {}", path.display()))?;
    serde_yaml::from_str(&text).with_context(|| format!("parse config {}", path.display()))
}
