use std::{fs, path::Path};

use anyhow::{Context as _, Result};
use serde::Deserialize;
use tracing::info;

/// Bridge settings read from YAML. Every field is optional.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub(crate) struct BridgeConfig {
    /// Name reported in notifications ("... on <app_name>").
    pub(crate) app_name: String,
    /// Own nick; channel messages mentioning it are highlights.
    pub(crate) nick: Option<String>,
    /// Extra words that count as highlights.
    pub(crate) highlights: Vec<String>,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            app_name: "bridge".to_owned(),
            nick: None,
            highlights: Vec::new(),
        }
    }
}

pub(crate) fn load_config(path: &Path) -> Result<BridgeConfig> {
    if !path.exists() {
        info!(path = %path.display(), "No config file; using defaults");
        return Ok(BridgeConfig::default());
    }
    let yaml = fs::read_to_string(path)
        .with_context(|| format!("reading config file at {}", path.display()))?;
    let cfg: BridgeConfig = serde_yaml::from_str(&yaml).context("parsing YAML config")?;
    Ok(cfg)
}
