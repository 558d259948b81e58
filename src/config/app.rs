use super::{read_json, LoadError};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{info, warn};

pub const CONFIG_FILE: &str = "config.json";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AppConfig {
    #[serde(default = "default_terminal_options")]
    pub terminal_options: Vec<String>,
    #[serde(default = "default_agent_options")]
    pub agent_options: Vec<String>,
}

fn default_terminal_options() -> Vec<String> {
    vec!["shell".to_string(), "nextui".to_string()]
}

fn default_agent_options() -> Vec<String> {
    ["claude", "opencode", "crush", "codex", "none"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            terminal_options: default_terminal_options(),
            agent_options: default_agent_options(),
        }
    }
}

impl AppConfig {
    /// Selectors must never be empty; an empty list in the file is treated as unset.
    fn with_defaults_for_empty(mut self) -> Self {
        if self.terminal_options.is_empty() {
            self.terminal_options = default_terminal_options();
        }
        if self.agent_options.is_empty() {
            self.agent_options = default_agent_options();
        }
        self
    }
}

/// Load `config.json` from `dir`. Never fails: a missing file is created with
/// the built-in defaults, an unreadable or malformed one is reported and the
/// defaults are used in its place.
pub fn load(dir: &Path) -> AppConfig {
    match read_json::<AppConfig>(dir.join(CONFIG_FILE)) {
        Ok(cfg) => cfg.with_defaults_for_empty(),
        Err(LoadError::Absent(path)) => {
            let cfg = AppConfig::default();
            match save(dir, &cfg) {
                Ok(()) => info!(path = %path.display(), "wrote default config"),
                Err(err) => warn!(error = %err, "could not write default config"),
            }
            cfg
        }
        Err(err) => {
            warn!(error = %err, "falling back to default config");
            AppConfig::default()
        }
    }
}

pub fn save(dir: &Path, cfg: &AppConfig) -> Result<()> {
    let path = dir.join(CONFIG_FILE);
    fs::create_dir_all(dir).with_context(|| format!("failed to create {}", dir.display()))?;
    let json = serde_json::to_string_pretty(cfg)?;
    fs::write(&path, json).with_context(|| format!("failed writing {}", path.display()))?;
    Ok(())
}
