use super::{read_json, LoadError};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::warn;

pub const WORKSPACE_FILE: &str = "workspace.conf";

/// A user-defined shell command offered as the primary action pane.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct WorkspaceCommand {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub command: String,
    #[serde(default)]
    pub description: String,
}

impl WorkspaceCommand {
    /// Build a command from raw form input. Name and command are required
    /// after trimming; the description may be empty.
    pub fn from_input(name: &str, command: &str, description: &str) -> Option<Self> {
        let name = name.trim();
        let command = command.trim();
        if name.is_empty() || command.is_empty() {
            return None;
        }
        Some(WorkspaceCommand {
            name: name.to_string(),
            command: command.to_string(),
            description: description.trim().to_string(),
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct WorkspaceConfig {
    #[serde(default)]
    commands: Vec<WorkspaceCommand>,
}

/// Load the saved commands. An absent file is an empty list; a corrupt one
/// is reported and also treated as empty.
pub fn load_commands(dir: &Path) -> Vec<WorkspaceCommand> {
    match read_json::<WorkspaceConfig>(dir.join(WORKSPACE_FILE)) {
        Ok(cfg) => cfg.commands,
        Err(LoadError::Absent(_)) => Vec::new(),
        Err(err) => {
            warn!(error = %err, "ignoring unusable workspace commands file");
            Vec::new()
        }
    }
}

pub fn save_commands(dir: &Path, commands: &[WorkspaceCommand]) -> Result<()> {
    let path = dir.join(WORKSPACE_FILE);
    fs::create_dir_all(dir).with_context(|| format!("failed to create {}", dir.display()))?;
    let cfg = WorkspaceConfig {
        commands: commands.to_vec(),
    };
    let json = serde_json::to_string_pretty(&cfg)?;
    fs::write(&path, json).with_context(|| format!("failed writing {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_file_is_empty_list() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_commands(dir.path()).is_empty());
        assert!(!dir.path().join(WORKSPACE_FILE).exists());
    }

    #[test]
    fn corrupt_file_is_empty_list() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(WORKSPACE_FILE), r#"{"commands": 5}"#).unwrap();
        assert!(load_commands(dir.path()).is_empty());
    }

    #[test]
    fn from_input_requires_name_and_command() {
        assert!(WorkspaceCommand::from_input("dev", "", "x").is_none());
        assert!(WorkspaceCommand::from_input("  ", "npm run dev", "").is_none());
        let cmd = WorkspaceCommand::from_input(" Dev ", " npm run dev ", "").unwrap();
        assert_eq!(cmd.name, "Dev");
        assert_eq!(cmd.command, "npm run dev");
        assert_eq!(cmd.description, "");
    }

    #[test]
    fn missing_description_field_parses() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(WORKSPACE_FILE),
            r#"{"commands":[{"name":"serve","command":"make serve"}]}"#,
        )
        .unwrap();
        let cmds = load_commands(dir.path());
        assert_eq!(cmds.len(), 1);
        assert_eq!(cmds[0].description, "");
    }
}
