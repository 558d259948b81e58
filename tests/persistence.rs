//! Round trips through the two files the wizard reads at startup.

use std::fs;

use vinw_workspace::config::app::{self, AppConfig, CONFIG_FILE};
use vinw_workspace::config::workspace::{self, WorkspaceCommand, WORKSPACE_FILE};

fn command(n: usize) -> WorkspaceCommand {
    WorkspaceCommand {
        name: format!("cmd-{}", n),
        command: format!("make target-{}", n),
        description: if n % 2 == 0 {
            String::new()
        } else {
            format!("odd target {}", n)
        },
    }
}

#[test]
fn workspace_commands_survive_a_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    for n in [0usize, 1, 7] {
        let commands: Vec<WorkspaceCommand> = (0..n).map(command).collect();
        workspace::save_commands(dir.path(), &commands).unwrap();
        assert_eq!(workspace::load_commands(dir.path()), commands);
    }
}

#[test]
fn saving_creates_the_shared_directory() {
    let dir = tempfile::tempdir().unwrap();
    let shared = dir.path().join("nested").join(".vinw");
    workspace::save_commands(&shared, &[command(1)]).unwrap();
    assert!(shared.join(WORKSPACE_FILE).exists());
}

#[test]
fn workspace_file_is_plain_json() {
    let dir = tempfile::tempdir().unwrap();
    workspace::save_commands(dir.path(), &[command(3)]).unwrap();
    let raw = fs::read_to_string(dir.path().join(WORKSPACE_FILE)).unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(value["commands"][0]["name"], "cmd-3");
    assert_eq!(value["commands"][0]["command"], "make target-3");
}

#[test]
fn app_config_round_trip_and_default_creation() {
    let dir = tempfile::tempdir().unwrap();
    assert_eq!(app::load(dir.path()), AppConfig::default());
    assert!(dir.path().join(CONFIG_FILE).exists());

    let cfg = AppConfig {
        terminal_options: vec!["shell".to_string(), "htop".to_string()],
        agent_options: vec!["none".to_string()],
    };
    app::save(dir.path(), &cfg).unwrap();
    assert_eq!(app::load(dir.path()), cfg);
}
