use crate::tmux::{Multiplexer, PaneId, Split};
use crate::util;
use anyhow::{anyhow, Context, Result};
use std::path::{Path, PathBuf};
use tracing::info;

/// File browser started in the left pane.
pub const BROWSER_PROGRAM: &str = "vinw";
/// Content viewer started in the top-right pane, keyed by session fingerprint.
pub const VIEWER_PROGRAM: &str = "vinw-viewer";
/// Terminal mode that leaves the action pane at a bare prompt.
pub const PLAIN_SHELL: &str = "shell";
/// Agent choice that leaves the agent pane at a bare prompt.
pub const NO_AGENT: &str = "none";

pub const BROWSER_COLUMNS: u16 = 43;
pub const BOTTOM_REGION_PERCENT: u8 = 52;

/// Everything needed to build a workspace once the UI has torn down.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchRequest {
    pub directory: PathBuf,
    pub session_name: String,
    pub terminal_mode: String,
    pub agent: String,
    pub custom_command: Option<String>,
    pub session_id: String,
}

impl LaunchRequest {
    pub fn new(
        directory: &Path,
        session_name: &str,
        terminal_mode: &str,
        agent: &str,
        custom_command: Option<String>,
    ) -> Self {
        let directory = util::absolute_path(directory);
        let session_id = util::session_fingerprint(&directory);
        LaunchRequest {
            directory,
            session_name: session_name.trim().to_string(),
            terminal_mode: terminal_mode.to_string(),
            agent: agent.to_string(),
            custom_command: custom_command.filter(|c| !c.trim().is_empty()),
            session_id,
        }
    }

    /// Program for the primary action pane: the custom command wins over the
    /// terminal mode; a plain shell runs nothing.
    pub fn action_program(&self) -> Option<String> {
        if let Some(cmd) = &self.custom_command {
            return Some(cmd.trim().to_string());
        }
        if self.terminal_mode.is_empty() || self.terminal_mode == PLAIN_SHELL {
            return None;
        }
        Some(self.terminal_mode.clone())
    }

    pub fn agent_program(&self) -> Option<String> {
        if self.agent.is_empty() || self.agent == NO_AGENT {
            return None;
        }
        Some(self.agent.clone())
    }

    pub fn action_label(&self) -> String {
        match (&self.custom_command, self.terminal_mode.as_str()) {
            (Some(cmd), _) => format!("custom: {}", cmd),
            (None, "nextui") => "nextui (Next.js scaffolder)".to_string(),
            (None, PLAIN_SHELL) | (None, "") => "shell (empty terminal)".to_string(),
            (None, other) => other.to_string(),
        }
    }

    pub fn agent_label(&self) -> String {
        match self.agent_program() {
            Some(agent) => agent,
            None => "none (empty terminal)".to_string(),
        }
    }
}

/// Pane handles of a freshly built workspace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkspaceLayout {
    pub browser: PaneId,
    pub viewer: PaneId,
    pub action: PaneId,
    pub agent: PaneId,
}

pub fn validate_session_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(anyhow!("session name is required"));
    }
    // tmux treats ':' and '.' as target separators
    let forbidden = [':', '.', '\'', '"', '`', '$', '\\'];
    if name.chars().any(|c| forbidden.contains(&c) || c.is_control()) {
        return Err(anyhow!(
            "session name cannot contain colons, periods, quotes, backticks, backslashes, or dollar signs"
        ));
    }
    Ok(())
}

/// Quote `value` for a POSIX shell command line.
pub fn shell_quote(value: &str) -> String {
    if !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "/._-~+,:@%".contains(c))
    {
        return value.to_string();
    }
    format!("'{}'", value.replace('\'', "'\\''"))
}

fn in_directory(dir: &Path, program: &str) -> String {
    format!("cd {} && {}", shell_quote(&dir.to_string_lossy()), program)
}

/// Build the four-pane workspace and hand the terminal over to it.
///
/// ```text
/// ┌─────┬──────────────┐
/// │vinw │ vinw-viewer  │
/// │     ├──────┬───────┤
/// │     │ term │ agent │
/// └─────┴──────┴───────┘
/// ```
pub fn launch(mux: &dyn Multiplexer, req: &LaunchRequest) -> Result<WorkspaceLayout> {
    let layout = build_layout(mux, req)?;

    if mux.inside_client() {
        mux.switch_client(&req.session_name)
            .with_context(|| format!("failed to switch client to {}", req.session_name))?;
    } else {
        mux.attach(&req.session_name)
            .with_context(|| format!("failed to attach session {}", req.session_name))?;
    }

    Ok(layout)
}

/// Create the session and panes without attaching.
pub fn build_layout(mux: &dyn Multiplexer, req: &LaunchRequest) -> Result<WorkspaceLayout> {
    validate_session_name(&req.session_name)?;
    if mux.has_session(&req.session_name) {
        return Err(anyhow!(
            "session '{}' already exists - choose a different name",
            req.session_name
        ));
    }
    let dir = req.directory.as_path();

    info!(session = %req.session_name, dir = %dir.display(), id = %req.session_id, "building workspace");

    let browser = mux
        .new_session(&req.session_name, dir)
        .context("failed to create session")?;
    mux.send_keys(&browser, &in_directory(dir, BROWSER_PROGRAM))
        .with_context(|| format!("failed to start {}", BROWSER_PROGRAM))?;

    let viewer = mux
        .split_pane(&browser, Split::Horizontal, None, dir)
        .context("failed to create right split")?;
    mux.resize_width(&browser, BROWSER_COLUMNS)
        .context("failed to resize left pane")?;
    let viewer_cmd = format!("{} {}", VIEWER_PROGRAM, req.session_id);
    mux.send_keys(&viewer, &in_directory(dir, &viewer_cmd))
        .with_context(|| format!("failed to start {}", VIEWER_PROGRAM))?;

    let action = mux
        .split_pane(&viewer, Split::Vertical, Some(BOTTOM_REGION_PERCENT), dir)
        .context("failed to create bottom-right split")?;
    if let Some(program) = req.action_program() {
        mux.send_keys(&action, &in_directory(dir, &program))
            .with_context(|| format!("failed to start {}", program))?;
    }

    let agent = mux
        .split_pane(&action, Split::Horizontal, None, dir)
        .context("failed to create agent pane")?;
    if let Some(program) = req.agent_program() {
        mux.send_keys(&agent, &in_directory(dir, &program))
            .with_context(|| format!("failed to start agent {}", program))?;
    }

    mux.select_pane(&viewer).context("failed to select pane")?;

    Ok(WorkspaceLayout {
        browser,
        viewer,
        action,
        agent,
    })
}

/// Plain-text summary of what a launch will produce.
pub fn preview_text(req: &LaunchRequest) -> Vec<String> {
    let top = format!(
        "│ {:<12}│ {:<30}│",
        BROWSER_PROGRAM,
        util::truncate_width(VIEWER_PROGRAM, 30)
    );
    let bottom = format!(
        "│ {:<12}│ {:<14}│ {:<14}│",
        "",
        util::truncate_width(&req.action_label(), 14),
        util::truncate_width(&req.agent_label(), 14)
    );
    let diagram = [
        "┌─────────────┬───────────────────────────────┐".to_string(),
        top,
        "│             ├───────────────┬───────────────┤".to_string(),
        bottom,
        "└─────────────┴───────────────┴───────────────┘".to_string(),
    ];
    let mut lines = vec!["Layout Preview".to_string(), String::new()];
    lines.extend(diagram);
    lines.push(String::new());
    lines.push("Configuration".to_string());
    lines.push(format!("  Directory:  {}", req.directory.display()));
    lines.push(format!("  Session:    {}", req.session_name));
    lines.push(format!("  Session ID: {}", req.session_id));
    lines.push(format!("  Terminal:   {}", req.action_label()));
    lines.push(format!("  Agent:      {}", req.agent_label()));
    lines.push(String::new());
    lines.push("Pane Layout".to_string());
    lines.push(format!("  Left:         {} file browser", BROWSER_PROGRAM));
    lines.push(format!("  Top right:    {} {}", VIEWER_PROGRAM, req.session_id));
    lines.push(format!("  Bottom left:  {}", req.action_label()));
    lines.push(format!("  Bottom right: {}", req.agent_label()));
    lines
}
