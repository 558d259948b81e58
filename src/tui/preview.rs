use crate::deps::{self, DependencyStatus};
use crate::install;
use crate::launcher::{self, LaunchRequest};
use crate::tui::SystemProbe;
use crossterm::event::{KeyCode, KeyEvent};
use tracing::info;

/// What the preview screen shows, and whether launching is allowed.
#[derive(Debug, Clone)]
pub struct PreviewState {
    pub request: LaunchRequest,
    pub dependencies: Vec<DependencyStatus>,
    pub session_exists: bool,
    pub name_error: Option<String>,
    pub scroll: u16,
}

/// One row of preview content, before styling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreviewLine {
    Blank,
    Heading(String),
    Text(String),
    Dependency { name: String, available: bool },
    Blocker(String),
    Hint(String),
    Link(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreviewOutcome {
    Handled,
    Back,
    Quit,
    Launch(LaunchRequest),
}

impl PreviewState {
    pub fn check(request: LaunchRequest, probe: &dyn SystemProbe) -> Self {
        let dependencies = deps::check_dependencies(&request.terminal_mode, &request.agent, |p| {
            probe.command_exists(p)
        });
        let name_error = launcher::validate_session_name(&request.session_name)
            .err()
            .map(|e| e.to_string());
        let session_exists = name_error.is_none() && probe.has_session(&request.session_name);
        PreviewState {
            request,
            dependencies,
            session_exists,
            name_error,
            scroll: 0,
        }
    }

    fn recheck(&mut self, probe: &dyn SystemProbe) {
        let scroll = self.scroll;
        *self = PreviewState::check(self.request.clone(), probe);
        self.scroll = scroll;
    }

    pub fn missing(&self) -> impl Iterator<Item = &DependencyStatus> {
        self.dependencies.iter().filter(|d| d.required && !d.available)
    }

    pub fn tmux_missing(&self) -> bool {
        self.missing().any(|d| d.name == "tmux")
    }

    /// Human-readable reasons the launch is blocked; empty when it is not.
    pub fn blockers(&self) -> Vec<String> {
        let mut out = Vec::new();
        if !deps::all_available(&self.dependencies) {
            let names: Vec<&str> = self.missing().map(|d| d.name.as_str()).collect();
            out.push(format!("Missing dependencies: {}", names.join(", ")));
        }
        if let Some(err) = &self.name_error {
            out.push(format!("Invalid session name: {}", err));
        }
        if self.session_exists {
            out.push(format!(
                "Session '{}' already exists - choose a different name",
                self.request.session_name
            ));
        }
        out
    }

    pub fn can_launch(&self) -> bool {
        self.blockers().is_empty()
    }

    /// Everything the preview panel shows, top to bottom.
    pub fn lines(&self) -> Vec<PreviewLine> {
        let mut lines: Vec<PreviewLine> = launcher::preview_text(&self.request)
            .into_iter()
            .map(|l| {
                if l.is_empty() {
                    PreviewLine::Blank
                } else if !l.starts_with([' ', '┌', '│', '└']) {
                    PreviewLine::Heading(l)
                } else {
                    PreviewLine::Text(l)
                }
            })
            .collect();

        lines.push(PreviewLine::Blank);
        lines.push(PreviewLine::Heading("Dependencies".to_string()));
        lines.extend(self.dependencies.iter().map(|dep| PreviewLine::Dependency {
            name: dep.name.clone(),
            available: dep.available,
        }));

        let blockers = self.blockers();
        if !blockers.is_empty() {
            lines.push(PreviewLine::Blank);
            lines.extend(blockers.into_iter().map(PreviewLine::Blocker));
        }
        if self.tmux_missing() {
            lines.push(PreviewLine::Blank);
            lines.push(PreviewLine::Hint(
                "tmux is not installed. Use the Setup Assistant from the menu, or see".to_string(),
            ));
            lines.push(PreviewLine::Link(install::TMUX_WIKI_URL.to_string()));
        }
        lines
    }

    /// Last scroll offset that still shows a line of content.
    fn max_scroll(&self) -> u16 {
        u16::try_from(self.lines().len().saturating_sub(1)).unwrap_or(u16::MAX)
    }

    pub fn handle_key(&mut self, key: KeyEvent, probe: &dyn SystemProbe) -> PreviewOutcome {
        match key.code {
            KeyCode::Esc => PreviewOutcome::Back,
            KeyCode::Char('q') => PreviewOutcome::Quit,
            KeyCode::Up | KeyCode::Char('k') => {
                self.scroll = self.scroll.saturating_sub(1);
                PreviewOutcome::Handled
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.scroll = self.scroll.saturating_add(1).min(self.max_scroll());
                PreviewOutcome::Handled
            }
            KeyCode::Enter | KeyCode::Char('l') => {
                self.recheck(probe);
                if self.can_launch() {
                    info!(session = %self.request.session_name, "launch confirmed");
                    PreviewOutcome::Launch(self.request.clone())
                } else {
                    info!(blockers = ?self.blockers(), "launch blocked");
                    PreviewOutcome::Handled
                }
            }
            _ => PreviewOutcome::Handled,
        }
    }
}
