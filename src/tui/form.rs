//! The workspace form: a ring of five focus stops, the first of which is the
//! directory browser.

use crate::launcher::LaunchRequest;
use crate::tui::browser::{Browser, BrowserOutcome};
use crossterm::event::{Event, KeyCode, KeyEvent};
use std::path::Path;
use tui_input::backend::crossterm::EventHandler;
use tui_input::Input;

pub const DEFAULT_SESSION_NAME: &str = "dev";
pub const SESSION_NAME_LIMIT: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Directory,
    SessionName,
    Terminal,
    Agent,
    Launch,
}

impl Field {
    pub fn next(self) -> Field {
        match self {
            Field::Directory => Field::SessionName,
            Field::SessionName => Field::Terminal,
            Field::Terminal => Field::Agent,
            Field::Agent => Field::Launch,
            Field::Launch => Field::Directory,
        }
    }

    pub fn prev(self) -> Field {
        match self {
            Field::Directory => Field::Launch,
            Field::SessionName => Field::Directory,
            Field::Terminal => Field::SessionName,
            Field::Agent => Field::Terminal,
            Field::Launch => Field::Agent,
        }
    }

    pub fn index(self) -> usize {
        match self {
            Field::Directory => 0,
            Field::SessionName => 1,
            Field::Terminal => 2,
            Field::Agent => 3,
            Field::Launch => 4,
        }
    }
}

/// A wrapping choice over a fixed list of options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    options: Vec<String>,
    index: usize,
}

impl Selector {
    pub fn new(options: Vec<String>) -> Self {
        Selector { options, index: 0 }
    }

    pub fn next(&mut self) {
        if self.options.is_empty() {
            return;
        }
        self.index = (self.index + 1) % self.options.len();
    }

    pub fn prev(&mut self) {
        if self.options.is_empty() {
            return;
        }
        if self.index == 0 {
            self.index = self.options.len() - 1;
        } else {
            self.index -= 1;
        }
    }

    pub fn value(&self) -> &str {
        self.options
            .get(self.index)
            .map(String::as_str)
            .unwrap_or_default()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormOutcome {
    Handled,
    /// Leave the form for the menu.
    Back,
    OpenCommands,
    Preview,
    Error(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FieldAction {
    Next,
    Prev,
    Left,
    Right,
    Confirm,
    Commands,
    Back,
    None,
}

/// Keys on the terminal, agent and launch stops.
fn map_field_key(key: KeyEvent) -> FieldAction {
    match key.code {
        KeyCode::Tab | KeyCode::Down => FieldAction::Next,
        KeyCode::BackTab | KeyCode::Up => FieldAction::Prev,
        KeyCode::Left | KeyCode::Char('h') => FieldAction::Left,
        KeyCode::Right | KeyCode::Char('l') => FieldAction::Right,
        KeyCode::Enter => FieldAction::Confirm,
        KeyCode::Char('c') => FieldAction::Commands,
        KeyCode::Esc => FieldAction::Back,
        _ => FieldAction::None,
    }
}

#[derive(Debug, Clone)]
pub struct Form {
    pub focus: Field,
    pub browser: Browser,
    pub session: Input,
    pub terminal: Selector,
    pub agent: Selector,
}

impl Form {
    pub fn new(
        start_dir: &Path,
        height: u16,
        terminal_options: Vec<String>,
        agent_options: Vec<String>,
    ) -> Self {
        Form {
            focus: Field::Directory,
            browser: Browser::new(start_dir, height),
            session: Input::new(DEFAULT_SESSION_NAME.to_string()),
            terminal: Selector::new(terminal_options),
            agent: Selector::new(agent_options),
        }
    }

    pub fn is_focused(&self, field: Field) -> bool {
        self.focus == field
    }

    pub fn session_name(&self) -> &str {
        self.session.value()
    }

    /// Return to the browser with a fresh listing of the current directory.
    pub fn back_to_browser(&mut self) {
        self.focus = Field::Directory;
        self.browser.reload();
    }

    pub fn launch_request(&self, custom_command: Option<String>) -> LaunchRequest {
        LaunchRequest::new(
            self.browser.path(),
            self.session_name(),
            self.terminal.value(),
            self.agent.value(),
            custom_command,
        )
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> FormOutcome {
        match self.focus {
            Field::Directory => self.handle_browser_key(key),
            Field::SessionName => self.handle_session_key(key),
            Field::Terminal | Field::Agent | Field::Launch => self.handle_field_key(key),
        }
    }

    fn handle_browser_key(&mut self, key: KeyEvent) -> FormOutcome {
        match self.browser.handle_key(key) {
            BrowserOutcome::Handled => FormOutcome::Handled,
            BrowserOutcome::Commit => {
                self.focus = Field::SessionName;
                FormOutcome::Handled
            }
            BrowserOutcome::Back => FormOutcome::Back,
            BrowserOutcome::Failed(msg) => FormOutcome::Error(msg),
        }
    }

    /// Everything but esc and enter goes to the text input, so letters that
    /// are shortcuts elsewhere can be typed.
    fn handle_session_key(&mut self, key: KeyEvent) -> FormOutcome {
        match key.code {
            KeyCode::Esc => self.back_to_browser(),
            KeyCode::Enter => self.focus = Field::Terminal,
            KeyCode::Char(_) if self.session.value().chars().count() >= SESSION_NAME_LIMIT => {}
            _ => {
                self.session.handle_event(&Event::Key(key));
            }
        }
        FormOutcome::Handled
    }

    fn handle_field_key(&mut self, key: KeyEvent) -> FormOutcome {
        match map_field_key(key) {
            FieldAction::Next => self.focus = self.focus.next(),
            FieldAction::Prev => self.focus = self.focus.prev(),
            FieldAction::Left => match self.focus {
                Field::Terminal => self.terminal.prev(),
                Field::Agent => self.agent.prev(),
                _ => {}
            },
            FieldAction::Right => match self.focus {
                Field::Terminal => self.terminal.next(),
                Field::Agent => self.agent.next(),
                _ => {}
            },
            FieldAction::Confirm => {
                if self.focus == Field::Launch {
                    return FormOutcome::Preview;
                }
                self.focus = self.focus.next();
            }
            FieldAction::Commands => return FormOutcome::OpenCommands,
            FieldAction::Back => self.back_to_browser(),
            FieldAction::None => {}
        }
        FormOutcome::Handled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEventKind, KeyEventState, KeyModifiers};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    fn options(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn form(dir: &Path) -> Form {
        Form::new(
            dir,
            40,
            options(&["shell", "nextui"]),
            options(&["claude", "opencode", "none"]),
        )
    }

    mod focus_ring {
        use super::*;

        #[test]
        fn next_and_prev_wrap() {
            assert_eq!(Field::Launch.next(), Field::Directory);
            assert_eq!(Field::Directory.prev(), Field::Launch);
            let mut f = Field::Directory;
            for _ in 0..5 {
                f = f.next();
            }
            assert_eq!(f, Field::Directory);
        }

        #[test]
        fn prev_undoes_next() {
            for f in [
                Field::Directory,
                Field::SessionName,
                Field::Terminal,
                Field::Agent,
                Field::Launch,
            ] {
                assert_eq!(f.next().prev(), f);
            }
        }

        #[test]
        fn tab_reaches_launch_and_wraps() {
            let dir = tempfile::tempdir().unwrap();
            let mut form = form(dir.path());
            form.focus = Field::Terminal;
            form.handle_key(key(KeyCode::Tab));
            form.handle_key(key(KeyCode::Tab));
            assert_eq!(form.focus, Field::Launch);
            form.handle_key(key(KeyCode::Tab));
            assert_eq!(form.focus, Field::Directory);
        }

        #[test]
        fn browser_commit_moves_to_session_name() {
            let dir = tempfile::tempdir().unwrap();
            let mut form = form(dir.path());
            form.handle_key(key(KeyCode::Tab));
            assert_eq!(form.focus, Field::SessionName);
            assert!(form.is_focused(Field::SessionName));
            assert!(!form.is_focused(Field::Directory));
        }
    }

    mod selectors {
        use super::*;

        #[test]
        fn selector_wraps_both_ways() {
            let mut s = Selector::new(options(&["a", "b", "c"]));
            s.prev();
            assert_eq!(s.value(), "c");
            s.next();
            assert_eq!(s.value(), "a");
            s.next();
            s.next();
            s.next();
            assert_eq!(s.index(), 0);
        }

        #[test]
        fn empty_selector_is_inert() {
            let mut s = Selector::new(Vec::new());
            s.next();
            s.prev();
            assert_eq!(s.value(), "");
            assert!(s.is_empty());
        }

        #[test]
        fn arrows_only_change_focused_selector() {
            let dir = tempfile::tempdir().unwrap();
            let mut form = form(dir.path());
            form.focus = Field::Agent;
            form.handle_key(key(KeyCode::Right));
            assert_eq!(form.agent.value(), "opencode");
            assert_eq!(form.terminal.value(), "shell");
            form.focus = Field::Terminal;
            form.handle_key(key(KeyCode::Left));
            assert_eq!(form.terminal.value(), "nextui");
            form.focus = Field::Launch;
            form.handle_key(key(KeyCode::Left));
            assert_eq!(form.terminal.value(), "nextui");
        }
    }

    mod session_name {
        use super::*;

        #[test]
        fn defaults_to_dev() {
            let dir = tempfile::tempdir().unwrap();
            assert_eq!(form(dir.path()).session_name(), "dev");
        }

        #[test]
        fn shortcut_letters_are_typed() {
            let dir = tempfile::tempdir().unwrap();
            let mut form = form(dir.path());
            form.focus = Field::SessionName;
            for c in ['c', 'q', 'j', 'k'] {
                form.handle_key(key(KeyCode::Char(c)));
            }
            assert_eq!(form.session_name(), "devcqjk");
            assert_eq!(form.focus, Field::SessionName);
        }

        #[test]
        fn tab_does_not_leave_the_field() {
            let dir = tempfile::tempdir().unwrap();
            let mut form = form(dir.path());
            form.focus = Field::SessionName;
            form.handle_key(key(KeyCode::Tab));
            assert_eq!(form.focus, Field::SessionName);
        }

        #[test]
        fn enter_advances_and_esc_returns_to_browser() {
            let dir = tempfile::tempdir().unwrap();
            let mut form = form(dir.path());
            form.focus = Field::SessionName;
            form.handle_key(key(KeyCode::Enter));
            assert_eq!(form.focus, Field::Terminal);

            form.focus = Field::SessionName;
            form.handle_key(key(KeyCode::Esc));
            assert_eq!(form.focus, Field::Directory);
        }

        #[test]
        fn length_is_capped() {
            let dir = tempfile::tempdir().unwrap();
            let mut form = form(dir.path());
            form.focus = Field::SessionName;
            for _ in 0..300 {
                form.handle_key(key(KeyCode::Char('x')));
            }
            assert_eq!(form.session_name().chars().count(), SESSION_NAME_LIMIT);
        }
    }

    mod transitions {
        use super::*;

        #[test]
        fn enter_on_launch_requests_preview() {
            let dir = tempfile::tempdir().unwrap();
            let mut form = form(dir.path());
            form.focus = Field::Agent;
            assert_eq!(form.handle_key(key(KeyCode::Enter)), FormOutcome::Handled);
            assert_eq!(form.focus, Field::Launch);
            assert_eq!(form.handle_key(key(KeyCode::Enter)), FormOutcome::Preview);
        }

        #[test]
        fn c_opens_commands_outside_browser_only() {
            let dir = tempfile::tempdir().unwrap();
            let mut form = form(dir.path());
            assert_eq!(form.handle_key(key(KeyCode::Char('c'))), FormOutcome::Handled);
            form.focus = Field::Terminal;
            assert_eq!(
                form.handle_key(key(KeyCode::Char('c'))),
                FormOutcome::OpenCommands
            );
        }

        #[test]
        fn esc_from_field_reloads_browser() {
            let dir = tempfile::tempdir().unwrap();
            let mut form = form(dir.path());
            form.focus = Field::Launch;
            std::fs::create_dir(dir.path().join("late")).unwrap();
            form.handle_key(key(KeyCode::Esc));
            assert_eq!(form.focus, Field::Directory);
            assert!(form.browser.filtered().iter().any(|e| e.name == "late"));
        }

        #[test]
        fn esc_in_browser_leaves_form() {
            let dir = tempfile::tempdir().unwrap();
            let mut form = form(dir.path());
            assert_eq!(form.handle_key(key(KeyCode::Esc)), FormOutcome::Back);
        }

        #[test]
        fn request_carries_choices() {
            let dir = tempfile::tempdir().unwrap();
            let mut form = form(dir.path());
            form.terminal.next();
            let req = form.launch_request(None);
            assert_eq!(req.session_name, "dev");
            assert_eq!(req.terminal_mode, "nextui");
            assert_eq!(req.agent, "claude");
            assert_eq!(req.directory, crate::util::absolute_path(dir.path()));
        }
    }
}
