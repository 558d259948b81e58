//! First-run assistant: install tmux, install a config, and read help pages.

use crate::install::InstallMethod;
use crate::tui::tasks::Task;
use crate::tui::viewport::{BODY_MARGIN, HEADER_ROWS, KEY_HINT_ROWS, STATUS_ROWS};
use crate::tui::SystemProbe;
use crossterm::event::{KeyCode, KeyEvent};
use std::path::Path;
use unicode_width::UnicodeWidthStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetupItem {
    InstallTmux,
    InstallConfig,
    Basics,
    Features,
}

impl SetupItem {
    pub const ALL: [SetupItem; 4] = [
        SetupItem::InstallTmux,
        SetupItem::InstallConfig,
        SetupItem::Basics,
        SetupItem::Features,
    ];

    pub fn from_index(idx: usize) -> SetupItem {
        Self::ALL.get(idx).copied().unwrap_or(SetupItem::InstallTmux)
    }

    pub fn index(self) -> usize {
        Self::ALL.iter().position(|i| *i == self).unwrap_or(0)
    }

    pub fn title(self) -> &'static str {
        match self {
            SetupItem::InstallTmux => "Install tmux",
            SetupItem::InstallConfig => "Install optimized .tmux.conf",
            SetupItem::Basics => "Tmux Basics",
            SetupItem::Features => "Cool features in provided config",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            SetupItem::InstallTmux => "Pick a package manager and install tmux",
            SetupItem::InstallConfig => "Mouse support, sane splits, Catppuccin theme",
            SetupItem::Basics => "Sessions, windows, panes and the prefix key",
            SetupItem::Features => "What the bundled config adds on top of stock tmux",
        }
    }

    pub fn help_doc(self) -> &'static str {
        match self {
            SetupItem::InstallTmux => include_str!("../../assets/help/install-tmux.md"),
            SetupItem::InstallConfig => include_str!("../../assets/help/tmux-conf.md"),
            SetupItem::Basics => include_str!("../../assets/help/basics.md"),
            SetupItem::Features => include_str!("../../assets/help/features.md"),
        }
    }
}

/// A yes/no prompt whose keys and action are data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dialog {
    pub title: String,
    pub body: String,
    pub confirm_key: char,
    pub cancel_key: char,
    pub confirm_text: String,
    pub cancel_text: String,
    pub on_confirm: Task,
}

impl Dialog {
    pub fn install_config(home: &Path) -> Dialog {
        Dialog {
            title: "Install tmux.conf?".to_string(),
            body: "This will:\n  • Install an optimized configuration to ~/.tmux.conf\n  \
                   • Back up an existing config with a timestamp\n  \
                   • Enable mouse support, 256 colours and TPM plugins\n\n\
                   Your current config is backed up before any change."
                .to_string(),
            confirm_key: 'y',
            cancel_key: 'n',
            confirm_text: "Yes, install".to_string(),
            cancel_text: "No, cancel".to_string(),
            on_confirm: Task::InstallConfig {
                home: home.to_path_buf(),
            },
        }
    }

    pub fn install_plugins(home: &Path) -> Dialog {
        Dialog {
            title: "Install tmux plugins?".to_string(),
            body: "The config needs two plugins:\n  • TPM (Tmux Plugin Manager)\n  \
                   • Catppuccin status bar theme\n\n\
                   Without them tmux reports errors on startup.\n\n\
                   Install the plugins, then the config?"
                .to_string(),
            confirm_key: 'y',
            cancel_key: 'n',
            confirm_text: "Yes, install plugins".to_string(),
            cancel_text: "Skip plugins (minimal config)".to_string(),
            on_confirm: Task::InstallPluginsThenConfig {
                home: home.to_path_buf(),
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogAction {
    Confirm,
    Cancel,
    None,
}

pub fn map_dialog_key(dialog: &Dialog, key: KeyEvent) -> DialogAction {
    match key.code {
        KeyCode::Char(c) if c == dialog.confirm_key => DialogAction::Confirm,
        KeyCode::Char(c) if c == dialog.cancel_key => DialogAction::Cancel,
        KeyCode::Enter => DialogAction::Confirm,
        KeyCode::Esc => DialogAction::Cancel,
        _ => DialogAction::None,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetupOutcome {
    Handled,
    Back,
    Quit,
    OpenHelp(SetupItem),
    OpenInstall,
    Spawn(Task),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SetupState {
    pub cursor: usize,
    pub dialog: Option<Dialog>,
}

impl SetupState {
    pub fn at(item: SetupItem) -> Self {
        SetupState {
            cursor: item.index(),
            dialog: None,
        }
    }

    pub fn highlighted(&self) -> SetupItem {
        SetupItem::from_index(self.cursor)
    }

    pub fn handle_key(&mut self, key: KeyEvent, probe: &dyn SystemProbe, home: &Path) -> SetupOutcome {
        if let Some(dialog) = &self.dialog {
            return match map_dialog_key(dialog, key) {
                DialogAction::Confirm => match self.dialog.take() {
                    Some(dialog) => SetupOutcome::Spawn(dialog.on_confirm),
                    None => SetupOutcome::Handled,
                },
                DialogAction::Cancel => {
                    self.dialog = None;
                    SetupOutcome::Handled
                }
                DialogAction::None if key.code == KeyCode::Char('q') => SetupOutcome::Quit,
                DialogAction::None => SetupOutcome::Handled,
            };
        }

        match key.code {
            KeyCode::Char('q') => return SetupOutcome::Quit,
            KeyCode::Esc => return SetupOutcome::Back,
            KeyCode::Char('?') => return SetupOutcome::OpenHelp(self.highlighted()),
            KeyCode::Up | KeyCode::Char('k') => self.cursor = self.cursor.saturating_sub(1),
            KeyCode::Down | KeyCode::Char('j') => {
                if self.cursor + 1 < SetupItem::ALL.len() {
                    self.cursor += 1;
                }
            }
            KeyCode::Enter => match self.highlighted() {
                SetupItem::InstallTmux => return SetupOutcome::OpenInstall,
                SetupItem::InstallConfig => {
                    self.dialog = Some(if probe.plugins_installed() {
                        Dialog::install_config(home)
                    } else {
                        Dialog::install_plugins(home)
                    });
                }
                item => return SetupOutcome::OpenHelp(item),
            },
            _ => {}
        }
        SetupOutcome::Handled
    }
}

/// Rows of the help screen around the page: the app chrome, the title and
/// percent lines, the panel border and the key hints.
pub const HELP_HEIGHT_OVERHEAD: u16 =
    HEADER_ROWS + STATUS_ROWS + 2 * BODY_MARGIN + 2 + 2 + KEY_HINT_ROWS;
/// Columns taken by the container border and padding.
pub const HELP_WIDTH_OVERHEAD: u16 = 8;

/// Greedy word wrap to `width` display columns. Leading indentation of a
/// line is repeated on its continuation lines.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let width = width.max(10);
    let mut out = Vec::new();
    for raw in text.lines() {
        if raw.width() <= width {
            out.push(raw.to_string());
            continue;
        }
        let indent: String = raw.chars().take_while(|c| c.is_whitespace()).collect();
        let mut line = String::new();
        for word in raw.split_whitespace() {
            let candidate = if line.is_empty() {
                format!("{}{}", indent, word)
            } else {
                format!("{} {}", line, word)
            };
            if candidate.width() > width && !line.is_empty() {
                out.push(std::mem::take(&mut line));
                line = format!("{}  {}", indent, word);
            } else {
                line = candidate;
            }
        }
        out.push(line);
    }
    out
}

/// Scrollable help page for one setup item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HelpView {
    pub item: SetupItem,
    pub lines: Vec<String>,
    pub scroll: usize,
    pub rows: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HelpOutcome {
    Handled,
    Back,
    Quit,
}

impl HelpView {
    pub fn new(item: SetupItem, width: u16, height: u16) -> Self {
        let mut view = HelpView {
            item,
            lines: Vec::new(),
            scroll: 0,
            rows: 1,
        };
        view.resize(width, height);
        view
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        let cols = width.saturating_sub(HELP_WIDTH_OVERHEAD) as usize;
        self.lines = wrap_text(self.item.help_doc(), cols);
        self.rows = (height.saturating_sub(HELP_HEIGHT_OVERHEAD) as usize).max(1);
        self.scroll = self.scroll.min(self.max_scroll());
    }

    pub fn max_scroll(&self) -> usize {
        self.lines.len().saturating_sub(self.rows)
    }

    pub fn percent(&self) -> usize {
        let max = self.max_scroll();
        if max == 0 {
            return 100;
        }
        self.scroll * 100 / max
    }

    pub fn visible(&self) -> &[String] {
        let end = (self.scroll + self.rows).min(self.lines.len());
        &self.lines[self.scroll.min(end)..end]
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> HelpOutcome {
        let max = self.max_scroll();
        match key.code {
            KeyCode::Char('q') => return HelpOutcome::Quit,
            KeyCode::Esc | KeyCode::Char('?') => return HelpOutcome::Back,
            KeyCode::Up | KeyCode::Char('k') => self.scroll = self.scroll.saturating_sub(1),
            KeyCode::Down | KeyCode::Char('j') => self.scroll = (self.scroll + 1).min(max),
            KeyCode::PageUp => self.scroll = self.scroll.saturating_sub(self.rows),
            KeyCode::PageDown => self.scroll = (self.scroll + self.rows).min(max),
            KeyCode::Char('g') | KeyCode::Home => self.scroll = 0,
            KeyCode::Char('G') | KeyCode::End => self.scroll = max,
            _ => {}
        }
        HelpOutcome::Handled
    }
}

/// Package-manager picker, populated on entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallSelect {
    pub methods: Vec<InstallMethod>,
    pub cursor: usize,
    pub running: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallOutcome {
    Handled,
    Back,
    Quit,
    Spawn(Task),
}

impl InstallSelect {
    pub fn new(methods: Vec<InstallMethod>) -> Self {
        InstallSelect {
            methods,
            cursor: 0,
            running: false,
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> InstallOutcome {
        match key.code {
            KeyCode::Char('q') => return InstallOutcome::Quit,
            KeyCode::Esc => return InstallOutcome::Back,
            KeyCode::Up | KeyCode::Char('k') => self.cursor = self.cursor.saturating_sub(1),
            KeyCode::Down | KeyCode::Char('j') => {
                if self.cursor + 1 < self.methods.len() {
                    self.cursor += 1;
                }
            }
            KeyCode::Enter if !self.running => {
                if let Some(method) = self.methods.get(self.cursor) {
                    self.running = true;
                    return InstallOutcome::Spawn(Task::InstallTmux(method.clone()));
                }
            }
            _ => {}
        }
        InstallOutcome::Handled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEventKind, KeyEventState, KeyModifiers};

    struct Probe {
        plugins: bool,
    }

    impl SystemProbe for Probe {
        fn command_exists(&self, _program: &str) -> bool {
            true
        }
        fn has_session(&self, _name: &str) -> bool {
            false
        }
        fn plugins_installed(&self) -> bool {
            self.plugins
        }
        fn install_methods(&self) -> Vec<InstallMethod> {
            Vec::new()
        }
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    fn method(name: &str) -> InstallMethod {
        InstallMethod {
            name: name.to_string(),
            description: String::new(),
            command: "true".to_string(),
            args: Vec::new(),
            available: true,
        }
    }

    mod dialog_keys {
        use super::*;

        fn dialog(confirm: char, cancel: char) -> Dialog {
            Dialog {
                confirm_key: confirm,
                cancel_key: cancel,
                ..Dialog::install_config(Path::new("/home/me"))
            }
        }

        #[test]
        fn bound_keys_are_data() {
            let d = dialog('o', 'x');
            assert_eq!(map_dialog_key(&d, key(KeyCode::Char('o'))), DialogAction::Confirm);
            assert_eq!(map_dialog_key(&d, key(KeyCode::Char('x'))), DialogAction::Cancel);
            assert_eq!(map_dialog_key(&d, key(KeyCode::Char('y'))), DialogAction::None);
            assert_eq!(map_dialog_key(&d, key(KeyCode::Char('n'))), DialogAction::None);
        }

        #[test]
        fn enter_and_esc_always_work() {
            let d = dialog('o', 'x');
            assert_eq!(map_dialog_key(&d, key(KeyCode::Enter)), DialogAction::Confirm);
            assert_eq!(map_dialog_key(&d, key(KeyCode::Esc)), DialogAction::Cancel);
        }
    }

    mod setup_list {
        use super::*;

        #[test]
        fn config_item_asks_for_plugins_when_missing() {
            let mut state = SetupState::at(SetupItem::InstallConfig);
            let home = Path::new("/home/me");
            state.handle_key(key(KeyCode::Enter), &Probe { plugins: false }, home);
            let dialog = state.dialog.clone().unwrap();
            assert_eq!(
                dialog.on_confirm,
                Task::InstallPluginsThenConfig {
                    home: home.to_path_buf()
                }
            );

            assert_eq!(
                state.handle_key(key(KeyCode::Char('y')), &Probe { plugins: false }, home),
                SetupOutcome::Spawn(dialog.on_confirm)
            );
            assert!(state.dialog.is_none());
        }

        #[test]
        fn cancel_closes_dialog_without_task() {
            let mut state = SetupState::at(SetupItem::InstallConfig);
            let probe = Probe { plugins: true };
            let home = Path::new("/home/me");
            state.handle_key(key(KeyCode::Enter), &probe, home);
            assert!(matches!(
                state.dialog.as_ref().map(|d| &d.on_confirm),
                Some(Task::InstallConfig { .. })
            ));
            assert_eq!(
                state.handle_key(key(KeyCode::Char('n')), &probe, home),
                SetupOutcome::Handled
            );
            assert!(state.dialog.is_none());
        }

        #[test]
        fn doc_items_open_help() {
            let probe = Probe { plugins: true };
            let home = Path::new("/home/me");
            let mut state = SetupState::at(SetupItem::Basics);
            assert_eq!(
                state.handle_key(key(KeyCode::Enter), &probe, home),
                SetupOutcome::OpenHelp(SetupItem::Basics)
            );
            let mut state = SetupState::default();
            assert_eq!(
                state.handle_key(key(KeyCode::Char('?')), &probe, home),
                SetupOutcome::OpenHelp(SetupItem::InstallTmux)
            );
            assert_eq!(
                state.handle_key(key(KeyCode::Enter), &probe, home),
                SetupOutcome::OpenInstall
            );
        }

        #[test]
        fn cursor_is_bounded() {
            let probe = Probe { plugins: true };
            let home = Path::new("/home/me");
            let mut state = SetupState::default();
            state.handle_key(key(KeyCode::Up), &probe, home);
            assert_eq!(state.cursor, 0);
            for _ in 0..10 {
                state.handle_key(key(KeyCode::Char('j')), &probe, home);
            }
            assert_eq!(state.highlighted(), SetupItem::Features);
        }
    }

    mod help {
        use super::*;

        #[test]
        fn scroll_is_clamped_and_percent_tracks() {
            let mut view = HelpView::new(SetupItem::Basics, 80, 20);
            assert!(view.lines.len() > view.rows);
            assert_eq!(view.percent(), 0);
            view.handle_key(key(KeyCode::Char('G')));
            assert_eq!(view.scroll, view.max_scroll());
            assert_eq!(view.percent(), 100);
            view.handle_key(key(KeyCode::Down));
            assert_eq!(view.scroll, view.max_scroll());
            view.handle_key(key(KeyCode::Char('g')));
            assert_eq!(view.scroll, 0);
            view.handle_key(key(KeyCode::Up));
            assert_eq!(view.scroll, 0);
        }

        #[test]
        fn resize_changes_page_height() {
            let mut view = HelpView::new(SetupItem::Features, 80, 20);
            assert_eq!(view.rows, 8);
            view.resize(80, 60);
            assert_eq!(view.rows, 48);
            assert!(view.visible().len() <= view.rows);
        }

        #[test]
        fn back_keys() {
            let mut view = HelpView::new(SetupItem::Basics, 80, 30);
            assert_eq!(view.handle_key(key(KeyCode::Esc)), HelpOutcome::Back);
            assert_eq!(view.handle_key(key(KeyCode::Char('?'))), HelpOutcome::Back);
            assert_eq!(view.handle_key(key(KeyCode::Char('q'))), HelpOutcome::Quit);
        }

        #[test]
        fn wrap_respects_width() {
            let text = "a fairly long line of words that will need to wrap somewhere";
            let lines = wrap_text(text, 20);
            assert!(lines.len() > 1);
            assert!(lines.iter().all(|l| l.width() <= 22));
            assert_eq!(wrap_text("short", 20), vec!["short"]);
        }
    }

    mod install_select {
        use super::*;

        #[test]
        fn enter_spawns_highlighted_method_once() {
            let mut sel = InstallSelect::new(vec![method("apt"), method("source")]);
            sel.handle_key(key(KeyCode::Down));
            assert_eq!(
                sel.handle_key(key(KeyCode::Enter)),
                InstallOutcome::Spawn(Task::InstallTmux(method("source")))
            );
            assert_eq!(sel.handle_key(key(KeyCode::Enter)), InstallOutcome::Handled);
        }

        #[test]
        fn empty_list_does_nothing() {
            let mut sel = InstallSelect::new(Vec::new());
            assert_eq!(sel.handle_key(key(KeyCode::Enter)), InstallOutcome::Handled);
            assert_eq!(sel.handle_key(key(KeyCode::Esc)), InstallOutcome::Back);
        }
    }
}
