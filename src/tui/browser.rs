//! The directory browser that occupies the first stop of the form.

use crate::fsnav::{self, FileEntry};
use crate::tui::viewport::{available_rows, Viewport};
use crossterm::event::{Event, KeyCode, KeyEvent};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use tui_input::backend::crossterm::EventHandler;
use tui_input::Input;

/// Single-line input shown under the listing, if any.
#[derive(Debug, Clone, Default)]
pub enum InlineInput {
    #[default]
    None,
    Search(Input),
    Create(Input),
}

impl InlineInput {
    pub fn is_active(&self) -> bool {
        !matches!(self, InlineInput::None)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrowserOutcome {
    /// State changed (or the key was swallowed); stay in the browser.
    Handled,
    /// The highlighted directory is chosen; focus moves on.
    Commit,
    /// Leave the browser entirely.
    Back,
    /// Directory creation failed with this message.
    Failed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NavAction {
    Up,
    Down,
    Into,
    Parent,
    Commit,
    StartSearch,
    StartCreate,
    Back,
    None,
}

fn map_nav_key(key: KeyEvent) -> NavAction {
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => NavAction::Up,
        KeyCode::Down | KeyCode::Char('j') => NavAction::Down,
        KeyCode::Right => NavAction::Into,
        KeyCode::Left => NavAction::Parent,
        KeyCode::Enter | KeyCode::Tab => NavAction::Commit,
        KeyCode::Char('s') | KeyCode::Char(' ') => NavAction::StartSearch,
        KeyCode::Char('n') => NavAction::StartCreate,
        KeyCode::Esc => NavAction::Back,
        _ => NavAction::None,
    }
}

#[derive(Debug, Clone)]
pub struct Browser {
    path: PathBuf,
    entries: Vec<FileEntry>,
    filtered: Vec<FileEntry>,
    cursor: usize,
    viewport: Viewport,
    inline: InlineInput,
    height: u16,
}

impl Browser {
    pub fn new(start: &Path, height: u16) -> Self {
        let mut browser = Browser {
            path: start.to_path_buf(),
            entries: Vec::new(),
            filtered: Vec::new(),
            cursor: 0,
            viewport: Viewport::default(),
            inline: InlineInput::None,
            height,
        };
        browser.load(start);
        browser
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn entries(&self) -> &[FileEntry] {
        &self.entries
    }

    pub fn filtered(&self) -> &[FileEntry] {
        &self.filtered
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn inline(&self) -> &InlineInput {
        &self.inline
    }

    pub fn query(&self) -> &str {
        match &self.inline {
            InlineInput::Search(input) => input.value(),
            _ => "",
        }
    }

    pub fn highlighted(&self) -> Option<&FileEntry> {
        self.filtered.get(self.cursor)
    }

    /// Replace the listing with `path`. An unreadable directory leaves the
    /// browser exactly as it was and returns false.
    pub fn load(&mut self, path: &Path) -> bool {
        match fsnav::list_entries(path) {
            Ok(entries) => {
                self.path = crate::util::absolute_path(path);
                self.entries = entries;
                self.cursor = 0;
                self.viewport = Viewport::default();
                self.refilter();
                true
            }
            Err(err) => {
                debug!(path = %path.display(), error = %err, "cannot list directory");
                false
            }
        }
    }

    pub fn reload(&mut self) -> bool {
        self.inline = InlineInput::None;
        let path = self.path.clone();
        self.load(&path)
    }

    pub fn set_height(&mut self, height: u16) {
        self.height = height;
        self.update_viewport();
    }

    fn refilter(&mut self) {
        self.filtered = fsnav::filter_entries(&self.entries, self.query());
        self.cursor = 0;
        self.update_viewport();
    }

    fn update_viewport(&mut self) {
        let rows = available_rows(self.height, self.inline.is_active());
        self.cursor = self
            .viewport
            .follow(self.filtered.len(), self.cursor, rows);
    }

    fn move_up(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            self.update_viewport();
        }
    }

    fn move_down(&mut self) {
        if self.cursor + 1 < self.filtered.len() {
            self.cursor += 1;
            self.update_viewport();
        }
    }

    /// Descend into the highlighted entry when it is a directory.
    fn enter_highlighted(&mut self) {
        if let Some(entry) = self.highlighted().filter(|e| e.is_dir).cloned() {
            self.load(&entry.path);
        }
    }

    fn close_inline(&mut self) {
        self.inline = InlineInput::None;
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> BrowserOutcome {
        match &self.inline {
            InlineInput::Search(_) => self.handle_search_key(key),
            InlineInput::Create(_) => self.handle_create_key(key),
            InlineInput::None => self.handle_nav_key(key),
        }
    }

    fn handle_nav_key(&mut self, key: KeyEvent) -> BrowserOutcome {
        match map_nav_key(key) {
            NavAction::Up => self.move_up(),
            NavAction::Down => self.move_down(),
            NavAction::Into => self.enter_highlighted(),
            NavAction::Parent => {
                if let Some(parent) = self.path.parent().map(Path::to_path_buf) {
                    self.load(&parent);
                }
            }
            NavAction::Commit => {
                self.enter_highlighted();
                return BrowserOutcome::Commit;
            }
            NavAction::StartSearch => {
                self.inline = InlineInput::Search(Input::default());
                self.update_viewport();
            }
            NavAction::StartCreate => {
                self.inline = InlineInput::Create(Input::default());
                self.update_viewport();
            }
            NavAction::Back => return BrowserOutcome::Back,
            NavAction::None => {}
        }
        BrowserOutcome::Handled
    }

    fn handle_search_key(&mut self, key: KeyEvent) -> BrowserOutcome {
        match key.code {
            KeyCode::Enter | KeyCode::Tab => {
                let target = self.highlighted().filter(|e| e.is_dir).cloned();
                self.close_inline();
                let loaded = target.map(|e| self.load(&e.path)).unwrap_or(false);
                if !loaded {
                    self.refilter();
                }
                if key.code == KeyCode::Tab {
                    return BrowserOutcome::Commit;
                }
            }
            KeyCode::Esc => {
                self.close_inline();
                self.refilter();
            }
            KeyCode::Up => self.move_up(),
            KeyCode::Down => self.move_down(),
            _ => {
                if let InlineInput::Search(input) = &mut self.inline {
                    let before = input.value().to_string();
                    input.handle_event(&Event::Key(key));
                    if input.value() != before {
                        self.refilter();
                    }
                }
            }
        }
        BrowserOutcome::Handled
    }

    fn handle_create_key(&mut self, key: KeyEvent) -> BrowserOutcome {
        match key.code {
            KeyCode::Enter => {
                let name = match &self.inline {
                    InlineInput::Create(input) => input.value().trim().to_string(),
                    _ => String::new(),
                };
                if name.is_empty() {
                    return BrowserOutcome::Handled;
                }
                match fsnav::create_directory(&self.path, &name) {
                    Ok(created) => {
                        info!(path = %created.display(), "created directory");
                        self.close_inline();
                        self.load(&created);
                        BrowserOutcome::Commit
                    }
                    Err(err) => BrowserOutcome::Failed(format!(
                        "✗ Could not create directory {}: {}",
                        name, err
                    )),
                }
            }
            KeyCode::Esc => {
                self.close_inline();
                self.update_viewport();
                BrowserOutcome::Handled
            }
            _ => {
                if let InlineInput::Create(input) = &mut self.inline {
                    input.handle_event(&Event::Key(key));
                }
                BrowserOutcome::Handled
            }
        }
    }
}
