//! The workspace command manager: a list of saved commands and a three-field
//! form for adding one.

use crate::config::workspace::{self, WorkspaceCommand};
use crate::tui::form::Field;
use crossterm::event::{Event, KeyCode, KeyEvent};
use std::path::PathBuf;
use tracing::{info, warn};
use tui_input::backend::crossterm::EventHandler;
use tui_input::Input;

/// Saved commands plus the one chosen for the next launch.
#[derive(Debug, Clone)]
pub struct CommandBook {
    dir: PathBuf,
    items: Vec<WorkspaceCommand>,
    selected: Option<usize>,
}

impl CommandBook {
    pub fn new(dir: PathBuf, items: Vec<WorkspaceCommand>) -> Self {
        CommandBook {
            dir,
            items,
            selected: None,
        }
    }

    pub fn items(&self) -> &[WorkspaceCommand] {
        &self.items
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selected
    }

    pub fn selected(&self) -> Option<&WorkspaceCommand> {
        self.selected.and_then(|idx| self.items.get(idx))
    }

    pub fn select(&mut self, idx: usize) {
        if idx < self.items.len() {
            self.selected = Some(idx);
        }
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    fn save(&self) -> Result<(), String> {
        workspace::save_commands(&self.dir, &self.items).map_err(|err| {
            warn!(error = %err, "failed to save workspace commands");
            format!("✗ Could not save commands: {:#}", err)
        })
    }

    pub fn add(&mut self, command: WorkspaceCommand) -> Result<(), String> {
        info!(name = %command.name, "adding workspace command");
        self.items.push(command);
        self.save()
    }

    /// Remove `idx`, keeping the launch selection pointing at the same entry.
    pub fn delete(&mut self, idx: usize) -> Result<(), String> {
        if idx >= self.items.len() {
            return Ok(());
        }
        let removed = self.items.remove(idx);
        info!(name = %removed.name, "deleted workspace command");
        self.selected = match self.selected {
            Some(sel) if sel == idx => None,
            Some(sel) if sel > idx => Some(sel - 1),
            other => other,
        };
        self.save()
    }
}

/// The three inputs of the add form, in tab order.
#[derive(Debug, Clone, Default)]
pub struct AddForm {
    pub inputs: [Input; 3],
    pub focus: usize,
}

impl AddForm {
    pub const LABELS: [&'static str; 3] = ["Name", "Command", "Description"];

    fn cycle(&mut self) {
        self.focus = (self.focus + 1) % self.inputs.len();
    }

    fn to_command(&self) -> Option<WorkspaceCommand> {
        WorkspaceCommand::from_input(
            self.inputs[0].value(),
            self.inputs[1].value(),
            self.inputs[2].value(),
        )
    }
}

#[derive(Debug, Clone)]
pub enum CommandsMode {
    Listing,
    Adding(AddForm),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandsOutcome {
    Handled,
    /// Back to the form, restoring the field that was focused.
    Back(Field),
    Quit,
    Error(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ListAction {
    Up,
    Down,
    Add,
    Delete,
    Select,
    ClearSelection,
    Back,
    Quit,
    None,
}

fn map_list_key(key: KeyEvent) -> ListAction {
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => ListAction::Up,
        KeyCode::Down | KeyCode::Char('j') => ListAction::Down,
        KeyCode::Char('a') => ListAction::Add,
        KeyCode::Char('d') => ListAction::Delete,
        KeyCode::Char('x') => ListAction::ClearSelection,
        KeyCode::Enter => ListAction::Select,
        KeyCode::Esc => ListAction::Back,
        KeyCode::Char('q') => ListAction::Quit,
        _ => ListAction::None,
    }
}

#[derive(Debug, Clone)]
pub struct CommandsScreen {
    pub cursor: usize,
    pub mode: CommandsMode,
    pub return_focus: Field,
}

impl CommandsScreen {
    pub fn new(return_focus: Field) -> Self {
        CommandsScreen {
            cursor: 0,
            mode: CommandsMode::Listing,
            return_focus,
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent, book: &mut CommandBook) -> CommandsOutcome {
        if let CommandsMode::Adding(form) = &mut self.mode {
            match key.code {
                KeyCode::Esc => self.mode = CommandsMode::Listing,
                KeyCode::Tab => form.cycle(),
                KeyCode::Enter => {
                    if let Some(command) = form.to_command() {
                        self.mode = CommandsMode::Listing;
                        if let Err(msg) = book.add(command) {
                            return CommandsOutcome::Error(msg);
                        }
                    }
                }
                _ => {
                    let idx = form.focus;
                    form.inputs[idx].handle_event(&Event::Key(key));
                }
            }
            return CommandsOutcome::Handled;
        }

        let len = book.items().len();
        match map_list_key(key) {
            ListAction::Up => self.cursor = self.cursor.saturating_sub(1),
            ListAction::Down => {
                if self.cursor + 1 < len {
                    self.cursor += 1;
                }
            }
            ListAction::Add => self.mode = CommandsMode::Adding(AddForm::default()),
            ListAction::Delete => {
                let result = book.delete(self.cursor);
                self.cursor = self.cursor.min(book.items().len().saturating_sub(1));
                if let Err(msg) = result {
                    return CommandsOutcome::Error(msg);
                }
            }
            ListAction::Select => {
                book.select(self.cursor);
                return CommandsOutcome::Back(self.return_focus);
            }
            ListAction::ClearSelection => book.clear_selection(),
            ListAction::Back => return CommandsOutcome::Back(self.return_focus),
            ListAction::Quit => return CommandsOutcome::Quit,
            ListAction::None => {}
        }
        CommandsOutcome::Handled
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

    fn type_text(screen: &mut CommandsScreen, book: &mut CommandBook, text: &str) {
        for c in text.chars() {
            screen.handle_key(key(KeyCode::Char(c)), book);
        }
    }

    fn cmd(name: &str) -> WorkspaceCommand {
        WorkspaceCommand {
            name: name.to_string(),
            command: format!("run-{}", name),
            description: String::new(),
        }
    }

    fn book(dir: &tempfile::TempDir, names: &[&str]) -> CommandBook {
        CommandBook::new(
            dir.path().to_path_buf(),
            names.iter().map(|n| cmd(n)).collect(),
        )
    }

    mod list_keys {
        use super::*;

        #[test]
        fn vim_keys_match_arrows() {
            assert_eq!(map_list_key(key(KeyCode::Up)), map_list_key(key(KeyCode::Char('k'))));
            assert_eq!(
                map_list_key(key(KeyCode::Down)),
                map_list_key(key(KeyCode::Char('j')))
            );
        }

        #[test]
        fn letters_map_to_actions() {
            assert_eq!(map_list_key(key(KeyCode::Char('a'))), ListAction::Add);
            assert_eq!(map_list_key(key(KeyCode::Char('d'))), ListAction::Delete);
            assert_eq!(map_list_key(key(KeyCode::Char('q'))), ListAction::Quit);
            assert_eq!(map_list_key(key(KeyCode::Char('z'))), ListAction::None);
        }
    }

    mod adding {
        use super::*;

        #[test]
        fn complete_entry_is_appended_and_persisted() {
            let dir = tempfile::tempdir().unwrap();
            let mut book = book(&dir, &[]);
            let mut screen = CommandsScreen::new(Field::Terminal);

            screen.handle_key(key(KeyCode::Char('a')), &mut book);
            type_text(&mut screen, &mut book, "dev server");
            screen.handle_key(key(KeyCode::Tab), &mut book);
            type_text(&mut screen, &mut book, "npm run dev");
            screen.handle_key(key(KeyCode::Tab), &mut book);
            type_text(&mut screen, &mut book, "next");
            screen.handle_key(key(KeyCode::Enter), &mut book);

            assert!(matches!(screen.mode, CommandsMode::Listing));
            assert_eq!(book.items().len(), 1);
            assert_eq!(book.items()[0].command, "npm run dev");
            assert_eq!(workspace::load_commands(dir.path()), book.items());
        }

        #[test]
        fn empty_command_is_rejected() {
            let dir = tempfile::tempdir().unwrap();
            let mut book = book(&dir, &[]);
            let mut screen = CommandsScreen::new(Field::Terminal);

            screen.handle_key(key(KeyCode::Char('a')), &mut book);
            type_text(&mut screen, &mut book, "named");
            screen.handle_key(key(KeyCode::Enter), &mut book);

            assert!(matches!(screen.mode, CommandsMode::Adding(_)));
            assert!(book.items().is_empty());
            assert!(!dir.path().join(workspace::WORKSPACE_FILE).exists());
        }

        #[test]
        fn esc_discards_without_saving() {
            let dir = tempfile::tempdir().unwrap();
            let mut book = book(&dir, &[]);
            let mut screen = CommandsScreen::new(Field::Terminal);

            screen.handle_key(key(KeyCode::Char('a')), &mut book);
            type_text(&mut screen, &mut book, "x");
            screen.handle_key(key(KeyCode::Tab), &mut book);
            type_text(&mut screen, &mut book, "y");
            screen.handle_key(key(KeyCode::Esc), &mut book);

            assert!(matches!(screen.mode, CommandsMode::Listing));
            assert!(book.items().is_empty());
            assert!(!dir.path().join(workspace::WORKSPACE_FILE).exists());
        }

        #[test]
        fn tab_cycles_three_fields() {
            let mut form = AddForm::default();
            form.cycle();
            form.cycle();
            assert_eq!(form.focus, 2);
            form.cycle();
            assert_eq!(form.focus, 0);
        }

        #[test]
        fn list_letters_are_typed_while_adding() {
            let dir = tempfile::tempdir().unwrap();
            let mut book = book(&dir, &[]);
            let mut screen = CommandsScreen::new(Field::Terminal);
            screen.handle_key(key(KeyCode::Char('a')), &mut book);
            assert_eq!(
                screen.handle_key(key(KeyCode::Char('q')), &mut book),
                CommandsOutcome::Handled
            );
            match &screen.mode {
                CommandsMode::Adding(form) => assert_eq!(form.inputs[0].value(), "q"),
                CommandsMode::Listing => panic!("left add form"),
            }
        }
    }

    mod listing {
        use super::*;

        #[test]
        fn enter_selects_and_returns_previous_focus() {
            let dir = tempfile::tempdir().unwrap();
            let mut book = book(&dir, &["a", "b"]);
            let mut screen = CommandsScreen::new(Field::Agent);
            screen.handle_key(key(KeyCode::Down), &mut book);
            assert_eq!(
                screen.handle_key(key(KeyCode::Enter), &mut book),
                CommandsOutcome::Back(Field::Agent)
            );
            assert_eq!(book.selected().map(|c| c.name.as_str()), Some("b"));
        }

        #[test]
        fn enter_on_empty_list_selects_nothing() {
            let dir = tempfile::tempdir().unwrap();
            let mut book = book(&dir, &[]);
            let mut screen = CommandsScreen::new(Field::Launch);
            screen.handle_key(key(KeyCode::Enter), &mut book);
            assert_eq!(book.selected_index(), None);
        }

        #[test]
        fn deleting_selected_entry_clears_selection() {
            let dir = tempfile::tempdir().unwrap();
            let mut book = book(&dir, &["a", "b", "c"]);
            book.select(1);
            book.delete(1).unwrap();
            assert_eq!(book.selected_index(), None);
        }

        #[test]
        fn deleting_earlier_entry_shifts_selection() {
            let dir = tempfile::tempdir().unwrap();
            let mut book = book(&dir, &["a", "b", "c"]);
            book.select(2);
            book.delete(0).unwrap();
            assert_eq!(book.selected().map(|c| c.name.as_str()), Some("c"));
        }

        #[test]
        fn delete_key_removes_and_clamps_cursor() {
            let dir = tempfile::tempdir().unwrap();
            let mut book = book(&dir, &["a", "b"]);
            let mut screen = CommandsScreen::new(Field::Terminal);
            screen.handle_key(key(KeyCode::Down), &mut book);
            screen.handle_key(key(KeyCode::Char('d')), &mut book);
            assert_eq!(screen.cursor, 0);
            assert_eq!(book.items().len(), 1);
            assert_eq!(workspace::load_commands(dir.path()).len(), 1);
        }

        #[test]
        fn esc_and_q_leave() {
            let dir = tempfile::tempdir().unwrap();
            let mut book = book(&dir, &[]);
            let mut screen = CommandsScreen::new(Field::SessionName);
            assert_eq!(
                screen.handle_key(key(KeyCode::Esc), &mut book),
                CommandsOutcome::Back(Field::SessionName)
            );
            assert_eq!(
                screen.handle_key(key(KeyCode::Char('q')), &mut book),
                CommandsOutcome::Quit
            );
        }
    }
}
