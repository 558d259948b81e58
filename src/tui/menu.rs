use crossterm::event::{KeyCode, KeyEvent};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuItem {
    NewWorkspace,
    Setup,
}

impl MenuItem {
    pub const ALL: [MenuItem; 2] = [MenuItem::NewWorkspace, MenuItem::Setup];

    pub fn title(self) -> &'static str {
        match self {
            MenuItem::NewWorkspace => "Start New Workspace",
            MenuItem::Setup => "Setup Assistant",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            MenuItem::NewWorkspace => "Pick a directory, name a session and launch the layout",
            MenuItem::Setup => "New to tmux? Install it and a friendly config",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuOutcome {
    Handled,
    Open(MenuItem),
    Quit,
}

/// Up and down wrap around the two entries.
pub fn handle_key(cursor: &mut usize, key: KeyEvent) -> MenuOutcome {
    let len = MenuItem::ALL.len();
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => return MenuOutcome::Quit,
        KeyCode::Up | KeyCode::Char('k') => *cursor = (*cursor + len - 1) % len,
        KeyCode::Down | KeyCode::Char('j') => *cursor = (*cursor + 1) % len,
        KeyCode::Enter => return MenuOutcome::Open(MenuItem::ALL[*cursor % len]),
        _ => {}
    }
    MenuOutcome::Handled
}
