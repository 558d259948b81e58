//! vinw-workspace - pick a directory, name a session and open a four-pane
//! tmux workspace around the vinw file browser.
//!
//! The binary is a thin wrapper; everything lives here so integration tests
//! can drive the wizard and the launcher directly.

pub mod config;
pub mod deps;
pub mod fsnav;
pub mod install;
pub mod launcher;
pub mod tmux;
pub mod tui;
pub mod util;
