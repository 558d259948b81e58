use std::io;
use std::path::Path;
use std::process::{Command, Stdio};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum TmuxError {
    #[error("failed to run tmux {args:?}: {source}")]
    Spawn {
        args: Vec<String>,
        #[source]
        source: io::Error,
    },
    #[error("tmux {args:?} failed: {stderr}")]
    Failed { args: Vec<String>, stderr: String },
}

/// Opaque tmux pane identifier such as `%3`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PaneId(pub String);

impl std::fmt::Display for PaneId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Split {
    /// New pane to the right.
    Horizontal,
    /// New pane below.
    Vertical,
}

/// The session/pane operations the launcher needs from a terminal multiplexer.
pub trait Multiplexer {
    fn has_session(&self, name: &str) -> bool;
    fn list_sessions(&self) -> Vec<String>;
    fn new_session(&self, name: &str, start_dir: &Path) -> Result<PaneId, TmuxError>;
    fn split_pane(
        &self,
        pane: &PaneId,
        split: Split,
        size_percent: Option<u8>,
        start_dir: &Path,
    ) -> Result<PaneId, TmuxError>;
    fn resize_width(&self, pane: &PaneId, columns: u16) -> Result<(), TmuxError>;
    fn send_keys(&self, pane: &PaneId, text: &str) -> Result<(), TmuxError>;
    fn select_pane(&self, pane: &PaneId) -> Result<(), TmuxError>;
    fn attach(&self, session: &str) -> Result<(), TmuxError>;
    fn switch_client(&self, session: &str) -> Result<(), TmuxError>;
    /// True when this process already runs inside a multiplexer client.
    fn inside_client(&self) -> bool;
}

/// Drives the real `tmux` binary.
#[derive(Debug, Clone)]
pub struct Tmux {
    program: String,
}

impl Default for Tmux {
    fn default() -> Self {
        Tmux {
            program: "tmux".to_string(),
        }
    }
}

impl Tmux {
    fn run(&self, args: &[&str]) -> Result<String, TmuxError> {
        debug!(?args, "tmux");
        let owned = || args.iter().map(|a| a.to_string()).collect::<Vec<_>>();
        let output = Command::new(&self.program)
            .args(args)
            .output()
            .map_err(|source| TmuxError::Spawn {
                args: owned(),
                source,
            })?;

        if !output.status.success() {
            return Err(TmuxError::Failed {
                args: owned(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    /// Run with the terminal handed over to tmux (attach needs a tty).
    fn run_interactive(&self, args: &[&str]) -> Result<(), TmuxError> {
        let owned = || args.iter().map(|a| a.to_string()).collect::<Vec<_>>();
        let status = Command::new(&self.program)
            .args(args)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .map_err(|source| TmuxError::Spawn {
                args: owned(),
                source,
            })?;
        if !status.success() {
            return Err(TmuxError::Failed {
                args: owned(),
                stderr: format!("exited with {}", status),
            });
        }
        Ok(())
    }
}

impl Multiplexer for Tmux {
    fn has_session(&self, name: &str) -> bool {
        if name.is_empty() {
            return false;
        }
        // `=` forces an exact match instead of tmux's prefix matching.
        let target = format!("={}", name);
        self.run(&["has-session", "-t", target.as_str()]).is_ok()
    }

    fn list_sessions(&self) -> Vec<String> {
        self.run(&["list-sessions", "-F", "#{session_name}"])
            .map(|out| {
                out.lines()
                    .map(|l| l.trim().to_string())
                    .filter(|l| !l.is_empty())
                    .collect()
            })
            .unwrap_or_default()
    }

    fn new_session(&self, name: &str, start_dir: &Path) -> Result<PaneId, TmuxError> {
        let dir = start_dir.to_string_lossy().to_string();
        let out = self.run(&[
            "new-session",
            "-d",
            "-s",
            name,
            "-c",
            dir.as_str(),
            "-P",
            "-F",
            "#{pane_id}",
        ])?;
        Ok(PaneId(out))
    }

    fn split_pane(
        &self,
        pane: &PaneId,
        split: Split,
        size_percent: Option<u8>,
        start_dir: &Path,
    ) -> Result<PaneId, TmuxError> {
        let dir = start_dir.to_string_lossy().to_string();
        let flag = match split {
            Split::Horizontal => "-h",
            Split::Vertical => "-v",
        };
        let size = size_percent.map(|p| format!("{}%", p));
        let mut args = vec!["split-window", flag, "-c", dir.as_str(), "-t", pane.0.as_str()];
        if let Some(size) = size.as_deref() {
            args.push("-l");
            args.push(size);
        }
        args.extend(["-P", "-F", "#{pane_id}"]);
        let out = self.run(&args)?;
        Ok(PaneId(out))
    }

    fn resize_width(&self, pane: &PaneId, columns: u16) -> Result<(), TmuxError> {
        let cols = columns.to_string();
        self.run(&["resize-pane", "-t", pane.0.as_str(), "-x", cols.as_str()])?;
        Ok(())
    }

    fn send_keys(&self, pane: &PaneId, text: &str) -> Result<(), TmuxError> {
        self.run(&["send-keys", "-R", "-t", pane.0.as_str(), text, "Enter"])?;
        Ok(())
    }

    fn select_pane(&self, pane: &PaneId) -> Result<(), TmuxError> {
        self.run(&["select-pane", "-t", pane.0.as_str()])?;
        Ok(())
    }

    fn attach(&self, session: &str) -> Result<(), TmuxError> {
        self.run_interactive(&["attach-session", "-t", session])
    }

    fn switch_client(&self, session: &str) -> Result<(), TmuxError> {
        self.run(&["switch-client", "-t", session])?;
        Ok(())
    }

    fn inside_client(&self) -> bool {
        std::env::var("TMUX").map(|v| !v.is_empty()).unwrap_or(false)
    }
}
