//! Background work for the setup assistant. Each task runs on its own thread
//! and reports exactly one [`Finished`] back to the event loop.

use crate::install::{self, InstallMethod};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Task {
    InstallTmux(InstallMethod),
    InstallConfig { home: PathBuf },
    InstallPluginsThenConfig { home: PathBuf },
}

/// What a task installs. Outcomes carry it so the UI can tell them apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskKind {
    Tmux,
    TmuxConfig,
}

impl Task {
    pub fn kind(&self) -> TaskKind {
        match self {
            Task::InstallTmux(_) => TaskKind::Tmux,
            Task::InstallConfig { .. } | Task::InstallPluginsThenConfig { .. } => {
                TaskKind::TmuxConfig
            }
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Task::InstallTmux(_) => "Installing tmux",
            Task::InstallConfig { .. } => "Installing .tmux.conf",
            Task::InstallPluginsThenConfig { .. } => "Installing plugins and .tmux.conf",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskOutcome {
    Success(String),
    Failure(String),
}

impl TaskOutcome {
    pub fn is_error(&self) -> bool {
        matches!(self, TaskOutcome::Failure(_))
    }

    pub fn text(&self) -> &str {
        match self {
            TaskOutcome::Success(text) | TaskOutcome::Failure(text) => text,
        }
    }
}

/// A task's outcome, tagged with the kind of task that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finished {
    pub kind: TaskKind,
    pub outcome: TaskOutcome,
}

fn config_outcome(home: &Path, prefix: &str) -> TaskOutcome {
    match install::install_tmux_config(home) {
        Ok(Some(backup)) => TaskOutcome::Success(format!(
            "✓ {}Installed ~/.tmux.conf (backup: {})",
            prefix,
            backup.display()
        )),
        Ok(None) => TaskOutcome::Success(format!("✓ {}Installed ~/.tmux.conf", prefix)),
        Err(err) => TaskOutcome::Failure(format!("✗ Error: {:#}", err)),
    }
}

/// Run `task` to completion on the calling thread.
pub fn run_task(task: Task) -> TaskOutcome {
    match task {
        Task::InstallTmux(method) => match install::install_tmux(&method) {
            Ok(msg) => TaskOutcome::Success(msg),
            Err(err) => TaskOutcome::Failure(format!("✗ {:#}", err)),
        },
        Task::InstallConfig { home } => config_outcome(&home, ""),
        Task::InstallPluginsThenConfig { home } => match install::install_plugins(&home) {
            Ok(()) => config_outcome(&home, "Plugins installed. "),
            Err(err) => TaskOutcome::Failure(format!("✗ {:#}", err)),
        },
    }
}

/// Spawns tasks and collects their outcomes without blocking.
pub struct TaskRunner {
    tx: Sender<Finished>,
    rx: Receiver<Finished>,
}

impl Default for TaskRunner {
    fn default() -> Self {
        let (tx, rx) = mpsc::channel();
        TaskRunner { tx, rx }
    }
}

impl TaskRunner {
    pub fn spawn(&self, task: Task) {
        info!(task = task.label(), "dispatching background task");
        let tx = self.tx.clone();
        thread::spawn(move || {
            let kind = task.kind();
            let outcome = run_task(task);
            // the receiver is gone once the UI has exited
            let _ = tx.send(Finished { kind, outcome });
        });
    }

    /// Every outcome that has arrived since the last call.
    pub fn drain(&self) -> Vec<Finished> {
        let mut outcomes = Vec::new();
        loop {
            match self.rx.try_recv() {
                Ok(done) => {
                    if done.outcome.is_error() {
                        warn!(kind = ?done.kind, message = done.outcome.text(), "background task failed");
                    } else {
                        debug!(kind = ?done.kind, message = done.outcome.text(), "background task finished");
                    }
                    outcomes.push(done);
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        outcomes
    }
}
