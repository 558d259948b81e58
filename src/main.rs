use anyhow::Context;
use clap::Parser;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{info, Level};
use vinw_workspace::launcher;
use vinw_workspace::tmux::Tmux;
use vinw_workspace::tui::{self, AppContext, StartupDirs};

#[derive(Parser, Debug)]
#[command(
    name = "vinw-workspace",
    about = "Launch a tmux workspace around the vinw file browser"
)]
struct Cli {
    /// Directory the browser starts in (defaults to your home directory)
    #[arg(long)]
    dir: Option<PathBuf>,

    /// Where config.json lives (defaults to ~/.vinw-workspace)
    #[arg(long)]
    config_dir: Option<PathBuf>,

    /// Where workspace.conf lives (defaults to ~/.vinw)
    #[arg(long)]
    shared_dir: Option<PathBuf>,

    /// Write logs to this file
    #[arg(long, env = "VINW_WORKSPACE_LOG")]
    log_file: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long)]
    verbose: bool,
}

/// The TUI owns stdout, so logging only goes to a file when asked for.
fn init_logging(path: &Path, verbose: bool) -> anyhow::Result<()> {
    let file = File::create(path)
        .with_context(|| format!("failed to create log file {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_max_level(if verbose { Level::DEBUG } else { Level::INFO })
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if let Some(path) = cli.log_file.as_deref() {
        init_logging(path, cli.verbose)?;
    }

    let ctx = AppContext::resolve(StartupDirs {
        start: cli.dir,
        config: cli.config_dir,
        shared: cli.shared_dir,
    });
    info!(
        start = %ctx.start_dir.display(),
        commands = ctx.commands.len(),
        "starting wizard"
    );

    // The launcher attaches to tmux, so it only runs once the terminal is restored.
    let Some(request) = tui::run(ctx)? else {
        return Ok(());
    };

    if let Err(err) = launcher::launch(&Tmux::default(), &request) {
        eprintln!("Error: {:#}", err);
        std::process::exit(1);
    }
    Ok(())
}
