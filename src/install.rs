//! Side effects behind the setup assistant: installing tmux through a
//! package manager, cloning the theme plugins, and writing `~/.tmux.conf`.
//! Every function here may block for a long time and is run off the UI loop.

use crate::deps::command_exists;
use anyhow::{anyhow, Context, Result};
use chrono::Local;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::info;

pub const TMUX_CONF_TEMPLATE: &str = include_str!("../assets/tmux.conf");
pub const TMUX_WIKI_URL: &str = "https://github.com/tmux/tmux/wiki/Installing";

const TPM_REPO: &str = "https://github.com/tmux-plugins/tpm";
const CATPPUCCIN_REPO: &str = "https://github.com/catppuccin/tmux.git";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallMethod {
    pub name: String,
    pub description: String,
    pub command: String,
    pub args: Vec<String>,
    pub available: bool,
}

fn method(name: &str, description: &str, command: &str, args: &[&str], available: bool) -> InstallMethod {
    InstallMethod {
        name: name.to_string(),
        description: description.to_string(),
        command: command.to_string(),
        args: args.iter().map(|a| a.to_string()).collect(),
        available,
    }
}

/// Every known way to install tmux, flagged with whether it works here.
pub fn tmux_install_methods() -> Vec<InstallMethod> {
    let os = std::env::consts::OS;
    let linux = os == "linux";
    vec![
        method(
            "Homebrew (macOS)",
            "Install via Homebrew package manager",
            "brew",
            &["install", "tmux"],
            os == "macos" && command_exists("brew"),
        ),
        method(
            "apt (Ubuntu/Debian)",
            "Install via apt package manager",
            "sudo",
            &["apt-get", "install", "-y", "tmux"],
            linux && command_exists("apt-get"),
        ),
        method(
            "dnf (Fedora/RHEL 8+)",
            "Install via dnf package manager",
            "sudo",
            &["dnf", "install", "-y", "tmux"],
            linux && command_exists("dnf"),
        ),
        method(
            "yum (CentOS/RHEL 7)",
            "Install via yum package manager",
            "sudo",
            &["yum", "install", "-y", "tmux"],
            linux && command_exists("yum"),
        ),
        method(
            "pacman (Arch Linux)",
            "Install via pacman package manager",
            "sudo",
            &["pacman", "-S", "--noconfirm", "tmux"],
            linux && command_exists("pacman"),
        ),
        method(
            "Build from source",
            "Build latest tmux from source (requires dev tools)",
            "sh",
            &[
                "-c",
                "set -e; cd /tmp && git clone https://github.com/tmux/tmux.git tmux-build && \
                 cd tmux-build && sh autogen.sh && ./configure && make && sudo make install && \
                 cd .. && rm -rf tmux-build",
            ],
            command_exists("git") && command_exists("make"),
        ),
    ]
}

pub fn available_install_methods() -> Vec<InstallMethod> {
    tmux_install_methods()
        .into_iter()
        .filter(|m| m.available)
        .collect()
}

fn tmux_version() -> String {
    Command::new("tmux")
        .arg("-V")
        .output()
        .map(|o| String::from_utf8_lossy(&o.stdout).trim().to_string())
        .unwrap_or_default()
}

/// Run `method` and confirm tmux ended up on `$PATH`. Returns the success
/// message for the status bar.
pub fn install_tmux(method: &InstallMethod) -> Result<String> {
    if command_exists("tmux") {
        return Ok(format!("✓ tmux is already installed: {}", tmux_version()));
    }
    if !method.available {
        return Err(anyhow!(
            "installation method {} is not available on this system",
            method.name
        ));
    }

    info!(method = %method.name, "installing tmux");
    let output = Command::new(&method.command)
        .args(&method.args)
        .output()
        .with_context(|| format!("failed to run {}", method.command))?;
    if !output.status.success() {
        let mut combined = String::from_utf8_lossy(&output.stdout).to_string();
        combined.push_str(&String::from_utf8_lossy(&output.stderr));
        return Err(anyhow!("installation failed: {}\n{}", output.status, combined.trim()));
    }

    if !command_exists("tmux") {
        return Err(anyhow!("installation completed but tmux not found in PATH"));
    }
    Ok(format!("✓ tmux installed successfully! {}", tmux_version()))
}

pub fn tpm_path(home: &Path) -> PathBuf {
    home.join(".tmux").join("plugins").join("tpm")
}

pub fn catppuccin_path(home: &Path) -> PathBuf {
    home.join(".config")
        .join("tmux")
        .join("plugins")
        .join("catppuccin")
}

pub fn plugins_installed(home: &Path) -> bool {
    tpm_path(home).is_dir() && catppuccin_path(home).is_dir()
}

fn clone_into(repo: &str, target: &Path) -> Result<()> {
    if target.is_dir() {
        return Ok(());
    }
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    let output = Command::new("git")
        .args(["clone", repo])
        .arg(target)
        .output()
        .with_context(|| format!("failed to run git clone {}", repo))?;
    if !output.status.success() {
        return Err(anyhow!(
            "failed to clone {}: {}",
            repo,
            String::from_utf8_lossy(&output.stderr).trim()
        ));
    }
    Ok(())
}

/// Clone TPM and the Catppuccin theme where the bundled config expects them.
pub fn install_plugins(home: &Path) -> Result<()> {
    clone_into(TPM_REPO, &tpm_path(home)).context("error installing TPM")?;
    clone_into(CATPPUCCIN_REPO, &catppuccin_path(home)).context("error installing Catppuccin")?;
    Ok(())
}

/// Write the bundled config to `~/.tmux.conf`, first copying any existing file
/// to `~/.tmux.conf.backup.<timestamp>`. Returns the backup path if one was made.
pub fn install_tmux_config(home: &Path) -> Result<Option<PathBuf>> {
    let conf = home.join(".tmux.conf");
    let mut backup = None;
    if conf.exists() {
        let stamp = Local::now().format("%Y%m%d-%H%M%S");
        let backup_path = home.join(format!(".tmux.conf.backup.{}", stamp));
        fs::copy(&conf, &backup_path).context("could not backup existing .tmux.conf")?;
        backup = Some(backup_path);
    }
    fs::write(&conf, TMUX_CONF_TEMPLATE).context("could not write .tmux.conf")?;
    info!(path = %conf.display(), "installed tmux config");
    Ok(backup)
}
