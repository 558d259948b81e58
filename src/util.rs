use anyhow::{Context, Result};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};
use unicode_width::UnicodeWidthChar;

/// Directory holding `config.json`: `~/.vinw-workspace`.
pub fn config_dir(home: &Path) -> PathBuf {
    home.join(".vinw-workspace")
}

/// Directory shared with the `vinw` file browser, holds `workspace.conf`: `~/.vinw`.
pub fn shared_dir(home: &Path) -> PathBuf {
    home.join(".vinw")
}

pub fn ensure_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).with_context(|| format!("failed to create {}", display_path(dir)))
}

/// The current user's home directory.
pub fn home_dir() -> Result<PathBuf> {
    dirs::home_dir().ok_or_else(|| anyhow::anyhow!("could not resolve home directory"))
}

/// Convert an absolute path into a display-friendly path. On unix, replaces the home directory with "~".
pub fn display_path(path: impl AsRef<Path>) -> String {
    let path = path.as_ref();
    if let Some(home) = dirs::home_dir() {
        if path == home {
            return "~".to_string();
        }
        if let Ok(rel) = path.strip_prefix(&home) {
            return format!("~/{}", rel.display());
        }
    }
    path.display().to_string()
}

/// Absolute, symlink-resolved form of `path`. Falls back to joining onto the
/// current directory when the path cannot be canonicalized (e.g. it vanished).
pub fn absolute_path(path: &Path) -> PathBuf {
    if let Ok(canonical) = fs::canonicalize(path) {
        return canonical;
    }
    if path.is_absolute() {
        return path.to_path_buf();
    }
    std::env::current_dir()
        .map(|cwd| cwd.join(path))
        .unwrap_or_else(|_| path.to_path_buf())
}

/// Short deterministic tag for a directory: the first four bytes of the
/// SHA-256 of its canonical absolute path, hex encoded.
pub fn session_fingerprint(path: &Path) -> String {
    let absolute = absolute_path(path);
    let mut hasher = Sha256::new();
    hasher.update(absolute.to_string_lossy().as_bytes());
    let digest = hasher.finalize();
    hex::encode(&digest[..4])
}

/// Truncate `text` to at most `max_width` terminal columns, appending "..."
/// when anything was cut.
pub fn truncate_width(text: &str, max_width: usize) -> String {
    let total: usize = text.chars().map(|c| c.width().unwrap_or(0)).sum();
    if total <= max_width {
        return text.to_string();
    }
    if max_width <= 3 {
        return ".".repeat(max_width);
    }
    let budget = max_width - 3;
    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        out.push(c);
    }
    out.push_str("...");
    out
}

/// Keep the tail of a long path, prefixing "..." so the current directory
/// name stays visible.
pub fn truncate_path_front(text: &str, max_width: usize) -> String {
    let count = text.chars().count();
    if count <= max_width || max_width <= 3 {
        return text.to_string();
    }
    let keep = max_width - 3;
    let tail: String = text.chars().skip(count - keep).collect();
    format!("...{}", tail)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_path_replaces_home() {
        if let Some(home) = dirs::home_dir() {
            let candidate = home.join("example");
            let disp = display_path(&candidate);
            assert!(disp.starts_with("~/"));
            assert_eq!(display_path(&home), "~");
        }
    }

    #[test]
    fn fingerprint_is_eight_hex_chars() {
        let dir = tempfile::tempdir().unwrap();
        let id = session_fingerprint(dir.path());
        assert_eq!(id.len(), 8);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn fingerprint_ignores_path_spelling() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("project");
        fs::create_dir(&nested).unwrap();
        let dotted = dir.path().join("project").join("..").join("project");
        assert_eq!(session_fingerprint(&nested), session_fingerprint(&dotted));
    }

    #[test]
    fn fingerprint_differs_between_directories() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a");
        let b = dir.path().join("b");
        fs::create_dir(&a).unwrap();
        fs::create_dir(&b).unwrap();
        assert_ne!(session_fingerprint(&a), session_fingerprint(&b));
    }

    #[test]
    fn truncate_width_appends_ellipsis() {
        assert_eq!(truncate_width("short", 10), "short");
        assert_eq!(truncate_width("a-very-long-name", 8), "a-ver...");
    }

    #[test]
    fn truncate_path_front_keeps_tail() {
        assert_eq!(truncate_path_front("/a/b/c/project", 10), ".../project");
        assert_eq!(truncate_path_front("~/code", 20), "~/code");
    }
}
