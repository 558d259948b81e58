//! Directory listing, fuzzy filtering and inline directory creation for the
//! directory browser. Nothing here knows about the UI beyond a query string.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    pub name: String,
    pub path: PathBuf,
    pub is_dir: bool,
}

impl FileEntry {
    pub fn is_parent(&self) -> bool {
        self.name == ".."
    }
}

/// List `path` for browsing: a synthetic `..` first (unless at the root),
/// then directories, then files, each group sorted by name. Dot-entries are
/// skipped. Errors only when the directory itself cannot be read.
pub fn list_entries(path: &Path) -> io::Result<Vec<FileEntry>> {
    let reader = fs::read_dir(path)?;

    let mut entries: Vec<FileEntry> = reader
        .filter_map(|entry| entry.ok())
        .filter_map(|entry| {
            let name = entry.file_name().to_string_lossy().to_string();
            if name.starts_with('.') {
                return None;
            }
            let entry_path = entry.path();
            // Follow symlinks so linked directories can be entered.
            let is_dir = fs::metadata(&entry_path)
                .map(|m| m.is_dir())
                .or_else(|_| entry.file_type().map(|t| t.is_dir()))
                .unwrap_or(false);
            Some(FileEntry {
                name,
                path: entry_path,
                is_dir,
            })
        })
        .collect();

    entries.sort_by(|a, b| b.is_dir.cmp(&a.is_dir).then_with(|| a.name.cmp(&b.name)));

    if let Some(parent) = path.parent() {
        entries.insert(
            0,
            FileEntry {
                name: "..".to_string(),
                path: parent.to_path_buf(),
                is_dir: true,
            },
        );
    }

    Ok(entries)
}

/// Case-insensitive subsequence match: every character of `pattern` must
/// appear in `text` in order, not necessarily adjacent.
pub fn fuzzy_match(pattern: &str, text: &str) -> bool {
    if pattern.is_empty() {
        return true;
    }
    let mut wanted = pattern.chars().flat_map(char::to_lowercase).peekable();
    for c in text.chars().flat_map(char::to_lowercase) {
        match wanted.peek() {
            Some(&w) if w == c => {
                wanted.next();
            }
            Some(_) => {}
            None => break,
        }
    }
    wanted.peek().is_none()
}

/// Entries whose name fuzzy-matches `query`, in their original order.
pub fn filter_entries(entries: &[FileEntry], query: &str) -> Vec<FileEntry> {
    entries
        .iter()
        .filter(|e| fuzzy_match(query, &e.name))
        .cloned()
        .collect()
}

/// Create `name` inside `parent` and return the new path. The name must be a
/// single path component; an empty name or an existing target is an error
/// and nothing is touched in either case.
pub fn create_directory(parent: &Path, name: &str) -> io::Result<PathBuf> {
    let name = name.trim();
    if name.is_empty() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "directory name is empty",
        ));
    }
    if name == "." || name == ".." || name.contains(['/', std::path::MAIN_SEPARATOR]) {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{} is not a plain directory name", name),
        ));
    }
    let target = parent.join(name);
    // create_dir fails atomically when the target already exists
    fs::create_dir(&target).map_err(|err| match err.kind() {
        io::ErrorKind::AlreadyExists => io::Error::new(
            io::ErrorKind::AlreadyExists,
            format!("{} already exists", target.display()),
        ),
        _ => err,
    })?;
    Ok(target)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str) -> FileEntry {
        FileEntry {
            name: name.to_string(),
            path: PathBuf::from("/tmp").join(name),
            is_dir: false,
        }
    }

    fn names(entries: &[FileEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.name.as_str()).collect()
    }

    #[test]
    fn listing_puts_directories_first_and_hides_dotfiles() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("zeta")).unwrap();
        fs::create_dir(dir.path().join("alpha")).unwrap();
        fs::create_dir(dir.path().join(".git")).unwrap();
        fs::write(dir.path().join("b.txt"), "").unwrap();
        fs::write(dir.path().join("a.txt"), "").unwrap();
        fs::write(dir.path().join(".env"), "").unwrap();

        let entries = list_entries(dir.path()).unwrap();
        assert_eq!(names(&entries), vec!["..", "alpha", "zeta", "a.txt", "b.txt"]);
        assert!(entries[0].is_dir);
        assert_eq!(entries[0].path, dir.path().parent().unwrap());
        assert!(entries.iter().all(|e| e.is_parent() || !e.name.starts_with('.')));
    }

    #[test]
    fn root_has_no_parent_entry() {
        let entries = list_entries(Path::new("/")).unwrap();
        assert!(entries.iter().all(|e| !e.is_parent()));
    }

    #[test]
    fn unreadable_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(list_entries(&dir.path().join("missing")).is_err());
    }

    #[test]
    fn fuzzy_matches_subsequence_case_insensitively() {
        assert!(fuzzy_match("abc", "abcd"));
        assert!(fuzzy_match("abc", "axbxc"));
        assert!(fuzzy_match("ABC", "aXbXc"));
        assert!(!fuzzy_match("abc", "xyz"));
        assert!(!fuzzy_match("abc", "cba"));
        assert!(fuzzy_match("", "anything"));
    }

    #[test]
    fn filter_keeps_original_order() {
        let entries = vec![entry("abcd"), entry("axbxc"), entry("xyz")];
        let filtered = filter_entries(&entries, "abc");
        assert_eq!(names(&filtered), vec!["abcd", "axbxc"]);
    }

    #[test]
    fn longer_query_narrows_result() {
        let entries = vec![
            entry("src"),
            entry("scripts"),
            entry("assets"),
            entry("Cargo.toml"),
            entry("docs"),
        ];
        for (q1, q2) in [("s", "c"), ("a", "s"), ("", "o"), ("sc", "r")] {
            let wide = filter_entries(&entries, q1);
            let narrow = filter_entries(&entries, &format!("{}{}", q1, q2));
            let mut it = wide.iter();
            for e in &narrow {
                assert!(it.any(|w| w == e), "{:?} not in {:?}", e.name, names(&wide));
            }
        }
    }

    #[test]
    fn create_directory_rejects_existing_and_empty() {
        let dir = tempfile::tempdir().unwrap();
        let made = create_directory(dir.path(), " project ").unwrap();
        assert_eq!(made, dir.path().join("project"));
        assert!(made.is_dir());

        let err = create_directory(dir.path(), "project").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::AlreadyExists);
        let err = create_directory(dir.path(), "   ").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
    }

    #[test]
    fn create_directory_rejects_nested_and_relative_names() {
        let dir = tempfile::tempdir().unwrap();
        let parent = dir.path().join("parent");
        fs::create_dir(&parent).unwrap();

        for name in ["a/b", "../x", ".", ".."] {
            let err = create_directory(&parent, name).unwrap_err();
            assert_eq!(err.kind(), io::ErrorKind::InvalidInput, "{}", name);
        }
        assert!(!parent.join("a").exists());
        assert!(!dir.path().join("x").exists());
        assert_eq!(fs::read_dir(&parent).unwrap().count(), 0);
    }

    #[test]
    fn create_directory_refuses_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("notes"), "x").unwrap();
        let err = create_directory(dir.path(), "notes").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::AlreadyExists);
        assert!(dir.path().join("notes").is_file());
    }
}
