use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;

/// Marker directory that identifies a project root
pub const MARKER_DIR: &str = ".projspec";

const SESSIONS_DIR: &str = "sessions";
const CURRENT_SESSION_FILE: &str = "current_session";
const CURRENT_SESSION_DIR_FILE: &str = "current_session_dir";
const LOCAL_CONFIG_FILE: &str = "projspec.local.md";

/// Locate the project root.
///
/// A non-empty `hint` is trusted as-is. Otherwise walk upward from `start`
/// looking for the marker directory; when none is found, fall back to
/// `start` itself so capture never blocks on a missing project.
pub fn resolve_root(start: &Path, hint: Option<&Path>) -> PathBuf {
    if let Some(hint) = hint.filter(|h| !h.as_os_str().is_empty()) {
        return hint.to_path_buf();
    }

    for dir in start.ancestors() {
        if dir.join(MARKER_DIR).is_dir() {
            return dir.to_path_buf();
        }
    }

    debug!("no {} marker above {}, using it as root", MARKER_DIR, start.display());
    start.to_path_buf()
}

/// Get the path to the marker directory under `root`
pub fn marker_path(root: &Path) -> PathBuf {
    root.join(MARKER_DIR)
}

/// Get the path holding all session directories
pub fn sessions_path(root: &Path) -> PathBuf {
    marker_path(root).join(SESSIONS_DIR)
}

/// Get the directory for session `id` started on `date` (YYYY-MM-DD)
pub fn session_path(root: &Path, date: &str, id: &str) -> PathBuf {
    sessions_path(root).join(date).join(id)
}

/// Get the path to the local config file
pub fn local_config_path(root: &Path) -> PathBuf {
    marker_path(root).join(LOCAL_CONFIG_FILE)
}

fn current_session_file(root: &Path) -> PathBuf {
    marker_path(root).join(CURRENT_SESSION_FILE)
}

fn current_session_dir_file(root: &Path) -> PathBuf {
    marker_path(root).join(CURRENT_SESSION_DIR_FILE)
}

/// Read a pointer file, treating absence and blank content alike as `None`
pub fn read_pointer(path: &Path) -> Option<String> {
    let content = fs::read_to_string(path).ok()?;
    let value = content.trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Id of the current session, if any
pub fn current_session_id(root: &Path) -> Option<String> {
    read_pointer(&current_session_file(root))
}

/// Directory of the current session, if any. Emptiness means capture is disabled.
pub fn current_session_dir(root: &Path) -> Option<PathBuf> {
    read_pointer(&current_session_dir_file(root)).map(PathBuf::from)
}

/// Redirect both "current session" pointers to a new session
pub fn write_current_session(root: &Path, id: &str, dir: &Path) -> io::Result<()> {
    fs::create_dir_all(marker_path(root))?;
    fs::write(current_session_file(root), format!("{}\n", id))?;
    fs::write(
        current_session_dir_file(root),
        format!("{}\n", dir.display()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_paths() {
        let root = Path::new("/work");
        assert_eq!(marker_path(root), PathBuf::from("/work/.projspec"));
        assert_eq!(
            session_path(root, "2025-06-12", "abc"),
            PathBuf::from("/work/.projspec/sessions/2025-06-12/abc")
        );
        assert_eq!(
            local_config_path(root),
            PathBuf::from("/work/.projspec/projspec.local.md")
        );
    }

    #[test]
    fn test_resolve_root_walks_upward() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join(MARKER_DIR)).unwrap();
        let nested = dir.path().join("src/deep");
        fs::create_dir_all(&nested).unwrap();

        assert_eq!(resolve_root(&nested, None), dir.path());
    }

    #[test]
    fn test_resolve_root_falls_back_to_start() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("a/b");
        fs::create_dir_all(&nested).unwrap();

        assert_eq!(resolve_root(&nested, None), nested);
    }

    #[test]
    fn test_resolve_root_trusts_hint() {
        let dir = tempdir().unwrap();
        let hint = Path::new("/somewhere/else");
        assert_eq!(resolve_root(dir.path(), Some(hint)), hint);
        assert_eq!(resolve_root(dir.path(), Some(Path::new(""))), dir.path());
    }

    #[test]
    fn test_missing_pointer_is_none() {
        let dir = tempdir().unwrap();
        assert!(current_session_id(dir.path()).is_none());
        assert!(current_session_dir(dir.path()).is_none());
    }

    #[test]
    fn test_pointer_round_trip() {
        let dir = tempdir().unwrap();
        let session = dir.path().join("s1");
        write_current_session(dir.path(), "s1", &session).unwrap();

        assert_eq!(current_session_id(dir.path()).as_deref(), Some("s1"));
        assert_eq!(current_session_dir(dir.path()), Some(session));
    }

    #[test]
    fn test_blank_pointer_is_none() {
        let dir = tempdir().unwrap();
        fs::create_dir(marker_path(dir.path())).unwrap();
        fs::write(current_session_dir_file(dir.path()), "  \n").unwrap();
        assert!(current_session_dir(dir.path()).is_none());
    }
}
