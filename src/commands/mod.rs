pub mod capture;
pub mod classify;
pub mod hook;
pub mod session_start;
pub mod status;

use std::path::{Path, PathBuf};

use projspec_capture::store::layout::resolve_root;

/// Project root for this invocation, from the hint or the working directory
pub fn project_root(hint: Option<&Path>) -> PathBuf {
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    resolve_root(&cwd, hint)
}
