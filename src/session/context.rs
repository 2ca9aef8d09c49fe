use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::CaptureConfig;
use crate::session::project::ProjectContext;
use crate::store::layout::{current_session_dir, current_session_id};
use crate::store::SessionStore;

/// Everything a capture call needs to know about the active session.
///
/// Built once by [`crate::session::start_session`] for in-process hosts, or
/// by [`CaptureContext::discover`] for hook invocations that only have the
/// pointer files to go on.
#[derive(Debug, Clone)]
pub struct CaptureContext {
    root: PathBuf,
    session_id: String,
    session_dir: PathBuf,
    config: CaptureConfig,
    project: ProjectContext,
}

impl CaptureContext {
    pub fn new(
        root: impl Into<PathBuf>,
        session_id: impl Into<String>,
        session_dir: impl Into<PathBuf>,
        config: CaptureConfig,
    ) -> Self {
        CaptureContext {
            root: root.into(),
            session_id: session_id.into(),
            session_dir: session_dir.into(),
            config,
            project: ProjectContext::default(),
        }
    }

    /// Attach the feature/stage every event from this context is tagged with
    pub fn with_project(mut self, project: ProjectContext) -> Self {
        self.project = project;
        self
    }

    /// Read the "current session" pointer once and wrap it.
    ///
    /// Returns `None` (capture disabled) when capture is switched off, the
    /// pointer is absent, or it names a directory that no longer exists.
    pub fn discover(root: &Path, config: CaptureConfig) -> Option<Self> {
        if !config.enabled {
            debug!("capture disabled by config");
            return None;
        }

        let Some(dir) = current_session_dir(root) else {
            debug!("no current session under {}", root.display());
            return None;
        };
        if !dir.is_dir() {
            debug!("current session dir {} is missing", dir.display());
            return None;
        }

        let id = current_session_id(root)
            .or_else(|| dir.file_name().map(|n| n.to_string_lossy().to_string()))
            .unwrap_or_default();

        Some(CaptureContext::new(root, id, dir, config))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn session_dir(&self) -> &Path {
        &self.session_dir
    }

    pub fn config(&self) -> &CaptureConfig {
        &self.config
    }

    pub fn project(&self) -> &ProjectContext {
        &self.project
    }

    pub fn store(&self) -> SessionStore {
        SessionStore::new(&self.session_dir)
    }
}
