use std::path::{Component, Path};

/// Env var naming the workflow stage the host is in
pub const WORKFLOW_STAGE_VAR: &str = "PROJSPEC_WORKFLOW_STAGE";

const SPECS_DIR: &str = "specs";

/// Where in the project the host is working, attached to every tool event
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectContext {
    pub feature_id: Option<String>,
    pub workflow_stage: Option<String>,
}

impl ProjectContext {
    /// Build from a working directory and an optional stage value
    pub fn from_parts(cwd: &Path, workflow_stage: Option<String>) -> Self {
        ProjectContext {
            feature_id: extract_feature_id(cwd),
            workflow_stage: workflow_stage.filter(|s| !s.trim().is_empty()),
        }
    }

    /// Detect from the process working directory and environment
    pub fn detect() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::from_parts(&cwd, std::env::var(WORKFLOW_STAGE_VAR).ok())
    }
}

/// Feature id is the path component right after the first `specs` directory
pub fn extract_feature_id(path: &Path) -> Option<String> {
    let mut components = path.components().filter_map(|c| match c {
        Component::Normal(name) => Some(name),
        _ => None,
    });

    components.find(|name| *name == SPECS_DIR)?;
    components.next().map(|name| name.to_string_lossy().to_string())
}
