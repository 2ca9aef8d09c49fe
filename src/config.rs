//! Capture settings, read from the YAML frontmatter of
//! `.projspec/projspec.local.md`:
//!
//! ```text
//! ---
//! capture:
//!   enabled: true
//!   max_input_chars: 200
//! ---
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use tracing::warn;

use crate::error::Result;
use crate::store::layout::local_config_path;

/// Env var naming an alternate root whose config takes precedence
pub const PLUGIN_ROOT_VAR: &str = "CLAUDE_PLUGIN_ROOT";

static FRONTMATTER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)\A---\s*\n(.*?)\n---\s*(\n|\z)").unwrap());

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    pub enabled: bool,
    pub max_input_chars: usize,
    pub max_excerpt_chars: usize,
    pub max_pending: usize,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        CaptureConfig {
            enabled: true,
            max_input_chars: 200,
            max_excerpt_chars: 200,
            max_pending: 64,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct Frontmatter {
    #[serde(default)]
    capture: Option<CaptureConfig>,
}

impl CaptureConfig {
    /// Load settings for `root`, falling back to defaults on any problem
    pub fn load(root: &Path) -> Self {
        let plugin_root = std::env::var_os(PLUGIN_ROOT_VAR).map(PathBuf::from);
        Self::load_from(plugin_root.as_deref(), root)
    }

    /// Config under `plugin_root` when present there, otherwise under `root`
    pub fn find_config_file(plugin_root: Option<&Path>, root: &Path) -> Option<PathBuf> {
        plugin_root
            .filter(|p| !p.as_os_str().is_empty())
            .map(local_config_path)
            .filter(|p| p.is_file())
            .or_else(|| Some(local_config_path(root)).filter(|p| p.is_file()))
    }

    pub fn load_from(plugin_root: Option<&Path>, root: &Path) -> Self {
        let Some(path) = Self::find_config_file(plugin_root, root) else {
            return CaptureConfig::default();
        };
        let Ok(content) = fs::read_to_string(&path) else {
            return CaptureConfig::default();
        };

        match Self::from_markdown(&content) {
            Ok(config) => config,
            Err(e) => {
                warn!("ignoring {}: {}", path.display(), e);
                CaptureConfig::default()
            }
        }
    }

    /// Parse the `capture:` section of a markdown document's frontmatter
    pub fn from_markdown(content: &str) -> Result<Self> {
        let Some(caps) = FRONTMATTER.captures(content) else {
            return Ok(CaptureConfig::default());
        };

        let frontmatter: Option<Frontmatter> = serde_yaml::from_str(&caps[1])?;
        Ok(frontmatter
            .and_then(|f| f.capture)
            .unwrap_or_default())
    }
}
