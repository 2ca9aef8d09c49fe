use std::path::Path;

use chrono::Utc;
use tracing::{info, warn};

use crate::config::CaptureConfig;
use crate::error::Result;
use crate::session::context::CaptureContext;
use crate::store::layout::{session_path, write_current_session};
use crate::store::{SessionMeta, SessionSource, SessionStore};
use crate::utils::ids::{new_session_id, validate_session_id};

/// Begin (or re-enter) a session and make it the current one.
///
/// Re-running for an id that already has a directory today keeps its
/// metadata and event streams intact; only the pointers are rewritten.
pub fn start_session(
    root: &Path,
    supplied_id: Option<&str>,
    source: SessionSource,
    config: CaptureConfig,
) -> Result<CaptureContext> {
    let now = Utc::now();

    let id = match supplied_id.filter(|s| !s.trim().is_empty()) {
        Some(raw) => match validate_session_id(raw) {
            Ok(id) => id.to_string(),
            Err(e) => {
                warn!("{}, generating a new id", e);
                new_session_id(now)
            }
        },
        None => new_session_id(now),
    };

    let date = now.format("%Y-%m-%d").to_string();
    let dir = session_path(root, &date, &id);
    let store = SessionStore::new(&dir);
    store.init_streams()?;

    let meta = store.write_meta_once(&SessionMeta {
        id: id.clone(),
        started_at: now,
        root: root.display().to_string(),
        source,
    })?;

    write_current_session(root, &id, &dir)?;

    info!("session {} ({}) at {}", meta.id, meta.source, dir.display());
    Ok(CaptureContext::new(root, id, dir, config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::layout::{current_session_dir, current_session_id};
    use crate::store::Stream;
    use serde_json::json;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_start_session_creates_layout() {
        let dir = tempdir().unwrap();
        let ctx = start_session(
            dir.path(),
            Some("abc"),
            SessionSource::Startup,
            CaptureConfig::default(),
        )
        .unwrap();

        assert_eq!(ctx.session_id(), "abc");
        assert!(ctx.session_dir().ends_with("abc"));
        assert!(ctx.session_dir().join("tools.jsonl").exists());
        assert!(ctx.session_dir().join("corrections.jsonl").exists());

        let meta = ctx.store().read_meta().unwrap();
        assert_eq!(meta.id, "abc");
        assert_eq!(meta.source, SessionSource::Startup);
        assert_eq!(meta.root, dir.path().display().to_string());

        assert_eq!(current_session_id(dir.path()).as_deref(), Some("abc"));
        assert_eq!(current_session_dir(dir.path()).as_deref(), Some(ctx.session_dir()));
    }

    #[test]
    fn test_generated_ids_are_distinct() {
        let dir = tempdir().unwrap();
        let first = start_session(dir.path(), None, SessionSource::Startup, CaptureConfig::default()).unwrap();
        let second = start_session(dir.path(), Some("  "), SessionSource::Startup, CaptureConfig::default()).unwrap();

        assert_ne!(first.session_id(), second.session_id());
        assert_ne!(first.session_dir(), second.session_dir());
        assert!(first.session_dir().is_dir());
        assert_eq!(current_session_id(dir.path()).as_deref(), Some(second.session_id()));
        assert_eq!(current_session_dir(dir.path()).as_deref(), Some(second.session_dir()));
    }

    #[test]
    fn test_reentry_keeps_events_and_metadata() {
        let dir = tempdir().unwrap();
        let ctx = start_session(dir.path(), Some("s1"), SessionSource::Startup, CaptureConfig::default()).unwrap();
        ctx.store().append(Stream::Tools, &json!({"event_id": "pre-1"})).unwrap();
        let original = ctx.store().read_meta().unwrap();

        let again = start_session(dir.path(), Some("s1"), SessionSource::Resume, CaptureConfig::default()).unwrap();

        assert_eq!(again.session_dir(), ctx.session_dir());
        assert_eq!(again.store().read_meta().unwrap(), original);
        let content = fs::read_to_string(again.store().stream_path(Stream::Tools)).unwrap();
        assert!(content.contains("pre-1"));
    }

    #[test]
    fn test_unsafe_id_is_replaced() {
        let dir = tempdir().unwrap();
        let ctx = start_session(dir.path(), Some("../escape"), SessionSource::Startup, CaptureConfig::default()).unwrap();

        assert_ne!(ctx.session_id(), "../escape");
        assert!(ctx.session_dir().starts_with(dir.path().join(".projspec/sessions")));
    }
}
