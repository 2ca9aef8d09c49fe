//! Capture boundary.
//!
//! The functions here never fail: a missing context is a no-op, and any
//! error from the [`Correlator`] is logged at debug level and dropped so the
//! instrumented action always proceeds.

pub mod correlator;

pub use correlator::{Correlator, PostObservation, PostOutcome, PreObservation};

use tracing::debug;

use crate::error::Result;
use crate::session::CaptureContext;
use crate::store::ToolEvent;

/// Discard the error side of a capture result
pub fn absorb<T>(operation: &str, result: Result<T>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            debug!("{} skipped: {}", operation, e);
            None
        }
    }
}

fn active(ctx: Option<&CaptureContext>) -> Option<&CaptureContext> {
    ctx.filter(|c| c.config().enabled)
}

pub fn capture_pre(ctx: Option<&CaptureContext>, obs: &PreObservation<'_>) -> Option<ToolEvent> {
    let ctx = active(ctx)?;
    absorb("capture_pre", Correlator::new(ctx.clone()).capture_pre(obs))
}

pub fn capture_post(ctx: Option<&CaptureContext>, obs: &PostObservation<'_>) -> Option<PostOutcome> {
    let ctx = active(ctx)?;
    absorb("capture_post", Correlator::new(ctx.clone()).capture_post(obs))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CaptureConfig;
    use crate::error::CaptureError;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_no_context_is_noop() {
        let obs = PreObservation { tool_name: "Bash", input: "ls", call_id: None };
        assert!(capture_pre(None, &obs).is_none());
        assert!(capture_post(None, &PostObservation { tool_name: "Bash", ..Default::default() }).is_none());
    }

    #[test]
    fn test_disabled_context_writes_nothing() {
        let dir = tempdir().unwrap();
        let session = dir.path().join("s");
        fs::create_dir_all(&session).unwrap();
        let config = CaptureConfig { enabled: false, ..CaptureConfig::default() };
        let ctx = CaptureContext::new(dir.path(), "s", &session, config);

        let obs = PreObservation { tool_name: "Bash", input: "ls", call_id: None };
        assert!(capture_pre(Some(&ctx), &obs).is_none());
        assert!(fs::read_dir(&session).unwrap().next().is_none());
    }

    #[test]
    fn test_write_failure_is_absorbed() {
        let dir = tempdir().unwrap();
        // Session dir points at a regular file, so every append fails.
        let bogus = dir.path().join("not-a-dir");
        fs::write(&bogus, "").unwrap();
        let ctx = CaptureContext::new(dir.path(), "s", &bogus, CaptureConfig::default());

        let obs = PreObservation { tool_name: "Bash", input: "ls", call_id: None };
        assert!(capture_pre(Some(&ctx), &obs).is_none());
        assert!(capture_post(Some(&ctx), &PostObservation { tool_name: "Bash", ..Default::default() }).is_none());
    }

    #[test]
    fn test_absorb() {
        assert_eq!(absorb("op", Ok::<_, CaptureError>(3)), Some(3));
        assert_eq!(absorb::<u8>("op", Err(CaptureError::NoSession)), None);
    }
}
