use std::path::Path;

use projspec_capture::config::CaptureConfig;
use projspec_capture::error::Result;
use projspec_capture::session::start_session;
use projspec_capture::store::SessionSource;

use crate::commands::hook::HookPayload;
use crate::commands::project_root;

#[derive(Debug, Clone, Default)]
pub struct SessionStartOptions {
    pub session_id: Option<String>,
    pub source: Option<String>,
    pub payload_stdin: bool,
}

pub fn run(root_hint: Option<&Path>, options: SessionStartOptions) -> Result<()> {
    let payload = HookPayload::load(options.payload_stdin);
    let root = project_root(root_hint);

    let supplied_id = options.session_id.or(payload.session_id);
    let source = options
        .source
        .or(payload.source)
        .map(|s| SessionSource::parse(&s))
        .unwrap_or(SessionSource::Startup);

    start_session(&root, supplied_id.as_deref(), source, CaptureConfig::load(&root))?;
    Ok(())
}
