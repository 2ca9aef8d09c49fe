use std::path::Path;

use projspec_capture::capture::{capture_post, capture_pre, PostObservation, PreObservation};
use projspec_capture::config::CaptureConfig;
use projspec_capture::session::{CaptureContext, ProjectContext};

use crate::commands::hook::HookPayload;
use crate::commands::project_root;

#[derive(Debug, Clone, Default)]
pub struct PreToolOptions {
    pub tool: Option<String>,
    pub input: Option<String>,
    pub call_id: Option<String>,
    pub payload_stdin: bool,
}

#[derive(Debug, Clone, Default)]
pub struct PostToolOptions {
    pub tool: Option<String>,
    pub error: Option<String>,
    pub feedback: Option<String>,
    pub call_id: Option<String>,
    pub payload_stdin: bool,
}

fn discover(root_hint: Option<&Path>) -> Option<CaptureContext> {
    let root = project_root(root_hint);
    CaptureContext::discover(&root, CaptureConfig::load(&root))
        .map(|ctx| ctx.with_project(ProjectContext::detect()))
}

/// Record the pre observation. Never fails.
pub fn run_pre(root_hint: Option<&Path>, options: PreToolOptions) {
    let payload = HookPayload::load(options.payload_stdin);
    let ctx = discover(root_hint);

    let input = options.input.unwrap_or_else(|| payload.input_descriptor());
    let tool = options.tool.or(payload.tool_name).unwrap_or_else(|| "unknown".to_string());
    let call_id = options.call_id.or(payload.tool_use_id);

    capture_pre(
        ctx.as_ref(),
        &PreObservation {
            tool_name: &tool,
            input: &input,
            call_id: call_id.as_deref(),
        },
    );
}

/// Record the post observation and classify any feedback. Never fails.
pub fn run_post(root_hint: Option<&Path>, options: PostToolOptions) {
    let payload = HookPayload::load(options.payload_stdin);
    let ctx = discover(root_hint);

    let error = options.error.or_else(|| payload.error_descriptor());
    let feedback = options
        .feedback
        .or_else(|| payload.feedback_text().map(str::to_string));
    let tool = options.tool.or(payload.tool_name).unwrap_or_else(|| "unknown".to_string());
    let call_id = options.call_id.or(payload.tool_use_id);

    capture_post(
        ctx.as_ref(),
        &PostObservation {
            tool_name: &tool,
            error: error.as_deref(),
            feedback: feedback.as_deref(),
            call_id: call_id.as_deref(),
        },
    );
}
