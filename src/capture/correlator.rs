use chrono::Utc;
use tracing::debug;

use crate::classifier::Classifier;
use crate::error::Result;
use crate::session::CaptureContext;
use crate::store::{CorrectionRecord, Phase, SessionStore, Stream, ToolEvent};
use crate::utils::ids::new_event_id;
use crate::utils::text::{excerpt, truncate_chars};

/// What the host knows right before an action runs
#[derive(Debug, Clone, Default)]
pub struct PreObservation<'a> {
    pub tool_name: &'a str,
    pub input: &'a str,
    /// Host-supplied identifier of this action, when it has one
    pub call_id: Option<&'a str>,
}

/// What the host knows right after an action ran
#[derive(Debug, Clone, Default)]
pub struct PostObservation<'a> {
    pub tool_name: &'a str,
    /// Present when the action failed
    pub error: Option<&'a str>,
    /// Free-text feedback observed alongside the action
    pub feedback: Option<&'a str>,
    pub call_id: Option<&'a str>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PostOutcome {
    pub event: ToolEvent,
    pub correction: Option<CorrectionRecord>,
}

/// Writes tool events for one session and links each post to its pre.
///
/// Without call ids, correlation goes through a single pending slot and is
/// only exact for strictly sequential actions; interleaved actions end up
/// with empty `pre_event_id`s rather than wrong ones.
#[derive(Debug, Clone)]
pub struct Correlator {
    ctx: CaptureContext,
    store: SessionStore,
    classifier: Classifier,
}

impl Correlator {
    pub fn new(ctx: CaptureContext) -> Self {
        Self::with_classifier(ctx, Classifier::default())
    }

    pub fn with_classifier(ctx: CaptureContext, classifier: Classifier) -> Self {
        let store = ctx.store();
        Correlator {
            ctx,
            store,
            classifier,
        }
    }

    pub fn context(&self) -> &CaptureContext {
        &self.ctx
    }

    pub fn capture_pre(&self, obs: &PreObservation<'_>) -> Result<ToolEvent> {
        let config = self.ctx.config();
        let event = ToolEvent {
            event_id: new_event_id(Phase::Pre),
            phase: Phase::Pre,
            pre_event_id: None,
            timestamp: Utc::now(),
            tool_name: obs.tool_name.to_string(),
            input_summary: Some(truncate_chars(obs.input, config.max_input_chars)),
            success: None,
            call_id: obs.call_id.map(str::to_string),
            feature_id: self.ctx.project().feature_id.clone(),
            workflow_stage: self.ctx.project().workflow_stage.clone(),
        };

        self.store.append(Stream::Tools, &event)?;
        self.store
            .put_pending(obs.call_id, &event.event_id, config.max_pending)?;
        Ok(event)
    }

    pub fn capture_post(&self, obs: &PostObservation<'_>) -> Result<PostOutcome> {
        let pre_event_id = self.store.take_pending(obs.call_id).unwrap_or_else(|e| {
            debug!("pending event unreadable, recording a miss: {}", e);
            None
        });
        if pre_event_id.is_none() {
            debug!("no pending pre event for {}", obs.tool_name);
        }

        let event = ToolEvent {
            event_id: new_event_id(Phase::Post),
            phase: Phase::Post,
            pre_event_id: Some(pre_event_id.unwrap_or_default()),
            timestamp: Utc::now(),
            tool_name: obs.tool_name.to_string(),
            input_summary: None,
            success: Some(obs.error.is_none()),
            call_id: obs.call_id.map(str::to_string),
            feature_id: self.ctx.project().feature_id.clone(),
            workflow_stage: self.ctx.project().workflow_stage.clone(),
        };
        self.store.append(Stream::Tools, &event)?;

        let correction = match obs.feedback.filter(|f| !f.trim().is_empty()) {
            Some(text) => self.record_correction(&event, text)?,
            None => None,
        };

        Ok(PostOutcome { event, correction })
    }

    fn record_correction(&self, event: &ToolEvent, text: &str) -> Result<Option<CorrectionRecord>> {
        let Some(found) = self.classifier.classify(text) else {
            return Ok(None);
        };

        let record = CorrectionRecord {
            timestamp: event.timestamp,
            kind: found.kind,
            confidence: found.confidence,
            tool: event.tool_name.clone(),
            message_excerpt: excerpt(text, self.ctx.config().max_excerpt_chars),
            event_id: event.event_id.clone(),
        };
        self.store.append(Stream::Corrections, &record)?;
        Ok(Some(record))
    }
}
