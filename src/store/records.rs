use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::classifier::CorrectionKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Pre,
    Post,
}

/// One line of `tools.jsonl`.
///
/// `pre_event_id` is empty on a post record whose pre observation could not
/// be matched; it is never filled with a guess.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolEvent {
    pub event_id: String,
    pub phase: Phase,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pre_event_id: Option<String>,
    pub timestamp: DateTime<Utc>,
    pub tool_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub call_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workflow_stage: Option<String>,
}

impl ToolEvent {
    /// True when this is a post record linked to a pre record
    pub fn is_correlated(&self) -> bool {
        self.phase == Phase::Post && self.pre_event_id.as_deref().is_some_and(|id| !id.is_empty())
    }
}

/// One line of `corrections.jsonl`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrectionRecord {
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "type")]
    pub kind: CorrectionKind,
    pub confidence: f64,
    pub tool: String,
    pub message_excerpt: String,
    pub event_id: String,
}

/// Contents of `session.json`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionMeta {
    pub id: String,
    pub started_at: DateTime<Utc>,
    pub root: String,
    pub source: SessionSource,
}

/// Where a session came from. Informational only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SessionSource {
    Startup,
    Resume,
    Clear,
    Compact,
    Other(String),
}

impl From<String> for SessionSource {
    fn from(s: String) -> Self {
        SessionSource::parse(&s)
    }
}

impl From<SessionSource> for String {
    fn from(source: SessionSource) -> Self {
        source.to_string()
    }
}

impl SessionSource {
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "" | "startup" => SessionSource::Startup,
            "resume" => SessionSource::Resume,
            "clear" => SessionSource::Clear,
            "compact" => SessionSource::Compact,
            other => SessionSource::Other(other.to_string()),
        }
    }
}

impl std::fmt::Display for SessionSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionSource::Startup => write!(f, "startup"),
            SessionSource::Resume => write!(f, "resume"),
            SessionSource::Clear => write!(f, "clear"),
            SessionSource::Compact => write!(f, "compact"),
            SessionSource::Other(s) => write!(f, "{}", s),
        }
    }
}
