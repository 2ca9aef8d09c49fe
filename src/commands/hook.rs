use std::io::{self, IsTerminal, Read};

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

/// Keys tried, in order, when summarizing a tool's input
const INPUT_KEYS: &[&str] = &["file_path", "path", "command", "pattern", "url", "query"];

/// JSON the host pipes to hook invocations. Every field is optional.
#[derive(Debug, Default, Deserialize)]
pub struct HookPayload {
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub tool_name: Option<String>,
    #[serde(default)]
    pub tool_use_id: Option<String>,
    #[serde(default)]
    pub tool_input: Option<Value>,
    #[serde(default)]
    pub tool_response: Option<Value>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub feedback: Option<String>,
    #[serde(default)]
    pub prompt: Option<String>,
}

impl HookPayload {
    /// Payload for this invocation. Stdin is only touched when the host asked
    /// for it, so an inherited pipe that never closes cannot stall a hook.
    pub fn load(payload_stdin: bool) -> Self {
        if payload_stdin {
            Self::from_stdin()
        } else {
            HookPayload::default()
        }
    }

    /// Read a payload from stdin when one is piped in; anything unreadable is empty
    fn from_stdin() -> Self {
        let stdin = io::stdin();
        if stdin.is_terminal() {
            return HookPayload::default();
        }

        let mut raw = String::new();
        if let Err(e) = stdin.lock().read_to_string(&mut raw) {
            debug!("could not read hook payload: {}", e);
            return HookPayload::default();
        }
        Self::parse(&raw)
    }

    pub fn parse(raw: &str) -> Self {
        if raw.trim().is_empty() {
            return HookPayload::default();
        }
        serde_json::from_str(raw).unwrap_or_else(|e| {
            debug!("ignoring malformed hook payload: {}", e);
            HookPayload::default()
        })
    }

    /// Short description of what the tool acted on
    pub fn input_descriptor(&self) -> String {
        let Some(input) = &self.tool_input else {
            return String::new();
        };

        if let Value::Object(map) = input {
            for key in INPUT_KEYS {
                if let Some(Value::String(s)) = map.get(*key) {
                    return s.clone();
                }
            }
        }

        match input {
            Value::String(s) => s.clone(),
            Value::Null => String::new(),
            other => other.to_string(),
        }
    }

    /// Error text when the tool reported failure
    pub fn error_descriptor(&self) -> Option<String> {
        if let Some(e) = self.error.as_ref().filter(|e| !e.is_empty()) {
            return Some(e.clone());
        }

        let response = self.tool_response.as_ref()?;
        match response.get("error") {
            Some(Value::String(s)) if !s.is_empty() => return Some(s.clone()),
            Some(Value::Null) | None => {}
            Some(other) => return Some(other.to_string()),
        }
        if response.get("is_error").and_then(Value::as_bool) == Some(true) {
            return Some("tool reported an error".to_string());
        }
        None
    }

    /// Free text accompanying the action
    pub fn feedback_text(&self) -> Option<&str> {
        let nonblank = |s: &&str| !s.trim().is_empty();
        self.feedback
            .as_deref()
            .filter(nonblank)
            .or_else(|| self.prompt.as_deref().filter(nonblank))
    }
}
