use chrono::{DateTime, Utc};
use rand::Rng;

use crate::error::{CaptureError, Result};
use crate::store::Phase;

/// Synthesize a session id from the start time plus a random suffix, so two
/// sessions started within the same second still differ.
pub fn new_session_id(now: DateTime<Utc>) -> String {
    let suffix: u32 = rand::thread_rng().gen();
    format!("{}-{:08x}", now.format("%Y%m%d-%H%M%S"), suffix)
}

/// Mint an event id such as `pre-1718202727000123-a1b2c3`
pub fn new_event_id(phase: Phase) -> String {
    let prefix = match phase {
        Phase::Pre => "pre",
        Phase::Post => "post",
    };
    let suffix: u32 = rand::thread_rng().gen_range(0..0x100_0000);
    format!("{}-{}-{:06x}", prefix, Utc::now().timestamp_micros(), suffix)
}

/// Check that a host-supplied id is usable as a single directory name
pub fn validate_session_id(id: &str) -> Result<&str> {
    let id = id.trim();
    let bad = id.is_empty()
        || id == "."
        || id.contains("..")
        || id.contains('/')
        || id.contains('\\')
        || id.chars().any(char::is_control);
    if bad {
        Err(CaptureError::InvalidSessionId(id.to_string()))
    } else {
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use regex::Regex;
    use std::collections::HashSet;

    #[test]
    fn test_session_id_format() {
        let now = DateTime::parse_from_rfc3339("2025-06-12T14:32:07Z")
            .unwrap()
            .with_timezone(&Utc);
        let id = new_session_id(now);
        let re = Regex::new(r"^20250612-143207-[0-9a-f]{8}$").unwrap();
        assert!(re.is_match(&id), "{}", id);
    }

    #[test]
    fn test_session_ids_distinct_in_same_tick() {
        let now = Utc::now();
        let ids: HashSet<String> = (0..100).map(|_| new_session_id(now)).collect();
        assert_eq!(ids.len(), 100);
    }

    #[test]
    fn test_event_id_prefix() {
        assert!(new_event_id(Phase::Pre).starts_with("pre-"));
        assert!(new_event_id(Phase::Post).starts_with("post-"));
        assert_ne!(new_event_id(Phase::Pre), new_event_id(Phase::Pre));
    }

    #[test]
    fn test_validate_session_id() {
        assert_eq!(validate_session_id(" abc-123 ").unwrap(), "abc-123");
        assert!(validate_session_id("").is_err());
        assert!(validate_session_id("../etc").is_err());
        assert!(validate_session_id("a/b").is_err());
        assert!(validate_session_id("a\\b").is_err());
    }
}
