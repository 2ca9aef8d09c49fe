//! Correction classifier.
//!
//! Maps free-text feedback to at most one [`CorrectionKind`] using an ordered
//! table of patterns. The first matching rule wins, so explicit negations
//! sit above general preference statements. Unmatched text yields `None`.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CorrectionKind {
    NegativePreference,
    PositivePreference,
    ErrorCorrection,
    ProjectConvention,
}

impl CorrectionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            CorrectionKind::NegativePreference => "NEGATIVE_PREFERENCE",
            CorrectionKind::PositivePreference => "POSITIVE_PREFERENCE",
            CorrectionKind::ErrorCorrection => "ERROR_CORRECTION",
            CorrectionKind::ProjectConvention => "PROJECT_CONVENTION",
        }
    }
}

impl fmt::Display for CorrectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Classification {
    pub kind: CorrectionKind,
    pub confidence: f64,
}

/// One row of the rule table
#[derive(Debug, Clone)]
pub struct Rule {
    pub pattern: Regex,
    pub kind: CorrectionKind,
    pub confidence: f64,
}

impl Rule {
    /// Build a rule from a pattern written against lower-cased text
    pub fn new(pattern: &str, kind: CorrectionKind, confidence: f64) -> Result<Self, regex::Error> {
        Ok(Rule {
            pattern: Regex::new(pattern)?,
            kind,
            confidence,
        })
    }
}

// Patterns see trimmed, lower-cased text.
const BUILTIN: &[(&str, CorrectionKind, f64)] = &[
    (r"^(no[,\s]|nope|wrong|incorrect)", CorrectionKind::NegativePreference, 0.5),
    (r"\b(don'?t|don’t|do not|never|stop)\s+(use|using|do|doing|add|adding)\b", CorrectionKind::NegativePreference, 0.5),
    (r"\b(actually|instead)\b.*\b(use|do|try)\b", CorrectionKind::PositivePreference, 0.5),
    (r"\b(should be|was supposed to be)\b", CorrectionKind::ErrorCorrection, 0.4),
    (r"\b(fix|correct|change)\s+(that|this)\b.*\bto\b", CorrectionKind::ErrorCorrection, 0.4),
    (r"\b(revert|undo|rollback|roll back)|\bthat broke\b", CorrectionKind::ErrorCorrection, 0.4),
    (r"\bin this (project|repo|repository|codebase)\b", CorrectionKind::ProjectConvention, 0.6),
    (r"\b(prefer|always|i want|we use)", CorrectionKind::PositivePreference, 0.5),
];

static DEFAULT_RULES: Lazy<Vec<Rule>> = Lazy::new(|| {
    BUILTIN
        .iter()
        .map(|(pattern, kind, confidence)| {
            Rule::new(pattern, *kind, *confidence).expect("built-in pattern compiles")
        })
        .collect()
});

#[derive(Debug, Clone)]
pub struct Classifier {
    rules: Vec<Rule>,
}

impl Default for Classifier {
    fn default() -> Self {
        Classifier {
            rules: DEFAULT_RULES.clone(),
        }
    }
}

impl Classifier {
    /// Use a custom ordered rule table. Earlier rules take priority.
    pub fn with_rules(rules: Vec<Rule>) -> Self {
        Classifier { rules }
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn classify(&self, text: &str) -> Option<Classification> {
        first_match(&self.rules, text)
    }
}

fn first_match(rules: &[Rule], text: &str) -> Option<Classification> {
    let normalized = text.trim().to_lowercase();
    if normalized.is_empty() {
        return None;
    }

    rules
        .iter()
        .find(|rule| rule.pattern.is_match(&normalized))
        .map(|rule| Classification {
            kind: rule.kind,
            confidence: rule.confidence,
        })
}

/// Classify with the built-in taxonomy
pub fn classify(text: &str) -> Option<Classification> {
    first_match(&DEFAULT_RULES, text)
}
