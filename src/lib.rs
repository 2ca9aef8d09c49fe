//! Session event capture for AI-assisted development.
//!
//! A host calls into this crate right before and right after every action it
//! performs. Each session gets its own directory of append-only JSON Lines
//! streams: tool events, with every post observation linked to its pre, and
//! corrections classified from any free-text feedback that came with an
//! action. A separate learning process reads those streams later.
//!
//! Capture is best effort. Nothing on the capture path can fail the host's
//! action; see [`capture`].

pub mod capture;
pub mod classifier;
pub mod config;
pub mod error;
pub mod session;
pub mod store;
pub mod utils;

pub use capture::{capture_post, capture_pre, Correlator, PostObservation, PreObservation};
pub use classifier::{classify, Classification, Classifier, CorrectionKind};
pub use config::CaptureConfig;
pub use error::{CaptureError, Result};
pub use session::{start_session, CaptureContext, ProjectContext};
