pub mod context;
pub mod lifecycle;
pub mod project;

pub use context::CaptureContext;
pub use lifecycle::start_session;
pub use project::ProjectContext;
