pub mod layout;
pub mod records;
pub mod session_store;

pub use records::{CorrectionRecord, Phase, SessionMeta, SessionSource, ToolEvent};
pub use session_store::{SessionStore, Stream};
