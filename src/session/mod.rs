pub mod error;
pub mod manager;
pub mod model;

pub use error::{SessionError, SessionResult};
pub use manager::{SessionManager, SessionSignal, SessionSignalSink, SessionStart};
pub use model::{ActiveSession, EditKind, EditSession, SessionId, SessionOutcome};
