use thiserror::Error;

use super::model::EditKind;
use crate::host::EditorError;

pub type SessionResult<T> = std::result::Result<T, SessionError>;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("cannot start {requested:?} session while {active:?} session is open")]
    Conflict { requested: EditKind, active: EditKind },
    #[error("failed to create {kind:?} editor: {source}")]
    EditorUnavailable {
        kind: EditKind,
        #[source]
        source: EditorError,
    },
}
