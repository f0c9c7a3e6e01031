use std::fmt;
use std::rc::Rc;
use std::time::Instant;

use crate::host::{FloatingWindow, SubEditor};
use crate::picture::ImageSource;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EditKind {
    Adjustment,
    Filter,
}

impl EditKind {
    pub const fn other(self) -> Self {
        match self {
            Self::Adjustment => Self::Filter,
            Self::Filter => Self::Adjustment,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SessionId(u64);

impl SessionId {
    pub(crate) const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn get(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SessionOutcome {
    Pending,
    /// The edit was committed; the window closes once `close_at` passes.
    Saved {
        image: ImageSource,
        close_at: Instant,
    },
    Cancelled,
    Closed,
}

pub struct EditSession {
    id: SessionId,
    source_image: ImageSource,
    pub(crate) editor: Rc<dyn SubEditor>,
    pub(crate) window: Option<Rc<dyn FloatingWindow>>,
    pub(crate) outcome: SessionOutcome,
    canvas_released: bool,
}

impl EditSession {
    pub(crate) fn new(id: SessionId, source_image: ImageSource, editor: Rc<dyn SubEditor>) -> Self {
        Self {
            id,
            source_image,
            editor,
            window: None,
            outcome: SessionOutcome::Pending,
            canvas_released: false,
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    /// Image the session was opened with.
    pub fn source_image(&self) -> &ImageSource {
        &self.source_image
    }

    pub fn outcome(&self) -> &SessionOutcome {
        &self.outcome
    }

    /// False while the window is still being spawned.
    pub fn has_window(&self) -> bool {
        self.window.is_some()
    }

    /// Tears down the editor canvas at most once. A canvas that was never
    /// created is not an error worth reporting.
    pub(crate) fn release_canvas(&mut self) {
        if std::mem::replace(&mut self.canvas_released, true) {
            return;
        }
        if let Err(err) = self.editor.remove_canvas() {
            tracing::debug!(id = self.id.get(), %err, "editor canvas cleanup skipped");
        }
    }
}

impl fmt::Debug for EditSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EditSession")
            .field("id", &self.id)
            .field("source_image", &self.source_image)
            .field("has_window", &self.has_window())
            .field("outcome", &self.outcome)
            .field("canvas_released", &self.canvas_released)
            .finish()
    }
}

/// The one edit slot of a surface. Holding at most one session is a property
/// of the type.
#[derive(Debug, Default)]
pub enum ActiveSession {
    #[default]
    Idle,
    Adjustment(EditSession),
    Filter(EditSession),
}

impl ActiveSession {
    pub(crate) fn occupied(kind: EditKind, session: EditSession) -> Self {
        match kind {
            EditKind::Adjustment => Self::Adjustment(session),
            EditKind::Filter => Self::Filter(session),
        }
    }

    pub fn kind(&self) -> Option<EditKind> {
        self.get().map(|(kind, _)| kind)
    }

    pub fn get(&self) -> Option<(EditKind, &EditSession)> {
        match self {
            Self::Idle => None,
            Self::Adjustment(session) => Some((EditKind::Adjustment, session)),
            Self::Filter(session) => Some((EditKind::Filter, session)),
        }
    }

    /// The session with `id`, if it is still the active one.
    pub(crate) fn current_mut(&mut self, id: SessionId) -> Option<&mut EditSession> {
        match self {
            Self::Adjustment(session) | Self::Filter(session) if session.id == id => Some(session),
            _ => None,
        }
    }

    pub(crate) fn take_if(&mut self, id: SessionId) -> Option<(EditKind, EditSession)> {
        if self.get().map(|(_, session)| session.id) != Some(id) {
            return None;
        }
        match std::mem::take(self) {
            Self::Idle => None,
            Self::Adjustment(session) => Some((EditKind::Adjustment, session)),
            Self::Filter(session) => Some((EditKind::Filter, session)),
        }
    }
}
