use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::{Duration, Instant};

use super::error::{SessionError, SessionResult};
use super::model::{ActiveSession, EditKind, EditSession, SessionId, SessionOutcome};
use crate::config::{SurfaceConfig, WindowSpec};
use crate::host::{SubEditorFactory, WindowSpawner};
use crate::picture::ImageSource;

/// Events a session's editor and window report back to the owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionSignal {
    Saved,
    Cancelled,
    WindowClosed,
}

pub type SessionSignalSink = Rc<dyn Fn(SessionId, SessionSignal)>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStart {
    Opened(SessionId),
    /// A session of the requested kind was already open; its window was focused.
    Focused(SessionId),
}

/// Owns the edit slot and drives sessions from open to release.
///
/// Collaborator calls (`focus`, `remove`, `image_source`, `remove_canvas`) are
/// always made with the slot unborrowed, so a collaborator that calls back
/// synchronously lands on consistent state. Every callback carries the
/// session id it was registered for; signals from a session that is no longer
/// current are ignored.
#[derive(Debug)]
pub struct SessionManager {
    active: RefCell<ActiveSession>,
    next_id: Cell<u64>,
    save_grace: Duration,
    adjustment_window: WindowSpec,
    filter_window: WindowSpec,
}

impl SessionManager {
    pub fn new(config: &SurfaceConfig) -> Self {
        Self {
            active: RefCell::new(ActiveSession::Idle),
            next_id: Cell::new(1),
            save_grace: config.save_grace(),
            adjustment_window: config.adjustment_window.clone(),
            filter_window: config.filter_window.clone(),
        }
    }

    pub fn active_kind(&self) -> Option<EditKind> {
        self.active.borrow().kind()
    }

    pub fn active_id(&self) -> Option<SessionId> {
        self.active.borrow().get().map(|(_, session)| session.id())
    }

    pub fn active_outcome(&self) -> Option<SessionOutcome> {
        self.active
            .borrow()
            .get()
            .map(|(_, session)| session.outcome().clone())
    }

    pub fn active_source_image(&self) -> Option<ImageSource> {
        self.active
            .borrow()
            .get()
            .map(|(_, session)| session.source_image().clone())
    }

    fn window_spec(&self, kind: EditKind) -> &WindowSpec {
        match kind {
            EditKind::Adjustment => &self.adjustment_window,
            EditKind::Filter => &self.filter_window,
        }
    }

    fn allocate_id(&self) -> SessionId {
        let raw = self.next_id.get();
        self.next_id.set(raw.wrapping_add(1));
        SessionId::new(raw)
    }

    pub fn start(
        &self,
        kind: EditKind,
        source: &ImageSource,
        editors: &dyn SubEditorFactory,
        windows: &dyn WindowSpawner,
        signals: SessionSignalSink,
    ) -> SessionResult<SessionStart> {
        let existing = match self.active.borrow().get() {
            Some((active, session)) if active == kind => {
                Some((session.id(), session.window.clone()))
            }
            Some((active, _)) => {
                tracing::debug!(requested = ?kind, ?active, "edit session conflict");
                return Err(SessionError::Conflict {
                    requested: kind,
                    active,
                });
            }
            None => None,
        };

        if let Some((id, window)) = existing {
            match window {
                Some(window) => {
                    tracing::debug!(?kind, id = id.get(), "focusing open edit session");
                    window.focus();
                }
                None => tracing::debug!(?kind, id = id.get(), "edit window still opening"),
            }
            return Ok(SessionStart::Focused(id));
        }

        let editor = editors
            .create(kind, source)
            .map_err(|source| SessionError::EditorUnavailable { kind, source })?;
        let id = self.allocate_id();
        *self.active.borrow_mut() =
            ActiveSession::occupied(kind, EditSession::new(id, source.clone(), editor.clone()));

        let sink = signals.clone();
        editor.on_save(Box::new(move || sink(id, SessionSignal::Saved)));
        let sink = signals.clone();
        editor.on_cancel(Box::new(move || sink(id, SessionSignal::Cancelled)));

        let spec = self.window_spec(kind);
        let window = windows.spawn_window(&spec.title, editor, spec.width, spec.height);
        window.on_close(Box::new(move || signals(id, SessionSignal::WindowClosed)));

        let stored = match self.active.borrow_mut().current_mut(id) {
            Some(session) => {
                session.window = Some(window.clone());
                true
            }
            None => false,
        };
        if !stored {
            tracing::warn!(?kind, id = id.get(), "edit session ended while its window was opening");
            window.remove();
            return Ok(SessionStart::Opened(id));
        }

        tracing::info!(?kind, id = id.get(), title = %spec.title, "edit session opened");
        Ok(SessionStart::Opened(id))
    }

    /// Records a save and returns the editor's result image. The window stays
    /// open for the grace period so the replaced image can finish its
    /// transition; [`poll`](Self::poll) closes it afterwards.
    pub fn commit(&self, id: SessionId, now: Instant) -> Option<ImageSource> {
        let editor = self
            .active
            .borrow_mut()
            .current_mut(id)
            .map(|session| session.editor.clone())?;
        let image = editor.image_source();

        let close_at = now + self.save_grace;
        if let Some(session) = self.active.borrow_mut().current_mut(id) {
            session.outcome = SessionOutcome::Saved {
                image: image.clone(),
                close_at,
            };
        }
        tracing::info!(id = id.get(), "edit session saved");
        Some(image)
    }

    /// Discards the edit and closes the window right away.
    pub fn cancel(&self, id: SessionId) {
        let found = self
            .active
            .borrow_mut()
            .current_mut(id)
            .map(|session| session.outcome = SessionOutcome::Cancelled)
            .is_some();
        if found {
            self.close_window(id);
        }
    }

    /// The hosting window went away, whoever closed it.
    pub fn window_closed(&self, id: SessionId) -> Option<SessionOutcome> {
        self.release(id)
    }

    /// Closes a saved session whose grace period has run out. Returns true if
    /// a session was closed.
    pub fn poll(&self, now: Instant) -> bool {
        let due = match self.active.borrow().get() {
            Some((_, session)) => match session.outcome() {
                SessionOutcome::Saved { close_at, .. } if now >= *close_at => Some(session.id()),
                _ => None,
            },
            None => None,
        };
        match due {
            Some(id) => {
                self.close_window(id);
                true
            }
            None => false,
        }
    }

    /// Hands a newly committed surface image to an open adjustment editor.
    pub fn push_image(&self, image: &ImageSource) {
        let editor = match self.active.borrow().get() {
            Some((EditKind::Adjustment, session)) => Some(session.editor.clone()),
            _ => None,
        };
        if let Some(editor) = editor {
            editor.set_image(image);
        }
    }

    /// Cancels whatever session is open.
    pub fn shutdown(&self) {
        if let Some(id) = self.active_id() {
            self.cancel(id);
        }
    }

    fn close_window(&self, id: SessionId) {
        let window = self
            .active
            .borrow_mut()
            .current_mut(id)
            .and_then(|session| session.window.clone());
        if let Some(window) = window {
            window.remove();
        }
        self.release(id);
    }

    /// Empties the slot if it still holds session `id`. Safe to call any
    /// number of times.
    fn release(&self, id: SessionId) -> Option<SessionOutcome> {
        let (kind, mut session) = self.active.borrow_mut().take_if(id)?;
        session.release_canvas();
        let outcome = match session.outcome {
            SessionOutcome::Pending => SessionOutcome::Closed,
            ref other => other.clone(),
        };
        tracing::info!(?kind, id = id.get(), ?outcome, "edit session released");
        Some(outcome)
    }
}
