use std::cell::{Cell, OnceCell, RefCell};
use std::rc::{Rc, Weak};
use std::time::Instant;

use crate::clock::Clock;
use crate::config::SurfaceConfig;
use crate::error::{SurfaceError, SurfaceResult};
use crate::host::{HostServices, ImageView, OverlayRenderer, SubEditorFactory, WindowSpawner};
use crate::notification::{NotificationKind, Notifier};
use crate::picture::ImageSource;
use crate::session::{
    EditKind, SessionError, SessionId, SessionManager, SessionOutcome, SessionSignal,
    SessionSignalSink, SessionStart,
};
use crate::toolbar::{ToolbarAction, ToolbarOverlay};
use crate::visibility::{
    HideTimer, ToolbarOp, VisibilityEvent, VisibilityLock, VisibilityMachine, VisibilityState,
};

const COPIED_MESSAGE: &str = "Copied to clipboard.";

/// Everything the surface talks to outside itself.
#[derive(Clone)]
pub struct Collaborators {
    pub view: Rc<dyn ImageView>,
    pub renderer: Rc<dyn OverlayRenderer>,
    pub windows: Rc<dyn WindowSpawner>,
    pub editors: Rc<dyn SubEditorFactory>,
    pub host: Rc<dyn HostServices>,
    pub notifier: Rc<dyn Notifier>,
    pub clock: Rc<dyn Clock>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerOrigin {
    Image,
    Toolbar,
}

/// The current-invocation image view: the displayed image, its hover toolbar
/// and the edit session opened from it.
///
/// Clones share the same surface. The host drives time by calling
/// [`tick`](Self::tick), at the latest by [`next_deadline`](Self::next_deadline).
#[derive(Clone)]
pub struct ImageSurface {
    inner: Rc<SurfaceInner>,
}

struct SurfaceInner {
    config: SurfaceConfig,
    deps: Collaborators,
    image: RefCell<ImageSource>,
    toolbar: OnceCell<ToolbarOverlay>,
    visibility: RefCell<VisibilityMachine>,
    hide_timer: RefCell<HideTimer>,
    lock: VisibilityLock,
    sessions: SessionManager,
    closed: Cell<bool>,
}

fn with_inner(
    weak: Weak<SurfaceInner>,
    action: impl Fn(&Rc<SurfaceInner>) + 'static,
) -> impl Fn() + 'static {
    move || {
        if let Some(inner) = weak.upgrade() {
            action(&inner);
        }
    }
}

impl ImageSurface {
    pub fn new(image: ImageSource, config: SurfaceConfig, deps: Collaborators) -> Self {
        let inner = Rc::new(SurfaceInner {
            hide_timer: RefCell::new(HideTimer::new(config.hide_delay())),
            sessions: SessionManager::new(&config),
            config,
            deps,
            image: RefCell::new(image.clone()),
            toolbar: OnceCell::new(),
            visibility: RefCell::new(VisibilityMachine::new()),
            lock: VisibilityLock::new(),
            closed: Cell::new(false),
        });

        let view = inner.deps.view.clone();
        view.set_image(&image);
        view.on_pointer_enter(Box::new(with_inner(Rc::downgrade(&inner), |inner| {
            inner.pointer_entered(PointerOrigin::Image)
        })));
        view.on_pointer_leave(Box::new(with_inner(Rc::downgrade(&inner), |inner| {
            inner.pointer_left(PointerOrigin::Image)
        })));
        tracing::debug!(image = ?image, "image surface created");

        Self { inner }
    }

    pub fn image(&self) -> ImageSource {
        self.inner.image()
    }

    /// Replaces the displayed image. An open adjustment continues from it.
    pub fn set_image(&self, image: ImageSource) {
        self.inner.set_image(image);
    }

    /// The toolbar, built and rendered on first use.
    pub fn tools(&self) -> &ToolbarOverlay {
        self.inner.tools()
    }

    pub fn image_entered(&self) {
        self.inner.pointer_entered(PointerOrigin::Image);
    }

    pub fn image_left(&self) {
        self.inner.pointer_left(PointerOrigin::Image);
    }

    pub fn toolbar_entered(&self) {
        self.inner.pointer_entered(PointerOrigin::Toolbar);
    }

    pub fn toolbar_left(&self) {
        self.inner.pointer_left(PointerOrigin::Toolbar);
    }

    /// Runs whatever deferred work is due: the toolbar hide and the delayed
    /// close of a saved edit.
    pub fn tick(&self) {
        self.inner.tick();
    }

    /// Earliest instant at which [`tick`](Self::tick) has something to do.
    pub fn next_deadline(&self) -> Option<Instant> {
        let hide = self.inner.hide_timer.borrow().deadline();
        let close = match self.inner.sessions.active_outcome() {
            Some(SessionOutcome::Saved { close_at, .. }) => Some(close_at),
            _ => None,
        };
        match (hide, close) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    pub fn visibility(&self) -> VisibilityState {
        self.inner.visibility.borrow().state()
    }

    pub fn toolbar_attached(&self) -> bool {
        self.inner
            .toolbar
            .get()
            .is_some_and(ToolbarOverlay::is_attached)
    }

    pub fn start_adjustment(&self) -> SurfaceResult<SessionStart> {
        self.inner.start_session(EditKind::Adjustment)
    }

    pub fn start_filter(&self) -> SurfaceResult<SessionStart> {
        self.inner.start_session(EditKind::Filter)
    }

    pub fn active_edit(&self) -> Option<EditKind> {
        self.inner.sessions.active_kind()
    }

    pub fn sessions(&self) -> &SessionManager {
        &self.inner.sessions
    }

    /// Runs a toolbar action as if its button was clicked, but returns the
    /// failure instead of notifying.
    pub fn perform(&self, action: ToolbarAction) -> SurfaceResult<()> {
        self.inner.perform(action)
    }

    /// The invocation left the UI: discard any edit, hide the toolbar and
    /// ignore further pointer input.
    pub fn close(&self) {
        self.inner.close();
    }
}

impl SurfaceInner {
    fn now(&self) -> Instant {
        self.deps.clock.now()
    }

    fn image(&self) -> ImageSource {
        self.image.borrow().clone()
    }

    fn set_image(&self, image: ImageSource) {
        *self.image.borrow_mut() = image.clone();
        self.deps.view.set_image(&image);
        self.sessions.push_image(&image);
    }

    fn tools(self: &Rc<Self>) -> &ToolbarOverlay {
        let toolbar = self.toolbar.get_or_init(|| self.build_toolbar());
        if toolbar.is_rendered() {
            return toolbar;
        }
        toolbar.render(
            self.deps.renderer.as_ref(),
            Rc::new(with_inner(Rc::downgrade(self), |inner| {
                inner.pointer_entered(PointerOrigin::Toolbar)
            })),
            Rc::new(with_inner(Rc::downgrade(self), |inner| {
                inner.pointer_left(PointerOrigin::Toolbar)
            })),
        );
        toolbar
    }

    fn build_toolbar(self: &Rc<Self>) -> ToolbarOverlay {
        let toolbar = ToolbarOverlay::new();
        let clipboard = self.deps.host.clipboard_available();
        if !clipboard {
            tracing::debug!("clipboard unavailable; copy action not offered");
        }
        for action in ToolbarAction::available(clipboard) {
            match toolbar.add_item(action.label(), action.icon()) {
                Ok(handle) => handle.on_click(with_inner(Rc::downgrade(self), move |inner| {
                    inner.handle_click(action)
                })),
                Err(err) => tracing::warn!(?action, %err, "failed to add toolbar item"),
            }
        }
        toolbar
    }

    fn transition(&self, event: VisibilityEvent) -> bool {
        match self.visibility.borrow_mut().transition(event) {
            Ok(_) => true,
            Err(err) => {
                tracing::debug!(%err, "ignoring pointer event");
                false
            }
        }
    }

    fn apply(&self, toolbar: &ToolbarOverlay, op: ToolbarOp) {
        let view = self.deps.view.as_ref();
        let result = match op {
            ToolbarOp::Attach => toolbar.attach(view),
            ToolbarOp::Detach => toolbar.detach(view),
        };
        match result {
            Ok(changed) => tracing::debug!(?op, changed, "toolbar operation applied"),
            Err(err) => tracing::warn!(?op, %err, "toolbar operation failed"),
        }
    }

    fn pointer_entered(self: &Rc<Self>, origin: PointerOrigin) {
        if self.closed.get() {
            return;
        }
        let cancelled = self.hide_timer.borrow_mut().cancel();
        self.transition(VisibilityEvent::PointerEntered);
        let toolbar = self.tools();
        if !toolbar.is_rendered() {
            tracing::debug!(?origin, cancelled, "pointer entered while toolbar renders");
            return;
        }
        let outcome = self.lock.run(ToolbarOp::Attach, |op| self.apply(toolbar, op));
        tracing::debug!(?origin, cancelled, ?outcome, "pointer entered");
    }

    fn pointer_left(&self, origin: PointerOrigin) {
        if self.closed.get() || !self.transition(VisibilityEvent::PointerLeft) {
            return;
        }
        self.hide_timer.borrow_mut().arm(self.now());
        tracing::debug!(?origin, "pointer left; hide timer armed");
    }

    fn tick(&self) {
        let now = self.now();
        let fired = self.hide_timer.borrow_mut().poll(now);
        if fired && self.transition(VisibilityEvent::HideTimerFired) {
            if let Some(toolbar) = self.toolbar.get() {
                self.lock.run(ToolbarOp::Detach, |op| self.apply(toolbar, op));
            }
        }
        self.sessions.poll(now);
    }

    fn handle_click(self: &Rc<Self>, action: ToolbarAction) {
        tracing::debug!(?action, "toolbar action clicked");
        if let Err(err) = self.perform(action) {
            tracing::warn!(?action, %err, "toolbar action failed");
            self.deps
                .notifier
                .push(NotificationKind::Error, &err.to_string());
        }
    }

    fn perform(self: &Rc<Self>, action: ToolbarAction) -> SurfaceResult<()> {
        let image = self.image();
        let host = self.deps.host.as_ref();
        match action {
            ToolbarAction::CopyToClipboard => {
                host.write_clipboard(&image.payload()?)?;
                self.deps
                    .notifier
                    .push(NotificationKind::Info, COPIED_MESSAGE);
            }
            ToolbarAction::SaveAs => host.save_as(&image.payload()?)?,
            ToolbarAction::Popout => {
                let url = image.uri().ok_or(SurfaceError::NoImageAddress)?;
                host.open_window(url)?;
            }
            ToolbarAction::Adjust => self.start_session_from_toolbar(EditKind::Adjustment)?,
            ToolbarAction::Filter => self.start_session_from_toolbar(EditKind::Filter)?,
            ToolbarAction::SendToCanvas => host.send_to_canvas(&image)?,
            ToolbarAction::Hide => host.hide_current_invocation(),
        }
        Ok(())
    }

    /// A conflict has already been reported as a warning, so it is not a
    /// failure of the click.
    fn start_session_from_toolbar(self: &Rc<Self>, kind: EditKind) -> SurfaceResult<()> {
        match self.start_session(kind) {
            Ok(_) | Err(SurfaceError::Session(SessionError::Conflict { .. })) => Ok(()),
            Err(err) => Err(err),
        }
    }

    fn start_session(self: &Rc<Self>, kind: EditKind) -> SurfaceResult<SessionStart> {
        let image = self.image();
        let weak = Rc::downgrade(self);
        let signals: SessionSignalSink = Rc::new(move |id, signal| {
            if let Some(inner) = weak.upgrade() {
                inner.on_session_signal(id, signal);
            }
        });

        let result = self.sessions.start(
            kind,
            &image,
            self.deps.editors.as_ref(),
            self.deps.windows.as_ref(),
            signals,
        );
        if let Err(SessionError::Conflict { requested, active }) = &result {
            tracing::info!(?requested, ?active, "edit refused while another is open");
            self.deps
                .notifier
                .push(NotificationKind::Warning, self.conflict_message(*requested));
        }
        Ok(result?)
    }

    fn conflict_message(&self, requested: EditKind) -> &str {
        let messages = &self.config.conflict_messages;
        match requested.other() {
            EditKind::Adjustment => messages.filter_while_adjusting.as_str(),
            EditKind::Filter => messages.adjust_while_filtering.as_str(),
        }
    }

    fn on_session_signal(&self, id: SessionId, signal: SessionSignal) {
        tracing::debug!(id = id.get(), ?signal, "edit session signal");
        match signal {
            SessionSignal::Saved => {
                if let Some(image) = self.sessions.commit(id, self.now()) {
                    self.set_image(image);
                }
            }
            SessionSignal::Cancelled => self.sessions.cancel(id),
            SessionSignal::WindowClosed => {
                self.sessions.window_closed(id);
            }
        }
    }

    fn close(&self) {
        if self.closed.replace(true) {
            return;
        }
        self.hide_timer.borrow_mut().cancel();
        self.sessions.shutdown();
        if let Some(toolbar) = self.toolbar.get().filter(|toolbar| toolbar.is_rendered()) {
            self.lock.run(ToolbarOp::Detach, |op| self.apply(toolbar, op));
        }
        tracing::debug!("image surface closed");
    }
}
