//! Recording fakes for the host traits, shared by the unit tests.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::host::{
    Callback, EditorError, FloatingWindow, HostError, HostResult, HostServices, ImageView,
    OverlayNode, OverlayRenderer, SubEditor, SubEditorFactory, WindowSpawner,
};
use crate::notification::{NotificationKind, Notifier};
use crate::picture::{ImagePayload, ImageSource};
use crate::session::EditKind;
use crate::toolbar::{ToolbarItemSpec, ToolbarSink};

fn fire(slot: &RefCell<Option<Rc<dyn Fn()>>>) {
    let callback = slot.borrow().clone();
    if let Some(callback) = callback {
        callback();
    }
}

#[derive(Default)]
pub(crate) struct FakeView {
    images: RefCell<Vec<ImageSource>>,
    overlay_attached: Cell<bool>,
    attach_calls: Cell<usize>,
    detach_calls: Cell<usize>,
    double_attaches: Cell<usize>,
    enter: RefCell<Option<Rc<dyn Fn()>>>,
    leave: RefCell<Option<Rc<dyn Fn()>>>,
    on_detach: RefCell<Option<Rc<dyn Fn()>>>,
}

impl FakeView {
    pub(crate) fn images(&self) -> Vec<ImageSource> {
        self.images.borrow().clone()
    }

    pub(crate) fn overlay_attached(&self) -> bool {
        self.overlay_attached.get()
    }

    pub(crate) fn attach_calls(&self) -> usize {
        self.attach_calls.get()
    }

    pub(crate) fn detach_calls(&self) -> usize {
        self.detach_calls.get()
    }

    pub(crate) fn double_attaches(&self) -> usize {
        self.double_attaches.get()
    }

    pub(crate) fn hover(&self) {
        fire(&self.enter);
    }

    pub(crate) fn unhover(&self) {
        fire(&self.leave);
    }

    /// Runs `hook` synchronously from inside the next detach, the way some
    /// toolkits re-emit pointer events while the tree changes.
    pub(crate) fn during_next_detach(&self, hook: impl Fn() + 'static) {
        *self.on_detach.borrow_mut() = Some(Rc::new(hook));
    }
}

impl ImageView for FakeView {
    fn set_image(&self, image: &ImageSource) {
        self.images.borrow_mut().push(image.clone());
    }

    fn on_pointer_enter(&self, callback: Callback) {
        *self.enter.borrow_mut() = Some(Rc::from(callback));
    }

    fn on_pointer_leave(&self, callback: Callback) {
        *self.leave.borrow_mut() = Some(Rc::from(callback));
    }

    fn attach_overlay(&self, _node: &Rc<dyn OverlayNode>) {
        self.attach_calls.set(self.attach_calls.get() + 1);
        if self.overlay_attached.replace(true) {
            self.double_attaches.set(self.double_attaches.get() + 1);
        }
    }

    fn detach_overlay(&self, _node: &Rc<dyn OverlayNode>) {
        self.detach_calls.set(self.detach_calls.get() + 1);
        self.overlay_attached.set(false);
        let hook = self.on_detach.borrow_mut().take();
        if let Some(hook) = hook {
            hook();
        }
    }
}

struct FakeNode;

impl OverlayNode for FakeNode {}

#[derive(Default)]
pub(crate) struct FakeRenderer {
    renders: Cell<usize>,
    items: RefCell<Vec<ToolbarItemSpec>>,
    sink: RefCell<Option<ToolbarSink>>,
    during_render: RefCell<Option<Rc<dyn Fn(&ToolbarSink)>>>,
}

impl FakeRenderer {
    /// Runs `hook` from inside every `render_toolbar` call, the way a toolkit
    /// may deliver pointer events while the widget is being realized.
    pub(crate) fn during_render(&self, hook: impl Fn(&ToolbarSink) + 'static) {
        *self.during_render.borrow_mut() = Some(Rc::new(hook));
    }

    pub(crate) fn render_count(&self) -> usize {
        self.renders.get()
    }

    pub(crate) fn labels(&self) -> Vec<String> {
        self.items
            .borrow()
            .iter()
            .map(|item| item.label.clone())
            .collect()
    }

    fn sink(&self) -> ToolbarSink {
        self.sink.borrow().clone().expect("toolbar was rendered")
    }

    /// Clicks the button with `label`. Returns false if no such button exists.
    pub(crate) fn click(&self, label: &str) -> bool {
        let index = self.items.borrow().iter().position(|item| item.label == label);
        match index {
            Some(index) => {
                self.sink().item_clicked(index);
                true
            }
            None => false,
        }
    }

    pub(crate) fn hover(&self) {
        self.sink().pointer_entered();
    }

    pub(crate) fn unhover(&self) {
        self.sink().pointer_left();
    }
}

impl OverlayRenderer for FakeRenderer {
    fn render_toolbar(
        &self,
        items: &[ToolbarItemSpec],
        sink: ToolbarSink,
    ) -> Rc<dyn OverlayNode> {
        self.renders.set(self.renders.get() + 1);
        *self.items.borrow_mut() = items.to_vec();
        *self.sink.borrow_mut() = Some(sink.clone());
        let hook = self.during_render.borrow().clone();
        if let Some(hook) = hook {
            hook(&sink);
        }
        Rc::new(FakeNode)
    }
}

pub(crate) struct FakeWindow {
    title: String,
    size: (u32, u32),
    focus_count: Cell<usize>,
    removed: Cell<bool>,
    on_close: RefCell<Option<Callback>>,
}

impl FakeWindow {
    pub(crate) fn title(&self) -> &str {
        &self.title
    }

    pub(crate) fn size(&self) -> (u32, u32) {
        self.size
    }

    pub(crate) fn focus_count(&self) -> usize {
        self.focus_count.get()
    }

    pub(crate) fn removed(&self) -> bool {
        self.removed.get()
    }

    /// Window-chrome close button.
    pub(crate) fn user_close(&self) {
        self.removed.set(true);
        let callback = self.on_close.borrow_mut().take();
        if let Some(callback) = callback {
            callback();
        }
    }
}

impl FloatingWindow for FakeWindow {
    fn on_close(&self, callback: Callback) {
        *self.on_close.borrow_mut() = Some(callback);
    }

    fn focus(&self) {
        self.focus_count.set(self.focus_count.get() + 1);
    }

    fn remove(&self) {
        self.user_close();
    }
}

#[derive(Default)]
pub(crate) struct FakeWindows {
    spawned: RefCell<Vec<Rc<FakeWindow>>>,
}

impl FakeWindows {
    pub(crate) fn count(&self) -> usize {
        self.spawned.borrow().len()
    }

    pub(crate) fn last(&self) -> Option<Rc<FakeWindow>> {
        self.spawned.borrow().last().cloned()
    }

    pub(crate) fn open_count(&self) -> usize {
        self.spawned
            .borrow()
            .iter()
            .filter(|window| !window.removed())
            .count()
    }
}

impl WindowSpawner for FakeWindows {
    fn spawn_window(
        &self,
        title: &str,
        _editor: Rc<dyn SubEditor>,
        width: u32,
        height: u32,
    ) -> Rc<dyn FloatingWindow> {
        let window = Rc::new(FakeWindow {
            title: title.to_string(),
            size: (width, height),
            focus_count: Cell::new(0),
            removed: Cell::new(false),
            on_close: RefCell::new(None),
        });
        self.spawned.borrow_mut().push(window.clone());
        window
    }
}

pub(crate) struct FakeEditor {
    kind: EditKind,
    current: RefCell<ImageSource>,
    pushed: RefCell<Vec<ImageSource>>,
    canvas_created: Cell<bool>,
    canvas_removals: Cell<usize>,
    on_save: RefCell<Option<Rc<dyn Fn()>>>,
    on_cancel: RefCell<Option<Rc<dyn Fn()>>>,
}

impl FakeEditor {
    pub(crate) fn kind(&self) -> EditKind {
        self.kind
    }

    pub(crate) fn current_image(&self) -> ImageSource {
        self.current.borrow().clone()
    }

    pub(crate) fn pushed_images(&self) -> Vec<ImageSource> {
        self.pushed.borrow().clone()
    }

    pub(crate) fn canvas_removals(&self) -> usize {
        self.canvas_removals.get()
    }

    pub(crate) fn set_result(&self, image: ImageSource) {
        *self.current.borrow_mut() = image;
    }

    /// Simulates an editor whose canvas never materialized.
    pub(crate) fn drop_canvas(&self) {
        self.canvas_created.set(false);
    }

    pub(crate) fn save_with(&self, image: ImageSource) {
        self.set_result(image);
        fire(&self.on_save);
    }

    pub(crate) fn cancel(&self) {
        fire(&self.on_cancel);
    }
}

impl SubEditor for FakeEditor {
    fn on_save(&self, callback: Callback) {
        *self.on_save.borrow_mut() = Some(Rc::from(callback));
    }

    fn on_cancel(&self, callback: Callback) {
        *self.on_cancel.borrow_mut() = Some(Rc::from(callback));
    }

    fn image_source(&self) -> ImageSource {
        self.current_image()
    }

    fn set_image(&self, image: &ImageSource) {
        self.pushed.borrow_mut().push(image.clone());
        *self.current.borrow_mut() = image.clone();
    }

    fn remove_canvas(&self) -> Result<(), EditorError> {
        self.canvas_removals.set(self.canvas_removals.get() + 1);
        if self.canvas_created.replace(false) {
            Ok(())
        } else {
            Err(EditorError::CanvasMissing)
        }
    }
}

#[derive(Default)]
pub(crate) struct FakeEditors {
    created: RefCell<Vec<Rc<FakeEditor>>>,
    fail_next: Cell<bool>,
}

impl FakeEditors {
    pub(crate) fn count(&self) -> usize {
        self.created.borrow().len()
    }

    pub(crate) fn last(&self) -> Option<Rc<FakeEditor>> {
        self.created.borrow().last().cloned()
    }

    pub(crate) fn fail_next(&self) {
        self.fail_next.set(true);
    }
}

impl SubEditorFactory for FakeEditors {
    fn create(
        &self,
        kind: EditKind,
        source: &ImageSource,
    ) -> Result<Rc<dyn SubEditor>, EditorError> {
        if self.fail_next.replace(false) {
            return Err(EditorError::Failed {
                message: "canvas backend unavailable".to_string(),
            });
        }
        let editor = Rc::new(FakeEditor {
            kind,
            current: RefCell::new(source.clone()),
            pushed: RefCell::new(Vec::new()),
            canvas_created: Cell::new(true),
            canvas_removals: Cell::new(0),
            on_save: RefCell::new(None),
            on_cancel: RefCell::new(None),
        });
        self.created.borrow_mut().push(editor.clone());
        Ok(editor as Rc<dyn SubEditor>)
    }
}

pub(crate) struct FakeHost {
    clipboard: bool,
    fail_with: RefCell<Option<&'static str>>,
    pub(crate) clipboard_writes: RefCell<Vec<ImagePayload>>,
    pub(crate) saved: RefCell<Vec<ImagePayload>>,
    pub(crate) opened: RefCell<Vec<String>>,
    pub(crate) sent_to_canvas: RefCell<Vec<ImageSource>>,
    pub(crate) hidden: Cell<usize>,
}

impl FakeHost {
    pub(crate) fn new(clipboard: bool) -> Self {
        Self {
            clipboard,
            fail_with: RefCell::new(None),
            clipboard_writes: RefCell::new(Vec::new()),
            saved: RefCell::new(Vec::new()),
            opened: RefCell::new(Vec::new()),
            sent_to_canvas: RefCell::new(Vec::new()),
            hidden: Cell::new(0),
        }
    }

    /// Makes the next host call fail with `message`.
    pub(crate) fn fail_next(&self, message: &'static str) {
        *self.fail_with.borrow_mut() = Some(message);
    }

    fn check(&self, operation: &'static str) -> HostResult<()> {
        match self.fail_with.borrow_mut().take() {
            Some(message) => Err(HostError::Failed {
                operation,
                message: message.to_string(),
            }),
            None => Ok(()),
        }
    }
}

impl HostServices for FakeHost {
    fn clipboard_available(&self) -> bool {
        self.clipboard
    }

    fn write_clipboard(&self, payload: &ImagePayload) -> HostResult<()> {
        if !self.clipboard {
            return Err(HostError::Unsupported {
                capability: "clipboard",
            });
        }
        self.check("write clipboard")?;
        self.clipboard_writes.borrow_mut().push(payload.clone());
        Ok(())
    }

    fn save_as(&self, payload: &ImagePayload) -> HostResult<()> {
        self.check("save image")?;
        self.saved.borrow_mut().push(payload.clone());
        Ok(())
    }

    fn open_window(&self, url: &str) -> HostResult<()> {
        self.check("open window")?;
        self.opened.borrow_mut().push(url.to_string());
        Ok(())
    }

    fn send_to_canvas(&self, image: &ImageSource) -> HostResult<()> {
        self.check("send to canvas")?;
        self.sent_to_canvas.borrow_mut().push(image.clone());
        Ok(())
    }

    fn hide_current_invocation(&self) {
        self.hidden.set(self.hidden.get() + 1);
    }
}

#[derive(Default)]
pub(crate) struct RecordingNotifier {
    pushed: RefCell<Vec<(NotificationKind, String)>>,
}

impl RecordingNotifier {
    pub(crate) fn pushed(&self) -> Vec<(NotificationKind, String)> {
        self.pushed.borrow().clone()
    }

    pub(crate) fn count(&self, kind: NotificationKind) -> usize {
        self.pushed
            .borrow()
            .iter()
            .filter(|(pushed, _)| *pushed == kind)
            .count()
    }
}

impl Notifier for RecordingNotifier {
    fn push(&self, kind: NotificationKind, message: &str) {
        self.pushed.borrow_mut().push((kind, message.to_string()));
    }
}
