use std::cell::{Cell, OnceCell, RefCell};
use std::rc::Rc;

use thiserror::Error;

use crate::host::{ImageView, OverlayNode, OverlayRenderer};

type ClickHandler = Rc<dyn Fn()>;

#[derive(Debug, Error)]
pub enum ToolbarError {
    #[error("cannot add item {label:?}: toolbar is already rendered")]
    AlreadyRendered { label: String },
    #[error("toolbar must be rendered before it is attached or detached")]
    NotRendered,
}

pub type ToolbarResult<T> = std::result::Result<T, ToolbarError>;

/// What the renderer needs to draw one button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolbarItemSpec {
    pub label: String,
    pub icon: String,
}

struct ToolbarItem {
    spec: ToolbarItemSpec,
    handler: RefCell<Option<ClickHandler>>,
}

/// Returned by [`ToolbarOverlay::add_item`]; used to register the click handler.
#[derive(Clone)]
pub struct ActionHandle {
    item: Rc<ToolbarItem>,
}

impl ActionHandle {
    pub fn label(&self) -> &str {
        &self.item.spec.label
    }

    /// Replaces any handler registered earlier.
    pub fn on_click(&self, handler: impl Fn() + 'static) {
        *self.item.handler.borrow_mut() = Some(Rc::new(handler));
    }
}

/// Event channel from the rendered toolbar back to its owner. Pointer events
/// are forwarded untouched: the owning surface decides visibility.
#[derive(Clone)]
pub struct ToolbarSink {
    entered: Rc<dyn Fn()>,
    left: Rc<dyn Fn()>,
    clicked: Rc<dyn Fn(usize)>,
}

impl ToolbarSink {
    pub fn pointer_entered(&self) {
        (self.entered)();
    }

    pub fn pointer_left(&self) {
        (self.left)();
    }

    /// `index` is the position of the item in the slice given to the renderer.
    pub fn item_clicked(&self, index: usize) {
        (self.clicked)(index);
    }
}

#[derive(Default)]
pub struct ToolbarOverlay {
    items: Rc<RefCell<Vec<Rc<ToolbarItem>>>>,
    node: OnceCell<Rc<dyn OverlayNode>>,
    rendering: Cell<bool>,
    attached: Cell<bool>,
}

impl ToolbarOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_item(
        &self,
        label: impl Into<String>,
        icon: impl Into<String>,
    ) -> ToolbarResult<ActionHandle> {
        let label = label.into();
        if self.is_rendered() || self.rendering.get() {
            return Err(ToolbarError::AlreadyRendered { label });
        }
        let item = Rc::new(ToolbarItem {
            spec: ToolbarItemSpec {
                label,
                icon: icon.into(),
            },
            handler: RefCell::new(None),
        });
        self.items.borrow_mut().push(item.clone());
        Ok(ActionHandle { item })
    }

    pub fn len(&self) -> usize {
        self.items.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.borrow().is_empty()
    }

    pub fn labels(&self) -> Vec<String> {
        self.items
            .borrow()
            .iter()
            .map(|item| item.spec.label.clone())
            .collect()
    }

    /// Runs the handler of the item at `index`. Returns false when there is no
    /// such item or it has no handler.
    pub fn click(&self, index: usize) -> bool {
        dispatch_click(&self.items, index)
    }

    /// Builds the visual node on first call and returns the same node after.
    /// Returns `None` when called again while the renderer is still building
    /// the node; the outer call finishes the job.
    pub fn render(
        &self,
        renderer: &dyn OverlayRenderer,
        entered: Rc<dyn Fn()>,
        left: Rc<dyn Fn()>,
    ) -> Option<Rc<dyn OverlayNode>> {
        if let Some(node) = self.node.get() {
            return Some(node.clone());
        }
        if self.rendering.replace(true) {
            tracing::debug!("toolbar render requested while rendering; skipped");
            return None;
        }
        let specs: Vec<ToolbarItemSpec> = self
            .items
            .borrow()
            .iter()
            .map(|item| item.spec.clone())
            .collect();
        let items = Rc::downgrade(&self.items);
        let sink = ToolbarSink {
            entered,
            left,
            clicked: Rc::new(move |index| {
                if let Some(items) = items.upgrade() {
                    dispatch_click(&items, index);
                }
            }),
        };
        tracing::debug!(items = specs.len(), "rendering toolbar overlay");
        let node = renderer.render_toolbar(&specs, sink);
        self.rendering.set(false);
        Some(self.node.get_or_init(|| node).clone())
    }

    pub fn is_rendered(&self) -> bool {
        self.node.get().is_some()
    }

    pub fn is_attached(&self) -> bool {
        self.attached.get()
    }

    /// Inserts the node into the view. Returns false if it was already there.
    pub fn attach(&self, view: &dyn ImageView) -> ToolbarResult<bool> {
        let node = self.node.get().ok_or(ToolbarError::NotRendered)?;
        if self.attached.replace(true) {
            return Ok(false);
        }
        view.attach_overlay(node);
        Ok(true)
    }

    /// Removes the node from the view. Returns false if it was not there.
    pub fn detach(&self, view: &dyn ImageView) -> ToolbarResult<bool> {
        let node = self.node.get().ok_or(ToolbarError::NotRendered)?;
        if !self.attached.replace(false) {
            return Ok(false);
        }
        view.detach_overlay(node);
        Ok(true)
    }
}

fn dispatch_click(items: &RefCell<Vec<Rc<ToolbarItem>>>, index: usize) -> bool {
    let handler = items
        .borrow()
        .get(index)
        .and_then(|item| item.handler.borrow().clone());
    match handler {
        Some(handler) => {
            handler();
            true
        }
        None => false,
    }
}
