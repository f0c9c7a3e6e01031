//! Boundaries to the toolkit, windowing system, editing canvases and host
//! application. The surface only talks to these traits.

use std::rc::Rc;

use thiserror::Error;

use crate::picture::{ImagePayload, ImageSource};
use crate::session::EditKind;
use crate::toolbar::{ToolbarItemSpec, ToolbarSink};

pub type Callback = Box<dyn Fn()>;

#[derive(Debug, Error)]
pub enum HostError {
    #[error("{capability} is not available on this host")]
    Unsupported { capability: &'static str },
    #[error("host failed to {operation}: {message}")]
    Failed {
        operation: &'static str,
        message: String,
    },
}

pub type HostResult<T> = std::result::Result<T, HostError>;

#[derive(Debug, Error)]
pub enum EditorError {
    #[error("editor canvas was never created")]
    CanvasMissing,
    #[error("editor failed: {message}")]
    Failed { message: String },
}

/// The generic image view the surface draws into.
pub trait ImageView {
    fn set_image(&self, image: &ImageSource);
    fn on_pointer_enter(&self, callback: Callback);
    fn on_pointer_leave(&self, callback: Callback);
    fn attach_overlay(&self, node: &Rc<dyn OverlayNode>);
    fn detach_overlay(&self, node: &Rc<dyn OverlayNode>);
}

/// Handle to a rendered toolbar owned by the rendering toolkit.
pub trait OverlayNode {}

pub trait OverlayRenderer {
    /// Builds the visual toolbar. Pointer and click events on the result must
    /// be reported through `sink`.
    fn render_toolbar(&self, items: &[ToolbarItemSpec], sink: ToolbarSink) -> Rc<dyn OverlayNode>;
}

pub trait FloatingWindow {
    fn on_close(&self, callback: Callback);
    fn focus(&self);
    /// Closes the window. Implementations fire the `on_close` callback.
    fn remove(&self);
}

pub trait WindowSpawner {
    fn spawn_window(
        &self,
        title: &str,
        editor: Rc<dyn SubEditor>,
        width: u32,
        height: u32,
    ) -> Rc<dyn FloatingWindow>;
}

/// An adjustment or filter canvas hosted in its own window.
pub trait SubEditor {
    fn on_save(&self, callback: Callback);
    fn on_cancel(&self, callback: Callback);
    fn image_source(&self) -> ImageSource;
    fn set_image(&self, image: &ImageSource);
    fn remove_canvas(&self) -> Result<(), EditorError>;
}

pub trait SubEditorFactory {
    fn create(
        &self,
        kind: EditKind,
        source: &ImageSource,
    ) -> Result<Rc<dyn SubEditor>, EditorError>;
}

/// Application services reached from toolbar actions.
pub trait HostServices {
    fn clipboard_available(&self) -> bool;
    fn write_clipboard(&self, payload: &ImagePayload) -> HostResult<()>;
    fn save_as(&self, payload: &ImagePayload) -> HostResult<()>;
    fn open_window(&self, url: &str) -> HostResult<()>;
    fn send_to_canvas(&self, image: &ImageSource) -> HostResult<()>;
    fn hide_current_invocation(&self);
}
