mod actions;
mod overlay;

pub use actions::ToolbarAction;
pub use overlay::{
    ActionHandle, ToolbarError, ToolbarItemSpec, ToolbarOverlay, ToolbarResult, ToolbarSink,
};
