pub mod clock;
pub mod config;
pub mod error;
pub mod host;
pub mod logging;
pub mod notification;
pub mod picture;
pub mod session;
pub mod surface;
pub mod toolbar;
pub mod visibility;

#[cfg(test)]
mod testing;

pub use error::{SurfaceError, SurfaceResult};
pub use surface::{Collaborators, ImageSurface, PointerOrigin};
