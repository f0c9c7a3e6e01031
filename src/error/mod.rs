use thiserror::Error;

use crate::host::HostError;
use crate::picture::PictureError;
use crate::session::SessionError;

pub type SurfaceResult<T> = std::result::Result<T, SurfaceError>;

#[derive(Debug, Error)]
pub enum SurfaceError {
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Host(#[from] HostError),
    #[error(transparent)]
    Picture(#[from] PictureError),
    #[error("image has no address to open in a new window")]
    NoImageAddress,
}
