use std::io::Cursor;
use std::sync::Arc;

use image::{ImageFormat, RgbaImage};
use thiserror::Error;

/// Opaque reference to the image a surface displays.
///
/// Clones are cheap. A generated image either lives behind a URL served by the
/// host or has already been decoded into memory.
#[derive(Debug, Clone, PartialEq)]
pub enum ImageSource {
    Uri(Arc<str>),
    Pixels(Arc<RgbaImage>),
}

/// What the clipboard and save-as actions receive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImagePayload {
    Png(Vec<u8>),
    Uri(String),
}

#[derive(Debug, Error)]
pub enum PictureError {
    #[error("failed to encode {width}x{height} image as png: {source}")]
    Encode {
        width: u32,
        height: u32,
        #[source]
        source: image::ImageError,
    },
}

pub type PictureResult<T> = std::result::Result<T, PictureError>;

impl ImageSource {
    pub fn from_uri(uri: impl Into<String>) -> Self {
        Self::Uri(Arc::from(uri.into()))
    }

    pub fn from_pixels(pixels: RgbaImage) -> Self {
        Self::Pixels(Arc::new(pixels))
    }

    pub fn uri(&self) -> Option<&str> {
        match self {
            Self::Uri(uri) => Some(&**uri),
            Self::Pixels(_) => None,
        }
    }

    pub fn dimensions(&self) -> Option<(u32, u32)> {
        match self {
            Self::Uri(_) => None,
            Self::Pixels(pixels) => Some(pixels.dimensions()),
        }
    }

    pub fn payload(&self) -> PictureResult<ImagePayload> {
        match self {
            Self::Uri(uri) => Ok(ImagePayload::Uri(uri.to_string())),
            Self::Pixels(pixels) => encode_png(pixels).map(ImagePayload::Png),
        }
    }
}

fn encode_png(pixels: &RgbaImage) -> PictureResult<Vec<u8>> {
    let mut bytes = Vec::new();
    pixels
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .map_err(|source| PictureError::Encode {
            width: pixels.width(),
            height: pixels.height(),
            source,
        })?;
    Ok(bytes)
}
