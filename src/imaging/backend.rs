//! Image I/O backend trait and shared types.
//!
//! The [`ImageBackend`] trait covers the two places pixels cross the process
//! boundary: decoding an input file and writing a branded PNG. The production
//! implementation is [`RustBackend`](super::rust_backend::RustBackend); tests
//! use the recording [`MockBackend`](tests::MockBackend).

use image::{DynamicImage, RgbaImage};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to decode {}: {message}", path.display())]
    Decode { path: PathBuf, message: String },
    #[error("PNG encode failed: {0}")]
    Encode(String),
}

/// Pixel dimensions of a raster.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub fn of(image: &impl image::GenericImageView) -> Self {
        let (width, height) = image.dimensions();
        Self { width, height }
    }
}

/// Trait for image I/O backends.
///
/// `Sync` so a backend can be shared by the rayon decode pool.
pub trait ImageBackend: Sync {
    /// Decode any supported input file to a raster.
    fn decode(&self, path: &Path) -> Result<DynamicImage, BackendError>;

    /// Losslessly encode `image` as PNG at `path`.
    fn write_png(&self, image: &RgbaImage, path: &Path) -> Result<(), BackendError>;
}
