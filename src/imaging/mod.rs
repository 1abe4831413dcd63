//! Image processing in pure Rust, no system dependencies.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Decode** (JPEG, PNG, TIFF, WebP) | `image::ImageReader` |
//! | **Logo scaling** | `imageops::resize` (Lanczos3) |
//! | **Drop shadows** | `imageops::blur` on an alpha mask |
//! | **Text** | `ab_glyph` outlines of embedded DejaVu Sans |
//! | **Encode → PNG** | `image::codecs::png::PngEncoder` |
//!
//! The module is split into:
//! - **Fit**: text wrapping and shrink-to-fit search (unit testable without fonts)
//! - **Layers**: pure geometry, the ordered list of drawing passes
//! - **Canvas**: pixel drawing with a scoped transform
//! - **Compositor**: layers replayed onto a canvas
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]

pub mod backend;
pub mod canvas;
pub mod compositor;
pub mod fit;
pub mod font;
pub mod layers;
pub mod rust_backend;

pub use backend::{BackendError, Dimensions, ImageBackend};
pub use compositor::{CompositeError, Compositor};
pub use fit::{TextLayout, fit};
pub use layers::{Brand, Layer, plan_layers};
pub use rust_backend::RustBackend;
