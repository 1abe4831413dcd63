//! # Photo Branding
//!
//! Brands photographs with an organization's identity: a colored caption bar
//! with auto-fitted text, a corner logo, an optional unit label under emblem
//! logos, and a photo credit running up the left edge. Output is one lossless
//! PNG per input, at the input's pixel size.
//!
//! # Architecture
//!
//! ```text
//! inputs  →  ingest   →  Session  →  export  →  branded/*.png
//!            (decode,     (per-image   (composite,
//!             parallel)    settings)    sequential)
//! ```
//!
//! The compositor at the center is a pure function from (source, logo,
//! settings) to an output raster. Everything around it is bookkeeping: which
//! settings apply to which image, which logos are loaded, where files go.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`imaging`] | Text fitting, layer geometry, canvas drawing, the compositor, image I/O |
//! | [`settings`] | Per-image settings record, logo variants, corner positions, two-tier resolver |
//! | [`session`] | The working set of images with template, selection and bulk apply |
//! | [`logos`] | Logo raster cache with best-effort loading |
//! | [`ingest`] | File and folder intake with parallel, order-preserving decode |
//! | [`export`] | Sequential batch and single-image PNG export with progress events |
//! | [`naming`] | Output file names derived from input names |
//! | [`config`] | `branding.toml` loading, validation, and stock config generation |
//! | [`logging`] | `env_logger` setup behind the `log` facade |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Layers as Data
//!
//! Geometry is planned first as a list of [`imaging::Layer`] values and only
//! then drawn. The draw order (bar, logo, sub-label, credit) is the order of
//! that list, so it is visible in one place and testable without pixels.
//!
//! ## Best-Effort Text
//!
//! Caption text shrinks in 10% steps until it fits its box or reaches 10px.
//! Text that still does not fit is drawn anyway and logged; a long caption
//! never blocks an export.
//!
//! ## Embedded Fonts
//!
//! DejaVu Sans (regular and bold) is compiled into the binary, so output is
//! identical on every machine regardless of installed fonts.

pub mod config;
pub mod export;
pub mod imaging;
pub mod ingest;
pub mod logging;
pub mod logos;
pub mod naming;
pub mod output;
pub mod session;
pub mod settings;

#[cfg(test)]
pub(crate) mod test_helpers;
