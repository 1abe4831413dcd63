//! Writing branded images to disk.
//!
//! Batch export is strictly sequential: each image is composited, encoded and
//! written before the next one starts, and files appear in session order.
//! After every written file the exporter pauses for the configured interval
//! before moving on. Images whose logo is not loaded are skipped and the batch
//! continues.
//!
//! Progress is reported as [`ExportEvent`]s over an optional channel so the
//! CLI can print while the export runs:
//!
//! ```text
//! Exporting 3 images → branded/
//!     001 einsatz.png (6000x4000)
//!     002 pumpe.png: skipped, logo white not loaded
//!     003 nacht.png (4000x6000)
//! Exported 2 images, skipped 1
//! ```

use crate::imaging::{BackendError, CompositeError, Compositor, ImageBackend};
use crate::logos::LogoCache;
use crate::naming::unique_name;
use crate::session::{ImageEntry, Session};
use crate::settings::LogoVariant;
use log::{debug, info};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Image write failed: {0}")]
    Backend(#[from] BackendError),
    #[error("Compositing failed: {0}")]
    Composite(#[from] CompositeError),
}

#[derive(Debug, Clone)]
pub struct ExportOptions {
    /// Output directory, created if missing.
    pub directory: PathBuf,
    /// Pause after each written file of a batch.
    pub pause: Duration,
}

impl ExportOptions {
    pub fn from_config(config: &crate::config::ExportConfig) -> Self {
        Self {
            directory: config.directory.clone(),
            pause: Duration::from_millis(config.pause_ms),
        }
    }
}

/// Progress of a batch export.
#[derive(Debug, Clone, PartialEq)]
pub enum ExportEvent {
    Started {
        total: usize,
        directory: PathBuf,
    },
    /// `index` is 1-based position in the session.
    Exported {
        index: usize,
        path: PathBuf,
        width: u32,
        height: u32,
    },
    Skipped {
        index: usize,
        name: String,
        logo: LogoVariant,
    },
    Finished {
        exported: usize,
        skipped: usize,
    },
}

/// What a batch export did.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ExportSummary {
    /// Written files in session order.
    pub written: Vec<PathBuf>,
    /// Display names of images skipped for a missing logo.
    pub skipped: Vec<String>,
}

/// Export every image in session order.
///
/// Stops at the first I/O or encode failure; everything written before it
/// stays on disk.
pub fn export_all<B: ImageBackend + ?Sized>(
    backend: &B,
    session: &Session,
    compositor: &Compositor,
    logos: &LogoCache,
    options: &ExportOptions,
    progress: Option<Sender<ExportEvent>>,
) -> Result<ExportSummary, ExportError> {
    let emit = |event: ExportEvent| {
        if let Some(tx) = &progress {
            tx.send(event).ok();
        }
    };

    std::fs::create_dir_all(&options.directory)?;
    emit(ExportEvent::Started {
        total: session.len(),
        directory: options.directory.clone(),
    });

    let mut summary = ExportSummary::default();
    let mut used_names = HashSet::new();
    for (i, image) in session.images().iter().enumerate() {
        let index = i + 1;
        let logo = image.settings.logo;
        if !logos.has(logo) {
            info!("skipping {}: logo {} not loaded", image.name, logo);
            summary.skipped.push(image.name.clone());
            emit(ExportEvent::Skipped {
                index,
                name: image.name.clone(),
                logo,
            });
            continue;
        }

        let name = unique_name(&image.name, &mut used_names);
        let path = options.directory.join(&name);
        let (width, height) = write_one(backend, image, compositor, logos, &path)?;
        emit(ExportEvent::Exported {
            index,
            path: path.clone(),
            width,
            height,
        });
        summary.written.push(path);

        if !options.pause.is_zero() {
            std::thread::sleep(options.pause);
        }
    }

    emit(ExportEvent::Finished {
        exported: summary.written.len(),
        skipped: summary.skipped.len(),
    });
    Ok(summary)
}

/// Export only the selected image.
///
/// Returns `Ok(None)` without writing when nothing is selected or the
/// selected image's logo is not loaded.
pub fn export_selected<B: ImageBackend + ?Sized>(
    backend: &B,
    session: &Session,
    compositor: &Compositor,
    logos: &LogoCache,
    directory: &Path,
) -> Result<Option<PathBuf>, ExportError> {
    let Some(image) = session.selected() else {
        return Ok(None);
    };
    if !logos.has(image.settings.logo) {
        return Ok(None);
    }
    std::fs::create_dir_all(directory)?;
    let path = directory.join(&image.name);
    write_one(backend, image, compositor, logos, &path)?;
    Ok(Some(path))
}

fn write_one<B: ImageBackend + ?Sized>(
    backend: &B,
    image: &ImageEntry,
    compositor: &Compositor,
    logos: &LogoCache,
    path: &Path,
) -> Result<(u32, u32), ExportError> {
    let branded = compositor.composite_cached(image.source(), logos, &image.settings)?;
    backend.write_png(&branded, path)?;
    debug!("wrote {}", path.display());
    Ok(branded.dimensions())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::Brand;
    use crate::imaging::backend::tests::{MockBackend, RecordedOp};
    use crate::settings::{Settings, SettingsEdit};
    use crate::test_helpers::{disc_logo, gradient_photo};
    use std::sync::mpsc;
    use tempfile::TempDir;

    fn compositor() -> Compositor {
        Compositor::new(Brand::default()).unwrap()
    }

    fn logos(variants: &[LogoVariant]) -> LogoCache {
        let mut cache = LogoCache::new();
        for v in variants {
            cache.insert(*v, disc_logo(16));
        }
        cache
    }

    fn options(dir: &Path) -> ExportOptions {
        ExportOptions {
            directory: dir.to_path_buf(),
            pause: Duration::ZERO,
        }
    }

    fn session(names: &[&str]) -> Session {
        let mut session = Session::new(Settings::default());
        for (i, name) in names.iter().enumerate() {
            session.add(PathBuf::from(name), gradient_photo(40 + i as u32, 30));
        }
        session
    }

    #[test]
    fn exports_in_session_order() {
        let tmp = TempDir::new().unwrap();
        let backend = MockBackend::new();
        let session = session(&["b.jpg", "a.jpg", "c.tif"]);

        let summary = export_all(
            &backend,
            &session,
            &compositor(),
            &logos(&[LogoVariant::GearBlue]),
            &options(tmp.path()),
            None,
        )
        .unwrap();

        let expected: Vec<PathBuf> = ["b.png", "a.png", "c.png"]
            .iter()
            .map(|n| tmp.path().join(n))
            .collect();
        assert_eq!(summary.written, expected);
        assert!(summary.skipped.is_empty());
        assert_eq!(
            backend.get_operations()[1],
            RecordedOp::WritePng {
                path: tmp.path().join("a.png").to_string_lossy().into_owned(),
                width: 41,
                height: 30,
            }
        );
    }

    #[test]
    fn missing_logo_skips_and_continues() {
        let tmp = TempDir::new().unwrap();
        let backend = MockBackend::new();
        let mut session = session(&["one.jpg", "two.jpg", "three.jpg"]);
        let second = session.images()[1].id;
        session.select(second).unwrap();
        session.edit(SettingsEdit::Logo(LogoVariant::White));

        let (tx, rx) = mpsc::channel();
        let summary = export_all(
            &backend,
            &session,
            &compositor(),
            &logos(&[LogoVariant::GearBlue]),
            &options(tmp.path()),
            Some(tx),
        )
        .unwrap();

        assert_eq!(summary.skipped, vec!["two.png"]);
        assert_eq!(
            backend.written_paths(),
            vec![
                tmp.path().join("one.png").to_string_lossy().into_owned(),
                tmp.path().join("three.png").to_string_lossy().into_owned(),
            ]
        );

        let events: Vec<ExportEvent> = rx.iter().collect();
        assert_eq!(events.len(), 5);
        assert!(matches!(events[0], ExportEvent::Started { total: 3, .. }));
        assert!(matches!(events[1], ExportEvent::Exported { index: 1, .. }));
        assert_eq!(
            events[2],
            ExportEvent::Skipped {
                index: 2,
                name: "two.png".into(),
                logo: LogoVariant::White,
            }
        );
        assert!(matches!(events[3], ExportEvent::Exported { index: 3, .. }));
        assert_eq!(
            events[4],
            ExportEvent::Finished {
                exported: 2,
                skipped: 1
            }
        );
    }

    #[test]
    fn duplicate_names_do_not_overwrite() {
        let tmp = TempDir::new().unwrap();
        let backend = MockBackend::new();
        let session = session(&["/a/IMG_1.jpg", "/b/IMG_1.jpg"]);

        let summary = export_all(
            &backend,
            &session,
            &compositor(),
            &logos(&[LogoVariant::GearBlue]),
            &options(tmp.path()),
            None,
        )
        .unwrap();

        assert_eq!(
            summary.written,
            vec![tmp.path().join("IMG_1.png"), tmp.path().join("IMG_1-2.png")]
        );
    }

    #[test]
    fn pause_runs_between_files() {
        let tmp = TempDir::new().unwrap();
        let backend = MockBackend::new();
        let session = session(&["a.jpg", "b.jpg"]);
        let opts = ExportOptions {
            directory: tmp.path().to_path_buf(),
            pause: Duration::from_millis(30),
        };

        let start = std::time::Instant::now();
        export_all(
            &backend,
            &session,
            &compositor(),
            &logos(&[LogoVariant::GearBlue]),
            &opts,
            None,
        )
        .unwrap();
        assert!(start.elapsed() >= Duration::from_millis(60));
    }

    #[test]
    fn export_selected_writes_only_selection() {
        let tmp = TempDir::new().unwrap();
        let backend = MockBackend::new();
        let mut session = session(&["a.jpg", "b.jpg"]);
        let b = session.images()[1].id;
        session.select(b).unwrap();

        let path = export_selected(
            &backend,
            &session,
            &compositor(),
            &logos(&[LogoVariant::GearBlue]),
            tmp.path(),
        )
        .unwrap();
        assert_eq!(path, Some(tmp.path().join("b.png")));
        assert_eq!(backend.written_paths().len(), 1);
    }

    #[test]
    fn export_selected_without_selection_or_logo_is_noop() {
        let tmp = TempDir::new().unwrap();
        let backend = MockBackend::new();
        let mut session = session(&["a.jpg"]);

        let none = export_selected(
            &backend,
            &session,
            &compositor(),
            &logos(&[LogoVariant::GearBlue]),
            tmp.path(),
        )
        .unwrap();
        assert_eq!(none, None);

        let id = session.images()[0].id;
        session.select(id).unwrap();
        let none = export_selected(&backend, &session, &compositor(), &logos(&[]), tmp.path())
            .unwrap();
        assert_eq!(none, None);
        assert!(backend.get_operations().is_empty());
    }

    #[test]
    fn written_files_decode_with_source_dimensions() {
        use crate::imaging::RustBackend;
        let tmp = TempDir::new().unwrap();
        let backend = RustBackend::new();
        let session = session(&["einsatz.jpg"]);

        let summary = export_all(
            &backend,
            &session,
            &compositor(),
            &logos(&[LogoVariant::GearBlue]),
            &options(tmp.path()),
            None,
        )
        .unwrap();

        let decoded = image::open(&summary.written[0]).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (40, 30));
    }
}
