//! Photo intake: files and folders in, decoded rasters out.
//!
//! Inputs may be individual files or directories. Directories are walked
//! recursively in file-name order; only files with a supported image
//! extension are considered. Candidates are decoded in parallel on the rayon
//! pool, and the results keep candidate order, so a session fills up in the
//! same order the files were listed no matter which decode finished first.
//!
//! A file that fails to decode is skipped and reported; it never aborts the
//! rest of the batch.
//!
//! ```text
//! brand shoot/ extra.jpg
//!   shoot/010-arrival.jpg   → decoded
//!   shoot/020-pump.JPG      → decoded
//!   shoot/notes.txt         → ignored (extension)
//!   shoot/sub/broken.jpg    → skipped (decode error)
//!   extra.jpg               → decoded
//! ```

use crate::imaging::rust_backend::is_supported_input;
use crate::imaging::{Dimensions, ImageBackend, RustBackend};
use crate::session::{ImageId, Session};
use image::DynamicImage;
use log::{debug, warn};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum IngestError {
    #[error("Input not found: {}", .0.display())]
    NotFound(PathBuf),
}

/// A successfully decoded photo.
#[derive(Debug)]
pub struct Decoded {
    pub path: PathBuf,
    pub image: DynamicImage,
}

impl Decoded {
    pub fn dimensions(&self) -> Dimensions {
        Dimensions::of(&self.image)
    }
}

/// A candidate that could not be decoded.
#[derive(Debug, Clone, PartialEq)]
pub struct Skipped {
    pub path: PathBuf,
    pub reason: String,
}

/// Outcome of decoding a list of candidates, both lists in candidate order.
#[derive(Debug, Default)]
pub struct IngestReport {
    pub decoded: Vec<Decoded>,
    pub skipped: Vec<Skipped>,
}

/// Outcome of adding photos to a session.
#[derive(Debug, Default)]
pub struct IngestSummary {
    pub added: Vec<ImageId>,
    pub skipped: Vec<Skipped>,
}

/// Expand files and folders into the ordered list of image candidates.
///
/// Explicit files are kept in argument order; each directory contributes its
/// images sorted by path. Files with unsupported extensions are dropped
/// silently, a missing input is an error.
pub fn collect_candidates(inputs: &[PathBuf]) -> Result<Vec<PathBuf>, IngestError> {
    let mut candidates = Vec::new();
    for input in inputs {
        if input.is_dir() {
            collect_dir(input, &mut candidates);
        } else if input.is_file() {
            if is_supported_input(input) {
                candidates.push(input.clone());
            } else {
                debug!("ignoring {} (unsupported extension)", input.display());
            }
        } else {
            return Err(IngestError::NotFound(input.clone()));
        }
    }
    Ok(candidates)
}

/// Unreadable entries and symlink loops are logged and passed over; the
/// rest of the tree is still collected.
fn collect_dir(dir: &Path, candidates: &mut Vec<PathBuf>) {
    for entry in WalkDir::new(dir).follow_links(true).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("skipping part of {}: {}", dir.display(), e);
                continue;
            }
        };
        if entry.file_type().is_file() && is_supported_input(entry.path()) {
            candidates.push(entry.into_path());
        }
    }
}

/// Decode every candidate in parallel, preserving order.
pub fn decode_all<B: ImageBackend + ?Sized>(backend: &B, candidates: Vec<PathBuf>) -> IngestReport {
    let results: Vec<_> = candidates
        .into_par_iter()
        .map(|path| {
            let result = backend.decode(&path);
            (path, result)
        })
        .collect();

    let mut report = IngestReport::default();
    for (path, result) in results {
        match result {
            Ok(image) => report.decoded.push(Decoded { path, image }),
            Err(e) => {
                warn!("skipping {}: {}", path.display(), e);
                report.skipped.push(Skipped {
                    path,
                    reason: e.to_string(),
                });
            }
        }
    }
    report
}

/// Collect and decode `inputs` with the default backend.
pub fn scan_inputs(inputs: &[PathBuf]) -> Result<IngestReport, IngestError> {
    scan_inputs_with_backend(&RustBackend::new(), inputs)
}

pub fn scan_inputs_with_backend<B: ImageBackend + ?Sized>(
    backend: &B,
    inputs: &[PathBuf],
) -> Result<IngestReport, IngestError> {
    let candidates = collect_candidates(inputs)?;
    debug!("decoding {} candidate files", candidates.len());
    Ok(decode_all(backend, candidates))
}

/// Collect, decode and add `inputs` to `session` with the default backend.
pub fn ingest(session: &mut Session, inputs: &[PathBuf]) -> Result<IngestSummary, IngestError> {
    ingest_with_backend(&RustBackend::new(), session, inputs)
}

/// Ingest using a specific backend (allows testing with mock).
pub fn ingest_with_backend<B: ImageBackend + ?Sized>(
    backend: &B,
    session: &mut Session,
    inputs: &[PathBuf],
) -> Result<IngestSummary, IngestError> {
    let report = scan_inputs_with_backend(backend, inputs)?;
    let added = report
        .decoded
        .into_iter()
        .map(|d| session.add(d.path, d.image))
        .collect();
    Ok(IngestSummary {
        added,
        skipped: report.skipped,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::backend::tests::MockBackend;
    use crate::settings::Settings;
    use crate::test_helpers::{gradient_photo, write_jpeg};
    use std::fs;
    use tempfile::TempDir;

    fn touch(path: &Path) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, b"x").unwrap();
    }

    fn names(paths: &[PathBuf]) -> Vec<String> {
        paths
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn folder_walk_is_recursive_sorted_and_filtered() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("shoot");
        touch(&root.join("020-pump.JPG"));
        touch(&root.join("010-arrival.jpg"));
        touch(&root.join("notes.txt"));
        touch(&root.join("sub/030-night.png"));
        touch(&root.join("sub/raw.cr2"));

        let candidates = collect_candidates(&[root]).unwrap();
        assert_eq!(
            names(&candidates),
            vec!["010-arrival.jpg", "020-pump.JPG", "030-night.png"]
        );
    }

    #[cfg(unix)]
    #[test]
    fn walk_errors_do_not_abort_intake() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("shoot");
        touch(&root.join("010-arrival.jpg"));
        touch(&root.join("sub/020-pump.jpg"));
        // Links back to an ancestor: the walk reports a loop here.
        std::os::unix::fs::symlink(&root, root.join("sub/loop")).unwrap();
        touch(&root.join("zzz/030-night.jpg"));

        let candidates = collect_candidates(&[root]).unwrap();
        assert_eq!(
            names(&candidates),
            vec!["010-arrival.jpg", "020-pump.jpg", "030-night.jpg"]
        );
    }

    #[test]
    fn explicit_files_keep_argument_order() {
        let tmp = TempDir::new().unwrap();
        let b = tmp.path().join("b.jpg");
        let a = tmp.path().join("a.webp");
        let txt = tmp.path().join("c.txt");
        for p in [&a, &b, &txt] {
            touch(p);
        }

        let candidates = collect_candidates(&[b.clone(), txt, a.clone()]).unwrap();
        assert_eq!(candidates, vec![b, a]);
    }

    #[test]
    fn missing_input_is_error() {
        let tmp = TempDir::new().unwrap();
        let result = collect_candidates(&[tmp.path().join("nope")]);
        assert!(matches!(result, Err(IngestError::NotFound(_))));
    }

    #[test]
    fn decode_failures_are_skipped_in_order() {
        let backend = MockBackend::new()
            .with_raster("a.jpg", gradient_photo(10, 8))
            .with_raster("c.jpg", gradient_photo(6, 4));
        let candidates = ["a.jpg", "b.jpg", "c.jpg", "d.jpg"]
            .map(|n| PathBuf::from("/in").join(n))
            .to_vec();

        let report = decode_all(&backend, candidates);
        let decoded: Vec<_> = report.decoded.iter().map(|d| d.path.clone()).collect();
        assert_eq!(
            decoded,
            vec![PathBuf::from("/in/a.jpg"), PathBuf::from("/in/c.jpg")]
        );
        assert_eq!(
            report.decoded[0].dimensions(),
            Dimensions {
                width: 10,
                height: 8
            }
        );
        let skipped: Vec<_> = report.skipped.iter().map(|s| s.path.clone()).collect();
        assert_eq!(
            skipped,
            vec![PathBuf::from("/in/b.jpg"), PathBuf::from("/in/d.jpg")]
        );
        assert!(report.skipped[0].reason.contains("b.jpg"));
    }

    #[test]
    fn decode_order_survives_many_files() {
        let mut backend = MockBackend::new();
        let mut candidates = Vec::new();
        for i in 0..40 {
            let name = format!("{i:03}.jpg");
            backend = backend.with_raster(&name, gradient_photo(i + 1, 1));
            candidates.push(PathBuf::from(&name));
        }
        let report = decode_all(&backend, candidates.clone());
        let decoded: Vec<_> = report.decoded.into_iter().map(|d| d.path).collect();
        assert_eq!(decoded, candidates);
    }

    #[test]
    fn ingest_adds_to_session_with_template() {
        let tmp = TempDir::new().unwrap();
        let good = tmp.path().join("einsatz.jpg");
        let bad = tmp.path().join("kaputt.jpg");
        write_jpeg(&good, 32, 24);
        fs::write(&bad, b"not a jpeg").unwrap();

        let mut session = Session::new(Settings {
            photographer: "Max".into(),
            ..Settings::default()
        });
        let summary = ingest(&mut session, &[tmp.path().to_path_buf()]).unwrap();

        assert_eq!(summary.added.len(), 1);
        assert_eq!(summary.skipped.len(), 1);
        assert_eq!(summary.skipped[0].path, bad);

        let img = session.get(summary.added[0]).unwrap();
        assert_eq!(img.name, "einsatz.png");
        assert_eq!(img.settings.photographer, "Max");
        assert_eq!(Dimensions::of(img.source()), Dimensions { width: 32, height: 24 });
    }
}
