//! Logo raster cache.
//!
//! The six logo variants are decoded once at startup and kept in memory.
//! Loading is best-effort: a variant whose file is missing or broken is left
//! out of the cache and reported, and only images that use that variant are
//! affected later (the compositor refuses them with `LogoNotReady`, batch
//! export skips them).

use crate::config::LogosConfig;
use crate::imaging::{BackendError, ImageBackend};
use crate::settings::LogoVariant;
use image::RgbaImage;
use log::{debug, warn};
use std::collections::HashMap;
use std::path::PathBuf;

#[derive(Debug, Default)]
pub struct LogoCache {
    rasters: HashMap<LogoVariant, RgbaImage>,
}

impl LogoCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, variant: LogoVariant, raster: RgbaImage) {
        self.rasters.insert(variant, raster);
    }

    /// Whether `variant` is decoded and ready to draw.
    pub fn has(&self, variant: LogoVariant) -> bool {
        self.rasters.contains_key(&variant)
    }

    pub fn get(&self, variant: LogoVariant) -> Option<&RgbaImage> {
        self.rasters.get(&variant)
    }

    pub fn len(&self) -> usize {
        self.rasters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rasters.is_empty()
    }

    /// Loaded variants in catalogue order.
    pub fn loaded(&self) -> Vec<LogoVariant> {
        LogoVariant::ALL
            .into_iter()
            .filter(|v| self.has(*v))
            .collect()
    }
}

/// A variant that could not be loaded.
#[derive(Debug)]
pub struct LogoLoadFailure {
    pub variant: LogoVariant,
    pub path: PathBuf,
    pub error: BackendError,
}

/// Result of [`load_logos`].
#[derive(Debug, Default)]
pub struct LogoLoad {
    pub cache: LogoCache,
    pub failures: Vec<LogoLoadFailure>,
}

/// Decode every configured variant; failures are collected, not fatal.
pub fn load_logos<B: ImageBackend + ?Sized>(config: &LogosConfig, backend: &B) -> LogoLoad {
    let mut load = LogoLoad::default();
    for variant in LogoVariant::ALL {
        let path = config.path(variant);
        match backend.decode(&path) {
            Ok(raster) => {
                debug!("loaded logo {} from {}", variant, path.display());
                load.cache.insert(variant, raster.to_rgba8());
            }
            Err(error) => {
                warn!("logo {} unavailable: {}", variant, error);
                load.failures.push(LogoLoadFailure {
                    variant,
                    path,
                    error,
                });
            }
        }
    }
    load
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::backend::tests::MockBackend;
    use crate::imaging::RustBackend;
    use crate::test_helpers::{disc_logo, write_png};
    use image::DynamicImage;
    use tempfile::TempDir;

    #[test]
    fn empty_cache_has_nothing() {
        let cache = LogoCache::new();
        assert!(cache.is_empty());
        assert!(!cache.has(LogoVariant::GearBlue));
        assert!(cache.get(LogoVariant::GearBlue).is_none());
    }

    #[test]
    fn insert_makes_variant_ready() {
        let mut cache = LogoCache::new();
        cache.insert(LogoVariant::White, disc_logo(8));
        assert!(cache.has(LogoVariant::White));
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get(LogoVariant::White).map(|r| r.width()), Some(8));
        assert_eq!(cache.loaded(), vec![LogoVariant::White]);
    }

    #[test]
    fn partial_load_reports_missing_variants() {
        let config = LogosConfig::default();
        let backend = MockBackend::new()
            .with_raster(
                "thw-gear-blue.png",
                DynamicImage::ImageRgba8(disc_logo(10)),
            )
            .with_raster(
                "THW_Logo_OV-Wesel_2025_RGB_weiss_1000px_v1.0.png",
                DynamicImage::ImageRgba8(disc_logo(20)),
            );

        let load = load_logos(&config, &backend);
        assert_eq!(
            load.cache.loaded(),
            vec![LogoVariant::White, LogoVariant::GearBlue]
        );
        let failed: Vec<_> = load.failures.iter().map(|f| f.variant).collect();
        assert_eq!(
            failed,
            vec![
                LogoVariant::Blue,
                LogoVariant::Black,
                LogoVariant::GearWhite,
                LogoVariant::GearBlack
            ]
        );
        assert_eq!(backend.get_operations().len(), 6);
    }

    #[test]
    fn loads_from_directory_on_disk() {
        let tmp = TempDir::new().unwrap();
        let config = LogosConfig {
            directory: tmp.path().to_path_buf(),
            ..LogosConfig::default()
        };
        write_png(&config.path(LogoVariant::GearBlack), &disc_logo(16));

        let load = load_logos(&config, &RustBackend::new());
        assert!(load.cache.has(LogoVariant::GearBlack));
        assert_eq!(load.failures.len(), 5);
        assert!(
            load.failures
                .iter()
                .all(|f| matches!(f.error, BackendError::Io(_)))
        );
    }
}
