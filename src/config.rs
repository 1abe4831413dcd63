//! Branding configuration module.
//!
//! Handles loading, validating, and merging `branding.toml`. Stock defaults
//! are serialized to a TOML value, the user's file is merged over them key by
//! key, and the result is deserialized and validated. A missing file simply
//! yields the stock defaults.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [template]                 # Settings every new image starts with
//! logo = "gear-blue"         # blue | white | black | gear-blue | gear-white | gear-black
//! position = "top-right"     # top-left | top-right | bottom-left | bottom-right
//! photographer = ""
//! show_caption_bar = false
//! caption_bar_text = ""
//! sub_logo_label = ""
//!
//! [branding]
//! organization = "THW"       # Credit prefix: "Foto: THW / <name>"
//! primary_color = "#003399"  # Caption bar and sub-label color
//!
//! [logos]
//! directory = "logos"
//! gear_blue = "thw-gear-blue.png"   # ...one file name per variant
//!
//! [export]
//! directory = "branded"
//! pause_ms = 100             # Pause between files in a batch export
//! extension = "png"          # Output is always lossless PNG
//!
//! [processing]
//! max_processes = 4          # Max parallel decode workers (omit for auto)
//!
//! [logging]
//! filter = "info"            # env_logger filter (omit to use RUST_LOG)
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::imaging::Brand;
use crate::settings::{LogoVariant, Settings};
use image::Rgba;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File name looked up in the working directory when no `--config` is given.
pub const CONFIG_FILE: &str = "branding.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("TOML serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Configuration loaded from `branding.toml`.
///
/// All fields have defaults; a user file only names what it overrides.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BrandConfig {
    /// Initial settings template for newly ingested images.
    pub template: Settings,
    pub branding: BrandingConfig,
    pub logos: LogosConfig,
    pub export: ExportConfig,
    pub processing: ProcessingConfig,
    pub logging: LoggingConfig,
}

impl BrandConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.branding.organization.trim().is_empty() {
            return Err(ConfigError::Validation(
                "branding.organization must not be empty".into(),
            ));
        }
        if parse_hex_color(&self.branding.primary_color).is_none() {
            return Err(ConfigError::Validation(format!(
                "branding.primary_color '{}' is not a #RGB or #RRGGBB color",
                self.branding.primary_color
            )));
        }
        if !self.export.extension.eq_ignore_ascii_case("png") {
            return Err(ConfigError::Validation(
                "export.extension must be \"png\" (output is lossless PNG)".into(),
            ));
        }
        if let Some(variant) = LogoVariant::ALL
            .into_iter()
            .find(|v| self.logos.file_name(*v).trim().is_empty())
        {
            return Err(ConfigError::Validation(format!(
                "logos.{} must name a file",
                variant.id().replace('-', "_")
            )));
        }
        if self.processing.max_processes == Some(0) {
            return Err(ConfigError::Validation(
                "processing.max_processes must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// Organization identity for the compositor.
    pub fn brand(&self) -> Result<Brand, ConfigError> {
        let primary = parse_hex_color(&self.branding.primary_color).ok_or_else(|| {
            ConfigError::Validation(format!(
                "branding.primary_color '{}' is not a #RGB or #RRGGBB color",
                self.branding.primary_color
            ))
        })?;
        Ok(Brand {
            organization: self.branding.organization.trim().to_string(),
            primary,
        })
    }
}

/// Organization identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BrandingConfig {
    pub organization: String,
    /// Hex color, `#RGB` or `#RRGGBB`.
    pub primary_color: String,
}

impl Default for BrandingConfig {
    fn default() -> Self {
        Self {
            organization: "THW".to_string(),
            primary_color: "#003399".to_string(),
        }
    }
}

/// Where the six logo rasters live.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LogosConfig {
    /// Directory the file names below are relative to.
    pub directory: PathBuf,
    pub blue: String,
    pub white: String,
    pub black: String,
    pub gear_blue: String,
    pub gear_white: String,
    pub gear_black: String,
}

impl Default for LogosConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("logos"),
            blue: "THW_Logo_OV-Wesel_2025_RGB_blau_1000px_v1.0.png".to_string(),
            white: "THW_Logo_OV-Wesel_2025_RGB_weiss_1000px_v1.0.png".to_string(),
            black: "THW_Logo_OV-Wesel_2025_RGB_schwarz_1000px_v1.0.png".to_string(),
            gear_blue: "thw-gear-blue.png".to_string(),
            gear_white: "thw-gear-white.png".to_string(),
            gear_black: "thw-gear-black.png".to_string(),
        }
    }
}

impl LogosConfig {
    pub fn file_name(&self, variant: LogoVariant) -> &str {
        match variant {
            LogoVariant::Blue => &self.blue,
            LogoVariant::White => &self.white,
            LogoVariant::Black => &self.black,
            LogoVariant::GearBlue => &self.gear_blue,
            LogoVariant::GearWhite => &self.gear_white,
            LogoVariant::GearBlack => &self.gear_black,
        }
    }

    pub fn path(&self, variant: LogoVariant) -> PathBuf {
        self.directory.join(self.file_name(variant))
    }
}

/// Export settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExportConfig {
    /// Output directory, created on demand.
    pub directory: PathBuf,
    /// Pause after each file of a batch export, in milliseconds.
    pub pause_ms: u64,
    /// Output file extension; only `png` is accepted.
    pub extension: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("branded"),
            pause_ms: 100,
            extension: "png".to_string(),
        }
    }
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel decode workers.
    /// When absent, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_processes: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config.max_processes.map(|n| n.min(cores)).unwrap_or(cores)
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// `env_logger` filter directive, e.g. `"info"` or `"photo_branding=debug"`.
    pub filter: Option<String>,
}

/// Parse `#RGB` or `#RRGGBB` into an opaque color.
pub fn parse_hex_color(s: &str) -> Option<Rgba<u8>> {
    let hex = s.trim().strip_prefix('#')?;
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let channel = |i: usize, len: usize| u8::from_str_radix(&hex[i * len..(i + 1) * len], 16).ok();
    match hex.len() {
        3 => {
            let expand = |i| channel(i, 1).map(|v| v * 17);
            Some(Rgba([expand(0)?, expand(1)?, expand(2)?, 255]))
        }
        6 => Some(Rgba([channel(0, 2)?, channel(1, 2)?, channel(2, 2)?, 255])),
        _ => None,
    }
}

/// Stock defaults as a TOML value, the base every user file merges over.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    Ok(toml::Value::try_from(BrandConfig::default())?)
}

/// Deep merge of two TOML values: tables merge key by key, anything else in
/// `overlay` replaces `base`.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load a config file as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
/// Returns `Err` if the file exists but contains invalid TOML.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<BrandConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: BrandConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from the given file, falling back to stock defaults when it
/// does not exist.
pub fn load_config(path: &Path) -> Result<BrandConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let overlay = load_raw_config(path)?;
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `branding.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Photo Branding Configuration
# ============================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Settings template: every newly added image starts with these values
# ---------------------------------------------------------------------------
[template]
# Logo raster: blue, white, black, gear-blue, gear-white, gear-black.
# Gear logos are drawn at 20% of the image width, full logos at 40%.
logo = "gear-blue"

# Corner the logo is anchored to: top-left, top-right, bottom-left, bottom-right.
position = "top-right"

# Photographer name for the rotated credit "Foto: <organization> / <name>".
# Leave empty for no credit.
photographer = ""

# Colored bar across the bottom 35% of the image.
show_caption_bar = false

# Text inside the caption bar. Use \n for explicit line breaks.
caption_bar_text = ""

# Single line under gear logos (e.g. the local unit's name).
sub_logo_label = ""

# ---------------------------------------------------------------------------
# Organization identity
# ---------------------------------------------------------------------------
[branding]
# Prefix of the photo credit.
organization = "THW"

# Caption bar fill and sub-label color (#RGB or #RRGGBB).
primary_color = "#003399"

# ---------------------------------------------------------------------------
# Logo rasters
# ---------------------------------------------------------------------------
[logos]
# Directory containing the logo files below.
directory = "logos"
blue = "THW_Logo_OV-Wesel_2025_RGB_blau_1000px_v1.0.png"
white = "THW_Logo_OV-Wesel_2025_RGB_weiss_1000px_v1.0.png"
black = "THW_Logo_OV-Wesel_2025_RGB_schwarz_1000px_v1.0.png"
gear_blue = "thw-gear-blue.png"
gear_white = "thw-gear-white.png"
gear_black = "thw-gear-black.png"

# ---------------------------------------------------------------------------
# Export
# ---------------------------------------------------------------------------
[export]
# Output directory, created if missing.
directory = "branded"

# Pause between files of a batch export, in milliseconds.
pause_ms = 100

# Output format. Only lossless PNG is supported.
extension = "png"

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum parallel decode workers.
# Omit or comment out to auto-detect (= number of CPU cores).
# max_processes = 4

# ---------------------------------------------------------------------------
# Logging
# ---------------------------------------------------------------------------
[logging]
# env_logger filter. Omit to use RUST_LOG, else "warn".
# filter = "info"
"##
}
