//! Logger initialization.
//!
//! Diagnostics (skipped files, missing logos, overflowing captions) go through
//! the `log` facade to stderr via `env_logger`. User-facing progress is printed
//! by [`crate::output`] on stdout and is not affected by the filter.

use std::sync::Once;

/// `filter` follows the `env_logger` filter syntax (e.g. "info",
/// "photo_branding=debug").
#[derive(Debug, Clone)]
pub struct LoggingOptions {
    pub filter: Option<String>,
    pub write_style: env_logger::WriteStyle,
}

impl Default for LoggingOptions {
    fn default() -> Self {
        Self {
            filter: None,
            write_style: env_logger::WriteStyle::Auto,
        }
    }
}

impl LoggingOptions {
    /// First of `cli`, then the config file's `[logging] filter`.
    pub fn from_sources(cli: Option<&str>, config: &crate::config::LoggingConfig) -> Self {
        Self {
            filter: cli.map(str::to_string).or_else(|| config.filter.clone()),
            ..Self::default()
        }
    }
}

static INIT: Once = Once::new();

/// Initializes the global logger once; later calls are ignored.
///
/// Filter precedence: `options.filter`, then `RUST_LOG`, then `warn`.
pub fn init_logging(options: LoggingOptions) {
    INIT.call_once(|| {
        let mut builder = env_logger::Builder::new();

        if let Some(filter) = options.filter {
            builder.parse_filters(&filter);
        } else if let Ok(filter) = std::env::var("RUST_LOG") {
            builder.parse_filters(&filter);
        } else {
            builder.filter_level(log::LevelFilter::Warn);
        }

        builder.write_style(options.write_style);
        // A logger installed by an embedding program wins.
        builder.try_init().ok();

        log::debug!("logging initialized");
    });
}
