use clap::{Parser, Subcommand};
use photo_branding::config::{self, BrandConfig};
use photo_branding::export::{self, ExportOptions};
use photo_branding::imaging::{Compositor, RustBackend};
use photo_branding::logging::{self, LoggingOptions};
use photo_branding::session::Session;
use photo_branding::settings::{LogoVariant, Position, SettingsEdit};
use photo_branding::{ingest, logos, output};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "photo-branding")]
#[command(about = "Brand photos with logo, caption bar and photo credit")]
#[command(long_about = "\
Brand photos with logo, caption bar and photo credit

Each input photo is written as a PNG of the same size with up to four layers:

  caption bar   bottom 35% in the organization color, optional fitted text
  logo          corner-anchored, 20% (gear) or 40% (full logo) of the width
  sub-label     one line under gear logos
  credit        \"Foto: <organization> / <name>\" rotated up the left edge

Defaults come from branding.toml (see 'photo-branding gen-config'); flags
override the template for this run.")]
#[command(version)]
struct Cli {
    /// Config file [default: branding.toml, if present]
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log filter in env_logger syntax (overrides [logging] filter and RUST_LOG)
    #[arg(long, global = true)]
    log: Option<String>,

    #[command(subcommand)]
    command: Command,
}

/// Template overrides applied to every image of the run.
#[derive(clap::Args, Clone)]
struct BrandArgs {
    /// Photos or folders of photos (folders are searched recursively)
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Output directory [default: export.directory from config]
    #[arg(long)]
    out: Option<PathBuf>,

    /// Logo variant: blue, white, black, gear-blue, gear-white, gear-black
    #[arg(long)]
    logo: Option<LogoVariant>,

    /// Logo corner: top-left, top-right, bottom-left, bottom-right
    #[arg(long)]
    position: Option<Position>,

    /// Photographer name for the credit
    #[arg(long)]
    photographer: Option<String>,

    /// Caption bar text; "\n" starts a new line. Turns the bar on.
    #[arg(long)]
    caption: Option<String>,

    /// Text under gear logos
    #[arg(long)]
    sub_label: Option<String>,

    /// Hide the caption bar even if the config or --caption enables it
    #[arg(long)]
    no_caption_bar: bool,

    /// Pause between exported files, in milliseconds
    #[arg(long)]
    pause_ms: Option<u64>,
}

impl BrandArgs {
    fn edits(&self) -> Vec<SettingsEdit> {
        let mut edits = Vec::new();
        if let Some(logo) = self.logo {
            edits.push(SettingsEdit::Logo(logo));
        }
        if let Some(position) = self.position {
            edits.push(SettingsEdit::Position(position));
        }
        if let Some(name) = &self.photographer {
            edits.push(SettingsEdit::Photographer(name.clone()));
        }
        if let Some(caption) = &self.caption {
            edits.push(SettingsEdit::CaptionBarText(caption.replace("\\n", "\n")));
            edits.push(SettingsEdit::ShowCaptionBar(true));
        }
        if let Some(label) = &self.sub_label {
            edits.push(SettingsEdit::SubLogoLabel(label.clone()));
        }
        if self.no_caption_bar {
            edits.push(SettingsEdit::ShowCaptionBar(false));
        }
        edits
    }
}

#[derive(Subcommand)]
enum Command {
    /// Brand photos and export them as PNG
    Brand(BrandArgs),
    /// Decode inputs and report what would be branded
    Check {
        /// Photos or folders of photos
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print a stock branding.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if let Command::GenConfig = cli.command {
        print!("{}", config::stock_config_toml());
        return Ok(());
    }

    let config = load_config(cli.config.as_deref())?;
    logging::init_logging(LoggingOptions::from_sources(
        cli.log.as_deref(),
        &config.logging,
    ));
    init_thread_pool(&config.processing);

    match cli.command {
        Command::Brand(args) => brand(&config, &args)?,
        Command::Check { inputs, json } => {
            let report = ingest::scan_inputs(&inputs)?;
            if json {
                let manifest = output::check_manifest(&report);
                println!("{}", serde_json::to_string_pretty(&manifest)?);
            } else {
                output::print_check_report(&report);
            }
        }
        Command::GenConfig => {}
    }

    Ok(())
}

fn brand(config: &BrandConfig, args: &BrandArgs) -> Result<(), Box<dyn std::error::Error>> {
    let backend = RustBackend::new();
    let compositor = Compositor::new(config.brand()?)?;

    let logos = logos::load_logos(&config.logos, &backend);
    output::print_logo_load(&logos);

    let mut session = Session::new(config.template.clone());
    let summary = ingest::ingest_with_backend(&backend, &mut session, &args.inputs)?;
    println!("==> Loaded {} photos", summary.added.len());
    output::print_skipped(&summary.skipped);

    // Nothing is selected, so edits land on the template.
    for edit in args.edits() {
        session.edit(edit);
    }
    session.apply_to_all();

    let mut options = ExportOptions::from_config(&config.export);
    if let Some(out) = &args.out {
        options.directory = out.clone();
    }
    if let Some(ms) = args.pause_ms {
        options.pause = std::time::Duration::from_millis(ms);
    }

    let (tx, rx) = std::sync::mpsc::channel();
    let printer = std::thread::spawn(move || {
        for event in rx {
            for line in output::format_export_event(&event) {
                println!("{}", line);
            }
        }
    });
    let result = export::export_all(
        &backend,
        &session,
        &compositor,
        &logos.cache,
        &options,
        Some(tx),
    );
    printer
        .join()
        .map_err(|_| "progress printer thread panicked")?;
    result?;
    Ok(())
}

/// Load the config file. An explicit `--config` must exist; the default
/// `branding.toml` is optional.
fn load_config(explicit: Option<&Path>) -> Result<BrandConfig, Box<dyn std::error::Error>> {
    let path = match explicit {
        Some(path) if !path.exists() => {
            return Err(format!("config file not found: {}", path.display()).into());
        }
        Some(path) => path.to_path_buf(),
        None => PathBuf::from(config::CONFIG_FILE),
    };
    Ok(config::load_config(&path)?)
}

/// Initialize the rayon thread pool based on processing config.
///
/// Capped at the number of available CPU cores.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}
