//! snap - capture a photo through an external camera program and preview it.
//!
//! Provides both human-friendly and agent-friendly (robot mode) interfaces.
#![forbid(unsafe_code)]

use std::io::{self, IsTerminal};
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use tracing::debug;

use snap::capture::{self, CaptureSource};
use snap::cli::{self, Cli, Commands};
use snap::config::{self, LoadedSettings};
use snap::display::{DisplaySurface, FilePreviewSurface, MemorySurface};
use snap::error::{Result, SnapError};
use snap::loader::{DownsampleLoader, scale_factor};
use snap::logging;
use snap::media::{DecodedSummary, Dimensions, ImageCodec, ImageRef, StdCodec};
use snap::output::{
    CaptureSummary, ConfigReport, Output, OutputMode, PreviewReport, ProbeReport, ScaleReport,
    VersionInfo,
};
use snap::session::CameraSession;

/// Build information embedded at compile time.
mod build_info {
    pub const VERSION: &str = env!("CARGO_PKG_VERSION");

    pub fn git_sha() -> &'static str {
        option_env!("VERGEN_GIT_SHA").unwrap_or("unknown")
    }

    pub fn git_dirty() -> &'static str {
        option_env!("VERGEN_GIT_DIRTY").unwrap_or("false")
    }

    pub fn build_timestamp() -> &'static str {
        option_env!("VERGEN_BUILD_TIMESTAMP").unwrap_or("unknown")
    }

    pub fn rustc_semver() -> &'static str {
        option_env!("VERGEN_RUSTC_SEMVER").unwrap_or("unknown")
    }

    pub fn target() -> &'static str {
        option_env!("VERGEN_CARGO_TARGET_TRIPLE").unwrap_or("unknown")
    }
}

fn main() {
    let cli = Cli::parse();

    if cli.no_color || !io::stdout().is_terminal() {
        console::set_colors_enabled(false);
    }
    if cli.no_color || !io::stderr().is_terminal() {
        console::set_colors_enabled_stderr(false);
    }

    logging::init_logging(cli.use_json(), cli.verbose, cli.quiet);

    let out = OutputMode::from_cli(&cli).into_output();
    if let Err(e) = run(&cli, out.as_ref()) {
        out.error(&e);
        std::process::exit(1);
    }
}

fn run(cli: &Cli, out: &dyn Output) -> Result<()> {
    match &cli.command {
        None => {
            print_quick_start(cli);
            Ok(())
        }
        Some(Commands::Capture(args)) => cmd_capture(cli, out, args),
        Some(Commands::Preview(args)) => cmd_preview(cli, out, args),
        Some(Commands::Probe(args)) => cmd_probe(out, args),
        Some(Commands::Scale(args)) => cmd_scale(out, args),
        Some(Commands::List) => cmd_list(cli, out),
        Some(Commands::Init(args)) => cmd_init(cli, out, args),
        Some(Commands::Config(args)) => cmd_config(cli, out, args),
        Some(Commands::Version) => {
            cmd_version(out);
            Ok(())
        }
        Some(Commands::Completions(args)) => {
            use clap::CommandFactory;
            clap_complete::generate(args.shell, &mut Cli::command(), "snap", &mut io::stdout());
            Ok(())
        }
    }
}

// === Quick Start (Robot Mode Optimized) ===

#[derive(Serialize)]
struct RobotQuickStart {
    tool: &'static str,
    version: &'static str,
    description: &'static str,
    capture: RobotCapture,
    preview: RobotPreview,
    output_modes: OutputModes,
    config: &'static str,
}

#[derive(Serialize)]
struct RobotCapture {
    take_photo: &'static str,
    import_file: &'static str,
    list_photos: &'static str,
}

#[derive(Serialize)]
struct RobotPreview {
    preview_latest: &'static str,
    preview_file: &'static str,
    probe: &'static str,
    scale_factor: &'static str,
}

#[derive(Serialize)]
struct OutputModes {
    human: &'static str,
    robot: &'static str,
    compact: &'static str,
}

fn print_quick_start(cli: &Cli) {
    if cli.use_json() {
        let help = RobotQuickStart {
            tool: "snap",
            version: build_info::VERSION,
            description: "Capture a photo and preview it with memory-bounded decoding",
            capture: RobotCapture {
                take_photo: "snap capture --size 1080x1920 --preview out.png",
                import_file: "snap capture --import <FILE>",
                list_photos: "snap list --robot",
            },
            preview: RobotPreview {
                preview_latest: "snap preview --size <WxH>",
                preview_file: "snap preview <FILE> --size <WxH> --output <PNG>",
                probe: "snap probe <FILE>",
                scale_factor: "snap scale --photo <WxH> --target <WxH>",
            },
            output_modes: OutputModes {
                human: "--format=text (default)",
                robot: "--robot or --format=json",
                compact: "--format=json-compact",
            },
            config: "snap init && snap config",
        };
        let json = if cli.use_compact_json() {
            serde_json::to_string(&help)
        } else {
            serde_json::to_string_pretty(&help)
        };
        if let Ok(json) = json {
            println!("{json}");
        }
        return;
    }

    let bold = console::Style::new().bold();
    let green = console::Style::new().green();
    let cyan = console::Style::new().cyan();
    println!("{} {} - capture and preview\n", bold.apply_to("snap"), build_info::VERSION);
    println!("{}", bold.apply_to("QUICK START"));
    println!("  {}  Take a photo", green.apply_to("snap capture"));
    println!("  {}  Import a photo", green.apply_to("snap capture --import in.jpg"));
    println!("  {}  Preview latest", green.apply_to("snap preview --size 1080x1920 -o out.png"));
    println!("  {}  Natural size", green.apply_to("snap probe photo.jpg"));
    println!("  {}  List photos", green.apply_to("snap list"));
    println!();
    println!("{}", bold.apply_to("ROBOT MODE"));
    println!("  {}  JSON output", cyan.apply_to("snap --robot <command>"));
    println!();
    println!("Run {} for full help", console::style("snap --help").yellow());
}

// === Command Implementations ===

fn load_settings(cli: &Cli) -> Result<LoadedSettings> {
    config::load_or_default(cli.config.as_deref())
}

fn preview_size(requested: Option<Dimensions>, loaded: &LoadedSettings) -> Dimensions {
    requested.unwrap_or(loaded.settings.preview.size)
}

fn waiting_spinner(cli: &Cli, source: &str) -> Option<ProgressBar> {
    if cli.use_json() || cli.quiet || !io::stderr().is_terminal() {
        return None;
    }
    let bar = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        bar.set_style(style);
    }
    bar.set_message(format!("Waiting for {source}..."));
    bar.enable_steady_tick(Duration::from_millis(100));
    Some(bar)
}

fn cmd_capture(cli: &Cli, out: &dyn Output, args: &cli::CaptureArgs) -> Result<()> {
    let loaded = load_settings(cli)?;
    let store = loaded.photo_store()?;
    let source: Arc<dyn CaptureSource> =
        Arc::from(capture::source_from_settings(&loaded.settings, args.import.clone())?);
    let source_name = source.name().to_string();
    let size = preview_size(args.size, &loaded);
    debug!(dir = %store.dir().display(), source = %source_name, %size, "Starting capture");

    let session = CameraSession::new(store, source);
    let runtime = tokio::runtime::Runtime::new()?;
    let spinner = waiting_spinner(cli, &source_name);

    let result = runtime.block_on(async {
        match &args.preview {
            Some(path) => {
                let mut surface = FilePreviewSurface::new(path, size);
                session.take_picture(&mut surface).await
            }
            None => {
                let mut surface = MemorySurface::new(size);
                session.take_picture(&mut surface).await
            }
        }
    });
    if let Some(bar) = spinner {
        bar.finish_and_clear();
    }

    let report = result?;
    out.captured(&CaptureSummary::from_report(report, &source_name, args.preview.clone()));
    Ok(())
}

fn cmd_preview(cli: &Cli, out: &dyn Output, args: &cli::PreviewArgs) -> Result<()> {
    let loaded = load_settings(cli)?;
    let image = match &args.image {
        Some(path) => ImageRef::new(path),
        None => {
            let store = loaded.photo_store()?;
            store
                .latest()?
                .map(|p| p.path)
                .ok_or_else(|| SnapError::Other(format!("No photos in {}", store.dir().display())))?
        }
    };
    let size = preview_size(args.size, &loaded);

    let decoded = DownsampleLoader::default().load(&image, size)?;
    let summary = DecodedSummary::from(&decoded);
    if let Some(path) = &args.output {
        FilePreviewSurface::new(path, size).show(decoded)?;
    }

    out.preview(&PreviewReport {
        summary,
        output: args.output.clone(),
    });
    Ok(())
}

fn cmd_probe(out: &dyn Output, args: &cli::ProbeArgs) -> Result<()> {
    let image = ImageRef::new(&args.image);
    let dimensions = StdCodec.probe_dimensions(&image)?;
    out.probe(&ProbeReport {
        path: image,
        dimensions,
    });
    Ok(())
}

fn cmd_scale(out: &dyn Output, args: &cli::ScaleArgs) -> Result<()> {
    if args.photo.is_empty() {
        return Err(SnapError::InvalidDimensions {
            input: args.photo.to_string(),
        });
    }
    let factor = scale_factor(args.photo, args.target)?;
    out.scale(&ScaleReport {
        photo: args.photo,
        target: args.target,
        scale_factor: factor,
        decoded: Dimensions::new(
            args.photo.width.div_ceil(factor),
            args.photo.height.div_ceil(factor),
        ),
    });
    Ok(())
}

fn cmd_list(cli: &Cli, out: &dyn Output) -> Result<()> {
    let store = load_settings(cli)?.photo_store()?;
    let photos = store.list()?;
    out.photo_list(store.dir(), &photos);
    Ok(())
}

fn cmd_init(cli: &Cli, out: &dyn Output, args: &cli::InitArgs) -> Result<()> {
    let path = match &cli.config {
        Some(path) => path.clone(),
        None => config::default_config_path()?,
    };
    config::write_default_config(&path, args.force)?;
    out.success(&format!("Wrote {}", path.display()));
    Ok(())
}

fn cmd_config(cli: &Cli, out: &dyn Output, args: &cli::ConfigArgs) -> Result<()> {
    let loaded = load_settings(cli)?;
    let config_path = loaded
        .source
        .clone()
        .or_else(|| config::default_config_path().ok());

    if args.path {
        let path = config_path.ok_or_else(|| {
            SnapError::ConfigInvalid("Could not determine configuration directory".to_string())
        })?;
        out.config_path(&path);
        return Ok(());
    }

    let store = loaded.photo_store()?;
    let capture_command = loaded.settings.capture.command.as_ref().map(|c| {
        std::iter::once(c.program.clone())
            .chain(c.args.iter().cloned())
            .collect()
    });
    out.config(&ConfigReport {
        config_path,
        loaded: loaded.source.is_some(),
        photo_dir: store.dir().to_path_buf(),
        capture_command,
        preview_size: loaded.settings.preview.size,
    });
    Ok(())
}

fn cmd_version(out: &dyn Output) {
    out.version_info(&VersionInfo {
        version: build_info::VERSION,
        git_sha: build_info::git_sha(),
        git_dirty: build_info::git_dirty() == "true",
        build_timestamp: build_info::build_timestamp(),
        rustc_version: build_info::rustc_semver(),
        target: build_info::target(),
    });
}
