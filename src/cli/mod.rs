//! CLI argument definitions.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::media::Dimensions;

/// snap - capture a photo and preview it at a sensible resolution.
///
/// Robot Mode: Use --robot or --format=json for machine-parseable output.
#[derive(Parser, Debug)]
#[command(name = "snap", version, about, long_about = None)]
#[command(propagate_version = true)]
#[allow(clippy::struct_excessive_bools)] // CLI flags naturally use multiple bools
pub struct Cli {
    /// Output format (text for humans, json for agents/scripts)
    #[arg(
        long,
        short = 'f',
        default_value = "text",
        global = true,
        env = "SNAP_FORMAT"
    )]
    pub format: OutputFormat,

    /// Robot mode: equivalent to --format=json
    #[arg(long, global = true)]
    pub robot: bool,

    /// Verbose logging (-v debug, -vv trace)
    #[arg(long, short = 'v', global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (suppress non-essential output)
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    /// Settings file (YAML or TOML)
    #[arg(long, short = 'c', global = true, env = "SNAP_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Output format selection.
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text with optional color
    #[default]
    Text,
    /// JSON output for scripts and agents
    Json,
    /// Compact JSON (single line)
    JsonCompact,
}

impl Cli {
    /// Returns true if output should be JSON (robot mode or explicit --format=json).
    pub const fn use_json(&self) -> bool {
        self.robot || matches!(self.format, OutputFormat::Json | OutputFormat::JsonCompact)
    }

    /// Returns true if output should be compact JSON.
    pub const fn use_compact_json(&self) -> bool {
        matches!(self.format, OutputFormat::JsonCompact)
    }
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    // === Capture ===
    /// Take a photo with the configured camera program and preview it
    #[command(visible_alias = "shoot")]
    Capture(CaptureArgs),

    // === Preview ===
    /// Decode a photo at reduced resolution for a display area
    Preview(PreviewArgs),

    /// Show an image's natural size without decoding pixels
    Probe(ProbeArgs),

    /// Compute the downsample factor for a photo and display size
    Scale(ScaleArgs),

    /// List captured photos, newest first
    #[command(visible_alias = "ls")]
    List,

    // === Configuration ===
    /// Write a default settings file
    Init(InitArgs),

    /// Show current configuration
    Config(ConfigArgs),

    // === Utilities ===
    /// Show version and build information
    Version,

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// === Argument Structs ===

#[derive(Parser, Debug)]
pub struct CaptureArgs {
    /// Import this image instead of running the camera program
    #[arg(long, short = 'i', value_name = "FILE")]
    pub import: Option<PathBuf>,

    /// Display area to size the preview for (WIDTHxHEIGHT)
    #[arg(long, short = 's')]
    pub size: Option<Dimensions>,

    /// Write the preview image here
    #[arg(long, short = 'o', value_name = "FILE")]
    pub preview: Option<PathBuf>,
}

#[derive(Parser, Debug)]
pub struct PreviewArgs {
    /// Photo to preview; defaults to the most recent capture
    pub image: Option<PathBuf>,

    /// Display area to size the preview for (WIDTHxHEIGHT)
    #[arg(long, short = 's')]
    pub size: Option<Dimensions>,

    /// Write the preview image here (format from extension)
    #[arg(long, short = 'o', value_name = "FILE")]
    pub output: Option<PathBuf>,
}

#[derive(Parser, Debug)]
pub struct ProbeArgs {
    /// Image file
    pub image: PathBuf,
}

#[derive(Parser, Debug)]
pub struct ScaleArgs {
    /// Natural photo size (WIDTHxHEIGHT)
    #[arg(long, short = 'p')]
    pub photo: Dimensions,

    /// Display area (WIDTHxHEIGHT)
    #[arg(long, short = 't')]
    pub target: Dimensions,
}

#[derive(Parser, Debug)]
pub struct InitArgs {
    /// Force overwrite existing configuration
    #[arg(long, short = 'f')]
    pub force: bool,
}

#[derive(Parser, Debug)]
pub struct ConfigArgs {
    /// Only print the settings file path
    #[arg(long)]
    pub path: bool,
}

#[derive(Parser, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
