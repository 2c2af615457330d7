//! Output mode abstraction for robot and human output.

use std::path::PathBuf;

use serde::Serialize;

use crate::cli::Cli;
use crate::error::SnapError;
use crate::media::{DecodedSummary, Dimensions, ImageRef};
use crate::session::CaptureReport;
use crate::storage::PhotoEntry;

pub mod human;
pub mod robot;

pub use human::HumanOutput;
pub use robot::RobotOutput;

/// Result of `snap scale`.
#[derive(Debug, Clone, Serialize)]
pub struct ScaleReport {
    pub photo: Dimensions,
    pub target: Dimensions,
    pub scale_factor: u32,
    pub decoded: Dimensions,
}

/// Result of `snap probe`.
#[derive(Debug, Clone, Serialize)]
pub struct ProbeReport {
    pub path: ImageRef,
    #[serde(flatten)]
    pub dimensions: Dimensions,
}

/// Result of `snap preview`.
#[derive(Debug, Clone, Serialize)]
pub struct PreviewReport {
    #[serde(flatten)]
    pub summary: DecodedSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,
}

/// Result of `snap capture`.
#[derive(Debug, Clone, Serialize)]
pub struct CaptureSummary {
    pub photo: ImageRef,
    pub source: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preview: Option<PreviewReport>,
}

impl CaptureSummary {
    pub fn from_report(report: CaptureReport, source: &str, output: Option<PathBuf>) -> Self {
        Self {
            photo: report.photo,
            source: source.to_string(),
            preview: Some(PreviewReport {
                summary: report.preview,
                output,
            }),
        }
    }
}

/// Result of `snap config`.
#[derive(Debug, Clone, Serialize)]
pub struct ConfigReport {
    pub config_path: Option<PathBuf>,
    pub loaded: bool,
    pub photo_dir: PathBuf,
    pub capture_command: Option<Vec<String>>,
    pub preview_size: Dimensions,
}

/// Build metadata for `snap version`.
#[derive(Debug, Clone, Serialize)]
pub struct VersionInfo {
    pub version: &'static str,
    pub git_sha: &'static str,
    pub git_dirty: bool,
    pub build_timestamp: &'static str,
    pub rustc_version: &'static str,
    pub target: &'static str,
}

/// JSON formatting options for robot mode.
#[derive(Debug, Clone, Copy)]
pub enum RobotFormat {
    /// Pretty-printed JSON (default for --robot).
    Json,
    /// Single-line JSON (--format=json-compact).
    JsonCompact,
}

/// Determines how command output is rendered.
#[derive(Debug, Clone, Copy)]
pub enum OutputMode {
    /// JSON output for AI agents and scripting.
    Robot(RobotFormat),
    /// Styled terminal output for human users.
    Human { quiet: bool },
}

impl OutputMode {
    /// Create OutputMode from CLI arguments.
    #[must_use]
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.use_json() {
            let format = if cli.use_compact_json() {
                RobotFormat::JsonCompact
            } else {
                RobotFormat::Json
            };
            Self::Robot(format)
        } else {
            Self::Human { quiet: cli.quiet }
        }
    }

    /// Convert into the appropriate Output implementation.
    #[must_use]
    pub fn into_output(self) -> Box<dyn Output> {
        match self {
            Self::Robot(format) => Box::new(RobotOutput::new(format)),
            Self::Human { quiet } => Box::new(HumanOutput::new(quiet)),
        }
    }
}

/// Trait for all output operations.
///
/// Commands call these methods without knowing the output mode.
pub trait Output {
    // Basic messages
    fn success(&self, message: &str);
    fn error(&self, error: &SnapError);
    fn warning(&self, message: &str);

    // Photos
    fn captured(&self, summary: &CaptureSummary);
    fn preview(&self, report: &PreviewReport);
    fn probe(&self, report: &ProbeReport);
    fn scale(&self, report: &ScaleReport);
    fn photo_list(&self, dir: &std::path::Path, photos: &[PhotoEntry]);

    // Configuration
    fn config(&self, report: &ConfigReport);
    fn config_path(&self, path: &std::path::Path);

    // Metadata
    fn version_info(&self, info: &VersionInfo);
}
