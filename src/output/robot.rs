//! Robot mode JSON output implementation.

use std::path::Path;

use serde::Serialize;
use tracing::{debug, instrument, trace};

use crate::error::SnapError;
use crate::storage::PhotoEntry;

use super::{
    CaptureSummary, ConfigReport, Output, PreviewReport, ProbeReport, RobotFormat, ScaleReport,
    VersionInfo,
};

/// JSON output implementation for AI agents and scripting.
///
/// Results go to stdout, errors to stderr, one JSON document per call.
pub struct RobotOutput {
    format: RobotFormat,
}

/// JSON object describing an error.
pub fn error_json(error: &SnapError) -> serde_json::Value {
    serde_json::json!({
        "error": true,
        "message": error.to_string(),
        "suggestion": error.suggestion(),
        "recoverable": error.is_user_recoverable(),
    })
}

impl RobotOutput {
    #[instrument]
    pub fn new(format: RobotFormat) -> Self {
        debug!(?format, "Creating RobotOutput");
        Self { format }
    }

    /// Serialize `data` according to the configured format.
    pub fn render<T: Serialize + ?Sized>(&self, data: &T) -> String {
        let rendered = match self.format {
            RobotFormat::Json => serde_json::to_string_pretty(data),
            RobotFormat::JsonCompact => serde_json::to_string(data),
        };
        // Our report types contain only strings, numbers, and maps.
        rendered.unwrap_or_else(|e| format!("{{\"error\":true,\"message\":\"serialization failed: {e}\"}}"))
    }

    fn output_json<T: Serialize + ?Sized>(&self, data: &T) {
        let json = self.render(data);
        trace!(json_len = json.len(), "JSON serialized");
        println!("{json}");
    }
}

impl Output for RobotOutput {
    #[instrument(skip(self))]
    fn success(&self, message: &str) {
        self.output_json(&serde_json::json!({ "success": true, "message": message }));
    }

    #[instrument(skip(self))]
    fn error(&self, error: &SnapError) {
        debug!(error = %error, "Robot: error");
        eprintln!("{}", self.render(&error_json(error)));
    }

    #[instrument(skip(self))]
    fn warning(&self, message: &str) {
        self.output_json(&serde_json::json!({ "warning": true, "message": message }));
    }

    #[instrument(skip_all, fields(photo = %summary.photo))]
    fn captured(&self, summary: &CaptureSummary) {
        debug!("Robot: captured");
        self.output_json(summary);
    }

    #[instrument(skip_all)]
    fn preview(&self, report: &PreviewReport) {
        self.output_json(report);
    }

    #[instrument(skip_all)]
    fn probe(&self, report: &ProbeReport) {
        self.output_json(report);
    }

    #[instrument(skip_all, fields(factor = report.scale_factor))]
    fn scale(&self, report: &ScaleReport) {
        self.output_json(report);
    }

    #[instrument(skip(self, photos), fields(count = photos.len()))]
    fn photo_list(&self, dir: &Path, photos: &[PhotoEntry]) {
        self.output_json(&serde_json::json!({
            "dir": dir.display().to_string(),
            "count": photos.len(),
            "photos": photos,
        }));
    }

    #[instrument(skip_all)]
    fn config(&self, report: &ConfigReport) {
        self.output_json(report);
    }

    #[instrument(skip(self))]
    fn config_path(&self, path: &Path) {
        self.output_json(&serde_json::json!({ "config_path": path.display().to_string() }));
    }

    #[instrument(skip_all)]
    fn version_info(&self, info: &VersionInfo) {
        self.output_json(info);
    }
}
