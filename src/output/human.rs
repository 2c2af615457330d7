//! Human-friendly output implementation using console styles.

use std::path::Path;

use tracing::{debug, instrument, trace};

use crate::error::SnapError;
use crate::storage::PhotoEntry;
use crate::theme::SnapTheme;

use super::{
    CaptureSummary, ConfigReport, Output, PreviewReport, ProbeReport, ScaleReport, VersionInfo,
};

/// Styled terminal output implementation for human users.
pub struct HumanOutput {
    theme: SnapTheme,
    quiet: bool,
}

/// Format a byte count as a short human string.
pub fn human_bytes(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KiB", "MiB", "GiB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{bytes} B")
    } else {
        format!("{value:.1} {}", UNITS[unit])
    }
}

impl HumanOutput {
    #[instrument]
    pub fn new(quiet: bool) -> Self {
        debug!("Creating HumanOutput");
        Self {
            theme: SnapTheme::default(),
            quiet,
        }
    }

    fn line(&self, label: &str, value: impl std::fmt::Display) {
        println!(
            "  {} {}",
            self.theme.label.apply_to(format!("{label:<10}")),
            self.theme.value.apply_to(value)
        );
    }

    fn print_preview(&self, report: &PreviewReport) {
        let s = &report.summary;
        self.line("Natural", self.theme.dimensions.apply_to(s.natural));
        self.line(
            "Preview",
            format!(
                "{} (1/{} sampling)",
                self.theme.dimensions.apply_to(s.decoded),
                s.sample_factor
            ),
        );
        if let Some(out) = &report.output {
            self.line("Written", self.theme.path.apply_to(out.display()));
        }
    }
}

impl Output for HumanOutput {
    fn success(&self, message: &str) {
        if self.quiet {
            return;
        }
        println!("{} {message}", self.theme.success.apply_to("[OK]"));
    }

    #[instrument(skip(self))]
    fn error(&self, error: &SnapError) {
        debug!(
            error = %error,
            recoverable = error.is_user_recoverable(),
            "Outputting error"
        );
        eprintln!("{} {}", self.theme.error.apply_to("[ERR]"), error);
        if let Some(suggestion) = error.suggestion() {
            trace!(suggestion, "Adding suggestion");
            eprintln!("  {} {}", self.theme.label.apply_to("Hint:"), self.theme.muted.apply_to(suggestion));
        }
    }

    fn warning(&self, message: &str) {
        eprintln!("{} {message}", self.theme.warning.apply_to("[WARN]"));
    }

    #[instrument(skip_all, fields(photo = %summary.photo))]
    fn captured(&self, summary: &CaptureSummary) {
        if self.quiet {
            println!("{}", summary.photo);
            return;
        }
        self.success(&format!(
            "Captured {} via {}",
            summary.photo.file_name(),
            summary.source
        ));
        self.line("Saved", self.theme.path.apply_to(&summary.photo));
        if let Some(preview) = &summary.preview {
            self.print_preview(preview);
        }
    }

    fn preview(&self, report: &PreviewReport) {
        if self.quiet {
            return;
        }
        println!("{}", self.theme.header.apply_to(report.summary.path.file_name()));
        self.print_preview(report);
    }

    fn probe(&self, report: &ProbeReport) {
        if self.quiet {
            println!("{}", report.dimensions);
            return;
        }
        println!(
            "{}: {}",
            self.theme.path.apply_to(&report.path),
            self.theme.dimensions.apply_to(report.dimensions)
        );
    }

    fn scale(&self, report: &ScaleReport) {
        if self.quiet {
            println!("{}", report.scale_factor);
            return;
        }
        self.line("Photo", report.photo);
        self.line("Target", report.target);
        self.line("Factor", report.scale_factor);
        self.line("Decoded", report.decoded);
    }

    #[instrument(skip(self, photos), fields(count = photos.len()))]
    fn photo_list(&self, dir: &Path, photos: &[PhotoEntry]) {
        if photos.is_empty() {
            if !self.quiet {
                self.warning(&format!("No photos in {}", dir.display()));
            }
            return;
        }
        if !self.quiet {
            println!("{}", self.theme.header.apply_to(format!("Photos in {}", dir.display())));
        }
        for photo in photos {
            if self.quiet {
                println!("{}", photo.path);
            } else {
                println!(
                    "  {}  {}",
                    photo.path.file_name(),
                    self.theme.muted.apply_to(human_bytes(photo.bytes))
                );
            }
        }
    }

    fn config(&self, report: &ConfigReport) {
        println!("{}", self.theme.header.apply_to("Configuration"));
        match (&report.config_path, report.loaded) {
            (Some(path), true) => self.line("File", path.display()),
            (Some(path), false) => self.line("File", format!("{} (not created, defaults)", path.display())),
            (None, _) => self.line("File", "(defaults)"),
        }
        self.line("Photos", report.photo_dir.display());
        match &report.capture_command {
            Some(cmd) => self.line("Capture", cmd.join(" ")),
            None => self.line("Capture", "(none; use --import)"),
        }
        self.line("Preview", report.preview_size);
    }

    fn config_path(&self, path: &Path) {
        println!("{}", path.display());
    }

    fn version_info(&self, info: &VersionInfo) {
        println!("snap {}", info.version);
        println!(
            "git: {}{}",
            info.git_sha,
            if info.git_dirty { " (dirty)" } else { "" }
        );
        println!("built: {}", info.build_timestamp);
        println!("rustc: {}", info.rustc_version);
        println!("target: {}", info.target);
    }
}
