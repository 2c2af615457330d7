//! Settings file loading.
//!
//! Settings live in a YAML or TOML file, picked by extension. Every section
//! is optional; a missing default settings file means built-in defaults.
//!
//! # Example TOML
//!
//! ```toml
//! [storage]
//! photo_dir = "~/Pictures/snapcam"
//!
//! [capture.command]
//! program = "libcamera-still"
//! args = ["--nopreview", "-o", "{output}"]
//! timeout_secs = 30
//!
//! [preview]
//! size = "1080x1920"
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, trace};

use super::path::{PathResolver, default_config_path};
use crate::error::{Result, ResultExt, SnapError};
use crate::media::Dimensions;
use crate::storage::PhotoStore;

/// Template written by `snap init`.
pub const DEFAULT_CONFIG_TOML: &str = r#"# snapcam settings

[storage]
# Where captured photos are stored. Relative paths are resolved against
# this file's directory. Defaults to <Pictures>/snapcam.
# photo_dir = "~/Pictures/snapcam"

# External program that writes a JPEG to {output}.
# [capture.command]
# program = "libcamera-still"
# args = ["--nopreview", "-o", "{output}"]
# timeout_secs = 30

[preview]
size = "1080x1920"
"#;

/// Default preview area when neither the CLI nor settings give one.
pub const DEFAULT_PREVIEW_SIZE: Dimensions = Dimensions::new(1080, 1920);

/// Settings file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// YAML format (.yaml, .yml).
    Yaml,
    /// TOML format (.toml).
    Toml,
}

impl ConfigFormat {
    /// Detect format from file extension.
    #[must_use]
    pub fn from_extension(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?;
        trace!(extension = %ext, "Detecting config format from extension");
        match ext.to_lowercase().as_str() {
            "yaml" | "yml" => Some(Self::Yaml),
            "toml" => Some(Self::Toml),
            _ => None,
        }
    }

    fn for_path(path: &Path) -> Result<Self> {
        Self::from_extension(path).ok_or_else(|| {
            SnapError::ConfigParse(format!(
                "Unknown config format for '{}': expected .yaml, .yml, or .toml",
                path.display()
            ))
        })
    }
}

/// All settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub storage: StorageSettings,
    pub capture: CaptureSettings,
    pub preview: PreviewSettings,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StorageSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CaptureSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command: Option<CommandSettings>,
}

/// External capture program.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CommandSettings {
    pub program: String,
    /// Arguments; `{output}` is replaced with the destination path.
    #[serde(default)]
    pub args: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PreviewSettings {
    #[serde(with = "dims_as_str")]
    pub size: Dimensions,
}

impl Default for PreviewSettings {
    fn default() -> Self {
        Self {
            size: DEFAULT_PREVIEW_SIZE,
        }
    }
}

mod dims_as_str {
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    use crate::media::Dimensions;

    pub fn serialize<S: Serializer>(dims: &Dimensions, s: S) -> Result<S::Ok, S::Error> {
        s.collect_str(dims)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Dimensions, D::Error> {
        let raw = String::deserialize(d)?;
        raw.parse().map_err(D::Error::custom)
    }
}

impl Settings {
    /// Check values serde cannot.
    pub fn validate(&self) -> Result<()> {
        if self.preview.size.is_empty() {
            return Err(SnapError::ConfigInvalid(format!(
                "preview.size must be non-zero, got {}",
                self.preview.size
            )));
        }
        if let Some(cmd) = &self.capture.command {
            if cmd.program.trim().is_empty() {
                return Err(SnapError::ConfigInvalid(
                    "capture.command.program is empty".to_string(),
                ));
            }
        }
        Ok(())
    }
}

/// Settings plus where they came from.
#[derive(Debug, Clone, Default)]
pub struct LoadedSettings {
    pub settings: Settings,
    /// The file they were read from; `None` for built-in defaults.
    pub source: Option<PathBuf>,
}

impl LoadedSettings {
    /// Photo store, with `storage.photo_dir` resolved against the settings file.
    pub fn photo_store(&self) -> Result<PhotoStore> {
        match (&self.settings.storage.photo_dir, &self.source) {
            (Some(dir), Some(file)) => Ok(PhotoStore::new(PathResolver::new(file)?.resolve(dir)?)),
            (Some(dir), None) => Ok(PhotoStore::new(dir.clone())),
            (None, _) => PhotoStore::open_default(),
        }
    }
}

/// Load settings from an explicit path, or the default path if present.
///
/// An explicit path that does not exist is an error; a missing default file
/// yields built-in defaults.
pub fn load_or_default(explicit: Option<&Path>) -> Result<LoadedSettings> {
    if let Some(path) = explicit {
        return Ok(LoadedSettings {
            settings: load_settings(path)?,
            source: Some(path.to_path_buf()),
        });
    }

    let Ok(path) = default_config_path() else {
        debug!("No configuration directory; using defaults");
        return Ok(LoadedSettings::default());
    };
    if !path.exists() {
        debug!(path = %path.display(), "No settings file; using defaults");
        return Ok(LoadedSettings::default());
    }
    Ok(LoadedSettings {
        settings: load_settings(&path)?,
        source: Some(path),
    })
}

/// Load settings from a file.
///
/// # Errors
///
/// Returns an error if the extension is unknown, the file cannot be read,
/// or its contents fail to parse or validate.
#[instrument(skip_all, fields(path = %path.display()))]
pub fn load_settings(path: &Path) -> Result<Settings> {
    let format = ConfigFormat::for_path(path)?;
    let content = std::fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            SnapError::ConfigNotFound {
                path: path.display().to_string(),
            }
        } else {
            SnapError::Io(e)
        }
    })?;
    debug!(format = ?format, bytes = content.len(), "Read settings file");
    load_settings_from_str(&content, format)
}

/// Parse and validate settings text.
pub fn load_settings_from_str(content: &str, format: ConfigFormat) -> Result<Settings> {
    let settings: Settings = match format {
        ConfigFormat::Yaml => serde_yaml::from_str(content)
            .map_err(|e| SnapError::ConfigParse(format!("YAML: {e}")))?,
        ConfigFormat::Toml => {
            toml::from_str(content).map_err(|e| SnapError::ConfigParse(format!("TOML: {e}")))?
        }
    };
    settings.validate()?;
    info!(
        photo_dir = ?settings.storage.photo_dir,
        capture = settings.capture.command.as_ref().map(|c| c.program.as_str()),
        preview = %settings.preview.size,
        "Settings loaded"
    );
    Ok(settings)
}

/// Write settings, in the format implied by the extension.
pub fn save_settings(settings: &Settings, path: &Path) -> Result<()> {
    let content = match ConfigFormat::for_path(path)? {
        ConfigFormat::Yaml => serde_yaml::to_string(settings)
            .map_err(|e| SnapError::ConfigParse(format!("YAML: {e}")))?,
        ConfigFormat::Toml => toml::to_string_pretty(settings)
            .map_err(|e| SnapError::ConfigParse(format!("TOML: {e}")))?,
    };
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, content).with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}

/// Write [`DEFAULT_CONFIG_TOML`] to `path`.
///
/// Refuses to overwrite an existing file unless `force` is set.
pub fn write_default_config(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        return Err(SnapError::ConfigInvalid(format!(
            "{} already exists (use --force to overwrite)",
            path.display()
        )));
    }
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, DEFAULT_CONFIG_TOML)
        .with_context(|| format!("writing {}", path.display()))?;
    info!(path = %path.display(), "Wrote default settings");
    Ok(())
}
