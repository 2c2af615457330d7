//! Configuration: settings file loading and path helpers.

mod path;
mod settings;

pub use path::{PathResolver, default_config_path, home_dir, resolve_path};
pub use settings::{
    CaptureSettings, CommandSettings, ConfigFormat, DEFAULT_CONFIG_TOML, DEFAULT_PREVIEW_SIZE,
    LoadedSettings, PreviewSettings, Settings, StorageSettings, load_or_default, load_settings,
    load_settings_from_str, save_settings, write_default_config,
};
