//! Settings discovery and parsing from files on disk.

use std::path::Path;

use snap::capture::source_from_settings;
use snap::config::{
    DEFAULT_PREVIEW_SIZE, Settings, load_or_default, load_settings, save_settings,
    write_default_config,
};
use snap::error::SnapError;
use snap::media::Dimensions;
use tempfile::TempDir;

use crate::common::env::with_config_home;

// `dirs` honors XDG_CONFIG_HOME on Linux only.
#[cfg(target_os = "linux")]
#[test]
fn missing_default_file_means_defaults() {
    let home = TempDir::new().unwrap();
    let _env = with_config_home(home.path());

    let loaded = load_or_default(None).unwrap();
    assert!(loaded.source.is_none());
    assert_eq!(loaded.settings, Settings::default());
    assert_eq!(loaded.settings.preview.size, DEFAULT_PREVIEW_SIZE);
}

#[cfg(target_os = "linux")]
#[test]
fn default_file_is_discovered() {
    let home = TempDir::new().unwrap();
    let _env = with_config_home(home.path());
    let path = home.path().join("snapcam").join("config.toml");
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(&path, "[preview]\nsize = \"300x400\"\n").unwrap();

    let loaded = load_or_default(None).unwrap();
    assert_eq!(loaded.source.as_deref(), Some(path.as_path()));
    assert_eq!(loaded.settings.preview.size, Dimensions::new(300, 400));
}

#[test]
fn explicit_missing_file_is_error() {
    let dir = TempDir::new().unwrap();
    let err = load_or_default(Some(&dir.path().join("nope.toml"))).unwrap_err();
    assert!(matches!(err, SnapError::ConfigNotFound { .. }));
}

#[test]
fn relative_photo_dir_resolves_next_to_settings() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("snap.yaml");
    std::fs::write(&path, "storage:\n  photo_dir: shots\n").unwrap();

    let loaded = load_or_default(Some(&path)).unwrap();
    let store = loaded.photo_store().unwrap();
    assert_eq!(
        store.dir(),
        dir.path().canonicalize().unwrap().join("shots").as_path()
    );
}

#[test]
fn init_template_round_trips_and_refuses_overwrite() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");

    write_default_config(&path, false).unwrap();
    assert_eq!(load_settings(&path).unwrap(), Settings::default());

    let err = write_default_config(&path, false).unwrap_err();
    assert!(matches!(err, SnapError::ConfigInvalid(_)));
    write_default_config(&path, true).unwrap();
}

#[test]
fn saved_yaml_reloads_with_command() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("saved.yml");
    let mut settings = Settings::default();
    settings.preview.size = Dimensions::new(640, 480);
    settings.capture.command = Some(snap::config::CommandSettings {
        program: "libcamera-still".into(),
        args: vec!["-o".into(), "{output}".into()],
        timeout_secs: Some(5),
    });

    save_settings(&settings, &path).unwrap();
    let reloaded = load_settings(&path).unwrap();
    assert_eq!(reloaded, settings);

    let source = source_from_settings(&reloaded, None).unwrap();
    assert_eq!(source.name(), "libcamera-still");
}

#[test]
fn no_command_and_no_import_has_no_source() {
    let err = source_from_settings(&Settings::default(), None).err().unwrap();
    assert!(matches!(err, SnapError::NoCaptureSource(_)));
    assert!(err.is_user_recoverable());
    assert!(err.suggestion().unwrap().contains("--import"));
}

#[test]
fn unknown_keys_are_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bad.toml");
    std::fs::write(&path, "[preview]\nzoom = 2\n").unwrap();
    assert!(matches!(
        load_settings(Path::new(&path)).unwrap_err(),
        SnapError::ConfigParse(_)
    ));
}
