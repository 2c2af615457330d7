//! Robot-mode end-to-end tests.

use regex::Regex;

use crate::common::cli::CliRunner;
use crate::common::fixtures::{PhotoWorkspace, write_jpeg};
use crate::common::init_test_logging;

fn photo_name() -> Regex {
    Regex::new(r"JPEG_\d{8}_\d{6}_\d+\.jpg$").unwrap()
}

#[test]
fn robot_quick_start_outputs_json() {
    init_test_logging();
    let result = CliRunner::new().run(&["--robot"]);
    result.assert_success();

    let json = result.json();
    assert_eq!(json["tool"], "snap");
    assert!(json.get("capture").is_some());
    assert!(json.get("output_modes").is_some());
}

#[test]
fn robot_scale_reports_factor_and_decoded_size() {
    let result = CliRunner::new().run_robot(&[
        "scale", "--photo", "3000x4000", "--target", "300x400",
    ]);
    result.assert_success();

    let json = result.json();
    assert_eq!(json["scale_factor"], 10);
    assert_eq!(json["decoded"]["width"], 300);
    assert_eq!(json["decoded"]["height"], 400);
}

#[test]
fn robot_scale_zero_target_is_recoverable_error() {
    let result = CliRunner::new().run_robot(&["scale", "--photo", "800x600", "--target", "0x600"]);
    result.assert_failure();

    let json = result.error_json();
    assert_eq!(json["error"], true);
    assert_eq!(json["recoverable"], true);
    assert!(json["suggestion"].is_string());
    assert!(result.stdout.trim().is_empty());
}

#[test]
fn robot_probe_reports_natural_size() {
    let cli = CliRunner::new();
    let photo = write_jpeg(cli.home(), "p.jpg", 320, 200);
    let result = cli.run_robot(&["probe", &photo.display().to_string()]);
    result.assert_success();

    let json = result.json();
    assert_eq!(json["width"], 320);
    assert_eq!(json["height"], 200);
}

#[test]
fn robot_probe_missing_file_suggests_fix() {
    let cli = CliRunner::new();
    let missing = cli.home().join("missing.jpg");
    let result = cli.run_robot(&["probe", &missing.display().to_string()]);
    result.assert_failure();

    let json = result.error_json();
    assert_eq!(json["recoverable"], true);
    assert!(json["message"].as_str().unwrap().contains("missing.jpg"));
}

#[test]
fn robot_preview_writes_downsampled_png() {
    let cli = CliRunner::new();
    let photo = write_jpeg(cli.home(), "p.jpg", 400, 300);
    let out = cli.home().join("preview.png");
    let result = cli.run_robot(&[
        "preview",
        &photo.display().to_string(),
        "--size",
        "100x100",
        "--output",
        &out.display().to_string(),
    ]);
    result.assert_success();

    let json = result.json();
    assert_eq!(json["sample_factor"], 3);
    assert_eq!(json["natural"]["width"], 400);
    assert_eq!(json["decoded"]["width"], 134);
    assert!(json["output"].is_string());
    assert_eq!(image::image_dimensions(&out).unwrap(), (134, 100));
}

#[test]
fn robot_capture_import_stores_and_previews() {
    init_test_logging();
    let ws = PhotoWorkspace::new();
    let cli = CliRunner::new();
    let original = write_jpeg(ws.dir.path(), "in.jpg", 600, 800);

    let result = cli.run_robot(&[
        "--config",
        &ws.config_arg(),
        "capture",
        "--import",
        &original.display().to_string(),
        "--size",
        "60x80",
    ]);
    result.assert_success();

    let json = result.json();
    assert_eq!(json["source"], "import");
    let photo = json["photo"].as_str().unwrap();
    assert!(photo_name().is_match(photo), "unexpected photo path {photo}");
    assert_eq!(json["preview"]["sample_factor"], 10);
    assert_eq!(json["preview"]["decoded"]["height"], 80);
    assert_eq!(ws.photo_names().len(), 1);
}

#[test]
fn robot_capture_without_source_fails_cleanly() {
    let ws = PhotoWorkspace::new();
    let result = CliRunner::new().run_robot(&["--config", &ws.config_arg(), "capture"]);
    result.assert_failure();

    let json = result.error_json();
    assert!(json["message"].as_str().unwrap().contains("No capture source"));
    assert!(json["suggestion"].as_str().unwrap().contains("--import"));
    assert!(ws.photo_names().is_empty());
}

#[cfg(unix)]
#[test]
fn robot_capture_command_cancel_leaves_no_file() {
    let ws = PhotoWorkspace::with_settings("[capture.command]\nprogram = \"false\"\n");
    let result = CliRunner::new().run_robot(&["--config", &ws.config_arg(), "capture"]);
    result.assert_failure();

    let json = result.error_json();
    assert!(json["message"].as_str().unwrap().contains("cancelled"));
    assert!(ws.photo_names().is_empty());
}

#[test]
fn robot_list_and_preview_latest_after_capture() {
    let ws = PhotoWorkspace::new();
    let cli = CliRunner::new();
    let config = ws.config_arg();

    let empty = cli.run_robot(&["--config", &config, "list"]);
    empty.assert_success();
    assert_eq!(empty.json()["count"], 0);

    let original = write_jpeg(ws.dir.path(), "in.jpg", 200, 100);
    cli.run_robot(&[
        "--config",
        &config,
        "capture",
        "--import",
        &original.display().to_string(),
    ])
    .assert_success();

    let listed = cli.run_robot(&["--config", &config, "list"]);
    listed.assert_success();
    let json = listed.json();
    assert_eq!(json["count"], 1);
    assert!(json["photos"][0]["bytes"].as_u64().unwrap() > 0);

    let preview = cli.run_robot(&["--config", &config, "preview", "--size", "50x50"]);
    preview.assert_success();
    let json = preview.json();
    assert_eq!(json["sample_factor"], 2);
    assert_eq!(json["path"], listed.json()["photos"][0]["path"]);
}

#[test]
fn robot_compact_format_is_single_line() {
    let result = CliRunner::new().run(&[
        "--format=json-compact",
        "scale",
        "--photo",
        "100x100",
        "--target",
        "10x10",
    ]);
    result.assert_success();
    assert_eq!(result.stdout.trim().lines().count(), 1);
    assert_eq!(result.json()["scale_factor"], 10);
}

#[test]
fn robot_config_reports_sources() {
    let ws = PhotoWorkspace::new();
    let cli = CliRunner::new();

    let path = cli.run_robot(&["--config", &ws.config_arg(), "config", "--path"]);
    path.assert_success();
    assert_eq!(path.json()["config_path"], ws.config_arg());

    let report = cli.run_robot(&["--config", &ws.config_arg(), "config"]);
    report.assert_success();
    let json = report.json();
    assert_eq!(json["loaded"], true);
    assert!(json["photo_dir"].as_str().unwrap().ends_with("photos"));
    assert_eq!(json["preview_size"]["width"], 1080);
    assert!(json["capture_command"].is_null());
}

#[test]
fn robot_version_outputs_json() {
    let result = CliRunner::new().run(&["version", "--format=json"]);
    result.assert_success();
    let json = result.json();
    assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
    assert!(json.get("git_sha").is_some());
}
