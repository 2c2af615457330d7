//! Capture, cancellation, and preview through a `CameraSession`.

use std::sync::Arc;

use snap::capture::mock::{MockCapture, MockShot};
use snap::capture::{CaptureSource, CommandCapture, ImportCapture};
use snap::display::{DisplaySurface, FilePreviewSurface, MemorySurface};
use snap::error::SnapError;
use snap::media::Dimensions;
use snap::session::CameraSession;
use snap::storage::{PhotoStore, is_photo_name};
use tempfile::TempDir;

use crate::common::fixtures::write_jpeg;
use crate::common::init_test_logging;

fn store_in(dir: &TempDir) -> PhotoStore {
    PhotoStore::new(dir.path().join("photos"))
}

#[tokio::test]
async fn import_then_preview_to_file() {
    init_test_logging();
    let dir = TempDir::new().unwrap();
    let original = write_jpeg(dir.path(), "in.jpg", 400, 300);
    let source: Arc<dyn CaptureSource> = Arc::new(ImportCapture::new(&original));
    let session = CameraSession::new(store_in(&dir), source);

    let preview = dir.path().join("preview.png");
    let mut surface = FilePreviewSurface::new(&preview, Dimensions::new(100, 100));
    let report = session.take_picture(&mut surface).await.unwrap();

    assert!(is_photo_name(&report.photo.file_name()));
    assert_eq!(
        std::fs::read(report.photo.path()).unwrap(),
        std::fs::read(&original).unwrap()
    );
    assert_eq!(report.preview.sample_factor, 3);
    assert_eq!(report.preview.decoded, Dimensions::new(134, 100));
    assert_eq!(image::image_dimensions(&preview).unwrap(), (134, 100));
    assert_eq!(surface.current().unwrap().source(), &report.photo);
}

#[tokio::test]
async fn import_of_missing_file_allocates_nothing() {
    let dir = TempDir::new().unwrap();
    let source: Arc<dyn CaptureSource> =
        Arc::new(ImportCapture::new(dir.path().join("missing.jpg")));
    let session = CameraSession::new(store_in(&dir), source);

    let err = session.capture().await.unwrap_err();
    assert!(matches!(err, SnapError::NoCaptureSource(_)));
    assert!(session.store().list().unwrap().is_empty());
}

#[tokio::test]
async fn abandoned_capture_counts_as_cancel() {
    let dir = TempDir::new().unwrap();
    let mock = Arc::new(MockCapture::new().then(MockShot::Abandon));
    let session = CameraSession::new(store_in(&dir), mock.clone());

    let err = session.capture().await.unwrap_err();
    assert!(matches!(err, SnapError::CaptureCancelled));
    assert!(!mock.destinations()[0].path().exists());
}

#[tokio::test]
async fn repeated_captures_get_distinct_files() {
    let dir = TempDir::new().unwrap();
    let mock = Arc::new(MockCapture::new());
    let session = CameraSession::new(store_in(&dir), mock.clone());

    let a = session.capture().await.unwrap();
    let b = session.capture().await.unwrap();
    assert_ne!(a, b);
    assert_eq!(session.store().list().unwrap().len(), 2);
    assert_eq!(mock.start_count(), 2);
}

#[tokio::test]
async fn surface_resized_after_layout() {
    let dir = TempDir::new().unwrap();
    let mock = Arc::new(MockCapture::new().then(MockShot::Photo(Dimensions::new(600, 800))));
    let session = CameraSession::new(store_in(&dir), mock);
    let mut surface = MemorySurface::default();

    let photo = session.capture().await.unwrap();
    let err = session.show(&photo, &mut surface).await.unwrap_err();
    assert!(matches!(err, SnapError::DisplayNotReady { .. }));

    surface.resize(Dimensions::new(150, 200));
    let summary = session.show(&photo, &mut surface).await.unwrap();
    assert_eq!(summary.sample_factor, 4);
    assert_eq!(surface.current().unwrap().dimensions(), Dimensions::new(150, 200));
}

#[cfg(unix)]
#[tokio::test]
async fn command_source_runs_program() {
    init_test_logging();
    let dir = TempDir::new().unwrap();
    let original = write_jpeg(dir.path(), "in.jpg", 64, 48);
    let script = format!("cp '{}' \"$1\"", original.display());
    let source: Arc<dyn CaptureSource> = Arc::new(CommandCapture::new(
        "sh",
        vec!["-c".into(), script, "sh".into(), "{output}".into()],
    ));
    let session = CameraSession::new(store_in(&dir), source);
    let mut surface = MemorySurface::new(Dimensions::new(32, 24));

    let report = session.take_picture(&mut surface).await.unwrap();
    assert_eq!(report.preview.natural, Dimensions::new(64, 48));
    assert_eq!(report.preview.sample_factor, 2);
}

#[cfg(unix)]
#[tokio::test]
async fn command_that_writes_nothing_is_cancelled() {
    let dir = TempDir::new().unwrap();
    let source: Arc<dyn CaptureSource> = Arc::new(CommandCapture::new("true", Vec::new()));
    let session = CameraSession::new(store_in(&dir), source);

    let err = session.capture().await.unwrap_err();
    assert!(matches!(err, SnapError::CaptureCancelled));
    assert!(session.store().list().unwrap().is_empty());
}

#[cfg(unix)]
#[tokio::test]
async fn command_failing_after_partial_write_leaves_no_file() {
    let dir = TempDir::new().unwrap();
    let source: Arc<dyn CaptureSource> = Arc::new(CommandCapture::new(
        "sh",
        vec!["-c".into(), "printf x > \"$0\"; exit 1".into(), "{output}".into()],
    ));
    let session = CameraSession::new(store_in(&dir), source);
    let mut surface = MemorySurface::new(Dimensions::new(10, 10));

    let err = session.take_picture(&mut surface).await.unwrap_err();
    assert!(matches!(err, SnapError::CaptureCancelled));
    assert!(session.store().list().unwrap().is_empty());
    assert!(session.store().latest().unwrap().is_none());
    assert!(surface.current().is_none());
}
