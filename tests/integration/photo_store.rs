//! Photo file allocation, listing, and cleanup.

use regex::Regex;
use snap::media::ImageRef;
use snap::storage::PhotoStore;
use tempfile::TempDir;

use crate::common::fixtures::write_jpeg;

fn name_pattern() -> Regex {
    Regex::new(r"^JPEG_\d{8}_\d{6}_\d+\.jpg$").unwrap()
}

#[test]
fn allocated_files_are_empty_and_well_named() {
    let dir = TempDir::new().unwrap();
    let store = PhotoStore::new(dir.path().join("nested/photos"));

    let image = store.create_image_file().unwrap();
    assert!(name_pattern().is_match(&image.file_name()));
    assert_eq!(std::fs::metadata(image.path()).unwrap().len(), 0);
    assert_eq!(image.path().parent().unwrap(), store.dir());
}

#[test]
fn many_allocations_never_collide() {
    let dir = TempDir::new().unwrap();
    let store = PhotoStore::new(dir.path());
    let mut names: Vec<String> = (0..50)
        .map(|_| store.create_image_file().unwrap().file_name())
        .collect();
    names.sort();
    names.dedup();
    assert_eq!(names.len(), 50);
}

#[test]
fn unwritable_directory_is_file_creation_error() {
    let dir = TempDir::new().unwrap();
    let blocker = dir.path().join("file");
    std::fs::write(&blocker, b"x").unwrap();
    let store = PhotoStore::new(blocker.join("photos"));

    let err = store.create_image_file().unwrap_err();
    assert!(matches!(err, snap::error::SnapError::FileCreation { .. }));
}

#[test]
fn list_ignores_foreign_files_and_sorts_newest_first() {
    let dir = TempDir::new().unwrap();
    write_jpeg(dir.path(), "JPEG_20240101_080000_1.jpg", 4, 4);
    write_jpeg(dir.path(), "JPEG_20240301_080000_7.jpg", 4, 4);
    write_jpeg(dir.path(), "holiday.jpg", 4, 4);
    std::fs::write(dir.path().join("JPEG_20240401_080000_2.jpg"), b"").unwrap();

    let store = PhotoStore::new(dir.path());
    let names: Vec<String> = store
        .list()
        .unwrap()
        .iter()
        .map(|p| p.path.file_name())
        .collect();
    assert_eq!(
        names,
        [
            "JPEG_20240401_080000_2.jpg",
            "JPEG_20240301_080000_7.jpg",
            "JPEG_20240101_080000_1.jpg",
        ]
    );

    // The empty allocation is skipped.
    let latest = store.latest().unwrap().unwrap();
    assert_eq!(latest.path.file_name(), "JPEG_20240301_080000_7.jpg");
}

#[test]
fn discard_removes_the_allocated_file_whatever_its_size() {
    let dir = TempDir::new().unwrap();
    let store = PhotoStore::new(dir.path());
    let empty = store.create_image_file().unwrap();
    let partial = store.create_image_file().unwrap();
    std::fs::write(partial.path(), b"\xff\xd8 truncated").unwrap();
    let other = ImageRef::new(write_jpeg(dir.path(), "JPEG_20240101_080000_1.jpg", 4, 4));

    assert!(store.discard(&empty).unwrap());
    assert!(store.discard(&partial).unwrap());
    assert!(!partial.path().exists());
    assert!(!store.discard(&empty).unwrap());

    assert!(other.path().exists());
    assert_eq!(store.latest().unwrap().unwrap().path, other);
}
