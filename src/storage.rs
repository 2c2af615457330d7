//! Photo directory management.
//!
//! Destination files are allocated before a capture starts, named
//! `JPEG_<yyyyMMdd_HHmmss>_<digits>.jpg` after the local time of allocation.

use std::fs::{self, OpenOptions};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use serde::Serialize;
use tracing::{debug, info, instrument, trace, warn};

use crate::error::{Result, SnapError};
use crate::media::ImageRef;

const FILE_PREFIX: &str = "JPEG_";
const FILE_SUFFIX: &str = ".jpg";
const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";
const MAX_NAME_ATTEMPTS: usize = 16;

/// Default photo directory: `<Pictures>/snapcam`, falling back to
/// `<data dir>/snapcam/pictures` on systems without a pictures folder.
pub fn default_photo_dir() -> Result<PathBuf> {
    dirs::picture_dir()
        .map(|p| p.join("snapcam"))
        .or_else(|| dirs::data_dir().map(|d| d.join("snapcam").join("pictures")))
        .ok_or_else(|| {
            SnapError::ConfigInvalid("Could not determine a directory for photos".to_string())
        })
}

/// Build a photo file name for `time` with the given random suffix.
pub fn photo_file_name(time: &DateTime<Local>, suffix: u64) -> String {
    format!(
        "{FILE_PREFIX}{}_{suffix}{FILE_SUFFIX}",
        time.format(TIMESTAMP_FORMAT)
    )
}

/// True if `name` looks like a file this store allocated.
pub fn is_photo_name(name: &str) -> bool {
    let Some(rest) = name
        .strip_prefix(FILE_PREFIX)
        .and_then(|r| r.strip_suffix(FILE_SUFFIX))
    else {
        return false;
    };
    let mut parts = rest.split('_');
    let (Some(date), Some(time), Some(random), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return false;
    };
    let digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    date.len() == 8 && time.len() == 6 && digits(date) && digits(time) && digits(random)
}

fn random_suffix() -> u64 {
    // Low 63 bits keep the number positive-looking and short enough to read.
    (uuid::Uuid::new_v4().as_u128() as u64) & (u64::MAX >> 1)
}

/// A stored photo.
#[derive(Debug, Clone, Serialize)]
pub struct PhotoEntry {
    pub path: ImageRef,
    pub bytes: u64,
}

/// The directory photos are captured into.
#[derive(Debug, Clone)]
pub struct PhotoStore {
    dir: PathBuf,
}

impl PhotoStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Store rooted at [`default_photo_dir`].
    pub fn open_default() -> Result<Self> {
        Ok(Self::new(default_photo_dir()?))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn creation_error(&self, reason: impl std::fmt::Display) -> SnapError {
        SnapError::FileCreation {
            dir: self.dir.display().to_string(),
            reason: reason.to_string(),
        }
    }

    /// Create a new, empty destination file for a capture.
    ///
    /// The file is created exclusively; a name collision retries with a new
    /// random suffix.
    #[instrument(skip(self), fields(dir = %self.dir.display()))]
    pub fn create_image_file(&self) -> Result<ImageRef> {
        fs::create_dir_all(&self.dir).map_err(|e| self.creation_error(e))?;

        for attempt in 0..MAX_NAME_ATTEMPTS {
            let name = photo_file_name(&Local::now(), random_suffix());
            let path = self.dir.join(&name);
            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(_) => {
                    debug!(path = %path.display(), "Allocated photo file");
                    return Ok(ImageRef::new(path));
                }
                Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                    trace!(attempt, name, "Photo name taken, retrying");
                }
                Err(e) => return Err(self.creation_error(e)),
            }
        }

        Err(self.creation_error(format!(
            "no free file name after {MAX_NAME_ATTEMPTS} attempts"
        )))
    }

    /// Remove a destination file whose capture did not complete.
    ///
    /// Partial data counts as no photo. Returns true if a file was removed.
    pub fn discard(&self, image: &ImageRef) -> Result<bool> {
        match fs::remove_file(image.path()) {
            Ok(()) => {
                info!(path = %image, "Discarded unfinished photo file");
                Ok(true)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    /// Photos in the store, newest first.
    ///
    /// A missing directory is an empty store.
    pub fn list(&self) -> Result<Vec<PhotoEntry>> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut photos = Vec::new();
        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!(dir = %self.dir.display(), error = %e, "Skipping unreadable directory entry");
                    continue;
                }
            };
            let name = entry.file_name();
            let Some(name) = name.to_str() else { continue };
            if !is_photo_name(name) {
                continue;
            }
            let path = entry.path();
            // Follows symlinks, so a linked photo reports its real size.
            let meta = match fs::metadata(&path) {
                Ok(meta) => meta,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Skipping photo that cannot be read");
                    continue;
                }
            };
            if !meta.is_file() {
                trace!(path = %path.display(), "Skipping non-file entry");
                continue;
            }
            photos.push(PhotoEntry {
                path: ImageRef::new(path),
                bytes: meta.len(),
            });
        }

        // Timestamped names sort chronologically.
        photos.sort_by(|a, b| b.path.file_name().cmp(&a.path.file_name()));
        Ok(photos)
    }

    /// Most recent photo, if any.
    pub fn latest(&self) -> Result<Option<PhotoEntry>> {
        Ok(self.list()?.into_iter().find(|p| p.bytes > 0))
    }
}
