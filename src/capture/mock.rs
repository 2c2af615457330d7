//! Mock capture source for tests.
//!
//! Answers each capture from a script of outcomes and records every
//! destination it was handed.
//!
//! # Example
//!
//! ```rust,ignore
//! use snap::capture::mock::{MockCapture, MockShot};
//!
//! let mock = MockCapture::new()
//!     .then(MockShot::Photo(Dimensions::new(3000, 4000)))
//!     .then(MockShot::Cancel);
//! ```

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use image::{Rgb, RgbImage};
use tracing::{debug, trace};

use super::{CaptureOutcome, CaptureSource, CaptureTicket};
use crate::error::SnapError;
use crate::media::{Dimensions, ImageRef};

/// Scripted response to one capture request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockShot {
    /// Write a JPEG of this size to the destination.
    Photo(Dimensions),
    /// Leave the destination empty and report cancellation.
    Cancel,
    /// Report a capture failure with this message.
    Fail(String),
    /// Drop the result channel without answering.
    Abandon,
}

/// Size written when the script runs out.
pub const DEFAULT_MOCK_PHOTO: Dimensions = Dimensions::new(640, 480);

/// Capture source that follows a script.
pub struct MockCapture {
    script: Mutex<VecDeque<MockShot>>,
    destinations: Mutex<Vec<ImageRef>>,
    available: AtomicBool,
}

impl Default for MockCapture {
    fn default() -> Self {
        Self::new()
    }
}

impl MockCapture {
    #[must_use]
    pub fn new() -> Self {
        debug!("Creating mock capture source");
        Self {
            script: Mutex::new(VecDeque::new()),
            destinations: Mutex::new(Vec::new()),
            available: AtomicBool::new(true),
        }
    }

    /// Append a scripted response.
    #[must_use]
    pub fn then(self, shot: MockShot) -> Self {
        self.script.lock().unwrap().push_back(shot);
        self
    }

    /// Simulate a device with no camera.
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// Destinations passed to [`CaptureSource::start`], in order.
    #[must_use]
    pub fn destinations(&self) -> Vec<ImageRef> {
        self.destinations.lock().unwrap().clone()
    }

    #[must_use]
    pub fn start_count(&self) -> usize {
        self.destinations.lock().unwrap().len()
    }

    fn next_shot(&self) -> MockShot {
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(MockShot::Photo(DEFAULT_MOCK_PHOTO))
    }
}

impl CaptureSource for MockCapture {
    fn name(&self) -> &str {
        "mock"
    }

    fn is_available(&self) -> bool {
        self.available.load(Ordering::SeqCst)
    }

    fn start(&self, destination: ImageRef) -> CaptureTicket {
        self.destinations.lock().unwrap().push(destination.clone());
        let shot = self.next_shot();
        trace!(?shot, dest = %destination, "Mock capture");

        let (completer, ticket) = CaptureTicket::channel();
        match shot {
            MockShot::Photo(size) => {
                let img = RgbImage::from_fn(size.width, size.height, |x, y| {
                    Rgb([(x % 256) as u8, (y % 256) as u8, 128])
                });
                match img.save_with_format(destination.path(), image::ImageFormat::Jpeg) {
                    Ok(()) => completer.captured(destination),
                    Err(e) => completer.complete(Err(SnapError::CaptureFailed(e.to_string()))),
                }
            }
            MockShot::Cancel => completer.complete(Ok(CaptureOutcome::Cancelled)),
            MockShot::Fail(msg) => completer.complete(Err(SnapError::CaptureFailed(msg))),
            MockShot::Abandon => drop(completer),
        }
        ticket
    }
}
