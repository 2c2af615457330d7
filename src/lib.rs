//! snapcam library - capture a photo and preview it with bounded memory.
//!
//! This library exposes the core of the `snap` CLI for tests and embedders.
//!
//! # Modules
//!
//! - `media`: image handles, dimensions, decoded images, and the codec trait
//! - `loader`: downsample factor selection and preview loading
//! - `storage`: the photo directory and file naming
//! - `capture`: capture sources and their async result channel
//! - `display`: surfaces that show decoded images
//! - `session`: capture-then-preview workflow
//! - `config`: settings files
//! - `error`: error types with user-recoverable hints
//! - `output`: output mode abstraction (robot/human)
#![forbid(unsafe_code)]

pub mod capture;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod loader;
pub mod logging;
pub mod media;
pub mod output;
pub mod session;
pub mod storage;
pub mod theme;
