//! Shared test utilities for scanwatch integration tests.
//!
//! This module provides:
//! - `TestHarness` for isolated watch and temp directories
//! - Recording stand-ins for the uploader and progress reporter
//! - A minimal HTTP server that captures upload requests

pub mod harness;
pub mod http_stub;

#[allow(unused_imports)]
pub use harness::{RecordingProgress, RecordingUploader, TestHarness};
