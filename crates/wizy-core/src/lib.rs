//! Wizy Core Library
//!
//! This crate provides the configuration record, target presets, error types and
//! wire models shared by the upload client and the test runner CLI.

pub mod config;
pub mod error;
pub mod models;

// Re-export commonly used types
pub use config::{FormLayout, UploadTarget, UploadTestConfig};
pub use error::{LogLevel, TransportErrorKind, UploadError, UploadResult};
pub use models::{
    ApiErrorBody, HealthResponse, UploadRequest, UploadResponse, UploadTestReport, UploadedVideo,
    Verdict,
};
