pub mod health;
pub mod report;
pub mod upload;

pub use health::HealthResponse;
pub use report::{UploadTestReport, Verdict};
pub use upload::{ApiErrorBody, UploadRequest, UploadResponse, UploadedVideo};
