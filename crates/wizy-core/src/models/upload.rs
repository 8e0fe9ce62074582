use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};
use std::path::PathBuf;

use crate::config::FormLayout;
use crate::error::UploadError;

/// One multipart upload: the video part plus the `userId` and `description` text parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadRequest {
    pub file_path: PathBuf,
    pub form: FormLayout,
    pub user_id: String,
    pub description: String,
}

/// Successful body returned by `POST /upload`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub message: Option<String>,
    pub data: UploadedVideo,
}

/// The stored video row. Only the two URLs are required; everything else is
/// kept as-is for printing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UploadedVideo {
    pub video_url: String,
    pub thumbnail_url: String,
    #[serde(flatten)]
    pub extra: Map<String, JsonValue>,
}

impl UploadResponse {
    pub fn from_body(status: u16, body: &str) -> Result<Self, UploadError> {
        serde_json::from_str(body).map_err(|e| UploadError::MalformedResponse {
            status,
            reason: e.to_string(),
        })
    }
}

/// Failure body the upload service sends with 4xx/5xx responses.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApiErrorBody {
    pub error: String,
}

impl ApiErrorBody {
    /// `None` when the body is not JSON or has no `error` string.
    pub fn parse(body: &str) -> Option<Self> {
        serde_json::from_str(body).ok()
    }
}
