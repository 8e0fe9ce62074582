//! Domain methods for the upload service client.

use crate::{ApiClient, RawResponse};
use reqwest::multipart::{Form, Part};
use reqwest::{Body, Url};
use std::io;
use std::path::Path;
use tokio_util::io::ReaderStream;
use wizy_core::{HealthResponse, UploadError, UploadRequest, UploadResult};

impl ApiClient {
    /// Upload a video as `multipart/form-data`: the file part first, then the
    /// `userId` and `description` text parts.
    ///
    /// The file is opened before anything touches the network, so a missing file
    /// fails without a request. It is streamed from disk and closed once the
    /// request body is dropped, whether the request succeeded or not.
    pub async fn upload_video(&self, url: &str, request: &UploadRequest) -> UploadResult<RawResponse> {
        let (file, length) = open_video(&request.file_path).await?;

        let part = Part::stream_with_length(Body::wrap_stream(ReaderStream::new(file)), length)
            .file_name(request.form.upload_filename.clone())
            .mime_str(&request.form.content_type)
            .map_err(|e| {
                UploadError::InvalidConfig(format!(
                    "Invalid content type {}: {}",
                    request.form.content_type, e
                ))
            })?;

        let form = Form::new()
            .part(request.form.field_name.clone(), part)
            .text("userId", request.user_id.clone())
            .text("description", request.description.clone());

        tracing::debug!(
            url = %url,
            file = %request.file_path.display(),
            bytes = length,
            "Sending multipart upload"
        );

        self.post_multipart(url, form).await
    }

    /// Check the service's `GET /health` on the same origin as `upload_url`.
    pub async fn health(&self, upload_url: &str) -> UploadResult<HealthResponse> {
        let url = health_url(upload_url)?;
        self.get(&url).await
    }
}

/// Open `path` for upload and return it with its length. Anything that is not a
/// readable regular file is a [`UploadError::FileAccess`].
pub async fn open_video(path: &Path) -> UploadResult<(tokio::fs::File, u64)> {
    let file_access = |source: io::Error| UploadError::FileAccess {
        path: path.to_path_buf(),
        source,
    };

    let file = tokio::fs::File::open(path).await.map_err(file_access)?;
    let metadata = file.metadata().await.map_err(file_access)?;
    if !metadata.is_file() {
        return Err(file_access(io::Error::new(
            io::ErrorKind::InvalidInput,
            "not a regular file",
        )));
    }
    Ok((file, metadata.len()))
}

/// `http://host:3000/upload` -> `http://host:3000/health`.
pub fn health_url(upload_url: &str) -> UploadResult<String> {
    let mut url = Url::parse(upload_url)
        .map_err(|e| UploadError::InvalidConfig(format!("Invalid URL {}: {}", upload_url, e)))?;
    url.set_path("/health");
    url.set_query(None);
    url.set_fragment(None);
    Ok(url.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_url_uses_origin() {
        assert_eq!(
            health_url("http://localhost:3000/upload").unwrap(),
            "http://localhost:3000/health"
        );
        assert_eq!(
            health_url("https://tunnel.example.dev/upload-hls?x=1#frag").unwrap(),
            "https://tunnel.example.dev/health"
        );
    }

    #[test]
    fn health_url_rejects_garbage() {
        assert!(matches!(
            health_url("localhost upload"),
            Err(UploadError::InvalidConfig(_))
        ));
    }
}
