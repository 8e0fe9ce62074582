//! The upload test runner.
//!
//! One code path for every target: validate, make sure the file is readable,
//! optionally check `/health`, upload, then judge the response. Every failure
//! ends up in the returned report; nothing here panics or returns an error.

use std::path::{Path, PathBuf};
use std::time::Instant;

use tracing::{debug, error, info, warn};
use wizy_api_client::api::open_video;
use wizy_api_client::ApiClient;
use wizy_core::{
    LogLevel, UploadError, UploadResponse, UploadResult, UploadTestConfig, UploadTestReport,
    Verdict,
};

/// Label for a run whose URL no longer belongs to its preset.
pub const CUSTOM_LABEL: &str = "custom";

#[derive(Clone, Debug, Default)]
pub struct RunOptions {
    /// Require `GET /health` to answer OK before uploading.
    pub check_health: bool,
}

/// Command-line values layered over a preset. `timeout` is `Some(None)` when
/// the timeout is explicitly disabled.
#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub url: Option<String>,
    pub file: Option<PathBuf>,
    pub user_id: Option<String>,
    pub description: Option<String>,
    pub timeout: Option<Option<u64>>,
}

impl ConfigOverrides {
    pub fn apply(&self, mut config: UploadTestConfig) -> UploadTestConfig {
        if let Some(url) = &self.url {
            if *url != config.endpoint_url {
                config.label = CUSTOM_LABEL.to_string();
            }
            config.endpoint_url = url.clone();
        }
        if let Some(file) = &self.file {
            config.file_path = file.clone();
        }
        if let Some(user_id) = &self.user_id {
            config.user_id = user_id.clone();
        }
        if let Some(description) = &self.description {
            config.description = description.clone();
        }
        if let Some(timeout) = self.timeout {
            config.timeout_seconds = timeout;
        }
        config
    }
}

/// Run one upload test and report the outcome.
pub async fn run_upload_test(config: &UploadTestConfig, options: &RunOptions) -> UploadTestReport {
    let started = Instant::now();
    let mut report = UploadTestReport::new(&config.label, &config.endpoint_url);

    if let Err(err) = execute(config, options, &mut report).await {
        log_failure(config, &err);
        report.verdict = Verdict::Fail;
        report.error = Some(err.to_string());
    }

    report.elapsed_ms = started.elapsed().as_millis() as u64;
    info!(
        target_label = %report.label,
        verdict = %report.verdict,
        status = ?report.status_code,
        elapsed_ms = report.elapsed_ms,
        "Upload test finished"
    );
    report
}

/// Run each config in order, one at a time.
pub async fn run_suite(configs: &[UploadTestConfig], options: &RunOptions) -> Vec<UploadTestReport> {
    let mut reports = Vec::with_capacity(configs.len());
    for config in configs {
        reports.push(run_upload_test(config, options).await);
    }
    reports
}

async fn execute(
    config: &UploadTestConfig,
    options: &RunOptions,
    report: &mut UploadTestReport,
) -> UploadResult<()> {
    config.validate()?;
    ensure_readable(&config.file_path).await?;

    let client = ApiClient::from_config(config)?;

    if options.check_health {
        let health = client.health(&config.endpoint_url).await?;
        if !health.is_ok() {
            return Err(UploadError::UnexpectedStatus {
                status: 200,
                body: format!("health status is {}", health.status),
            });
        }
        debug!(endpoint = %config.endpoint_url, "Health check passed");
    }

    info!(
        endpoint = %config.endpoint_url,
        file = %config.file_path.display(),
        timeout_secs = ?config.timeout_seconds,
        "Uploading test video"
    );

    let response = client
        .upload_video(&config.endpoint_url, &config.upload_request())
        .await?;

    report.status_code = Some(response.status);
    report.response_body = Some(response.body.clone());

    if !response.is_ok() {
        warn!(
            endpoint = %config.endpoint_url,
            status = response.status,
            "Upload rejected"
        );
        return Ok(());
    }

    let parsed = UploadResponse::from_body(response.status, &response.body)?;
    report.video = Some(parsed.data);
    report.verdict = Verdict::Pass;
    Ok(())
}

/// Fails with [`UploadError::FileAccess`] before any network activity.
async fn ensure_readable(path: &Path) -> UploadResult<()> {
    open_video(path).await.map(drop)
}

fn log_failure(config: &UploadTestConfig, err: &UploadError) {
    let code = err.error_code();
    let recoverable = err.is_recoverable();
    match err.log_level() {
        LogLevel::Debug => debug!(
            target_label = %config.label,
            error_code = code,
            recoverable,
            error = %err,
            "Upload test failed"
        ),
        LogLevel::Warn => warn!(
            target_label = %config.label,
            error_code = code,
            recoverable,
            error = %err,
            "Upload test failed"
        ),
        LogLevel::Error => error!(
            target_label = %config.label,
            error_code = code,
            recoverable,
            error = %err,
            "Upload test failed"
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wizy_core::UploadTarget;

    #[test]
    fn overrides_replace_only_given_values() {
        let overrides = ConfigOverrides {
            url: Some("http://127.0.0.1:8080/upload".to_string()),
            file: Some(PathBuf::from("clip.mp4")),
            ..Default::default()
        };
        let config = overrides.apply(UploadTarget::Localhost.preset(None));
        assert_eq!(config.endpoint_url, "http://127.0.0.1:8080/upload");
        assert_eq!(config.label, CUSTOM_LABEL);
        assert_eq!(config.file_path, PathBuf::from("clip.mp4"));
        assert_eq!(config.user_id, "test-user-123");
        assert_eq!(config.timeout_seconds, Some(120));
    }

    #[test]
    fn preset_url_or_file_only_keeps_preset_label() {
        let preset = UploadTarget::LocalhostHls.preset(None);
        let overrides = ConfigOverrides {
            url: Some(preset.endpoint_url.clone()),
            file: Some(PathBuf::from("clip.mp4")),
            ..Default::default()
        };
        let config = overrides.apply(preset);
        assert_eq!(config.label, "localhost-hls");
    }

    #[test]
    fn overrides_can_disable_timeout() {
        let overrides = ConfigOverrides {
            timeout: Some(None),
            ..Default::default()
        };
        let config = overrides.apply(UploadTarget::Ngrok.preset(None));
        assert_eq!(config.timeout_seconds, None);
    }

    #[tokio::test]
    async fn invalid_config_fails_without_touching_the_file() {
        let mut config = UploadTarget::Localhost.preset(None);
        config.endpoint_url = "ftp://localhost/upload".to_string();
        config.file_path = PathBuf::from("/definitely/not/here.mp4");

        let report = run_upload_test(&config, &RunOptions::default()).await;

        assert_eq!(report.verdict, Verdict::Fail);
        let error = report.error.unwrap();
        assert!(error.starts_with("Invalid configuration"), "{error}");
        assert_eq!(report.status_code, None);
    }
}
