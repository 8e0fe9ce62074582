//! Configuration module
//!
//! An upload test is fully described by an [`UploadTestConfig`]. Configs start
//! from a named [`UploadTarget`] preset, then environment overrides are applied,
//! then the CLI applies its flags on top.

use std::env;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::Context;
use validator::Validate;

use crate::error::UploadError;
use crate::models::UploadRequest;

// Common constants
const DEFAULT_TIMEOUT_SECS: u64 = 120;
const DEFAULT_FILE_PATH: &str = "test.mp4";
const LOCAL_ORIGIN: &str = "http://localhost:3000";
const TUNNEL_ORIGIN: &str = "https://concludible-archidiaconal-monnie.ngrok-free.dev";

pub const ENV_UPLOAD_URL: &str = "WIZY_UPLOAD_URL";
pub const ENV_UPLOAD_FILE: &str = "WIZY_UPLOAD_FILE";
pub const ENV_USER_ID: &str = "WIZY_USER_ID";
pub const ENV_DESCRIPTION: &str = "WIZY_DESCRIPTION";
pub const ENV_TIMEOUT_SECS: &str = "WIZY_UPLOAD_TIMEOUT_SECS";
pub const ENV_TUNNEL_URL: &str = "WIZY_TUNNEL_URL";

/// How the video is presented inside the multipart body.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FormLayout {
    pub field_name: String,
    pub upload_filename: String,
    pub content_type: String,
}

impl Default for FormLayout {
    fn default() -> Self {
        Self {
            field_name: "video".to_string(),
            upload_filename: "test.mp4".to_string(),
            content_type: "video/mp4".to_string(),
        }
    }
}

/// Everything one upload test needs.
#[derive(Clone, Debug, Validate)]
pub struct UploadTestConfig {
    #[validate(length(min = 1, message = "Label must not be empty"))]
    pub label: String,
    #[validate(url(message = "Invalid endpoint URL"))]
    #[validate(length(max = 2048, message = "URL must be at most 2048 characters"))]
    pub endpoint_url: String,
    pub file_path: PathBuf,
    #[validate(length(
        min = 1,
        max = 256,
        message = "userId must be between 1 and 256 characters"
    ))]
    pub user_id: String,
    #[validate(length(max = 1000, message = "Description must be at most 1000 characters"))]
    pub description: String,
    /// `None` disables the client-side timeout.
    #[validate(range(min = 1, max = 3600, message = "Timeout must be between 1 and 3600 seconds"))]
    pub timeout_seconds: Option<u64>,
    pub form: FormLayout,
}

impl UploadTestConfig {
    pub fn new(label: impl Into<String>, endpoint_url: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            endpoint_url: endpoint_url.into(),
            file_path: PathBuf::from(DEFAULT_FILE_PATH),
            user_id: "test-user-123".to_string(),
            description: String::new(),
            timeout_seconds: Some(DEFAULT_TIMEOUT_SECS),
            form: FormLayout::default(),
        }
    }

    /// Preset defaults for `target`, with `WIZY_*` environment overrides applied.
    /// Loads `.env` first when present.
    pub fn from_env(target: UploadTarget) -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        Self::resolve(target, |key| env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) but reads overrides through `lookup`.
    pub fn resolve<F>(target: UploadTarget, lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let tunnel_origin = if target.uses_tunnel() {
            lookup(ENV_TUNNEL_URL).filter(|v| !v.trim().is_empty())
        } else {
            None
        };
        target
            .preset(tunnel_origin.as_deref())
            .apply_overrides(lookup)
    }

    pub fn apply_overrides<F>(mut self, lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_UPLOAD_URL) {
            self.endpoint_url = url;
        }
        if let Some(path) = lookup(ENV_UPLOAD_FILE) {
            self.file_path = PathBuf::from(path);
        }
        if let Some(user_id) = lookup(ENV_USER_ID) {
            self.user_id = user_id;
        }
        if let Some(description) = lookup(ENV_DESCRIPTION) {
            self.description = description;
        }
        if let Some(raw) = lookup(ENV_TIMEOUT_SECS) {
            self.timeout_seconds = parse_timeout(&raw)
                .with_context(|| format!("{} must be a number of seconds or 'none'", ENV_TIMEOUT_SECS))?;
        }
        Ok(self)
    }

    pub fn validate(&self) -> Result<(), UploadError> {
        Validate::validate(self).map_err(|e| UploadError::InvalidConfig(e.to_string()))?;

        let scheme = self
            .endpoint_url
            .split_once("://")
            .map(|(scheme, _)| scheme.to_ascii_lowercase())
            .unwrap_or_default();
        if scheme != "http" && scheme != "https" {
            return Err(UploadError::InvalidConfig(format!(
                "endpoint URL must use http or https: {}",
                self.endpoint_url
            )));
        }

        Ok(())
    }

    /// Fresh request for one invocation.
    pub fn upload_request(&self) -> UploadRequest {
        UploadRequest {
            file_path: self.file_path.clone(),
            form: self.form.clone(),
            user_id: self.user_id.clone(),
            description: self.description.clone(),
        }
    }
}

/// `0`, `none` and the empty string disable the timeout.
pub fn parse_timeout(raw: &str) -> Result<Option<u64>, anyhow::Error> {
    let raw = raw.trim();
    if raw.is_empty() || raw.eq_ignore_ascii_case("none") {
        return Ok(None);
    }
    let secs = raw
        .parse::<u64>()
        .with_context(|| format!("invalid timeout: {}", raw))?;
    Ok(timeout_from_secs(secs))
}

/// A timeout of `0` seconds means no timeout.
pub fn timeout_from_secs(secs: u64) -> Option<u64> {
    (secs > 0).then_some(secs)
}

/// Named endpoints the runner knows about.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UploadTarget {
    Localhost,
    Ngrok,
    Automated,
    LocalhostHls,
}

impl UploadTarget {
    pub const ALL: [UploadTarget; 4] = [
        UploadTarget::Localhost,
        UploadTarget::Ngrok,
        UploadTarget::Automated,
        UploadTarget::LocalhostHls,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            UploadTarget::Localhost => "localhost",
            UploadTarget::Ngrok => "ngrok",
            UploadTarget::Automated => "automated",
            UploadTarget::LocalhostHls => "localhost-hls",
        }
    }

    pub fn uses_tunnel(&self) -> bool {
        matches!(self, UploadTarget::Ngrok | UploadTarget::Automated)
    }

    /// Default config for this target. `tunnel_origin` replaces the built-in
    /// public tunnel host for targets that go through it.
    pub fn preset(&self, tunnel_origin: Option<&str>) -> UploadTestConfig {
        let tunnel = tunnel_origin
            .unwrap_or(TUNNEL_ORIGIN)
            .trim_end_matches('/')
            .to_string();

        match self {
            UploadTarget::Localhost => UploadTestConfig {
                user_id: "test-user-123".to_string(),
                description: "Localhost test upload".to_string(),
                ..UploadTestConfig::new("localhost", format!("{}/upload", LOCAL_ORIGIN))
            },
            UploadTarget::Ngrok => UploadTestConfig {
                user_id: "test-user-ngrok".to_string(),
                description: "Ngrok public endpoint test".to_string(),
                ..UploadTestConfig::new("ngrok", format!("{}/upload", tunnel))
            },
            UploadTarget::Automated => UploadTestConfig {
                user_id: "test-user-123".to_string(),
                description: "Automated test upload".to_string(),
                timeout_seconds: None,
                ..UploadTestConfig::new("automated", format!("{}/upload", tunnel))
            },
            UploadTarget::LocalhostHls => UploadTestConfig {
                user_id: "test-user".to_string(),
                description: "High Quality Thumbnail Test".to_string(),
                ..UploadTestConfig::new("localhost-hls", format!("{}/upload-hls", LOCAL_ORIGIN))
            },
        }
    }
}

impl Display for UploadTarget {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.pad(self.name())
    }
}

impl FromStr for UploadTarget {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "localhost" | "local" => Ok(UploadTarget::Localhost),
            "ngrok" | "tunnel" => Ok(UploadTarget::Ngrok),
            "automated" => Ok(UploadTarget::Automated),
            "localhost-hls" | "hls" => Ok(UploadTarget::LocalhostHls),
            other => Err(format!(
                "unknown target '{}'. Must be: localhost, ngrok, automated, or localhost-hls",
                other
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn localhost_preset_matches_manual_script() {
        let config = UploadTarget::Localhost.preset(None);
        assert_eq!(config.endpoint_url, "http://localhost:3000/upload");
        assert_eq!(config.file_path, PathBuf::from("test.mp4"));
        assert_eq!(config.user_id, "test-user-123");
        assert_eq!(config.description, "Localhost test upload");
        assert_eq!(config.timeout_seconds, Some(120));
        assert_eq!(config.form, FormLayout::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn automated_preset_has_no_timeout() {
        let config = UploadTarget::Automated.preset(None);
        assert_eq!(config.timeout_seconds, None);
        assert!(config.endpoint_url.starts_with("https://"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn tunnel_override_only_affects_tunnel_targets() {
        let lookup = lookup_from(&[(ENV_TUNNEL_URL, "https://example.test/")]);
        let ngrok = UploadTestConfig::resolve(UploadTarget::Ngrok, &lookup).unwrap();
        let local = UploadTestConfig::resolve(UploadTarget::Localhost, &lookup).unwrap();
        assert_eq!(ngrok.endpoint_url, "https://example.test/upload");
        assert_eq!(local.endpoint_url, "http://localhost:3000/upload");
    }

    #[test]
    fn env_overrides_replace_preset_values() {
        let lookup = lookup_from(&[
            (ENV_UPLOAD_URL, "http://127.0.0.1:9000/upload"),
            (ENV_UPLOAD_FILE, "/tmp/clip.mp4"),
            (ENV_USER_ID, "ci-user"),
            (ENV_DESCRIPTION, "CI upload"),
            (ENV_TIMEOUT_SECS, "30"),
        ]);
        let config = UploadTestConfig::resolve(UploadTarget::Localhost, lookup).unwrap();
        assert_eq!(config.endpoint_url, "http://127.0.0.1:9000/upload");
        assert_eq!(config.file_path, PathBuf::from("/tmp/clip.mp4"));
        assert_eq!(config.user_id, "ci-user");
        assert_eq!(config.description, "CI upload");
        assert_eq!(config.timeout_seconds, Some(30));
    }

    #[test]
    fn timeout_override_can_disable_timeout() {
        let lookup = lookup_from(&[(ENV_TIMEOUT_SECS, "none")]);
        let config = UploadTestConfig::resolve(UploadTarget::Localhost, lookup).unwrap();
        assert_eq!(config.timeout_seconds, None);
    }

    #[test]
    fn unparsable_timeout_is_an_error() {
        let lookup = lookup_from(&[(ENV_TIMEOUT_SECS, "two minutes")]);
        assert!(UploadTestConfig::resolve(UploadTarget::Localhost, lookup).is_err());
    }

    #[test]
    fn parse_timeout_values() {
        assert_eq!(parse_timeout("120").unwrap(), Some(120));
        assert_eq!(parse_timeout(" 5 ").unwrap(), Some(5));
        assert_eq!(parse_timeout("0").unwrap(), None);
        assert_eq!(parse_timeout("NONE").unwrap(), None);
        assert_eq!(parse_timeout("").unwrap(), None);
        assert!(parse_timeout("-1").is_err());
    }

    #[test]
    fn zero_seconds_disables_timeout_and_passes_validation() {
        assert_eq!(timeout_from_secs(0), None);
        assert_eq!(timeout_from_secs(45), Some(45));

        let mut config = UploadTarget::Localhost.preset(None);
        config.timeout_seconds = timeout_from_secs(0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validate_rejects_non_http_scheme() {
        let config = UploadTestConfig::new("ftp", "ftp://localhost/upload");
        let err = config.validate().unwrap_err();
        assert!(matches!(err, UploadError::InvalidConfig(_)));
        assert!(err.to_string().contains("http or https"));
    }

    #[test]
    fn validate_rejects_garbage_url() {
        let config = UploadTestConfig::new("bad", "not a url");
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_empty_user_id_and_zero_timeout() {
        let mut config = UploadTarget::Localhost.preset(None);
        config.user_id = String::new();
        assert!(config.validate().is_err());

        let mut config = UploadTarget::Localhost.preset(None);
        config.timeout_seconds = Some(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn upload_request_copies_fields() {
        let config = UploadTarget::LocalhostHls.preset(None);
        let request = config.upload_request();
        assert_eq!(request.file_path, config.file_path);
        assert_eq!(request.user_id, "test-user");
        assert_eq!(request.description, "High Quality Thumbnail Test");
        assert_eq!(request.form.field_name, "video");
    }

    #[test]
    fn target_names_round_trip_through_from_str() {
        for target in UploadTarget::ALL {
            assert_eq!(target.name().parse::<UploadTarget>().unwrap(), target);
        }
        assert_eq!("HLS".parse::<UploadTarget>().unwrap(), UploadTarget::LocalhostHls);
        assert!("staging".parse::<UploadTarget>().is_err());
    }
}
