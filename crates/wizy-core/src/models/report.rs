use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};

use super::upload::UploadedVideo;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum Verdict {
    Pass,
    Fail,
}

impl Display for Verdict {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Verdict::Pass => write!(f, "PASS"),
            Verdict::Fail => write!(f, "FAIL"),
        }
    }
}

/// Outcome of one upload test run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadTestReport {
    pub label: String,
    pub endpoint_url: String,
    pub verdict: Verdict,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_body: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video: Option<UploadedVideo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub elapsed_ms: u64,
}

impl UploadTestReport {
    pub fn new(label: impl Into<String>, endpoint_url: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            endpoint_url: endpoint_url.into(),
            verdict: Verdict::Fail,
            status_code: None,
            response_body: None,
            video: None,
            error: None,
            elapsed_ms: 0,
        }
    }

    pub fn passed(&self) -> bool {
        self.verdict == Verdict::Pass
    }
}
