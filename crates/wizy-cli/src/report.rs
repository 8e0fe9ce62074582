//! Console rendering for upload test reports.

use std::io::{self, Write};

use serde::Serialize;
use wizy_core::{ApiErrorBody, UploadTestConfig, UploadTestReport};

use crate::truncate_string;

const MAX_BODY_CHARS: usize = 4000;

pub fn render_banner(config: &UploadTestConfig, out: &mut impl Write) -> io::Result<()> {
    writeln!(
        out,
        "📤 Uploading test video to {} ({})...",
        config.label, config.endpoint_url
    )
}

pub fn render_report(report: &UploadTestReport, out: &mut impl Write) -> io::Result<()> {
    if let Some(status) = report.status_code {
        let icon = if status == 200 { "✅" } else { "❌" };
        writeln!(out, "\n{} Status Code: {}", icon, status)?;
        if let Some(body) = &report.response_body {
            writeln!(out, "📄 Response:\n{}", pretty_body(body))?;
            if status != 200 {
                if let Some(api_error) = ApiErrorBody::parse(body) {
                    writeln!(out, "⚠️ Server error: {}", api_error.error)?;
                }
            }
        }
    }

    if let Some(video) = &report.video {
        writeln!(out, "\n🎬 Video URL: {}", video.video_url)?;
        writeln!(out, "🖼️ Thumbnail URL: {}", video.thumbnail_url)?;
    }

    if let Some(error) = &report.error {
        writeln!(out, "\n❌ Error: {}", error)?;
    }

    if report.passed() {
        writeln!(out, "\n✅ TEST PASSED! ({} ms)", report.elapsed_ms)
    } else {
        writeln!(out, "\n❌ TEST FAILED! ({} ms)", report.elapsed_ms)
    }
}

pub fn render_summary(reports: &[UploadTestReport], out: &mut impl Write) -> io::Result<()> {
    let passed = reports.iter().filter(|r| r.passed()).count();
    writeln!(out, "\n{}/{} upload tests passed", passed, reports.len())?;
    for report in reports {
        writeln!(
            out,
            "  {} {} ({} ms)",
            report.verdict, report.label, report.elapsed_ms
        )?;
    }
    Ok(())
}

/// JSON envelope for a suite run.
#[derive(Debug, Serialize)]
pub struct SuiteSummary<'a> {
    pub passed: usize,
    pub total: usize,
    pub reports: &'a [UploadTestReport],
}

impl<'a> SuiteSummary<'a> {
    pub fn new(reports: &'a [UploadTestReport]) -> Self {
        Self {
            passed: reports.iter().filter(|r| r.passed()).count(),
            total: reports.len(),
            reports,
        }
    }

    pub fn all_passed(&self) -> bool {
        self.passed == self.total
    }
}

pub fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value)?;
    println!("{}", out);
    Ok(())
}

/// Pretty-printed JSON when the body parses, otherwise the raw text (truncated).
fn pretty_body(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| serde_json::to_string_pretty(&value).ok())
        .unwrap_or_else(|| truncate_string(body, MAX_BODY_CHARS))
}
