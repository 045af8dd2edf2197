//! Console output for run progress and the final report.
//!
//! Each kind of output has a `format_*` function returning lines (pure, no
//! I/O) and a `print_*` wrapper that writes them to stdout. Tests assert on
//! the formatted lines.

use crate::fetch::DownloadOutcome;
use crate::format::FormatPolicy;
use crate::quality::QualityTier;
use crate::run::{RunEvent, RunReport};

fn policy_label(policy: FormatPolicy) -> &'static str {
    match policy {
        FormatPolicy::Any => "any",
        FormatPolicy::JpegOnly => "jpg",
        FormatPolicy::TransparentPngOnly => "png with transparency",
        FormatPolicy::AnyExceptPng => "any except png",
    }
}

fn quality_label(tier: QualityTier) -> &'static str {
    match tier {
        QualityTier::Any => "any",
        QualityTier::Medium => "medium",
        QualityTier::High => "high",
    }
}

/// Format one progress event as console lines.
pub fn format_run_event(event: &RunEvent) -> Vec<String> {
    match event {
        RunEvent::KeywordStarted { keyword } => {
            vec![format!("Searching images for: {}", keyword)]
        }
        RunEvent::SearchFailed { keyword, error } => {
            vec![format!("Search failed for {}: {}", keyword, error)]
        }
        RunEvent::CandidateRejected { base_name, outcome } => {
            let reason = match outcome {
                DownloadOutcome::RejectedQuality { width, height } => {
                    format!("quality too low ({}x{})", width, height)
                }
                DownloadOutcome::RejectedFormat => "format not allowed".to_string(),
                DownloadOutcome::RejectedCorrupt => "saved file failed validation".to_string(),
                DownloadOutcome::RejectedHttp(status) => format!("HTTP status {}", status),
                DownloadOutcome::Failed(msg) => msg.clone(),
                DownloadOutcome::Saved(_) => unreachable!("saved outcomes are not rejections"),
            };
            vec![format!(
                "Failed attempt for {}: {}. Trying next image.",
                base_name, reason
            )]
        }
        RunEvent::Saved { path, .. } => {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string());
            vec![format!("Image saved and validated: {}", name)]
        }
        RunEvent::KeywordExhausted {
            keyword,
            format,
            quality,
        } => {
            vec![format!(
                "No valid image in {} format with {} quality for: {}",
                policy_label(*format),
                quality_label(*quality),
                keyword
            )]
        }
    }
}

/// Format the final report.
pub fn format_report(report: &RunReport) -> Vec<String> {
    let mut lines = vec![
        String::new(),
        "Final Report".to_string(),
        format!("Images downloaded: {}", report.downloaded),
        format!(
            "Keywords without a valid image: {}",
            report.failed_keywords.len()
        ),
    ];
    if !report.failed_keywords.is_empty() {
        lines.push(format!(
            "Failed keywords: {}",
            report.failed_keywords.join(", ")
        ));
    }
    lines.push(format!("Keywords processed: {}", report.keywords_processed));
    lines
}

pub fn print_run_event(event: &RunEvent) {
    for line in format_run_event(event) {
        println!("{}", line);
    }
}

pub fn print_report(report: &RunReport) {
    for line in format_report(report) {
        println!("{}", line);
    }
}
