use std::fmt::Write as _;
use std::fs;
use std::io::Write;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Serialize;
use strum::{Display, EnumString};

use crate::types::{AppError, AppResult, CoverageResult, RunSummary};

/// Characters of captured error text shown for a failing category
pub const ERROR_EXCERPT_CHARS: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    generated_at: String,
    #[serde(flatten)]
    summary: &'a RunSummary,
}

pub fn render(
    format: ReportFormat,
    summary: &RunSummary,
    generated_at: DateTime<Utc>,
) -> AppResult<String> {
    match format {
        ReportFormat::Text => Ok(render_text(summary, generated_at)),
        ReportFormat::Json => render_json(summary, generated_at),
    }
}

/// Human-readable report; identical input and timestamp give identical text
pub fn render_text(summary: &RunSummary, generated_at: DateTime<Utc>) -> String {
    let counts = &summary.summary;
    let name_width = summary
        .categories
        .iter()
        .map(|r| r.category.chars().count())
        .max()
        .unwrap_or(0)
        .max(8);

    let mut out = String::new();
    let _ = writeln!(out, "Test Suite Report");
    let _ = writeln!(out, "=================");
    let _ = writeln!(
        out,
        "Generated: {}",
        generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    );
    let _ = writeln!(
        out,
        "Categories: {} | Passed: {} | Failed: {} | Success rate: {:.1}%",
        counts.total, counts.passed, counts.failed, counts.success_rate
    );
    let _ = writeln!(
        out,
        "Total duration: {:.2}s",
        summary.total_duration.as_secs_f64()
    );
    if summary.interrupted {
        let _ = writeln!(out, "Run interrupted before all categories completed");
    }
    let _ = writeln!(out);

    if summary.categories.is_empty() {
        let _ = writeln!(out, "No categories were run.");
    }
    for result in &summary.categories {
        let _ = writeln!(
            out,
            "  {:<width$}  {:<7}  {:>8.2}s",
            result.category,
            result.status.label(),
            result.duration.as_secs_f64(),
            width = name_width
        );
        if !result.passed {
            let excerpt = error_excerpt(result.error_text(), ERROR_EXCERPT_CHARS);
            if !excerpt.is_empty() {
                let _ = writeln!(out, "      error: {excerpt}");
            }
        }
    }

    if let Some(coverage) = &summary.coverage {
        let _ = writeln!(out);
        let _ = writeln!(out, "{}", coverage_line(coverage));
        if !coverage.passed && coverage.exit_code != 0 {
            let text = if coverage.stderr.trim().is_empty() {
                &coverage.stdout
            } else {
                &coverage.stderr
            };
            let excerpt = error_excerpt(text, ERROR_EXCERPT_CHARS);
            if !excerpt.is_empty() {
                let _ = writeln!(out, "      error: {excerpt}");
            }
        }
    }

    out
}

pub fn render_json(summary: &RunSummary, generated_at: DateTime<Utc>) -> AppResult<String> {
    let report = JsonReport {
        generated_at: generated_at.to_rfc3339(),
        summary,
    };
    Ok(serde_json::to_string_pretty(&report)?)
}

fn coverage_line(coverage: &CoverageResult) -> String {
    let verdict = if coverage.passed { "PASS" } else { "FAIL" };
    match coverage.percent {
        Some(percent) => format!(
            "Coverage: {:.1}% (threshold {:.1}%) {}",
            percent, coverage.threshold, verdict
        ),
        None => format!(
            "Coverage: unavailable (threshold {:.1}%) {}",
            coverage.threshold, verdict
        ),
    }
}

/// First `max_chars` characters of `text` on one line, with `...` when cut
pub fn error_excerpt(text: &str, max_chars: usize) -> String {
    let flattened = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if flattened.chars().count() <= max_chars {
        return flattened;
    }
    let mut excerpt: String = flattened.chars().take(max_chars).collect();
    excerpt.push_str("...");
    excerpt
}

/// Write a rendered report to `path`; the file is closed before returning
pub fn write_report(path: &Path, contents: &str) -> AppResult<()> {
    let write = || -> std::io::Result<()> {
        let mut file = fs::File::create(path)?;
        file.write_all(contents.as_bytes())?;
        file.flush()
    };
    write().map_err(|source| AppError::ReportWrite {
        path: path.to_path_buf(),
        source,
    })
}
