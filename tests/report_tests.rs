use std::fs;
use std::time::Duration;

use chrono::{DateTime, TimeZone, Utc};
use pretty_assertions::assert_eq;
use suiterun::report::{ReportFormat, render, render_json, render_text, write_report};
use suiterun::types::{AppError, CategoryResult, CoverageResult, RunSummary};
use suiterun::ExecOutput;
use tempfile::tempdir;

fn output(code: i32, millis: u64, stderr: &str) -> ExecOutput {
    ExecOutput {
        exit_code: Some(code),
        stdout: String::new(),
        stderr: stderr.to_string(),
        duration: Duration::from_millis(millis),
        timed_out: false,
    }
}

fn generated_at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap()
}

fn mixed_summary() -> RunSummary {
    RunSummary::aggregate(
        vec![
            CategoryResult::from_output("unit", output(0, 500, "")),
            CategoryResult::from_output(
                "security",
                output(1, 200, "AssertionError: token leaked\n  at test_auth.py:12\n"),
            ),
        ],
        None,
        false,
    )
}

#[test]
fn text_report_is_deterministic() {
    let text = render_text(&mixed_summary(), generated_at());
    let expected = "\
Test Suite Report
=================
Generated: 2024-01-02 03:04:05 UTC
Categories: 2 | Passed: 1 | Failed: 1 | Success rate: 50.0%
Total duration: 0.70s

  unit      PASS         0.50s
  security  FAIL         0.20s
      error: AssertionError: token leaked at test_auth.py:12
";
    assert_eq!(text, expected);
    assert_eq!(text, render_text(&mixed_summary(), generated_at()));
}

#[test]
fn long_error_text_is_truncated() {
    let noisy = "E".repeat(400);
    let summary = RunSummary::aggregate(
        vec![CategoryResult::from_output("api", output(1, 10, &noisy))],
        None,
        false,
    );
    let text = render_text(&summary, generated_at());
    let error_line = text
        .lines()
        .find(|l| l.trim_start().starts_with("error:"))
        .expect("error line");
    let excerpt = error_line.trim_start().trim_start_matches("error: ");
    assert_eq!(excerpt, format!("{}...", "E".repeat(100)));
}

#[test]
fn unknown_category_appears_with_its_message() {
    let summary = RunSummary::aggregate(vec![CategoryResult::unknown("smoke")], None, false);
    let text = render_text(&summary, generated_at());
    assert!(text.contains("  smoke     UNKNOWN      0.00s"));
    assert!(text.contains("error: Unknown test category: smoke"));
}

#[test]
fn empty_run_reports_zero_rate() {
    let summary = RunSummary::aggregate(vec![], None, false);
    let text = render_text(&summary, generated_at());
    assert!(text.contains("Categories: 0 | Passed: 0 | Failed: 0 | Success rate: 0.0%"));
    assert!(text.contains("No categories were run."));
}

#[test]
fn coverage_line_is_rendered() {
    let mut stdout_output = output(0, 100, "");
    stdout_output.stdout = "TOTAL 10 1 90%".to_string();
    let coverage = CoverageResult::new(stdout_output, Some(90.0), 95.0);
    let summary = RunSummary::aggregate(
        vec![CategoryResult::from_output("unit", output(0, 100, ""))],
        Some(coverage),
        false,
    );
    let text = render_text(&summary, generated_at());
    assert!(text.contains("Coverage: 90.0% (threshold 95.0%) FAIL"));
    assert!(text.contains("Total duration: 0.20s"));
}

#[test]
fn json_report_keeps_order_and_counts() {
    let json = render_json(&mixed_summary(), generated_at()).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert_eq!(value["generated_at"], "2024-01-02T03:04:05+00:00");
    assert_eq!(value["summary"]["total"], 2);
    assert_eq!(value["summary"]["passed"], 1);
    assert_eq!(value["summary"]["failed"], 1);
    assert_eq!(value["summary"]["success_rate"], 50.0);
    assert_eq!(value["categories"]["security"]["exit_code"], 1);
    assert_eq!(value["categories"]["security"]["status"], "Failed");
    assert_eq!(value["categories"]["unit"]["passed"], true);
    assert!(json.find("\"unit\"").unwrap() < json.find("\"security\"").unwrap());
}

#[test]
fn render_dispatches_on_format() {
    let summary = mixed_summary();
    let text = render(ReportFormat::Text, &summary, generated_at()).unwrap();
    assert!(text.starts_with("Test Suite Report"));
    let json = render(ReportFormat::Json, &summary, generated_at()).unwrap();
    assert!(json.trim_start().starts_with('{'));
}

#[test]
fn report_is_written_to_file() {
    let dir = tempdir().expect("Failed to create temp directory");
    let path = dir.path().join("report.txt");
    let text = render_text(&mixed_summary(), generated_at());

    write_report(&path, &text).unwrap();

    assert_eq!(fs::read_to_string(&path).unwrap(), text);
}

#[test]
fn writing_into_missing_directory_surfaces_io_error() {
    let dir = tempdir().expect("Failed to create temp directory");
    let path = dir.path().join("missing").join("report.txt");

    let err = write_report(&path, "report").unwrap_err();

    match err {
        AppError::ReportWrite { path: failed, .. } => assert_eq!(failed, path),
        other => panic!("expected ReportWrite, got {other:?}"),
    }
    assert!(!path.exists());
}
