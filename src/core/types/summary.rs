use std::time::Duration;

use serde::{Serialize, Serializer};

use super::result::serialize_secs;
use crate::types::{CategoryResult, CoverageResult};

/// Pass/fail tallies across all categories of a run
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SummaryCounts {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub success_rate: f64,
}

impl SummaryCounts {
    pub fn from_results(results: &[CategoryResult]) -> Self {
        let total = results.len();
        let passed = results.iter().filter(|r| r.passed).count();
        let failed = total - passed;
        let success_rate = if total > 0 {
            (passed as f64 / total as f64) * 100.0
        } else {
            0.0
        };
        Self {
            total,
            passed,
            failed,
            success_rate,
        }
    }
}

// Categories serialize as a JSON object keyed by name, in invocation order
fn serialize_categories<S>(results: &[CategoryResult], serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.collect_map(results.iter().map(|r| (r.category.as_str(), r)))
}

/// Aggregate outcome of one `run` invocation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    #[serde(serialize_with = "serialize_secs")]
    pub total_duration: Duration,
    #[serde(serialize_with = "serialize_categories")]
    pub categories: Vec<CategoryResult>,
    pub summary: SummaryCounts,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coverage: Option<CoverageResult>,
    pub interrupted: bool,
}

impl RunSummary {
    /// Derive a summary from category results; performs no I/O
    pub fn aggregate(
        categories: Vec<CategoryResult>,
        coverage: Option<CoverageResult>,
        interrupted: bool,
    ) -> Self {
        let summary = SummaryCounts::from_results(&categories);
        let mut total_duration: Duration = categories.iter().map(|r| r.duration).sum();
        if let Some(coverage) = &coverage {
            total_duration += coverage.duration;
        }
        Self {
            total_duration,
            categories,
            summary,
            coverage,
            interrupted,
        }
    }

    pub fn get(&self, category: &str) -> Option<&CategoryResult> {
        self.categories.iter().find(|r| r.category == category)
    }

    pub fn category_names(&self) -> Vec<&str> {
        self.categories.iter().map(|r| r.category.as_str()).collect()
    }

    /// True when every category passed and coverage, if measured, met its threshold
    pub fn is_success(&self) -> bool {
        self.summary.failed == 0 && self.coverage.as_ref().is_none_or(|c| c.passed)
    }

    /// Process exit code for this run: 0 success, 1 failure, 2 interrupted
    pub fn exit_code(&self) -> i32 {
        if self.interrupted {
            2
        } else if self.is_success() {
            0
        } else {
            1
        }
    }
}
