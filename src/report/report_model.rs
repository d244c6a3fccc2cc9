use serde::{Deserialize, Serialize};

use crate::suite::check_model::CheckResult;

// ============================================================================
// Suite report — aggregates multiple CheckResult instances
// ============================================================================

/// Aggregated report for a suite of screen checks.
///
/// Built from a `Vec<CheckResult>` via `from_results()`. Consumed by the
/// console and JUnit reporters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuiteReport {
    pub suite_name: String,

    pub total: usize,
    pub passed: usize,
    pub failed: usize,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u128>,

    pub check_results: Vec<CheckResult>,
}

impl SuiteReport {
    /// Build a suite report from a list of check results.
    pub fn from_results(suite_name: &str, results: Vec<CheckResult>) -> Self {
        let total = results.len();
        let passed = results.iter().filter(|r| r.passed).count();
        let failed = total - passed;
        Self {
            suite_name: suite_name.to_string(),
            total,
            passed,
            failed,
            duration_ms: None,
            check_results: results,
        }
    }

    pub fn with_duration(mut self, duration_ms: u128) -> Self {
        self.duration_ms = Some(duration_ms);
        self
    }

    pub fn all_passed(&self) -> bool {
        self.failed == 0
    }
}
