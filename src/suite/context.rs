use crate::suite::check_model::ExpectationResult;

/// Tracks the execution state and results of a running check.
#[derive(Debug, Clone, Default)]
pub struct CheckContext {
    /// Current step index (0-based)
    pub current_step: usize,

    /// All expectation results collected during execution
    pub expectation_results: Vec<ExpectationResult>,
}

impl CheckContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, result: ExpectationResult) {
        self.expectation_results.push(result);
    }

    pub fn record_all(&mut self, results: Vec<ExpectationResult>) {
        self.expectation_results.extend(results);
    }

    pub fn all_passed(&self) -> bool {
        self.expectation_results.iter().all(|r| r.passed)
    }

    pub fn pass_count(&self) -> usize {
        self.expectation_results.iter().filter(|r| r.passed).count()
    }

    pub fn fail_count(&self) -> usize {
        self.expectation_results.iter().filter(|r| !r.passed).count()
    }
}
