use serde::{Deserialize, Serialize};

/// A complete screen regression check. Deserialized from YAML for human
/// review and execution.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CheckSpec {
    /// Human-readable name for this check
    pub name: String,

    /// Path (joined to the configured base URL) to open before the steps
    pub start_path: String,

    /// Ordered list of steps to execute
    pub steps: Vec<CheckStep>,
}

/// A single step in a screen check. Steps are intent-level: they map onto
/// page-object operations, not raw selectors.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum CheckStep {
    /// Sign in via the login screen
    SignIn {
        username: String,
        password: String,
    },

    /// Navigate to a path under the base URL
    Open {
        path: String,
    },

    /// Follow an app-shell navigation link by its visible label
    OpenSection {
        label: String,
    },

    /// Pick a folder in the documents screen's folder dropdown
    SelectFolder {
        folder: String,
    },

    /// Pick a report type in the reports screen's dropdown
    SelectReportType {
        report_type: String,
    },

    /// Run the selected report and optionally require a completion toast
    RunReport {
        expect_toast: Option<String>,
    },

    /// Verify a named document actually downloads
    VerifyDownload {
        document: String,
        #[serde(default = "default_min_bytes")]
        min_bytes: usize,
    },

    /// Verify the report CSV export downloads
    VerifyExport {
        #[serde(default = "default_min_bytes")]
        min_bytes: usize,
    },

    /// Traverse the compliance grid, reconciling against the header badge
    /// (or an explicit expected total)
    GridAudit {
        /// Explicit expected total; overrides the badge when set
        expected_total: Option<i64>,

        /// Read the expected total from the header badge
        #[serde(default = "default_true")]
        use_badge: bool,

        /// Whether an under-count fails the check (caller-decided policy)
        #[serde(default)]
        strict: bool,
    },

    /// Require a toast containing the given text to appear
    ExpectToast {
        contains: String,
    },

    /// Let the page settle
    Wait {
        duration_ms: u64,
    },

    /// Evaluate expectations against the current page state
    Assert {
        expectations: Vec<Expectation>,
    },
}

fn default_min_bytes() -> usize {
    1
}

fn default_true() -> bool {
    true
}

/// A single expectation to evaluate against the page.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Expectation {
    /// Current URL contains the expected substring
    UrlContains { expected: String },

    /// A specific element's text contains the expected string
    /// (canonicalized comparison)
    ElementText { selector: String, expected: String },

    /// A specific element is visible
    ElementVisible { selector: String },

    /// Count of matching elements equals expected
    ElementCount { selector: String, expected: u32 },

    /// A profile field with the given label holds the expected value
    FieldEquals { label: String, expected: String },
}

/// Result of evaluating a single expectation (or a step-level verification
/// such as a grid audit or a download check).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExpectationResult {
    /// Which step this result belongs to (0-indexed)
    pub step_index: usize,

    /// What was checked, for reporting
    pub description: String,

    pub passed: bool,

    /// Actual value found (for debugging failures)
    pub actual: Option<String>,

    /// Human-readable failure message
    pub message: Option<String>,
}

/// Result of running a complete check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckResult {
    pub check_name: String,

    /// Whether all steps and expectations passed
    pub passed: bool,

    /// Number of steps that were executed
    pub steps_run: usize,

    pub expectation_results: Vec<ExpectationResult>,

    /// Error message if the check died on an execution error
    /// (not an expectation failure)
    pub error: Option<String>,
}
