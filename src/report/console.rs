use crate::report::report_model::SuiteReport;

// ============================================================================
// Console reporter — formatted terminal output
// ============================================================================

/// Format a suite report for terminal output.
///
/// Produces output like:
/// ```text
/// === Screen checks: Nightly regression ===
///
/// ✓ PASS  Compliance grid audit (4 steps, 2 expectations)
/// ✗ FAIL  Documents download (3 steps, 1 expectations)
///     [FAIL] Step 2: download 'Q3 Policy.pdf' — HTTP 404
///
/// === Results: 1 passed, 1 failed (2 total) ===
/// ```
pub fn format_console_report(report: &SuiteReport) -> String {
    let mut out = String::new();

    out.push_str(&format!("=== Screen checks: {} ===\n\n", report.suite_name));

    for result in &report.check_results {
        let expectation_count = result.expectation_results.len();
        let marker = if result.passed {
            "\u{2713} PASS"
        } else {
            "\u{2717} FAIL"
        };

        out.push_str(&format!(
            "{}  {} ({} steps, {} expectations)\n",
            marker, result.check_name, result.steps_run, expectation_count
        ));

        // Show error if the check died on an execution error
        if let Some(ref error) = result.error {
            out.push_str(&format!("    [ERROR] {}\n", error));
        }

        // Show failed expectations
        if !result.passed {
            for er in &result.expectation_results {
                if !er.passed {
                    let detail = er.message.as_deref().unwrap_or("expectation failed");
                    out.push_str(&format!(
                        "    [FAIL] Step {}: {} — {}\n",
                        er.step_index, er.description, detail
                    ));
                }
            }
        }
    }

    out.push_str(&format!(
        "\n=== Results: {} passed, {} failed ({} total)",
        report.passed, report.failed, report.total
    ));

    if let Some(ms) = report.duration_ms {
        let secs = ms as f64 / 1000.0;
        out.push_str(&format!(" in {:.1}s", secs));
    }

    out.push_str(" ===\n");

    out
}
