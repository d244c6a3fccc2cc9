use crate::report::report_model::SuiteReport;

// ============================================================================
// JUnit XML reporter — standard CI integration format
// ============================================================================

/// Generate a JUnit XML report for CI systems (Jenkins, GitHub Actions,
/// GitLab CI).
pub fn generate_junit_xml(report: &SuiteReport) -> String {
    let time_attr = report
        .duration_ms
        .map(|ms| format!(" time=\"{:.3}\"", ms as f64 / 1000.0))
        .unwrap_or_default();

    let mut cases = String::new();
    for result in &report.check_results {
        if result.passed {
            cases.push_str(&format!(
                "  <testcase name=\"{}\" classname=\"pagewalk\" />\n",
                escape_xml(&result.check_name)
            ));
        } else {
            let failed_expectations: Vec<String> = result
                .expectation_results
                .iter()
                .filter(|er| !er.passed)
                .map(|er| {
                    let msg = er.message.as_deref().unwrap_or("expectation failed");
                    format!("Step {}: {} — {}", er.step_index, er.description, msg)
                })
                .collect();

            let failure_count = failed_expectations.len();
            let error_detail = result
                .error
                .as_ref()
                .map(|e| format!("Error: {}", e))
                .unwrap_or_default();

            let mut body_parts = failed_expectations;
            if !error_detail.is_empty() {
                body_parts.push(error_detail);
            }
            let failure_body = body_parts.join("\n");

            let failure_message = if failure_count > 0 {
                format!("{} expectation(s) failed", failure_count)
            } else {
                "execution error".to_string()
            };

            cases.push_str(&format!(
                "  <testcase name=\"{name}\" classname=\"pagewalk\">\n    <failure message=\"{message}\" type=\"ExpectationFailure\">{body}</failure>\n  </testcase>\n",
                name = escape_xml(&result.check_name),
                message = escape_xml(&failure_message),
                body = escape_xml(&failure_body),
            ));
        }
    }

    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<testsuite name=\"{name}\" tests=\"{tests}\" failures=\"{failures}\"{time}>\n{cases}</testsuite>\n",
        name = escape_xml(&report.suite_name),
        tests = report.total,
        failures = report.failed,
        time = time_attr,
        cases = cases,
    )
}

/// Escape XML special characters.
pub fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
