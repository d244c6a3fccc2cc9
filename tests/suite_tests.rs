use pagewalk::suite::{
    check_model::{CheckResult, CheckSpec, CheckStep, Expectation, ExpectationResult},
    context::CheckContext,
};

// =========================================================================
// Helpers
// =========================================================================

fn sample_check_spec() -> CheckSpec {
    CheckSpec {
        name: "Compliance grid audit".into(),
        start_path: "/compliance".into(),
        steps: vec![
            CheckStep::SignIn {
                username: "auditor@test.com".into(),
                password: "secret123".into(),
            },
            CheckStep::OpenSection {
                label: "Compliance".into(),
            },
            CheckStep::Wait { duration_ms: 1000 },
            CheckStep::GridAudit {
                expected_total: None,
                use_badge: true,
                strict: false,
            },
            CheckStep::Assert {
                expectations: vec![
                    Expectation::UrlContains {
                        expected: "/compliance".into(),
                    },
                    Expectation::ElementVisible {
                        selector: ".compliance-grid".into(),
                    },
                ],
            },
        ],
    }
}

// =========================================================================
// CheckSpec serde roundtrip tests
// =========================================================================

#[test]
fn check_spec_yaml_roundtrip() {
    let spec = sample_check_spec();

    let yaml = serde_yaml::to_string(&spec).expect("Failed to serialize CheckSpec to YAML");
    let deserialized: CheckSpec =
        serde_yaml::from_str(&yaml).expect("Failed to deserialize CheckSpec from YAML");

    assert_eq!(spec, deserialized, "Roundtrip must produce identical spec");
}

#[test]
fn check_spec_json_roundtrip() {
    let spec = sample_check_spec();

    let json = serde_json::to_string_pretty(&spec).expect("Failed to serialize to JSON");
    let deserialized: CheckSpec =
        serde_json::from_str(&json).expect("Failed to deserialize from JSON");

    assert_eq!(spec, deserialized, "JSON roundtrip must produce identical spec");
}

#[test]
fn check_spec_deserialize_from_yaml_string() {
    let yaml = r#"
name: "Documents download"
start_path: "/documents"
steps:
  - action: sign_in
    username: "user@test.com"
    password: "secret123"
  - action: select_folder
    folder: "Policies"
  - action: verify_download
    document: "Q3 Policy.pdf"
    min_bytes: 1024
  - action: grid_audit
  - action: assert
    expectations:
      - type: url_contains
        expected: "/documents"
      - type: element_count
        selector: ".document-row"
        expected: 12
      - type: field_equals
        label: "Account Owner"
        expected: "Jordan"
"#;

    let spec: CheckSpec = serde_yaml::from_str(yaml).expect("Failed to parse YAML");

    assert_eq!(spec.name, "Documents download");
    assert_eq!(spec.start_path, "/documents");
    assert_eq!(spec.steps.len(), 5);

    match &spec.steps[2] {
        CheckStep::VerifyDownload { document, min_bytes } => {
            assert_eq!(document, "Q3 Policy.pdf");
            assert_eq!(*min_bytes, 1024);
        }
        other => panic!("Expected verify_download, got {:?}", other),
    }

    // grid_audit defaults: badge-driven, lenient
    match &spec.steps[3] {
        CheckStep::GridAudit {
            expected_total,
            use_badge,
            strict,
        } => {
            assert_eq!(*expected_total, None);
            assert!(*use_badge);
            assert!(!*strict);
        }
        other => panic!("Expected grid_audit, got {:?}", other),
    }

    match &spec.steps[4] {
        CheckStep::Assert { expectations } => {
            assert_eq!(expectations.len(), 3);
        }
        other => panic!("Expected assert, got {:?}", other),
    }
}

#[test]
fn verify_download_min_bytes_defaults_to_one() {
    let yaml = r#"
name: "Minimal download"
start_path: "/documents"
steps:
  - action: verify_download
    document: "readme.txt"
"#;

    let spec: CheckSpec = serde_yaml::from_str(yaml).expect("Failed to parse YAML");
    match &spec.steps[0] {
        CheckStep::VerifyDownload { min_bytes, .. } => assert_eq!(*min_bytes, 1),
        other => panic!("Expected verify_download, got {:?}", other),
    }
}

// =========================================================================
// CheckContext accounting
// =========================================================================

fn result(step_index: usize, passed: bool) -> ExpectationResult {
    ExpectationResult {
        step_index,
        description: "sample".into(),
        passed,
        actual: None,
        message: if passed { None } else { Some("failed".into()) },
    }
}

#[test]
fn context_counts_passes_and_failures() {
    let mut ctx = CheckContext::new();
    assert!(ctx.all_passed(), "empty context passes vacuously");

    ctx.record(result(0, true));
    ctx.record_all(vec![result(1, false), result(1, true)]);

    assert_eq!(ctx.pass_count(), 2);
    assert_eq!(ctx.fail_count(), 1);
    assert!(!ctx.all_passed());
}

#[test]
fn check_result_serializes() {
    let check = CheckResult {
        check_name: "Login".into(),
        passed: false,
        steps_run: 2,
        expectation_results: vec![result(1, false)],
        error: Some("Step 1 failed: boom".into()),
    };

    let json = serde_json::to_string(&check).expect("CheckResult must serialize");
    assert!(json.contains("\"check_name\":\"Login\""));
    let back: CheckResult = serde_json::from_str(&json).expect("and deserialize");
    assert_eq!(back.steps_run, 2);
}
