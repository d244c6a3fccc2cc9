use pagewalk::text::canonical::{canonicalize, digits_of, labels_match, text_fingerprint};

// =========================================================================
// canonicalize
// =========================================================================

#[test]
fn canonicalize_collapses_whitespace_and_case() {
    assert_eq!(
        canonicalize("  Compliance   Status \n"),
        Some("compliance status".to_string())
    );
}

#[test]
fn canonicalize_strips_nbsp_and_zero_width() {
    assert_eq!(
        canonicalize("Total\u{00a0}Records\u{200b}"),
        Some("total records".to_string())
    );
}

#[test]
fn canonicalize_empty_is_none() {
    assert_eq!(canonicalize(""), None);
    assert_eq!(canonicalize("   "), None);
    assert_eq!(canonicalize("\u{00a0}\u{200b}"), None);
}

// =========================================================================
// labels_match
// =========================================================================

#[test]
fn labels_match_is_fuzzy_containment() {
    assert!(labels_match("Status ", "status"));
    assert!(labels_match("Compliance Status", "status"));
    assert!(labels_match("status", "Compliance Status"));
    assert!(!labels_match("Status", "Owner"));
}

#[test]
fn labels_match_rejects_empty_sides() {
    assert!(!labels_match("", "status"));
    assert!(!labels_match("status", "   "));
}

// =========================================================================
// digits_of
// =========================================================================

#[test]
fn digits_of_extracts_first_run() {
    assert_eq!(digits_of("Showing 127 items"), Some(127));
    assert_eq!(digits_of("(42)"), Some(42));
    assert_eq!(digits_of("127 of 300"), Some(127));
    assert_eq!(digits_of("no records"), None);
    assert_eq!(digits_of(""), None);
}

// =========================================================================
// text_fingerprint
// =========================================================================

#[test]
fn fingerprint_is_stable_sha1_hex() {
    // Known SHA-1 of "abc"
    assert_eq!(text_fingerprint("abc"), "a9993e364706816aba3e25717850c26c9cd0d89d");
    assert_eq!(text_fingerprint("abc"), text_fingerprint("abc"));
    assert_ne!(text_fingerprint("abc"), text_fingerprint("abd"));
    assert_eq!(text_fingerprint("anything").len(), 40);
}
