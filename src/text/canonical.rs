// ============================================================================
// Cell/label text canonicalization for fuzzy matching
// ============================================================================

/// Canonicalize UI text for comparison: strip NBSP/zero-width characters,
/// collapse whitespace, lowercase. Returns None for text that is empty
/// once canonicalized.
pub fn canonicalize(raw: &str) -> Option<String> {
    let cleaned: String = raw
        .chars()
        .map(|c| match c {
            '\u{00a0}' | '\u{2007}' | '\u{202f}' => ' ', // non-breaking spaces
            _ => c,
        })
        .filter(|c| !matches!(c, '\u{200b}' | '\u{200c}' | '\u{200d}' | '\u{feff}'))
        .collect();

    let normalized = cleaned
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();

    if normalized.is_empty() {
        None
    } else {
        Some(normalized)
    }
}

/// Fuzzy label comparison: canonicalized containment in either direction.
/// "Status " vs "status" vs "Compliance Status" all match each other.
pub fn labels_match(a: &str, b: &str) -> bool {
    match (canonicalize(a), canonicalize(b)) {
        (Some(ca), Some(cb)) => ca.contains(&cb) || cb.contains(&ca),
        _ => false,
    }
}

/// Extract the first run of digits as a number. Badge text like
/// "Showing 127 items" or "(127)" yields 127; None when no digits exist.
pub fn digits_of(text: &str) -> Option<i64> {
    let digits: String = text
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(|c| c.is_ascii_digit())
        .collect();

    digits.parse().ok()
}

/// Stable fingerprint for long cell text, keeping signatures short.
pub fn text_fingerprint(text: &str) -> String {
    use sha1::{Digest, Sha1};

    let mut hasher = Sha1::new();
    hasher.update(text.as_bytes());
    format!("{:x}", hasher.finalize())
}
