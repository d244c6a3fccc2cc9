use std::collections::HashSet;

use serde::Serialize;

// ============================================================================
// Per-poll snapshot
// ============================================================================

/// Cheap fingerprint of the currently rendered rows, taken per poll and
/// discarded after comparison. Distinguishes "grid re-rendered with new data"
/// from "navigation no-op" without deep row comparison.
#[derive(Debug, Clone, PartialEq)]
pub struct PageSnapshot {
    pub page_index: usize,
    pub row_count: usize,
    pub signature: String,
}

impl PageSnapshot {
    pub fn of(page_index: usize, rows: &[String]) -> Self {
        Self {
            page_index,
            row_count: rows.len(),
            signature: signature_of(rows),
        }
    }
}

/// Row count + first-row text + last-row text, pipe-joined. Long cell
/// texts are fingerprinted so signatures stay cheap to compare and log.
pub fn signature_of(rows: &[String]) -> String {
    let first = rows.first().map(String::as_str).unwrap_or("");
    let last = rows.last().map(String::as_str).unwrap_or("");
    format!("{}|{}|{}", rows.len(), shorten(first), shorten(last))
}

fn shorten(text: &str) -> String {
    const MAX_SIGNATURE_TEXT: usize = 64;
    if text.chars().count() > MAX_SIGNATURE_TEXT {
        crate::text::canonical::text_fingerprint(text)
    } else {
        text.to_string()
    }
}

// ============================================================================
// Collected values
// ============================================================================

/// Insertion-ordered mapping from page number (1-based, contiguous) to the
/// non-empty cell texts read on that page. Pages are only appended in order;
/// owned by a single traversal call.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CollectedValues {
    pages: Vec<Vec<String>>,
}

impl CollectedValues {
    pub fn new() -> Self {
        Self { pages: Vec::new() }
    }

    /// Record the values for the next page (page numbers are implicit:
    /// the first push is page 1, the second page 2, and so on).
    pub fn push_page(&mut self, values: Vec<String>) {
        self.pages.push(values);
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Values for a 1-based page number, if visited.
    pub fn page(&self, number: usize) -> Option<&[String]> {
        if number == 0 {
            return None;
        }
        self.pages.get(number - 1).map(Vec::as_slice)
    }

    pub fn total(&self) -> usize {
        self.pages.iter().map(Vec::len).sum()
    }

    pub fn distinct(&self) -> usize {
        let mut seen: HashSet<&str> = HashSet::new();
        for page in &self.pages {
            for value in page {
                seen.insert(value.as_str());
            }
        }
        seen.len()
    }

    pub fn iter_pages(&self) -> impl Iterator<Item = (usize, &[String])> {
        self.pages
            .iter()
            .enumerate()
            .map(|(i, v)| (i + 1, v.as_slice()))
    }
}

// ============================================================================
// Terminal states and result
// ============================================================================

/// How a traversal ended. All variants are normal termination; adapter
/// faults surface as errors instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TerminalState {
    /// Running total reached or exceeded the expected total
    ByTotal,

    /// No enabled "next" control — last page reached
    NoNext,

    /// "Next" was clicked but no structural change was observed in time
    Stalled,

    /// Cancellation token fired, or the defensive page budget ran out
    Cancelled,
}

/// Outcome of one traversal call. Computed once at the end; read-only.
#[derive(Debug, Clone, Serialize)]
pub struct TraversalResult {
    pub total_collected: usize,
    pub distinct_count: usize,
    pub pages_visited: usize,
    pub terminal: TerminalState,

    /// The externally supplied expected total; <= 0 meant "unknown"
    pub expected_total: i64,

    pub values: CollectedValues,
}

impl TraversalResult {
    pub fn from_collected(
        values: CollectedValues,
        terminal: TerminalState,
        expected_total: i64,
    ) -> Self {
        Self {
            total_collected: values.total(),
            distinct_count: values.distinct(),
            pages_visited: values.page_count(),
            terminal,
            expected_total,
            values,
        }
    }

    /// Whether the observed total matches the expected total.
    /// `None` when no expected total was supplied.
    pub fn matches_expected(&self) -> Option<bool> {
        if self.expected_total > 0 {
            Some(self.total_collected as i64 >= self.expected_total)
        } else {
            None
        }
    }
}

// ============================================================================
// Advance timing
// ============================================================================

/// Observability-only classification of a click-to-ready transition.
/// No traversal behavior branches on this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TimingClass {
    Ok,
    Warn,
    Fail,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageTiming {
    pub from_page: usize,
    pub to_page: usize,
    pub elapsed_ms: u128,
    pub class: TimingClass,
}

impl PageTiming {
    pub fn classify(
        from_page: usize,
        to_page: usize,
        elapsed_ms: u128,
        warn_threshold_ms: u128,
        fail_threshold_ms: u128,
    ) -> Self {
        let class = if elapsed_ms >= fail_threshold_ms {
            TimingClass::Fail
        } else if elapsed_ms >= warn_threshold_ms {
            TimingClass::Warn
        } else {
            TimingClass::Ok
        };
        Self { from_page, to_page, elapsed_ms, class }
    }
}
