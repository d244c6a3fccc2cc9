use std::time::Duration;

use pagewalk::adapter::adapter::{NextControl, UiAdapter};
use pagewalk::adapter::error::UiError;
use pagewalk::trace::logger::TraceLogger;
use pagewalk::traverse::model::{
    CollectedValues, PageTiming, TerminalState, TimingClass, signature_of,
};
use pagewalk::traverse::traverser::{
    CancelToken, GridTraverser, TraversalObserver, TraverserConfig,
};

// =========================================================================
// Scripted adapter
// =========================================================================

/// A grid whose pages are scripted up front. `advance_succeeds = false`
/// simulates a UI that never updates after clicking "next".
struct ScriptedGrid {
    pages: Vec<Vec<&'static str>>,
    current: usize,
    advance_succeeds: bool,
    /// Pretend there is always an enabled "next" control
    endless_next: bool,
    /// Whether ready polls ever confirm readiness
    ready: bool,
    /// Number of initial reads that fail with a transient staleness error
    stale_reads: u32,
    /// Reads that should fail fatally (session gone)
    fatal_read: bool,
    /// Advances that should fail fatally (session gone)
    fatal_click: bool,
    reads: u32,
    clicks: u32,
    ready_checks: u32,
}

impl ScriptedGrid {
    fn new(pages: Vec<Vec<&'static str>>) -> Self {
        Self {
            pages,
            current: 0,
            advance_succeeds: true,
            endless_next: false,
            ready: true,
            stale_reads: 0,
            fatal_read: false,
            fatal_click: false,
            reads: 0,
            clicks: 0,
            ready_checks: 0,
        }
    }

    fn page_values(&self) -> Vec<String> {
        self.pages
            .get(self.current)
            .map(|p| p.iter().map(|s| s.to_string()).collect())
            .unwrap_or_default()
    }
}

impl UiAdapter for ScriptedGrid {
    fn is_page_ready(&mut self, _timeout: Duration) -> Result<bool, UiError> {
        self.ready_checks += 1;
        Ok(self.ready)
    }

    fn read_visible_column_values(&mut self) -> Result<Vec<String>, UiError> {
        self.reads += 1;
        if self.fatal_read {
            return Err(UiError::SessionProtocol {
                command: "query_text_all".into(),
                error: "browser process died".into(),
            });
        }
        if self.stale_reads > 0 {
            self.stale_reads -= 1;
            return Err(UiError::StaleElement {
                context: "row detached mid-read".into(),
            });
        }
        Ok(self.page_values())
    }

    fn find_next_control(&mut self) -> Result<Option<NextControl>, UiError> {
        if self.endless_next || self.current + 1 < self.pages.len() {
            Ok(Some(NextControl::new("button.next")))
        } else {
            Ok(None)
        }
    }

    fn capture_signature(&mut self) -> Result<String, UiError> {
        Ok(signature_of(&self.page_values()))
    }

    fn click_and_await_change(
        &mut self,
        _control: &NextControl,
        _fail_timeout: Duration,
    ) -> Result<bool, UiError> {
        self.clicks += 1;
        if self.fatal_click {
            return Err(UiError::SessionIo("broken pipe writing to helper".into()));
        }
        if !self.advance_succeeds {
            return Ok(false);
        }
        self.current += 1;
        Ok(true)
    }
}

fn quick_config() -> TraverserConfig {
    TraverserConfig {
        ready_poll_interval: Duration::from_millis(1),
        ready_timeout: Duration::from_millis(10),
        change_timeout: Duration::from_millis(10),
        ..TraverserConfig::default()
    }
}

fn traverse(
    grid: &mut ScriptedGrid,
    expected_total: i64,
) -> pagewalk::traverse::model::TraversalResult {
    let traverser = GridTraverser::new(quick_config());
    let cancel = CancelToken::new();
    traverser
        .traverse(grid, expected_total, None, &cancel, &TraceLogger::disabled())
        .expect("traversal should not error")
}

// =========================================================================
// Page order and collection
// =========================================================================

#[test]
fn visits_all_pages_in_order() {
    let mut grid = ScriptedGrid::new(vec![
        vec!["Compliant", "Overdue"],
        vec!["Compliant"],
        vec!["Pending", "Pending", "Overdue"],
    ]);

    let result = traverse(&mut grid, 0);

    assert_eq!(result.terminal, TerminalState::NoNext);
    assert_eq!(result.pages_visited, 3);
    assert_eq!(result.total_collected, 6);
    assert_eq!(result.values.page(1).unwrap(), vec!["Compliant", "Overdue"]);
    assert_eq!(result.values.page(2).unwrap(), vec!["Compliant"]);
    assert_eq!(result.values.page(3).unwrap(), vec!["Pending", "Pending", "Overdue"]);
    assert!(result.values.page(4).is_none());
    assert!(result.values.page(0).is_none());
}

#[test]
fn stops_when_expected_total_reached() {
    let mut grid = ScriptedGrid::new(vec![
        vec!["A", "B", "C"],
        vec!["D", "E", "F"],
        vec!["G", "H", "I"],
    ]);

    let result = traverse(&mut grid, 5);

    // Cumulative count first reaches 5 on page 2 (6 >= 5); page 3 is never read
    assert_eq!(result.terminal, TerminalState::ByTotal);
    assert_eq!(result.pages_visited, 2);
    assert_eq!(result.total_collected, 6);
    assert_eq!(grid.clicks, 1);
}

#[test]
fn empty_single_page_is_normal_termination() {
    let mut grid = ScriptedGrid::new(vec![vec![]]);

    let result = traverse(&mut grid, 0);

    assert_eq!(result.terminal, TerminalState::NoNext);
    assert_eq!(result.total_collected, 0);
    assert_eq!(result.pages_visited, 1);
}

#[test]
fn never_ready_pages_are_still_read() {
    // Readiness that never confirms within the bounded wait is a degraded
    // signal, not a stop condition: every page is read and recorded anyway.
    let mut grid = ScriptedGrid::new(vec![vec!["Compliant"], vec!["Overdue"]]);
    grid.ready = false;

    let result = traverse(&mut grid, 0);

    assert_eq!(result.terminal, TerminalState::NoNext);
    assert_eq!(result.pages_visited, 2);
    assert_eq!(result.total_collected, 2);
    assert_eq!(result.values.page(1).unwrap(), vec!["Compliant"]);
    assert_eq!(result.values.page(2).unwrap(), vec!["Overdue"]);
    assert!(
        grid.ready_checks >= 2,
        "first page and the post-advance page each get a bounded ready wait"
    );
}

#[test]
fn whitespace_only_values_are_filtered() {
    let mut grid = ScriptedGrid::new(vec![vec!["Compliant", "", "   ", "Overdue"]]);

    let result = traverse(&mut grid, 0);

    assert_eq!(result.total_collected, 2);
    assert_eq!(result.values.page(1).unwrap(), vec!["Compliant", "Overdue"]);
}

#[test]
fn duplicates_kept_per_page_but_distinct_counted() {
    let mut grid = ScriptedGrid::new(vec![vec!["A", "B"], vec!["B", "C"]]);

    let result = traverse(&mut grid, 0);

    assert_eq!(result.total_collected, 4);
    assert_eq!(result.distinct_count, 3);
}

// =========================================================================
// Stall, cancellation, and budgets
// =========================================================================

#[test]
fn stall_terminates_after_one_advance_attempt() {
    let mut grid = ScriptedGrid::new(vec![vec!["A"], vec!["B"]]);
    grid.advance_succeeds = false;

    let result = traverse(&mut grid, 0);

    assert_eq!(result.terminal, TerminalState::Stalled);
    assert_eq!(result.pages_visited, 1);
    assert_eq!(grid.clicks, 1, "exactly one advance attempt before stopping");
}

#[test]
fn pre_cancelled_token_stops_before_reading() {
    let mut grid = ScriptedGrid::new(vec![vec!["A"]]);
    let traverser = GridTraverser::new(quick_config());
    let cancel = CancelToken::new();
    cancel.cancel();

    let result = traverser
        .traverse(&mut grid, 0, None, &cancel, &TraceLogger::disabled())
        .expect("cancellation is not an error");

    assert_eq!(result.terminal, TerminalState::Cancelled);
    assert_eq!(result.pages_visited, 0);
    assert_eq!(grid.reads, 0);
}

#[test]
fn page_budget_bounds_an_endless_grid() {
    let mut grid = ScriptedGrid::new(vec![vec!["A"]; 50]);
    grid.endless_next = true;

    let config = TraverserConfig {
        max_pages: 3,
        ..quick_config()
    };
    let traverser = GridTraverser::new(config);
    let cancel = CancelToken::new();

    let result = traverser
        .traverse(&mut grid, 0, None, &cancel, &TraceLogger::disabled())
        .expect("budget exhaustion is not an error");

    assert_eq!(result.terminal, TerminalState::Cancelled);
    assert_eq!(result.pages_visited, 3);
}

// =========================================================================
// Transient faults and fatal faults
// =========================================================================

#[test]
fn stale_read_is_retried_once() {
    let mut grid = ScriptedGrid::new(vec![vec!["A", "B"]]);
    grid.stale_reads = 1;

    let result = traverse(&mut grid, 0);

    assert_eq!(result.total_collected, 2);
    assert_eq!(grid.reads, 2, "one failed read plus one successful retry");
}

#[test]
fn double_stale_read_yields_empty_page() {
    let mut grid = ScriptedGrid::new(vec![vec!["A", "B"]]);
    grid.stale_reads = 2;

    let result = traverse(&mut grid, 0);

    assert_eq!(result.terminal, TerminalState::NoNext);
    assert_eq!(result.total_collected, 0);
    assert_eq!(result.pages_visited, 1);
}

#[test]
fn fatal_adapter_fault_propagates() {
    let mut grid = ScriptedGrid::new(vec![vec!["A"]]);
    grid.fatal_read = true;

    let traverser = GridTraverser::new(quick_config());
    let cancel = CancelToken::new();
    let outcome = traverser.traverse(&mut grid, 0, None, &cancel, &TraceLogger::disabled());

    assert!(matches!(
        outcome,
        Err(UiError::SessionProtocol { .. })
    ));
}

#[test]
fn fatal_advance_fault_propagates() {
    // Transient staleness during an advance is absorbed by the adapter;
    // a dead session is not, and must surface to the caller.
    let mut grid = ScriptedGrid::new(vec![vec!["A"], vec!["B"]]);
    grid.fatal_click = true;

    let traverser = GridTraverser::new(quick_config());
    let cancel = CancelToken::new();
    let outcome = traverser.traverse(&mut grid, 0, None, &cancel, &TraceLogger::disabled());

    assert!(matches!(outcome, Err(UiError::SessionIo(_))));
    assert_eq!(grid.clicks, 1);
}

// =========================================================================
// Observer hooks
// =========================================================================

struct FailingObserver {
    visited: Vec<usize>,
    timings: Vec<PageTiming>,
}

impl TraversalObserver for FailingObserver {
    fn page_visited(&mut self, page: usize) -> Result<(), Box<dyn std::error::Error>> {
        self.visited.push(page);
        Err("screenshot disk full".into())
    }

    fn page_timing(&mut self, timing: &PageTiming) -> Result<(), Box<dyn std::error::Error>> {
        self.timings.push(timing.clone());
        Err("timing sink unreachable".into())
    }
}

#[test]
fn failing_observer_does_not_abort_traversal() {
    let mut grid = ScriptedGrid::new(vec![vec!["A"], vec!["B"], vec!["C"]]);
    let traverser = GridTraverser::new(quick_config());
    let cancel = CancelToken::new();
    let mut observer = FailingObserver {
        visited: Vec::new(),
        timings: Vec::new(),
    };

    let result = traverser
        .traverse(
            &mut grid,
            0,
            Some(&mut observer),
            &cancel,
            &TraceLogger::disabled(),
        )
        .expect("observer failures must not abort");

    assert_eq!(result.pages_visited, 3);
    assert_eq!(observer.visited, vec![1, 2, 3]);
    assert_eq!(observer.timings.len(), 2, "one timing per advance");
    assert_eq!(observer.timings[0].from_page, 1);
    assert_eq!(observer.timings[0].to_page, 2);
}

// =========================================================================
// Model units
// =========================================================================

#[test]
fn signature_is_count_first_last() {
    let rows = vec!["alpha".to_string(), "beta".to_string(), "gamma".to_string()];
    assert_eq!(signature_of(&rows), "3|alpha|gamma");
    assert_eq!(signature_of(&[]), "0||");
    assert_eq!(signature_of(&["only".to_string()]), "1|only|only");
}

#[test]
fn long_cell_text_is_fingerprinted_in_signature() {
    let long = "x".repeat(200);
    let rows = vec![long.clone(), "short".to_string()];
    let signature = signature_of(&rows);

    assert!(!signature.contains(&long), "raw long text must not leak into the signature");
    assert!(signature.starts_with("2|"));
    assert!(signature.ends_with("|short"));

    let digest = signature
        .split('|')
        .nth(1)
        .expect("signature has three fields");
    assert_eq!(digest.len(), 40, "sha1 hex digest stands in for the long text");
}

#[test]
fn collected_values_counts() {
    let mut collected = CollectedValues::new();
    collected.push_page(vec!["A".into(), "B".into()]);
    collected.push_page(vec!["B".into()]);

    assert_eq!(collected.page_count(), 2);
    assert_eq!(collected.total(), 3);
    assert_eq!(collected.distinct(), 2);

    let pages: Vec<usize> = collected.iter_pages().map(|(n, _)| n).collect();
    assert_eq!(pages, vec![1, 2]);
}

#[test]
fn timing_classification_thresholds() {
    let ok = PageTiming::classify(1, 2, 100, 1_500, 4_000);
    assert_eq!(ok.class, TimingClass::Ok);

    let warn = PageTiming::classify(1, 2, 1_500, 1_500, 4_000);
    assert_eq!(warn.class, TimingClass::Warn);

    let fail = PageTiming::classify(1, 2, 4_000, 1_500, 4_000);
    assert_eq!(fail.class, TimingClass::Fail);
}

#[test]
fn matches_expected_is_none_without_expected_total() {
    let mut grid = ScriptedGrid::new(vec![vec!["A"]]);
    let result = traverse(&mut grid, 0);
    assert_eq!(result.matches_expected(), None);

    let mut grid = ScriptedGrid::new(vec![vec!["A"]]);
    let result = traverse(&mut grid, 3);
    assert_eq!(result.matches_expected(), Some(false));

    let mut grid = ScriptedGrid::new(vec![vec!["A", "B", "C"]]);
    let result = traverse(&mut grid, 3);
    assert_eq!(result.matches_expected(), Some(true));
}
