use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use crate::adapter::adapter::UiAdapter;
use crate::adapter::error::UiError;
use crate::trace::logger::TraceLogger;
use crate::trace::trace::TraceEvent;
use crate::traverse::model::{
    CollectedValues, PageTiming, TerminalState, TraversalResult,
};

// ============================================================================
// Configuration
// ============================================================================

/// Constructor-injected wait/threshold configuration. No hidden globals:
/// every timeout the traversal uses comes through here.
#[derive(Debug, Clone)]
pub struct TraverserConfig {
    /// Poll interval for ready checks (grids mount rows before cell text)
    pub ready_poll_interval: Duration,

    /// Upper bound on waiting for a page to become ready
    pub ready_timeout: Duration,

    /// Upper bound on waiting for the grid to change after clicking "next"
    pub change_timeout: Duration,

    /// Advance-timing thresholds, observability only
    pub warn_threshold_ms: u128,
    pub fail_threshold_ms: u128,

    /// Defensive upper bound on pages visited in one traversal
    pub max_pages: usize,
}

impl Default for TraverserConfig {
    fn default() -> Self {
        Self {
            ready_poll_interval: Duration::from_millis(150),
            ready_timeout: Duration::from_secs(10),
            change_timeout: Duration::from_secs(8),
            warn_threshold_ms: 1_500,
            fail_threshold_ms: 4_000,
            max_pages: 500,
        }
    }
}

// ============================================================================
// Cancellation
// ============================================================================

/// Cooperative cancellation signal, checked at the top of each page
/// iteration so long traversals can be aborted between pages.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

// ============================================================================
// Observer hooks
// ============================================================================

/// Side-effect injection points (screenshots, progress output). Errors
/// returned here are logged and never abort traversal.
pub trait TraversalObserver {
    fn page_visited(&mut self, page: usize) -> Result<(), Box<dyn std::error::Error>> {
        let _ = page;
        Ok(())
    }

    fn page_timing(&mut self, timing: &PageTiming) -> Result<(), Box<dyn std::error::Error>> {
        let _ = timing;
        Ok(())
    }
}

// ============================================================================
// Traverser
// ============================================================================

/// Walks a possibly-paginated, possibly-virtualized grid, reading the
/// target column's cell values on every page exactly once, in order.
///
/// Never errors for "no more pages", "page empty", or "pagination stalled" —
/// those are normal terminal states in the result. Only adapter faults the
/// traverser cannot classify propagate as errors.
pub struct GridTraverser {
    config: TraverserConfig,
}

impl GridTraverser {
    pub fn new(config: TraverserConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TraverserConfig {
        &self.config
    }

    /// Visit each page in order, collecting the target column's non-empty
    /// values. `expected_total <= 0` means unknown: rely on structural stop
    /// conditions only.
    pub fn traverse(
        &self,
        adapter: &mut dyn UiAdapter,
        expected_total: i64,
        mut observer: Option<&mut dyn TraversalObserver>,
        cancel: &CancelToken,
        tracer: &TraceLogger,
    ) -> Result<TraversalResult, UiError> {
        let mut collected = CollectedValues::new();

        // Absorb lazy first renders: rows can mount before cell text fills in.
        let wait_started = Instant::now();
        let first_ready = adapter.is_first_page_ready(self.config.ready_timeout)?;
        tracer.log(
            &TraceEvent::now("ready_wait")
                .with_page(1)
                .with_note(if first_ready {
                    "first page ready"
                } else {
                    "first page not ready before timeout, reading anyway"
                })
                .with_timing(&PageTiming::classify(
                    0,
                    1,
                    wait_started.elapsed().as_millis(),
                    self.config.warn_threshold_ms,
                    self.config.fail_threshold_ms,
                )),
        );

        let mut page: usize = 1;
        let terminal = loop {
            if cancel.is_cancelled() {
                tracer.log(&TraceEvent::now("cancel").with_page(page).with_note("token fired"));
                break TerminalState::Cancelled;
            }
            if page > self.config.max_pages {
                tracer.log(
                    &TraceEvent::now("cancel")
                        .with_page(page)
                        .with_note("page budget exhausted"),
                );
                break TerminalState::Cancelled;
            }

            let values = self.read_page(adapter, page, tracer)?;
            if values.is_empty() {
                tracer.log(&TraceEvent::now("read").with_page(page).with_note("empty page"));
            } else {
                tracer.log(
                    &TraceEvent::now("read")
                        .with_page(page)
                        .with_total(collected.total() + values.len()),
                );
            }
            collected.push_page(values);

            if let Some(obs) = observer.as_deref_mut() {
                if let Err(e) = obs.page_visited(page) {
                    tracer.log(
                        &TraceEvent::now("callback")
                            .with_page(page)
                            .with_note(format!("page_visited failed: {}", e)),
                    );
                }
            }

            if expected_total > 0 && collected.total() as i64 >= expected_total {
                break TerminalState::ByTotal;
            }

            let control = match adapter.find_next_control()? {
                Some(c) => c,
                None => break TerminalState::NoNext,
            };

            let advance_started = Instant::now();
            let changed = adapter.click_and_await_change(&control, self.config.change_timeout)?;
            if !changed {
                // The control looked enabled but nothing moved. Pagination may
                // legitimately have ended; stop, do not error.
                tracer.log(&TraceEvent::now("stall").with_page(page));
                break TerminalState::Stalled;
            }

            let ready = adapter.is_page_ready(self.config.ready_timeout)?;
            if !ready {
                tracer.log(
                    &TraceEvent::now("ready_wait")
                        .with_page(page + 1)
                        .with_note("page not ready before timeout, reading anyway"),
                );
            }

            let timing = PageTiming::classify(
                page,
                page + 1,
                advance_started.elapsed().as_millis(),
                self.config.warn_threshold_ms,
                self.config.fail_threshold_ms,
            );
            tracer.log(&TraceEvent::now("advance").with_page(page).with_timing(&timing));
            if let Some(obs) = observer.as_deref_mut() {
                if let Err(e) = obs.page_timing(&timing) {
                    tracer.log(
                        &TraceEvent::now("callback")
                            .with_page(page)
                            .with_note(format!("page_timing failed: {}", e)),
                    );
                }
            }

            page += 1;
        };

        let result = TraversalResult::from_collected(collected, terminal, expected_total);

        if expected_total > 0 && (result.total_collected as i64) < expected_total {
            // Under-count vs the displayed total. Possible virtualization or
            // server-side limit mismatch; the caller decides pass/fail.
            tracer.log(
                &TraceEvent::now("discrepancy")
                    .with_total(result.total_collected)
                    .with_note(format!(
                        "collected {} of expected {}",
                        result.total_collected, expected_total
                    )),
            );
        }

        Ok(result)
    }

    /// Read the current page's column values, filtering empty/whitespace-only
    /// entries. A transient staleness fault is retried once; if the retry is
    /// also transient the page yields an empty read rather than an error.
    fn read_page(
        &self,
        adapter: &mut dyn UiAdapter,
        page: usize,
        tracer: &TraceLogger,
    ) -> Result<Vec<String>, UiError> {
        match adapter.read_visible_column_values() {
            Ok(values) => Ok(filter_nonempty(values)),
            Err(e) if e.is_transient() => {
                tracer.log(
                    &TraceEvent::now("read")
                        .with_page(page)
                        .with_note(format!("stale read, retrying once: {}", e)),
                );
                match adapter.read_visible_column_values() {
                    Ok(values) => Ok(filter_nonempty(values)),
                    Err(e2) if e2.is_transient() => {
                        tracer.log(
                            &TraceEvent::now("read")
                                .with_page(page)
                                .with_note(format!("retry also stale, treating as empty: {}", e2)),
                        );
                        Ok(Vec::new())
                    }
                    Err(e2) => Err(e2),
                }
            }
            Err(e) => Err(e),
        }
    }
}

fn filter_nonempty(values: Vec<String>) -> Vec<String> {
    values
        .into_iter()
        .filter(|v| !v.trim().is_empty())
        .collect()
}
