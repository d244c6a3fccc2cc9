use std::thread;
use std::time::{Duration, Instant};

use crate::adapter::adapter::{NextControl, UiAdapter};
use crate::adapter::error::UiError;
use crate::adapter::retry::{DEFAULT_CLICK_ATTEMPTS, best_effort_click};
use crate::browser::session::BrowserSession;
use crate::traverse::model::PageSnapshot;

/// Selector set describing one grid on one screen.
#[derive(Debug, Clone)]
pub struct GridLocators {
    /// Rows of the grid body
    pub row: String,

    /// Target-column cells, one per row
    pub cell: String,

    /// Pagination "next" control
    pub next_button: String,

    /// Explicit empty-state element ("No records"), if the screen has one
    pub empty_state: Option<String>,
}

/// Live `UiAdapter` over a `BrowserSession` bound to one grid's locators.
///
/// Borrows the session for the duration of one traversal; the traversal
/// assumes exclusive ownership of the page while it runs.
pub struct SessionGridAdapter<'a> {
    session: &'a mut BrowserSession,
    locators: GridLocators,
    poll_interval: Duration,
    pages_advanced: usize,
}

impl<'a> SessionGridAdapter<'a> {
    pub fn new(
        session: &'a mut BrowserSession,
        locators: GridLocators,
        poll_interval: Duration,
    ) -> Self {
        Self {
            session,
            locators,
            poll_interval,
            pages_advanced: 0,
        }
    }

    fn any_cell_populated(&mut self) -> Result<bool, UiError> {
        let texts = self.session.query_text_all(&self.locators.cell)?;
        Ok(texts.iter().any(|t| !t.trim().is_empty()))
    }

    /// Snapshot the currently rendered rows. Taken per poll, discarded
    /// after comparison.
    fn snapshot(&mut self) -> Result<PageSnapshot, UiError> {
        let rows = self.session.query_text_all(&self.locators.cell)?;
        Ok(PageSnapshot::of(self.pages_advanced + 1, &rows))
    }
}

impl UiAdapter for SessionGridAdapter<'_> {
    fn is_page_ready(&mut self, timeout: Duration) -> Result<bool, UiError> {
        let deadline = Instant::now() + timeout;
        loop {
            // An explicit empty state counts as ready: there is nothing to
            // wait for and the read will correctly yield zero values.
            if let Some(empty) = self.locators.empty_state.clone() {
                if self.session.query_visible(&empty)? {
                    return Ok(true);
                }
            }

            if self.session.query_count(&self.locators.row)? > 0 && self.any_cell_populated()? {
                return Ok(true);
            }

            if Instant::now() >= deadline {
                return Ok(false);
            }
            thread::sleep(self.poll_interval);
        }
    }

    fn read_visible_column_values(&mut self) -> Result<Vec<String>, UiError> {
        // Virtualized grids mount only in-view rows; nudge the tail into
        // the viewport so the read sees the whole page.
        let last_row = format!("{}:last-of-type", self.locators.row);
        if let Err(e) = self.session.scroll_into_view(&last_row) {
            if !e.is_transient() {
                return Err(e);
            }
        }

        let values = self.session.query_text_all(&self.locators.cell)?;
        Ok(values.into_iter().map(|v| v.trim().to_string()).collect())
    }

    fn find_next_control(&mut self) -> Result<Option<NextControl>, UiError> {
        let selector = &self.locators.next_button;
        if !self.session.query_visible(selector)? {
            return Ok(None);
        }
        if !self.session.query_enabled(selector)? {
            return Ok(None);
        }
        Ok(Some(NextControl::new(selector.clone())))
    }

    fn capture_signature(&mut self) -> Result<String, UiError> {
        Ok(self.snapshot()?.signature)
    }

    fn click_and_await_change(
        &mut self,
        control: &NextControl,
        fail_timeout: Duration,
    ) -> Result<bool, UiError> {
        // Tag the first row so its disappearance signals a re-render even
        // when the new page happens to produce an identical signature. A row
        // going stale under the tag just drops us to the signature-only race;
        // a session fault propagates.
        let mark_token = match self.session.mark(&self.locators.row) {
            Ok(token) => token,
            Err(e) if e.is_transient() => None,
            Err(e) => return Err(e),
        };
        let before = self.snapshot()?;

        best_effort_click(self.session, &control.selector, DEFAULT_CLICK_ATTEMPTS)?;

        let deadline = Instant::now() + fail_timeout;
        loop {
            if let Some(token) = &mark_token {
                match self.session.check_mark(token) {
                    Ok(attached) if !attached => {
                        self.pages_advanced += 1;
                        return Ok(true);
                    }
                    Ok(_) => {}
                    // A stale answer here IS the change we were waiting for
                    Err(e) if e.is_transient() => {
                        self.pages_advanced += 1;
                        return Ok(true);
                    }
                    Err(e) => return Err(e),
                }
            }

            match self.snapshot() {
                Ok(after) if after.signature != before.signature => {
                    self.pages_advanced += 1;
                    return Ok(true);
                }
                Ok(_) => {}
                Err(e) if e.is_transient() => {
                    self.pages_advanced += 1;
                    return Ok(true);
                }
                Err(e) => return Err(e),
            }

            if Instant::now() >= deadline {
                return Ok(false);
            }
            thread::sleep(self.poll_interval);
        }
    }
}
