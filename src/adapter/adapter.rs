use std::time::Duration;

use crate::adapter::error::UiError;

/// Opaque handle to a pagination "next" control.
///
/// The traverser never inspects it; it only hands it back to the adapter
/// that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct NextControl {
    pub selector: String,
}

impl NextControl {
    pub fn new(selector: impl Into<String>) -> Self {
        Self { selector: selector.into() }
    }
}

/// The seam between grid traversal and a concrete automation surface.
///
/// Implemented by `SessionGridAdapter` for the live browser session, and by
/// scripted fakes in tests. A page is *ready* when at least one row exists
/// and at least one target-column cell has non-empty visible text.
pub trait UiAdapter {
    /// Poll until the current page is ready or the timeout elapses.
    /// Returns whether readiness was observed (a timeout is not an error).
    fn is_page_ready(&mut self, timeout: Duration) -> Result<bool, UiError>;

    /// Same semantics as `is_page_ready`, separated so implementations can
    /// absorb first-load costs (route rendering, auth redirects) differently.
    fn is_first_page_ready(&mut self, timeout: Duration) -> Result<bool, UiError> {
        self.is_page_ready(timeout)
    }

    /// Read all currently visible target-column cell texts, in row order,
    /// already trimmed. May be empty. Implementations should nudge
    /// virtualized grids into rendering before reading.
    fn read_visible_column_values(&mut self) -> Result<Vec<String>, UiError>;

    /// Locate the "next page" control. `None` means no further pages
    /// (absent or disabled control).
    fn find_next_control(&mut self) -> Result<Option<NextControl>, UiError>;

    /// Cheap structural fingerprint of the currently rendered rows.
    fn capture_signature(&mut self) -> Result<String, UiError>;

    /// Click the control and wait for the grid to change, racing first-row
    /// staleness against a signature change. Returns whether a change was
    /// observed before `fail_timeout`.
    fn click_and_await_change(
        &mut self,
        control: &NextControl,
        fail_timeout: Duration,
    ) -> Result<bool, UiError>;
}
