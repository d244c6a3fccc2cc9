use std::time::Duration;

use crate::adapter::error::UiError;
use crate::adapter::session_adapter::{GridLocators, SessionGridAdapter};
use crate::browser::actions::await_element_text;
use crate::browser::session::BrowserSession;
use crate::text::canonical::digits_of;
use crate::trace::logger::TraceLogger;
use crate::traverse::model::TraversalResult;
use crate::traverse::traverser::{CancelToken, GridTraverser, TraversalObserver};

const GRID_ROW: &str = ".compliance-grid [role='row'].data-row";
const STATUS_CELL: &str = ".compliance-grid [role='row'].data-row [data-col='status']";
const NEXT_PAGE_BUTTON: &str = ".compliance-grid .pagination button[aria-label='Next page']";
const EMPTY_STATE: &str = ".compliance-grid .empty-state";
const TOTAL_BADGE: &str = ".compliance-header .record-count-badge";

/// The compliance list: a paginated (sometimes virtualized) grid of
/// compliance records with a header badge showing the server-side total.
pub struct CompliancePage<'a> {
    session: &'a mut BrowserSession,
}

impl<'a> CompliancePage<'a> {
    pub fn new(session: &'a mut BrowserSession) -> Self {
        Self { session }
    }

    pub fn open(&mut self, base_url: &str) -> Result<(), UiError> {
        self.session.navigate(&format!("{}/compliance", base_url))
    }

    /// The record count the header badge displays, parsed out of text like
    /// "127 records". None when the badge is absent or carries no number.
    pub fn badge_total(&mut self) -> Result<Option<i64>, UiError> {
        let text = await_element_text(self.session, TOTAL_BADGE, Duration::from_secs(5))?;
        Ok(text.as_deref().and_then(digits_of))
    }

    fn grid_locators() -> GridLocators {
        GridLocators {
            row: GRID_ROW.to_string(),
            cell: STATUS_CELL.to_string(),
            next_button: NEXT_PAGE_BUTTON.to_string(),
            empty_state: Some(EMPTY_STATE.to_string()),
        }
    }

    /// Walk every page of the grid collecting the status column, stopping by
    /// the supplied expected total (pass the badge total, or <= 0 for
    /// structural stop conditions only).
    pub fn audit_grid(
        &mut self,
        traverser: &GridTraverser,
        expected_total: i64,
        observer: Option<&mut dyn TraversalObserver>,
        cancel: &CancelToken,
        tracer: &TraceLogger,
    ) -> Result<TraversalResult, UiError> {
        let poll = traverser.config().ready_poll_interval;
        let mut adapter = SessionGridAdapter::new(self.session, Self::grid_locators(), poll);
        traverser.traverse(&mut adapter, expected_total, observer, cancel, tracer)
    }

    pub fn screenshot(&mut self, path: &str) -> Result<(), UiError> {
        self.session.screenshot(path)
    }
}
