use std::thread;
use std::time::Duration;

use crate::adapter::error::UiError;
use crate::browser::session::BrowserSession;

/// Attempts allowed for one logical click, counting both interaction paths.
pub const DEFAULT_CLICK_ATTEMPTS: u32 = 3;

const ATTEMPT_PAUSE: Duration = Duration::from_millis(200);

/// Click with a bounded attempt budget: try the trusted pointer click first,
/// fall back to a JS-dispatched click, pause briefly between attempts.
/// Returns the last error once the budget is exhausted.
///
/// Overlays, sticky headers, and enter/leave animations intermittently
/// swallow trusted clicks; the JS path bypasses hit-testing entirely.
pub fn best_effort_click(
    session: &mut BrowserSession,
    selector: &str,
    attempts: u32,
) -> Result<(), UiError> {
    let mut last_err: Option<UiError> = None;

    for attempt in 0..attempts.max(1) {
        if attempt > 0 {
            thread::sleep(ATTEMPT_PAUSE);
        }

        match session.click(selector) {
            Ok(()) => return Ok(()),
            Err(e) => last_err = Some(e),
        }

        match session.js_click(selector) {
            Ok(()) => return Ok(()),
            Err(e) => last_err = Some(e),
        }
    }

    Err(last_err.unwrap_or_else(|| UiError::ElementNotFound {
        selector: selector.to_string(),
        context: "click budget exhausted without an attempt".into(),
    }))
}
