use std::thread;
use std::time::{Duration, Instant};

use crate::adapter::error::UiError;
use crate::browser::session::BrowserSession;

// ============================================================================
// Shared page-object interaction helpers
// ============================================================================

/// Select an option in a custom (non-native) dropdown: open the control,
/// then click the option whose visible text matches. Falls back to the
/// native select path when the options list never appears.
pub fn select_dropdown_option(
    session: &mut BrowserSession,
    control_selector: &str,
    option_list_selector: &str,
    option_text: &str,
) -> Result<(), UiError> {
    session.click(control_selector)?;

    // Custom dropdowns render their option list asynchronously
    let deadline = Instant::now() + Duration::from_secs(3);
    loop {
        if session.query_visible(option_list_selector)? {
            break;
        }
        if Instant::now() >= deadline {
            // No floating option list appeared; assume a native <select>
            return session.select_option(control_selector, option_text);
        }
        thread::sleep(Duration::from_millis(100));
    }

    let option_selector = format!("{} >> text={}", option_list_selector, option_text);
    session.click(&option_selector)
}

/// Poll for a transient toast/notification and return its text, or None if
/// nothing appeared before the timeout. Toasts auto-dismiss, so the first
/// non-empty read wins.
pub fn await_toast_text(
    session: &mut BrowserSession,
    toast_selector: &str,
    timeout: Duration,
) -> Result<Option<String>, UiError> {
    let deadline = Instant::now() + timeout;
    loop {
        if let Some(text) = session.query_text(toast_selector)? {
            let trimmed = text.trim();
            if !trimmed.is_empty() {
                return Ok(Some(trimmed.to_string()));
            }
        }
        if Instant::now() >= deadline {
            return Ok(None);
        }
        thread::sleep(Duration::from_millis(150));
    }
}

/// Poll an element until its text is non-empty, returning it. None on timeout.
pub fn await_element_text(
    session: &mut BrowserSession,
    selector: &str,
    timeout: Duration,
) -> Result<Option<String>, UiError> {
    let deadline = Instant::now() + timeout;
    loop {
        if let Some(text) = session.query_text(selector)? {
            let trimmed = text.trim();
            if !trimmed.is_empty() {
                return Ok(Some(trimmed.to_string()));
            }
        }
        if Instant::now() >= deadline {
            return Ok(None);
        }
        thread::sleep(Duration::from_millis(150));
    }
}
