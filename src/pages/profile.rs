use std::time::Duration;

use crate::adapter::error::UiError;
use crate::adapter::retry::{DEFAULT_CLICK_ATTEMPTS, best_effort_click};
use crate::browser::actions::await_toast_text;
use crate::browser::session::BrowserSession;
use crate::text::canonical::labels_match;

const FIELD_LABEL: &str = ".profile-card .profile-field .field-label";
const FIELD_VALUE: &str = ".profile-card .profile-field .field-value";
const SAVE_BUTTON: &str = ".profile-card button.save";
const TOAST: &str = ".toast-container .toast";

/// A customer's profile screen: labeled read-only fields plus a save action
/// that confirms via a transient toast.
pub struct CustomerProfilePage<'a> {
    session: &'a mut BrowserSession,
}

impl<'a> CustomerProfilePage<'a> {
    pub fn new(session: &'a mut BrowserSession) -> Self {
        Self { session }
    }

    pub fn open(&mut self, base_url: &str, customer_id: &str) -> Result<(), UiError> {
        self.session
            .navigate(&format!("{}/customers/{}", base_url, customer_id))
    }

    /// Value of the profile field whose label fuzzily matches. Labels read
    /// from the UI carry stray whitespace and casing differences, so the
    /// comparison is canonicalized containment, not equality.
    pub fn field_value(&mut self, label: &str) -> Result<Option<String>, UiError> {
        let labels = self.session.query_text_all(FIELD_LABEL)?;
        let values = self.session.query_text_all(FIELD_VALUE)?;

        for (field_label, value) in labels.iter().zip(values.iter()) {
            if labels_match(field_label, label) {
                return Ok(Some(value.trim().to_string()));
            }
        }
        Ok(None)
    }

    /// Save the profile and return the confirmation toast text, if any.
    pub fn save(&mut self) -> Result<Option<String>, UiError> {
        best_effort_click(self.session, SAVE_BUTTON, DEFAULT_CLICK_ATTEMPTS)?;
        await_toast_text(self.session, TOAST, Duration::from_secs(5))
    }
}
