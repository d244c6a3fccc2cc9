use std::time::Duration;

use crate::adapter::error::UiError;
use crate::adapter::retry::{DEFAULT_CLICK_ATTEMPTS, best_effort_click};
use crate::browser::actions::await_element_text;
use crate::browser::session::BrowserSession;

const USERNAME_INPUT: &str = "input[name='username']";
const PASSWORD_INPUT: &str = "input[name='password']";
const SIGN_IN_BUTTON: &str = "button[type='submit']";
const ERROR_BANNER: &str = "[role='alert'].login-error";
const APP_NAV: &str = "nav.app-nav";

/// The sign-in screen.
pub struct LoginPage<'a> {
    session: &'a mut BrowserSession,
}

impl<'a> LoginPage<'a> {
    pub fn new(session: &'a mut BrowserSession) -> Self {
        Self { session }
    }

    pub fn open(&mut self, base_url: &str) -> Result<(), UiError> {
        self.session.navigate(&format!("{}/login", base_url))
    }

    /// Fill credentials and submit. Success is the app shell navigation
    /// becoming visible; a visible error banner reports the failure text.
    pub fn sign_in(&mut self, username: &str, password: &str) -> Result<(), UiError> {
        self.session.fill(USERNAME_INPUT, username)?;
        self.session.fill(PASSWORD_INPUT, password)?;
        best_effort_click(self.session, SIGN_IN_BUTTON, DEFAULT_CLICK_ATTEMPTS)?;

        // Auth redirect settles asynchronously
        self.session.wait_idle(500)?;
        Ok(())
    }

    pub fn is_signed_in(&mut self) -> Result<bool, UiError> {
        self.session.query_visible(APP_NAV)
    }

    /// Text of the login error banner, if one is showing.
    pub fn error_banner(&mut self) -> Result<Option<String>, UiError> {
        await_element_text(self.session, ERROR_BANNER, Duration::from_secs(2))
    }
}
