use crate::adapter::error::UiError;
use crate::adapter::retry::{DEFAULT_CLICK_ATTEMPTS, best_effort_click};
use crate::browser::session::BrowserSession;

const DASHBOARD_WIDGET: &str = ".dashboard-widget";
const NAV_LINK: &str = "nav.app-nav a";

/// The home dashboard: summary widgets plus the primary navigation.
pub struct HomePage<'a> {
    session: &'a mut BrowserSession,
}

impl<'a> HomePage<'a> {
    pub fn new(session: &'a mut BrowserSession) -> Self {
        Self { session }
    }

    pub fn open(&mut self, base_url: &str) -> Result<(), UiError> {
        self.session.navigate(&format!("{}/home", base_url))
    }

    pub fn widget_count(&mut self) -> Result<u32, UiError> {
        self.session.query_count(DASHBOARD_WIDGET)
    }

    /// Titles of the dashboard widgets, in render order.
    pub fn widget_titles(&mut self) -> Result<Vec<String>, UiError> {
        let selector = format!("{} .widget-title", DASHBOARD_WIDGET);
        self.session.query_text_all(&selector)
    }

    /// Navigate via the app shell by the nav entry's visible label.
    pub fn open_section(&mut self, label: &str) -> Result<(), UiError> {
        let selector = format!("{}:has-text(\"{}\")", NAV_LINK, label);
        best_effort_click(self.session, &selector, DEFAULT_CLICK_ATTEMPTS)
    }
}
