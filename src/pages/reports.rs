use std::time::Duration;

use crate::adapter::error::UiError;
use crate::adapter::retry::{DEFAULT_CLICK_ATTEMPTS, best_effort_click};
use crate::browser::actions::{await_toast_text, select_dropdown_option};
use crate::browser::session::BrowserSession;
use crate::pages::download::{DownloadInfo, fetch_and_verify};

const REPORT_TYPE_DROPDOWN: &str = ".reports-toolbar .report-type-select";
const REPORT_TYPE_OPTIONS: &str = ".report-type-options";
const RUN_BUTTON: &str = ".reports-toolbar button.run-report";
const EXPORT_LINK: &str = ".report-result a.export-csv";
const TOAST: &str = ".toast-container .toast";

/// The reports screen: pick a report type, run it, export the result.
pub struct ReportsPage<'a> {
    session: &'a mut BrowserSession,
}

impl<'a> ReportsPage<'a> {
    pub fn new(session: &'a mut BrowserSession) -> Self {
        Self { session }
    }

    pub fn open(&mut self, base_url: &str) -> Result<(), UiError> {
        self.session.navigate(&format!("{}/reports", base_url))
    }

    pub fn select_report_type(&mut self, report_type: &str) -> Result<(), UiError> {
        select_dropdown_option(
            self.session,
            REPORT_TYPE_DROPDOWN,
            REPORT_TYPE_OPTIONS,
            report_type,
        )
    }

    /// Run the selected report. Completion is signalled by a toast; report
    /// generation is server-side and can take a while, hence the long poll.
    pub fn run_report(&mut self) -> Result<Option<String>, UiError> {
        best_effort_click(self.session, RUN_BUTTON, DEFAULT_CLICK_ATTEMPTS)?;
        await_toast_text(self.session, TOAST, Duration::from_secs(30))
    }

    /// Verify the CSV export of the last run report downloads correctly.
    pub fn verify_export(&mut self, min_bytes: usize) -> Result<DownloadInfo, UiError> {
        let href = self
            .session
            .download_url(EXPORT_LINK)?
            .ok_or_else(|| UiError::ElementNotFound {
                selector: EXPORT_LINK.to_string(),
                context: "no export link after report run".into(),
            })?;

        fetch_and_verify(&href, min_bytes, Some("text/csv"))
    }
}
