use crate::adapter::error::UiError;
use crate::browser::actions::select_dropdown_option;
use crate::browser::session::BrowserSession;
use crate::pages::download::{DownloadInfo, fetch_and_verify};

const FOLDER_DROPDOWN: &str = ".documents-toolbar .folder-select";
const FOLDER_OPTION_LIST: &str = ".folder-select-options";
const DOCUMENT_NAME: &str = ".documents-list .document-row .document-name";
const DOWNLOAD_LINK: &str = ".documents-list .document-row:has-text(\"{name}\") a.download-link";

/// The documents screen: folder filter plus a flat list of downloadable files.
pub struct DocumentsPage<'a> {
    session: &'a mut BrowserSession,
}

impl<'a> DocumentsPage<'a> {
    pub fn new(session: &'a mut BrowserSession) -> Self {
        Self { session }
    }

    pub fn open(&mut self, base_url: &str) -> Result<(), UiError> {
        self.session.navigate(&format!("{}/documents", base_url))
    }

    pub fn select_folder(&mut self, folder: &str) -> Result<(), UiError> {
        select_dropdown_option(self.session, FOLDER_DROPDOWN, FOLDER_OPTION_LIST, folder)
    }

    /// Names of the currently listed documents, in render order.
    pub fn document_names(&mut self) -> Result<Vec<String>, UiError> {
        self.session.query_text_all(DOCUMENT_NAME)
    }

    /// Verify that the named document actually downloads: resolve the row's
    /// link, fetch it out-of-band, and require a non-trivial body.
    pub fn verify_download(
        &mut self,
        document_name: &str,
        min_bytes: usize,
    ) -> Result<DownloadInfo, UiError> {
        let selector = DOWNLOAD_LINK.replace("{name}", document_name);
        let href = self
            .session
            .download_url(&selector)?
            .ok_or_else(|| UiError::ElementNotFound {
                selector,
                context: format!("no download link for document '{}'", document_name),
            })?;

        fetch_and_verify(&href, min_bytes, None)
    }
}
