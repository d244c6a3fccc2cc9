use std::io::{BufRead, BufReader, Write};
use std::process::{Child, Command, Stdio};

use serde::{Deserialize, Serialize};

use crate::adapter::error::UiError;

/// Request sent to grid_server.js over stdin (one JSON line).
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum BrowserRequest {
    Navigate {
        cmd: &'static str,
        url: String,
    },
    Selector {
        cmd: &'static str,
        selector: String,
    },
    Fill {
        cmd: &'static str,
        selector: String,
        value: String,
    },
    SelectOption {
        cmd: &'static str,
        selector: String,
        option: String,
    },
    CheckMark {
        cmd: &'static str,
        token: String,
    },
    Screenshot {
        cmd: &'static str,
        path: String,
    },
    Wait {
        cmd: &'static str,
        duration_ms: u64,
    },
    Bare {
        cmd: &'static str,
    },
}

impl BrowserRequest {
    pub fn navigate(url: &str) -> Self {
        BrowserRequest::Navigate { cmd: "navigate", url: url.to_string() }
    }

    fn selector(cmd: &'static str, selector: &str) -> Self {
        BrowserRequest::Selector { cmd, selector: selector.to_string() }
    }

    pub fn click(selector: &str) -> Self {
        Self::selector("click", selector)
    }

    /// Dispatch a click through page JavaScript instead of a trusted pointer
    /// event. Fallback path for overlapped/animated controls.
    pub fn js_click(selector: &str) -> Self {
        Self::selector("js_click", selector)
    }

    pub fn fill(selector: &str, value: &str) -> Self {
        BrowserRequest::Fill {
            cmd: "fill",
            selector: selector.to_string(),
            value: value.to_string(),
        }
    }

    pub fn select_option(selector: &str, option: &str) -> Self {
        BrowserRequest::SelectOption {
            cmd: "select_option",
            selector: selector.to_string(),
            option: option.to_string(),
        }
    }

    pub fn query_text(selector: &str) -> Self {
        Self::selector("query_text", selector)
    }

    pub fn query_text_all(selector: &str) -> Self {
        Self::selector("query_text_all", selector)
    }

    pub fn query_count(selector: &str) -> Self {
        Self::selector("query_count", selector)
    }

    pub fn query_visible(selector: &str) -> Self {
        Self::selector("query_visible", selector)
    }

    pub fn query_enabled(selector: &str) -> Self {
        Self::selector("query_enabled", selector)
    }

    pub fn scroll_into_view(selector: &str) -> Self {
        Self::selector("scroll_into_view", selector)
    }

    /// Tag the first element matching the selector with a tracking attribute.
    /// The returned token identifies that exact node; after a re-render the
    /// attribute is gone and `check_mark` reports it detached.
    pub fn mark(selector: &str) -> Self {
        Self::selector("mark", selector)
    }

    pub fn check_mark(token: &str) -> Self {
        BrowserRequest::CheckMark { cmd: "check_mark", token: token.to_string() }
    }

    pub fn download_url(selector: &str) -> Self {
        Self::selector("download_url", selector)
    }

    pub fn screenshot(path: &str) -> Self {
        BrowserRequest::Screenshot { cmd: "screenshot", path: path.to_string() }
    }

    pub fn wait(duration_ms: u64) -> Self {
        BrowserRequest::Wait { cmd: "wait", duration_ms }
    }

    pub fn current_url() -> Self {
        BrowserRequest::Bare { cmd: "current_url" }
    }

    pub fn quit() -> Self {
        BrowserRequest::Bare { cmd: "quit" }
    }
}

/// Response received from grid_server.js over stdout (one JSON line).
#[derive(Debug, Deserialize)]
pub struct BrowserResponse {
    pub ok: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub ready: Option<bool>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub texts: Option<Vec<String>>,
    #[serde(default)]
    pub count: Option<u32>,
    #[serde(default)]
    pub visible: Option<bool>,
    #[serde(default)]
    pub enabled: Option<bool>,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub attached: Option<bool>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub href: Option<String>,
}

/// A persistent browser session backed by grid_server.js.
///
/// Launches a long-lived Node.js process that keeps a Chromium browser open.
/// Commands are sent as NDJSON over stdin, responses read from stdout. The
/// session assumes exclusive ownership of the page it drives: no other actor
/// should navigate the same surface while a traversal is running.
pub struct BrowserSession {
    child: Child,
    stdin: std::process::ChildStdin,
    reader: BufReader<std::process::ChildStdout>,
    current_url: Option<String>,
}

impl BrowserSession {
    /// Launch a new browser session by spawning grid_server.js.
    pub fn launch() -> Result<Self, UiError> {
        Self::launch_script("node/grid_server.js")
    }

    pub fn launch_script(script: &str) -> Result<Self, UiError> {
        let mut child = Command::new("node")
            .arg(script)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| UiError::SubprocessSpawn {
                script: script.to_string(),
                source: e,
            })?;

        let stdin = child.stdin.take().ok_or_else(|| {
            UiError::SessionIo("Failed to capture stdin of grid_server.js".into())
        })?;

        let stdout = child.stdout.take().ok_or_else(|| {
            UiError::SessionIo("Failed to capture stdout of grid_server.js".into())
        })?;

        let mut reader = BufReader::new(stdout);

        // Wait for the ready signal
        let mut line = String::new();
        reader
            .read_line(&mut line)
            .map_err(|e| UiError::SessionIo(format!("Failed to read ready signal: {}", e)))?;

        let response: BrowserResponse =
            serde_json::from_str(line.trim()).map_err(|e| UiError::JsonParse {
                context: "grid_server.js ready signal".into(),
                source: e,
            })?;

        if !response.ok || response.ready != Some(true) {
            return Err(UiError::SessionProtocol {
                command: "launch".into(),
                error: "Did not receive ready signal from grid_server.js".into(),
            });
        }

        Ok(BrowserSession {
            child,
            stdin,
            reader,
            current_url: None,
        })
    }

    /// Send a request and read the response.
    fn send(&mut self, request: &BrowserRequest) -> Result<BrowserResponse, UiError> {
        let json = serde_json::to_string(request).map_err(|e| UiError::JsonSerialize {
            context: "BrowserRequest".into(),
            source: e,
        })?;

        writeln!(self.stdin, "{}", json).map_err(|e| {
            UiError::SessionIo(format!("Failed to write to grid_server.js stdin: {}", e))
        })?;

        self.stdin.flush().map_err(|e| {
            UiError::SessionIo(format!("Failed to flush grid_server.js stdin: {}", e))
        })?;

        let mut line = String::new();
        self.reader.read_line(&mut line).map_err(|e| {
            UiError::SessionIo(format!("Failed to read from grid_server.js stdout: {}", e))
        })?;

        if line.trim().is_empty() {
            return Err(UiError::SessionIo(
                "Empty response from grid_server.js (process may have died)".into(),
            ));
        }

        let response: BrowserResponse =
            serde_json::from_str(line.trim()).map_err(|e| UiError::JsonParse {
                context: "grid_server.js response".into(),
                source: e,
            })?;

        Ok(response)
    }

    /// Send a request and verify it succeeded. Error text naming a detached
    /// or stale node maps to the transient `StaleElement` class so callers
    /// can retry the read.
    fn send_ok(
        &mut self,
        request: &BrowserRequest,
        command_name: &str,
    ) -> Result<BrowserResponse, UiError> {
        let response = self.send(request)?;
        if !response.ok {
            let error = response.error.unwrap_or_else(|| "Unknown error".into());
            let lowered = error.to_lowercase();
            if lowered.contains("stale") || lowered.contains("detached") {
                return Err(UiError::StaleElement {
                    context: format!("{}: {}", command_name, error),
                });
            }
            return Err(UiError::SessionProtocol {
                command: command_name.into(),
                error,
            });
        }
        Ok(response)
    }

    pub fn navigate(&mut self, url: &str) -> Result<(), UiError> {
        self.send_ok(&BrowserRequest::navigate(url), "navigate")?;
        self.current_url = Some(url.to_string());
        Ok(())
    }

    pub fn click(&mut self, selector: &str) -> Result<(), UiError> {
        self.send_ok(&BrowserRequest::click(selector), "click")?;
        Ok(())
    }

    pub fn js_click(&mut self, selector: &str) -> Result<(), UiError> {
        self.send_ok(&BrowserRequest::js_click(selector), "js_click")?;
        Ok(())
    }

    pub fn fill(&mut self, selector: &str, value: &str) -> Result<(), UiError> {
        self.send_ok(&BrowserRequest::fill(selector, value), "fill")?;
        Ok(())
    }

    pub fn select_option(&mut self, selector: &str, option: &str) -> Result<(), UiError> {
        self.send_ok(&BrowserRequest::select_option(selector, option), "select_option")?;
        Ok(())
    }

    /// Text content of the first matching element. None if no match.
    pub fn query_text(&mut self, selector: &str) -> Result<Option<String>, UiError> {
        let response = self.send_ok(&BrowserRequest::query_text(selector), "query_text")?;
        Ok(response.text)
    }

    /// Text content of every matching element, in document order, trimmed
    /// by the helper. Empty when nothing matches.
    pub fn query_text_all(&mut self, selector: &str) -> Result<Vec<String>, UiError> {
        let response = self.send_ok(&BrowserRequest::query_text_all(selector), "query_text_all")?;
        Ok(response.texts.unwrap_or_default())
    }

    pub fn query_count(&mut self, selector: &str) -> Result<u32, UiError> {
        let response = self.send_ok(&BrowserRequest::query_count(selector), "query_count")?;
        Ok(response.count.unwrap_or(0))
    }

    pub fn query_visible(&mut self, selector: &str) -> Result<bool, UiError> {
        let response = self.send_ok(&BrowserRequest::query_visible(selector), "query_visible")?;
        Ok(response.visible.unwrap_or(false))
    }

    pub fn query_enabled(&mut self, selector: &str) -> Result<bool, UiError> {
        let response = self.send_ok(&BrowserRequest::query_enabled(selector), "query_enabled")?;
        Ok(response.enabled.unwrap_or(false))
    }

    /// Scroll the first matching element into view. Virtualized grids only
    /// mount rows near the viewport; nudging the last row forces a render.
    pub fn scroll_into_view(&mut self, selector: &str) -> Result<(), UiError> {
        self.send_ok(&BrowserRequest::scroll_into_view(selector), "scroll_into_view")?;
        Ok(())
    }

    /// Tag the first matching element and return its tracking token.
    /// None when nothing matched.
    pub fn mark(&mut self, selector: &str) -> Result<Option<String>, UiError> {
        let response = self.send_ok(&BrowserRequest::mark(selector), "mark")?;
        Ok(response.token)
    }

    /// Whether a previously marked element is still attached to the DOM.
    pub fn check_mark(&mut self, token: &str) -> Result<bool, UiError> {
        let response = self.send_ok(&BrowserRequest::check_mark(token), "check_mark")?;
        Ok(response.attached.unwrap_or(false))
    }

    /// Resolve the absolute href of the first matching link.
    pub fn download_url(&mut self, selector: &str) -> Result<Option<String>, UiError> {
        let response = self.send_ok(&BrowserRequest::download_url(selector), "download_url")?;
        Ok(response.href)
    }

    pub fn screenshot(&mut self, path: &str) -> Result<(), UiError> {
        self.send_ok(&BrowserRequest::screenshot(path), "screenshot")?;
        Ok(())
    }

    pub fn wait_idle(&mut self, ms: u64) -> Result<(), UiError> {
        self.send_ok(&BrowserRequest::wait(ms), "wait")?;
        Ok(())
    }

    pub fn current_url(&mut self) -> Result<String, UiError> {
        let response = self.send_ok(&BrowserRequest::current_url(), "current_url")?;
        let url = response.url.ok_or_else(|| UiError::SessionProtocol {
            command: "current_url".into(),
            error: "No URL in current_url response".into(),
        })?;
        self.current_url = Some(url.clone());
        Ok(url)
    }

    /// Last known URL (cached, no browser call).
    pub fn last_url(&self) -> Option<&str> {
        self.current_url.as_deref()
    }

    /// Quit the browser session.
    pub fn quit(&mut self) -> Result<(), UiError> {
        // Best-effort quit, the process may already be gone
        let _ = self.send(&BrowserRequest::quit());
        let _ = self.child.wait();
        Ok(())
    }
}

impl Drop for BrowserSession {
    fn drop(&mut self) {
        let _ = self.quit();
    }
}
