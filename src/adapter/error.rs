use std::fmt;

#[derive(Debug)]
pub enum UiError {
    /// Node.js helper process failed to spawn (grid_server.js)
    SubprocessSpawn { script: String, source: std::io::Error },

    /// Reading from / writing to the helper process failed
    SessionIo(String),

    /// The helper process reported a command failure it could name
    SessionProtocol { command: String, error: String },

    /// JSON parsing failed (helper output or serde)
    JsonParse { context: String, source: serde_json::Error },

    /// JSON serialization failed (request to the helper)
    JsonSerialize { context: String, source: serde_json::Error },

    /// Element detached/re-rendered between locate and read. Recoverable.
    StaleElement { context: String },

    /// A selector matched nothing where a match was required
    ElementNotFound { selector: String, context: String },

    /// Download verification failed (HTTP status, size, transport)
    Download { url: String, detail: String },
}

impl UiError {
    /// Whether a single local retry of the failed operation is worthwhile.
    /// Only element staleness qualifies; session-level faults do not.
    pub fn is_transient(&self) -> bool {
        matches!(self, UiError::StaleElement { .. })
    }
}

impl fmt::Display for UiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UiError::SubprocessSpawn { script, source } => {
                write!(f, "Failed to spawn {} (is Node.js installed?): {}", script, source)
            }
            UiError::SessionIo(msg) => {
                write!(f, "Browser session I/O error: {}", msg)
            }
            UiError::SessionProtocol { command, error } => {
                write!(f, "Command '{}' failed: {}", command, error)
            }
            UiError::JsonParse { context, source } => {
                write!(f, "JSON parse error ({}): {}", context, source)
            }
            UiError::JsonSerialize { context, source } => {
                write!(f, "JSON serialize error ({}): {}", context, source)
            }
            UiError::StaleElement { context } => {
                write!(f, "Stale element: {}", context)
            }
            UiError::ElementNotFound { selector, context } => {
                write!(f, "Element '{}' not found: {}", selector, context)
            }
            UiError::Download { url, detail } => {
                write!(f, "Download verification failed for {}: {}", url, detail)
            }
        }
    }
}

impl std::error::Error for UiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            UiError::SubprocessSpawn { source, .. } => Some(source),
            UiError::JsonParse { source, .. } => Some(source),
            UiError::JsonSerialize { source, .. } => Some(source),
            _ => None,
        }
    }
}
