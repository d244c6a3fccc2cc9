use std::time::Duration;

use crate::adapter::error::UiError;

/// What a verified download looked like.
#[derive(Debug, Clone)]
pub struct DownloadInfo {
    pub url: String,
    pub byte_count: usize,
    pub content_type: Option<String>,
}

/// Fetch a download URL out-of-band and verify it is a real file: HTTP 2xx,
/// at least `min_bytes` of body, and (when given) the expected content type.
///
/// Browser-native download events are invisible to the NDJSON helper, so the
/// suite resolves the link's href and fetches it directly instead.
pub fn fetch_and_verify(
    url: &str,
    min_bytes: usize,
    expected_content_type: Option<&str>,
) -> Result<DownloadInfo, UiError> {
    let client = reqwest::blocking::Client::builder()
        .timeout(Duration::from_secs(30))
        .build()
        .map_err(|e| UiError::Download {
            url: url.to_string(),
            detail: format!("client build failed: {}", e),
        })?;

    let response = client.get(url).send().map_err(|e| UiError::Download {
        url: url.to_string(),
        detail: format!("request failed: {}", e),
    })?;

    let status = response.status();
    if !status.is_success() {
        return Err(UiError::Download {
            url: url.to_string(),
            detail: format!("HTTP {}", status),
        });
    }

    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string());

    if let Some(expected) = expected_content_type {
        let actual = content_type.as_deref().unwrap_or("");
        if !actual.starts_with(expected) {
            return Err(UiError::Download {
                url: url.to_string(),
                detail: format!("content type '{}', expected '{}'", actual, expected),
            });
        }
    }

    let body = response.bytes().map_err(|e| UiError::Download {
        url: url.to_string(),
        detail: format!("body read failed: {}", e),
    })?;

    if body.len() < min_bytes {
        return Err(UiError::Download {
            url: url.to_string(),
            detail: format!("{} bytes, expected at least {}", body.len(), min_bytes),
        });
    }

    Ok(DownloadInfo {
        url: url.to_string(),
        byte_count: body.len(),
        content_type,
    })
}
