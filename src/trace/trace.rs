use serde::Serialize;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::traverse::model::PageTiming;

#[derive(Debug, Serialize)]
pub struct TraceEvent {
    pub timestamp_ms: u128,

    /// Traversal phase: "ready_wait", "read", "advance", "stall",
    /// "discrepancy", "callback", "cancel", "check"
    pub phase: String,

    pub page: Option<usize>,

    pub elapsed_ms: Option<u128>,
    pub timing_class: Option<String>,

    pub signature: Option<String>,
    pub collected_total: Option<usize>,

    pub note: Option<String>,
}

impl TraceEvent {
    pub fn now(phase: &str) -> Self {
        Self {
            timestamp_ms: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_millis())
                .unwrap_or(0),
            phase: phase.to_string(),
            page: None,
            elapsed_ms: None,
            timing_class: None,
            signature: None,
            collected_total: None,
            note: None,
        }
    }

    pub fn with_page(mut self, page: usize) -> Self {
        self.page = Some(page);
        self
    }

    pub fn with_timing(mut self, timing: &PageTiming) -> Self {
        self.elapsed_ms = Some(timing.elapsed_ms);
        self.timing_class = Some(format!("{:?}", timing.class));
        self
    }

    pub fn with_signature(mut self, signature: impl ToString) -> Self {
        self.signature = Some(signature.to_string());
        self
    }

    pub fn with_total(mut self, total: usize) -> Self {
        self.collected_total = Some(total);
        self
    }

    pub fn with_note(mut self, note: impl ToString) -> Self {
        self.note = Some(note.to_string());
        self
    }
}
