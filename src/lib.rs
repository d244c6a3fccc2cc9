use crate::browser::session::BrowserSession;
use crate::pages::compliance::CompliancePage;
use crate::trace::logger::TraceLogger;
use crate::traverse::model::TraversalResult;
use crate::traverse::traverser::{CancelToken, GridTraverser, TraverserConfig};

pub mod adapter;
pub mod browser;
pub mod cli;
pub mod pages;
pub mod report;
pub mod suite;
pub mod text;
pub mod trace;
pub mod traverse;

/// Convenience entry point: audit the compliance grid of the app at
/// `TARGET_URL` (or localhost) with default waits, reconciling against the
/// header badge.
pub fn run_audit() -> Result<TraversalResult, Box<dyn std::error::Error>> {
    let base_url =
        std::env::var("TARGET_URL").unwrap_or_else(|_| "http://localhost:8080".to_string());
    let tracer = TraceLogger::new("pagewalk_trace.jsonl");
    let traverser = GridTraverser::new(TraverserConfig::default());

    let mut session = BrowserSession::launch()?;
    let mut page = CompliancePage::new(&mut session);
    page.open(&base_url)?;

    let expected = page.badge_total()?.unwrap_or(0);
    println!("=== Auditing compliance grid at {} (badge: {}) ===", base_url, expected);

    let cancel = CancelToken::new();
    let result = page.audit_grid(&traverser, expected, None, &cancel, &tracer)?;

    println!(
        "Visited {} pages, collected {} values ({} distinct), ended {:?}",
        result.pages_visited, result.total_collected, result.distinct_count, result.terminal
    );

    session.quit()?;
    Ok(result)
}
