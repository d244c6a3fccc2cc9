use std::time::Duration;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use crate::traverse::traverser::TraverserConfig;

// ============================================================================
// CLI Argument Parsing (clap derive)
// ============================================================================

#[derive(Parser, Debug)]
#[command(
    name = "pagewalk",
    version,
    about = "Page-object UI regression suite with paginated grid auditing"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Base URL of the application under test
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Path to config file (default: pagewalk.yaml in current dir)
    #[arg(long, global = true)]
    pub config: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run screen checks from YAML files
    Run {
        /// Path to a check YAML file or a directory of YAML files
        #[arg(long)]
        suite: String,

        /// Output format: console, junit
        #[arg(long, default_value = "console")]
        format: String,

        /// Output file path (default: stdout)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Traverse the compliance grid and reconcile against the badge total
    Audit {
        /// Expected total; overrides the badge count when set
        #[arg(long)]
        expected: Option<i64>,

        /// Read the expected total from the header badge
        #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
        use_badge: bool,

        /// Fail (exit nonzero) when fewer values are collected than expected
        #[arg(long, default_value_t = false)]
        strict: bool,

        /// Write a screenshot of the final grid state to this path
        #[arg(long)]
        screenshot: Option<String>,
    },
}

// ============================================================================
// Config File Model (optional YAML)
// ============================================================================

/// Optional YAML config file: `pagewalk.yaml`
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub timeouts: TimeoutConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_trace_path")]
    pub trace_path: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            trace_path: default_trace_path(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeoutConfig {
    #[serde(default = "default_poll_ms")]
    pub ready_poll_interval_ms: u64,

    #[serde(default = "default_ready_ms")]
    pub ready_timeout_ms: u64,

    #[serde(default = "default_change_ms")]
    pub change_timeout_ms: u64,

    #[serde(default = "default_warn_ms")]
    pub warn_threshold_ms: u64,

    #[serde(default = "default_fail_ms")]
    pub fail_threshold_ms: u64,

    #[serde(default = "default_max_pages")]
    pub max_pages: usize,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            ready_poll_interval_ms: default_poll_ms(),
            ready_timeout_ms: default_ready_ms(),
            change_timeout_ms: default_change_ms(),
            warn_threshold_ms: default_warn_ms(),
            fail_threshold_ms: default_fail_ms(),
            max_pages: default_max_pages(),
        }
    }
}

// Serde default helpers
fn default_base_url() -> String { "http://localhost:8080".to_string() }
fn default_trace_path() -> String { "pagewalk_trace.jsonl".to_string() }
fn default_poll_ms() -> u64 { 150 }
fn default_ready_ms() -> u64 { 10_000 }
fn default_change_ms() -> u64 { 8_000 }
fn default_warn_ms() -> u64 { 1_500 }
fn default_fail_ms() -> u64 { 4_000 }
fn default_max_pages() -> usize { 500 }

// ============================================================================
// Config File Loading
// ============================================================================

/// Load config from a YAML file. Returns defaults if file is missing or
/// malformed.
pub fn load_config(path: Option<&str>) -> AppConfig {
    let config_path = path.unwrap_or("pagewalk.yaml");
    match std::fs::read_to_string(config_path) {
        Ok(content) => serde_yaml::from_str(&content).unwrap_or_default(),
        Err(_) => AppConfig::default(),
    }
}

// ============================================================================
// Config Builders (merge CLI args with config file)
// ============================================================================

/// Build the traverser wait configuration from resolved config values.
pub fn build_traverser_config(timeouts: &TimeoutConfig) -> TraverserConfig {
    TraverserConfig {
        ready_poll_interval: Duration::from_millis(timeouts.ready_poll_interval_ms),
        ready_timeout: Duration::from_millis(timeouts.ready_timeout_ms),
        change_timeout: Duration::from_millis(timeouts.change_timeout_ms),
        warn_threshold_ms: timeouts.warn_threshold_ms as u128,
        fail_threshold_ms: timeouts.fail_threshold_ms as u128,
        max_pages: timeouts.max_pages,
    }
}

/// Resolve the base URL: CLI flag > config file > default.
pub fn resolve_base_url(cli_base: Option<&str>, config: &AppConfig) -> String {
    cli_base
        .map(|s| s.to_string())
        .unwrap_or_else(|| config.session.base_url.clone())
}
