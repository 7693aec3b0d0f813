//! Diagnostic output for a deployment run
//!
//! Resolvers and the materializer emit `tracing` events; the binary installs
//! a plain fmt subscriber once at startup.

use std::sync::OnceLock;

static INSTALLED: OnceLock<()> = OnceLock::new();

/// Environment variable holding the log level (`trace` .. `error`)
pub const LOG_ENV: &str = "ARTIFACTOR_LOG";

fn parse_level(raw: Option<&str>) -> tracing::Level {
    match raw.map(str::trim).unwrap_or("info").to_ascii_lowercase().as_str() {
        "trace" => tracing::Level::TRACE,
        "debug" => tracing::Level::DEBUG,
        "warn" | "warning" => tracing::Level::WARN,
        "error" => tracing::Level::ERROR,
        _ => tracing::Level::INFO,
    }
}

/// Install the fmt subscriber at the level named by `ARTIFACTOR_LOG`.
///
/// Unknown or missing values fall back to `info`. Repeated calls are no-ops,
/// and a subscriber installed elsewhere first is left in place.
pub fn init() {
    if INSTALLED.get().is_some() {
        return;
    }
    let level = parse_level(std::env::var(LOG_ENV).ok().as_deref());
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .try_init();
    let _ = INSTALLED.set(());
}
