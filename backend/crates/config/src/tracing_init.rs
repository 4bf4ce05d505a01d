use tracing_subscriber::{fmt, EnvFilter};

/// Install the global subscriber, writing to stderr so stdout stays free for
/// the JSON report.
///
/// A `RUST_LOG` directive wins over `level` (normally `AppConfig::log_level`).
/// Calling it again is a no-op.
pub fn init_tracing(level: &str) {
    let rust_log = std::env::var("RUST_LOG").ok();
    let _ = fmt()
        .with_env_filter(select_filter(rust_log.as_deref(), level))
        .with_writer(std::io::stderr)
        .with_target(true)
        .try_init();
}

/// First directive that parses, falling back to `info`.
fn select_filter(rust_log: Option<&str>, level: &str) -> EnvFilter {
    rust_log
        .into_iter()
        .chain([level])
        .filter(|d| !d.trim().is_empty())
        .find_map(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new("info"))
}
