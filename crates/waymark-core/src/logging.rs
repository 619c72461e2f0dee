//! Logging integration for waymark.
//!
//! Provides helpers for configuring [`tracing`]-based logging from
//! [`Settings`](crate::settings::Settings) and for creating per-dispatch spans.

use crate::settings::Settings;

/// Sets up the global tracing subscriber based on the given settings.
///
/// The filter is read from `settings.log_level` (e.g. "debug", "info",
/// "waymark_http=trace"). In debug mode a pretty, human-readable format is
/// used; otherwise a structured JSON format is used.
///
/// Installing a subscriber when one is already set is a no-op.
pub fn setup_logging(settings: &Settings) {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_new(&settings.log_level).unwrap_or_else(|_| EnvFilter::new("info"));

    if settings.debug {
        fmt::Subscriber::builder()
            .with_env_filter(filter)
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .pretty()
            .try_init()
            .ok();
    } else {
        fmt::Subscriber::builder()
            .with_env_filter(filter)
            .with_target(true)
            .json()
            .try_init()
            .ok();
    }
}

/// Creates a tracing span for dispatching one request path.
///
/// # Examples
///
/// ```
/// use waymark_core::logging::dispatch_span;
///
/// let span = dispatch_span("post/42");
/// let _guard = span.enter();
/// tracing::info!("resolving");
/// ```
pub fn dispatch_span(path: &str) -> tracing::Span {
    tracing::info_span!("dispatch", path = path)
}
