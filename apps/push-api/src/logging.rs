//! Structured JSON logging setup using tracing.
//!
//! Initializes the tracing subscriber with JSON output suitable for log
//! aggregation. `RUST_LOG` overrides the configured filter when set.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize the tracing subscriber with JSON logging.
///
/// # Arguments
///
/// * `filter` - The log filter directive (e.g., `"info,beacon=debug"`)
///
/// # Panics
///
/// Panics if the subscriber has already been initialized.
pub fn init_logging(filter: &str) {
    let filter_layer =
        match EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(filter)) {
            Ok(f) => f,
            Err(e) => {
                eprintln!("FATAL: Failed to create log filter: {e}");
                std::process::exit(1);
            }
        };

    let fmt_layer = fmt::layer()
        .json()
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(fmt_layer)
        .with(filter_layer)
        .init();

    tracing::info!(filter = %filter, "Logging initialized");
}
