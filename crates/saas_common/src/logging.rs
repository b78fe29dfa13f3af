//! Logging setup shared by the service crates.
//!
//! Sets up a `tracing` subscriber with an `EnvFilter` (honouring `RUST_LOG`)
//! and a fmt layer carrying target, file and line information.

use tracing::{error, info, Level};
use tracing_subscriber::{filter::Directive, fmt, prelude::*, EnvFilter};

/// Crates whose log level follows the level passed to [`init_with_level`].
const SERVICE_TARGETS: [&str; 4] = [
    "saas_backend",
    "saas_stripe_connect",
    "saas_common",
    "saas_config",
];

/// Initialize the tracing subscriber at INFO.
///
/// ```
/// use saas_common::logging;
///
/// logging::init();
/// ```
pub fn init() {
    init_with_level(Level::INFO);
}

/// Initialize the tracing subscriber with a specific log level for the service crates.
///
/// Calling this more than once is harmless: the first subscriber stays installed.
pub fn init_with_level(level: Level) {
    let filter = SERVICE_TARGETS
        .iter()
        .filter_map(|target| format!("{}={}", target, level).parse::<Directive>().ok())
        .fold(EnvFilter::from_default_env(), |filter, directive| {
            filter.add_directive(directive)
        });

    let result = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(true)
                .with_file(true)
                .with_line_number(true)
                .with_thread_ids(true),
        )
        .with(filter)
        .try_init();

    if result.is_ok() {
        info!("Logging initialized at level: {}", level);
    }
}

/// Log an error with context at the ERROR level.
pub fn log_error<E: std::fmt::Display>(error: E, context: &str) {
    error!("{}: {}", context, error);
}

/// Logs the error case of `result` with context and hands the result back.
pub fn log_result<T, E: std::fmt::Display>(result: Result<T, E>, error_context: &str) -> Result<T, E> {
    if let Err(e) = &result {
        error!("{}: {}", error_context, e);
    }
    result
}
