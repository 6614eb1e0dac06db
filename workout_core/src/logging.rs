//! Tracing setup shared by the `wtimer` binary and the core's unit tests.
//!
//! Diagnostics always go to stderr. Stdout carries the countdown display,
//! so the binary stays quiet below `warn` unless `RUST_LOG` asks for more.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Level used when `RUST_LOG` is unset or cannot be parsed
pub const DEFAULT_LEVEL: &str = "warn";

/// Install the stderr subscriber at [`DEFAULT_LEVEL`]
pub fn init() {
    init_with_level(DEFAULT_LEVEL)
}

/// Install the stderr subscriber with `default_level` as the fallback filter
///
/// Accepts any `EnvFilter` directive, e.g. `"debug"` or
/// `"workout_core::session=trace"`.
pub fn init_with_level(default_level: &str) {
    let layer = fmt::layer()
        .compact()
        .with_target(false)
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(env_filter(default_level))
        .with(layer)
        .init();
}

fn env_filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
}

/// Send debug output through the test harness capture; repeat calls are fine
#[cfg(test)]
pub fn init_test() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter(env_filter("debug"))
        .try_init();
}
