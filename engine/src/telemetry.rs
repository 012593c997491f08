//! Telemetry and Observability
//!
//! Sets up `tracing-subscriber` for structured logging. The log level comes
//! from the configuration file unless `RUST_LOG` overrides it. Debug builds
//! log pretty-printed terminal output, release builds JSON with spans.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize the tracing subscriber at the given log level.
///
/// A `RUST_LOG` environment variable takes priority over `log_level`.
/// Repeated calls are no-ops once a subscriber is installed.
pub fn init(log_level: &str) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("{log_level},studycoder_engine={log_level}"))
    });

    #[cfg(debug_assertions)]
    {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().pretty().with_target(false))
            .try_init()
            .ok();
    }

    #[cfg(not(debug_assertions))]
    {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().json().with_current_span(true))
            .try_init()
            .ok();
    }
}

/// Initialize at the default "info" level, for use before config is loaded.
pub fn init_default() {
    init("info");
}
