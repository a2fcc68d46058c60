//! Tracing subscriber setup.

use crate::config::env_vars;

/// Filter used when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "extloom_core=info,extloom_aggregate=info";

/// Install a global fmt subscriber.
///
/// The filter comes from `RUST_LOG`, falling back to [`DEFAULT_FILTER`].
/// Output is JSON when `EXTLOOM_LOG_JSON` is `true`. Calling this more than
/// once is harmless; later calls leave the first subscriber in place.
pub fn init() {
    let json = std::env::var(env_vars::LOG_JSON)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(false);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(DEFAULT_FILTER));

    let _ = if json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(env_filter)
            .with_target(true)
            .try_init()
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .compact()
            .try_init()
    };
}
