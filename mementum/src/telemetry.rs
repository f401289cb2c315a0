//! Log output setup for applications using mementum.
//!
//! The library crates only emit `tracing` events. Binaries call one of these
//! once at startup to print them.

use tracing_subscriber::{fmt, EnvFilter};

/// Environment variable read for the log filter before `RUST_LOG`.
pub const LOG_ENV: &str = "MEMENTUM_LOG";

/// Filter used when neither variable is set.
pub const DEFAULT_FILTER: &str = "info";

/// Build the log filter from `MEMENTUM_LOG`, then `RUST_LOG`, then
/// [`DEFAULT_FILTER`]. A variable that does not parse is skipped.
pub fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Install a human-readable subscriber.
///
/// Returns `false` if a global subscriber was already installed.
pub fn init_tracing() -> bool {
    fmt().with_env_filter(env_filter()).try_init().is_ok()
}

/// Install a subscriber that writes one JSON object per event.
///
/// Returns `false` if a global subscriber was already installed.
pub fn init_json_tracing() -> bool {
    fmt().json().with_env_filter(env_filter()).try_init().is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_filter_precedence() {
        std::env::set_var(LOG_ENV, "mementum_auth=debug");
        assert_eq!(env_filter().to_string(), "mementum_auth=debug");

        std::env::set_var("RUST_LOG", "warn");
        assert_eq!(env_filter().to_string(), "mementum_auth=debug");

        std::env::remove_var(LOG_ENV);
        assert_eq!(env_filter().to_string(), "warn");

        std::env::remove_var("RUST_LOG");
        assert_eq!(env_filter().to_string(), DEFAULT_FILTER);
    }

    #[test]
    fn test_init_once() {
        init_tracing();
        assert!(!init_tracing());
        assert!(!init_json_tracing());
    }
}
