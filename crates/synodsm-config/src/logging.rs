// Tracing subscriber setup shared by every binary built on synodsm.

use tracing_subscriber::EnvFilter;

/// Filter directive for a `-v` count.
pub fn verbosity_filter(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Install a fmt subscriber filtered by `RUST_LOG`, else by `verbosity`.
///
/// Returns `false` if a global subscriber was already installed.
pub fn init_tracing(verbosity: u8) -> bool {
    init_tracing_with(verbosity_filter(verbosity))
}

/// Install a fmt subscriber filtered by `RUST_LOG`, else by `directive`
/// (e.g. the config's `defaults.log_level`).
pub fn init_tracing_with(directive: &str) -> bool {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive)),
        )
        .with_target(false)
        .try_init()
        .is_ok()
}
