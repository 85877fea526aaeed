//! Tracing subscriber setup for hosts that do not install their own.

use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter, e.g. `contest_wizard=debug`.
pub const LOG_ENV: &str = "CONTEST_WIZARD_LOG";

const DEFAULT_FILTER: &str = "warn";

/// Install a formatting subscriber filtered by [`LOG_ENV`].
///
/// Returns false if a global subscriber was already set; calling this more
/// than once is harmless.
pub fn init_tracing() -> bool {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .is_ok()
}
