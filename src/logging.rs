//! Process-wide `tracing` setup shared by the binaries.

use tracing_subscriber::{EnvFilter, fmt};

/// Environment variable holding the filter directive, e.g. `geminichat=debug`.
pub const LOG_ENV: &str = "GEMINICHAT_LOG";

/// Install a stderr `fmt` subscriber filtered by `GEMINICHAT_LOG`.
///
/// `default_directive` applies when the variable is unset or unparsable.
/// Calling this twice is harmless; the second install is ignored.
pub fn init_tracing(default_directive: &str) {
    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_directive));
    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    if tracing::subscriber::set_global_default(subscriber).is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
}
