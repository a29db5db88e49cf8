//! Tracing subscriber setup for the `npdk` binary.

use tracing_subscriber::EnvFilter;

/// Environment variable holding a tracing filter, e.g. `npdk=debug`.
pub const LOG_ENV: &str = "NPDK_LOG";

/// Builds the filter: `NPDK_LOG` if set and valid, else `debug` or `info`
/// for this crate depending on `verbose`.
#[must_use]
pub fn filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| {
        EnvFilter::new(if verbose { "npdk=debug" } else { "npdk=info" })
    })
}

/// Installs the global subscriber, writing to stderr.
///
/// Stdout is reserved for command output. Calling this twice is harmless;
/// the second call leaves the first subscriber in place.
pub fn init(verbose: bool) {
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter(verbose))
        .with_target(false)
        .try_init();
}
