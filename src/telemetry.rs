//! Tracing initialisation for the binaries.
//!
//! Logs go to stderr so that reports written to stdout stay machine-readable.

use crate::config::LoggingConfig;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Initialise the global tracing subscriber.
///
/// `RUST_LOG` takes precedence; otherwise `verbose` selects `debug` and the
/// configured level applies. `json` forces JSON output regardless of the
/// configured format. Only the first call in a process takes effect.
pub fn init_tracing(logging: &LoggingConfig, verbose: bool, json: bool) {
    let level = if verbose { "debug" } else { logging.level.as_str() };
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("cad_ews={level},sample_data={level},warn")));

    if json || logging.is_json() {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().with_writer(std::io::stderr).json())
            .try_init()
            .ok();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
            .try_init()
            .ok();
    }
}
