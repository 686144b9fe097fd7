//! Subscriber setup for the CLI.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install a `fmt` subscriber at `level`.
///
/// `RUST_LOG` takes precedence when set. Returns `false` if a global
/// subscriber was already installed; the existing one is kept.
pub fn init(level: &str) -> bool {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(filter)
        .try_init()
        .is_ok()
}
