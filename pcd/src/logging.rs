//! Log output on stderr.

use std::io::{self, IsTerminal};
use tracing::Level;
use tracing_subscriber::{filter::EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Install the global subscriber.
///
/// `RUST_LOG` wins when set; otherwise `level` applies to this tool's crates.
pub fn init_tracing(level: Option<Level>) -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env().or_else(|_| {
        let level_str = match level {
            None => "off",
            Some(Level::TRACE) => "trace",
            Some(Level::DEBUG) => "debug",
            Some(Level::INFO) => "info",
            Some(Level::WARN) => "warn",
            Some(Level::ERROR) => "error",
        };
        EnvFilter::try_new(format!("pcd={level_str},check_deps_core={level_str}"))
    })?;

    let layer = tracing_subscriber::fmt::layer()
        .compact()
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .with_target(false);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(layer)
        .try_init()?;
    Ok(())
}
