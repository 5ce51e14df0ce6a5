//! Logging setup shared by every subcommand.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Environment variable holding the log filter.
pub const LOG_ENV: &str = "LEDGERPAY_LOG";

/// Initialize tracing with the `LEDGERPAY_LOG` environment variable.
///
/// Defaults to "info" level if it is not set. Logs go to stderr so stdout
/// stays clean for command output.
pub fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_env(LOG_ENV)
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
