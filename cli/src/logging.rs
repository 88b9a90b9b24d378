//! Logging setup for the proof-exchange commands

use tracing_subscriber::{fmt, EnvFilter};

/// Output format for the log stream
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogFormat {
    /// Compact human-readable lines
    Text,
    /// One JSON object per event, for aggregators
    Json,
}

impl LogFormat {
    /// Map the `--json-logs` flag
    pub fn from_flag(json: bool) -> Self {
        if json {
            LogFormat::Json
        } else {
            LogFormat::Text
        }
    }
}

/// Install the global subscriber.
///
/// Filter precedence: an explicit `RUST_LOG` wins outright; otherwise the
/// `--log-level` flag applies (which clap already backs with the
/// `LOG_LEVEL` environment override). Witness material never reaches a
/// log line, so both formats are safe to ship off-host.
pub fn init(level: &str, format: LogFormat) -> anyhow::Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(from_env) => from_env,
        Err(_) => EnvFilter::try_new(level)
            .map_err(|e| anyhow::anyhow!("bad log level '{level}': {e}"))?,
    };

    let builder = fmt().with_env_filter(filter).with_target(true);

    match format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Text => builder.compact().try_init(),
    }
    .map_err(|e| anyhow::anyhow!("logging already initialized: {e}"))
}
