//! Observability utilities.

use std::sync::OnceLock;
use tracing::Subscriber;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::types::ObservabilityConfig;

static TRACING_INIT: OnceLock<()> = OnceLock::new();

/// Initialize tracing subscriber once for the process.
///
/// Log format defaults to plain text and can be switched to JSON via
/// `RPC_FRAMING_LOG_FORMAT=json`. Filter defaults to `info` if `RUST_LOG` is unset.
pub fn init_tracing() {
    let json = std::env::var("RPC_FRAMING_LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);
    init_with("info", json);
}

/// Initialize from configuration. `RUST_LOG` still wins over `log_level`.
pub fn init_tracing_from_config(config: &ObservabilityConfig) {
    init_with(&config.log_level, config.json_logs);
}

/// Build the subscriber without installing it.
pub fn subscriber(default_level: &str, json: bool) -> Box<dyn Subscriber + Send + Sync> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    if json {
        Box::new(
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().json()),
        )
    } else {
        Box::new(
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().compact()),
        )
    }
}

fn init_with(default_level: &str, json: bool) {
    TRACING_INIT.get_or_init(|| {
        if let Err(err) = tracing::subscriber::set_global_default(subscriber(default_level, json)) {
            eprintln!("tracing init skipped: {err}");
        }
    });
}
