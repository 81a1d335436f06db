//! Global tracing setup. `RUST_LOG` always wins; without it the configured
//! level drives the pipeline while the HTTP internals stay at `warn`.

use thiserror::Error;
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::EnvFilter;

use crate::config::TelemetryConfig;

// hyper and mio log every connection event at debug; keep them quiet unless
// RUST_LOG asks for them explicitly.
const QUIET_DEPS: &[&str] = &["hyper=warn", "mio=warn"];

#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("invalid log level/filter '{value}'")]
    Filter {
        value: String,
        #[source]
        source: ParseError,
    },
    #[error("failed to install tracing subscriber: {0}")]
    Subscriber(Box<dyn std::error::Error + Send + Sync>),
}

fn pipeline_filter(log_level: &str) -> Result<EnvFilter, TelemetryError> {
    let mut directives = log_level.to_string();
    for dep in QUIET_DEPS {
        directives.push(',');
        directives.push_str(dep);
    }
    EnvFilter::try_new(&directives).map_err(|source| TelemetryError::Filter {
        value: directives,
        source,
    })
}

pub fn init(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => pipeline_filter(&config.log_level)?,
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .with_ansi(false)
        .try_init()
        .map_err(TelemetryError::Subscriber)
}
