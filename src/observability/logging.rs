//! Structured logging initialization.

use std::fs::OpenOptions;

use thiserror::Error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::ObservabilityConfig;

/// Fatal errors while bringing up the logging subsystem.
#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("failed to open log file {path}: {source}")]
    OpenLogFile {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Initialize the process-wide tracing subscriber.
///
/// `RUST_LOG` overrides the configured level. With `to_file` set (daemon
/// mode) output goes to the configured log file with ANSI disabled;
/// otherwise it goes to stdout.
pub fn init_logging(config: &ObservabilityConfig, to_file: bool) -> Result<(), LoggingError> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level));

    if to_file {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&config.log_file)
            .map_err(|source| LoggingError::OpenLogFile {
                path: config.log_file.clone(),
                source,
            })?;

        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(file)
                    .with_ansi(false),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    Ok(())
}
