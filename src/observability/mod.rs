//! Observability subsystem.
//!
//! # Design Decisions
//! - Structured logging via the tracing crate
//! - Connection IDs flow through every per-connection log line
//! - Foreground runs log to stdout; daemonized runs log to a file
//!   (stdio is detached there), and failing to open it is fatal

pub mod logging;

pub use logging::{init_logging, LoggingError};
