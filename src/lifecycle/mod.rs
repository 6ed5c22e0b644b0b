//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (main):
//!     Parse CLI → (optional) daemon.rs detaches → logging → bind → accept loop
//!
//! Worker termination:
//!     accept loop submits join handle → reaper.rs supervisor
//!     → handle reaped on completion, outcome logged
//! ```
//!
//! # Design Decisions
//! - Reaping is channel-driven, never serialized with the accept loop
//! - Daemonization happens before the async runtime starts
//! - There is no graceful shutdown: the accept loop runs until the
//!   process exits

pub mod daemon;
pub mod reaper;

pub use daemon::{daemonize, DaemonError};
pub use reaper::{Reaper, WorkerOutcome};
