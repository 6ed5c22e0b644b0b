//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming TCP connection
//!     → listener.rs (bind, backlog, accept)
//!     → connection.rs (identity, sibling registry)
//!     → Hand off to the request cycle (http)
//! ```
//!
//! # Design Decisions
//! - The listening socket is owned by exactly one accept loop
//! - Accepted streams are moved into their worker task: ownership
//!   transfer replaces manual descriptor reference counting
//! - Bind and accept failures are fatal; there is no retry policy

pub mod connection;
pub mod listener;

pub use connection::{ConnectionGuard, ConnectionId, ConnectionRegistry};
pub use listener::{Listener, ListenerError};
