//! ackd — a minimal TCP acknowledgement server.
//!
//! Binds a well-known port, accepts inbound connections, and runs one
//! isolated worker task per connection. Each worker performs a single
//! read → parse → respond cycle against an incremental HTTP request
//! tokenizer and then closes the connection.
//!
//! # Architecture Overview
//!
//! ```text
//!                    ┌──────────────────────────────────────────────┐
//!                    │                    ackd                       │
//!                    │                                               │
//!   Client ──────────┼─▶ net::listener ──▶ http::server (accept     │
//!                    │     (bind/accept)      loop + dispatch)       │
//!                    │                           │                   │
//!                    │              one task per connection          │
//!                    │                           ▼                   │
//!                    │    http::cycle ──▶ http::parser ──▶ http::    │
//!                    │    (request cycle)  (tokenizer      response  │
//!                    │                      boundary)     (fixed ack)│
//!                    │                           │                   │
//!                    │                    join handle                │
//!                    │                           ▼                   │
//!                    │              lifecycle::reaper (supervisor)   │
//!                    │                                               │
//!                    │  ┌─────────────────────────────────────────┐  │
//!                    │  │          Cross-Cutting Concerns          │  │
//!                    │  │  config   observability   lifecycle::    │  │
//!                    │  │                            daemon         │  │
//!                    │  └─────────────────────────────────────────┘  │
//!                    └──────────────────────────────────────────────┘
//! ```

// Core subsystems
pub mod config;
pub mod http;
pub mod net;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;

pub use config::ServerConfig;
pub use http::AckServer;
pub use lifecycle::Reaper;
pub use net::Listener;
