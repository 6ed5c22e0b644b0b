//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (accept loop, worker dispatch)
//!     → cycle.rs (single read → parse → respond state machine)
//!     → parser.rs (incremental tokenizer boundary)
//!     → response.rs (fixed acknowledgement)
//!     → connection closed
//! ```

pub mod cycle;
pub mod parser;
pub mod response;
pub mod server;

pub use cycle::{CycleError, CycleOutcome};
pub use parser::{ParseReport, TokenSink, TraceSink};
pub use response::ACK_RESPONSE;
pub use server::AckServer;
