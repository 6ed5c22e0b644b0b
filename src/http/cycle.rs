//! The per-connection request cycle.
//!
//! State machine: `READING → PARSING → {RESPONDING | UPGRADING | FAILING} → DONE`.
//!
//! # Design Decisions
//! - A single bounded read, not an accumulation loop. Requests larger
//!   than the buffer or split across TCP segments surface as a parse
//!   mismatch and the connection closes without a response. This is a
//!   deliberate, documented simplification of the protocol cycle.
//! - Zero bytes read is parser end-of-input by convention.
//! - No response is ever written on the failure paths.

use thiserror::Error;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite};

use crate::http::parser::{self, TokenSink};
use crate::http::response;

/// Receive buffer capacity. One byte is reserved, so at most
/// `MAX_READ` bytes of payload are read per connection.
pub const RECV_BUFFER_LEN: usize = 1024;

/// Maximum payload bytes read in the single read step.
pub const MAX_READ: usize = RECV_BUFFER_LEN - 1;

/// Worker-fatal errors of one request cycle.
///
/// These terminate the owning worker only; they never affect sibling
/// workers or the accept loop.
#[derive(Debug, Error)]
pub enum CycleError {
    /// ERROR reading from socket.
    #[error("failed to read from connection: {0}")]
    Read(#[source] std::io::Error),

    /// The tokenizer rejected the input outright.
    #[error("malformed request: {0}")]
    Malformed(#[source] httparse::Error),

    /// Interpreted byte count did not match the bytes read: a malformed
    /// or truncated request. The connection closes without a response.
    #[error("parser interpreted {parsed} of {received} bytes received")]
    ParseMismatch { parsed: usize, received: usize },

    /// ERROR writing to socket.
    #[error("failed to write response: {0}")]
    Write(#[source] std::io::Error),
}

/// How a cycle ended when it did not fail.
#[derive(Debug)]
pub enum CycleOutcome {
    /// The fixed acknowledgement was written.
    Responded {
        /// Last observed request method, for logging.
        method: Option<String>,
    },
    /// The client requested a protocol upgrade. No protocol action is
    /// taken: upgrade handling is an extension point, not implemented.
    UpgradeRequested,
}

/// Run one read → parse → respond cycle over a connection.
pub async fn run<S>(stream: &mut S, sink: &mut dyn TokenSink) -> Result<CycleOutcome, CycleError>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    // READING: one bounded read.
    let mut buffer = [0u8; RECV_BUFFER_LEN];
    let received = stream
        .read(&mut buffer[..MAX_READ])
        .await
        .map_err(CycleError::Read)?;

    // PARSING
    let report = parser::execute(&buffer[..received], sink).map_err(CycleError::Malformed)?;

    tracing::debug!(
        received,
        parsed = report.consumed,
        complete = report.complete,
        "Parser executed"
    );

    if report.upgrade {
        // UPGRADING
        return Ok(CycleOutcome::UpgradeRequested);
    }

    if report.consumed != received {
        // FAILING
        return Err(CycleError::ParseMismatch {
            parsed: report.consumed,
            received,
        });
    }

    // RESPONDING
    response::write_ack(stream).await.map_err(CycleError::Write)?;

    Ok(CycleOutcome::Responded {
        method: report.method,
    })
}
