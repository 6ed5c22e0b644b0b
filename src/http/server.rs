//! Accept loop and connection worker dispatch.
//!
//! # Responsibilities
//! - Run the process's single accept loop
//! - Spawn one isolated worker task per accepted connection
//! - Hand exclusive stream ownership to the worker (the loop keeps
//!   no reference once dispatch completes)
//! - Submit every worker to the reaper so finished tasks are reclaimed
//!
//! A crash in one worker cannot block or corrupt the accept loop or any
//! sibling: workers share no mutable request state.

use tokio::net::TcpStream;

use crate::http::cycle::{self, CycleOutcome};
use crate::http::parser::TraceSink;
use crate::lifecycle::reaper::{Reaper, WorkerOutcome};
use crate::net::connection::{ConnectionGuard, ConnectionRegistry};
use crate::net::listener::{Listener, ListenerError};

/// The acknowledgement server: accept loop plus worker dispatch.
pub struct AckServer {
    registry: ConnectionRegistry,
    reaper: Reaper,
}

impl AckServer {
    /// Create a server that reports worker terminations to `reaper`.
    pub fn new(reaper: Reaper) -> Self {
        Self {
            registry: ConnectionRegistry::new(),
            reaper,
        }
    }

    /// Run the accept loop forever.
    ///
    /// Returns only on an accept failure, which is fatal to the process.
    /// There is no graceful-shutdown state.
    pub async fn run(self, listener: Listener) -> Result<(), ListenerError> {
        if let Ok(addr) = listener.local_addr() {
            tracing::info!(address = %addr, "Accepting connections");
        }

        loop {
            let (stream, peer) = listener.accept().await?;
            let guard = self.registry.track(peer);

            tracing::debug!(
                connection_id = %guard.id(),
                peer = %peer,
                active = self.registry.active_count(),
                "Dispatching connection worker"
            );

            // The stream moves into the task: the worker owns the
            // descriptor exclusively and the loop's reference is gone.
            let handle = tokio::spawn(worker(stream, guard));
            self.reaper.submit(handle);
        }
    }
}

/// One connection worker: a single request cycle, then termination.
async fn worker(mut stream: TcpStream, guard: ConnectionGuard) -> WorkerOutcome {
    let siblings = guard.siblings();
    tracing::debug!(
        connection_id = %guard.id(),
        siblings = ?siblings,
        "Worker started"
    );

    let mut sink = TraceSink;
    let outcome = match cycle::run(&mut stream, &mut sink).await {
        Ok(CycleOutcome::Responded { method }) => {
            tracing::info!(
                connection_id = %guard.id(),
                method = method.as_deref().unwrap_or("-"),
                "Request acknowledged"
            );
            WorkerOutcome::Responded
        }
        Ok(CycleOutcome::UpgradeRequested) => {
            tracing::info!(
                connection_id = %guard.id(),
                "Protocol upgrade requested; not handled, closing"
            );
            WorkerOutcome::UpgradeDetected
        }
        Err(e) => {
            tracing::warn!(
                connection_id = %guard.id(),
                error = %e,
                "Worker terminating without a response"
            );
            WorkerOutcome::Failed
        }
    };

    // stream and guard drop here: descriptor closed, registry entry gone.
    outcome
}
