//! TCP listener implementation.
//!
//! # Responsibilities
//! - Bind to the configured address with the configured backlog
//! - Accept incoming TCP connections
//!
//! Clients queue at the transport layer up to the backlog; attempts
//! beyond it are refused by the kernel, not by this code.

use std::net::SocketAddr;
use tokio::net::{TcpListener, TcpSocket, TcpStream};

use crate::config::ListenerConfig;

/// Error type for listener operations.
#[derive(Debug)]
pub enum ListenerError {
    /// Failed to bind to address. Fatal: a human must resolve the conflict.
    Bind(std::io::Error),
    /// Failed to accept a connection. Fatal: the accept loop exits.
    Accept(std::io::Error),
}

impl std::fmt::Display for ListenerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ListenerError::Bind(e) => write!(f, "Failed to bind: {}", e),
            ListenerError::Accept(e) => write!(f, "Failed to accept: {}", e),
        }
    }
}

impl std::error::Error for ListenerError {}

/// The bound, listening endpoint accepting new connections.
///
/// Created once at startup and owned exclusively by the accept loop for
/// the lifetime of the process.
pub struct Listener {
    /// The underlying TCP listener.
    inner: TcpListener,
}

impl Listener {
    /// Bind to the configured address with the configured backlog.
    pub async fn bind(config: &ListenerConfig) -> Result<Self, ListenerError> {
        let addr: SocketAddr = config.bind_address.parse().map_err(|e| {
            ListenerError::Bind(std::io::Error::new(std::io::ErrorKind::InvalidInput, e))
        })?;

        // TcpSocket instead of TcpListener::bind so the backlog is explicit.
        let socket = match addr {
            SocketAddr::V4(_) => TcpSocket::new_v4(),
            SocketAddr::V6(_) => TcpSocket::new_v6(),
        }
        .map_err(ListenerError::Bind)?;

        socket.set_reuseaddr(true).map_err(ListenerError::Bind)?;
        socket.bind(addr).map_err(ListenerError::Bind)?;

        let listener = socket.listen(config.backlog).map_err(ListenerError::Bind)?;
        let local_addr = listener.local_addr().map_err(ListenerError::Bind)?;

        tracing::info!(
            address = %local_addr,
            backlog = config.backlog,
            "Listener bound"
        );

        Ok(Self { inner: listener })
    }

    /// Accept a new connection.
    pub async fn accept(&self) -> Result<(TcpStream, SocketAddr), ListenerError> {
        let (stream, addr) = self.inner.accept().await.map_err(ListenerError::Accept)?;

        tracing::debug!(peer_addr = %addr, "Connection accepted");

        Ok((stream, addr))
    }

    /// Get the local address this listener is bound to.
    pub fn local_addr(&self) -> Result<SocketAddr, std::io::Error> {
        self.inner.local_addr()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn bind_reports_local_addr() {
        let config = ListenerConfig {
            bind_address: "127.0.0.1:0".to_string(),
            backlog: 5,
        };
        let listener = Listener::bind(&config).await.unwrap();
        assert_ne!(listener.local_addr().unwrap().port(), 0);
    }

    #[tokio::test]
    async fn bind_rejects_garbage_address() {
        let config = ListenerConfig {
            bind_address: "nowhere".to_string(),
            backlog: 5,
        };
        match Listener::bind(&config).await {
            Err(ListenerError::Bind(_)) => {}
            other => panic!("expected bind error, got {:?}", other.map(|_| ())),
        }
    }

    #[tokio::test]
    async fn port_conflict_is_a_bind_error() {
        let config = ListenerConfig {
            bind_address: "127.0.0.1:0".to_string(),
            backlog: 5,
        };
        let first = Listener::bind(&config).await.unwrap();
        let taken = ListenerConfig {
            bind_address: first.local_addr().unwrap().to_string(),
            backlog: 5,
        };
        assert!(matches!(
            Listener::bind(&taken).await,
            Err(ListenerError::Bind(_))
        ));
    }
}
