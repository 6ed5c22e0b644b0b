//! Connection identity and sibling tracking.
//!
//! # Responsibilities
//! - Generate unique connection IDs for tracing
//! - Track currently-active connections so a worker can enumerate its
//!   siblings at startup (a diagnostic aid, nothing depends on it)

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use dashmap::DashMap;

/// Global atomic counter for connection IDs.
/// Relaxed ordering is sufficient since we only need uniqueness.
static CONNECTION_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Unique identifier for a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(u64);

impl ConnectionId {
    /// Generate a new unique connection ID.
    pub fn new() -> Self {
        Self(CONNECTION_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// Get the raw ID value.
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

/// Registry of active connections, shared by the accept loop and workers.
#[derive(Debug, Clone, Default)]
pub struct ConnectionRegistry {
    active: Arc<DashMap<u64, SocketAddr>>,
}

impl ConnectionRegistry {
    /// Create a new, empty registry.
    pub fn new() -> Self {
        Self {
            active: Arc::new(DashMap::new()),
        }
    }

    /// Record a new active connection. Returns a guard that removes the
    /// entry when dropped.
    pub fn track(&self, peer: SocketAddr) -> ConnectionGuard {
        let id = ConnectionId::new();
        self.active.insert(id.as_u64(), peer);
        ConnectionGuard {
            active: Arc::clone(&self.active),
            id,
            peer,
        }
    }

    /// Get the current active connection count.
    pub fn active_count(&self) -> usize {
        self.active.len()
    }
}

/// Guard that tracks a connection's lifetime.
/// Removes the registry entry when dropped.
#[derive(Debug)]
pub struct ConnectionGuard {
    active: Arc<DashMap<u64, SocketAddr>>,
    id: ConnectionId,
    peer: SocketAddr,
}

impl ConnectionGuard {
    /// Get this connection's ID.
    pub fn id(&self) -> ConnectionId {
        self.id
    }

    /// Get the peer address of this connection.
    pub fn peer(&self) -> SocketAddr {
        self.peer
    }

    /// Enumerate the other connections currently active.
    pub fn siblings(&self) -> Vec<(ConnectionId, SocketAddr)> {
        self.active
            .iter()
            .filter(|entry| *entry.key() != self.id.as_u64())
            .map(|entry| (ConnectionId(*entry.key()), *entry.value()))
            .collect()
    }
}

impl Drop for ConnectionGuard {
    fn drop(&mut self) {
        self.active.remove(&self.id.as_u64());
        tracing::trace!(connection_id = %self.id, "Connection closed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn peer(port: u16) -> SocketAddr {
        format!("127.0.0.1:{}", port).parse().unwrap()
    }

    #[test]
    fn connection_id_unique() {
        let id1 = ConnectionId::new();
        let id2 = ConnectionId::new();
        assert_ne!(id1, id2);
    }

    #[test]
    fn registry_counts_and_releases() {
        let registry = ConnectionRegistry::new();
        assert_eq!(registry.active_count(), 0);

        let guard1 = registry.track(peer(1000));
        assert_eq!(registry.active_count(), 1);

        let guard2 = registry.track(peer(1001));
        assert_eq!(registry.active_count(), 2);

        drop(guard1);
        assert_eq!(registry.active_count(), 1);

        drop(guard2);
        assert_eq!(registry.active_count(), 0);
    }

    #[test]
    fn siblings_exclude_self() {
        let registry = ConnectionRegistry::new();
        let guard1 = registry.track(peer(2000));
        let guard2 = registry.track(peer(2001));

        let siblings = guard1.siblings();
        assert_eq!(siblings.len(), 1);
        assert_eq!(siblings[0].0, guard2.id());
        assert_eq!(siblings[0].1, peer(2001));

        drop(guard2);
        assert!(guard1.siblings().is_empty());
    }
}
