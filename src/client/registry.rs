//! Client registry
//!
//! Tracks connected clients so the server can enforce its connection limit.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::time::{Duration, Instant};

/// Registry of active connections, keyed by peer address
#[derive(Debug, Default)]
pub struct ClientRegistry {
    clients: HashMap<SocketAddr, Instant>,
}

impl ClientRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a connection unless `max_clients` are already connected.
    pub fn try_insert(&mut self, addr: SocketAddr, max_clients: usize) -> bool {
        if self.clients.len() >= max_clients {
            return false;
        }
        self.clients.insert(addr, Instant::now());
        true
    }

    /// Removes a connection, returning how long it was connected.
    pub fn remove(&mut self, addr: &SocketAddr) -> Option<Duration> {
        self.clients.remove(addr).map(|since| since.elapsed())
    }

    pub fn len(&self) -> usize {
        self.clients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(port: u16) -> SocketAddr {
        SocketAddr::from(([127, 0, 0, 1], port))
    }

    #[test]
    fn test_enforces_capacity() {
        let mut registry = ClientRegistry::new();
        assert!(registry.try_insert(addr(1), 2));
        assert!(registry.try_insert(addr(2), 2));
        assert!(!registry.try_insert(addr(3), 2));
        assert_eq!(registry.len(), 2);

        assert!(registry.remove(&addr(1)).is_some());
        assert!(registry.try_insert(addr(3), 2));
    }

    #[test]
    fn test_remove_unknown() {
        let mut registry = ClientRegistry::new();
        assert!(registry.remove(&addr(9)).is_none());
        assert!(registry.is_empty());
    }
}
