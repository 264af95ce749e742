//! Module `state`
//!
//! Defines the `Client` struct holding per-connection session state.

use std::net::SocketAddr;

/// Session state of a connected client.
///
/// A session is logged in once it has registered, logged in, or presented a
/// valid token. The identity is the student's email.
#[derive(Debug, Clone, Default)]
pub struct Client {
    client_addr: Option<SocketAddr>,
    identity: Option<String>,
}

impl Client {
    pub fn new(client_addr: SocketAddr) -> Self {
        Self {
            client_addr: Some(client_addr),
            identity: None,
        }
    }

    /// Marks the session as authenticated for `email`.
    pub fn login(&mut self, email: String) {
        self.identity = Some(email);
    }

    /// Clears the authenticated identity. The connection address is kept.
    pub fn logout(&mut self) {
        self.identity = None;
    }

    /// Returns whether the client has authenticated.
    pub fn is_logged_in(&self) -> bool {
        self.identity.is_some()
    }

    /// Returns the email the session is authenticated as.
    pub fn identity(&self) -> Option<&str> {
        self.identity.as_deref()
    }

    /// Returns the client's socket address if known.
    pub fn client_addr(&self) -> Option<SocketAddr> {
        self.client_addr
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_logout() {
        let addr: SocketAddr = "127.0.0.1:5000".parse().unwrap();
        let mut client = Client::new(addr);
        assert!(!client.is_logged_in());

        client.login("ada@x.io".into());
        assert_eq!(client.identity(), Some("ada@x.io"));

        client.logout();
        assert!(!client.is_logged_in());
        assert_eq!(client.client_addr(), Some(addr));
    }
}
