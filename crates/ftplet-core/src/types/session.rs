//! Client session snapshot handed to plugins.

use std::collections::HashMap;
use std::net::SocketAddr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::id::SessionId;

/// The protocol engine's view of one client session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// Session identifier.
    pub id: SessionId,
    /// Peer address of the control connection.
    pub remote_addr: SocketAddr,
    /// Authenticated user name, once logged in.
    pub user: Option<String>,
    /// When the control connection was accepted.
    pub connected_at: DateTime<Utc>,
    /// Engine-defined attributes.
    pub attributes: HashMap<String, String>,
}

impl Session {
    /// Creates a session for a freshly accepted connection.
    pub fn new(remote_addr: SocketAddr) -> Self {
        Self {
            id: SessionId::new(),
            remote_addr,
            user: None,
            connected_at: Utc::now(),
            attributes: HashMap::new(),
        }
    }

    /// Sets the authenticated user.
    pub fn with_user(mut self, user: &str) -> Self {
        self.user = Some(user.to_string());
        self
    }

    /// Inserts an attribute.
    pub fn with_attribute(mut self, key: &str, value: &str) -> Self {
        self.attributes.insert(key.to_string(), value.to_string());
        self
    }

    /// Gets an attribute by key.
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    /// Whether the session has authenticated.
    pub fn is_logged_in(&self) -> bool {
        self.user.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let addr: SocketAddr = "10.0.0.7:50412".parse().expect("addr");
        let session = Session::new(addr)
            .with_user("anonymous")
            .with_attribute("tls", "false");

        assert_eq!(session.remote_addr, addr);
        assert!(session.is_logged_in());
        assert_eq!(session.user.as_deref(), Some("anonymous"));
        assert_eq!(session.attribute("tls"), Some("false"));
        assert_eq!(session.attribute("missing"), None);
    }
}
