//! Concurrent connection limit.

use std::collections::HashSet;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::warn;

use ftplet_core::types::{ConnectionLimit, Session, SessionId};

use crate::error::PluginFault;
use crate::hooks::definitions::{PluginOutcome, Verdict};
use crate::traits::Plugin;

/// Terminates new sessions once the number of admitted live sessions
/// reaches the limit.
#[derive(Debug)]
pub struct ConnectionLimiter {
    limit: ConnectionLimit,
    /// Sessions admitted and not yet disconnected.
    admitted: Mutex<HashSet<SessionId>>,
}

impl ConnectionLimiter {
    /// Creates a limiter.
    pub fn new(limit: impl Into<ConnectionLimit>) -> Self {
        Self {
            limit: limit.into(),
            admitted: Mutex::new(HashSet::new()),
        }
    }

    /// Returns the configured limit.
    pub fn limit(&self) -> ConnectionLimit {
        self.limit
    }

    /// Number of admitted live sessions.
    pub async fn active(&self) -> usize {
        self.admitted.lock().await.len()
    }
}

#[async_trait]
impl Plugin for ConnectionLimiter {
    async fn destroy(&self) -> Result<(), PluginFault> {
        self.admitted.lock().await.clear();
        Ok(())
    }

    async fn on_connect(&self, session: &Session) -> PluginOutcome {
        let mut admitted = self.admitted.lock().await;
        let active = u32::try_from(admitted.len()).unwrap_or(u32::MAX);

        if self.limit.is_exceeded_by(active) {
            warn!(
                session_id = %session.id,
                remote_addr = %session.remote_addr,
                active = active,
                max = ?self.limit.as_max(),
                "Connection limit reached"
            );
            return Ok(Verdict::TerminateSession);
        }

        admitted.insert(session.id);
        Ok(Verdict::Continue)
    }

    async fn on_disconnect(&self, session: &Session) -> PluginOutcome {
        // Rejected sessions were never admitted; removing them is a no-op.
        self.admitted.lock().await.remove(&session.id);
        Ok(Verdict::Continue)
    }
}
