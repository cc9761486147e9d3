//! Command deny-list.

use std::collections::HashSet;

use async_trait::async_trait;
use tracing::info;

use ftplet_core::types::{CommandRequest, Session};

use crate::hooks::definitions::{PluginOutcome, Verdict};
use crate::traits::Plugin;

/// Rejects configured command verbs before they execute.
#[derive(Debug, Clone)]
pub struct CommandGuard {
    /// Denied verbs, upper-cased.
    denied: HashSet<String>,
    /// Verdict returned for a denied verb.
    verdict: Verdict,
}

impl CommandGuard {
    /// Creates a guard that answers `verdict` to any verb in `denied`.
    ///
    /// A `Continue` verdict makes the guard a no-op; callers normally pass
    /// `SkipRemaining` or `TerminateSession`.
    pub fn new<I, S>(denied: I, verdict: Verdict) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            denied: denied
                .into_iter()
                .map(|verb| verb.as_ref().to_ascii_uppercase())
                .collect(),
            verdict,
        }
    }

    /// Checks whether `command` is denied.
    pub fn denies(&self, command: &str) -> bool {
        self.denied.contains(&command.to_ascii_uppercase())
    }
}

#[async_trait]
impl Plugin for CommandGuard {
    async fn before_command(&self, session: &Session, request: &CommandRequest) -> PluginOutcome {
        if !self.denied.contains(&request.command) {
            return Ok(Verdict::Continue);
        }

        info!(
            session_id = %session.id,
            command = %request.command,
            verdict = self.verdict.as_str(),
            "Denied command"
        );

        Ok(self.verdict)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_denied_verbs_case_insensitive() {
        let guard = CommandGuard::new(["dele", "RMD"], Verdict::TerminateSession);
        let session = Session::new("203.0.113.7:2020".parse().expect("addr"));

        let dele = CommandRequest::new("DELE", Some("x"));
        let rmd = CommandRequest::new("rmd", Some("dir"));
        let retr = CommandRequest::new("RETR", Some("x"));

        assert_eq!(
            guard.before_command(&session, &dele).await.ok(),
            Some(Verdict::TerminateSession)
        );
        assert_eq!(
            guard.before_command(&session, &rmd).await.ok(),
            Some(Verdict::TerminateSession)
        );
        assert_eq!(
            guard.before_command(&session, &retr).await.ok(),
            Some(Verdict::Continue)
        );
        assert!(guard.denies("Dele"));
        assert!(!guard.denies("STOR"));
    }
}
