//! Event kinds, typed session events, and plugin verdicts.

use serde::{Deserialize, Serialize};

use ftplet_core::types::{CommandRequest, Reply, Session};

use crate::diagnostics::FaultReport;
use crate::error::PluginFault;

/// Enumeration of every event a plugin can observe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    // ── Lifecycle ──
    /// Container start-up. Broadcast.
    Init,
    /// Container shutdown or plugin replacement. Broadcast.
    Destroy,

    // ── Session ──
    /// A client connected.
    Connect,
    /// A client disconnected.
    Disconnect,
    /// A command is about to be executed.
    BeforeCommand,
    /// A command was executed and replied to.
    AfterCommand,
}

impl EventKind {
    /// Returns the string name of this event kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Init => "init",
            Self::Destroy => "destroy",
            Self::Connect => "connect",
            Self::Disconnect => "disconnect",
            Self::BeforeCommand => "before_command",
            Self::AfterCommand => "after_command",
        }
    }

    /// Broadcast events reach every plugin regardless of verdicts or faults.
    pub fn is_broadcast(&self) -> bool {
        matches!(self, Self::Init | Self::Destroy)
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A session event borrowed from the protocol engine for one dispatch.
#[derive(Debug, Clone, Copy)]
pub enum SessionEvent<'a> {
    /// A client connected.
    Connect {
        /// The new session.
        session: &'a Session,
    },
    /// A client disconnected.
    Disconnect {
        /// The closing session.
        session: &'a Session,
    },
    /// A command is about to be executed.
    BeforeCommand {
        /// The issuing session.
        session: &'a Session,
        /// The parsed command.
        request: &'a CommandRequest,
    },
    /// A command was executed.
    AfterCommand {
        /// The issuing session.
        session: &'a Session,
        /// The parsed command.
        request: &'a CommandRequest,
        /// The reply sent to the client.
        reply: &'a Reply,
    },
}

impl SessionEvent<'_> {
    /// The kind of this event.
    pub fn kind(&self) -> EventKind {
        match self {
            Self::Connect { .. } => EventKind::Connect,
            Self::Disconnect { .. } => EventKind::Disconnect,
            Self::BeforeCommand { .. } => EventKind::BeforeCommand,
            Self::AfterCommand { .. } => EventKind::AfterCommand,
        }
    }

    /// The session the event belongs to.
    pub fn session(&self) -> &Session {
        match self {
            Self::Connect { session }
            | Self::Disconnect { session }
            | Self::BeforeCommand { session, .. }
            | Self::AfterCommand { session, .. } => *session,
        }
    }
}

/// A plugin's decision about how an event should proceed.
///
/// Variants are ordered by severity.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    /// No opinion; deliver to the next plugin and run default processing.
    #[default]
    Continue,
    /// Event handled; skip later plugins and default processing, keep the
    /// session open.
    SkipRemaining,
    /// Event handled; close the session now.
    TerminateSession,
}

impl Verdict {
    /// Whether this verdict ends delivery of the current event.
    pub fn stops_chain(&self) -> bool {
        !matches!(self, Self::Continue)
    }

    /// Returns the string name of this verdict.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Continue => "continue",
            Self::SkipRemaining => "skip_remaining",
            Self::TerminateSession => "terminate_session",
        }
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// What a plugin's session-event handler returns.
pub type PluginOutcome = Result<Verdict, PluginFault>;

/// Result of delivering one session event to one plugin.
#[derive(Debug)]
pub struct Delivery {
    /// The plugin's own answer.
    pub outcome: PluginOutcome,
    /// Faults recorded by plugins nested below this one.
    pub nested_faults: Vec<FaultReport>,
}

impl From<PluginOutcome> for Delivery {
    fn from(outcome: PluginOutcome) -> Self {
        Self {
            outcome,
            nested_faults: Vec::new(),
        }
    }
}
