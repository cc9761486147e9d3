//! Fault reports and the diagnostics channel they are published on.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::error::PluginFault;
use crate::hooks::definitions::EventKind;

/// Record of one plugin fault.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaultReport {
    /// Name of the container that dispatched the event.
    pub container: String,
    /// Registration name of the faulting plugin.
    pub plugin: String,
    /// The event being delivered.
    pub event: EventKind,
    /// Rendered fault message.
    pub message: String,
    /// Whether the fault was a caught panic.
    pub panicked: bool,
    /// When the fault was recorded.
    pub occurred_at: DateTime<Utc>,
}

impl FaultReport {
    /// Builds a report for `fault` raised by `plugin` while handling `event`.
    pub fn new(container: &str, plugin: &str, event: EventKind, fault: &PluginFault) -> Self {
        Self {
            container: container.to_string(),
            plugin: plugin.to_string(),
            event,
            message: fault.to_string(),
            panicked: fault.is_panic(),
            occurred_at: Utc::now(),
        }
    }
}

impl std::fmt::Display for FaultReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}/{} during {}: {}",
            self.container, self.plugin, self.event, self.message
        )
    }
}

/// Broadcast channel carrying fault reports to any number of subscribers.
#[derive(Debug, Clone)]
pub struct Diagnostics {
    sender: broadcast::Sender<FaultReport>,
}

impl Diagnostics {
    /// Creates a channel buffering `capacity` reports per subscriber.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Subscribes to reports published from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<FaultReport> {
        self.sender.subscribe()
    }

    /// Publishes reports; with no subscribers they are dropped.
    pub fn publish(&self, reports: &[FaultReport]) {
        for report in reports {
            let _ = self.sender.send(report.clone());
        }
    }

    /// Number of live subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for Diagnostics {
    fn default() -> Self {
        Self::new(256)
    }
}
