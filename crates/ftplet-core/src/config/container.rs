//! Plugin container configuration.

use serde::{Deserialize, Serialize};

/// Plugin container configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContainerConfig {
    /// Name of the root container, used in log fields and fault reports.
    #[serde(default = "default_name")]
    pub name: String,
    /// How a faulting plugin affects session event dispatch.
    #[serde(default)]
    pub fault_policy: FaultPolicy,
    /// Buffered fault reports per diagnostics subscriber before the oldest
    /// are dropped.
    #[serde(default = "default_diagnostics_capacity")]
    pub diagnostics_capacity: usize,
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            fault_policy: FaultPolicy::default(),
            diagnostics_capacity: default_diagnostics_capacity(),
        }
    }
}

/// Treatment of a plugin fault raised while handling a session event.
///
/// Lifecycle broadcasts (init/destroy) always visit every plugin,
/// whatever the policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FaultPolicy {
    /// Record the fault, count the plugin as `Continue`, and move on.
    Isolate,
    /// Stop at the faulting plugin and terminate the session.
    FailFast,
}

impl Default for FaultPolicy {
    fn default() -> Self {
        Self::Isolate
    }
}

impl std::fmt::Display for FaultPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FaultPolicy::Isolate => write!(f, "isolate"),
            FaultPolicy::FailFast => write!(f, "fail_fast"),
        }
    }
}

fn default_name() -> String {
    "root".to_string()
}

fn default_diagnostics_capacity() -> usize {
    256
}
