//! Registry errors and plugin faults.

use thiserror::Error;

use ftplet_core::error::{AppError, ErrorKind};

/// Errors returned to whoever mutates a plugin registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PluginError {
    /// A plugin with this name is already registered, or the name appears
    /// twice in a replacement set.
    #[error("Plugin '{name}' is already registered")]
    DuplicateName {
        /// The colliding name.
        name: String,
    },
}

impl From<PluginError> for AppError {
    fn from(err: PluginError) -> Self {
        let message = err.to_string();
        match err {
            PluginError::DuplicateName { .. } => {
                AppError::with_source(ErrorKind::Conflict, message, err)
            }
        }
    }
}

/// An unexpected failure raised by a plugin's own operation.
///
/// Faults never abort dispatch; they are recorded and reported through the
/// container's diagnostics channel.
#[derive(Debug, Error)]
pub enum PluginFault {
    /// The plugin returned an error.
    #[error("{message}")]
    Failed {
        /// Description of the failure.
        message: String,
        /// Optional underlying cause.
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
    /// The plugin panicked.
    #[error("plugin panicked: {0}")]
    Panicked(String),
    /// A nested container collected faults from its own plugins during a
    /// lifecycle broadcast.
    #[error("{count} fault(s) inside container '{container}': {summary}")]
    Nested {
        /// Name of the nested container.
        container: String,
        /// Number of inner faults.
        count: usize,
        /// Inner faults joined into one line.
        summary: String,
    },
}

impl PluginFault {
    /// Creates a fault with a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self::Failed {
            message: message.into(),
            source: None,
        }
    }

    /// Creates a fault with a message and an underlying cause.
    pub fn with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Failed {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Whether the fault was a caught panic.
    pub fn is_panic(&self) -> bool {
        matches!(self, Self::Panicked(_))
    }
}

impl From<AppError> for PluginFault {
    fn from(err: AppError) -> Self {
        Self::with_source(err.to_string(), err)
    }
}

impl From<std::io::Error> for PluginFault {
    fn from(err: std::io::Error) -> Self {
        Self::with_source(format!("I/O error: {err}"), err)
    }
}
