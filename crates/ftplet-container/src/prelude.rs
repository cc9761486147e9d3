//! Prelude for convenient imports.

pub use async_trait::async_trait;

pub use ftplet_core::types::{CommandRequest, Reply, Session, SessionId};

pub use crate::api::context::PluginContext;
pub use crate::builtin::{CommandGuard, ConnectionLimiter, FnPlugin};
pub use crate::container::PluginContainer;
pub use crate::error::PluginFault;
pub use crate::hooks::definitions::{PluginOutcome, Verdict};
pub use crate::traits::Plugin;
