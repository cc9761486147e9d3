//! # ftplet-container
//!
//! Plugin container for an FTP protocol engine. Provides:
//!
//! - An ordered, name-keyed plugin registry with copy-on-write snapshots
//! - An event dispatcher with short-circuit verdicts and fault isolation
//! - A container that forwards engine events and nests inside other containers
//! - A diagnostics channel carrying plugin fault reports
//! - Built-in plugins for closures, command deny-lists, and connection limits

pub mod api;
pub mod builtin;
pub mod container;
pub mod diagnostics;
pub mod error;
pub mod hooks;
pub mod prelude;
pub mod registry;
pub mod traits;

pub use api::context::PluginContext;
pub use container::PluginContainer;
pub use diagnostics::{Diagnostics, FaultReport};
pub use error::{PluginError, PluginFault};
pub use hooks::definitions::{Delivery, EventKind, PluginOutcome, SessionEvent, Verdict};
pub use hooks::dispatcher::{DispatchResult, EventDispatcher};
pub use registry::{PluginRegistry, Registration, Snapshot};
pub use traits::Plugin;
