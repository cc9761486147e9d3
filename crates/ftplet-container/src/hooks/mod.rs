//! Event system: typed event definitions and the dispatcher.

pub mod definitions;
pub mod dispatcher;

pub use definitions::{Delivery, EventKind, PluginOutcome, SessionEvent, Verdict};
pub use dispatcher::{DispatchResult, EventDispatcher};
