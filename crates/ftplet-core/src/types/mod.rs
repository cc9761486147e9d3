//! Value types the protocol engine hands to plugins.
//!
//! The plugin core passes these through untouched; only plugins inspect
//! them.

pub mod command;
pub mod id;
pub mod limit;
pub mod session;

pub use command::{CommandRequest, Reply};
pub use id::SessionId;
pub use limit::ConnectionLimit;
pub use session::Session;
