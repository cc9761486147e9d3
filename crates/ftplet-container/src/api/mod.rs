//! Plugin API: types exposed to plugin code.

pub mod context;

pub use context::PluginContext;
