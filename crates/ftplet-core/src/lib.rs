//! # ftplet-core
//!
//! Core crate for the ftplet plugin host. Contains the configuration
//! schema, the session/command value types handed to plugins, logging
//! setup, and the unified error system.
//!
//! This crate has **no** internal dependencies on other ftplet crates.

pub mod config;
pub mod error;
pub mod result;
pub mod telemetry;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
