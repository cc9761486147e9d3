//! Ready-made plugins.

pub mod closure;
pub mod guard;
pub mod limiter;

pub use closure::FnPlugin;
pub use guard::CommandGuard;
pub use limiter::ConnectionLimiter;
