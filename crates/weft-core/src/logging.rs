#![forbid(unsafe_code)]

//! Logging support.
//!
//! Re-exports the `tracing` macros when the `tracing` feature is enabled so
//! the rest of the workspace can log without carrying its own conditional
//! dependency. When the feature is disabled, callers compile the macro
//! invocations out behind their own `#[cfg(feature = "tracing")]` guards.

#[cfg(feature = "tracing")]
pub use tracing::{debug, debug_span, error, info, trace, warn};
