#![forbid(unsafe_code)]

//! Core: geometry, style primitives, key events, and terminal input.
//!
//! Everything above this crate is pure transformation (layout, paint, diff);
//! everything in here touches the messy edge of the world — raw bytes from
//! the terminal, signals, and the escape-sequence state machine that turns
//! them into [`event::Key`] values.

pub mod event;
pub mod geometry;
pub mod input;
pub mod logging;
pub mod parser;
pub mod stop;
pub mod style;

pub use event::Key;
pub use geometry::Rect;
pub use parser::Parser;
pub use stop::{StopSignal, StopTrigger};
pub use style::{Color, StyleFlags};

// Re-export tracing macros at crate root for ergonomic use.
#[cfg(feature = "tracing")]
pub use logging::{debug, debug_span, error, info, trace, warn};
