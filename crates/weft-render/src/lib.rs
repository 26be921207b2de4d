#![forbid(unsafe_code)]

//! Render kernel: cells, buffers, painting, diffing, and ANSI presentation.
//!
//! A frame flows through here as `LayoutNode -> Buffer -> Vec<Change> ->
//! bytes`: [`paint`] rasterizes the positioned tree into a grid of styled
//! cells, [`diff`] compares it against the previous frame's grid, and
//! [`ansi::render`] turns the changed runs into the minimal cursor-move /
//! SGR / glyph byte stream.

pub mod ansi;
pub mod buffer;
pub mod cell;
pub mod diff;
pub mod paint;

pub use buffer::Buffer;
pub use cell::Cell;
pub use diff::{diff, Change};
pub use paint::paint;
