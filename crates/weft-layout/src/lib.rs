#![forbid(unsafe_code)]

//! Node model and layout solver.
//!
//! Applications describe a frame as an immutable tree of [`Node`] values and
//! hand it to [`solve::layout`], which resolves every node to an absolute
//! [`weft_core::Rect`] within the terminal viewport: flex distribution along
//! an axis, greedy text wrapping, border insets, and scroll offsets.
//!
//! Trees are rebuilt from scratch every frame; nothing here holds state
//! between frames.

pub mod node;
pub mod solve;
pub mod wrap;

pub use node::{
    bar, boxed, column, indent, list, pad, pane, paragraph, row, separator, separator_styled,
    spacer, text, text_styled, truncate, BorderStyle, Node, NodeKind, Props,
};
pub use solve::{layout, LayoutNode};
pub use wrap::wrap;
