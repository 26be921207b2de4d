#![forbid(unsafe_code)]

//! weft public facade crate.
//!
//! Re-exports the commonly used types from the internal crates so
//! application code depends on one crate:
//!
//! - Input layer: `weft-core` (keys, parser, input threads)
//! - Node model and layout: `weft-layout`
//! - Render kernel: `weft-render` (buffers, diff, ANSI)
//! - Runtime loop: `weft-runtime` (messages, focus, the program)
//!
//! A minimal application implements [`App`] and hands it to [`Program`]:
//!
//! ```no_run
//! use weft::prelude::*;
//!
//! struct Counter(u32);
//!
//! impl App for Counter {
//!     type Custom = ();
//!
//!     fn init() -> Self {
//!         Counter(0)
//!     }
//!
//!     fn update(self, msg: Msg<()>) -> Update<Self> {
//!         match msg {
//!             Msg::Key(Key::Rune('q')) => Update::quit(),
//!             Msg::Key(Key::Rune('+')) => Update::next(Counter(self.0 + 1)),
//!             _ => Update::next(self),
//!         }
//!     }
//!
//!     fn view(&self, _focused: &str) -> Node {
//!         column([
//!             text(format!("count: {}", self.0)),
//!             text("press + to count, q to quit"),
//!         ])
//!     }
//! }
//!
//! Program::<Counter>::new()?.run(std::io::stdout())?;
//! # Ok::<(), std::io::Error>(())
//! ```

// --- Core re-exports -------------------------------------------------------

pub use weft_core::event::Key;
pub use weft_core::geometry::Rect;
pub use weft_core::input::{read_keys, terminal_size, ResizeWatcher};
pub use weft_core::parser::Parser;
pub use weft_core::stop::{StopSignal, StopTrigger};
pub use weft_core::style::{Color, StyleFlags};

// --- Layout re-exports -----------------------------------------------------

pub use weft_layout::node::{
    bar, boxed, column, indent, list, pad, pane, paragraph, row, separator, separator_styled,
    spacer, text, text_styled, truncate, BorderStyle, Node, NodeKind, Props,
};
pub use weft_layout::solve::{layout, LayoutNode};
pub use weft_layout::wrap::wrap;

// --- Render re-exports -----------------------------------------------------

pub use weft_render::ansi;
pub use weft_render::buffer::Buffer;
pub use weft_render::cell::Cell;
pub use weft_render::diff::{diff, Change};
pub use weft_render::paint::paint;

// --- Runtime re-exports ----------------------------------------------------

pub use weft_runtime::{App, Cmd, FocusManager, Msg, MsgSender, Program, Sub, TerminalGuard, Update};

/// The types most applications need, in one import.
pub mod prelude {
    pub use crate::{
        bar, boxed, column, indent, layout, list, pad, pane, paragraph, row, separator, spacer,
        text, text_styled, truncate, App, BorderStyle, Color, Key, Msg, Node, Program, StyleFlags,
        Update,
    };
}
