#![forbid(unsafe_code)]

//! Elm-style runtime for weft applications.
//!
//! The runtime owns the event loop: it collects input, resize, and
//! asynchronous messages into batches, applies them to the application model
//! through [`App::update`], and renders the resulting [`App::view`] tree
//! through layout, paint, and diff at a ~30 Hz cadence. Side effects are
//! staged as [`app::Cmd`] and [`app::Sub`] values returned from `update`,
//! never performed inline, which keeps `update` pure and testable.

pub mod app;
pub mod focus;
pub mod program;
pub mod terminal;

pub use app::{App, Cmd, Msg, MsgSender, Sub, Update};
pub use focus::FocusManager;
pub use program::Program;
pub use terminal::TerminalGuard;
