#![forbid(unsafe_code)]

//! The application contract: model, messages, and staged effects.

use std::sync::mpsc::SyncSender;

use weft_core::event::Key;
use weft_core::stop::StopSignal;
use weft_layout::node::Node;

/// A message delivered to [`App::update`].
///
/// The runtime converts input events into the first four variants;
/// application-defined messages produced by commands and subscriptions
/// arrive as `App`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg<M> {
    /// A key event (anything the focus pre-pass and conversions below
    /// did not claim).
    Key(Key),
    /// The terminal was resized.
    Resize {
        /// New width in cells.
        width: u16,
        /// New height in cells.
        height: u16,
    },
    /// The terminal gained (`true`) or lost (`false`) focus.
    Focus(bool),
    /// Mouse wheel scroll; positive is up, three rows per notch.
    Scroll(i32),
    /// An application-defined message from a command or subscription.
    App(M),
}

/// Handle for sending application messages into the event loop.
///
/// Cloned into every command and subscription thread. `send` returns `false`
/// once the loop has shut down; long-running subscriptions use that as their
/// signal to exit.
pub struct MsgSender<M> {
    tx: SyncSender<M>,
    stop: StopSignal,
}

impl<M> Clone for MsgSender<M> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
            stop: self.stop.clone(),
        }
    }
}

impl<M> MsgSender<M> {
    pub(crate) fn new(tx: SyncSender<M>, stop: StopSignal) -> Self {
        Self { tx, stop }
    }

    /// Send a message to the event loop.
    ///
    /// Returns `false` when the loop has stopped; the message is dropped.
    pub fn send(&self, msg: M) -> bool {
        if self.stop.is_stopped() {
            return false;
        }
        self.tx.send(msg).is_ok()
    }
}

/// A one-shot asynchronous command.
///
/// Runs on its own thread and may produce one message, fed back into the
/// loop through the bounded async channel. Commands pending at shutdown are
/// abandoned.
pub struct Cmd<M>(Box<dyn FnOnce() -> Option<M> + Send>);

impl<M> Cmd<M> {
    /// Stage a command from a closure.
    pub fn new(f: impl FnOnce() -> Option<M> + Send + 'static) -> Self {
        Self(Box::new(f))
    }

    pub(crate) fn run(self) -> Option<M> {
        (self.0)()
    }
}

/// A long-running subscription.
///
/// Runs on its own thread, may send any number of messages through the
/// provided [`MsgSender`], and may produce a final message on return.
pub struct Sub<M>(Box<dyn FnOnce(&MsgSender<M>) -> Option<M> + Send>);

impl<M> Sub<M> {
    /// Stage a subscription from a closure.
    pub fn new(f: impl FnOnce(&MsgSender<M>) -> Option<M> + Send + 'static) -> Self {
        Self(Box::new(f))
    }

    pub(crate) fn run(self, sender: &MsgSender<M>) -> Option<M> {
        (self.0)(sender)
    }
}

/// The result of one [`App::update`] step: the next model plus any staged
/// effects. A `None` model ends the program cleanly.
pub struct Update<A: App> {
    /// The next model, or `None` to quit.
    pub model: Option<A>,
    /// One-shot commands to spawn.
    pub cmds: Vec<Cmd<A::Custom>>,
    /// Long-running subscriptions to spawn.
    pub subs: Vec<Sub<A::Custom>>,
}

impl<A: App> Update<A> {
    /// Continue with the given model and no effects.
    pub fn next(model: A) -> Self {
        Self {
            model: Some(model),
            cmds: Vec::new(),
            subs: Vec::new(),
        }
    }

    /// End the program cleanly.
    pub fn quit() -> Self {
        Self {
            model: None,
            cmds: Vec::new(),
            subs: Vec::new(),
        }
    }

    /// Stage a one-shot command.
    #[must_use]
    pub fn with_cmd(mut self, f: impl FnOnce() -> Option<A::Custom> + Send + 'static) -> Self {
        self.cmds.push(Cmd::new(f));
        self
    }

    /// Stage a long-running subscription.
    #[must_use]
    pub fn with_sub(
        mut self,
        f: impl FnOnce(&MsgSender<A::Custom>) -> Option<A::Custom> + Send + 'static,
    ) -> Self {
        self.subs.push(Sub::new(f));
        self
    }
}

/// An Elm-style terminal application.
///
/// The model lives on the event-loop thread; `update` and `view` are called
/// there and need not be thread-safe. The view builds a fresh node tree
/// every frame.
pub trait App: Sized + 'static {
    /// Application-defined message type carried by commands and
    /// subscriptions.
    type Custom: Send + 'static;

    /// Build the initial model.
    fn init() -> Self;

    /// Apply one message, returning the next model and staged effects.
    fn update(self, msg: Msg<Self::Custom>) -> Update<Self>;

    /// Render the model. `focused` is the key of the currently focused
    /// node, or the empty string.
    fn view(&self, focused: &str) -> Node;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    #[test]
    fn update_helpers_stage_effects() {
        struct Dummy;
        impl App for Dummy {
            type Custom = u32;
            fn init() -> Self {
                Dummy
            }
            fn update(self, _msg: Msg<u32>) -> Update<Self> {
                Update::next(self)
            }
            fn view(&self, _focused: &str) -> Node {
                weft_layout::node::text("")
            }
        }

        let u = Update::next(Dummy).with_cmd(|| Some(1)).with_sub(|_| None);
        assert!(u.model.is_some());
        assert_eq!(u.cmds.len(), 1);
        assert_eq!(u.subs.len(), 1);

        let q = Update::<Dummy>::quit();
        assert!(q.model.is_none());
    }

    #[test]
    fn sender_fails_after_stop() {
        let (tx, rx) = mpsc::sync_channel::<u32>(4);
        let (stop, trigger) = StopSignal::new();
        let sender = MsgSender::new(tx, stop);

        assert!(sender.send(1));
        assert_eq!(rx.recv().unwrap(), 1);

        trigger.stop();
        assert!(!sender.send(2));
    }
}
