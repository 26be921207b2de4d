#![forbid(unsafe_code)]

//! The event loop.
//!
//! One foreground loop plus background producers: the byte reader and key
//! parser threads feed the key channel, the resize watcher feeds the resize
//! channel, and command/subscription threads feed the bounded async channel.
//! The model only ever lives on the loop thread.
//!
//! Each iteration blocks on the key channel up to the next frame deadline,
//! then drains every channel non-blockingly into one message batch, steers
//! the focus manager from Tab/Shift-Tab/Escape, applies the batch through
//! [`App::update`], and — at most once per ~33 ms tick — renders the view
//! through layout, paint, and diff.
//!
//! # Exit paths
//!
//! - Ctrl-C or an `update` returning no model: clean `Ok(())`.
//! - Input channel closed (reader EOF or error): clean `Ok(())`.
//! - Writer error: that error.
//! - External stop via [`Program::stop_trigger`]: `ErrorKind::Interrupted`.
//!
//! All of them fire the stop trigger so background threads unblock, and all
//! of them restore the terminal through [`TerminalGuard`].

use std::io::{self, Read, Write};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, SyncSender, TryRecvError};
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, trace};

use weft_core::event::Key;
use weft_core::input::{read_keys, terminal_size, ResizeWatcher};
use weft_core::stop::{StopSignal, StopTrigger};
use weft_layout::solve::layout;
use weft_render::ansi;
use weft_render::buffer::Buffer;
use weft_render::diff::diff;
use weft_render::paint::paint;

use crate::app::{App, Cmd, Msg, MsgSender, Sub, Update};
use crate::focus::FocusManager;
use crate::terminal::TerminalGuard;

/// Render cadence: ~30 Hz.
const FRAME_INTERVAL: Duration = Duration::from_millis(33);

/// Async message channel depth.
const MSG_CHANNEL_CAP: usize = 64;

/// A runnable application: channels, terminal size, and the shutdown token.
///
/// ```no_run
/// use weft_runtime::{App, Msg, Program, Update};
/// use weft_layout::node::{text, Node};
///
/// struct Hello;
///
/// impl App for Hello {
///     type Custom = ();
///     fn init() -> Self {
///         Hello
///     }
///     fn update(self, _msg: Msg<()>) -> Update<Self> {
///         Update::next(self)
///     }
///     fn view(&self, _focused: &str) -> Node {
///         text("hello")
///     }
/// }
///
/// let program = Program::<Hello>::new()?;
/// program.run(std::io::stdout())?;
/// # Ok::<(), std::io::Error>(())
/// ```
pub struct Program<A: App> {
    width: u16,
    height: u16,
    keys: Receiver<Key>,
    resize: Option<ResizeWatcher>,
    msg_tx: SyncSender<A::Custom>,
    msg_rx: Receiver<A::Custom>,
    stop: StopSignal,
    trigger: StopTrigger,
}

impl<A: App> Program<A> {
    /// Wire up a program over stdin, the real terminal size, and the
    /// SIGWINCH watcher.
    pub fn new() -> io::Result<Self> {
        let (stop, trigger) = StopSignal::new();
        let keys = read_keys(io::stdin(), stop.clone());
        let resize = ResizeWatcher::spawn(stop.clone())?;
        let (width, height) = terminal_size();
        let (msg_tx, msg_rx) = mpsc::sync_channel(MSG_CHANNEL_CAP);
        Ok(Self {
            width,
            height,
            keys,
            resize: Some(resize),
            msg_tx,
            msg_rx,
            stop,
            trigger,
        })
    }

    /// Wire up a program over an arbitrary input reader and a fixed size.
    ///
    /// No resize watcher is installed; intended for tests and embedding.
    pub fn with_input<R>(input: R, size: (u16, u16)) -> Self
    where
        R: Read + Send + 'static,
    {
        let (stop, trigger) = StopSignal::new();
        let keys = read_keys(input, stop.clone());
        let (msg_tx, msg_rx) = mpsc::sync_channel(MSG_CHANNEL_CAP);
        Self {
            width: size.0,
            height: size.1,
            keys,
            resize: None,
            msg_tx,
            msg_rx,
            stop,
            trigger,
        }
    }

    /// A handle that cancels the program from another thread.
    pub fn stop_trigger(&self) -> StopTrigger {
        self.trigger.clone()
    }

    /// Run to completion, owning the output writer.
    pub fn run<W: Write>(mut self, writer: W) -> io::Result<()> {
        let mut terminal = TerminalGuard::new(writer)?;
        debug!(width = self.width, height = self.height, "program started");

        let result = self.event_loop(&mut terminal);

        // Unblock every producer, then put the terminal back even when the
        // loop failed.
        self.trigger.stop();
        drop(self.resize.take());
        let restored = terminal.restore();
        debug!("program stopped");
        result.and(restored)
    }

    fn event_loop<W: Write>(&mut self, terminal: &mut TerminalGuard<W>) -> io::Result<()> {
        let mut model = A::init();
        let mut focus = FocusManager::new();
        let mut prev: Option<Buffer> = None;
        let mut msgs: Vec<Msg<A::Custom>> = Vec::with_capacity(16);
        let mut needs_render = true;
        let mut next_frame = Instant::now();

        loop {
            if self.stop.is_stopped() {
                return Err(io::Error::new(io::ErrorKind::Interrupted, "program stopped"));
            }

            // Block for input up to the frame deadline; the deadline doubles
            // as the render tick.
            let timeout = next_frame.saturating_duration_since(Instant::now());
            match self.keys.recv_timeout(timeout) {
                Ok(Key::CtrlC) => return Ok(()),
                Ok(key) => {
                    msgs.push(convert_key(key));
                    needs_render = true;
                }
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => return Ok(()),
            }

            // Drain whatever else is already pending into the batch.
            loop {
                match self.keys.try_recv() {
                    Ok(Key::CtrlC) => return Ok(()),
                    Ok(key) => {
                        msgs.push(convert_key(key));
                        needs_render = true;
                    }
                    Err(TryRecvError::Empty | TryRecvError::Disconnected) => break,
                }
            }
            if let Some(watcher) = &self.resize {
                while let Some((width, height)) = watcher.try_recv() {
                    debug!(width, height, "terminal resized");
                    self.width = width;
                    self.height = height;
                    // Dimensions changed; the next frame repaints from
                    // scratch against an empty buffer.
                    prev = None;
                    msgs.push(Msg::Resize { width, height });
                    needs_render = true;
                }
            }
            while let Ok(custom) = self.msg_rx.try_recv() {
                msgs.push(Msg::App(custom));
                needs_render = true;
            }

            // Focus keys steer the traversal before the app sees them.
            for msg in &msgs {
                match msg {
                    Msg::Key(Key::Tab) => focus.next(),
                    Msg::Key(Key::ShiftTab) => focus.prev(),
                    Msg::Key(Key::Escape) => focus.pop_context(),
                    _ => {}
                }
            }

            // Apply the batch in arrival order.
            if !msgs.is_empty() {
                trace!(batch = msgs.len(), "applying messages");
            }
            for msg in msgs.drain(..) {
                let Update {
                    model: next,
                    cmds,
                    subs,
                } = model.update(msg);
                for cmd in cmds {
                    self.spawn_cmd(cmd);
                }
                for sub in subs {
                    self.spawn_sub(sub);
                }
                match next {
                    Some(m) => model = m,
                    None => return Ok(()),
                }
            }

            // Render at the frame cadence.
            if Instant::now() >= next_frame {
                if needs_render {
                    self.render(terminal, &model, &mut focus, &mut prev)?;
                    needs_render = false;
                }
                next_frame = Instant::now() + FRAME_INTERVAL;
            }
        }
    }

    fn render<W: Write>(
        &mut self,
        terminal: &mut TerminalGuard<W>,
        model: &A,
        focus: &mut FocusManager,
        prev: &mut Option<Buffer>,
    ) -> io::Result<()> {
        let tree = model.view(focus.current());
        let positioned = layout(&tree, self.width, self.height);
        focus.update(&positioned);

        let mut buf = Buffer::new(self.width, self.height);
        paint(&mut buf, &positioned);

        let old = prev
            .take()
            .unwrap_or_else(|| Buffer::new(self.width, self.height));
        let changes = diff(&old, &buf);
        trace!(changes = changes.len(), "frame rendered");

        ansi::render(terminal.writer(), &changes)?;
        terminal.writer().flush()?;
        *prev = Some(buf);
        Ok(())
    }

    fn spawn_cmd(&self, cmd: Cmd<A::Custom>) {
        let sender = MsgSender::new(self.msg_tx.clone(), self.stop.clone());
        thread::spawn(move || {
            if let Some(msg) = cmd.run() {
                sender.send(msg);
            }
        });
    }

    fn spawn_sub(&self, sub: Sub<A::Custom>) {
        let sender = MsgSender::new(self.msg_tx.clone(), self.stop.clone());
        thread::spawn(move || {
            if let Some(msg) = sub.run(&sender) {
                sender.send(msg);
            }
        });
    }
}

/// Convert a key event into the message the app receives.
fn convert_key<M>(key: Key) -> Msg<M> {
    match key {
        Key::FocusIn => Msg::Focus(true),
        Key::FocusOut => Msg::Focus(false),
        Key::MouseScrollUp => Msg::Scroll(3),
        Key::MouseScrollDown => Msg::Scroll(-3),
        other => Msg::Key(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;
    use weft_layout::node::{text, Node};

    static KEYS_SEEN: AtomicU32 = AtomicU32::new(0);

    struct QuitOnQ;

    impl App for QuitOnQ {
        type Custom = ();

        fn init() -> Self {
            QuitOnQ
        }

        fn update(self, msg: Msg<()>) -> Update<Self> {
            match msg {
                Msg::Key(Key::Rune('q')) => Update::quit(),
                Msg::Key(_) => {
                    KEYS_SEEN.fetch_add(1, Ordering::SeqCst);
                    Update::next(self)
                }
                _ => Update::next(self),
            }
        }

        fn view(&self, _focused: &str) -> Node {
            text("quit with q")
        }
    }

    /// A reader that yields one chunk, then blocks until dropped-stop.
    struct ChunkThenBlock {
        chunk: Option<Vec<u8>>,
        stop: StopSignal,
    }

    impl Read for ChunkThenBlock {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            match self.chunk.take() {
                Some(chunk) => {
                    buf[..chunk.len()].copy_from_slice(&chunk);
                    Ok(chunk.len())
                }
                None => {
                    // Park until shutdown, then report EOF.
                    self.stop.wait_timeout(Duration::from_secs(30));
                    Ok(0)
                }
            }
        }
    }

    #[test]
    fn quit_key_ends_run_cleanly() {
        let program = Program::<QuitOnQ>::with_input(io::Cursor::new(b"aq".to_vec()), (20, 5));
        let mut out = Vec::new();
        program.run(&mut out).unwrap();

        let text = String::from_utf8_lossy(&out);
        assert!(text.starts_with("\x1b[?1049h"));
        assert!(text.ends_with("\x1b[?1049l"));
        assert!(KEYS_SEEN.load(Ordering::SeqCst) >= 1);
    }

    #[test]
    fn ctrl_c_ends_run_cleanly() {
        let program = Program::<QuitOnQ>::with_input(io::Cursor::new(vec![0x03]), (20, 5));
        let mut out = Vec::new();
        assert!(program.run(&mut out).is_ok());
        assert!(String::from_utf8_lossy(&out).ends_with("\x1b[?1049l"));
    }

    #[test]
    fn input_eof_ends_run_cleanly() {
        let program = Program::<QuitOnQ>::with_input(io::Cursor::new(Vec::new()), (20, 5));
        let mut out = Vec::new();
        assert!(program.run(&mut out).is_ok());
    }

    #[test]
    fn external_stop_interrupts() {
        let (stop, _trigger) = StopSignal::new();
        let reader = ChunkThenBlock {
            chunk: None,
            stop: stop.clone(),
        };
        let program = Program::<QuitOnQ>::with_input(reader, (20, 5));
        let trigger = program.stop_trigger();

        let handle = thread::spawn(move || {
            let mut out = Vec::new();
            let result = program.run(&mut out);
            (result, out)
        });
        thread::sleep(Duration::from_millis(80));
        trigger.stop();

        let (result, out) = handle.join().unwrap();
        assert_eq!(result.unwrap_err().kind(), io::ErrorKind::Interrupted);
        // Terminal is restored even on the error path.
        assert!(String::from_utf8_lossy(&out).ends_with("\x1b[?1049l"));
    }

    enum CounterMsg {
        Bump,
    }

    struct CmdApp {
        bumps: Arc<AtomicU32>,
    }

    static CMD_BUMPS: AtomicU32 = AtomicU32::new(0);

    impl App for CmdApp {
        type Custom = CounterMsg;

        fn init() -> Self {
            CmdApp {
                bumps: Arc::new(AtomicU32::new(0)),
            }
        }

        fn update(self, msg: Msg<CounterMsg>) -> Update<Self> {
            match msg {
                Msg::Key(Key::Rune('c')) => Update::next(self).with_cmd(|| Some(CounterMsg::Bump)),
                Msg::App(CounterMsg::Bump) => {
                    self.bumps.fetch_add(1, Ordering::SeqCst);
                    CMD_BUMPS.store(self.bumps.load(Ordering::SeqCst), Ordering::SeqCst);
                    Update::quit()
                }
                _ => Update::next(self),
            }
        }

        fn view(&self, _focused: &str) -> Node {
            text("cmd app")
        }
    }

    #[test]
    fn command_message_feeds_back_into_update() {
        let (stop, _trigger) = StopSignal::new();
        let reader = ChunkThenBlock {
            chunk: Some(b"c".to_vec()),
            stop,
        };
        let program = Program::<CmdApp>::with_input(reader, (20, 5));
        let mut out = Vec::new();
        program.run(&mut out).unwrap();
        assert_eq!(CMD_BUMPS.load(Ordering::SeqCst), 1);
    }
}
