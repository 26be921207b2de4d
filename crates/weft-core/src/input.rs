#![forbid(unsafe_code)]

//! Terminal input threads.
//!
//! Two cooperating threads turn a raw terminal reader into a stream of
//! [`Key`] events:
//!
//! - the **byte reader** performs blocking reads and forwards each chunk
//!   over a bounded channel;
//! - the **key parser** feeds chunks to the [`Parser`] state machine and
//!   resolves bare trailing ESC bytes with a 50 ms timeout — a chunk ending
//!   in `0x1B` may be a bare Escape press or the prefix of a sequence split
//!   across reads, and only the arrival (or absence) of the next chunk can
//!   tell them apart.
//!
//! Shutdown propagates through channel teardown: when the receiving side of
//! the key channel is dropped, the parser thread's sends fail and it exits,
//! dropping the chunk receiver, which in turn fails the reader's next send.
//! The [`StopSignal`] covers the remaining case of threads blocked on reads
//! between chunks.

use std::io::Read;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, SyncSender, TryRecvError};
use std::thread;
use std::time::Duration;

use signal_hook::consts::signal::SIGWINCH;
use signal_hook::iterator::{Handle, Signals};

use crate::event::Key;
use crate::parser::Parser;
use crate::stop::StopSignal;

/// How long to wait after a bare trailing ESC before deciding it was a
/// standalone Escape press rather than the start of a sequence.
pub const ESC_TIMEOUT: Duration = Duration::from_millis(50);

/// Key channel depth.
const KEY_CHANNEL_CAP: usize = 32;

/// Raw chunk channel depth.
const CHUNK_CHANNEL_CAP: usize = 4;

/// Resize channel depth.
const RESIZE_CHANNEL_CAP: usize = 4;

/// Read buffer size for the byte reader.
const READ_BUF_LEN: usize = 4096;

/// Spawn the byte-reader and key-parser threads over `reader`.
///
/// Returns the receiving end of the key channel. The channel closes when
/// the reader hits EOF or an error, or when `stop` fires.
pub fn read_keys<R>(reader: R, stop: StopSignal) -> Receiver<Key>
where
    R: Read + Send + 'static,
{
    let (chunk_tx, chunk_rx) = mpsc::sync_channel::<Vec<u8>>(CHUNK_CHANNEL_CAP);
    let (key_tx, key_rx) = mpsc::sync_channel::<Key>(KEY_CHANNEL_CAP);

    let reader_stop = stop.clone();
    thread::spawn(move || byte_reader(reader, chunk_tx, reader_stop));
    thread::spawn(move || key_parser(chunk_rx, key_tx, stop));

    key_rx
}

/// Blocking read loop: forward each chunk until EOF, error, or shutdown.
fn byte_reader<R: Read>(mut reader: R, chunks: SyncSender<Vec<u8>>, stop: StopSignal) {
    let mut buf = [0u8; READ_BUF_LEN];
    loop {
        let n = match reader.read(&mut buf) {
            Ok(0) | Err(_) => return,
            Ok(n) => n,
        };
        if stop.is_stopped() || chunks.send(buf[..n].to_vec()).is_err() {
            return;
        }
    }
}

/// Parser loop: feed chunks, resolve trailing-ESC ambiguity with a timeout.
fn key_parser(chunks: Receiver<Vec<u8>>, keys: SyncSender<Key>, stop: StopSignal) {
    let mut parser = Parser::new();

    'outer: loop {
        let chunk = match chunks.recv() {
            Ok(chunk) => chunk,
            Err(_) => {
                // Reader is gone; a pending ESC can no longer be a sequence.
                if let Some(key) = parser.flush_escape() {
                    let _ = keys.send(key);
                }
                return;
            }
        };

        for key in parser.feed(&chunk) {
            if keys.send(key).is_err() {
                return;
            }
        }

        // A chunk ending in a bare ESC is ambiguous. Wait briefly for a
        // follow-up: a chunk starting with '[' continues the sequence,
        // anything else resolves the ESC as an Escape press first, and a
        // timeout resolves it as Escape outright.
        while parser.has_pending_escape() {
            if stop.is_stopped() {
                return;
            }
            match chunks.recv_timeout(ESC_TIMEOUT) {
                Ok(chunk) => {
                    for key in parser.feed(&chunk) {
                        if keys.send(key).is_err() {
                            return;
                        }
                    }
                }
                Err(RecvTimeoutError::Timeout) => {
                    if let Some(key) = parser.flush_escape() {
                        if keys.send(key).is_err() {
                            return;
                        }
                    }
                    break;
                }
                Err(RecvTimeoutError::Disconnected) => {
                    if let Some(key) = parser.flush_escape() {
                        let _ = keys.send(key);
                    }
                    break 'outer;
                }
            }
        }

        if stop.is_stopped() {
            return;
        }
    }
}

/// Background SIGWINCH watcher.
///
/// Each signal delivery sends the freshly queried terminal size. The signal
/// iterator is closed on drop so the thread exits promptly.
pub struct ResizeWatcher {
    rx: Receiver<(u16, u16)>,
    handle: Handle,
    thread: Option<thread::JoinHandle<()>>,
}

impl ResizeWatcher {
    /// Register the SIGWINCH handler and spawn the watcher thread.
    pub fn spawn(stop: StopSignal) -> std::io::Result<Self> {
        let mut signals = Signals::new([SIGWINCH])?;
        let handle = signals.handle();
        let (tx, rx) = mpsc::sync_channel::<(u16, u16)>(RESIZE_CHANNEL_CAP);

        let thread = thread::Builder::new()
            .name("weft-resize-watcher".into())
            .spawn(move || {
                for signal in signals.forever() {
                    if signal != SIGWINCH || stop.is_stopped() {
                        return;
                    }
                    if tx.send(terminal_size()).is_err() {
                        return;
                    }
                }
            })?;

        Ok(Self {
            rx,
            handle,
            thread: Some(thread),
        })
    }

    /// Take a pending resize event, if any.
    pub fn try_recv(&self) -> Option<(u16, u16)> {
        match self.rx.try_recv() {
            Ok(size) => Some(size),
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => None,
        }
    }
}

impl Drop for ResizeWatcher {
    fn drop(&mut self) {
        self.handle.close();
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

/// Current terminal size, falling back to 80x24 when the query fails
/// (not a tty, or the platform call errors).
pub fn terminal_size() -> (u16, u16) {
    crossterm::terminal::size().unwrap_or((80, 24))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{self, Read};
    use std::sync::mpsc::RecvTimeoutError;
    use std::time::Instant;

    /// A reader that yields scripted chunks with optional delays, then EOF.
    struct ScriptedReader {
        script: Vec<(Duration, Vec<u8>)>,
    }

    impl Read for ScriptedReader {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if self.script.is_empty() {
                return Ok(0);
            }
            let (delay, chunk) = self.script.remove(0);
            if !delay.is_zero() {
                thread::sleep(delay);
            }
            buf[..chunk.len()].copy_from_slice(&chunk);
            Ok(chunk.len())
        }
    }

    fn collect(rx: &Receiver<Key>) -> Vec<Key> {
        let mut keys = Vec::new();
        loop {
            match rx.recv_timeout(Duration::from_secs(2)) {
                Ok(key) => keys.push(key),
                Err(RecvTimeoutError::Disconnected) => return keys,
                Err(RecvTimeoutError::Timeout) => panic!("key channel stalled"),
            }
        }
    }

    #[test]
    fn plain_keys_flow_through() {
        let (stop, _trigger) = StopSignal::new();
        let reader = ScriptedReader {
            script: vec![(Duration::ZERO, b"ab".to_vec())],
        };
        let rx = read_keys(reader, stop);
        assert_eq!(collect(&rx), vec![Key::Rune('a'), Key::Rune('b')]);
    }

    #[test]
    fn escape_sequence_split_across_reads_is_joined() {
        let (stop, _trigger) = StopSignal::new();
        // "\x1b" then "[A" within the timeout: one Up, no Escape.
        let reader = ScriptedReader {
            script: vec![
                (Duration::ZERO, b"\x1b".to_vec()),
                (Duration::from_millis(5), b"[A".to_vec()),
            ],
        };
        let rx = read_keys(reader, stop);
        assert_eq!(collect(&rx), vec![Key::Up]);
    }

    #[test]
    fn lone_escape_resolves_after_timeout() {
        let (stop, _trigger) = StopSignal::new();
        let reader = ScriptedReader {
            script: vec![
                (Duration::ZERO, b"\x1b".to_vec()),
                (ESC_TIMEOUT * 4, b"x".to_vec()),
            ],
        };
        let rx = read_keys(reader, stop);
        let start = Instant::now();
        assert_eq!(
            rx.recv_timeout(Duration::from_secs(2)).unwrap(),
            Key::Escape
        );
        assert!(start.elapsed() >= ESC_TIMEOUT);
        assert_eq!(
            rx.recv_timeout(Duration::from_secs(2)).unwrap(),
            Key::Rune('x')
        );
    }

    #[test]
    fn escape_then_non_csi_chunk_yields_escape_first() {
        let (stop, _trigger) = StopSignal::new();
        let reader = ScriptedReader {
            script: vec![
                (Duration::ZERO, b"\x1b".to_vec()),
                (Duration::from_millis(5), b"q".to_vec()),
            ],
        };
        let rx = read_keys(reader, stop);
        assert_eq!(collect(&rx), vec![Key::Escape, Key::Rune('q')]);
    }

    #[test]
    fn paste_across_reads_is_one_event() {
        let (stop, _trigger) = StopSignal::new();
        let reader = ScriptedReader {
            script: vec![
                (Duration::ZERO, b"\x1b[200~par".to_vec()),
                (Duration::from_millis(5), b"tial\x1b[201~".to_vec()),
            ],
        };
        let rx = read_keys(reader, stop);
        assert_eq!(collect(&rx), vec![Key::Paste("partial".into())]);
    }

    #[test]
    fn eof_with_trailing_escape_flushes_it() {
        let (stop, _trigger) = StopSignal::new();
        let reader = ScriptedReader {
            script: vec![(Duration::ZERO, b"\x1b".to_vec())],
        };
        let rx = read_keys(reader, stop);
        assert_eq!(collect(&rx), vec![Key::Escape]);
    }
}
