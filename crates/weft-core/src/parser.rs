#![forbid(unsafe_code)]

//! Input parser state machine.
//!
//! Decodes raw terminal bytes into [`Key`] events. The machine is fed in
//! chunks ([`Parser::feed`]) and carries its state across feeds, so escape
//! sequences, UTF-8 runes, and bracketed pastes may be split at arbitrary
//! read boundaries.
//!
//! # Design
//!
//! One state per partially-consumed construct:
//! - ESC seen, next byte decides bare-Escape vs. sequence
//! - CSI parameter accumulation (with an oversize-discard state)
//! - legacy X10 mouse reports (three raw bytes after `CSI M`)
//! - UTF-8 multi-byte runes
//! - bracketed paste content
//!
//! A bare trailing ESC cannot be resolved from the byte stream alone; the
//! machine stays in the escape state and reports it via
//! [`Parser::has_pending_escape`]. The input thread applies the 50 ms
//! timeout and calls [`Parser::flush_escape`] when no follow-up arrives.
//!
//! # Totality
//!
//! The parser never fails: unknown CSI sequences are consumed through their
//! final byte and dropped, invalid UTF-8 decodes as `?` over one byte, and
//! oversized sequences switch to bounded discard states. Arbitrary byte
//! streams produce a (possibly empty) stream of keys, never a panic.

use crate::event::Key;

/// Oversize guard: maximum accumulated CSI parameter length.
const MAX_CSI_LEN: usize = 256;

/// Oversize guard: maximum buffered paste content.
const MAX_PASTE_LEN: usize = 1024 * 1024;

/// Bracketed paste close marker.
const PASTE_END: &[u8] = b"\x1b[201~";

/// Parser states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum State {
    /// Normal character input.
    #[default]
    Ground,
    /// After ESC (0x1B); ambiguous until the next byte or a timeout.
    Escape,
    /// After ESC [, collecting parameter bytes.
    Csi,
    /// Discarding an oversized CSI sequence through its final byte.
    CsiIgnore,
    /// Legacy X10 mouse report: three raw bytes follow `CSI M`.
    MouseLegacy {
        /// Bytes still expected (3 = button, 2 = column, 1 = row).
        remaining: u8,
        /// Button byte, captured first.
        button: u8,
    },
    /// Collecting a UTF-8 multi-byte rune.
    Utf8 {
        /// Bytes collected so far.
        collected: u8,
        /// Total bytes expected.
        expected: u8,
    },
}

/// Terminal input parser.
///
/// ```
/// use weft_core::parser::Parser;
/// use weft_core::event::Key;
///
/// let mut parser = Parser::new();
/// assert_eq!(parser.feed(b"\x1b[A"), vec![Key::Up]);
/// ```
#[derive(Debug, Default)]
pub struct Parser {
    state: State,
    /// CSI parameter bytes (everything between `ESC [` and the final byte).
    buffer: Vec<u8>,
    /// UTF-8 bytes collected so far.
    utf8: [u8; 4],
    /// Whether we are inside a bracketed paste.
    in_paste: bool,
    /// Paste content accumulated so far.
    paste_buffer: Vec<u8>,
    /// Rolling tail window for finding the close marker once the paste
    /// buffer has hit its cap.
    paste_tail: Vec<u8>,
}

impl Parser {
    /// Create a new parser in the ground state.
    #[must_use]
    pub fn new() -> Self {
        Self {
            buffer: Vec::with_capacity(32),
            ..Self::default()
        }
    }

    /// Feed a chunk of input bytes, returning every completed key.
    pub fn feed(&mut self, input: &[u8]) -> Vec<Key> {
        let mut keys = Vec::new();
        for &byte in input {
            self.process_byte(byte, &mut keys);
        }
        keys
    }

    /// Whether the last byte processed was a bare ESC that could still turn
    /// out to be the start of a sequence.
    #[inline]
    pub fn has_pending_escape(&self) -> bool {
        matches!(self.state, State::Escape)
    }

    /// Resolve a pending bare ESC as an Escape key press.
    ///
    /// Called by the input thread when the disambiguation timeout fires.
    /// Returns `None` if no escape is pending.
    pub fn flush_escape(&mut self) -> Option<Key> {
        if matches!(self.state, State::Escape) {
            self.state = State::Ground;
            Some(Key::Escape)
        } else {
            None
        }
    }

    fn process_byte(&mut self, byte: u8, keys: &mut Vec<Key>) {
        if self.in_paste {
            self.process_paste_byte(byte, keys);
            return;
        }

        match self.state {
            State::Ground => self.process_ground(byte, keys),
            State::Escape => self.process_escape(byte, keys),
            State::Csi => self.process_csi(byte, keys),
            State::CsiIgnore => self.process_csi_ignore(byte),
            State::MouseLegacy { remaining, button } => {
                self.process_mouse_legacy(byte, remaining, button, keys);
            }
            State::Utf8 {
                collected,
                expected,
            } => self.process_utf8(byte, collected, expected, keys),
        }
    }

    fn process_ground(&mut self, byte: u8, keys: &mut Vec<Key>) {
        match byte {
            0x1B => self.state = State::Escape,
            b'\r' => keys.push(Key::Enter),
            // Raw LF (Ctrl-J or a literal newline) inserts a line rather
            // than submitting.
            b'\n' => keys.push(Key::ShiftEnter),
            b'\t' => keys.push(Key::Tab),
            0x7F | 0x08 => keys.push(Key::Backspace),
            0x03 => keys.push(Key::CtrlC),
            0x04 => keys.push(Key::CtrlD),
            0x1A => keys.push(Key::CtrlZ),
            // Printable ASCII.
            0x20..=0x7E => keys.push(Key::Rune(byte as char)),
            // UTF-8 lead bytes.
            0xC0..=0xDF => self.start_utf8(byte, 2),
            0xE0..=0xEF => self.start_utf8(byte, 3),
            0xF0..=0xF7 => self.start_utf8(byte, 4),
            // Stray continuation or invalid lead byte: replacement over one
            // byte.
            0x80..=0xBF | 0xF8..=0xFF => keys.push(Key::Rune('?')),
            // Remaining C0 control codes are ignored.
            _ => {}
        }
    }

    fn start_utf8(&mut self, lead: u8, expected: u8) {
        self.utf8[0] = lead;
        self.state = State::Utf8 {
            collected: 1,
            expected,
        };
    }

    fn process_escape(&mut self, byte: u8, keys: &mut Vec<Key>) {
        match byte {
            b'[' => {
                self.state = State::Csi;
                self.buffer.clear();
            }
            // Alt-Enter / ESC LF both mean "insert newline".
            b'\r' | b'\n' => {
                self.state = State::Ground;
                keys.push(Key::ShiftEnter);
            }
            // ESC ESC: the first one was a bare Escape; the second is
            // ambiguous again.
            0x1B => keys.push(Key::Escape),
            // Anything else: the ESC was a bare Escape press, and the byte
            // is ordinary input.
            _ => {
                self.state = State::Ground;
                keys.push(Key::Escape);
                self.process_byte(byte, keys);
            }
        }
    }

    fn process_csi(&mut self, byte: u8, keys: &mut Vec<Key>) {
        match byte {
            // ESC restarts sequence parsing.
            0x1B => {
                self.state = State::Escape;
                self.buffer.clear();
            }
            // Parameter and intermediate bytes.
            0x20..=0x3F => {
                if self.buffer.len() >= MAX_CSI_LEN {
                    self.state = State::CsiIgnore;
                    self.buffer.clear();
                } else {
                    self.buffer.push(byte);
                }
            }
            // Final byte.
            0x40..=0x7E => {
                self.state = State::Ground;
                self.finish_csi(byte, keys);
            }
            // Control bytes abort the sequence.
            _ => {
                self.state = State::Ground;
                self.buffer.clear();
            }
        }
    }

    fn process_csi_ignore(&mut self, byte: u8) {
        match byte {
            0x1B => self.state = State::Escape,
            0x40..=0x7E => self.state = State::Ground,
            _ => {}
        }
    }

    /// Dispatch a complete CSI sequence: accumulated parameters + final byte.
    fn finish_csi(&mut self, final_byte: u8, keys: &mut Vec<Key>) {
        let params = std::mem::take(&mut self.buffer);

        match (params.as_slice(), final_byte) {
            // Plain cursor / navigation finals.
            ([], b'A') => keys.push(Key::Up),
            ([], b'B') => keys.push(Key::Down),
            ([], b'C') => keys.push(Key::Right),
            ([], b'D') => keys.push(Key::Left),
            ([], b'H') => keys.push(Key::Home),
            ([], b'F') => keys.push(Key::End),
            ([], b'Z') => keys.push(Key::ShiftTab),
            ([], b'I') => keys.push(Key::FocusIn),
            ([], b'O') => keys.push(Key::FocusOut),

            // Editing keys.
            (b"3", b'~') => keys.push(Key::Delete),
            (b"5", b'~') => keys.push(Key::PageUp),
            (b"6", b'~') => keys.push(Key::PageDown),

            // Alt-modified arrows.
            (b"1;3", b'A') => keys.push(Key::AltUp),
            (b"1;3", b'B') => keys.push(Key::AltDown),
            (b"1;3", b'C') => keys.push(Key::AltRight),
            (b"1;3", b'D') => keys.push(Key::AltLeft),

            // Kitty keyboard protocol: Shift-Enter.
            (b"13;2", b'u') => keys.push(Key::ShiftEnter),

            // Bracketed paste open. The close marker is matched inside
            // paste mode; a stray close outside a paste is dropped below.
            (b"200", b'~') => {
                self.in_paste = true;
                self.paste_buffer.clear();
                self.paste_tail.clear();
            }

            // SGR mouse: `CSI < btn ; col ; row (M|m)`.
            (p, b'M' | b'm') if p.first() == Some(&b'<') => {
                keys.push(mouse_key(sgr_button(&p[1..])));
            }

            // Legacy X10 mouse: `CSI M` followed by three raw bytes.
            ([], b'M') => {
                self.state = State::MouseLegacy {
                    remaining: 3,
                    button: 0,
                };
            }

            // Unrecognized CSI sequences are consumed and dropped; they must
            // never surface as a spurious Escape or rune stream.
            _ => {}
        }
    }

    fn process_mouse_legacy(&mut self, byte: u8, remaining: u8, button: u8, keys: &mut Vec<Key>) {
        match remaining {
            3 => {
                self.state = State::MouseLegacy {
                    remaining: 2,
                    button: byte.wrapping_sub(32),
                };
            }
            2 => {
                self.state = State::MouseLegacy {
                    remaining: 1,
                    button,
                };
            }
            _ => {
                self.state = State::Ground;
                keys.push(mouse_key(u16::from(button)));
            }
        }
    }

    fn process_utf8(&mut self, byte: u8, collected: u8, expected: u8, keys: &mut Vec<Key>) {
        if !(0x80..=0xBF).contains(&byte) {
            // Truncated rune: replacement for what we had, then the byte
            // stands on its own.
            self.state = State::Ground;
            keys.push(Key::Rune('?'));
            self.process_byte(byte, keys);
            return;
        }

        self.utf8[collected as usize] = byte;
        let collected = collected + 1;
        if collected < expected {
            self.state = State::Utf8 {
                collected,
                expected,
            };
            return;
        }

        self.state = State::Ground;
        let rune = std::str::from_utf8(&self.utf8[..expected as usize])
            .ok()
            .and_then(|s| s.chars().next())
            .unwrap_or('?');
        keys.push(Key::Rune(rune));
    }

    fn process_paste_byte(&mut self, byte: u8, keys: &mut Vec<Key>) {
        if self.paste_buffer.len() < MAX_PASTE_LEN {
            self.paste_buffer.push(byte);
            if self.paste_buffer.ends_with(PASTE_END) {
                let content_len = self.paste_buffer.len() - PASTE_END.len();
                self.emit_paste(content_len, keys);
            }
            return;
        }

        // Cap reached: stop collecting content but keep scanning for the
        // close marker in a rolling window. The marker may straddle the cap
        // boundary, so the window is assembled from the tail tracker plus
        // the end of the content buffer.
        self.paste_tail.push(byte);
        if self.paste_tail.len() > PASTE_END.len() {
            self.paste_tail.remove(0);
        }

        let needed_from_content = PASTE_END.len() - self.paste_tail.len();
        if self.paste_buffer.len() < needed_from_content {
            return;
        }
        let split = self.paste_buffer.len() - needed_from_content;
        let matches = self.paste_buffer[split..]
            .iter()
            .chain(self.paste_tail.iter())
            .eq(PASTE_END.iter());
        if matches {
            self.emit_paste(split, keys);
        }
    }

    fn emit_paste(&mut self, content_len: usize, keys: &mut Vec<Key>) {
        self.in_paste = false;
        let text = String::from_utf8_lossy(&self.paste_buffer[..content_len]).into_owned();
        self.paste_buffer.clear();
        self.paste_tail.clear();
        keys.push(Key::Paste(text));
    }
}

/// Map a mouse button code to its key: 64/65 are wheel motion, everything
/// else (press or release, any button) is a click.
fn mouse_key(button: u16) -> Key {
    match button {
        64 => Key::MouseScrollUp,
        65 => Key::MouseScrollDown,
        _ => Key::MouseClick,
    }
}

/// Extract the leading button number from SGR mouse parameters ("64;10;20").
fn sgr_button(params: &[u8]) -> u16 {
    let mut n: u16 = 0;
    for &b in params {
        if b == b';' {
            break;
        }
        if b.is_ascii_digit() {
            n = n.saturating_mul(10).saturating_add(u16::from(b - b'0'));
        }
    }
    n
}
