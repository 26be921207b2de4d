#![forbid(unsafe_code)]

//! Terminal mode guard.
//!
//! Emits the startup mode sequences on construction and the reverse on
//! [`TerminalGuard::restore`] — which also runs from `Drop`, so the terminal
//! comes back on every exit path: normal return, error propagation, and
//! panic unwinding. Raw mode itself is the embedder's responsibility; this
//! guard only speaks byte sequences on the writer it owns.

use std::io::{self, Write};

use weft_render::ansi;

/// RAII guard over the output writer and the terminal modes the runtime
/// enables.
///
/// Startup order: alternate screen, hide cursor, focus reporting, mouse
/// reporting, bracketed paste, clear. Teardown runs the reverse.
pub struct TerminalGuard<W: Write> {
    writer: W,
    restored: bool,
}

impl<W: Write> TerminalGuard<W> {
    /// Take ownership of the writer and emit the startup sequences.
    pub fn new(mut writer: W) -> io::Result<Self> {
        ansi::enter_alt_screen(&mut writer)?;
        ansi::hide_cursor(&mut writer)?;
        ansi::enable_focus_reporting(&mut writer)?;
        ansi::enable_mouse_reporting(&mut writer)?;
        ansi::enable_bracketed_paste(&mut writer)?;
        ansi::clear_screen(&mut writer)?;
        writer.flush()?;
        Ok(Self {
            writer,
            restored: false,
        })
    }

    /// The wrapped writer, for frame output.
    pub fn writer(&mut self) -> &mut W {
        &mut self.writer
    }

    /// Emit the teardown sequences. Idempotent.
    pub fn restore(&mut self) -> io::Result<()> {
        if self.restored {
            return Ok(());
        }
        self.restored = true;
        ansi::disable_bracketed_paste(&mut self.writer)?;
        ansi::disable_mouse_reporting(&mut self.writer)?;
        ansi::disable_focus_reporting(&mut self.writer)?;
        ansi::show_cursor(&mut self.writer)?;
        ansi::leave_alt_screen(&mut self.writer)?;
        self.writer.flush()
    }
}

impl<W: Write> Drop for TerminalGuard<W> {
    fn drop(&mut self) {
        let _ = self.restore();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn startup_sequences_in_order() {
        let guard = TerminalGuard::new(Vec::new()).unwrap();
        let out = String::from_utf8(guard.writer.clone()).unwrap();
        assert_eq!(
            out,
            "\x1b[?1049h\x1b[?25l\x1b[?1004h\x1b[?1000h\x1b[?1006h\x1b[?2004h\x1b[2J"
        );
    }

    #[test]
    fn restore_reverses_and_is_idempotent() {
        let mut guard = TerminalGuard::new(Vec::new()).unwrap();
        let startup_len = guard.writer.len();
        guard.restore().unwrap();
        let out = String::from_utf8(guard.writer[startup_len..].to_vec()).unwrap();
        assert_eq!(
            out,
            "\x1b[?2004l\x1b[?1006l\x1b[?1000l\x1b[?1004l\x1b[?25h\x1b[?1049l"
        );

        let len = guard.writer.len();
        guard.restore().unwrap();
        assert_eq!(guard.writer.len(), len);
    }

    #[test]
    fn drop_restores() {
        let mut sink = Vec::new();
        {
            let guard = TerminalGuard::new(&mut sink).unwrap();
            drop(guard);
        }
        let out = String::from_utf8(sink).unwrap();
        assert!(out.ends_with("\x1b[?1049l"));
    }
}
