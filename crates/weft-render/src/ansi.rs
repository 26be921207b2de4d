#![forbid(unsafe_code)]

//! ANSI escape sequence emission.
//!
//! Pure byte generation over any `io::Write`. The change renderer tracks
//! the last emitted `(fg, bg, style)` triple so a run of uniformly styled
//! glyphs costs one SGR; everything else here is stateless helpers.
//!
//! # Sequence reference
//!
//! | Sequence | Meaning |
//! |----------|---------|
//! | `CSI row ; col H` | Cursor position (1-indexed) |
//! | `CSI 0 ; ... m` | SGR from a clean slate |
//! | `CSI ? 1049 h/l` | Alternate screen |
//! | `CSI ? 25 h/l` | Cursor visibility |
//! | `CSI ? 1004 h/l` | Focus reporting |
//! | `CSI ? 1000 h/l`, `CSI ? 1006 h/l` | Mouse reporting (basic + SGR) |
//! | `CSI ? 2004 h/l` | Bracketed paste |
//! | `CSI 2 J` | Clear screen |

use std::io::{self, Write};

use weft_core::style::{Color, StyleFlags};

use crate::diff::Change;

/// SGR reset: `CSI 0 m`.
pub const SGR_RESET: &[u8] = b"\x1b[0m";

/// Render changed runs as the minimal cursor-move / SGR / glyph stream.
///
/// Each run starts with an absolute cursor position (the renderer does not
/// track the cursor between frames). An SGR is emitted only when the cell's
/// `(fg, bg, style)` differs from the previous emitted triple, or for the
/// first cell of the whole render. A final reset follows iff anything was
/// written.
pub fn render<W: Write>(w: &mut W, changes: &[Change]) -> io::Result<()> {
    let mut current: Option<(Color, Color, StyleFlags)> = None;

    for change in changes {
        move_cursor(w, i32::from(change.x), i32::from(change.y))?;
        for cell in &change.cells {
            let triple = (cell.fg, cell.bg, cell.style);
            if current != Some(triple) {
                write_sgr(w, cell.fg, cell.bg, cell.style)?;
                current = Some(triple);
            }
            write!(w, "{}", cell.ch)?;
        }
    }

    if current.is_some() {
        w.write_all(SGR_RESET)?;
    }
    Ok(())
}

/// Write a full SGR from a clean slate: `CSI 0 [;attrs] [;38;5;fg] [;48;5;bg] m`.
fn write_sgr<W: Write>(w: &mut W, fg: Color, bg: Color, style: StyleFlags) -> io::Result<()> {
    w.write_all(b"\x1b[0")?;
    for (flag, code) in [
        (StyleFlags::BOLD, 1),
        (StyleFlags::DIM, 2),
        (StyleFlags::ITALIC, 3),
        (StyleFlags::UNDERLINE, 4),
        (StyleFlags::REVERSE, 7),
    ] {
        if style.contains(flag) {
            write!(w, ";{code}")?;
        }
    }
    if !fg.is_default() {
        write!(w, ";38;5;{}", fg.index())?;
    }
    if !bg.is_default() {
        write!(w, ";48;5;{}", bg.index())?;
    }
    w.write_all(b"m")
}

/// Move the cursor to a zero-based cell position.
pub fn move_cursor<W: Write>(w: &mut W, x: i32, y: i32) -> io::Result<()> {
    write!(w, "\x1b[{};{}H", y + 1, x + 1)
}

/// Hide the cursor.
pub fn hide_cursor<W: Write>(w: &mut W) -> io::Result<()> {
    w.write_all(b"\x1b[?25l")
}

/// Show the cursor.
pub fn show_cursor<W: Write>(w: &mut W) -> io::Result<()> {
    w.write_all(b"\x1b[?25h")
}

/// Clear the whole screen.
pub fn clear_screen<W: Write>(w: &mut W) -> io::Result<()> {
    w.write_all(b"\x1b[2J")
}

/// Switch to the alternate screen buffer.
pub fn enter_alt_screen<W: Write>(w: &mut W) -> io::Result<()> {
    w.write_all(b"\x1b[?1049h")
}

/// Return to the primary screen buffer.
pub fn leave_alt_screen<W: Write>(w: &mut W) -> io::Result<()> {
    w.write_all(b"\x1b[?1049l")
}

/// Ask the terminal to report focus changes.
pub fn enable_focus_reporting<W: Write>(w: &mut W) -> io::Result<()> {
    w.write_all(b"\x1b[?1004h")
}

/// Stop focus change reports.
pub fn disable_focus_reporting<W: Write>(w: &mut W) -> io::Result<()> {
    w.write_all(b"\x1b[?1004l")
}

/// Enable mouse reporting (basic tracking + SGR encoding).
pub fn enable_mouse_reporting<W: Write>(w: &mut W) -> io::Result<()> {
    w.write_all(b"\x1b[?1000h\x1b[?1006h")
}

/// Disable mouse reporting.
pub fn disable_mouse_reporting<W: Write>(w: &mut W) -> io::Result<()> {
    w.write_all(b"\x1b[?1006l\x1b[?1000l")
}

/// Enable bracketed paste.
pub fn enable_bracketed_paste<W: Write>(w: &mut W) -> io::Result<()> {
    w.write_all(b"\x1b[?2004h")
}

/// Disable bracketed paste.
pub fn disable_bracketed_paste<W: Write>(w: &mut W) -> io::Result<()> {
    w.write_all(b"\x1b[?2004l")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::Cell;

    fn rendered(changes: &[Change]) -> String {
        let mut out = Vec::new();
        render(&mut out, changes).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn empty_changes_emit_nothing() {
        assert_eq!(rendered(&[]), "");
    }

    #[test]
    fn single_run_is_move_sgr_glyphs_reset() {
        let change = Change {
            x: 3,
            y: 0,
            cells: vec![Cell::from_char('h'), Cell::from_char('i')],
        };
        assert_eq!(rendered(&[change]), "\x1b[1;4H\x1b[0mhi\x1b[0m");
    }

    #[test]
    fn sgr_not_repeated_for_uniform_run() {
        let styled = Cell::styled('x', Color(196), Color::DEFAULT, StyleFlags::BOLD);
        let change = Change {
            x: 0,
            y: 0,
            cells: vec![styled, styled, styled],
        };
        assert_eq!(rendered(&[change]), "\x1b[1;1H\x1b[0;1;38;5;196mxxx\x1b[0m");
    }

    #[test]
    fn sgr_changes_mid_run() {
        let plain = Cell::from_char('a');
        let styled = Cell::styled('b', Color(2), Color(17), StyleFlags::UNDERLINE);
        let change = Change {
            x: 0,
            y: 1,
            cells: vec![plain, styled],
        };
        assert_eq!(
            rendered(&[change]),
            "\x1b[2;1H\x1b[0ma\x1b[0;4;38;5;2;48;5;17mb\x1b[0m"
        );
    }

    #[test]
    fn style_carries_across_runs_without_reemission() {
        let cell = Cell::styled('x', Color(5), Color::DEFAULT, StyleFlags::empty());
        let changes = [
            Change {
                x: 0,
                y: 0,
                cells: vec![cell],
            },
            Change {
                x: 5,
                y: 0,
                cells: vec![cell],
            },
        ];
        // Second run needs a cursor move but no new SGR.
        assert_eq!(
            rendered(&changes),
            "\x1b[1;1H\x1b[0;38;5;5mx\x1b[1;6Hx\x1b[0m"
        );
    }

    #[test]
    fn cursor_move_is_one_indexed() {
        let mut out = Vec::new();
        move_cursor(&mut out, 0, 0).unwrap();
        assert_eq!(out, b"\x1b[1;1H");
    }
}
