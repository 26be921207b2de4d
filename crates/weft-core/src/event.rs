#![forbid(unsafe_code)]

//! Input events.

/// A decoded terminal input event.
///
/// Keys are a flat tagged set rather than a key/modifier matrix: the parser
/// only distinguishes the combinations terminals actually report distinctly,
/// and applications match on exactly those.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Key {
    /// A printable character (decoded from UTF-8).
    Rune(char),
    /// Up arrow.
    Up,
    /// Down arrow.
    Down,
    /// Left arrow.
    Left,
    /// Right arrow.
    Right,
    /// Tab.
    Tab,
    /// Shift-Tab (CSI Z back-tab).
    ShiftTab,
    /// Enter (carriage return).
    Enter,
    /// Shift-Enter: raw LF, Alt-Enter, or the kitty `13;2u` report. Text
    /// inputs treat it as "insert newline" where Enter means "submit".
    ShiftEnter,
    /// Bare Escape (after sequence disambiguation).
    Escape,
    /// Backspace (DEL or BS).
    Backspace,
    /// Forward delete (CSI 3~).
    Delete,
    /// Home.
    Home,
    /// End.
    End,
    /// Page up.
    PageUp,
    /// Page down.
    PageDown,
    /// Ctrl-C.
    CtrlC,
    /// Ctrl-D.
    CtrlD,
    /// Ctrl-Z.
    CtrlZ,
    /// Terminal gained focus (CSI I).
    FocusIn,
    /// Terminal lost focus (CSI O).
    FocusOut,
    /// Mouse button press or release.
    MouseClick,
    /// Mouse wheel scrolled up.
    MouseScrollUp,
    /// Mouse wheel scrolled down.
    MouseScrollDown,
    /// Alt-Left.
    AltLeft,
    /// Alt-Right.
    AltRight,
    /// Alt-Up.
    AltUp,
    /// Alt-Down.
    AltDown,
    /// Bracketed paste: the full pasted text in one event.
    Paste(String),
}

impl Key {
    /// The character for a `Rune` key, if this is one.
    #[inline]
    pub fn rune(&self) -> Option<char> {
        match self {
            Key::Rune(c) => Some(*c),
            _ => None,
        }
    }
}
