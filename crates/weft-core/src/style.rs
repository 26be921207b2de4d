#![forbid(unsafe_code)]

//! Shared style primitives: 256-color palette indexes and text attributes.

/// A 256-color palette index.
///
/// `0` means "terminal default / transparent": the renderer emits no color
/// for it, leaving whatever the terminal's default foreground or background
/// is. Palette slot 0 (black) is therefore unreachable by design; use slot
/// 16 for pure black.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(transparent)]
pub struct Color(pub u8);

impl Color {
    /// The terminal default (no color emitted).
    pub const DEFAULT: Self = Self(0);

    /// The raw palette index.
    #[inline]
    pub const fn index(self) -> u8 {
        self.0
    }

    /// Check if this is the terminal default.
    #[inline]
    pub const fn is_default(self) -> bool {
        self.0 == 0
    }
}

impl From<u8> for Color {
    #[inline]
    fn from(index: u8) -> Self {
        Self(index)
    }
}

bitflags::bitflags! {
    /// Text style attribute flags.
    ///
    /// Maps one-to-one onto the SGR codes the renderer emits:
    /// bold=1, dim=2, italic=3, underline=4, reverse=7.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct StyleFlags: u8 {
        /// Bold / increased intensity.
        const BOLD      = 0b0000_0001;
        /// Dim / decreased intensity.
        const DIM       = 0b0000_0010;
        /// Italic text.
        const ITALIC    = 0b0000_0100;
        /// Underlined text.
        const UNDERLINE = 0b0000_1000;
        /// Reverse video (swap fg/bg).
        const REVERSE   = 0b0001_0000;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_color_is_transparent() {
        assert!(Color::DEFAULT.is_default());
        assert!(!Color(196).is_default());
        assert_eq!(Color(196).index(), 196);
    }

    #[test]
    fn style_flags_compose() {
        let s = StyleFlags::BOLD | StyleFlags::UNDERLINE;
        assert!(s.contains(StyleFlags::BOLD));
        assert!(!s.contains(StyleFlags::ITALIC));
    }
}
