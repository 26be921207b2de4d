#![forbid(unsafe_code)]

//! Rasterize a positioned tree into a cell buffer.

use weft_core::geometry::Rect;
use weft_core::style::{Color, StyleFlags};
use weft_layout::node::{BorderStyle, NodeKind};
use weft_layout::solve::LayoutNode;
use weft_layout::wrap::wrap;

use crate::buffer::Buffer;
use crate::cell::Cell;

/// Border glyph set: corners clockwise from top-left, then horizontal and
/// vertical edges.
struct BorderGlyphs {
    tl: char,
    tr: char,
    bl: char,
    br: char,
    h: char,
    v: char,
}

const SINGLE: BorderGlyphs = BorderGlyphs {
    tl: '┌',
    tr: '┐',
    bl: '└',
    br: '┘',
    h: '─',
    v: '│',
};

const DOUBLE: BorderGlyphs = BorderGlyphs {
    tl: '╔',
    tr: '╗',
    bl: '╚',
    br: '╝',
    h: '═',
    v: '║',
};

const ROUNDED: BorderGlyphs = BorderGlyphs {
    tl: '╭',
    tr: '╮',
    bl: '╰',
    br: '╯',
    h: '─',
    v: '│',
};

/// Paint a positioned tree into the buffer.
///
/// Children paint after (on top of) their parent. Every write clips against
/// the buffer bounds, so partially visible scrolled content and over-wide
/// lines degrade to whatever fits.
pub fn paint(buf: &mut Buffer, ln: &LayoutNode<'_>) {
    let props = &ln.node.props;

    if ln.node.kind == NodeKind::Box {
        if let Some(glyphs) = border_glyphs(props.border) {
            draw_border(buf, ln.rect, &glyphs, props.fg, props.bg, props.style);
        }
    }

    if ln.node.kind == NodeKind::Text {
        draw_text(buf, ln.rect, &props.text, props.fg, props.bg, props.style);
    }

    for child in &ln.children {
        paint(buf, child);
    }
}

fn border_glyphs(style: BorderStyle) -> Option<BorderGlyphs> {
    match style {
        BorderStyle::None => None,
        BorderStyle::Single => Some(SINGLE),
        BorderStyle::Double => Some(DOUBLE),
        BorderStyle::Rounded => Some(ROUNDED),
    }
}

fn draw_border(
    buf: &mut Buffer,
    rect: Rect,
    glyphs: &BorderGlyphs,
    fg: Color,
    bg: Color,
    style: StyleFlags,
) {
    if rect.is_empty() {
        return;
    }
    let right = rect.right() - 1;
    let bottom = rect.bottom() - 1;
    let cell = |ch| Cell::styled(ch, fg, bg, style);

    for x in (rect.x + 1)..right {
        buf.set(x, rect.y, cell(glyphs.h));
        buf.set(x, bottom, cell(glyphs.h));
    }
    for y in (rect.y + 1)..bottom {
        buf.set(rect.x, y, cell(glyphs.v));
        buf.set(right, y, cell(glyphs.v));
    }
    buf.set(rect.x, rect.y, cell(glyphs.tl));
    buf.set(right, rect.y, cell(glyphs.tr));
    buf.set(rect.x, bottom, cell(glyphs.bl));
    buf.set(right, bottom, cell(glyphs.br));
}

fn draw_text(buf: &mut Buffer, rect: Rect, s: &str, fg: Color, bg: Color, style: StyleFlags) {
    for (dy, line) in wrap(s, rect.width).iter().enumerate() {
        if dy >= rect.height as usize {
            break;
        }
        let y = rect.y + dy as i32;
        for (dx, ch) in line.chars().enumerate() {
            if dx >= rect.width as usize {
                break;
            }
            buf.set(rect.x + dx as i32, y, Cell::styled(ch, fg, bg, style));
        }
    }
}
