#![forbid(unsafe_code)]

//! Layout solver: node tree + viewport in, positioned tree out.
//!
//! Two-pass flex resolution per container: intrinsic sizes of non-flex
//! children are measured first, then leftover axis space is distributed to
//! flex children proportionally to their weights. Children are clamped to
//! their parent's extent — except inside scrollable columns, where overflow
//! is the point and the whole content run is shifted upward afterwards.

use weft_core::geometry::Rect;

use crate::node::{Node, NodeKind};
use crate::wrap::wrap;

/// A node resolved to an absolute position.
///
/// Child rects share the root's coordinate system. Borrows the frame's node
/// tree; both are discarded once the frame is painted.
#[derive(Debug)]
pub struct LayoutNode<'a> {
    /// The node this rect was resolved for.
    pub node: &'a Node,
    /// Absolute position and extent.
    pub rect: Rect,
    /// Positioned children, in tree order.
    pub children: Vec<LayoutNode<'a>>,
}

/// Resolve a node tree within a terminal viewport.
pub fn layout(root: &Node, term_w: u16, term_h: u16) -> LayoutNode<'_> {
    solve(root, Rect::from_size(term_w, term_h))
}

fn solve<'a>(n: &'a Node, avail: Rect) -> LayoutNode<'a> {
    let mut ln = match n.kind {
        NodeKind::Text => solve_text(n, avail),
        NodeKind::Row => solve_row(n, avail),
        NodeKind::Column | NodeKind::List | NodeKind::Pane => solve_column(n, avail),
        NodeKind::Box => solve_box(n, avail),
        NodeKind::Spacer => LayoutNode {
            node: n,
            rect: avail,
            children: Vec::new(),
        },
    };

    // An explicit size shrinks the computed rect, never grows it.
    if n.props.width > 0 && n.props.width < ln.rect.width {
        ln.rect.width = n.props.width;
    }
    if n.props.height > 0 && n.props.height < ln.rect.height {
        ln.rect.height = n.props.height;
    }

    ln
}

fn solve_text<'a>(n: &'a Node, avail: Rect) -> LayoutNode<'a> {
    let lines = wrap(&n.props.text, avail.width);
    let height = (lines.len().min(avail.height as usize)) as u16;
    LayoutNode {
        node: n,
        // Text takes the full allocation width so flex-assigned space is
        // honored when it paints.
        rect: Rect::new(avail.x, avail.y, avail.width, height),
        children: Vec::new(),
    }
}

fn solve_row<'a>(n: &'a Node, avail: Rect) -> LayoutNode<'a> {
    let mut ln = LayoutNode {
        node: n,
        rect: avail,
        children: Vec::with_capacity(n.children.len()),
    };
    if n.children.is_empty() {
        return ln;
    }

    let mut total_fixed: i64 = 0;
    let mut total_flex: i64 = 0;
    for child in &n.children {
        let weight = i64::from(child.props.flex_weight);
        if weight > 0 {
            total_flex += weight;
        } else {
            total_fixed += i64::from(measure_width(child, avail));
        }
    }
    let remaining = (i64::from(avail.width) - total_fixed).max(0);

    let mut x = avail.x;
    for child in &n.children {
        let weight = i64::from(child.props.flex_weight);
        let mut child_w = if weight > 0 && total_flex > 0 {
            remaining * weight / total_flex
        } else {
            i64::from(measure_width(child, avail))
        };
        let used = i64::from(x - avail.x);
        child_w = child_w.min(i64::from(avail.width) - used).max(0);

        let child_rect = Rect::new(x, avail.y, child_w as u16, avail.height);
        ln.children.push(solve(child, child_rect));
        x += child_w as i32;
    }

    ln
}

fn solve_column<'a>(n: &'a Node, avail: Rect) -> LayoutNode<'a> {
    let mut ln = LayoutNode {
        node: n,
        rect: avail,
        children: Vec::with_capacity(n.children.len()),
    };
    if n.children.is_empty() {
        return ln;
    }

    // Scroll containers allocate past the viewport; the overflow is shifted
    // into view below.
    let scrollable = n.props.scroll_offset > 0 || n.props.scroll_to_bottom;

    let mut total_fixed: i64 = 0;
    let mut total_flex: i64 = 0;
    for child in &n.children {
        let weight = i64::from(child.props.flex_weight);
        if weight > 0 {
            total_flex += weight;
        } else {
            total_fixed += i64::from(measure_height(child, avail));
        }
    }
    let remaining = (i64::from(avail.height) - total_fixed).max(0);

    let mut y = avail.y;
    for child in &n.children {
        let weight = i64::from(child.props.flex_weight);
        let mut child_h = if weight > 0 && total_flex > 0 {
            remaining * weight / total_flex
        } else {
            i64::from(measure_height(child, avail))
        };
        if !scrollable {
            let used = i64::from(y - avail.y);
            child_h = child_h.min(i64::from(avail.height) - used);
        }
        child_h = child_h.max(0);

        let child_rect = Rect::new(avail.x, y, avail.width, child_h as u16);
        ln.children.push(solve(child, child_rect));
        y += child_h as i32;
    }

    // Resolve the scroll offset. Under scroll_to_bottom, offset 0 means
    // "pinned to bottom" and larger offsets reveal older content above.
    let mut offset = i32::from(n.props.scroll_offset);
    if n.props.scroll_to_bottom {
        let content_h = y - avail.y;
        if content_h > i32::from(avail.height) {
            offset = (content_h - i32::from(avail.height) - i32::from(n.props.scroll_offset))
                .max(0);
        } else {
            offset = 0;
        }
    }
    if offset > 0 {
        for child in &mut ln.children {
            shift_y(child, -offset);
        }
    }

    ln
}

fn solve_box<'a>(n: &'a Node, avail: Rect) -> LayoutNode<'a> {
    let mut ln = LayoutNode {
        node: n,
        rect: avail,
        children: Vec::new(),
    };
    // The border steals one cell on each side; only the first child is laid
    // out, extras are ignored.
    if let Some(child) = n.children.first() {
        let inner = Rect::new(
            avail.x + 1,
            avail.y + 1,
            avail.width.saturating_sub(2),
            avail.height.saturating_sub(2),
        );
        ln.children.push(solve(child, inner));
    }
    ln
}

/// Intrinsic width of a non-flex node.
fn measure_width(n: &Node, avail: Rect) -> u16 {
    if n.props.width > 0 {
        return n.props.width;
    }
    match n.kind {
        NodeKind::Text => n.props.text.chars().count().min(u16::MAX as usize) as u16,
        NodeKind::Box => match n.children.first() {
            Some(child) => measure_width(child, avail).saturating_add(2),
            None => 2,
        },
        NodeKind::Row => n
            .children
            .iter()
            .fold(0u16, |acc, c| acc.saturating_add(measure_width(c, avail))),
        _ => avail.width,
    }
}

/// Intrinsic height of a non-flex node.
fn measure_height(n: &Node, avail: Rect) -> u16 {
    if n.props.height > 0 {
        return n.props.height;
    }
    match n.kind {
        NodeKind::Text => wrap(&n.props.text, avail.width)
            .len()
            .min(u16::MAX as usize) as u16,
        NodeKind::Box => match n.children.first() {
            Some(child) => {
                let inner = Rect::new(avail.x, avail.y, avail.width.saturating_sub(2), avail.height);
                measure_height(child, inner).saturating_add(2)
            }
            None => 2,
        },
        NodeKind::Column | NodeKind::List | NodeKind::Pane => n
            .children
            .iter()
            .fold(0u16, |acc, c| acc.saturating_add(measure_height(c, avail))),
        // A row is as tall as its tallest child: a row holding a multi-line
        // box must report the box's full height.
        NodeKind::Row => n
            .children
            .iter()
            .map(|c| measure_height(c, avail))
            .max()
            .unwrap_or(1)
            .max(1),
        NodeKind::Spacer => 1,
    }
}

/// Shift a layout node and all descendants vertically.
fn shift_y(ln: &mut LayoutNode<'_>, dy: i32) {
    ln.rect.y += dy;
    for child in &mut ln.children {
        shift_y(child, dy);
    }
}
