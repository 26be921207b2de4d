#![forbid(unsafe_code)]

//! The declarative element tree.
//!
//! A [`Node`] is pure data: a kind tag, a property bag, and children. The
//! view function builds a fresh tree every frame; layout consumes it and the
//! tree is discarded. There are no parent pointers and no identity beyond
//! the `key` property used for focus tracking.

use weft_core::style::{Color, StyleFlags};

/// The kind of a UI node.
///
/// `List` and `Pane` lay out exactly like `Column`; they exist as distinct
/// tags so consumers can recognize and style them. `Spacer` is a
/// zero-content flex-1 filler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NodeKind {
    /// Wrapped text content.
    #[default]
    Text,
    /// A bordered container holding a single child.
    Box,
    /// Horizontal flex container.
    Row,
    /// Vertical flex container.
    Column,
    /// Vertical container tagged as a list.
    List,
    /// Vertical container tagged as a pane.
    Pane,
    /// Flexible empty space.
    Spacer,
}

/// Box border appearance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BorderStyle {
    /// No border drawn.
    #[default]
    None,
    /// Single-line border.
    Single,
    /// Double-line border.
    Double,
    /// Rounded-corner border.
    Rounded,
}

/// Configurable properties of a node.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Props {
    /// Text content (Text nodes).
    pub text: String,
    /// Explicit width override; 0 = auto. Shrinks the computed rect only.
    pub width: u16,
    /// Explicit height override; 0 = auto. Shrinks the computed rect only.
    pub height: u16,
    /// Flex weight: 0 = intrinsic size, >0 = share of leftover axis space.
    pub flex_weight: u16,
    /// Border style (Box nodes).
    pub border: BorderStyle,
    /// Whether this node participates in focus traversal.
    pub focusable: bool,
    /// Stable identity for focus tracking across frames.
    pub key: String,
    /// Foreground color.
    pub fg: Color,
    /// Background color.
    pub bg: Color,
    /// Text attributes.
    pub style: StyleFlags,
    /// Rows hidden from the top of a scroll container (or, under
    /// `scroll_to_bottom`, rows revealed above the pinned bottom).
    pub scroll_offset: u16,
    /// Pin content to the bottom when it overflows the viewport.
    pub scroll_to_bottom: bool,
}

/// A virtual UI element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Node {
    /// The node kind.
    pub kind: NodeKind,
    /// Property bag.
    pub props: Props,
    /// Ordered children. Text nodes ignore theirs; Box uses only the first.
    pub children: Vec<Node>,
}

// --- Builders ---------------------------------------------------------------

/// A plain text node.
pub fn text(s: impl Into<String>) -> Node {
    Node {
        kind: NodeKind::Text,
        props: Props {
            text: s.into(),
            ..Props::default()
        },
        children: Vec::new(),
    }
}

/// A colored and styled text node.
pub fn text_styled(s: impl Into<String>, fg: Color, bg: Color, style: StyleFlags) -> Node {
    Node {
        kind: NodeKind::Text,
        props: Props {
            text: s.into(),
            fg,
            bg,
            style,
            ..Props::default()
        },
        children: Vec::new(),
    }
}

/// A horizontal flex container.
pub fn row(children: impl IntoIterator<Item = Node>) -> Node {
    Node {
        kind: NodeKind::Row,
        props: Props::default(),
        children: children.into_iter().collect(),
    }
}

/// A vertical flex container.
pub fn column(children: impl IntoIterator<Item = Node>) -> Node {
    Node {
        kind: NodeKind::Column,
        props: Props::default(),
        children: children.into_iter().collect(),
    }
}

/// A bordered container around a single child.
pub fn boxed(border: BorderStyle, child: Node) -> Node {
    Node {
        kind: NodeKind::Box,
        props: Props {
            border,
            ..Props::default()
        },
        children: vec![child],
    }
}

/// A vertical container tagged as a list.
pub fn list(children: impl IntoIterator<Item = Node>) -> Node {
    Node {
        kind: NodeKind::List,
        props: Props::default(),
        children: children.into_iter().collect(),
    }
}

/// A vertical container tagged as a pane.
pub fn pane(children: impl IntoIterator<Item = Node>) -> Node {
    Node {
        kind: NodeKind::Pane,
        props: Props::default(),
        children: children.into_iter().collect(),
    }
}

/// Flexible empty space (flex weight 1).
pub fn spacer() -> Node {
    Node {
        kind: NodeKind::Spacer,
        props: Props {
            flex_weight: 1,
            ..Props::default()
        },
        children: Vec::new(),
    }
}

impl Node {
    /// Set the focus key.
    #[must_use]
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.props.key = key.into();
        self
    }

    /// Set the flex weight.
    #[must_use]
    pub fn with_flex(mut self, weight: u16) -> Self {
        self.props.flex_weight = weight;
        self
    }

    /// Set an explicit size. Either dimension may be 0 for auto.
    #[must_use]
    pub fn with_size(mut self, width: u16, height: u16) -> Self {
        self.props.width = width;
        self.props.height = height;
        self
    }

    /// Mark the node focusable.
    #[must_use]
    pub fn with_focusable(mut self) -> Self {
        self.props.focusable = true;
        self
    }

    /// Set the vertical scroll offset.
    #[must_use]
    pub fn with_scroll_offset(mut self, offset: u16) -> Self {
        self.props.scroll_offset = offset;
        self
    }

    /// Pin content to the bottom when it overflows.
    #[must_use]
    pub fn with_scroll_to_bottom(mut self) -> Self {
        self.props.scroll_to_bottom = true;
        self
    }
}

// --- Convenience constructors ----------------------------------------------

/// A full-width text bar: styled text that stretches to fill its row.
pub fn bar(s: impl Into<String>, fg: Color, bg: Color, style: StyleFlags) -> Node {
    text_styled(s, fg, bg, style).with_flex(1)
}

/// A horizontal rule of the given width using `─`.
pub fn separator(width: u16) -> Node {
    separator_styled('─', width, Color(245))
}

/// A horizontal rule with a custom character and color.
pub fn separator_styled(ch: char, width: u16, fg: Color) -> Node {
    let s: String = std::iter::repeat(ch).take(width as usize).collect();
    text_styled(s, fg, Color::DEFAULT, StyleFlags::empty())
}

/// Truncate text to `max_width` runes, appending `…` when it overflows.
pub fn truncate(s: &str, max_width: u16) -> String {
    if max_width == 0 {
        return String::new();
    }
    let count = s.chars().count();
    if count <= max_width as usize {
        return s.to_string();
    }
    if max_width == 1 {
        return "…".to_string();
    }
    let mut out: String = s.chars().take(max_width as usize - 1).collect();
    out.push('…');
    out
}

/// Indent a child by the given number of spaces.
pub fn indent(spaces: u16, child: Node) -> Node {
    row([text(" ".repeat(spaces as usize)), child])
}

/// Pad a child on all four sides with blank cells.
pub fn pad(top: u16, right: u16, bottom: u16, left: u16, child: Node) -> Node {
    let mut padded = child;
    if left > 0 || right > 0 {
        let mut cells = Vec::with_capacity(3);
        if left > 0 {
            cells.push(text(" ".repeat(left as usize)));
        }
        cells.push(padded);
        if right > 0 {
            cells.push(text(" ".repeat(right as usize)));
        }
        padded = row(cells);
    }
    let mut lines = Vec::with_capacity(top as usize + bottom as usize + 1);
    for _ in 0..top {
        lines.push(text(""));
    }
    lines.push(padded);
    for _ in 0..bottom {
        lines.push(text(""));
    }
    column(lines)
}

/// Split text on newlines into a column of uniformly styled lines.
pub fn paragraph(s: &str, fg: Color, bg: Color, style: StyleFlags) -> Node {
    column(s.split('\n').map(|line| text_styled(line, fg, bg, style)))
}
