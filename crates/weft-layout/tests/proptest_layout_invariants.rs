//! Property-based invariant tests for wrapping and the layout solver.
//!
//! 1. Wrapping is conservative: no produced line exceeds the width unless a
//!    single word does, and then that word is alone and unbroken.
//! 2. Every resolved rect has non-negative dimensions (guaranteed by type,
//!    exercised here against panics in the signed arithmetic).
//! 3. Row children never overflow their parent's width.
//! 4. Non-scrollable column children stay inside the parent's vertical
//!    extent.

use proptest::prelude::*;
use weft_layout::node::{boxed, column, row, spacer, text, BorderStyle, Node};
use weft_layout::solve::{layout, LayoutNode};
use weft_layout::wrap::wrap;

fn arb_tree(depth: u32) -> impl Strategy<Value = Node> {
    let leaf = prop_oneof![
        "[ -~]{0,40}".prop_map(|s| text(s)),
        Just(spacer()),
        ("[ -~]{0,12}", 0u16..4).prop_map(|(s, w)| text(s).with_flex(w)),
    ];
    leaf.prop_recursive(depth, 24, 4, |inner| {
        prop_oneof![
            proptest::collection::vec(inner.clone(), 0..4).prop_map(|c| row(c)),
            proptest::collection::vec(inner.clone(), 0..4).prop_map(|c| column(c)),
            inner.prop_map(|child| boxed(BorderStyle::Single, child)),
        ]
    })
}

proptest! {
    #[test]
    fn wrap_is_conservative(s in "[ -~\n]{0,120}", width in 1u16..40) {
        let lines = wrap(&s, width);
        for line in &lines {
            if line.chars().count() > width as usize {
                // Only an oversized single word (plus its indent) may
                // exceed the width, and it is never broken.
                prop_assert!(!line.trim_start().contains(' '));
            }
        }
    }

    #[test]
    fn wrap_preserves_all_words(s in "[a-z ]{0,80}", width in 1u16..40) {
        let lines = wrap(&s, width);
        let wrapped_words: Vec<&str> = lines.iter().flat_map(|l| l.split_whitespace()).collect();
        let original_words: Vec<&str> = s.split_whitespace().collect();
        prop_assert_eq!(wrapped_words, original_words);
    }

    #[test]
    fn layout_never_panics_and_rects_fit_types(
        tree in arb_tree(3),
        w in 0u16..60,
        h in 0u16..40,
    ) {
        let lt = layout(&tree, w, h);
        assert_tree_sane(&lt);
    }

    #[test]
    fn row_children_conserve_width(
        children in proptest::collection::vec("[ -~]{0,20}".prop_map(|s| text(s)), 0..6),
        w in 0u16..60,
    ) {
        let tree = row(children);
        let lt = layout(&tree, w, 1);
        let total: u32 = lt.children.iter().map(|c| u32::from(c.rect.width)).sum();
        prop_assert!(total <= u32::from(w));
    }

    #[test]
    fn column_children_stay_in_bounds_when_not_scrollable(
        children in proptest::collection::vec("[ -~]{0,30}".prop_map(|s| text(s)), 0..6),
        w in 1u16..40,
        h in 1u16..20,
    ) {
        let tree = column(children);
        let lt = layout(&tree, w, h);
        for child in &lt.children {
            prop_assert!(child.rect.y >= lt.rect.y);
            prop_assert!(child.rect.bottom() <= lt.rect.bottom());
        }
    }
}

fn assert_tree_sane(ln: &LayoutNode<'_>) {
    // Width/height are u16, so negativity is impossible; what we are really
    // checking is that no conversion wrapped around.
    assert!(ln.rect.width <= 4096, "suspicious width {}", ln.rect.width);
    assert!(
        ln.rect.height <= 4096,
        "suspicious height {}",
        ln.rect.height
    );
    for child in &ln.children {
        assert_tree_sane(child);
    }
}
