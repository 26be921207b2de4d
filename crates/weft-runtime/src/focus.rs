#![forbid(unsafe_code)]

//! Focus traversal over the frame's focusable nodes.

use weft_layout::solve::LayoutNode;

/// Tracks which focusable node currently has focus.
///
/// The candidate list is rebuilt from the positioned tree every frame
/// (depth-first order); the focused key survives rebuilds as long as a node
/// with that key still exists. A stack of saved keys scopes focus to modal
/// dialogs: opening a modal pushes the current focus, dismissing it pops
/// and restores. While a context is pushed, the modal's view should be the
/// only part of the tree with focusable nodes.
#[derive(Debug, Default)]
pub struct FocusManager {
    /// Focusable keys from the current frame, in traversal order.
    keys: Vec<String>,
    /// The focused key; empty when nothing is focusable.
    current: String,
    /// Saved focus keys for nested contexts.
    stack: Vec<String>,
}

impl FocusManager {
    /// Create a manager with nothing focused.
    pub fn new() -> Self {
        Self::default()
    }

    /// The currently focused key, or the empty string.
    pub fn current(&self) -> &str {
        &self.current
    }

    /// Advance to the next focusable key, wrapping at the end.
    pub fn next(&mut self) {
        if self.keys.is_empty() {
            self.current.clear();
            return;
        }
        let index = match self.position() {
            Some(i) => (i + 1) % self.keys.len(),
            None => 0,
        };
        self.current = self.keys[index].clone();
    }

    /// Retreat to the previous focusable key, wrapping at the start.
    pub fn prev(&mut self) {
        if self.keys.is_empty() {
            self.current.clear();
            return;
        }
        let index = match self.position() {
            Some(i) => (i + self.keys.len() - 1) % self.keys.len(),
            None => 0,
        };
        self.current = self.keys[index].clone();
    }

    /// Save the current focus and start a fresh traversal (modal opened).
    pub fn push_context(&mut self) {
        self.stack.push(std::mem::take(&mut self.current));
    }

    /// Restore the most recently saved focus (modal dismissed).
    ///
    /// A no-op when no context is pushed.
    pub fn pop_context(&mut self) {
        if let Some(saved) = self.stack.pop() {
            self.current = saved;
        }
    }

    /// Rebuild the candidate list from this frame's positioned tree.
    ///
    /// Keeps the focused key when a node still carries it; otherwise focus
    /// falls to the first focusable node, or to nothing.
    pub fn update(&mut self, root: &LayoutNode<'_>) {
        self.keys.clear();
        collect_keys(root, &mut self.keys);

        if !self.current.is_empty() && self.keys.iter().any(|k| *k == self.current) {
            return;
        }
        self.current = self.keys.first().cloned().unwrap_or_default();
    }

    fn position(&self) -> Option<usize> {
        self.keys.iter().position(|k| *k == self.current)
    }
}

fn collect_keys(ln: &LayoutNode<'_>, out: &mut Vec<String>) {
    let props = &ln.node.props;
    if props.focusable && !props.key.is_empty() {
        out.push(props.key.clone());
    }
    for child in &ln.children {
        collect_keys(child, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use weft_layout::node::{column, row, text};
    use weft_layout::solve::layout;

    fn focusable(key: &str) -> weft_layout::node::Node {
        text(key).with_key(key).with_focusable()
    }

    #[test]
    fn update_focuses_first_focusable() {
        let tree = column([text("plain"), focusable("a"), focusable("b")]);
        let lt = layout(&tree, 20, 10);
        let mut fm = FocusManager::new();
        fm.update(&lt);
        assert_eq!(fm.current(), "a");
    }

    #[test]
    fn traversal_is_depth_first_and_wraps() {
        let tree = column([
            row([focusable("a"), focusable("b")]),
            focusable("c"),
        ]);
        let lt = layout(&tree, 20, 10);
        let mut fm = FocusManager::new();
        fm.update(&lt);

        assert_eq!(fm.current(), "a");
        fm.next();
        assert_eq!(fm.current(), "b");
        fm.next();
        assert_eq!(fm.current(), "c");
        fm.next();
        assert_eq!(fm.current(), "a");
        fm.prev();
        assert_eq!(fm.current(), "c");
    }

    #[test]
    fn focus_survives_rebuild_when_key_persists() {
        let tree = column([focusable("a"), focusable("b")]);
        let lt = layout(&tree, 20, 10);
        let mut fm = FocusManager::new();
        fm.update(&lt);
        fm.next();
        assert_eq!(fm.current(), "b");

        // Same keys next frame, different order of construction.
        let tree2 = column([focusable("b"), focusable("a")]);
        let lt2 = layout(&tree2, 20, 10);
        fm.update(&lt2);
        assert_eq!(fm.current(), "b");
    }

    #[test]
    fn missing_key_falls_back_to_first() {
        let tree = column([focusable("a"), focusable("b")]);
        let lt = layout(&tree, 20, 10);
        let mut fm = FocusManager::new();
        fm.update(&lt);
        fm.next();
        assert_eq!(fm.current(), "b");

        let tree2 = column([focusable("a"), focusable("c")]);
        let lt2 = layout(&tree2, 20, 10);
        fm.update(&lt2);
        assert_eq!(fm.current(), "a");
    }

    #[test]
    fn no_focusables_means_empty_focus() {
        let tree = column([text("x")]);
        let lt = layout(&tree, 20, 10);
        let mut fm = FocusManager::new();
        fm.update(&lt);
        assert_eq!(fm.current(), "");
        fm.next();
        assert_eq!(fm.current(), "");
    }

    #[test]
    fn context_stack_saves_and_restores() {
        let base = column([focusable("a"), focusable("b")]);
        let lt = layout(&base, 20, 10);
        let mut fm = FocusManager::new();
        fm.update(&lt);
        fm.next();
        assert_eq!(fm.current(), "b");

        // Modal opens: only the modal's nodes are focusable now.
        fm.push_context();
        let modal = column([focusable("ok"), focusable("cancel")]);
        let lt = layout(&modal, 20, 10);
        fm.update(&lt);
        assert_eq!(fm.current(), "ok");
        fm.next();
        assert_eq!(fm.current(), "cancel");

        // Modal dismissed: prior focus comes back.
        fm.pop_context();
        let lt = layout(&base, 20, 10);
        fm.update(&lt);
        assert_eq!(fm.current(), "b");
    }

    #[test]
    fn pop_without_push_is_inert() {
        let mut fm = FocusManager::new();
        fm.pop_context();
        assert_eq!(fm.current(), "");
    }
}
