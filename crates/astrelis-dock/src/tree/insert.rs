use tracing::debug;

use super::{DockNode, DockTree, GOLDEN_RATIO, InsertMode, NodeId, SplitNode};
use crate::error::{DockError, DockResult};
use crate::pane::{Pane, PaneId, PaneItem};
use crate::sizing::Sizer;
use crate::types::Orientation;

impl<P: Pane> DockTree<P> {
    /// Add a new pane relative to `reference`.
    ///
    /// With no reference, tab modes target the first tab group and split modes
    /// split the whole tree.
    pub fn insert_pane(
        &mut self,
        pane: P,
        reference: Option<PaneId>,
        mode: InsertMode,
    ) -> DockResult<()> {
        let id = pane.id();
        if self.contains(id) {
            return Err(DockError::DuplicatePane(id));
        }
        self.check_reference(reference)?;
        self.insert_item(PaneItem::new(pane), reference, mode);
        Ok(())
    }

    /// Relocate a pane that is already in the tree.
    pub fn move_pane(
        &mut self,
        id: PaneId,
        reference: Option<PaneId>,
        mode: InsertMode,
    ) -> DockResult<()> {
        let group = self.group_of(id).ok_or(DockError::PaneNotFound(id))?;
        self.check_reference(reference)?;
        let mut reference = reference;
        if reference == Some(id) {
            if mode.is_tab() || self.group(group)?.len() == 1 {
                return Ok(());
            }
            // splitting off its own group: anchor on a tab that stays behind
            reference = self.group(group)?.pane_ids().find(|&other| other != id);
        }
        let item = self.detach(id)?;
        self.insert_item(item, reference, mode);
        Ok(())
    }

    fn check_reference(&self, reference: Option<PaneId>) -> DockResult<()> {
        match reference {
            Some(reference) if !self.contains(reference) => {
                Err(DockError::PaneNotFound(reference))
            }
            _ => Ok(()),
        }
    }

    pub(super) fn insert_item(
        &mut self,
        item: PaneItem<P>,
        reference: Option<PaneId>,
        mode: InsertMode,
    ) {
        match mode.split() {
            None => self.insert_tab(item, reference, mode == InsertMode::TabAfter),
            Some((orientation, after)) => self.insert_split(item, reference, orientation, after),
        }
    }

    fn insert_tab(&mut self, item: PaneItem<P>, reference: Option<PaneId>, after: bool) {
        let target = match reference.and_then(|r| Some((self.group_of(r)?, r))) {
            Some((group, r)) => Some((group, self.tabs_mut(group).index_of(r).unwrap_or(0))),
            None => self.first_tab_group().map(|group| {
                let active = self.tabs_mut(group).active.unwrap_or(0);
                (group, active)
            }),
        };

        let Some((group, index)) = target else {
            let group = self.create_group(item);
            self.root = Some(group);
            debug!(%group, "tab group created as root");
            return;
        };

        let index = if after { index + 1 } else { index };
        self.insert_into_group(group, index, item);
    }

    fn insert_split(
        &mut self,
        item: PaneItem<P>,
        reference: Option<PaneId>,
        orientation: Orientation,
        after: bool,
    ) {
        let group = self.create_group(item);
        if self.root.is_none() {
            self.root = Some(group);
            debug!(%group, "tab group created as root");
            return;
        }

        let ref_node = reference.and_then(|r| self.group_of(r));
        match ref_node.and_then(|node| Some((node, self.parent_of(node)?))) {
            Some((node, parent)) => self.split_beside(parent, node, group, orientation, after),
            None => {
                let split = self.split_root(orientation);
                let share = if reference.is_some() { 1.0 } else { GOLDEN_RATIO };
                let node = self.split_mut(split);
                node.normalize_sizes();
                let index = if after { node.children.len() } else { 0 };
                node.insert_child(index, group, Sizer::new(share));
                node.normalize_sizes();
                self.set_parent(group, Some(split));
                debug!(%group, %split, ?orientation, after, "root split");
            }
        }
    }

    /// Place `group` next to `node`, a child of `parent`.
    fn split_beside(
        &mut self,
        parent: NodeId,
        node: NodeId,
        group: NodeId,
        orientation: Orientation,
        after: bool,
    ) {
        let split = self.split_mut(parent);
        let Some(index) = split.child_index(node) else {
            unreachable!("{node} missing from its parent {parent}");
        };

        if split.orientation == orientation {
            split.normalize_sizes();
            let half = split.sizers[index].size_hint / 2.0;
            split.sizers[index] = Sizer::new(half);
            split.insert_child(index + usize::from(after), group, Sizer::new(half));
            self.set_parent(group, Some(parent));
            debug!(%group, %parent, index, "sibling inserted");
            return;
        }

        let mut wrapper = SplitNode::new(orientation);
        wrapper.normalized = true;
        wrapper.parent = Some(parent);
        wrapper.insert_child(0, node, Sizer::new(0.5));
        wrapper.insert_child(usize::from(after), group, Sizer::new(0.5));
        let wrapper = self.push_node(DockNode::Split(wrapper));

        self.split_mut(parent).children[index] = wrapper;
        self.set_parent(node, Some(wrapper));
        self.set_parent(group, Some(wrapper));
        debug!(%group, %node, %wrapper, ?orientation, "reference wrapped in new split");
    }

    /// Ensure the root is a split of `orientation`, wrapping the old root if needed.
    fn split_root(&mut self, orientation: Orientation) -> NodeId {
        let Some(root) = self.root else {
            unreachable!("split_root on an empty tree");
        };
        if self.is_split_with(root, orientation) {
            return root;
        }

        let mut split = SplitNode::new(orientation);
        split.insert_child(0, root, Sizer::new(0.0));
        let split = self.push_node(DockNode::Split(split));
        self.set_parent(root, Some(split));
        self.root = Some(split);
        split
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::tests::{Leaf, id};

    fn tree_with(keys: &[&str]) -> DockTree<Leaf> {
        let mut tree = DockTree::new();
        for key in keys {
            tree.insert_pane(Leaf::new(key), None, InsertMode::TabAfter).unwrap();
        }
        tree
    }

    fn root_split(tree: &DockTree<Leaf>) -> &SplitNode {
        tree.node(tree.root().unwrap()).unwrap().as_split().unwrap()
    }

    #[test]
    fn test_tab_before_and_after_reference() {
        let mut tree = tree_with(&["a"]);
        tree.insert_pane(Leaf::new("b"), Some(id("a")), InsertMode::TabBefore).unwrap();
        tree.insert_pane(Leaf::new("c"), Some(id("a")), InsertMode::TabAfter).unwrap();
        let group = tree.group(tree.root().unwrap()).unwrap();
        assert_eq!(group.pane_ids().collect::<Vec<_>>(), vec![id("b"), id("a"), id("c")]);
        assert_eq!(group.active_id(), Some(id("a")));
    }

    #[test]
    fn test_duplicate_and_missing_reference_are_errors() {
        let mut tree = tree_with(&["a"]);
        assert_eq!(
            tree.insert_pane(Leaf::new("a"), None, InsertMode::TabAfter),
            Err(DockError::DuplicatePane(id("a")))
        );
        assert_eq!(
            tree.insert_pane(Leaf::new("b"), Some(id("x")), InsertMode::SplitLeft),
            Err(DockError::PaneNotFound(id("x")))
        );
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn test_split_without_reference_uses_golden_share() {
        let mut tree = tree_with(&["a"]);
        tree.insert_pane(Leaf::new("b"), None, InsertMode::SplitRight).unwrap();
        let split = root_split(&tree);
        assert_eq!(split.orientation(), Orientation::Horizontal);
        let sizes = split.relative_sizes();
        assert!((sizes[0] - 1.0 / 1.618).abs() < 1e-4);
        assert!((sizes[1] - 0.618 / 1.618).abs() < 1e-4);
    }

    #[test]
    fn test_split_root_group_with_reference_is_even() {
        let mut tree = tree_with(&["a"]);
        tree.insert_pane(Leaf::new("b"), Some(id("a")), InsertMode::SplitBottom).unwrap();
        let split = root_split(&tree);
        assert_eq!(split.orientation(), Orientation::Vertical);
        assert_eq!(split.relative_sizes(), vec![0.5, 0.5]);
        let second = tree.group(split.children()[1]).unwrap();
        assert_eq!(second.active_id(), Some(id("b")));
    }

    #[test]
    fn test_same_orientation_inserts_sibling() {
        let mut tree = tree_with(&["a"]);
        tree.insert_pane(Leaf::new("b"), Some(id("a")), InsertMode::SplitRight).unwrap();
        tree.insert_pane(Leaf::new("c"), Some(id("b")), InsertMode::SplitLeft).unwrap();

        let split = root_split(&tree);
        assert_eq!(split.children().len(), 3);
        assert_eq!(split.relative_sizes(), vec![0.5, 0.25, 0.25]);
        let middle = tree.group(split.children()[1]).unwrap();
        assert_eq!(middle.active_id(), Some(id("c")));
        for &child in split.children() {
            assert_eq!(tree.node(child).unwrap().parent(), tree.root());
        }
    }

    #[test]
    fn test_cross_orientation_wraps_reference() {
        let mut tree = tree_with(&["a"]);
        tree.insert_pane(Leaf::new("b"), Some(id("a")), InsertMode::SplitRight).unwrap();
        tree.insert_pane(Leaf::new("c"), Some(id("b")), InsertMode::SplitTop).unwrap();

        let root = root_split(&tree);
        assert_eq!(root.children().len(), 2);
        let wrapper = tree.node(root.children()[1]).unwrap().as_split().unwrap();
        assert_eq!(wrapper.orientation(), Orientation::Vertical);
        assert_eq!(wrapper.relative_sizes(), vec![0.5, 0.5]);
        assert_eq!(tree.group_of(id("c")), Some(wrapper.children()[0]));
        assert_eq!(tree.group_of(id("b")), Some(wrapper.children()[1]));
    }

    #[test]
    fn test_move_pane_to_own_single_group_is_noop() {
        let mut tree = tree_with(&["a"]);
        tree.insert_pane(Leaf::new("b"), Some(id("a")), InsertMode::SplitRight).unwrap();
        let before = tree.group_of(id("b"));
        tree.move_pane(id("b"), Some(id("b")), InsertMode::SplitTop).unwrap();
        assert_eq!(tree.group_of(id("b")), before);
    }

    #[test]
    fn test_move_pane_out_of_group_into_split() {
        let mut tree = tree_with(&["a"]);
        tree.insert_pane(Leaf::new("b"), Some(id("a")), InsertMode::TabAfter).unwrap();
        tree.move_pane(id("b"), Some(id("a")), InsertMode::SplitLeft).unwrap();

        let split = root_split(&tree);
        assert_eq!(tree.group_of(id("b")), Some(split.children()[0]));
        assert_eq!(tree.group_of(id("a")), Some(split.children()[1]));
        assert!(tree.move_pane(id("zz"), None, InsertMode::TabAfter).is_err());
    }
}
