use tracing::{debug, trace};

use super::{DockNode, DockTree, NodeId};
use crate::error::{DockError, DockResult};
use crate::pane::{Pane, PaneId, PaneItem};
use crate::sizing::{self, Sizer};

impl<P: Pane> DockTree<P> {
    /// Remove a pane and hand it back to the caller.
    ///
    /// Emptied tab groups are deleted and their parent split collapsed or
    /// flattened so the tree stays well formed.
    pub fn remove_pane(&mut self, id: PaneId) -> DockResult<P> {
        self.detach(id).map(PaneItem::into_pane)
    }

    pub(super) fn detach(&mut self, id: PaneId) -> DockResult<PaneItem<P>> {
        let group = self.group_of(id).ok_or(DockError::PaneNotFound(id))?;
        let tabs = self.group(group)?;
        let index = tabs.index_of(id).ok_or(DockError::PaneNotFound(id))?;
        let last = tabs.len() == 1;

        let item = self.take_from_group(group, index);
        if last {
            self.remove_group(group);
        }
        trace!(pane = %id, %group, "pane detached");
        Ok(item)
    }

    /// Delete an emptied tab group and restore the split invariants above it.
    fn remove_group(&mut self, group: NodeId) {
        let parent = self.parent_of(group);
        self.nodes.try_remove(group.0);

        let Some(parent) = parent else {
            self.root = None;
            debug!(%group, "root group removed, tree is empty");
            return;
        };

        self.hold_all_sizes();
        let split = self.split_mut(parent);
        if let Some(index) = split.child_index(group) {
            split.remove_child(index);
        }
        if split.children.len() > 1 {
            return;
        }
        self.collapse(parent);
    }

    /// Replace a split that is down to one child with that child.
    fn collapse(&mut self, split: NodeId) {
        let Some(DockNode::Split(node)) = self.nodes.try_remove(split.0) else {
            unreachable!("{split} is not a live split");
        };
        let Some(&child) = node.children.first() else {
            unreachable!("{split} collapsed with no children");
        };

        let Some(grand) = node.parent else {
            self.set_parent(child, None);
            self.root = Some(child);
            debug!(%split, %child, "split collapsed into root");
            return;
        };

        let parent = self.split_mut(grand);
        let Some(index) = parent.child_index(split) else {
            unreachable!("{split} missing from its parent {grand}");
        };
        let orientation = parent.orientation;

        if !self.is_split_with(child, orientation) {
            self.split_mut(grand).children[index] = child;
            self.set_parent(child, Some(grand));
            debug!(%split, %child, %grand, "split collapsed into parent slot");
            return;
        }

        self.flatten_into(grand, index, child);
    }

    /// Splice the children of split `child` into `parent` at `index`,
    /// replacing the slot `child` occupied.
    fn flatten_into(&mut self, parent: NodeId, index: usize, child: NodeId) {
        let Some(DockNode::Split(inner)) = self.nodes.try_remove(child.0) else {
            unreachable!("{child} is not a live split");
        };

        let outer = self.split_mut(parent);
        let (_, slot) = outer.remove_child(index);
        let shares = sizing::normalize(&inner.sizers.iter().map(|s| s.size).collect::<Vec<_>>());
        for (offset, (&grandchild, share)) in inner.children.iter().zip(shares).enumerate() {
            outer.insert_child(index + offset, grandchild, Sizer::new(share * slot.size_hint));
        }
        for &grandchild in &inner.children {
            self.set_parent(grandchild, Some(parent));
        }
        debug!(%child, %parent, count = inner.children.len(), "nested split flattened");
    }

    fn hold_all_sizes(&mut self) {
        for node in self.nodes.iter_mut() {
            if let DockNode::Split(split) = node {
                split.hold_sizes();
            }
        }
    }
}
