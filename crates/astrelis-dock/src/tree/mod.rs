//! Recursive split / tab-group tree.
//!
//! Nodes live in a generational arena and refer to each other by [`NodeId`].
//! Every mutation re-establishes the structural invariants before returning:
//!
//! - a split node never has exactly one child;
//! - a split node never has a direct child split of the same orientation;
//! - a tab group is never empty.

mod insert;
mod layout;
mod persist;
mod remove;

use std::fmt;

use astrelis_core::alloc::HashMap;
use astrelis_core::alloc::sparse_set::{IndexSlot, SparseSet};

use crate::error::{DockError, DockResult};
use crate::pane::{Pane, PaneId, PaneItem};
use crate::settings::{DockSettings, InsertBehavior, RemoveBehavior};
use crate::sizing::{self, Sizer};
use crate::track::TrackHandle;
use crate::types::{LayoutRect, Orientation};

pub use layout::TabAreaHit;

/// Share given to the new group when the whole root is split without a
/// reference pane. Existing content keeps the complement.
pub const GOLDEN_RATIO: f32 = 0.618;

/// Stable handle to a node in a [`DockTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(IndexSlot);

impl NodeId {
    #[cfg(test)]
    pub(crate) fn from_slot(slot: IndexSlot) -> Self {
        Self(slot)
    }

    pub fn slot(&self) -> IndexSlot {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Node({})", self.0)
    }
}

/// Where [`DockTree::insert_pane`] places a pane relative to its reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InsertMode {
    /// Tab immediately before the reference pane.
    TabBefore,
    /// Tab immediately after the reference pane.
    TabAfter,
    SplitTop,
    SplitLeft,
    SplitRight,
    SplitBottom,
}

impl InsertMode {
    pub fn is_tab(&self) -> bool {
        matches!(self, InsertMode::TabBefore | InsertMode::TabAfter)
    }

    /// Split axis and whether the new group goes after the reference.
    pub fn split(&self) -> Option<(Orientation, bool)> {
        match self {
            InsertMode::TabBefore | InsertMode::TabAfter => None,
            InsertMode::SplitTop => Some((Orientation::Vertical, false)),
            InsertMode::SplitLeft => Some((Orientation::Horizontal, false)),
            InsertMode::SplitRight => Some((Orientation::Horizontal, true)),
            InsertMode::SplitBottom => Some((Orientation::Vertical, true)),
        }
    }
}

/// Identifies handle `index` of split node `split`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HandleRef {
    pub split: NodeId,
    pub index: usize,
}

/// A pane became visible or stopped being visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisibilityChange {
    Shown(PaneId),
    Hidden(PaneId),
}

const TAB_BAR: usize = 0;
const CONTENT: usize = 1;

/// Leaf node: an ordered stack of panes sharing one tab strip.
#[derive(Debug)]
pub struct TabGroup<P> {
    parent: Option<NodeId>,
    panes: Vec<PaneItem<P>>,
    active: Option<usize>,
    /// Pane that was active before the current one.
    previous: Option<PaneId>,
    sizers: [Sizer; 2],
    rect: LayoutRect,
    tab_bar_rect: LayoutRect,
}

impl<P: Pane> TabGroup<P> {
    fn new(item: PaneItem<P>) -> Self {
        Self {
            parent: None,
            panes: vec![item],
            active: Some(0),
            previous: None,
            sizers: [Sizer::default(), Sizer::default()],
            rect: LayoutRect::ZERO,
            tab_bar_rect: LayoutRect::ZERO,
        }
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn len(&self) -> usize {
        self.panes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.panes.is_empty()
    }

    pub fn panes(&self) -> &[PaneItem<P>] {
        &self.panes
    }

    pub fn pane_ids(&self) -> impl Iterator<Item = PaneId> + '_ {
        self.panes.iter().map(|item| item.id())
    }

    pub fn index_of(&self, id: PaneId) -> Option<usize> {
        self.panes.iter().position(|item| item.id() == id)
    }

    pub fn active_index(&self) -> Option<usize> {
        self.active
    }

    pub fn active_pane(&self) -> Option<&PaneItem<P>> {
        self.active.and_then(|index| self.panes.get(index))
    }

    pub fn active_id(&self) -> Option<PaneId> {
        self.active_pane().map(|item| item.id())
    }

    /// Whole area of the group from the last update.
    pub fn rect(&self) -> LayoutRect {
        self.rect
    }

    pub fn tab_bar_rect(&self) -> LayoutRect {
        self.tab_bar_rect
    }

    /// Area below the tab strip given to the active pane.
    pub fn content_rect(&self) -> LayoutRect {
        LayoutRect::new(
            self.rect.x,
            self.tab_bar_rect.bottom(),
            self.rect.width,
            (self.rect.height - self.tab_bar_rect.height).max(0.0),
        )
    }
}

/// Interior node dividing its rectangle among children along one axis.
#[derive(Debug)]
pub struct SplitNode {
    parent: Option<NodeId>,
    orientation: Orientation,
    children: Vec<NodeId>,
    sizers: Vec<Sizer>,
    handles: Vec<TrackHandle>,
    /// Hints are fractions awaiting scaling by the next update.
    normalized: bool,
    rect: LayoutRect,
}

impl SplitNode {
    fn new(orientation: Orientation) -> Self {
        Self {
            parent: None,
            orientation,
            children: Vec::new(),
            sizers: Vec::new(),
            handles: Vec::new(),
            normalized: false,
            rect: LayoutRect::ZERO,
        }
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn sizers(&self) -> &[Sizer] {
        &self.sizers
    }

    pub fn handles(&self) -> &[TrackHandle] {
        &self.handles
    }

    pub fn is_normalized(&self) -> bool {
        self.normalized
    }

    pub fn rect(&self) -> LayoutRect {
        self.rect
    }

    /// Current child sizes as fractions.
    pub fn relative_sizes(&self) -> Vec<f32> {
        let sizes: Vec<f32> = self.sizers.iter().map(|s| s.size).collect();
        sizing::normalize(&sizes)
    }

    fn child_index(&self, child: NodeId) -> Option<usize> {
        self.children.iter().position(|&c| c == child)
    }

    fn insert_child(&mut self, index: usize, child: NodeId, sizer: Sizer) {
        let index = index.min(self.children.len());
        self.children.insert(index, child);
        self.sizers.insert(index, sizer);
        self.handles.insert(index, TrackHandle::default());
        self.sync_handles();
    }

    fn remove_child(&mut self, index: usize) -> (NodeId, Sizer) {
        let child = self.children.remove(index);
        let sizer = self.sizers.remove(index);
        self.handles.remove(index);
        self.sync_handles();
        (child, sizer)
    }

    /// Only the trailing handle is hidden.
    fn sync_handles(&mut self) {
        let last = self.handles.len().saturating_sub(1);
        for (i, handle) in self.handles.iter_mut().enumerate() {
            handle.hidden = i == last;
        }
    }

    fn hold_sizes(&mut self) {
        self.sizers.iter_mut().for_each(Sizer::hold);
    }

    /// Rewrite the sizes as fractions summing to one.
    fn normalize_sizes(&mut self) {
        if self.sizers.is_empty() {
            return;
        }
        self.hold_sizes();
        let hints: Vec<f32> = self.sizers.iter().map(|s| s.size_hint).collect();
        for (sizer, fraction) in self.sizers.iter_mut().zip(sizing::normalize(&hints)) {
            sizer.size_hint = fraction;
            sizer.size = fraction;
        }
        self.normalized = true;
    }
}

/// A node of the dock tree.
#[derive(Debug)]
pub enum DockNode<P> {
    Tabs(TabGroup<P>),
    Split(SplitNode),
}

impl<P> DockNode<P> {
    pub fn parent(&self) -> Option<NodeId> {
        match self {
            DockNode::Tabs(group) => group.parent,
            DockNode::Split(split) => split.parent,
        }
    }

    fn set_parent(&mut self, parent: Option<NodeId>) {
        match self {
            DockNode::Tabs(group) => group.parent = parent,
            DockNode::Split(split) => split.parent = parent,
        }
    }

    pub fn rect(&self) -> LayoutRect {
        match self {
            DockNode::Tabs(group) => group.rect,
            DockNode::Split(split) => split.rect,
        }
    }

    pub fn as_tabs(&self) -> Option<&TabGroup<P>> {
        match self {
            DockNode::Tabs(group) => Some(group),
            DockNode::Split(_) => None,
        }
    }

    pub fn as_split(&self) -> Option<&SplitNode> {
        match self {
            DockNode::Split(split) => Some(split),
            DockNode::Tabs(_) => None,
        }
    }
}

/// The full arrangement of a dock panel.
#[derive(Debug)]
pub struct DockTree<P> {
    nodes: SparseSet<DockNode<P>>,
    root: Option<NodeId>,
    locations: HashMap<PaneId, NodeId>,
    spacing: f32,
    tab_bar_height: f32,
    insert_behavior: InsertBehavior,
    remove_behavior: RemoveBehavior,
    changes: Vec<VisibilityChange>,
}

impl<P: Pane> Default for DockTree<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: Pane> DockTree<P> {
    pub fn new() -> Self {
        Self::from_settings(&DockSettings::default())
    }

    pub fn from_settings(settings: &DockSettings) -> Self {
        Self {
            nodes: SparseSet::new(),
            root: None,
            locations: HashMap::default(),
            spacing: settings.spacing,
            tab_bar_height: settings.tab_bar_height,
            insert_behavior: settings.insert_behavior,
            remove_behavior: settings.remove_behavior,
            changes: Vec::new(),
        }
    }

    pub fn spacing(&self) -> f32 {
        self.spacing
    }

    pub fn set_spacing(&mut self, spacing: f32) {
        self.spacing = spacing.max(0.0);
    }

    pub fn tab_bar_height(&self) -> f32 {
        self.tab_bar_height
    }

    pub fn set_tab_bar_height(&mut self, height: f32) {
        self.tab_bar_height = height.max(0.0);
    }

    pub fn set_insert_behavior(&mut self, behavior: InsertBehavior) {
        self.insert_behavior = behavior;
    }

    pub fn set_remove_behavior(&mut self, behavior: RemoveBehavior) {
        self.remove_behavior = behavior;
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Number of panes in the tree.
    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn contains(&self, id: PaneId) -> bool {
        self.locations.contains_key(&id)
    }

    pub fn node(&self, id: NodeId) -> Option<&DockNode<P>> {
        self.nodes.try_get(id.0)
    }

    /// Tab group owning `pane`.
    pub fn group_of(&self, pane: PaneId) -> Option<NodeId> {
        self.locations.get(&pane).copied()
    }

    pub fn group(&self, id: NodeId) -> DockResult<&TabGroup<P>> {
        match self.nodes.try_get(id.0) {
            Some(DockNode::Tabs(group)) => Ok(group),
            Some(DockNode::Split(_)) => Err(DockError::NotATabGroup(id)),
            None => Err(DockError::NodeNotFound(id)),
        }
    }

    pub fn item(&self, id: PaneId) -> Option<&PaneItem<P>> {
        let group = self.group(self.group_of(id)?).ok()?;
        group.panes.iter().find(|item| item.id() == id)
    }

    pub fn pane(&self, id: PaneId) -> Option<&P> {
        self.item(id).map(PaneItem::pane)
    }

    pub fn pane_mut(&mut self, id: PaneId) -> Option<&mut P> {
        let group = self.group_of(id)?;
        self.tabs_mut(group)
            .panes
            .iter_mut()
            .find(|item| item.id() == id)
            .map(PaneItem::pane_mut)
    }

    /// Tab groups in depth-first, leading-edge-first order.
    pub fn tab_groups(&self) -> Vec<NodeId> {
        let mut groups = Vec::new();
        if let Some(root) = self.root {
            self.collect_groups(root, &mut groups);
        }
        groups
    }

    fn collect_groups(&self, id: NodeId, out: &mut Vec<NodeId>) {
        match self.nodes.try_get(id.0) {
            Some(DockNode::Tabs(_)) => out.push(id),
            Some(DockNode::Split(split)) => {
                for &child in &split.children {
                    self.collect_groups(child, out);
                }
            }
            None => {}
        }
    }

    /// Every pane id in tree order.
    pub fn pane_ids(&self) -> Vec<PaneId> {
        self.tab_groups()
            .into_iter()
            .filter_map(|group| self.group(group).ok())
            .flat_map(|group| group.pane_ids())
            .collect()
    }

    /// Every pane in tree order.
    pub fn panes(&self) -> impl Iterator<Item = &P> + '_ {
        self.tab_groups()
            .into_iter()
            .filter_map(|group| self.group(group).ok())
            .flat_map(|group| group.panes.iter().map(PaneItem::pane))
    }

    /// Panes currently shown, one per tab group.
    pub fn visible_panes(&self) -> Vec<PaneId> {
        self.tab_groups()
            .into_iter()
            .filter_map(|group| self.group(group).ok()?.active_id())
            .collect()
    }

    pub fn first_tab_group(&self) -> Option<NodeId> {
        let mut current = self.root?;
        loop {
            match self.nodes.try_get(current.0)? {
                DockNode::Tabs(_) => return Some(current),
                DockNode::Split(split) => current = *split.children.first()?,
            }
        }
    }

    /// Visible split handles with their rectangles.
    pub fn handles(&self) -> Vec<(HandleRef, LayoutRect)> {
        self.nodes
            .iter_slots()
            .filter_map(|(slot, node)| match node {
                DockNode::Split(split) => Some((NodeId(slot), split)),
                DockNode::Tabs(_) => None,
            })
            .flat_map(|(id, split)| {
                split
                    .handles
                    .iter()
                    .enumerate()
                    .filter(|(_, handle)| !handle.hidden)
                    .map(move |(index, handle)| (HandleRef { split: id, index }, handle.rect))
            })
            .collect()
    }

    /// Drain the pending shown/hidden notifications.
    pub fn take_visibility_changes(&mut self) -> Vec<VisibilityChange> {
        std::mem::take(&mut self.changes)
    }

    /// Make `id` the active pane of its group.
    pub fn activate_pane(&mut self, id: PaneId) -> DockResult<()> {
        let group = self.group_of(id).ok_or(DockError::PaneNotFound(id))?;
        let index = self.group(group)?.index_of(id).ok_or(DockError::PaneNotFound(id))?;
        self.select(group, index);
        Ok(())
    }

    /// Reorder the tabs of `group`, keeping the active pane active.
    pub fn move_tab(&mut self, group: NodeId, from: usize, to: usize) -> DockResult<()> {
        let len = self.group(group)?.len();
        if from >= len {
            return Err(DockError::InvalidTabIndex { index: from, len });
        }
        if to >= len {
            return Err(DockError::InvalidTabIndex { index: to, len });
        }
        if from == to {
            return Ok(());
        }

        let tabs = self.tabs_mut(group);
        let active = tabs.active_id();
        let item = tabs.panes.remove(from);
        tabs.panes.insert(to, item);
        tabs.active = active.and_then(|id| tabs.index_of(id));
        tracing::debug!(%group, from, to, "tab moved");
        Ok(())
    }

    fn push_node(&mut self, node: DockNode<P>) -> NodeId {
        NodeId(self.nodes.push(node))
    }

    fn set_parent(&mut self, id: NodeId, parent: Option<NodeId>) {
        if let Some(node) = self.nodes.try_get_mut(id.0) {
            node.set_parent(parent);
        }
    }

    fn parent_of(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.try_get(id.0).and_then(DockNode::parent)
    }

    /// Internal accessor for a node known to be a live tab group.
    fn tabs_mut(&mut self, id: NodeId) -> &mut TabGroup<P> {
        match self.nodes.try_get_mut(id.0) {
            Some(DockNode::Tabs(group)) => group,
            _ => unreachable!("{id} is not a live tab group"),
        }
    }

    /// Internal accessor for a node known to be a live split.
    fn split_mut(&mut self, id: NodeId) -> &mut SplitNode {
        match self.nodes.try_get_mut(id.0) {
            Some(DockNode::Split(split)) => split,
            _ => unreachable!("{id} is not a live split"),
        }
    }

    fn is_split_with(&self, id: NodeId, orientation: Orientation) -> bool {
        matches!(
            self.nodes.try_get(id.0),
            Some(DockNode::Split(split)) if split.orientation == orientation
        )
    }

    fn create_group(&mut self, item: PaneItem<P>) -> NodeId {
        let pane = item.id();
        let group = self.push_node(DockNode::Tabs(TabGroup::new(item)));
        self.locations.insert(pane, group);
        self.changes.push(VisibilityChange::Shown(pane));
        group
    }

    /// Activate tab `index` of `group`, recording the previous tab.
    fn select(&mut self, group: NodeId, index: usize) {
        let tabs = self.tabs_mut(group);
        if tabs.active == Some(index) || index >= tabs.panes.len() {
            return;
        }
        let old = tabs.active_id();
        tabs.previous = old;
        tabs.active = Some(index);
        let new = tabs.panes[index].id();
        if let Some(old) = old {
            self.changes.push(VisibilityChange::Hidden(old));
        }
        self.changes.push(VisibilityChange::Shown(new));
    }

    fn insert_into_group(&mut self, group: NodeId, index: usize, item: PaneItem<P>) {
        let pane = item.id();
        let behavior = self.insert_behavior;
        let tabs = self.tabs_mut(group);
        let index = index.min(tabs.panes.len());
        tabs.panes.insert(index, item);

        match tabs.active {
            Some(active) if active >= index => tabs.active = Some(active + 1),
            _ => {}
        }
        self.locations.insert(pane, group);

        let needs_active = self.tabs_mut(group).active.is_none();
        if needs_active || behavior == InsertBehavior::SelectTab {
            self.select(group, index);
        }
        tracing::trace!(%group, %pane, index, "tab inserted");
    }

    /// Take tab `index` out of `group`, choosing a successor per the remove
    /// behavior. The group may be left empty.
    fn take_from_group(&mut self, group: NodeId, index: usize) -> PaneItem<P> {
        let behavior = self.remove_behavior;
        let tabs = self.tabs_mut(group);
        let mut item = tabs.panes.remove(index);
        let pane = item.id();
        if tabs.previous == Some(pane) {
            tabs.previous = None;
        }

        let mut successor = None;
        match tabs.active {
            Some(active) if active == index => {
                tabs.active = None;
                if !tabs.panes.is_empty() {
                    let last = tabs.panes.len() - 1;
                    let after = index.min(last);
                    successor = Some(match behavior {
                        RemoveBehavior::SelectTabAfter => after,
                        RemoveBehavior::SelectTabBefore => index.saturating_sub(1),
                        RemoveBehavior::SelectPreviousTab => tabs
                            .previous
                            .and_then(|previous| tabs.index_of(previous))
                            .unwrap_or(after),
                    });
                }
                tabs.previous = None;
                self.changes.push(VisibilityChange::Hidden(pane));
            }
            Some(active) if active > index => tabs.active = Some(active - 1),
            _ => {}
        }

        if let Some(next) = successor {
            let tabs = self.tabs_mut(group);
            tabs.active = Some(next);
            let shown = tabs.panes[next].id();
            self.changes.push(VisibilityChange::Shown(shown));
        }

        self.locations.remove(&pane);
        item.reset_geometry();
        item
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::types::SizeLimits;

    #[derive(Debug)]
    pub(crate) struct Leaf {
        pub id: PaneId,
        pub limits: SizeLimits,
        pub rect: Option<LayoutRect>,
    }

    impl Leaf {
        pub fn new(key: &str) -> Self {
            Self {
                id: PaneId::new(key),
                limits: SizeLimits::UNBOUNDED,
                rect: None,
            }
        }
    }

    impl Pane for Leaf {
        fn id(&self) -> PaneId {
            self.id
        }

        fn size_limits(&self) -> SizeLimits {
            self.limits
        }

        fn set_geometry(&mut self, rect: LayoutRect) {
            self.rect = Some(rect);
        }

        fn notify_resized(&mut self, _width: f32, _height: f32) {}
    }

    pub(crate) fn id(key: &str) -> PaneId {
        PaneId::new(key)
    }

    #[test]
    fn test_first_insert_becomes_root_group() {
        let mut tree = DockTree::new();
        tree.insert_pane(Leaf::new("a"), None, InsertMode::TabAfter).unwrap();
        let root = tree.root().unwrap();
        assert_eq!(tree.group(root).unwrap().len(), 1);
        assert_eq!(tree.group_of(id("a")), Some(root));
        assert_eq!(
            tree.take_visibility_changes(),
            vec![VisibilityChange::Shown(id("a"))]
        );
    }

    #[test]
    fn test_activate_pane_emits_changes() {
        let mut tree = DockTree::new();
        tree.insert_pane(Leaf::new("a"), None, InsertMode::TabAfter).unwrap();
        tree.insert_pane(Leaf::new("b"), Some(id("a")), InsertMode::TabAfter).unwrap();
        tree.take_visibility_changes();

        tree.activate_pane(id("b")).unwrap();
        assert_eq!(
            tree.take_visibility_changes(),
            vec![
                VisibilityChange::Hidden(id("a")),
                VisibilityChange::Shown(id("b"))
            ]
        );
        assert!(tree.activate_pane(id("zzz")).is_err());
    }

    #[test]
    fn test_move_tab_keeps_active_pane() {
        let mut tree = DockTree::new();
        tree.insert_pane(Leaf::new("a"), None, InsertMode::TabAfter).unwrap();
        tree.insert_pane(Leaf::new("b"), Some(id("a")), InsertMode::TabAfter).unwrap();
        tree.insert_pane(Leaf::new("c"), Some(id("b")), InsertMode::TabAfter).unwrap();
        let group = tree.root().unwrap();
        tree.activate_pane(id("b")).unwrap();
        tree.move_tab(group, 2, 0).unwrap();

        let tabs = tree.group(group).unwrap();
        assert_eq!(tabs.pane_ids().collect::<Vec<_>>(), vec![id("c"), id("a"), id("b")]);
        assert_eq!(tabs.active_id(), Some(id("b")));
        assert_eq!(
            tree.move_tab(group, 5, 0),
            Err(DockError::InvalidTabIndex { index: 5, len: 3 })
        );
    }

    #[test]
    fn test_group_rejects_split_nodes() {
        let mut tree = DockTree::new();
        tree.insert_pane(Leaf::new("a"), None, InsertMode::TabAfter).unwrap();
        tree.insert_pane(Leaf::new("b"), None, InsertMode::SplitRight).unwrap();
        let root = tree.root().unwrap();
        assert_eq!(tree.group(root).err(), Some(DockError::NotATabGroup(root)));
    }
}
