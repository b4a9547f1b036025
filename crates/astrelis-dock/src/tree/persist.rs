use astrelis_core::alloc::{HashMap, HashSet};
use tracing::{debug, warn};

use super::{DockNode, DockTree, NodeId, SplitNode, TabGroup, VisibilityChange};
use crate::config::{AreaConfig, LayoutConfig, SplitAreaConfig, TabAreaConfig};
use crate::pane::{Pane, PaneId, PaneItem};
use crate::sizing::{self, Sizer};
use crate::types::LayoutRect;

impl<P: Pane> DockTree<P> {
    /// Snapshot the arrangement. Split sizes are written as fractions.
    pub fn serialize(&self) -> LayoutConfig {
        LayoutConfig {
            main: self.root.and_then(|root| self.area_config(root)),
        }
    }

    fn area_config(&self, id: NodeId) -> Option<AreaConfig> {
        match self.node(id)? {
            DockNode::Tabs(group) => Some(AreaConfig::TabArea(TabAreaConfig {
                widgets: group.pane_ids().collect(),
                current_index: group.active.unwrap_or(0) as i64,
            })),
            DockNode::Split(split) => Some(AreaConfig::SplitArea(SplitAreaConfig {
                orientation: split.orientation,
                children: split
                    .children
                    .iter()
                    .filter_map(|&child| self.area_config(child))
                    .collect(),
                sizes: split.relative_sizes(),
            })),
        }
    }

    /// Rebuild the arrangement of the current panes from `config`.
    ///
    /// Restoration is lenient: ids not in the tree are skipped, a pane listed
    /// twice keeps its first position, tab indices count within the surviving
    /// tabs and become 0 when out of range,
    /// empty areas vanish, single-child splits collapse and nested splits of
    /// the same orientation are flattened. Panes the config does not mention
    /// are removed from the tree and returned in their previous order.
    pub fn restore(&mut self, config: &LayoutConfig) -> Vec<P> {
        let order = self.pane_ids();
        let before: HashSet<PaneId> = self.visible_panes().into_iter().collect();

        let mut pool: HashMap<PaneId, PaneItem<P>> = HashMap::default();
        for node in self.nodes.drain() {
            if let DockNode::Tabs(group) = node {
                for mut item in group.panes {
                    item.reset_geometry();
                    pool.insert(item.id(), item);
                }
            }
        }
        self.root = None;
        self.locations.clear();

        let known: HashSet<PaneId> = pool.keys().copied().collect();
        let unknown = config.pane_ids().iter().filter(|id| !known.contains(*id)).count();
        if unknown > 0 {
            warn!(unknown, "layout references panes that are not in the tree");
        }

        let mut seen = HashSet::default();
        let main = config
            .main
            .as_ref()
            .and_then(|area| normalize_area(area, &known, &mut seen));
        if let Some(main) = main {
            self.root = Some(self.realize(main, None, &mut pool));
        }

        let after = self.visible_panes();
        for id in &order {
            if before.contains(id) && !after.contains(id) {
                self.changes.push(VisibilityChange::Hidden(*id));
            }
        }
        for id in &after {
            if !before.contains(id) {
                self.changes.push(VisibilityChange::Shown(*id));
            }
        }

        let detached: Vec<P> = order
            .iter()
            .filter_map(|id| pool.remove(id))
            .map(PaneItem::into_pane)
            .collect();
        debug!(panes = self.len(), detached = detached.len(), "layout restored");
        detached
    }

    fn realize(
        &mut self,
        area: AreaConfig,
        parent: Option<NodeId>,
        pool: &mut HashMap<PaneId, PaneItem<P>>,
    ) -> NodeId {
        match area {
            AreaConfig::TabArea(tabs) => {
                let panes: Vec<PaneItem<P>> =
                    tabs.widgets.iter().filter_map(|id| pool.remove(id)).collect();
                let active = usize::try_from(tabs.current_index).unwrap_or(0);
                let active = (!panes.is_empty()).then(|| active.min(panes.len() - 1));
                let ids: Vec<PaneId> = panes.iter().map(PaneItem::id).collect();

                let group = self.push_node(DockNode::Tabs(TabGroup {
                    parent,
                    panes,
                    active,
                    previous: None,
                    sizers: [Sizer::default(), Sizer::default()],
                    rect: LayoutRect::ZERO,
                    tab_bar_rect: LayoutRect::ZERO,
                }));
                for id in ids {
                    self.locations.insert(id, group);
                }
                group
            }
            AreaConfig::SplitArea(split) => {
                let mut node = SplitNode::new(split.orientation);
                node.parent = parent;
                node.normalized = true;
                let id = self.push_node(DockNode::Split(node));

                let shares = sizing::normalize(&split.sizes);
                for (child, share) in split.children.into_iter().zip(shares) {
                    let child = self.realize(child, Some(id), pool);
                    let node = self.split_mut(id);
                    node.insert_child(node.children.len(), child, Sizer::new(share));
                }
                id
            }
        }
    }
}

/// Bring a config area into the shape the tree can realize directly.
fn normalize_area(
    area: &AreaConfig,
    known: &HashSet<PaneId>,
    seen: &mut HashSet<PaneId>,
) -> Option<AreaConfig> {
    match area {
        AreaConfig::TabArea(tabs) => {
            let widgets: Vec<PaneId> = tabs
                .widgets
                .iter()
                .copied()
                .filter(|id| known.contains(id) && seen.insert(*id))
                .collect();
            if widgets.is_empty() {
                return None;
            }
            // the index addresses the filtered list
            let current_index = usize::try_from(tabs.current_index)
                .ok()
                .filter(|&index| index < widgets.len())
                .unwrap_or(0);
            Some(AreaConfig::TabArea(TabAreaConfig {
                widgets,
                current_index: current_index as i64,
            }))
        }
        AreaConfig::SplitArea(split) => {
            let mut children = Vec::with_capacity(split.children.len());
            let mut sizes = Vec::with_capacity(split.children.len());

            for (index, child) in split.children.iter().enumerate() {
                let share = split.sizes.get(index).copied().unwrap_or(0.0).abs();
                match normalize_area(child, known, seen) {
                    None => {}
                    Some(AreaConfig::SplitArea(nested)) if nested.orientation == split.orientation => {
                        let fractions = sizing::normalize(&nested.sizes);
                        for (grandchild, fraction) in nested.children.into_iter().zip(fractions) {
                            children.push(grandchild);
                            sizes.push(fraction * share);
                        }
                    }
                    Some(other) => {
                        children.push(other);
                        sizes.push(share);
                    }
                }
            }

            match children.len() {
                0 => None,
                1 => children.pop(),
                _ => Some(AreaConfig::SplitArea(SplitAreaConfig {
                    orientation: split.orientation,
                    children,
                    sizes,
                })),
            }
        }
    }
}
