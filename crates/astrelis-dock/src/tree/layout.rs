use astrelis_core::math::Vec2;
use astrelis_core::profiling::profile_function;

use super::{CONTENT, DockNode, DockTree, HandleRef, NodeId, TAB_BAR};
use crate::error::{DockError, DockResult};
use crate::pane::Pane;
use crate::sizing;
use crate::types::{LayoutRect, Orientation, SizeLimits};

/// Tab group found under a point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TabAreaHit {
    pub group: NodeId,
    /// Screen rectangle of the whole group.
    pub rect: LayoutRect,
    /// Height of the group's tab strip.
    pub tab_bar_height: f32,
}

impl<P: Pane> DockTree<P> {
    /// Refresh cached limits bottom-up and return the limits of the whole tree.
    pub fn fit(&mut self) -> SizeLimits {
        profile_function!();
        match self.root {
            Some(root) => self.fit_node(root),
            None => SizeLimits::COLLAPSED,
        }
    }

    fn fit_node(&mut self, id: NodeId) -> SizeLimits {
        let children = match self.nodes.try_get(id.0) {
            Some(DockNode::Split(split)) => split.children.clone(),
            Some(DockNode::Tabs(_)) => return self.fit_group(id),
            None => return SizeLimits::COLLAPSED,
        };

        let limits: Vec<SizeLimits> = children.iter().map(|&child| self.fit_node(child)).collect();
        let spacing = self.spacing;
        let split = self.split_mut(id);
        let horizontal = split.orientation.is_horizontal();
        let fixed = spacing * split.children.len().saturating_sub(1) as f32;

        let mut min_along = fixed;
        let mut max_along = fixed;
        let mut min_across: f32 = 0.0;
        let mut max_across = f32::INFINITY;
        for (sizer, child) in split.sizers.iter_mut().zip(&limits) {
            let (min, max) = child.along(split.orientation);
            let (cross_min, cross_max) = child.across(split.orientation);
            sizer.min_size = min;
            sizer.max_size = max;
            min_along += min;
            max_along += max;
            min_across = min_across.max(cross_min);
            max_across = max_across.min(cross_max);
        }

        if horizontal {
            SizeLimits::min_max(min_along, max_along, min_across, max_across)
        } else {
            SizeLimits::min_max(min_across, max_across, min_along, max_along)
        }
    }

    fn fit_group(&mut self, id: NodeId) -> SizeLimits {
        let tab_bar_height = self.tab_bar_height;
        let group = self.tabs_mut(id);
        let content = match group.active {
            Some(index) => {
                let item = &mut group.panes[index];
                item.fit();
                item.limits()
            }
            None => SizeLimits::UNBOUNDED,
        };

        let tab_bar = &mut group.sizers[TAB_BAR];
        tab_bar.min_size = tab_bar_height;
        tab_bar.max_size = tab_bar_height;
        let body = &mut group.sizers[CONTENT];
        body.min_size = content.min_height;
        body.max_size = content.max_height;

        SizeLimits::min_max(
            content.min_width,
            content.max_width,
            tab_bar_height + content.min_height,
            tab_bar_height + content.max_height,
        )
    }

    /// Lay the tree out inside `rect`.
    pub fn update(&mut self, rect: LayoutRect) {
        profile_function!();
        if let Some(root) = self.root {
            self.update_node(root, rect);
        }
    }

    fn update_node(&mut self, id: NodeId, rect: LayoutRect) {
        let spacing = self.spacing;
        let split = match self.nodes.try_get_mut(id.0) {
            Some(DockNode::Split(split)) => split,
            Some(DockNode::Tabs(_)) => return self.update_group(id, rect),
            None => return,
        };

        split.rect = rect;
        if split.children.is_empty() {
            return;
        }

        let horizontal = split.orientation.is_horizontal();
        let fixed = spacing * (split.children.len() - 1) as f32;
        let space = (rect.extent(split.orientation) - fixed).max(0.0);

        if split.normalized {
            for sizer in &mut split.sizers {
                sizer.size_hint *= space;
            }
            split.normalized = false;
        }
        sizing::calc(&mut split.sizers, space);

        let mut placements = Vec::with_capacity(split.children.len());
        let mut cursor = if horizontal { rect.x } else { rect.y };
        for ((&child, sizer), handle) in split
            .children
            .iter()
            .zip(&split.sizers)
            .zip(split.handles.iter_mut())
        {
            let size = sizer.size;
            if horizontal {
                placements.push((child, LayoutRect::new(cursor, rect.y, size, rect.height)));
                cursor += size;
                handle.rect = LayoutRect::new(cursor, rect.y, spacing, rect.height);
            } else {
                placements.push((child, LayoutRect::new(rect.x, cursor, rect.width, size)));
                cursor += size;
                handle.rect = LayoutRect::new(rect.x, cursor, rect.width, spacing);
            }
            cursor += spacing;
        }

        for (child, child_rect) in placements {
            self.update_node(child, child_rect);
        }
    }

    fn update_group(&mut self, id: NodeId, rect: LayoutRect) {
        let group = self.tabs_mut(id);
        group.rect = rect;
        sizing::calc(&mut group.sizers, rect.height);
        let tab_bar = group.sizers[TAB_BAR].size;
        let body = group.sizers[CONTENT].size;
        group.tab_bar_rect = LayoutRect::new(rect.x, rect.y, rect.width, tab_bar);

        if let Some(index) = group.active {
            group.panes[index].update(rect.x, rect.y + tab_bar, rect.width, body);
        }
    }

    /// Innermost tab group whose rectangle contains `point`.
    pub fn hit_test_tab_areas(&self, point: Vec2) -> Option<TabAreaHit> {
        self.tab_groups().into_iter().find_map(|id| {
            let group = self.group(id).ok()?;
            group.rect.contains(point).then(|| TabAreaHit {
                group: id,
                rect: group.rect,
                tab_bar_height: group.tab_bar_rect.height,
            })
        })
    }

    /// Visible split handle under `point`.
    pub fn handle_at(&self, point: Vec2) -> Option<HandleRef> {
        self.handles()
            .into_iter()
            .find(|(_, rect)| rect.contains(point))
            .map(|(handle, _)| handle)
    }

    pub fn handle_rect(&self, handle: HandleRef) -> DockResult<LayoutRect> {
        let split = self
            .node(handle.split)
            .and_then(DockNode::as_split)
            .ok_or(DockError::NodeNotFound(handle.split))?;
        split
            .handles
            .get(handle.index)
            .map(|h| h.rect)
            .ok_or(DockError::HandleNotFound {
                split: handle.split,
                index: handle.index,
            })
    }

    /// Drag a split handle so its leading edge lands at `position` along the
    /// split axis.
    ///
    /// Returns the delta actually applied. Sizes take effect on the next
    /// [`update`](Self::update).
    pub fn move_handle(&mut self, handle: HandleRef, position: f32) -> DockResult<f32> {
        let Some(DockNode::Split(split)) = self.nodes.try_get_mut(handle.split.0) else {
            return Err(DockError::NodeNotFound(handle.split));
        };
        let Some(current) = split.handles.get(handle.index) else {
            return Err(DockError::HandleNotFound {
                split: handle.split,
                index: handle.index,
            });
        };
        if current.hidden {
            return Ok(0.0);
        }

        let origin = match split.orientation {
            Orientation::Horizontal => current.rect.x,
            Orientation::Vertical => current.rect.y,
        };
        let delta = position - origin;
        if delta == 0.0 {
            return Ok(0.0);
        }

        split.hold_sizes();
        let applied = sizing::adjust(&mut split.sizers, handle.index, delta);
        tracing::trace!(split = %handle.split, index = handle.index, delta, applied, "handle moved");
        Ok(applied)
    }
}
