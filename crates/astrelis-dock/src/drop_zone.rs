//! Drop target classification for panes dragged over a dock panel.

use astrelis_core::math::Vec2;

use crate::settings::{DockMode, EdgeThresholds};
use crate::tree::{InsertMode, NodeId, TabAreaHit};
use crate::types::LayoutRect;

/// Share of the panel kept by existing content when previewing a root-edge drop.
const ROOT_KEEP_RATIO: f32 = 0.618;

/// Region a dragged pane would land in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DropZone {
    Invalid,
    /// Empty panel: the pane becomes the whole layout.
    RootAll,
    RootTop,
    RootLeft,
    RootRight,
    RootBottom,
    /// Tab into the target group.
    WidgetAll,
    WidgetTop,
    WidgetLeft,
    WidgetRight,
    WidgetBottom,
    /// Over the target group's tab strip.
    WidgetTab,
}

impl DropZone {
    pub fn is_valid(&self) -> bool {
        !matches!(self, DropZone::Invalid)
    }

    pub fn is_root(&self) -> bool {
        matches!(
            self,
            DropZone::RootAll
                | DropZone::RootTop
                | DropZone::RootLeft
                | DropZone::RootRight
                | DropZone::RootBottom
        )
    }

    /// How a pane dropped here is inserted, if at all.
    pub fn insert_mode(&self) -> Option<InsertMode> {
        match self {
            DropZone::Invalid => None,
            DropZone::RootAll | DropZone::WidgetAll | DropZone::WidgetTab => Some(InsertMode::TabAfter),
            DropZone::RootTop | DropZone::WidgetTop => Some(InsertMode::SplitTop),
            DropZone::RootLeft | DropZone::WidgetLeft => Some(InsertMode::SplitLeft),
            DropZone::RootRight | DropZone::WidgetRight => Some(InsertMode::SplitRight),
            DropZone::RootBottom | DropZone::WidgetBottom => Some(InsertMode::SplitBottom),
        }
    }
}

/// Classified drop location with its preview rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DropTarget {
    pub zone: DropZone,
    /// Tab group under the pointer for `Widget*` zones.
    pub group: Option<NodeId>,
    /// Preview overlay; `None` for [`DropZone::Invalid`].
    pub overlay: Option<LayoutRect>,
}

impl DropTarget {
    pub const INVALID: Self = Self {
        zone: DropZone::Invalid,
        group: None,
        overlay: None,
    };
}

/// Maps a pointer position to a [`DropZone`].
#[derive(Debug, Clone, Default)]
pub struct DropZoneClassifier {
    pub edges: EdgeThresholds,
    pub mode: DockMode,
}

impl DropZoneClassifier {
    pub fn new(edges: EdgeThresholds, mode: DockMode) -> Self {
        Self { edges, mode }
    }

    /// Classify `point` over a panel occupying `panel`.
    ///
    /// `hit` is the tab group under the point, if any.
    pub fn classify(
        &self,
        point: Vec2,
        panel: LayoutRect,
        tree_is_empty: bool,
        hit: Option<TabAreaHit>,
    ) -> DropZone {
        if !panel.contains(point) {
            return DropZone::Invalid;
        }
        if tree_is_empty {
            return DropZone::RootAll;
        }

        if self.mode == DockMode::MultipleDocument {
            if let Some(zone) = self.root_edge(point, panel) {
                return zone;
            }
        }

        let Some(hit) = hit else {
            return DropZone::Invalid;
        };
        if self.mode == DockMode::SingleDocument {
            return DropZone::WidgetAll;
        }

        let target = hit.rect;
        let left = point.x - target.x + 1.0;
        let top = point.y - target.y + 1.0;
        let right = target.right() - point.x;
        let bottom = target.bottom() - point.y;

        if top < hit.tab_bar_height {
            return DropZone::WidgetTab;
        }

        let band_x = (target.width / 3.0).round().max(1.0);
        let band_y = (target.height / 3.0).round().max(1.0);
        if left > band_x && right > band_x && top > band_y && bottom > band_y {
            return DropZone::WidgetAll;
        }

        let left = left / band_x;
        let top = top / band_y;
        let right = right / band_x;
        let bottom = bottom / band_y;
        let nearest = left.min(top).min(right).min(bottom);

        if nearest == left {
            DropZone::WidgetLeft
        } else if nearest == top {
            DropZone::WidgetTop
        } else if nearest == right {
            DropZone::WidgetRight
        } else {
            DropZone::WidgetBottom
        }
    }

    /// Root zone for a point near a panel edge. Only the nearest edge is
    /// considered; ties resolve top, right, bottom, left.
    fn root_edge(&self, point: Vec2, panel: LayoutRect) -> Option<DropZone> {
        let left = point.x - panel.x + 1.0;
        let top = point.y - panel.y + 1.0;
        let right = panel.right() - point.x;
        let bottom = panel.bottom() - point.y;
        let nearest = left.min(top).min(right).min(bottom);

        if nearest == top {
            (top < self.edges.top).then_some(DropZone::RootTop)
        } else if nearest == right {
            (right < self.edges.right).then_some(DropZone::RootRight)
        } else if nearest == bottom {
            (bottom < self.edges.bottom).then_some(DropZone::RootBottom)
        } else {
            (left < self.edges.left).then_some(DropZone::RootLeft)
        }
    }

    /// Full classification including the preview overlay.
    pub fn target(
        &self,
        point: Vec2,
        panel: LayoutRect,
        tree_is_empty: bool,
        hit: Option<TabAreaHit>,
    ) -> DropTarget {
        let zone = self.classify(point, panel, tree_is_empty, hit);
        DropTarget {
            zone,
            group: if zone.is_root() { None } else { hit.map(|hit| hit.group) },
            overlay: overlay_rect(zone, panel, hit),
        }
    }
}

/// Preview rectangle for a classified zone.
pub fn overlay_rect(zone: DropZone, panel: LayoutRect, hit: Option<TabAreaHit>) -> Option<LayoutRect> {
    let root_share = 1.0 - ROOT_KEEP_RATIO;
    let p = panel;
    match zone {
        DropZone::Invalid => None,
        DropZone::RootAll => Some(p),
        DropZone::RootTop => Some(LayoutRect::new(p.x, p.y, p.width, p.height * root_share)),
        DropZone::RootLeft => Some(LayoutRect::new(p.x, p.y, p.width * root_share, p.height)),
        DropZone::RootRight => {
            let width = p.width * root_share;
            Some(LayoutRect::new(p.right() - width, p.y, width, p.height))
        }
        DropZone::RootBottom => {
            let height = p.height * root_share;
            Some(LayoutRect::new(p.x, p.bottom() - height, p.width, height))
        }
        _ => {
            let t = hit?.rect;
            Some(match zone {
                DropZone::WidgetTop => LayoutRect::new(t.x, t.y, t.width, t.height / 2.0),
                DropZone::WidgetLeft => LayoutRect::new(t.x, t.y, t.width / 2.0, t.height),
                DropZone::WidgetRight => {
                    LayoutRect::new(t.x + t.width / 2.0, t.y, t.width / 2.0, t.height)
                }
                DropZone::WidgetBottom => {
                    LayoutRect::new(t.x, t.y + t.height / 2.0, t.width, t.height / 2.0)
                }
                _ => t,
            })
        }
    }
}
