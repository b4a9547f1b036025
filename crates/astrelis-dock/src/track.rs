//! Single-axis arrangement of panes separated by draggable handles.

use serde::{Deserialize, Serialize};

use astrelis_core::profiling::profile_function;

use crate::pane::{Pane, PaneId, PaneItem};
use crate::sizing::{self, Sizer};
use crate::types::{LayoutRect, Orientation, SizeLimits};

/// Default handle thickness in pixels.
pub const DEFAULT_SPACING: f32 = 4.0;

/// Where leftover space goes when every item is at its maximum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackAlignment {
    /// Leftover stays at the end.
    #[default]
    Start,
    /// Leftover is split before and after the items.
    Center,
    /// Leftover goes before the items.
    End,
    /// Leftover is shared out as extra size per item.
    Justify,
}

/// Geometry of one handle between two items.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TrackHandle {
    pub rect: LayoutRect,
    /// Handles after hidden items, and the trailing handle, are hidden.
    pub hidden: bool,
}

/// A linear arrangement of panes sized by the [`sizing`] engine.
///
/// Every item owns one sizer and one handle; the handle after the last visible
/// item is hidden.
#[derive(Debug)]
pub struct SplitTrack<P> {
    orientation: Orientation,
    spacing: f32,
    alignment: TrackAlignment,
    lead_offset: f32,
    items: Vec<PaneItem<P>>,
    sizers: Vec<Sizer>,
    handles: Vec<TrackHandle>,
    fixed: f32,
    normalized: bool,
    limits: SizeLimits,
}

impl<P: Pane> SplitTrack<P> {
    pub fn new(orientation: Orientation) -> Self {
        Self {
            orientation,
            spacing: DEFAULT_SPACING,
            alignment: TrackAlignment::default(),
            lead_offset: 0.0,
            items: Vec::new(),
            sizers: Vec::new(),
            handles: Vec::new(),
            fixed: 0.0,
            normalized: false,
            limits: SizeLimits::UNBOUNDED,
        }
    }

    /// Create a left-to-right track.
    pub fn horizontal() -> Self {
        Self::new(Orientation::Horizontal)
    }

    /// Create a top-to-bottom track.
    pub fn vertical() -> Self {
        Self::new(Orientation::Vertical)
    }

    /// Set the handle thickness.
    pub fn with_spacing(mut self, spacing: f32) -> Self {
        self.spacing = spacing.max(0.0);
        self
    }

    pub fn with_alignment(mut self, alignment: TrackAlignment) -> Self {
        self.alignment = alignment;
        self
    }

    /// Reserve a fixed lead-in before every item (e.g. a title strip).
    pub fn with_lead_offset(mut self, offset: f32) -> Self {
        self.lead_offset = offset.max(0.0);
        self
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn set_orientation(&mut self, orientation: Orientation) {
        self.orientation = orientation;
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[PaneItem<P>] {
        &self.items
    }

    pub fn sizers(&self) -> &[Sizer] {
        &self.sizers
    }

    pub fn handles(&self) -> &[TrackHandle] {
        &self.handles
    }

    /// Rectangles of the visible handles, for rendering.
    pub fn handle_rects(&self) -> impl Iterator<Item = LayoutRect> + '_ {
        self.handles.iter().filter(|h| !h.hidden).map(|h| h.rect)
    }

    /// Limits computed by the last [`fit`](Self::fit).
    pub fn limits(&self) -> SizeLimits {
        self.limits
    }

    pub fn index_of(&self, id: PaneId) -> Option<usize> {
        self.items.iter().position(|item| item.id() == id)
    }

    /// Insert a pane at `index` (clamped to the end).
    pub fn insert_pane(&mut self, index: usize, pane: P) {
        let index = index.min(self.items.len());
        self.items.insert(index, PaneItem::new(pane));
        self.sizers.insert(index, Sizer::default());
        self.handles.insert(index, TrackHandle::default());
    }

    pub fn add_pane(&mut self, pane: P) {
        self.insert_pane(self.items.len(), pane);
    }

    pub fn remove_pane(&mut self, id: PaneId) -> Option<P> {
        let index = self.index_of(id)?;
        self.sizers.remove(index);
        self.handles.remove(index);
        Some(self.items.remove(index).into_pane())
    }

    /// Current sizes as fractions of the occupied length.
    pub fn relative_sizes(&self) -> Vec<f32> {
        let sizes: Vec<f32> = self.sizers.iter().map(|s| s.size).collect();
        sizing::normalize(&sizes)
    }

    /// Replace the sizes with fractions; missing entries count as zero.
    ///
    /// The fractions are scaled by the available length on the next update.
    pub fn set_relative_sizes(&mut self, sizes: &[f32]) {
        let n = self.sizers.len();
        let mut padded: Vec<f32> = sizes.iter().copied().take(n).collect();
        padded.resize(n, 0.0);
        for (sizer, fraction) in self.sizers.iter_mut().zip(sizing::normalize(&padded)) {
            sizer.size_hint = fraction;
            sizer.size = fraction;
        }
        self.normalized = true;
    }

    /// Drag handle `index` so its leading edge lands at `position`.
    ///
    /// Returns the delta actually applied; hidden handles are ignored. The new
    /// sizes take effect on the next [`update`](Self::update).
    pub fn move_handle(&mut self, index: usize, position: f32) -> f32 {
        let Some(handle) = self.handles.get(index) else {
            return 0.0;
        };
        if handle.hidden {
            return 0.0;
        }
        let delta = position - self.orientation.main(handle.rect.position());
        if delta == 0.0 {
            return 0.0;
        }
        sizing::adjust(&mut self.sizers, index, delta)
    }

    /// Refresh item limits and aggregate the track's own size limits.
    pub fn fit(&mut self) -> SizeLimits {
        profile_function!();

        let mut visible = 0usize;
        let mut last_visible = None;
        for (i, (item, handle)) in self.items.iter().zip(self.handles.iter_mut()).enumerate() {
            handle.hidden = item.is_hidden();
            if !handle.hidden {
                last_visible = Some(i);
                visible += 1;
            }
        }
        if let Some(last) = last_visible {
            self.handles[last].hidden = true;
        }

        self.fixed =
            self.spacing * visible.saturating_sub(1) as f32 + self.lead_offset * visible as f32;

        let mut min_along = self.fixed;
        let mut max_along = self.fixed;
        let mut min_across: f32 = 0.0;
        let mut max_across = f32::INFINITY;

        for (item, sizer) in self.items.iter_mut().zip(self.sizers.iter_mut()) {
            if sizer.size > 0.0 {
                sizer.hold();
            }
            if item.is_hidden() {
                sizer.min_size = 0.0;
                sizer.max_size = 0.0;
                continue;
            }
            item.fit();
            sizer.stretch = item.pane().stretch().max(0.0);

            let (min, max) = item.limits().along(self.orientation);
            let (cross_min, cross_max) = item.limits().across(self.orientation);
            sizer.min_size = min;
            sizer.max_size = max;
            min_along += min;
            max_along += max;
            min_across = min_across.max(cross_min);
            max_across = max_across.min(cross_max);
        }

        max_across = max_across.max(min_across);
        self.limits = match self.orientation {
            Orientation::Horizontal => SizeLimits {
                min_width: min_along,
                max_width: max_along,
                min_height: min_across,
                max_height: max_across,
            },
            Orientation::Vertical => SizeLimits {
                min_width: min_across,
                max_width: max_across,
                min_height: min_along,
                max_height: max_along,
            },
        };
        self.limits
    }

    /// Lay the items out inside `rect`, interleaving handles.
    pub fn update(&mut self, rect: LayoutRect) {
        profile_function!();

        let visible = self.items.iter().filter(|item| !item.is_hidden()).count();
        if visible == 0 {
            return;
        }

        let horizontal = self.orientation.is_horizontal();
        let space = (rect.extent(self.orientation) - self.fixed).max(0.0);

        if self.normalized {
            for sizer in &mut self.sizers {
                sizer.size_hint *= space;
            }
            self.normalized = false;
        }

        let leftover = sizing::calc(&mut self.sizers, space);

        let mut extra = 0.0;
        let mut offset = 0.0;
        if leftover > 0.0 {
            match self.alignment {
                TrackAlignment::Start => {}
                TrackAlignment::Center => offset = leftover / 2.0,
                TrackAlignment::End => offset = leftover,
                TrackAlignment::Justify => extra = leftover / visible as f32,
            }
        }

        let mut cursor = if horizontal { rect.x } else { rect.y };
        for ((item, sizer), handle) in self
            .items
            .iter_mut()
            .zip(self.sizers.iter())
            .zip(self.handles.iter_mut())
        {
            if item.is_hidden() {
                continue;
            }
            cursor += self.lead_offset;
            let size = sizer.size + extra;
            if horizontal {
                item.update(cursor + offset, rect.y, size, rect.height);
                cursor += size;
                handle.rect = LayoutRect::new(cursor + offset, rect.y, self.spacing, rect.height);
            } else {
                item.update(rect.x, cursor + offset, rect.width, size);
                cursor += size;
                handle.rect = LayoutRect::new(rect.x, cursor + offset, rect.width, self.spacing);
            }
            cursor += self.spacing;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Column {
        id: PaneId,
        limits: SizeLimits,
        hidden: bool,
        rect: LayoutRect,
    }

    impl Column {
        fn new(key: &str) -> Self {
            Self {
                id: PaneId::new(key),
                limits: SizeLimits::UNBOUNDED,
                hidden: false,
                rect: LayoutRect::ZERO,
            }
        }
    }

    impl Pane for Column {
        fn id(&self) -> PaneId {
            self.id
        }

        fn size_limits(&self) -> SizeLimits {
            self.limits
        }

        fn is_hidden(&self) -> bool {
            self.hidden
        }

        fn set_geometry(&mut self, rect: LayoutRect) {
            self.rect = rect;
        }

        fn notify_resized(&mut self, _width: f32, _height: f32) {}
    }

    fn track(keys: &[&str]) -> SplitTrack<Column> {
        let mut track = SplitTrack::horizontal().with_spacing(4.0);
        for key in keys {
            track.add_pane(Column::new(key));
        }
        track
    }

    #[test]
    fn test_fit_counts_handles_between_visible_items() {
        let mut track = track(&["a", "b", "c"]);
        let limits = track.fit();
        assert_eq!(limits.min_width, 8.0);
        assert!(track.handles()[2].hidden);
        assert!(!track.handles()[0].hidden);
    }

    #[test]
    fn test_update_places_items_and_handles() {
        let mut track = track(&["a", "b"]);
        track.fit();
        track.update(LayoutRect::new(0.0, 0.0, 204.0, 50.0));

        let first = track.items()[0].geometry().unwrap();
        let second = track.items()[1].geometry().unwrap();
        assert_eq!(first, LayoutRect::new(0.0, 0.0, 100.0, 50.0));
        assert_eq!(second, LayoutRect::new(104.0, 0.0, 100.0, 50.0));
        assert_eq!(track.handles()[0].rect, LayoutRect::new(100.0, 0.0, 4.0, 50.0));
    }

    #[test]
    fn test_hidden_item_takes_no_space() {
        let mut track = track(&["a", "b", "c"]);
        track.items[1].pane_mut().hidden = true;
        track.fit();
        track.update(LayoutRect::new(0.0, 0.0, 204.0, 50.0));
        assert!(track.handles()[1].hidden);
        assert!(track.handles()[2].hidden);
        assert_eq!(track.items()[2].geometry().unwrap().x, 104.0);
    }

    #[test]
    fn test_lead_offset_skips_hidden_items() {
        let mut track = track(&["a", "b", "c"]).with_lead_offset(10.0);
        track.items[1].pane_mut().hidden = true;
        let limits = track.fit();
        assert_eq!(limits.min_width, 24.0);

        track.update(LayoutRect::new(0.0, 0.0, 224.0, 50.0));
        let first = track.items()[0].geometry().unwrap();
        let last = track.items()[2].geometry().unwrap();
        assert_eq!(first, LayoutRect::new(10.0, 0.0, 100.0, 50.0));
        assert_eq!(last, LayoutRect::new(124.0, 0.0, 100.0, 50.0));
        assert_eq!(last.right(), 224.0);
    }

    #[test]
    fn test_center_alignment_offsets_leftover() {
        let mut track = track(&["a"]).with_alignment(TrackAlignment::Center);
        track.items[0].pane_mut().limits = SizeLimits::min_max(0.0, 100.0, 0.0, f32::INFINITY);
        track.fit();
        track.update(LayoutRect::new(0.0, 0.0, 300.0, 10.0));
        assert_eq!(track.items()[0].geometry().unwrap().x, 100.0);
    }

    #[test]
    fn test_justify_spreads_leftover() {
        let mut track = track(&["a", "b"]).with_alignment(TrackAlignment::Justify);
        for item in &mut track.items {
            item.pane_mut().limits = SizeLimits::min_max(0.0, 50.0, 0.0, f32::INFINITY);
        }
        track.fit();
        track.update(LayoutRect::new(0.0, 0.0, 204.0, 10.0));
        assert_eq!(track.items()[0].geometry().unwrap().width, 100.0);
        assert_eq!(track.items()[1].geometry().unwrap().x, 104.0);
    }

    #[test]
    fn test_move_handle_resizes_on_next_update() {
        let mut track = track(&["a", "b"]);
        track.fit();
        let rect = LayoutRect::new(0.0, 0.0, 204.0, 50.0);
        track.update(rect);

        let applied = track.move_handle(0, 130.0);
        assert_eq!(applied, 30.0);
        track.update(rect);
        assert_eq!(track.items()[0].geometry().unwrap().width, 130.0);
        assert_eq!(track.items()[1].geometry().unwrap().width, 70.0);
    }

    #[test]
    fn test_relative_sizes_scale_on_update() {
        let mut track = track(&["a", "b"]);
        track.set_relative_sizes(&[1.0, 3.0]);
        track.fit();
        track.update(LayoutRect::new(0.0, 0.0, 404.0, 10.0));
        assert_eq!(track.items()[0].geometry().unwrap().width, 100.0);
        assert_eq!(track.items()[1].geometry().unwrap().width, 300.0);
        assert_eq!(track.relative_sizes(), vec![0.25, 0.75]);
    }

    #[test]
    fn test_remove_pane_keeps_parallel_vectors() {
        let mut track = track(&["a", "b", "c"]);
        let removed = track.remove_pane(PaneId::new("b")).unwrap();
        assert_eq!(removed.id, PaneId::new("b"));
        assert_eq!(track.len(), 2);
        assert_eq!(track.sizers().len(), 2);
        assert_eq!(track.handles().len(), 2);
        assert!(track.remove_pane(PaneId::new("b")).is_none());
    }
}
