//! Pane capability interface and the per-pane geometry wrapper.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::{HorizontalAlignment, LayoutRect, SizeLimits, VerticalAlignment};

/// Stable identifier for a pane, persisted in saved layouts.
///
/// Built from a string key with FNV-1a so the same key maps to the same id
/// across sessions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PaneId(u64);

impl PaneId {
    /// Create a pane id from a string key.
    pub fn new(key: &str) -> Self {
        Self(Self::hash_str(key))
    }

    /// Create a pane id from a raw value.
    pub const fn from_raw(id: u64) -> Self {
        Self(id)
    }

    pub const fn as_u64(&self) -> u64 {
        self.0
    }

    fn hash_str(s: &str) -> u64 {
        const FNV_OFFSET_BASIS: u64 = 0xcbf29ce484222325;
        const FNV_PRIME: u64 = 0x100000001b3;

        s.bytes().fold(FNV_OFFSET_BASIS, |hash, byte| {
            (hash ^ byte as u64).wrapping_mul(FNV_PRIME)
        })
    }
}

impl fmt::Display for PaneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PaneId(0x{:016x})", self.0)
    }
}

impl From<&str> for PaneId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// What the layout engine needs from a piece of content.
///
/// The engine never renders; it reads size limits and visibility, and pushes
/// geometry back through [`Pane::set_geometry`] / [`Pane::notify_resized`].
/// A pane must be removed from its layout before it is torn down.
pub trait Pane {
    fn id(&self) -> PaneId;

    /// Current size limits. Read on every fit.
    fn size_limits(&self) -> SizeLimits {
        SizeLimits::UNBOUNDED
    }

    fn is_hidden(&self) -> bool {
        false
    }

    /// Relative share used when the pane sits in a [`SplitTrack`](crate::track::SplitTrack).
    fn stretch(&self) -> f32 {
        1.0
    }

    /// Place the pane. Called only when the box actually changed.
    fn set_geometry(&mut self, rect: LayoutRect);

    /// The applied size changed.
    fn notify_resized(&mut self, width: f32, height: f32);
}

/// Wraps one pane with cached limits and the last applied geometry.
#[derive(Debug)]
pub struct PaneItem<P> {
    pane: P,
    limits: SizeLimits,
    geometry: Option<LayoutRect>,
    horizontal_alignment: HorizontalAlignment,
    vertical_alignment: VerticalAlignment,
}

impl<P: Pane> PaneItem<P> {
    pub fn new(pane: P) -> Self {
        let limits = pane.size_limits();
        Self {
            pane,
            limits,
            geometry: None,
            horizontal_alignment: HorizontalAlignment::default(),
            vertical_alignment: VerticalAlignment::default(),
        }
    }

    /// Set how the pane is placed when clamped narrower/shorter than allotted.
    pub fn with_alignment(
        mut self,
        horizontal: HorizontalAlignment,
        vertical: VerticalAlignment,
    ) -> Self {
        self.horizontal_alignment = horizontal;
        self.vertical_alignment = vertical;
        self
    }

    pub fn set_alignment(&mut self, horizontal: HorizontalAlignment, vertical: VerticalAlignment) {
        self.horizontal_alignment = horizontal;
        self.vertical_alignment = vertical;
    }

    pub fn id(&self) -> PaneId {
        self.pane.id()
    }

    pub fn pane(&self) -> &P {
        &self.pane
    }

    pub fn pane_mut(&mut self) -> &mut P {
        &mut self.pane
    }

    pub fn into_pane(self) -> P {
        self.pane
    }

    pub fn is_hidden(&self) -> bool {
        self.pane.is_hidden()
    }

    /// Limits cached by the last [`fit`](Self::fit).
    pub fn limits(&self) -> SizeLimits {
        self.limits
    }

    /// Geometry applied by the last [`update`](Self::update), if any.
    pub fn geometry(&self) -> Option<LayoutRect> {
        self.geometry
    }

    /// Forget the applied geometry so the next update re-applies it.
    ///
    /// Used when a pane moves between containers or stops being visible.
    pub fn reset_geometry(&mut self) {
        self.geometry = None;
    }

    /// Refresh the cached limits from the pane.
    pub fn fit(&mut self) {
        self.limits = self.pane.size_limits();
    }

    /// Place the pane inside the given box.
    ///
    /// The box is clamped to the cached limits; a dimension clamped below its
    /// allotment is offset per the configured alignment. Returns `true` if the
    /// applied size changed (the pane was notified).
    pub fn update(&mut self, left: f32, top: f32, width: f32, height: f32) -> bool {
        let clamped_width = width.min(self.limits.max_width).max(self.limits.min_width);
        let clamped_height = height.min(self.limits.max_height).max(self.limits.min_height);

        let mut left = left;
        let mut top = top;

        if clamped_width < width {
            match self.horizontal_alignment {
                HorizontalAlignment::Left => {}
                HorizontalAlignment::Center => left += (width - clamped_width) / 2.0,
                HorizontalAlignment::Right => left += width - clamped_width,
            }
        }

        if clamped_height < height {
            match self.vertical_alignment {
                VerticalAlignment::Top => {}
                VerticalAlignment::Center => top += (height - clamped_height) / 2.0,
                VerticalAlignment::Bottom => top += height - clamped_height,
            }
        }

        let rect = LayoutRect::new(left, top, clamped_width, clamped_height);
        let previous = self.geometry;
        if previous == Some(rect) {
            return false;
        }

        self.geometry = Some(rect);
        self.pane.set_geometry(rect);

        let resized = previous
            .is_none_or(|old| old.width != clamped_width || old.height != clamped_height);
        if resized {
            self.pane.notify_resized(clamped_width, clamped_height);
        }
        resized
    }
}
