//! Shared geometry types for the docking engine.

use astrelis_core::math::Vec2;
use serde::{Deserialize, Serialize};

/// Axis along which a split or track lays out its children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    /// Children side by side, left to right (vertical handle lines).
    #[default]
    Horizontal,
    /// Children stacked top to bottom (horizontal handle lines).
    Vertical,
}

impl Orientation {
    /// Get the perpendicular orientation.
    pub fn perpendicular(&self) -> Self {
        match self {
            Orientation::Horizontal => Orientation::Vertical,
            Orientation::Vertical => Orientation::Horizontal,
        }
    }

    pub fn is_horizontal(&self) -> bool {
        matches!(self, Orientation::Horizontal)
    }

    pub fn is_vertical(&self) -> bool {
        matches!(self, Orientation::Vertical)
    }

    /// Component of `point` along this axis.
    pub fn main(&self, point: Vec2) -> f32 {
        match self {
            Orientation::Horizontal => point.x,
            Orientation::Vertical => point.y,
        }
    }
}

/// Axis-aligned rectangle in panel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LayoutRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl LayoutRect {
    pub const ZERO: Self = Self {
        x: 0.0,
        y: 0.0,
        width: 0.0,
        height: 0.0,
    };

    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Half-open containment: the left/top edges are inside, right/bottom are not.
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.x && point.x < self.right() && point.y >= self.y && point.y < self.bottom()
    }

    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Extent along `orientation`.
    pub fn extent(&self, orientation: Orientation) -> f32 {
        match orientation {
            Orientation::Horizontal => self.width,
            Orientation::Vertical => self.height,
        }
    }
}

/// Min/max size bounds reported by a pane or aggregated by a container.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SizeLimits {
    pub min_width: f32,
    pub max_width: f32,
    pub min_height: f32,
    pub max_height: f32,
}

impl Default for SizeLimits {
    fn default() -> Self {
        Self::UNBOUNDED
    }
}

impl SizeLimits {
    /// No minimum, no maximum.
    pub const UNBOUNDED: Self = Self {
        min_width: 0.0,
        max_width: f32::INFINITY,
        min_height: 0.0,
        max_height: f32::INFINITY,
    };

    /// Limits that collapse an element to nothing (hidden items).
    pub const COLLAPSED: Self = Self {
        min_width: 0.0,
        max_width: 0.0,
        min_height: 0.0,
        max_height: 0.0,
    };

    /// Create limits with minimum sizes only.
    pub fn min(min_width: f32, min_height: f32) -> Self {
        Self {
            min_width,
            min_height,
            ..Self::UNBOUNDED
        }
    }

    /// Create limits with both min and max sizes.
    pub fn min_max(min_width: f32, max_width: f32, min_height: f32, max_height: f32) -> Self {
        Self {
            min_width,
            max_width: max_width.max(min_width),
            min_height,
            max_height: max_height.max(min_height),
        }
    }

    /// (min, max) along `orientation`.
    pub fn along(&self, orientation: Orientation) -> (f32, f32) {
        match orientation {
            Orientation::Horizontal => (self.min_width, self.max_width),
            Orientation::Vertical => (self.min_height, self.max_height),
        }
    }

    /// (min, max) across `orientation`.
    pub fn across(&self, orientation: Orientation) -> (f32, f32) {
        self.along(orientation.perpendicular())
    }
}

/// Where a clamped item sits horizontally inside its allotted box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HorizontalAlignment {
    Left,
    #[default]
    Center,
    Right,
}

/// Where a clamped item sits vertically inside its allotted box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerticalAlignment {
    Top,
    #[default]
    Center,
    Bottom,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_contains_is_half_open() {
        let rect = LayoutRect::new(10.0, 10.0, 100.0, 50.0);
        assert!(rect.contains(Vec2::new(10.0, 10.0)));
        assert!(rect.contains(Vec2::new(109.9, 59.9)));
        assert!(!rect.contains(Vec2::new(110.0, 30.0)));
        assert!(!rect.contains(Vec2::new(50.0, 60.0)));
    }

    #[test]
    fn test_limits_along_axis() {
        let limits = SizeLimits::min_max(10.0, 100.0, 20.0, 200.0);
        assert_eq!(limits.along(Orientation::Horizontal), (10.0, 100.0));
        assert_eq!(limits.across(Orientation::Horizontal), (20.0, 200.0));
    }

    #[test]
    fn test_min_max_never_inverts() {
        let limits = SizeLimits::min_max(50.0, 10.0, 0.0, 5.0);
        assert_eq!(limits.max_width, 50.0);
        assert_eq!(limits.max_height, 5.0);
    }
}
