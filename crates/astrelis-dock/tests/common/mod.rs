//! Shared test pane.

#![allow(dead_code)]

use astrelis_dock::{LayoutRect, Pane, PaneId, SizeLimits};

/// Pane that records the geometry pushed to it.
#[derive(Debug, Clone)]
pub struct TestPane {
    pub id: PaneId,
    pub limits: SizeLimits,
    pub hidden: bool,
    pub rect: Option<LayoutRect>,
    pub resizes: usize,
}

impl TestPane {
    pub fn new(key: &str) -> Self {
        Self {
            id: PaneId::new(key),
            limits: SizeLimits::UNBOUNDED,
            hidden: false,
            rect: None,
            resizes: 0,
        }
    }

    pub fn numbered(n: usize) -> Self {
        Self::new(&format!("pane-{n}"))
    }

    pub fn with_limits(mut self, limits: SizeLimits) -> Self {
        self.limits = limits;
        self
    }
}

impl Pane for TestPane {
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
        self.rect = Some(rect);
    }

    fn notify_resized(&mut self, _width: f32, _height: f32) {
        self.resizes += 1;
    }
}

pub fn id(key: &str) -> PaneId {
    PaneId::new(key)
}
