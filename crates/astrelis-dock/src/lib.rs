//! Astrelis Dock - split and tab docking layout engine.
//!
//! The engine arranges rectangular panes inside a window area. It never
//! renders: content implements [`Pane`], and the engine pushes geometry back
//! to it.
//!
//! - [`sizing`]: distributes space along one axis under min/max limits.
//! - [`SplitTrack`]: a flat row or column of panes with draggable handles.
//! - [`DockTree`]: nested splits with tab groups at the leaves, plus
//!   serialization to [`LayoutConfig`].
//! - [`DropZoneClassifier`]: where a dragged pane would land.
//! - [`DragController`]: tab reordering and detach.
//! - [`DockPanel`]: all of the above behind a [`DockHost`].
//!
//! # Example
//!
//! ```
//! use astrelis_dock::{
//!     AddOptions, DockPanel, DockSettings, InsertMode, LayoutRect, NoopHost, Pane, PaneId,
//! };
//!
//! struct Editor {
//!     id: PaneId,
//!     rect: LayoutRect,
//! }
//!
//! impl Pane for Editor {
//!     fn id(&self) -> PaneId {
//!         self.id
//!     }
//!
//!     fn set_geometry(&mut self, rect: LayoutRect) {
//!         self.rect = rect;
//!     }
//!
//!     fn notify_resized(&mut self, _width: f32, _height: f32) {}
//! }
//!
//! let mut panel = DockPanel::new(DockSettings::default(), NoopHost);
//! let left = PaneId::new("left");
//! panel
//!     .add_pane(Editor { id: left, rect: LayoutRect::ZERO }, AddOptions::default())
//!     .unwrap();
//! panel
//!     .add_pane(
//!         Editor { id: PaneId::new("right"), rect: LayoutRect::ZERO },
//!         AddOptions::new(InsertMode::SplitRight).relative_to(left),
//!     )
//!     .unwrap();
//! panel.flush(LayoutRect::new(0.0, 0.0, 804.0, 600.0));
//!
//! assert_eq!(panel.pane(left).unwrap().rect.width, 400.0);
//! ```

pub mod config;
pub mod dirty;
pub mod drag;
pub mod drop_zone;
pub mod error;
pub mod pane;
pub mod panel;
pub mod settings;
pub mod sizing;
pub mod track;
pub mod tree;
pub mod types;

pub use config::{AreaConfig, LayoutConfig, SplitAreaConfig, TabAreaConfig};
pub use dirty::PendingWork;
pub use drag::{
    DragController, DragEffect, DragResponse, DragState, Key, PointerButton, PointerEvent,
    PressTarget, TabLayout, TabStripLayout,
};
pub use drop_zone::{DropTarget, DropZone, DropZoneClassifier, overlay_rect};
pub use error::{DockError, DockResult};
pub use pane::{Pane, PaneId, PaneItem};
pub use panel::{AddOptions, DetachRequest, DockHost, DockPanel, DropPayload, NoopHost};
pub use settings::{
    DockMode, DockSettings, DragSettings, EdgeThresholds, InsertBehavior, RemoveBehavior,
};
pub use sizing::Sizer;
pub use track::{SplitTrack, TrackAlignment, TrackHandle};
pub use tree::{
    DockNode, DockTree, HandleRef, InsertMode, NodeId, SplitNode, TabAreaHit, TabGroup,
    VisibilityChange,
};
pub use types::{
    HorizontalAlignment, LayoutRect, Orientation, SizeLimits, VerticalAlignment,
};
