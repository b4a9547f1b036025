//! Dock panel: the tree, the tab drag gesture and drop handling behind one
//! host interface.

use std::any::Any;
use std::fmt;

use astrelis_core::math::Vec2;
use tracing::{debug, trace, warn};

use crate::config::{AreaConfig, LayoutConfig, TabAreaConfig};
use crate::dirty::PendingWork;
use crate::drag::{DragController, DragEffect, PointerEvent, TabStripLayout};
use crate::drop_zone::{DropTarget, DropZone, DropZoneClassifier};
use crate::error::DockResult;
use crate::pane::{Pane, PaneId};
use crate::settings::{DockMode, DockSettings};
use crate::tree::{DockTree, HandleRef, InsertMode, NodeId, VisibilityChange};
use crate::types::LayoutRect;

/// Callbacks from the panel to whatever owns it.
///
/// Every method has a no-op default.
pub trait DockHost {
    /// Limits changed. Called once per batch of requests.
    fn request_fit(&mut self) {}

    /// Geometry changed. Called once per batch of requests.
    fn request_update(&mut self) {}

    fn child_shown(&mut self, _pane: PaneId) {}

    fn child_hidden(&mut self, _pane: PaneId) {}

    /// The user asked to close a tab. The pane stays until removed.
    fn close_requested(&mut self, _pane: PaneId) {}

    /// The add button of `group`'s tab strip was clicked.
    fn add_requested(&mut self, _group: NodeId) {}

    /// A tab was dragged out of its strip. Return `true` to take it over;
    /// the tab gesture then ends without a reorder.
    fn detach_requested(&mut self, _request: DetachRequest) -> bool {
        false
    }

    /// Force or release the default cursor while a tab is dragged.
    fn set_cursor_override(&mut self, _active: bool) {}
}

/// Host that ignores every callback.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopHost;

impl DockHost for NoopHost {}

/// Details of a tab dragged out of its strip.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetachRequest {
    pub pane: PaneId,
    pub group: NodeId,
    pub index: usize,
    /// Screen rectangle of the tab.
    pub anchor: LayoutRect,
    pub pointer: Vec2,
    pub press_offset: Vec2,
}

/// Options for [`DockPanel::add_pane`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AddOptions {
    pub reference: Option<PaneId>,
    pub mode: InsertMode,
    /// Make the pane current in its group.
    pub activate: bool,
}

impl Default for AddOptions {
    fn default() -> Self {
        Self {
            reference: None,
            mode: InsertMode::TabAfter,
            activate: true,
        }
    }
}

impl AddOptions {
    pub fn new(mode: InsertMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    pub fn relative_to(mut self, reference: PaneId) -> Self {
        self.reference = Some(reference);
        self
    }

    pub fn inactive(mut self) -> Self {
        self.activate = false;
        self
    }
}

type PaneFactory<P> = Box<dyn FnOnce() -> Option<P>>;

enum DropSource<P> {
    /// Materialize a new pane.
    Factory(PaneFactory<P>),
    /// Relocate a pane already in this panel.
    Existing(PaneId),
}

/// Data carried by an external drag onto the panel.
pub struct DropPayload<P> {
    source: Option<DropSource<P>>,
    /// Snapshot shown under the cursor while dragging. Opaque to the panel.
    pub drag_image: Option<Box<dyn Any>>,
}

impl<P> DropPayload<P> {
    /// Payload that creates its pane on drop. The factory runs at most once.
    pub fn new(factory: impl FnOnce() -> Option<P> + 'static) -> Self {
        Self {
            source: Some(DropSource::Factory(Box::new(factory))),
            drag_image: None,
        }
    }

    /// Payload that moves a pane already docked in the target panel.
    pub fn existing(pane: PaneId) -> Self {
        Self {
            source: Some(DropSource::Existing(pane)),
            drag_image: None,
        }
    }

    /// Payload with nothing to drop.
    pub fn empty() -> Self {
        Self {
            source: None,
            drag_image: None,
        }
    }

    pub fn with_drag_image(mut self, image: Box<dyn Any>) -> Self {
        self.drag_image = Some(image);
        self
    }
}

impl<P> fmt::Debug for DropPayload<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let source = match &self.source {
            Some(DropSource::Factory(_)) => "factory",
            Some(DropSource::Existing(_)) => "existing",
            None => "none",
        };
        f.debug_struct("DropPayload")
            .field("source", &source)
            .field("drag_image", &self.drag_image.is_some())
            .finish()
    }
}

/// A docking area: panes in a split/tab tree, resizable handles, tab
/// reordering and drop targets.
pub struct DockPanel<P: Pane, H: DockHost = NoopHost> {
    tree: DockTree<P>,
    drag: DragController,
    classifier: DropZoneClassifier,
    settings: DockSettings,
    pending: PendingWork,
    rect: LayoutRect,
    host: H,
}

impl<P: Pane, H: DockHost> DockPanel<P, H> {
    pub fn new(settings: DockSettings, host: H) -> Self {
        Self {
            tree: DockTree::from_settings(&settings),
            drag: DragController::new(settings.drag),
            classifier: DropZoneClassifier::new(settings.edges, settings.mode),
            settings,
            pending: PendingWork::empty(),
            rect: LayoutRect::ZERO,
            host,
        }
    }

    pub fn settings(&self) -> &DockSettings {
        &self.settings
    }

    pub fn tree(&self) -> &DockTree<P> {
        &self.tree
    }

    pub fn drag(&self) -> &DragController {
        &self.drag
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Rectangle of the last flush.
    pub fn rect(&self) -> LayoutRect {
        self.rect
    }

    pub fn pending(&self) -> PendingWork {
        self.pending
    }

    pub fn pane(&self, id: PaneId) -> Option<&P> {
        self.tree.pane(id)
    }

    /// Mutable access to a pane. Call [`request_fit`](Self::request_fit) if
    /// its limits change.
    pub fn pane_mut(&mut self, id: PaneId) -> Option<&mut P> {
        self.tree.pane_mut(id)
    }

    pub fn mode(&self) -> DockMode {
        self.settings.mode
    }

    /// Switch document mode. Entering single-document mode merges every
    /// pane into one tab group.
    pub fn set_mode(&mut self, mode: DockMode) {
        if self.settings.mode == mode {
            return;
        }
        self.settings.mode = mode;
        self.classifier.mode = mode;
        debug!(?mode, "dock mode changed");
        if mode == DockMode::SingleDocument {
            self.merge_groups();
        }
    }

    fn merge_groups(&mut self) {
        if self.tree.tab_groups().len() <= 1 {
            return;
        }
        self.cancel_drag();

        let widgets = self.tree.pane_ids();
        let current = self
            .tree
            .first_tab_group()
            .and_then(|group| self.tree.group(group).ok()?.active_id());
        let current_index = current
            .and_then(|current| widgets.iter().position(|&id| id == current))
            .unwrap_or(0);
        let config = LayoutConfig {
            main: Some(AreaConfig::TabArea(TabAreaConfig {
                widgets,
                current_index: current_index as i64,
            })),
        };
        let detached = self.tree.restore(&config);
        if !detached.is_empty() {
            warn!(detached = detached.len(), "panes lost while merging tab groups");
        }
        self.after_structure_change();
    }

    /// Dock a new pane. Tabbing into a group with a live tab drag aborts
    /// the drag first.
    pub fn add_pane(&mut self, pane: P, options: AddOptions) -> DockResult<()> {
        let id = pane.id();
        let mode = match self.settings.mode {
            DockMode::SingleDocument => InsertMode::TabAfter,
            DockMode::MultipleDocument => options.mode,
        };
        if mode.is_tab() {
            let target = match options.reference {
                Some(reference) => self.tree.group_of(reference),
                None => self.tree.first_tab_group(),
            };
            self.abort_drag_in(target);
        }
        self.tree.insert_pane(pane, options.reference, mode)?;
        if options.activate {
            self.tree.activate_pane(id)?;
        }
        debug!(pane = %id, ?mode, "pane added");
        self.after_structure_change();
        Ok(())
    }

    /// Undock a pane and hand it back. A tab drag in the pane's group is
    /// aborted first.
    pub fn remove_pane(&mut self, id: PaneId) -> DockResult<P> {
        let group = self.tree.group_of(id);
        self.abort_drag_in(group);
        let pane = self.tree.remove_pane(id)?;
        debug!(pane = %id, "pane removed");
        self.after_structure_change();
        Ok(pane)
    }

    pub fn activate_pane(&mut self, id: PaneId) -> DockResult<()> {
        self.tree.activate_pane(id)?;
        self.forward_visibility();
        self.request_fit();
        Ok(())
    }

    /// Handle under `point`, for hover feedback and starting a resize.
    pub fn handle_at(&self, point: Vec2) -> Option<HandleRef> {
        self.tree.handle_at(point)
    }

    pub fn move_handle(&mut self, handle: HandleRef, position: f32) -> DockResult<f32> {
        let applied = self.tree.move_handle(handle, position)?;
        if applied != 0.0 {
            self.request_update();
        }
        Ok(applied)
    }

    pub fn save_layout(&self) -> LayoutConfig {
        self.tree.serialize()
    }

    /// Rearrange the docked panes from `config`. Panes the config does not
    /// mention are undocked and returned.
    pub fn restore_layout(&mut self, config: &LayoutConfig) -> Vec<P> {
        self.cancel_drag();
        let detached = self.tree.restore(config);
        if self.settings.mode == DockMode::SingleDocument {
            self.merge_groups();
        }
        self.after_structure_change();
        detached
    }

    /// Ask for a fit and update before the next paint.
    pub fn request_fit(&mut self) {
        if !self.pending.needs_fit() {
            self.host.request_fit();
        }
        self.pending |= PendingWork::FIT;
    }

    /// Ask for an update before the next paint.
    pub fn request_update(&mut self) {
        if !self.pending.needs_update() {
            self.host.request_update();
        }
        self.pending |= PendingWork::UPDATE;
    }

    /// Run the pending layout work inside `rect`. Returns whether anything
    /// was recomputed.
    pub fn flush(&mut self, rect: LayoutRect) -> bool {
        let resized = rect != self.rect;
        if !resized && !self.pending.needs_update() {
            return false;
        }
        if self.pending.needs_fit() {
            self.tree.fit();
        }
        self.tree.update(rect);
        self.rect = rect;
        self.pending = PendingWork::empty();
        trace!(?rect, "dock panel flushed");
        true
    }

    /// Classify a drag hovering at `point`.
    pub fn drag_over(&self, point: Vec2) -> DropTarget {
        let hit = self.tree.hit_test_tab_areas(point);
        self.classifier
            .target(point, self.rect, self.tree.is_empty(), hit)
    }

    /// Drop `payload` at `point`. Returns `false` with the tree untouched for
    /// an invalid zone or an unusable payload.
    ///
    /// A tab drag in the group the pane leaves, or in the group it joins as
    /// a tab, is aborted before the tree changes.
    pub fn drop(&mut self, point: Vec2, payload: DropPayload<P>) -> bool {
        let target = self.drag_over(point);
        let Some(mode) = target.zone.insert_mode() else {
            trace!(?point, "drop on invalid zone");
            return false;
        };
        let reference = match target.zone {
            DropZone::RootAll
            | DropZone::RootTop
            | DropZone::RootLeft
            | DropZone::RootRight
            | DropZone::RootBottom => None,
            _ => target
                .group
                .and_then(|group| self.tree.group(group).ok()?.active_id()),
        };

        let (pane, id) = match payload.source {
            None => {
                trace!("drop payload has no source");
                return false;
            }
            Some(DropSource::Factory(factory)) => {
                let Some(pane) = factory() else {
                    trace!("drop factory produced no pane");
                    return false;
                };
                let id = pane.id();
                (Some(pane), id)
            }
            Some(DropSource::Existing(id)) => (None, id),
        };

        let source = self.tree.group_of(id);
        self.abort_drag_in(source);
        if mode.is_tab() {
            self.abort_drag_in(target.group);
        }
        let result = match pane {
            Some(pane) if source.is_none() => self.tree.insert_pane(pane, reference, mode),
            // an id that is already docked moves instead of duplicating
            _ => self.tree.move_pane(id, reference, mode),
        };
        if let Err(err) = result {
            warn!(pane = %id, %err, "drop rejected");
            return false;
        }

        if let Err(err) = self.tree.activate_pane(id) {
            warn!(pane = %id, %err, "dropped pane could not be activated");
        }
        debug!(pane = %id, zone = ?target.zone, "pane dropped");
        self.after_structure_change();
        true
    }

    /// Feed a tab strip event for `group`. Returns whether the gesture
    /// consumed it.
    pub fn handle_tab_event(
        &mut self,
        group: NodeId,
        event: PointerEvent,
        strip: &TabStripLayout,
        now_ms: f64,
    ) -> bool {
        let owner = self.drag.group().unwrap_or(group);
        let response = self.drag.handle_event(group, event, strip, now_ms);
        self.apply_drag_effects(owner, response.effects);
        response.consumed
    }

    /// Advance the tab release animation.
    pub fn tick(&mut self, now_ms: f64) {
        let Some(owner) = self.drag.group() else {
            return;
        };
        let effects = self.drag.tick(now_ms);
        self.apply_drag_effects(owner, effects);
    }

    /// Abort any tab gesture in progress.
    pub fn cancel_drag(&mut self) {
        let Some(owner) = self.drag.group() else {
            return;
        };
        let effects = self.drag.cancel();
        self.apply_drag_effects(owner, effects);
    }

    /// Abort a tab gesture whose indices a mutation of `group` would invalidate.
    fn abort_drag_in(&mut self, group: Option<NodeId>) {
        if group.is_some() && self.drag.group() == group {
            self.cancel_drag();
        }
    }

    fn apply_drag_effects(&mut self, group: NodeId, effects: Vec<DragEffect>) {
        for effect in effects {
            match effect {
                DragEffect::Activate { index } => {
                    if let Some(pane) = self.pane_at(group, index) {
                        if let Err(err) = self.activate_pane(pane) {
                            warn!(%group, index, %err, "tab activation failed");
                        }
                    }
                }
                DragEffect::DragStarted { index } => {
                    trace!(%group, index, "tab drag started");
                    self.request_update();
                }
                DragEffect::CursorLocked => self.host.set_cursor_override(true),
                DragEffect::CursorReleased => self.host.set_cursor_override(false),
                DragEffect::DetachRequested {
                    index,
                    anchor,
                    pointer,
                    press_offset,
                } => {
                    let Some(pane) = self.pane_at(group, index) else {
                        continue;
                    };
                    let request = DetachRequest {
                        pane,
                        group,
                        index,
                        anchor,
                        pointer,
                        press_offset,
                    };
                    if self.host.detach_requested(request) {
                        let released = self.drag.accept_detach();
                        self.apply_drag_effects(group, released);
                        self.request_update();
                    }
                }
                DragEffect::Moved { from, to } => {
                    match self.tree.move_tab(group, from, to) {
                        Ok(()) => self.request_update(),
                        Err(err) => warn!(%group, from, to, %err, "tab reorder dropped"),
                    }
                }
                DragEffect::CloseRequested { index } => {
                    if let Some(pane) = self.pane_at(group, index) {
                        self.host.close_requested(pane);
                    }
                }
                DragEffect::AddRequested => self.host.add_requested(group),
                DragEffect::Aborted => {
                    trace!(%group, "tab drag aborted");
                    self.request_update();
                }
            }
        }
    }

    fn pane_at(&self, group: NodeId, index: usize) -> Option<PaneId> {
        self.tree.group(group).ok()?.panes().get(index).map(|item| item.id())
    }

    fn after_structure_change(&mut self) {
        self.forward_visibility();
        self.request_fit();
    }

    fn forward_visibility(&mut self) {
        for change in self.tree.take_visibility_changes() {
            match change {
                VisibilityChange::Shown(id) => self.host.child_shown(id),
                VisibilityChange::Hidden(id) => self.host.child_hidden(id),
            }
        }
    }
}

impl<P: Pane, H: DockHost + Default> Default for DockPanel<P, H> {
    fn default() -> Self {
        Self::new(DockSettings::default(), H::default())
    }
}

impl<P: Pane + fmt::Debug, H: DockHost> fmt::Debug for DockPanel<P, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DockPanel")
            .field("panes", &self.tree.len())
            .field("mode", &self.settings.mode)
            .field("pending", &self.pending)
            .field("rect", &self.rect)
            .field("drag", &self.drag.state())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drag::{PointerButton, PressTarget};
    use crate::tree::tests::{Leaf, id};

    #[derive(Debug, Default)]
    struct Recorder {
        fits: usize,
        updates: usize,
        shown: Vec<PaneId>,
        hidden: Vec<PaneId>,
        closed: Vec<PaneId>,
        accept_detach: bool,
        detached: Vec<PaneId>,
        cursor: bool,
    }

    impl DockHost for Recorder {
        fn request_fit(&mut self) {
            self.fits += 1;
        }

        fn request_update(&mut self) {
            self.updates += 1;
        }

        fn child_shown(&mut self, pane: PaneId) {
            self.shown.push(pane);
        }

        fn child_hidden(&mut self, pane: PaneId) {
            self.hidden.push(pane);
        }

        fn close_requested(&mut self, pane: PaneId) {
            self.closed.push(pane);
        }

        fn detach_requested(&mut self, request: DetachRequest) -> bool {
            self.detached.push(request.pane);
            self.accept_detach
        }

        fn set_cursor_override(&mut self, active: bool) {
            self.cursor = active;
        }
    }

    const AREA: LayoutRect = LayoutRect::new(0.0, 0.0, 404.0, 300.0);

    fn panel(keys: &[&str]) -> DockPanel<Leaf, Recorder> {
        let mut panel = DockPanel::new(DockSettings::default(), Recorder::default());
        for key in keys {
            panel.add_pane(Leaf::new(key), AddOptions::default()).unwrap();
        }
        panel.flush(AREA);
        panel
    }

    fn strip(panel: &DockPanel<Leaf, Recorder>, group: NodeId) -> TabStripLayout {
        let group = panel.tree().group(group).unwrap();
        let sizes = vec![60.0; group.len()];
        TabStripLayout::from_sizes(Default::default(), group.tab_bar_rect(), &sizes, 0.0)
    }

    #[test]
    fn test_requests_are_conflated_until_flush() {
        let mut panel = panel(&[]);
        panel.host_mut().fits = 0;
        panel.request_fit();
        panel.request_fit();
        panel.request_update();
        assert_eq!(panel.host().fits, 1);
        assert_eq!(panel.host().updates, 0);

        assert!(panel.flush(AREA));
        assert!(!panel.flush(AREA));
        panel.request_update();
        assert_eq!(panel.host().updates, 1);
    }

    #[test]
    fn test_add_and_remove_forward_visibility() {
        let mut panel = panel(&["a", "b"]);
        assert_eq!(panel.host().shown, vec![id("a"), id("b")]);
        assert_eq!(panel.host().hidden, vec![id("a")]);

        panel.remove_pane(id("b")).unwrap();
        assert_eq!(panel.host().hidden, vec![id("a"), id("b")]);
        assert_eq!(panel.host().shown.last(), Some(&id("a")));
    }

    #[test]
    fn test_drop_factory_splits_target_group() {
        let mut panel = panel(&["a"]);
        let payload = DropPayload::new(|| Some(Leaf::new("b")));
        // right third of the only group, below its tab strip
        assert!(panel.drop(Vec2::new(350.0, 150.0), payload));

        let root = panel.tree().node(panel.tree().root().unwrap()).unwrap();
        let split = root.as_split().unwrap();
        assert_eq!(split.children().len(), 2);
        assert_eq!(panel.tree().group_of(id("b")), Some(split.children()[1]));
    }

    #[test]
    fn test_drop_without_pane_leaves_tree_alone() {
        let mut panel = panel(&["a"]);
        let calls = std::rc::Rc::new(std::cell::Cell::new(0));
        let counter = calls.clone();
        let payload = DropPayload::<Leaf>::new(move || {
            counter.set(counter.get() + 1);
            None
        });
        assert!(!panel.drop(Vec2::new(200.0, 150.0), payload));
        assert_eq!(calls.get(), 1);
        assert!(!panel.drop(Vec2::new(200.0, 150.0), DropPayload::empty()));
        assert!(!panel.drop(Vec2::new(900.0, 150.0), DropPayload::new(|| Some(Leaf::new("c")))));
        assert_eq!(panel.tree().len(), 1);
    }

    #[test]
    fn test_drop_on_empty_panel_creates_root() {
        let mut panel = panel(&[]);
        assert_eq!(panel.drag_over(Vec2::new(10.0, 10.0)).zone, DropZone::RootAll);
        assert!(panel.drop(Vec2::new(10.0, 10.0), DropPayload::new(|| Some(Leaf::new("a")))));
        assert_eq!(panel.tree().len(), 1);
    }

    #[test]
    fn test_single_document_mode_merges_groups() {
        let mut panel = panel(&["a"]);
        panel
            .add_pane(Leaf::new("b"), AddOptions::new(InsertMode::SplitRight))
            .unwrap();
        assert_eq!(panel.tree().tab_groups().len(), 2);

        panel.set_mode(DockMode::SingleDocument);
        assert_eq!(panel.tree().tab_groups().len(), 1);
        panel
            .add_pane(Leaf::new("c"), AddOptions::new(InsertMode::SplitLeft))
            .unwrap();
        assert_eq!(panel.tree().tab_groups().len(), 1);
        assert_eq!(panel.tree().len(), 3);
    }

    #[test]
    fn test_tab_drag_commits_reorder() {
        let mut panel = panel(&["a", "b", "c"]);
        let group = panel.tree().root().unwrap();
        let strip = strip(&panel, group);
        let y = 10.0;

        let down = PointerEvent::Down {
            position: Vec2::new(30.0, y),
            button: PointerButton::Primary,
            target: PressTarget::Tab {
                index: 0,
                close_icon: false,
            },
        };
        assert!(panel.handle_tab_event(group, down, &strip, 0.0));
        let drag_to = PointerEvent::Move {
            position: Vec2::new(100.0, y),
        };
        assert!(panel.handle_tab_event(group, drag_to, &strip, 10.0));
        assert!(panel.host().cursor);

        let up = PointerEvent::Up {
            position: Vec2::new(100.0, y),
            button: PointerButton::Primary,
            target: PressTarget::Tab {
                index: 1,
                close_icon: false,
            },
        };
        panel.handle_tab_event(group, up, &strip, 20.0);
        panel.tick(100.0);
        assert_eq!(panel.tree().group(group).unwrap().pane_ids().next(), Some(id("a")));

        panel.tick(200.0);
        assert!(!panel.host().cursor);
        let order: Vec<_> = panel.tree().group(group).unwrap().pane_ids().collect();
        assert_eq!(order, vec![id("b"), id("a"), id("c")]);
    }

    #[test]
    fn test_accepted_detach_ends_gesture() {
        let mut panel = panel(&["a", "b"]);
        panel.host_mut().accept_detach = true;
        let group = panel.tree().root().unwrap();
        let strip = strip(&panel, group);

        let down = PointerEvent::Down {
            position: Vec2::new(70.0, 10.0),
            button: PointerButton::Primary,
            target: PressTarget::Tab {
                index: 1,
                close_icon: false,
            },
        };
        panel.handle_tab_event(group, down, &strip, 0.0);
        let away = PointerEvent::Move {
            position: Vec2::new(70.0, 200.0),
        };
        panel.handle_tab_event(group, away, &strip, 5.0);

        assert_eq!(panel.host().detached, vec![id("b")]);
        assert!(!panel.drag().is_active());
        assert!(!panel.host().cursor);
    }

    #[test]
    fn test_remove_aborts_drag_in_group() {
        let mut panel = panel(&["a", "b"]);
        let group = panel.tree().root().unwrap();
        let strip = strip(&panel, group);
        let down = PointerEvent::Down {
            position: Vec2::new(10.0, 10.0),
            button: PointerButton::Primary,
            target: PressTarget::Tab {
                index: 0,
                close_icon: false,
            },
        };
        panel.handle_tab_event(group, down, &strip, 0.0);
        assert!(panel.drag().is_active());

        panel.remove_pane(id("b")).unwrap();
        assert!(!panel.drag().is_active());
    }

    /// Press tab 0 and drag it over the midpoint of tab 1.
    fn start_tab_drag(panel: &mut DockPanel<Leaf, Recorder>) -> NodeId {
        let group = panel.tree().root().unwrap();
        let strip = strip(panel, group);
        let down = PointerEvent::Down {
            position: Vec2::new(30.0, 10.0),
            button: PointerButton::Primary,
            target: PressTarget::Tab {
                index: 0,
                close_icon: false,
            },
        };
        panel.handle_tab_event(group, down, &strip, 0.0);
        let over = PointerEvent::Move {
            position: Vec2::new(100.0, 10.0),
        };
        panel.handle_tab_event(group, over, &strip, 10.0);
        assert_eq!(panel.drag().target_index(), Some(1));
        group
    }

    /// Release the pointer and let any settle animation run out.
    fn finish_tab_drag(panel: &mut DockPanel<Leaf, Recorder>, group: NodeId) {
        let strip = strip(panel, group);
        let up = PointerEvent::Up {
            position: Vec2::new(100.0, 10.0),
            button: PointerButton::Primary,
            target: PressTarget::Nothing,
        };
        panel.handle_tab_event(group, up, &strip, 20.0);
        panel.tick(1000.0);
    }

    fn order_of(panel: &DockPanel<Leaf, Recorder>, pane: &str) -> Vec<PaneId> {
        let group = panel.tree().group_of(id(pane)).unwrap();
        panel.tree().group(group).unwrap().pane_ids().collect()
    }

    #[test]
    fn test_drop_of_docked_factory_pane_aborts_drag() {
        let mut panel = panel(&["a", "b", "c"]);
        let group = start_tab_drag(&mut panel);

        let payload = DropPayload::new(|| Some(Leaf::new("a")));
        assert!(panel.drop(Vec2::new(350.0, 150.0), payload));
        assert!(!panel.drag().is_active());
        assert!(!panel.host().cursor);

        finish_tab_drag(&mut panel, group);
        assert_eq!(order_of(&panel, "b"), vec![id("b"), id("c")]);
        assert_eq!(panel.tree().len(), 3);
    }

    #[test]
    fn test_drop_of_existing_pane_aborts_drag() {
        let mut panel = panel(&["a", "b", "c"]);
        let group = start_tab_drag(&mut panel);

        assert!(panel.drop(Vec2::new(350.0, 150.0), DropPayload::existing(id("c"))));
        assert!(!panel.drag().is_active());

        finish_tab_drag(&mut panel, group);
        assert_eq!(order_of(&panel, "a"), vec![id("a"), id("b")]);
    }

    #[test]
    fn test_tab_drop_into_dragged_group_aborts_drag() {
        let mut panel = panel(&["a", "b", "c"]);
        let group = start_tab_drag(&mut panel);

        // the body of the only group takes the new pane after the pressed tab
        let payload = DropPayload::new(|| Some(Leaf::new("d")));
        assert!(panel.drop(Vec2::new(200.0, 150.0), payload));
        assert!(!panel.drag().is_active());

        finish_tab_drag(&mut panel, group);
        assert_eq!(order_of(&panel, "a"), vec![id("a"), id("d"), id("b"), id("c")]);
    }

    #[test]
    fn test_add_tab_to_dragged_group_aborts_drag() {
        let mut panel = panel(&["a", "b", "c"]);
        let group = start_tab_drag(&mut panel);

        panel
            .add_pane(
                Leaf::new("d"),
                AddOptions::new(InsertMode::TabBefore).relative_to(id("a")),
            )
            .unwrap();
        assert!(!panel.drag().is_active());

        finish_tab_drag(&mut panel, group);
        assert_eq!(order_of(&panel, "a"), vec![id("d"), id("a"), id("b"), id("c")]);
    }

    #[test]
    fn test_split_add_keeps_drag_alive() {
        let mut panel = panel(&["a", "b", "c"]);
        start_tab_drag(&mut panel);

        panel.add_pane(Leaf::new("d"), AddOptions::new(InsertMode::SplitRight)).unwrap();
        assert!(panel.drag().is_active());
    }

    #[test]
    fn test_restore_aborts_drag() {
        let mut panel = panel(&["a", "b", "c"]);
        let saved = panel.save_layout();
        let group = start_tab_drag(&mut panel);

        assert!(panel.restore_layout(&saved).is_empty());
        assert!(!panel.drag().is_active());

        let group = panel.tree().group_of(id("a")).unwrap_or(group);
        finish_tab_drag(&mut panel, group);
        assert_eq!(order_of(&panel, "a"), vec![id("a"), id("b"), id("c")]);
    }

    #[test]
    fn test_middle_click_requests_close() {
        let mut panel = panel(&["a", "b"]);
        let group = panel.tree().root().unwrap();
        let strip = strip(&panel, group);
        let target = PressTarget::Tab {
            index: 0,
            close_icon: false,
        };
        let down = PointerEvent::Down {
            position: Vec2::new(10.0, 10.0),
            button: PointerButton::Middle,
            target,
        };
        let up = PointerEvent::Up {
            position: Vec2::new(11.0, 10.0),
            button: PointerButton::Middle,
            target,
        };
        panel.handle_tab_event(group, down, &strip, 0.0);
        panel.handle_tab_event(group, up, &strip, 1.0);
        assert_eq!(panel.host().closed, vec![id("a")]);
        assert_eq!(panel.tree().len(), 2);
    }
}
