//! Tab reorder and detach gesture for one tab strip at a time.
//!
//! The controller is driven entirely from outside: pointer and key events go
//! through [`DragController::handle_event`], the release animation advances
//! with [`DragController::tick`], and [`DragController::cancel`] aborts. Each
//! call returns the [`DragEffect`]s the owner must apply.

use astrelis_core::math::Vec2;
use tracing::{debug, trace};

use crate::settings::DragSettings;
use crate::tree::NodeId;
use crate::types::{LayoutRect, Orientation};

/// Mouse buttons the gesture distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Middle,
    Secondary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Escape,
    Other,
}

/// What part of the tab strip an event landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PressTarget {
    Tab { index: usize, close_icon: bool },
    AddButton,
    Nothing,
}

/// Input to the controller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Down {
        position: Vec2,
        button: PointerButton,
        target: PressTarget,
    },
    Move {
        position: Vec2,
    },
    Up {
        position: Vec2,
        button: PointerButton,
        target: PressTarget,
    },
    KeyDown(Key),
    ContextMenu,
}

/// Geometry of one tab along the strip axis, relative to the strip content.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TabLayout {
    pub pos: f32,
    pub size: f32,
    /// Gap before this tab.
    pub margin: f32,
}

/// Snapshot of a tab strip supplied by the renderer.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TabStripLayout {
    pub orientation: Orientation,
    /// Screen rectangle holding the tabs.
    pub content_rect: LayoutRect,
    pub tabs: Vec<TabLayout>,
}

impl TabStripLayout {
    /// Lay tabs of the given extents end to end, `margin` apart.
    pub fn from_sizes(
        orientation: Orientation,
        content_rect: LayoutRect,
        sizes: &[f32],
        margin: f32,
    ) -> Self {
        let mut pos = 0.0;
        let tabs = sizes
            .iter()
            .enumerate()
            .map(|(i, &size)| {
                let margin = if i == 0 { 0.0 } else { margin };
                pos += margin;
                let tab = TabLayout { pos, size, margin };
                pos += size;
                tab
            })
            .collect();
        Self {
            orientation,
            content_rect,
            tabs,
        }
    }

    fn start(&self) -> f32 {
        self.orientation.main(self.content_rect.position())
    }

    /// Screen rectangle of tab `index`.
    pub fn tab_rect(&self, index: usize) -> Option<LayoutRect> {
        let tab = self.tabs.get(index)?;
        let r = self.content_rect;
        Some(match self.orientation {
            Orientation::Horizontal => LayoutRect::new(r.x + tab.pos, r.y, tab.size, r.height),
            Orientation::Vertical => LayoutRect::new(r.x, r.y + tab.pos, r.width, tab.size),
        })
    }

    /// Tab under a screen point.
    pub fn tab_at(&self, point: Vec2) -> Option<usize> {
        (0..self.tabs.len()).find(|&i| self.tab_rect(i).is_some_and(|rect| rect.contains(point)))
    }
}

/// Externally visible phase of the gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragState {
    #[default]
    Idle,
    /// Pressed, threshold not yet exceeded.
    Pressed,
    Dragging,
    /// Released; the tab is animating into place.
    Settling,
}

/// Something the owner of the tab strip must act on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragEffect {
    /// Make tab `index` current.
    Activate { index: usize },
    DragStarted { index: usize },
    /// Force the default cursor until released.
    CursorLocked,
    CursorReleased,
    /// The tab was dragged well outside the strip. Call
    /// [`DragController::accept_detach`] to take it over; otherwise the drag
    /// continues.
    DetachRequested {
        index: usize,
        anchor: LayoutRect,
        pointer: Vec2,
        /// Press position relative to the tab's corner.
        press_offset: Vec2,
    },
    /// Commit: move tab `from` to `to`.
    Moved { from: usize, to: usize },
    CloseRequested { index: usize },
    AddRequested,
    /// The gesture ended without committing.
    Aborted,
}

/// Result of feeding one event.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DragResponse {
    /// The event belongs to the gesture and should not reach anything else.
    pub consumed: bool,
    pub effects: Vec<DragEffect>,
}

impl DragResponse {
    fn ignored() -> Self {
        Self::default()
    }

    fn consumed(effects: Vec<DragEffect>) -> Self {
        Self {
            consumed: true,
            effects,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pressed {
    Tab { index: usize, close_icon: bool },
    AddButton,
}

#[derive(Debug, Clone)]
struct Session {
    group: NodeId,
    pressed: Pressed,
    button: PointerButton,
    press: Vec2,
    dragging: bool,
    detach_requested: bool,
    layouts: Vec<TabLayout>,
    content_rect: LayoutRect,
    orientation: Orientation,
    tab_pos: f32,
    tab_size: f32,
    tab_press_pos: f32,
    target_index: usize,
    settle_deadline: Option<f64>,
}

impl Session {
    fn index(&self) -> Option<usize> {
        match self.pressed {
            Pressed::Tab { index, .. } => Some(index),
            Pressed::AddButton => None,
        }
    }
}

/// Drives tab press, drag-reorder, detach and release for a tab strip.
#[derive(Debug, Default)]
pub struct DragController {
    settings: DragSettings,
    session: Option<Session>,
    offsets: Vec<f32>,
}

impl DragController {
    pub fn new(settings: DragSettings) -> Self {
        Self {
            settings,
            session: None,
            offsets: Vec::new(),
        }
    }

    pub fn settings(&self) -> &DragSettings {
        &self.settings
    }

    /// Takes effect for the next gesture.
    pub fn set_settings(&mut self, settings: DragSettings) {
        self.settings = settings;
    }

    pub fn state(&self) -> DragState {
        match &self.session {
            None => DragState::Idle,
            Some(session) if session.settle_deadline.is_some() => DragState::Settling,
            Some(session) if session.dragging => DragState::Dragging,
            Some(_) => DragState::Pressed,
        }
    }

    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    /// Tab group the live gesture belongs to.
    pub fn group(&self) -> Option<NodeId> {
        self.session.as_ref().map(|session| session.group)
    }

    /// Index of the pressed tab.
    pub fn pressed_index(&self) -> Option<usize> {
        self.session.as_ref().and_then(Session::index)
    }

    /// Slot the dragged tab would land in if released now.
    pub fn target_index(&self) -> Option<usize> {
        self.session
            .as_ref()
            .filter(|session| session.dragging)
            .map(|session| session.target_index)
    }

    /// Visual displacement of tab `index` along the strip axis.
    pub fn offset(&self, index: usize) -> f32 {
        self.offsets.get(index).copied().unwrap_or(0.0)
    }

    pub fn offsets(&self) -> &[f32] {
        &self.offsets
    }

    /// Feed one event from the tab strip of `group`.
    ///
    /// While a gesture is live, events are routed to it regardless of
    /// `group`; presses elsewhere are ignored until it ends.
    pub fn handle_event(
        &mut self,
        group: NodeId,
        event: PointerEvent,
        strip: &TabStripLayout,
        now_ms: f64,
    ) -> DragResponse {
        match event {
            PointerEvent::Down {
                position,
                button,
                target,
            } => self.on_down(group, position, button, target, strip),
            PointerEvent::Move { position } => self.on_move(position, strip),
            PointerEvent::Up {
                position,
                button,
                target,
            } => self.on_up(position, button, target, now_ms),
            PointerEvent::KeyDown(key) => {
                if self.session.is_none() {
                    return DragResponse::ignored();
                }
                let effects = if key == Key::Escape { self.cancel() } else { Vec::new() };
                DragResponse::consumed(effects)
            }
            PointerEvent::ContextMenu => {
                if self.session.is_some() {
                    DragResponse::consumed(Vec::new())
                } else {
                    DragResponse::ignored()
                }
            }
        }
    }

    fn on_down(
        &mut self,
        group: NodeId,
        position: Vec2,
        button: PointerButton,
        target: PressTarget,
        strip: &TabStripLayout,
    ) -> DragResponse {
        if self.session.is_some() || button == PointerButton::Secondary {
            return DragResponse::ignored();
        }

        let pressed = match target {
            PressTarget::AddButton if self.settings.add_button_enabled => Pressed::AddButton,
            PressTarget::Tab { index, close_icon } if index < strip.tabs.len() => {
                Pressed::Tab { index, close_icon }
            }
            _ => return DragResponse::ignored(),
        };

        self.session = Some(Session {
            group,
            pressed,
            button,
            press: position,
            dragging: false,
            detach_requested: false,
            layouts: Vec::new(),
            content_rect: strip.content_rect,
            orientation: strip.orientation,
            tab_pos: 0.0,
            tab_size: 0.0,
            tab_press_pos: 0.0,
            target_index: 0,
            settle_deadline: None,
        });
        trace!(%group, ?pressed, ?button, "tab strip pressed");

        let mut effects = Vec::new();
        if let Pressed::Tab {
            index,
            close_icon: false,
        } = pressed
        {
            if button == PointerButton::Primary {
                effects.push(DragEffect::Activate { index });
            }
        }
        DragResponse::consumed(effects)
    }

    fn can_drag(&self, session: &Session) -> bool {
        self.settings.tabs_movable
            && session.button == PointerButton::Primary
            && matches!(
                session.pressed,
                Pressed::Tab {
                    close_icon: false,
                    ..
                }
            )
    }

    fn on_move(&mut self, position: Vec2, strip: &TabStripLayout) -> DragResponse {
        let Some(session) = self.session.as_ref() else {
            return DragResponse::ignored();
        };
        if session.settle_deadline.is_some() || !self.can_drag(session) {
            return DragResponse::consumed(Vec::new());
        }

        let mut effects = Vec::new();
        if !session.dragging {
            let delta = position - session.press;
            let threshold = self.settings.drag_threshold;
            if delta.x.abs() < threshold && delta.y.abs() < threshold {
                return DragResponse::consumed(effects);
            }
            if !self.start_drag(strip) {
                return DragResponse::consumed(effects);
            }
            if let Some(index) = self.pressed_index() {
                effects.push(DragEffect::DragStarted { index });
            }
            effects.push(DragEffect::CursorLocked);
        }

        let detach = self.settings.detach_threshold;
        if let Some(session) = self.session.as_mut() {
            let r = session.content_rect;
            let outside = position.x < r.x - detach
                || position.x >= r.right() + detach
                || position.y < r.y - detach
                || position.y >= r.bottom() + detach;
            if outside && !session.detach_requested {
                session.detach_requested = true;
                if let Some(index) = session.index() {
                    let anchor = tab_anchor(session);
                    effects.push(DragEffect::DetachRequested {
                        index,
                        anchor,
                        pointer: position,
                        press_offset: session.press - anchor.position(),
                    });
                    debug!(group = %session.group, index, "tab detach requested");
                }
            }
        }

        self.layout_tabs(position);
        DragResponse::consumed(effects)
    }

    /// Snapshot the strip and enter the dragging phase.
    fn start_drag(&mut self, strip: &TabStripLayout) -> bool {
        let Some(session) = self.session.as_mut() else {
            return false;
        };
        let Some(index) = session.index() else {
            return false;
        };
        let Some(tab) = strip.tabs.get(index).copied() else {
            return false;
        };

        session.layouts = strip.tabs.clone();
        session.content_rect = strip.content_rect;
        session.orientation = strip.orientation;
        session.tab_pos = tab.pos;
        session.tab_size = tab.size;
        session.tab_press_pos = strip.orientation.main(session.press) - strip.start() - tab.pos;
        session.target_index = index;
        session.dragging = true;
        self.offsets = vec![0.0; strip.tabs.len()];
        debug!(group = %session.group, index, "tab drag started");
        true
    }

    /// Displace siblings whose midpoint the dragged tab has crossed.
    fn layout_tabs(&mut self, position: Vec2) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        let Some(index) = session.index() else {
            return;
        };

        let start = session.orientation.main(session.content_rect.position());
        let client_size = session.content_rect.extent(session.orientation);
        let client_pos = session.orientation.main(position);
        let press_pos = session.orientation.main(session.press);

        let target_pos = client_pos - start - session.tab_press_pos;
        let target_end = target_pos + session.tab_size;
        let mut target_index = index;

        for (i, layout) in session.layouts.iter().enumerate() {
            let threshold = layout.pos + layout.size / 2.0;
            let offset = if i < index && target_pos < threshold {
                target_index = target_index.min(i);
                let next_margin = session.layouts.get(i + 1).map_or(0.0, |next| next.margin);
                session.tab_size + next_margin
            } else if i > index && target_end > threshold {
                target_index = target_index.max(i);
                -session.tab_size - layout.margin
            } else if i == index {
                let ideal = client_pos - press_pos;
                let limit = client_size - (session.tab_pos + session.tab_size);
                ideal.min(limit).max(-session.tab_pos)
            } else {
                0.0
            };
            if let Some(slot) = self.offsets.get_mut(i) {
                *slot = offset;
            }
        }
        session.target_index = target_index;
    }

    fn on_up(
        &mut self,
        position: Vec2,
        button: PointerButton,
        target: PressTarget,
        now_ms: f64,
    ) -> DragResponse {
        let Some(session) = self.session.as_ref() else {
            return DragResponse::ignored();
        };
        if session.settle_deadline.is_some() {
            return DragResponse::consumed(Vec::new());
        }
        if button == PointerButton::Secondary {
            return DragResponse::ignored();
        }

        if !session.dragging {
            let pressed = session.pressed;
            self.session = None;
            trace!(?position, ?target, "tab strip click");
            let effects = match (pressed, target) {
                (Pressed::AddButton, PressTarget::AddButton) => vec![DragEffect::AddRequested],
                (Pressed::Tab { index, .. }, PressTarget::Tab { index: released, close_icon })
                    if index == released && (button == PointerButton::Middle || close_icon) =>
                {
                    vec![DragEffect::CloseRequested { index }]
                }
                _ => Vec::new(),
            };
            return DragResponse::consumed(effects);
        }

        if button != PointerButton::Primary {
            return DragResponse::consumed(Vec::new());
        }

        self.finalize_position();
        let duration = self.settings.settle_duration_ms.max(0.0);
        if let Some(session) = self.session.as_mut() {
            session.settle_deadline = Some(now_ms + duration);
        }
        if duration == 0.0 {
            return DragResponse::consumed(self.tick(now_ms));
        }
        DragResponse::consumed(Vec::new())
    }

    /// Move the dragged tab to its resting slot, clamped to the strip.
    fn finalize_position(&mut self) {
        let Some(session) = self.session.as_ref() else {
            return;
        };
        let Some(index) = session.index() else {
            return;
        };
        let target = session.target_index;
        let ideal = match session.layouts.get(target) {
            Some(_) if target == index => 0.0,
            Some(tgt) if target > index => tgt.pos + tgt.size - session.tab_size - session.tab_pos,
            Some(tgt) => tgt.pos - session.tab_pos,
            None => 0.0,
        };
        let client_size = session.content_rect.extent(session.orientation);
        let limit = client_size - (session.tab_pos + session.tab_size);
        let resting = ideal.min(limit).max(-session.tab_pos);
        if let Some(slot) = self.offsets.get_mut(index) {
            *slot = resting;
        }
    }

    /// Advance the release animation. Commits once the settle deadline passes.
    pub fn tick(&mut self, now_ms: f64) -> Vec<DragEffect> {
        let due = self
            .session
            .as_ref()
            .and_then(|session| session.settle_deadline)
            .is_some_and(|deadline| now_ms >= deadline);
        if !due {
            return Vec::new();
        }
        let Some(session) = self.session.take() else {
            return Vec::new();
        };

        self.offsets.clear();
        let mut effects = vec![DragEffect::CursorReleased];
        if let Some(from) = session.index() {
            if session.target_index != from {
                effects.push(DragEffect::Moved {
                    from,
                    to: session.target_index,
                });
            }
            debug!(group = %session.group, from, to = session.target_index, "tab drag committed");
        }
        effects
    }

    /// Abort the live gesture without committing. Idempotent.
    pub fn cancel(&mut self) -> Vec<DragEffect> {
        let Some(session) = self.session.take() else {
            return Vec::new();
        };
        self.offsets.clear();
        debug!(group = %session.group, "tab drag aborted");
        if session.dragging {
            vec![DragEffect::CursorReleased, DragEffect::Aborted]
        } else {
            vec![DragEffect::Aborted]
        }
    }

    /// Hand a detach-requested tab over to an external drag.
    pub fn accept_detach(&mut self) -> Vec<DragEffect> {
        let requested = self
            .session
            .as_ref()
            .is_some_and(|session| session.detach_requested && session.settle_deadline.is_none());
        if !requested {
            return Vec::new();
        }
        self.session = None;
        self.offsets.clear();
        vec![DragEffect::CursorReleased]
    }
}

/// Screen rectangle of the dragged tab at its original slot.
fn tab_anchor(session: &Session) -> LayoutRect {
    let r = session.content_rect;
    match session.orientation {
        Orientation::Horizontal => {
            LayoutRect::new(r.x + session.tab_pos, r.y, session.tab_size, r.height)
        }
        Orientation::Vertical => {
            LayoutRect::new(r.x, r.y + session.tab_pos, r.width, session.tab_size)
        }
    }
}
