//! Tunable behaviour of a dock panel.
//!
//! Settings are plain data with serde support so an application can keep them
//! next to its persisted layout. Builder-style setters mirror the defaults.

use serde::{Deserialize, Serialize};

use crate::error::DockResult;

/// Whether the panel shows many tab groups or a single maximised one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DockMode {
    #[default]
    MultipleDocument,
    /// Every pane lives in one tab group; edge drops are disabled.
    SingleDocument,
}

/// Which tab becomes active after the active tab is removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RemoveBehavior {
    /// The tab that slid into the removed slot (or the new last tab).
    #[default]
    SelectTabAfter,
    /// The tab before the removed one (or the first tab).
    SelectTabBefore,
    /// The tab that was active before the removed one; falls back to
    /// [`SelectTabAfter`](Self::SelectTabAfter) when that tab is gone.
    SelectPreviousTab,
}

/// Whether an inserted tab becomes active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InsertBehavior {
    /// Keep the current tab. An empty group still activates its first tab.
    None,
    /// Always activate the inserted tab.
    SelectTab,
    /// Activate only when the group had no active tab.
    #[default]
    SelectTabIfNeeded,
}

/// Distance from each panel edge inside which a drop targets the panel root.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EdgeThresholds {
    pub top: f32,
    pub left: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Default for EdgeThresholds {
    fn default() -> Self {
        Self {
            top: 12.0,
            left: 40.0,
            right: 40.0,
            bottom: 40.0,
        }
    }
}

impl EdgeThresholds {
    /// The same threshold on every side.
    pub fn uniform(value: f32) -> Self {
        Self {
            top: value,
            left: value,
            right: value,
            bottom: value,
        }
    }
}

/// Tab drag gesture tuning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DragSettings {
    /// Movement on either axis before a press becomes a drag.
    pub drag_threshold: f32,
    /// Distance outside the tab strip before a detach is requested.
    pub detach_threshold: f32,
    /// How long the released tab animates into place.
    pub settle_duration_ms: f64,
    pub tabs_movable: bool,
    pub add_button_enabled: bool,
}

impl Default for DragSettings {
    fn default() -> Self {
        Self {
            drag_threshold: 5.0,
            detach_threshold: 20.0,
            settle_duration_ms: 150.0,
            tabs_movable: true,
            add_button_enabled: false,
        }
    }
}

/// Complete dock configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DockSettings {
    /// Split handle thickness.
    pub spacing: f32,
    pub tab_bar_height: f32,
    pub mode: DockMode,
    pub edges: EdgeThresholds,
    pub drag: DragSettings,
    pub insert_behavior: InsertBehavior,
    pub remove_behavior: RemoveBehavior,
}

impl Default for DockSettings {
    fn default() -> Self {
        Self {
            spacing: 4.0,
            tab_bar_height: 24.0,
            mode: DockMode::default(),
            edges: EdgeThresholds::default(),
            drag: DragSettings::default(),
            insert_behavior: InsertBehavior::default(),
            remove_behavior: RemoveBehavior::default(),
        }
    }
}

impl DockSettings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse settings from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> DockResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> DockResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn with_spacing(mut self, spacing: f32) -> Self {
        self.spacing = spacing.max(0.0);
        self
    }

    pub fn with_tab_bar_height(mut self, height: f32) -> Self {
        self.tab_bar_height = height.max(0.0);
        self
    }

    pub fn with_mode(mut self, mode: DockMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_edges(mut self, edges: EdgeThresholds) -> Self {
        self.edges = edges;
        self
    }

    pub fn with_drag(mut self, drag: DragSettings) -> Self {
        self.drag = drag;
        self
    }

    pub fn with_insert_behavior(mut self, behavior: InsertBehavior) -> Self {
        self.insert_behavior = behavior;
        self
    }

    pub fn with_remove_behavior(mut self, behavior: RemoveBehavior) -> Self {
        self.remove_behavior = behavior;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = DockSettings::default();
        assert_eq!(settings.spacing, 4.0);
        assert_eq!(settings.tab_bar_height, 24.0);
        assert_eq!(settings.edges.top, 12.0);
        assert_eq!(settings.edges.left, 40.0);
        assert_eq!(settings.drag.drag_threshold, 5.0);
        assert_eq!(settings.drag.detach_threshold, 20.0);
        assert_eq!(settings.remove_behavior, RemoveBehavior::SelectTabAfter);
        assert_eq!(settings.insert_behavior, InsertBehavior::SelectTabIfNeeded);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let settings = DockSettings::from_json(
            r#"{ "mode": "single-document", "edges": { "top": 20 }, "remove_behavior": "select-previous-tab" }"#,
        )
        .unwrap();
        assert_eq!(settings.mode, DockMode::SingleDocument);
        assert_eq!(settings.edges.top, 20.0);
        assert_eq!(settings.edges.left, 40.0);
        assert_eq!(settings.remove_behavior, RemoveBehavior::SelectPreviousTab);
        assert_eq!(settings.spacing, 4.0);
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        assert!(DockSettings::from_json("{ spacing: ").is_err());
    }

    #[test]
    fn test_builder() {
        let settings = DockSettings::new()
            .with_spacing(-3.0)
            .with_tab_bar_height(30.0)
            .with_edges(EdgeThresholds::uniform(8.0));
        assert_eq!(settings.spacing, 0.0);
        assert_eq!(settings.tab_bar_height, 30.0);
        assert_eq!(settings.edges.bottom, 8.0);
    }
}
