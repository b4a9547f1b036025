//! Persisted layout format.
//!
//! ```json
//! { "main": { "type": "split-area", "orientation": "horizontal",
//!             "children": [ { "type": "tab-area", "widgets": [1, 2], "currentIndex": 0 }, ... ],
//!             "sizes": [0.5, 0.5] } }
//! ```

use serde::{Deserialize, Serialize};

use crate::error::DockResult;
use crate::pane::PaneId;
use crate::types::Orientation;

/// Saved arrangement of a dock panel. `main` is `None` for an empty panel.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LayoutConfig {
    #[serde(default)]
    pub main: Option<AreaConfig>,
}

impl LayoutConfig {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_json(json: &str) -> DockResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> DockResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Every pane id referenced by the config, in document order, duplicates included.
    pub fn pane_ids(&self) -> Vec<PaneId> {
        let mut ids = Vec::new();
        if let Some(main) = &self.main {
            main.collect_ids(&mut ids);
        }
        ids
    }
}

/// One node of a saved layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum AreaConfig {
    TabArea(TabAreaConfig),
    SplitArea(SplitAreaConfig),
}

impl AreaConfig {
    fn collect_ids(&self, out: &mut Vec<PaneId>) {
        match self {
            AreaConfig::TabArea(tabs) => out.extend(tabs.widgets.iter().copied()),
            AreaConfig::SplitArea(split) => {
                for child in &split.children {
                    child.collect_ids(out);
                }
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TabAreaConfig {
    pub widgets: Vec<PaneId>,
    /// Signed so that malformed negative values survive parsing and get clamped.
    #[serde(default)]
    pub current_index: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SplitAreaConfig {
    pub orientation: Orientation,
    pub children: Vec<AreaConfig>,
    /// Relative sizes, parallel to `children`.
    #[serde(default)]
    pub sizes: Vec<f32>,
}
