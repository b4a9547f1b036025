//! Error types for dock operations.

use thiserror::Error;

use crate::pane::PaneId;
use crate::tree::NodeId;

/// Errors raised by dock tree and panel operations.
///
/// These report caller mistakes (a reference pane that is not in the tree, a
/// stale node handle). Layout restoration is lenient and does not use them for
/// semantic problems in a config.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DockError {
    /// Pane is not present in the tree.
    #[error("pane {0} is not in the layout")]
    PaneNotFound(PaneId),
    /// Pane id is already in the layout.
    #[error("pane {0} is already in the layout")]
    DuplicatePane(PaneId),
    /// Node handle is stale or never existed.
    #[error("node {0} not found")]
    NodeNotFound(NodeId),
    /// Node exists but is not a tab group.
    #[error("node {0} is not a tab group")]
    NotATabGroup(NodeId),
    /// Handle does not exist on the referenced split.
    #[error("handle {index} not found on split {split}")]
    HandleNotFound { split: NodeId, index: usize },
    /// Tab index out of bounds.
    #[error("tab index {index} out of bounds for group of {len}")]
    InvalidTabIndex { index: usize, len: usize },
    /// Persisted layout or settings could not be parsed at all.
    #[error("invalid layout data: {0}")]
    InvalidLayout(String),
}

impl From<serde_json::Error> for DockError {
    fn from(err: serde_json::Error) -> Self {
        DockError::InvalidLayout(err.to_string())
    }
}

/// Result type for dock operations.
pub type DockResult<T> = Result<T, DockError>;
