//! The closed set of commands accepted by the transition function.

use serde::{Deserialize, Serialize};

use crate::geometry::Point;
use crate::{EditorObject, ObjectId, ObjectPatch, Snapshot};

/// How a command interacts with the history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandCategory {
    /// Creates a new undoable checkpoint and clears the redo stack.
    Edit,
    /// Moves the undo/redo cursor without creating checkpoints.
    Navigation,
    /// Changes only the current selection; never recorded.
    Selection,
    /// Replaces the whole history with a fresh document.
    Checkpoint,
}

/// An intent issued by the view or input layer.
///
/// Serialized as a JSON object tagged by `"type"`, e.g.
/// `{"type": "bringToFront", "id": "obj-1"}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Command {
    /// Change the selection. `None` clears it.
    Select {
        /// Object to select.
        #[serde(default)]
        id: Option<ObjectId>,
    },
    /// Append an object on top and select it.
    AddObject {
        /// The fully-populated object.
        object: EditorObject,
    },
    /// Merge attribute changes into an object.
    UpdateObject {
        /// Target object.
        id: ObjectId,
        /// Attributes to change.
        changes: ObjectPatch,
    },
    /// Remove an object.
    DeleteObject {
        /// Target object.
        id: ObjectId,
    },
    /// Move an object to the top of the paint order.
    BringToFront {
        /// Target object.
        id: ObjectId,
    },
    /// Move an object to the bottom of the paint order.
    SendToBack {
        /// Target object.
        id: ObjectId,
    },
    /// Show or hide an object.
    SetVisibility {
        /// Target object.
        id: ObjectId,
        /// New visibility.
        visible: bool,
    },
    /// Lock or unlock an object.
    SetLock {
        /// Target object.
        id: ObjectId,
        /// New lock state.
        locked: bool,
    },
    /// Set the zoom factor (clamped).
    SetZoom {
        /// Requested zoom.
        zoom: f64,
    },
    /// Set zoom and pan together as one undoable step.
    SetViewport {
        /// Requested zoom.
        zoom: f64,
        /// New pan offset.
        pan: Point,
    },
    /// Set the pan offset.
    SetPan {
        /// New pan offset.
        pan: Point,
    },
    /// Start over with an empty document and no history.
    Reset,
    /// Remove every object except regions.
    ClearAll,
    /// Step back one checkpoint.
    Undo,
    /// Step forward one checkpoint.
    Redo,
    /// Replace the document and drop all history.
    ImportState {
        /// The document to load.
        snapshot: Snapshot,
    },
}

impl Command {
    /// Short name for logging.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Select { .. } => "select",
            Self::AddObject { .. } => "addObject",
            Self::UpdateObject { .. } => "updateObject",
            Self::DeleteObject { .. } => "deleteObject",
            Self::BringToFront { .. } => "bringToFront",
            Self::SendToBack { .. } => "sendToBack",
            Self::SetVisibility { .. } => "setVisibility",
            Self::SetLock { .. } => "setLock",
            Self::SetZoom { .. } => "setZoom",
            Self::SetViewport { .. } => "setViewport",
            Self::SetPan { .. } => "setPan",
            Self::Reset => "reset",
            Self::ClearAll => "clearAll",
            Self::Undo => "undo",
            Self::Redo => "redo",
            Self::ImportState { .. } => "importState",
        }
    }

    /// How this command treats the history.
    #[must_use]
    pub const fn category(&self) -> CommandCategory {
        match self {
            Self::Select { .. } => CommandCategory::Selection,
            Self::Undo | Self::Redo => CommandCategory::Navigation,
            Self::Reset | Self::ImportState { .. } => CommandCategory::Checkpoint,
            Self::AddObject { .. }
            | Self::UpdateObject { .. }
            | Self::DeleteObject { .. }
            | Self::BringToFront { .. }
            | Self::SendToBack { .. }
            | Self::SetVisibility { .. }
            | Self::SetLock { .. }
            | Self::SetZoom { .. }
            | Self::SetViewport { .. }
            | Self::SetPan { .. }
            | Self::ClearAll => CommandCategory::Edit,
        }
    }

    /// The object this command targets, if any.
    #[must_use]
    pub fn target(&self) -> Option<&ObjectId> {
        match self {
            Self::Select { id } => id.as_ref(),
            Self::AddObject { object } => Some(&object.id),
            Self::UpdateObject { id, .. }
            | Self::DeleteObject { id }
            | Self::BringToFront { id }
            | Self::SendToBack { id }
            | Self::SetVisibility { id, .. }
            | Self::SetLock { id, .. } => Some(id),
            _ => None,
        }
    }
}
