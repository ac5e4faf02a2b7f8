//! Portable JSON representation of snapshots and command scripts.
//!
//! The persisted layout is a single object:
//!
//! ```json
//! {
//!   "objects": [ { "id": "obj-1", "type": "rect", "x": 10, ... } ],
//!   "selectedId": "obj-1",
//!   "zoom": 1.0,
//!   "pan": { "x": 0, "y": 0 }
//! }
//! ```
//!
//! Imported text is not trusted: every decoded snapshot is normalized before
//! it reaches the transition function.

use serde::{Deserialize, Deserializer, Serialize};

use crate::geometry::Point;
use crate::{Command, EditorError, EditorObject, EditorResult, ObjectId, Snapshot};

/// Wire form of a [`Snapshot`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotDocument {
    /// Objects in paint order.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub objects: Vec<EditorObject>,
    /// Selected object, or `null`.
    #[serde(default)]
    pub selected_id: Option<ObjectId>,
    /// Zoom factor.
    #[serde(default = "SnapshotDocument::default_zoom")]
    pub zoom: f64,
    /// Pan offset.
    #[serde(default)]
    pub pan: Point,
}

impl SnapshotDocument {
    const fn default_zoom() -> f64 {
        1.0
    }
}

impl From<SnapshotDocument> for Snapshot {
    fn from(doc: SnapshotDocument) -> Self {
        Self::from_parts(doc.objects, doc.selected_id, doc.zoom, doc.pan)
    }
}

impl From<Snapshot> for SnapshotDocument {
    fn from(snapshot: Snapshot) -> Self {
        Self::from(&snapshot)
    }
}

impl From<&Snapshot> for SnapshotDocument {
    fn from(snapshot: &Snapshot) -> Self {
        let (objects, selected_id, zoom, pan) = snapshot.to_parts();
        Self {
            objects,
            selected_id,
            zoom,
            pan,
        }
    }
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Encode a snapshot as pretty-printed JSON.
///
/// Output is deterministic: objects keep their paint order and fields are
/// written in declaration order.
///
/// # Errors
///
/// Returns [`EditorError::Serialization`] if encoding fails.
pub fn to_json(snapshot: &Snapshot) -> EditorResult<String> {
    serde_json::to_string_pretty(&SnapshotDocument::from(snapshot))
        .map_err(EditorError::Serialization)
}

/// Decode and normalize a snapshot.
///
/// # Errors
///
/// Returns [`EditorError::Parse`] if the text is not a valid snapshot.
pub fn from_json(json: &str) -> EditorResult<Snapshot> {
    serde_json::from_str::<SnapshotDocument>(json)
        .map(Snapshot::from)
        .map_err(EditorError::Parse)
}

/// Decode a JSON array of commands.
///
/// # Errors
///
/// Returns [`EditorError::Parse`] if the text is not a valid command list.
pub fn commands_from_json(json: &str) -> EditorResult<Vec<Command>> {
    serde_json::from_str(json).map_err(EditorError::Parse)
}

/// Encode commands as a JSON array.
///
/// # Errors
///
/// Returns [`EditorError::Serialization`] if encoding fails.
pub fn commands_to_json(commands: &[Command]) -> EditorResult<String> {
    serde_json::to_string_pretty(commands).map_err(EditorError::Serialization)
}
