//! Document snapshots - one immutable state of the layout.

use std::collections::HashSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::geometry::{clamp, Point};
use crate::schema::SnapshotDocument;
use crate::{EditorObject, ObjectId};

/// Smallest allowed zoom factor.
pub const MIN_ZOOM: f64 = 0.2;

/// Largest allowed zoom factor.
pub const MAX_ZOOM: f64 = 4.0;

/// Clamp a requested zoom factor into `[MIN_ZOOM, MAX_ZOOM]`.
#[must_use]
pub fn clamp_zoom(zoom: f64) -> f64 {
    clamp(zoom, MIN_ZOOM, MAX_ZOOM)
}

/// The objects, selection and viewport of the document at one point in time.
///
/// Objects are held behind [`Arc`] so that snapshots in the history share
/// every object a command did not touch. A published snapshot is never
/// mutated; commands build a new one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "SnapshotDocument", into = "SnapshotDocument")]
pub struct Snapshot {
    /// Objects in paint order.
    objects: Vec<Arc<EditorObject>>,
    /// Currently selected object.
    selected_id: Option<ObjectId>,
    /// Zoom factor (1.0 = 100%).
    zoom: f64,
    /// Pan offset.
    pan: Point,
}

impl Default for Snapshot {
    fn default() -> Self {
        Self::new()
    }
}

impl Snapshot {
    /// Create an empty document at 100% zoom with no pan.
    #[must_use]
    pub fn new() -> Self {
        Self {
            objects: Vec::new(),
            selected_id: None,
            zoom: 1.0,
            pan: Point::default(),
        }
    }

    /// Assemble a snapshot from loose parts and normalize it.
    #[must_use]
    pub fn from_parts(
        objects: Vec<EditorObject>,
        selected_id: Option<ObjectId>,
        zoom: f64,
        pan: Point,
    ) -> Self {
        Self {
            objects: objects.into_iter().map(Arc::new).collect(),
            selected_id,
            zoom,
            pan,
        }
        .normalized()
    }

    /// Objects in render order (lowest z-index first).
    pub fn objects(&self) -> impl Iterator<Item = &EditorObject> {
        self.objects.iter().map(AsRef::as_ref)
    }

    /// The shared object handles, in render order.
    #[must_use]
    pub fn object_handles(&self) -> &[Arc<EditorObject>] {
        &self.objects
    }

    /// Get an object by ID.
    #[must_use]
    pub fn object(&self, id: &ObjectId) -> Option<&EditorObject> {
        self.objects
            .iter()
            .find(|object| object.id == *id)
            .map(AsRef::as_ref)
    }

    /// Position of an object in render order.
    #[must_use]
    pub fn position(&self, id: &ObjectId) -> Option<usize> {
        self.objects.iter().position(|object| object.id == *id)
    }

    /// Check whether an object with this ID exists.
    #[must_use]
    pub fn contains(&self, id: &ObjectId) -> bool {
        self.position(id).is_some()
    }

    /// The selected object ID, if any.
    #[must_use]
    pub fn selected_id(&self) -> Option<&ObjectId> {
        self.selected_id.as_ref()
    }

    /// The selected object, if any.
    #[must_use]
    pub fn selected(&self) -> Option<&EditorObject> {
        self.selected_id.as_ref().and_then(|id| self.object(id))
    }

    /// Current zoom factor.
    #[must_use]
    pub const fn zoom(&self) -> f64 {
        self.zoom
    }

    /// Current pan offset.
    #[must_use]
    pub const fn pan(&self) -> Point {
        self.pan
    }

    /// Number of objects.
    #[must_use]
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Check if the document has no objects.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Check that z-indices are exactly `0..len` in array order.
    #[must_use]
    pub fn is_normalized(&self) -> bool {
        self.objects
            .iter()
            .enumerate()
            .all(|(index, object)| object.z_index == index)
    }

    /// Return a copy that satisfies every document invariant.
    ///
    /// Later duplicates of an ID are dropped, every object is repaired with
    /// [`EditorObject::repair`], zoom is clamped, a non-finite pan component
    /// becomes 0, a selection naming a missing object is cleared, and
    /// z-indices are re-derived from array position. Already-normal snapshots
    /// come back unchanged and keep sharing their objects.
    #[must_use]
    pub fn normalized(&self) -> Self {
        let mut seen = HashSet::with_capacity(self.objects.len());
        let mut objects = Vec::with_capacity(self.objects.len());
        for object in &self.objects {
            if !seen.insert(&object.id) {
                tracing::warn!("Dropping object with duplicate id {}", object.id);
                continue;
            }
            let mut object = Arc::clone(object);
            if !object.is_sound() {
                Arc::make_mut(&mut object).repair();
            }
            objects.push(object);
        }

        let mut snapshot = Self {
            objects,
            selected_id: self.selected_id.clone(),
            zoom: clamp_zoom(self.zoom),
            pan: finite_pan(self.pan),
        };
        snapshot.reindex();
        if snapshot.selected().is_none() {
            snapshot.selected_id = None;
        }
        snapshot
    }

    // -----------------------------------------------------------------------
    // Mutation helpers for the reducer. Only ever called on a fresh copy.
    // -----------------------------------------------------------------------

    /// Re-derive every z-index from array position.
    ///
    /// Objects whose index already matches keep sharing storage.
    pub(crate) fn reindex(&mut self) {
        for (index, object) in self.objects.iter_mut().enumerate() {
            if object.z_index != index {
                Arc::make_mut(object).z_index = index;
            }
        }
    }

    /// Append an object on top of the paint order.
    pub(crate) fn push_object(&mut self, mut object: EditorObject) {
        object.z_index = self.objects.len();
        self.objects.push(Arc::new(object));
    }

    /// Remove an object, returning it if it existed.
    pub(crate) fn remove_object(&mut self, id: &ObjectId) -> Option<Arc<EditorObject>> {
        let index = self.position(id)?;
        Some(self.objects.remove(index))
    }

    /// Apply `f` to the object with `id`. Returns `false` if there is none.
    pub(crate) fn update_object<F>(&mut self, id: &ObjectId, f: F) -> bool
    where
        F: FnOnce(&mut EditorObject),
    {
        let Some(index) = self.position(id) else {
            return false;
        };
        f(Arc::make_mut(&mut self.objects[index]));
        true
    }

    /// Move an object to the top of the paint order.
    pub(crate) fn move_to_front(&mut self, id: &ObjectId) -> bool {
        let Some(object) = self.remove_object(id) else {
            return false;
        };
        self.objects.push(object);
        true
    }

    /// Move an object to the bottom of the paint order.
    pub(crate) fn move_to_back(&mut self, id: &ObjectId) -> bool {
        let Some(object) = self.remove_object(id) else {
            return false;
        };
        self.objects.insert(0, object);
        true
    }

    /// Keep only the objects matching `keep`.
    pub(crate) fn retain_objects<F>(&mut self, mut keep: F)
    where
        F: FnMut(&EditorObject) -> bool,
    {
        self.objects.retain(|object| keep(object));
    }

    pub(crate) fn set_selected(&mut self, id: Option<ObjectId>) {
        self.selected_id = id;
    }

    /// Store a zoom factor, clamped.
    pub(crate) fn set_zoom(&mut self, zoom: f64) {
        self.zoom = clamp_zoom(zoom);
    }

    pub(crate) fn set_pan(&mut self, pan: Point) {
        self.pan = pan;
    }

    /// Decompose into loose parts (objects are cloned out of their handles).
    pub(crate) fn to_parts(&self) -> (Vec<EditorObject>, Option<ObjectId>, f64, Point) {
        (
            self.objects().cloned().collect(),
            self.selected_id.clone(),
            self.zoom,
            self.pan,
        )
    }
}

fn finite_pan(pan: Point) -> Point {
    let finite = |v: f64| if v.is_finite() { v } else { 0.0 };
    Point::new(finite(pan.x), finite(pan.y))
}
