//! The transition function: `(History, Command) -> History`.
//!
//! Every document mutation passes through [`reduce`], which owns the
//! invariants of the model:
//!
//! - z-indices are re-derived from array position after every edit
//! - the selection always names an existing object (or nothing)
//! - zoom stays within `[MIN_ZOOM, MAX_ZOOM]`
//! - every stored object is sound (see [`EditorObject::is_sound`])
//!
//! Commands naming an object that does not exist leave the history exactly
//! as it was. They are logged at `debug` level and otherwise ignored.

use crate::geometry::Point;
use crate::{Command, EditorObject, History, ObjectId, ObjectPatch, Snapshot};

/// Compute the history that results from applying `command`.
///
/// Pure and deterministic: the same history and command always produce the
/// same result. Never fails.
#[must_use]
pub fn reduce(history: History, command: Command) -> History {
    tracing::debug!(
        command = command.name(),
        category = ?command.category(),
        object = ?command.target(),
        "Reducing command"
    );

    match command {
        Command::Undo => {
            if !history.can_undo() {
                tracing::debug!("Nothing to undo");
            }
            history.undo()
        }
        Command::Redo => {
            if !history.can_redo() {
                tracing::debug!("Nothing to redo");
            }
            history.redo()
        }
        Command::Reset => {
            tracing::info!("Resetting document");
            history.restart(Snapshot::new())
        }
        Command::ImportState { snapshot } => {
            tracing::info!("Importing document with {} objects", snapshot.len());
            history.restart(snapshot)
        }
        Command::Select { id } => match select(history.present(), id) {
            Some(next) => history.replace_present(next),
            None => history,
        },
        Command::AddObject { object } => {
            let next = add_object(history.present(), object);
            commit(history, next)
        }
        Command::UpdateObject { id, changes } => {
            let next = update_object(history.present(), &id, &changes);
            commit(history, next)
        }
        Command::DeleteObject { id } => {
            let next = delete_object(history.present(), &id);
            commit(history, next)
        }
        Command::BringToFront { id } => {
            let next = reorder(history.present(), &id, Snapshot::move_to_front);
            commit(history, next)
        }
        Command::SendToBack { id } => {
            let next = reorder(history.present(), &id, Snapshot::move_to_back);
            commit(history, next)
        }
        Command::SetVisibility { id, visible } => {
            let next = update_with(history.present(), &id, |object| object.visible = visible);
            commit(history, next)
        }
        Command::SetLock { id, locked } => {
            let next = update_with(history.present(), &id, |object| object.locked = locked);
            commit(history, next)
        }
        Command::SetZoom { zoom } => {
            let mut next = history.present().clone();
            next.set_zoom(zoom);
            commit(history, Some(next))
        }
        Command::SetViewport { zoom, pan } => {
            let next = set_pan(history.present(), pan).map(|mut next| {
                next.set_zoom(zoom);
                next
            });
            commit(history, next)
        }
        Command::SetPan { pan } => {
            let next = set_pan(history.present(), pan);
            commit(history, next)
        }
        Command::ClearAll => {
            let next = clear_all(history.present());
            commit(history, Some(next))
        }
    }
}

/// Record `next` as a checkpoint, or keep the history when there is nothing to record.
fn commit(history: History, next: Option<Snapshot>) -> History {
    match next {
        Some(mut next) => {
            next.reindex();
            history.commit(next)
        }
        None => history,
    }
}

fn missing(id: &ObjectId) -> Option<Snapshot> {
    tracing::debug!("No object with id {id}; ignoring");
    None
}

fn select(present: &Snapshot, id: Option<ObjectId>) -> Option<Snapshot> {
    if let Some(id) = &id {
        if !present.contains(id) {
            return missing(id);
        }
    }
    let mut next = present.clone();
    next.set_selected(id);
    Some(next)
}

fn add_object(present: &Snapshot, mut object: EditorObject) -> Option<Snapshot> {
    if present.contains(&object.id) {
        tracing::warn!("Object {} already exists; ignoring add", object.id);
        return None;
    }
    if !object.is_sound() {
        tracing::debug!("Repairing invalid attributes of {}", object.id);
        object.repair();
    }
    let id = object.id.clone();
    let mut next = present.clone();
    next.push_object(object);
    next.set_selected(Some(id));
    Some(next)
}

fn update_with<F>(present: &Snapshot, id: &ObjectId, f: F) -> Option<Snapshot>
where
    F: FnOnce(&mut EditorObject),
{
    if !present.contains(id) {
        return missing(id);
    }
    let mut next = present.clone();
    next.update_object(id, f);
    Some(next)
}

fn update_object(present: &Snapshot, id: &ObjectId, changes: &ObjectPatch) -> Option<Snapshot> {
    update_with(present, id, |object| object.apply_patch(changes))
}

fn delete_object(present: &Snapshot, id: &ObjectId) -> Option<Snapshot> {
    let mut next = present.clone();
    if next.remove_object(id).is_none() {
        return missing(id);
    }
    if present.selected_id() == Some(id) {
        next.set_selected(None);
    }
    Some(next)
}

fn reorder(
    present: &Snapshot,
    id: &ObjectId,
    mv: fn(&mut Snapshot, &ObjectId) -> bool,
) -> Option<Snapshot> {
    let mut next = present.clone();
    if mv(&mut next, id) {
        Some(next)
    } else {
        missing(id)
    }
}

fn set_pan(present: &Snapshot, pan: Point) -> Option<Snapshot> {
    if !(pan.x.is_finite() && pan.y.is_finite()) {
        tracing::debug!("Ignoring non-finite pan {pan:?}");
        return None;
    }
    let mut next = present.clone();
    next.set_pan(pan);
    Some(next)
}

/// Keep the region backdrop, drop everything else.
fn clear_all(present: &Snapshot) -> Snapshot {
    let mut next = present.clone();
    next.retain_objects(EditorObject::is_region);
    next.set_selected(None);
    tracing::info!(
        "Cleared {} objects, kept {} regions",
        present.len() - next.len(),
        next.len()
    );
    next
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ObjectType, MAX_ZOOM, MIN_ZOOM};

    fn rect(id: &str) -> EditorObject {
        EditorObject::with_defaults(id.into(), ObjectType::Rect, Point::new(0.0, 0.0))
    }

    fn with_objects(ids: &[&str]) -> History {
        ids.iter().fold(History::new(), |history, id| {
            history.apply(Command::AddObject { object: rect(id) })
        })
    }

    fn ids(history: &History) -> Vec<&str> {
        history.present().objects().map(|o| o.id.as_str()).collect()
    }

    #[test]
    fn test_add_selects_and_normalizes() {
        let history = with_objects(&["a", "b"]);
        assert_eq!(ids(&history), vec!["a", "b"]);
        assert!(history.present().is_normalized());
        assert_eq!(history.present().selected_id().map(ObjectId::as_str), Some("b"));
        assert_eq!(history.past_len(), 2);
    }

    #[test]
    fn test_add_duplicate_id_is_ignored() {
        let history = with_objects(&["a"]);
        let before = history.clone();
        let after = history.apply(Command::AddObject { object: rect("a") });
        assert_eq!(after, before);
    }

    #[test]
    fn test_add_repairs_object() {
        let mut faded = rect("a");
        faded.opacity = 3.0;
        faded.x = f64::NAN;
        faded.width = f64::INFINITY;
        let history = History::new().apply(Command::AddObject { object: faded });
        let a = history.present().object(&"a".into()).expect("a");
        assert!((a.opacity - 1.0).abs() < f64::EPSILON);
        assert!(a.x.abs() < f64::EPSILON);
        assert!(a.width.is_finite());
        assert!(a.is_sound());
    }

    #[test]
    fn test_add_rederives_region_size() {
        let mut region = EditorObject::region("r".into(), vec![0.0, 0.0, 10.0, 10.0]);
        region.width = 999.0;
        region.height = 5.0;
        region.opacity = 7.0;
        let history = History::new().apply(Command::AddObject { object: region });
        let r = history.present().object(&"r".into()).expect("r");
        assert!((r.width - 10.0).abs() < f64::EPSILON);
        assert!((r.height - 10.0).abs() < f64::EPSILON);
        assert!((r.opacity - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_update_merges_and_missing_id_is_noop() {
        let history = with_objects(&["a"]).apply(Command::UpdateObject {
            id: "a".into(),
            changes: ObjectPatch::position(40.0, 50.0),
        });
        let a = history.present().object(&"a".into()).expect("a");
        assert!((a.x - 40.0).abs() < f64::EPSILON);
        assert!((a.y - 50.0).abs() < f64::EPSILON);

        let before = history.clone();
        let after = history.apply(Command::UpdateObject {
            id: "ghost".into(),
            changes: ObjectPatch::position(1.0, 1.0),
        });
        assert_eq!(after, before);
    }

    #[test]
    fn test_delete_clears_selection_and_renormalizes() {
        let history = with_objects(&["a", "b", "c"]).apply(Command::Select {
            id: Some("b".into()),
        });
        let history = history.apply(Command::DeleteObject { id: "b".into() });
        assert_eq!(ids(&history), vec!["a", "c"]);
        assert!(history.present().is_normalized());
        assert!(history.present().selected_id().is_none());
    }

    #[test]
    fn test_delete_keeps_unrelated_selection() {
        let history = with_objects(&["a", "b"]).apply(Command::DeleteObject { id: "a".into() });
        assert_eq!(history.present().selected_id().map(ObjectId::as_str), Some("b"));
    }

    #[test]
    fn test_reorder() {
        let history = with_objects(&["a", "b", "c"]);
        let history = history.apply(Command::BringToFront { id: "a".into() });
        assert_eq!(ids(&history), vec!["b", "c", "a"]);
        let history = history.apply(Command::SendToBack { id: "c".into() });
        assert_eq!(ids(&history), vec!["c", "b", "a"]);
        assert!(history.present().is_normalized());

        let before = history.clone();
        assert_eq!(before.clone().apply(Command::SendToBack { id: "zz".into() }), before);
    }

    #[test]
    fn test_visibility_and_lock() {
        let history = with_objects(&["a"])
            .apply(Command::SetVisibility {
                id: "a".into(),
                visible: false,
            })
            .apply(Command::SetLock {
                id: "a".into(),
                locked: true,
            });
        let a = history.present().object(&"a".into()).expect("a");
        assert!(!a.visible);
        assert!(a.locked);
        assert_eq!(history.past_len(), 3);
    }

    #[test]
    fn test_zoom_is_clamped() {
        let history = History::new().apply(Command::SetZoom { zoom: 10.0 });
        assert!((history.present().zoom() - MAX_ZOOM).abs() < f64::EPSILON);
        let history = history.apply(Command::SetZoom { zoom: -1.0 });
        assert!((history.present().zoom() - MIN_ZOOM).abs() < f64::EPSILON);
    }

    #[test]
    fn test_viewport_is_one_checkpoint() {
        let history = History::new().apply(Command::SetViewport {
            zoom: 8.0,
            pan: Point::new(-120.0, 35.0),
        });
        assert_eq!(history.past_len(), 1);
        assert!((history.present().zoom() - MAX_ZOOM).abs() < f64::EPSILON);
        assert_eq!(history.present().pan(), Point::new(-120.0, 35.0));

        let history = history.apply(Command::Undo);
        assert!((history.present().zoom() - 1.0).abs() < f64::EPSILON);
        assert_eq!(history.present().pan(), Point::default());
    }

    #[test]
    fn test_pan_is_unbounded_but_finite() {
        let history = History::new().apply(Command::SetPan {
            pan: Point::new(1.0e9, -1.0e9),
        });
        assert_eq!(history.present().pan(), Point::new(1.0e9, -1.0e9));

        let before = history.clone();
        let after = history.apply(Command::SetPan {
            pan: Point::new(f64::NAN, 0.0),
        });
        assert_eq!(after, before);
    }

    #[test]
    fn test_select_is_not_recorded() {
        let history = with_objects(&["a", "b"]);
        let past = history.past_len();
        let history = history.apply(Command::Select {
            id: Some("a".into()),
        });
        assert_eq!(history.past_len(), past);
        assert_eq!(history.present().selected_id().map(ObjectId::as_str), Some("a"));

        let history = history.apply(Command::Select { id: None });
        assert!(history.present().selected_id().is_none());

        let before = history.clone();
        assert_eq!(
            before.clone().apply(Command::Select {
                id: Some("ghost".into())
            }),
            before
        );
    }

    #[test]
    fn test_select_keeps_redo_stack() {
        let history = with_objects(&["a", "b"]).apply(Command::Undo);
        assert!(history.can_redo());
        let history = history.apply(Command::Select {
            id: Some("a".into()),
        });
        assert!(history.can_redo());
    }

    #[test]
    fn test_clear_keeps_regions() {
        let region = EditorObject::region("r".into(), vec![0.0, 0.0, 10.0, 10.0]);
        let history = with_objects(&["a"])
            .apply(Command::AddObject { object: region })
            .apply(Command::ClearAll);
        assert_eq!(ids(&history), vec!["r"]);
        assert_eq!(history.present().object(&"r".into()).map(|o| o.z_index), Some(0));
        assert!(history.present().selected_id().is_none());
    }

    #[test]
    fn test_reset_and_import_drop_history() {
        let history = with_objects(&["a", "b"]).apply(Command::Undo);
        let reset = history.clone().apply(Command::Reset);
        assert!(reset.present().is_empty());
        assert!(!reset.can_undo());
        assert!(!reset.can_redo());

        let imported = history.apply(Command::ImportState {
            snapshot: Snapshot::from_parts(vec![rect("x")], Some("x".into()), 2.0, Point::default()),
        });
        assert_eq!(ids(&imported), vec!["x"]);
        assert!(!imported.can_undo());
        assert!(!imported.can_redo());
        assert!((imported.present().zoom() - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_undo_redo_on_empty_stacks_are_identity() {
        let history = History::new();
        assert_eq!(history.clone().apply(Command::Undo), history);
        assert_eq!(history.clone().apply(Command::Redo), history);
    }
}
