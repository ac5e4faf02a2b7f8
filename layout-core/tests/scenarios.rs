//! End-to-end editing scenarios.
//!
//! Each test drives a history through the public command interface the way
//! a view layer would, then checks the resulting snapshot and stacks.

use layout_core::{
    schema, Command, EditorConfig, EditorObject, History, ObjectId, ObjectPatch, ObjectType,
    Point, Session, Snapshot, MAX_ZOOM, MIN_ZOOM,
};

/// Helper to create a rectangle with a fixed ID.
fn rect(id: &str) -> EditorObject {
    EditorObject::with_defaults(id.into(), ObjectType::Rect, Point::new(10.0, 10.0))
}

/// Helper to create a triangular region with a fixed ID.
fn region(id: &str) -> EditorObject {
    EditorObject::region(id.into(), vec![0.0, 0.0, 100.0, 0.0, 50.0, 80.0])
}

fn ids(history: &History) -> Vec<String> {
    history
        .present()
        .objects()
        .map(|o| o.id.to_string())
        .collect()
}

fn z_indices(history: &History) -> Vec<usize> {
    history.present().objects().map(|o| o.z_index).collect()
}

// ============================================================================
// Reordering
// ============================================================================

#[test]
fn test_bring_to_front_undo_redo() {
    let start = History::from_snapshot(Snapshot::from_parts(
        vec![rect("obj0"), rect("obj1")],
        None,
        1.0,
        Point::default(),
    ));
    assert_eq!(z_indices(&start), vec![0, 1]);

    let fronted = start.clone().apply(Command::BringToFront { id: "obj0".into() });
    assert_eq!(ids(&fronted), vec!["obj1", "obj0"]);
    assert_eq!(z_indices(&fronted), vec![0, 1]);

    let undone = fronted.clone().apply(Command::Undo);
    assert_eq!(undone.present(), start.present());

    let redone = undone.apply(Command::Redo);
    assert_eq!(redone.present(), fronted.present());
    assert_eq!(redone, fronted);
}

// ============================================================================
// Add / delete
// ============================================================================

#[test]
fn test_add_delete_undo_restores_selected_object() {
    let object = rect("A");
    let added = History::new().apply(Command::AddObject {
        object: object.clone(),
    });
    let post_add = added.present().clone();

    let deleted = added.apply(Command::DeleteObject { id: "A".into() });
    assert!(deleted.present().is_empty());
    assert!(deleted.present().selected_id().is_none());

    let undone = deleted.apply(Command::Undo);
    assert_eq!(undone.present(), &post_add);
    assert_eq!(undone.present().selected_id(), Some(&ObjectId::from("A")));
    assert_eq!(undone.present().object(&"A".into()), Some(&object));
}

// ============================================================================
// Viewport
// ============================================================================

#[test]
fn test_zoom_clamping() {
    let history = History::new().apply(Command::SetZoom { zoom: 10.0 });
    assert!((history.present().zoom() - MAX_ZOOM).abs() < f64::EPSILON);

    let history = history.apply(Command::SetZoom { zoom: -1.0 });
    assert!((history.present().zoom() - MIN_ZOOM).abs() < f64::EPSILON);
}

#[test]
fn test_zoom_around_pointer_is_single_step() {
    let history = History::new()
        .apply(Command::SetViewport {
            zoom: 2.0,
            pan: Point::new(-200.0, -150.0),
        })
        .apply(Command::SetPan {
            pan: Point::new(-210.0, -150.0),
        });
    assert_eq!(history.past_len(), 2);

    let history = history.apply(Command::Undo);
    assert!((history.present().zoom() - 2.0).abs() < f64::EPSILON);
    assert_eq!(history.present().pan(), Point::new(-200.0, -150.0));
}

// ============================================================================
// Clear
// ============================================================================

#[test]
fn test_clear_all_keeps_regions() {
    let history = History::from_snapshot(Snapshot::from_parts(
        vec![
            rect("a"),
            region("r1"),
            rect("b"),
            region("r2"),
            EditorObject::with_defaults("t".into(), ObjectType::Text, Point::default()),
        ],
        Some("b".into()),
        1.0,
        Point::default(),
    ));

    let cleared = history.apply(Command::ClearAll);
    assert_eq!(ids(&cleared), vec!["r1", "r2"]);
    assert_eq!(z_indices(&cleared), vec![0, 1]);
    assert!(cleared.present().selected_id().is_none());
    assert!(cleared.can_undo());
}

// ============================================================================
// History semantics
// ============================================================================

#[test]
fn test_edit_after_undo_discards_redo() {
    let history = History::new()
        .apply(Command::AddObject { object: rect("a") })
        .apply(Command::AddObject { object: rect("b") })
        .apply(Command::Undo);
    assert!(history.can_redo());

    let history = history.apply(Command::SetVisibility {
        id: "a".into(),
        visible: false,
    });
    assert!(!history.can_redo());

    // The undone add is unreachable now.
    let history = history.apply(Command::Redo);
    assert_eq!(ids(&history), vec!["a"]);
}

#[test]
fn test_undo_does_not_restore_selection_alone() {
    let history = History::new()
        .apply(Command::AddObject { object: rect("a") })
        .apply(Command::AddObject { object: rect("b") })
        .apply(Command::Select {
            id: Some("a".into()),
        })
        .apply(Command::Select { id: None });

    // One undo steps over the whole "add b" edit, not the selection changes.
    let history = history.apply(Command::Undo);
    assert_eq!(ids(&history), vec!["a"]);
    assert_eq!(history.past_len(), 1);
}

#[test]
fn test_missing_ids_are_noops() {
    let history = History::new().apply(Command::AddObject { object: rect("a") });
    let commands = vec![
        Command::UpdateObject {
            id: "ghost".into(),
            changes: ObjectPatch::size(1.0, 1.0),
        },
        Command::DeleteObject { id: "ghost".into() },
        Command::BringToFront { id: "ghost".into() },
        Command::SendToBack { id: "ghost".into() },
        Command::SetVisibility {
            id: "ghost".into(),
            visible: false,
        },
        Command::SetLock {
            id: "ghost".into(),
            locked: true,
        },
        Command::Select {
            id: Some("ghost".into()),
        },
    ];
    for command in commands {
        let name = command.name();
        let after = history.clone().apply(command);
        assert_eq!(after, history, "{name} on a missing id changed the history");
    }
}

#[test]
fn test_scripted_add_cannot_store_invalid_object() {
    let script = r#"[
        {"type": "addObject", "object": {"id": "r", "type": "region", "points": [0, 0, 10, 10], "width": 999, "height": 5, "opacity": 7}},
        {"type": "addObject", "object": {"id": "t", "type": "text", "zIndex": -4, "opacity": -2}}
    ]"#;
    let commands = schema::commands_from_json(script).expect("parse script");
    let history = commands.into_iter().fold(History::new(), History::apply);

    let region = history.present().object(&"r".into()).expect("region");
    assert!((region.width - 10.0).abs() < f64::EPSILON);
    assert!((region.height - 10.0).abs() < f64::EPSILON);
    assert!((region.opacity - 1.0).abs() < f64::EPSILON);

    let text = history.present().object(&"t".into()).expect("text");
    assert!(text.opacity.abs() < f64::EPSILON);
    assert_eq!(z_indices(&history), vec![0, 1]);

    let exported = schema::to_json(history.present()).expect("export");
    assert_eq!(&schema::from_json(&exported).expect("parse"), history.present());
}

#[test]
fn test_history_limit_from_config() {
    let mut session = Session::new(&EditorConfig::new().with_history_limit(Some(3)));
    for i in 0_u32..10 {
        session.add(ObjectType::Circle, Point::new(f64::from(i), 0.0), None);
    }
    assert_eq!(session.history().past_len(), 3);
    assert_eq!(session.snapshot().len(), 10);

    for _ in 0..5 {
        session.dispatch(Command::Undo);
    }
    assert_eq!(session.snapshot().len(), 7);
}

// ============================================================================
// Import / export
// ============================================================================

#[test]
fn test_import_through_session_resets_history() {
    let mut session = Session::default();
    session.add(ObjectType::Text, Point::new(20.0, 20.0), None);
    session.dispatch(Command::SetZoom { zoom: 3.0 });
    let exported = session.export_json().expect("export");

    let mut restored = Session::default();
    restored.add(ObjectType::Rect, Point::default(), None);
    restored.import_json(&exported).expect("import");

    assert_eq!(restored.snapshot(), session.snapshot());
    assert!(!restored.history().can_undo());
    assert!(!restored.history().can_redo());
}

#[test]
fn test_export_of_hand_written_document() {
    let json = r##"{
        "objects": [
            {"id": "bg", "type": "region", "points": [0, 0, 400, 0, 400, 300], "fill": "#eee"},
            {"id": "title", "type": "text", "x": 40, "y": 20, "text": "Hello", "zIndex": 9}
        ],
        "selectedId": "title"
    }"##;
    let snapshot = schema::from_json(json).expect("parse");
    assert_eq!(snapshot.len(), 2);
    assert_eq!(snapshot.selected().map(|o| o.id.as_str()), Some("title"));

    let backdrop = snapshot.object(&"bg".into()).expect("region");
    assert!((backdrop.width - 400.0).abs() < f64::EPSILON);
    assert!((backdrop.height - 300.0).abs() < f64::EPSILON);

    let title = snapshot.object(&"title".into()).expect("title");
    assert_eq!(title.z_index, 1);

    let reparsed = schema::from_json(&schema::to_json(&snapshot).expect("export")).expect("parse");
    assert_eq!(reparsed, snapshot);
}
