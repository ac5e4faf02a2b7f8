//! Editing session: the single owner of a document's history.
//!
//! A hosting application creates one [`Session`] when the editor opens and
//! drops it when the editor closes. All writes go through
//! [`Session::dispatch`]; views read [`Session::snapshot`].

use crate::geometry::Point;
use crate::{
    reducer, schema, Command, EditorConfig, EditorObject, EditorResult, History, ObjectFactory,
    ObjectId, ObjectPatch, ObjectType, Snapshot,
};

/// One editing session: a history plus the identifier factory feeding it.
#[derive(Debug, Clone, Default)]
pub struct Session {
    history: History,
    factory: ObjectFactory,
}

impl Session {
    /// Start an empty session.
    #[must_use]
    pub fn new(config: &EditorConfig) -> Self {
        Self {
            history: History::with_config(config),
            factory: ObjectFactory::new(),
        }
    }

    /// The full history.
    #[must_use]
    pub fn history(&self) -> &History {
        &self.history
    }

    /// The current snapshot.
    #[must_use]
    pub fn snapshot(&self) -> &Snapshot {
        self.history.present()
    }

    /// Apply a command to the session's history.
    pub fn dispatch(&mut self, command: Command) {
        let history = std::mem::take(&mut self.history);
        self.history = reducer::reduce(history, command);
    }

    /// Apply several commands in order.
    pub fn dispatch_all<I>(&mut self, commands: I)
    where
        I: IntoIterator<Item = Command>,
    {
        for command in commands {
            self.dispatch(command);
        }
    }

    /// Create an object with variant defaults and add it to the document.
    ///
    /// Returns the new object's ID. The object becomes selected.
    pub fn add(
        &mut self,
        object_type: ObjectType,
        anchor: Point,
        overrides: Option<&ObjectPatch>,
    ) -> ObjectId {
        let mut object = self.factory.create(object_type, anchor, overrides);
        self.assign_fresh_id(&mut object);
        self.add_object(object)
    }

    /// Create a region from a flat point sequence and add it to the document.
    pub fn add_region(&mut self, points: Vec<f64>, overrides: Option<&ObjectPatch>) -> ObjectId {
        let mut object = self.factory.create_region(points, overrides);
        self.assign_fresh_id(&mut object);
        self.add_object(object)
    }

    fn add_object(&mut self, object: EditorObject) -> ObjectId {
        let id = object.id.clone();
        self.dispatch(Command::AddObject { object });
        id
    }

    /// Imported documents may already hold IDs from an earlier session.
    fn assign_fresh_id(&mut self, object: &mut EditorObject) {
        while self.snapshot().contains(&object.id) {
            object.id = self.factory.next_id();
        }
    }

    /// Replace the document with one parsed from JSON, dropping all history.
    ///
    /// # Errors
    ///
    /// Returns [`crate::EditorError::Parse`] if the text is malformed. The
    /// session is left exactly as it was.
    pub fn import_json(&mut self, json: &str) -> EditorResult<()> {
        let snapshot = schema::from_json(json)?;
        self.dispatch(Command::ImportState { snapshot });
        Ok(())
    }

    /// Export the current snapshot as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`crate::EditorError::Serialization`] if encoding fails.
    pub fn export_json(&self) -> EditorResult<String> {
        schema::to_json(self.snapshot())
    }
}
