//! # Layout Core
//!
//! Document state machine for a 2D layout editor: the object model, the
//! undo/redo history, and the transition function every edit passes through.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │                 layout-core                 │
//! ├─────────────────────────────────────────────┤
//! │  Session          │  Serialization          │
//! │  - owns History   │  - Snapshot <-> JSON    │
//! │  - id factory     │  - command scripts      │
//! ├─────────────────────────────────────────────┤
//! │  Reducer: (History, Command) -> History     │
//! │  - z-order normalization                    │
//! │  - selection consistency                    │
//! │  - viewport clamping                        │
//! ├─────────────────────────────────────────────┤
//! │  History          │  Snapshot               │
//! │  - past/future    │  - objects (Arc-shared) │
//! │  - retention cap  │  - selection, viewport  │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! Rendering, pointer handling and file dialogs live outside this crate; they
//! issue [`Command`]s and read the current [`Snapshot`].

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod command;
pub mod config;
pub mod error;
pub mod geometry;
pub mod history;
pub mod object;
pub mod reducer;
pub mod schema;
pub mod session;
pub mod snapshot;

pub use command::{Command, CommandCategory};
pub use config::{EditorConfig, DEFAULT_HISTORY_LIMIT};
pub use error::{EditorError, EditorResult};
pub use geometry::{bounds_from_points, clamp, Bounds, Point};
pub use history::History;
pub use object::{
    EditorObject, ObjectFactory, ObjectId, ObjectKind, ObjectPatch, ObjectType, Stroke, TextAlign,
};
pub use reducer::reduce;
pub use schema::SnapshotDocument;
pub use session::Session;
pub use snapshot::{clamp_zoom, Snapshot, MAX_ZOOM, MIN_ZOOM};

/// Layout core version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
