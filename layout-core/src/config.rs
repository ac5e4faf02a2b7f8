//! Editor configuration.

use serde::{Deserialize, Serialize};

use crate::{EditorError, EditorResult};

/// Number of undo checkpoints kept when no limit is configured explicitly.
pub const DEFAULT_HISTORY_LIMIT: usize = 100;

/// Settings a hosting application chooses once per session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EditorConfig {
    /// Maximum number of undo checkpoints. `None` keeps every checkpoint.
    pub history_limit: Option<usize>,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            history_limit: Some(DEFAULT_HISTORY_LIMIT),
        }
    }
}

impl EditorConfig {
    /// Create a configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the history limit.
    #[must_use]
    pub const fn with_history_limit(mut self, limit: Option<usize>) -> Self {
        self.history_limit = limit;
        self
    }

    /// Parse a configuration from JSON. Absent keys keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::Config`] if the text is not a valid configuration.
    pub fn from_json(json: &str) -> EditorResult<Self> {
        serde_json::from_str(json).map_err(|e| EditorError::Config(e.to_string()))
    }
}
