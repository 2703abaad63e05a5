//! The structured result of parsing a generated project description.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Placeholder used until a `<projectName>` leaf has been observed.
pub const DEFAULT_PROJECT_NAME: &str = "my-app";

/// A single search/replace operation against an existing file.
///
/// Operations are applied in document order and are never deduplicated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateOp {
    /// Path of the file to patch.
    pub file: String,
    /// Exact text to locate.
    pub search: String,
    /// Replacement text.
    pub replace: String,
}

/// Progressively-completed description of a generated project.
///
/// Every field except `is_complete` is monotonically non-shrinking across
/// successive parser passes: files and commands are only ever added (a
/// repeated `<file path=...>` overwrites that path, map-assignment style),
/// updates are only ever appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectDocument {
    /// Project name, or a placeholder if none has been seen yet.
    pub project_name: String,
    /// New files: path → full content. Last write wins.
    pub files: BTreeMap<String, String>,
    /// Patch operations in document order.
    pub updates: Vec<UpdateOp>,
    /// Shell commands in document order.
    pub commands: Vec<String>,
    /// Free-text explanation.
    pub explanation: String,
    /// True once the root close tag has been observed.
    pub is_complete: bool,
}

impl Default for ProjectDocument {
    fn default() -> Self {
        Self {
            project_name: DEFAULT_PROJECT_NAME.to_string(),
            files: BTreeMap::new(),
            updates: Vec::new(),
            commands: Vec::new(),
            explanation: String::new(),
            is_complete: false,
        }
    }
}
