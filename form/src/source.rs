//! Source variables: named data sources offered to layers.

use serde::{Deserialize, Serialize};

/// A named, column-bearing data source in the notebook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceVariable {
    /// Variable name the layer's `layer_source` refers to.
    pub variable: String,
    /// Columns exposed by tabular sources. Empty for geometry and url sources.
    #[serde(default)]
    pub columns: Vec<String>,
    /// Source kind as reported by the host (`table`, `geo`, `url`, ...).
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

impl SourceVariable {
    #[must_use]
    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }
}
