//! Export shape for handing tree data to downstream consumers
//!
//! Every element exports as `{"description", "name", "content"}` where
//! `content` is the leaf string or the ordered list of the children's exports.
//! This shape is a compatibility surface: JSON emission and reporting rely on it.

use serde::{Deserialize, Serialize};

/// Exported view of one element
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Export {
    /// Schema slot identifier
    pub description: String,

    /// Display label, empty when the element has none
    pub name: String,

    /// Leaf content or children exports
    pub content: ExportContent,
}

/// Content of an exported element
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExportContent {
    /// Leaf string value
    Text(String),

    /// Children exports in positional order
    List(Vec<Export>),
}

impl Export {
    /// Leaf content, if this export came from a leaf
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        match &self.content {
            ExportContent::Text(s) => Some(s),
            ExportContent::List(_) => None,
        }
    }

    /// Children exports, if this export came from a node
    #[must_use]
    pub fn children(&self) -> Option<&[Export]> {
        match &self.content {
            ExportContent::Text(_) => None,
            ExportContent::List(items) => Some(items),
        }
    }
}
