#![deny(warnings)]
#![deny(rust_2018_idioms)]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

//! # edi-ir
//!
//! Typed element tree for EDI segments.
//!
//! A segment definition is wired once as a tree of [`Leaf`] and [`Node`]
//! elements whose child order mirrors schema position. The tree is then
//! populated positionally with [`Component::parse`], read back with
//! [`Component::serialize`] (the same nested shape the wire layer uses) or
//! [`Component::export`] (the stable `{description, name, content}` mapping
//! handed to downstream consumers).

/// Shared capability set and the two-variant element union.
pub mod element;
/// Stable export shape for downstream consumers.
pub mod export;
/// Leaf element holding a single string value.
pub mod leaf;
/// Composite element owning an ordered list of children.
pub mod node;
/// Cursor-based navigation by description path.
pub mod traversal;
/// Positional input/output shape of parse and serialize.
pub mod value;

pub use element::{Component, Element, ElementId, FilterChildren, ParentRef, TreeLimits};
pub use export::{Export, ExportContent};
pub use leaf::Leaf;
pub use node::Node;
pub use traversal::Cursor;
pub use value::Value;

use thiserror::Error;

/// Errors that can occur when working with the element tree
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Arity mismatch in {description}: expected {expected} elements, found {found}")]
    Arity {
        description: String,
        expected: usize,
        found: usize,
    },

    #[error("{description} is not a member of {parent}")]
    Membership { description: String, parent: String },

    #[error("Type mismatch in {description}: expected {expected}, found {found}")]
    TypeMismatch {
        description: String,
        expected: String,
        found: String,
    },

    #[error("{description} is a leaf and cannot hold children")]
    NotComposite { description: String },

    #[error("Nesting depth exceeds limit of {limit}")]
    DepthExceeded { limit: usize },

    #[error("Element not found at path: {path}")]
    NodeNotFound { path: String },

    #[error("Invalid path '{path}': {reason}")]
    InvalidPath { path: String, reason: String },
}

impl Error {
    /// Build an arity error for a node expecting `expected` positional values.
    pub fn arity(description: impl Into<String>, expected: usize, found: usize) -> Self {
        Self::Arity {
            description: description.into(),
            expected,
            found,
        }
    }

    /// Build a membership error for a child id absent from `parent`.
    pub fn membership(description: impl Into<String>, parent: impl Into<String>) -> Self {
        Self::Membership {
            description: description.into(),
            parent: parent.into(),
        }
    }

    /// Build a type mismatch error with expected/found value kinds.
    pub fn type_mismatch(
        description: impl Into<String>,
        expected: impl Into<String>,
        found: impl Into<String>,
    ) -> Self {
        Self::TypeMismatch {
            description: description.into(),
            expected: expected.into(),
            found: found.into(),
        }
    }

    /// Build a not-composite error for child operations on a leaf.
    pub fn not_composite(description: impl Into<String>) -> Self {
        Self::NotComposite {
            description: description.into(),
        }
    }

    /// Build a node-not-found error with path context.
    pub fn node_not_found(path: impl Into<String>) -> Self {
        Self::NodeNotFound { path: path.into() }
    }

    /// Build an invalid-path error with input path and parsing reason.
    pub fn invalid_path(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidPath {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

/// Crate-local result type for tree operations.
pub type Result<T> = std::result::Result<T, Error>;
