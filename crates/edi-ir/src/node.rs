//! Composite elements (segments, composite data elements, groups)
#![allow(clippy::must_use_candidate)]
#![allow(clippy::return_self_not_must_use)]

use crate::element::{Component, Element, ElementId, FilterChildren, ParentRef, TreeLimits};
use crate::export::{Export, ExportContent};
use crate::value::Value;
use crate::{Error, Result};
use tracing::{debug, trace};

/// An ordered list of child elements; order mirrors schema position
#[derive(Debug)]
pub struct Node {
    id: ElementId,
    description: String,
    name: Option<String>,
    children: Vec<Element>,
    pub(crate) parent: Option<ParentRef>,
}

impl Node {
    /// Create a node without children
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            id: ElementId::next(),
            description: description.into(),
            name: None,
            children: Vec::new(),
            parent: None,
        }
    }

    /// Create a node with a display name
    pub fn named(description: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(description).with_name(name)
    }

    /// Set the display name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Append a child while building
    pub fn with_child(mut self, child: impl Into<Element>) -> Self {
        self.add(child);
        self
    }

    /// Children in positional order
    pub fn children(&self) -> &[Element] {
        &self.children
    }

    /// Mutable access to the child at `index`
    pub fn child_mut(&mut self, index: usize) -> Option<&mut Element> {
        self.children.get_mut(index)
    }

    /// Number of children, i.e. the arity `parse` expects
    pub fn len(&self) -> usize {
        self.children.len()
    }

    /// True when the node has no children
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    fn parent_ref(&self) -> ParentRef {
        ParentRef {
            id: self.id,
            description: self.description.clone(),
        }
    }

    /// Append a child and point its parent reference at this node
    pub fn add(&mut self, child: impl Into<Element>) -> ElementId {
        let mut child = child.into();
        child.set_parent(Some(self.parent_ref()));
        let id = child.id();
        self.children.push(child);
        id
    }

    /// Detach the first child with the given id and clear its parent reference
    pub fn remove(&mut self, id: ElementId) -> Result<Element> {
        let index = self
            .children
            .iter()
            .position(|child| child.id() == id)
            .ok_or_else(|| Error::membership(format!("element {id}"), self.location()))?;

        let mut child = self.children.remove(index);
        child.set_parent(None);
        Ok(child)
    }

    /// Direct children (not descendants) with a matching description
    pub fn filter_children<'a>(&'a self, description: &'a str) -> FilterChildren<'a> {
        FilterChildren::children(&self.children, description)
    }

    /// Parse with explicit bounds on nesting depth
    pub fn parse_with_limits(&mut self, input: &Value, limits: TreeLimits) -> Result<()> {
        if let Err(err) = self.check(input, 0, limits) {
            debug!("Rejected input for {}: {}", self.description, err);
            return Err(err);
        }
        self.apply(input);
        trace!(
            "Parsed {} with {} children",
            self.description,
            self.children.len()
        );
        Ok(())
    }

    /// Validate the complete input shape before anything is written
    pub(crate) fn check(&self, input: &Value, depth: usize, limits: TreeLimits) -> Result<()> {
        if depth >= limits.max_depth {
            return Err(Error::DepthExceeded {
                limit: limits.max_depth,
            });
        }

        let items = match input {
            Value::List(items) => items,
            Value::Text(_) => {
                return Err(Error::type_mismatch(self.location(), "list", input.kind()));
            }
        };

        if items.len() != self.children.len() {
            return Err(Error::arity(
                self.location(),
                self.children.len(),
                items.len(),
            ));
        }

        self.children
            .iter()
            .zip(items)
            .try_for_each(|(child, item)| child.check(item, depth + 1, limits))
    }

    pub(crate) fn apply(&mut self, input: &Value) {
        if let Value::List(items) = input {
            for (child, item) in self.children.iter_mut().zip(items) {
                child.apply(item);
            }
        }
    }
}

impl Component for Node {
    fn id(&self) -> ElementId {
        self.id
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn parent(&self) -> Option<&ParentRef> {
        self.parent.as_ref()
    }

    fn is_composite(&self) -> bool {
        true
    }

    fn export(&self) -> Export {
        Export {
            description: self.description.clone(),
            name: self.name.clone().unwrap_or_default(),
            content: ExportContent::List(self.children.iter().map(Component::export).collect()),
        }
    }

    fn serialize(&self) -> Value {
        Value::List(self.children.iter().map(Component::serialize).collect())
    }

    fn parse(&mut self, input: &Value) -> Result<()> {
        self.parse_with_limits(input, TreeLimits::default())
    }
}
