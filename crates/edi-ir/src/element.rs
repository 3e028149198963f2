//! Element union and the capability set shared by leaves and nodes
#![allow(clippy::must_use_candidate)]

use crate::export::Export;
use crate::leaf::Leaf;
use crate::node::Node;
use crate::value::Value;
use crate::{Error, Result};
use std::fmt;
use std::slice;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_ELEMENT_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of an element, unique within the process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(u64);

impl ElementId {
    pub(crate) fn next() -> Self {
        Self(NEXT_ELEMENT_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Non-owning back-reference to the node an element was added to.
///
/// Only used for lookups and diagnostics; the node owns its children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParentRef {
    /// Id of the owning node
    pub id: ElementId,

    /// Description of the owning node
    pub description: String,
}

/// Bounds applied while parsing untrusted input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeLimits {
    /// Maximum node nesting depth accepted by `parse`
    pub max_depth: usize,
}

impl Default for TreeLimits {
    fn default() -> Self {
        Self { max_depth: 32 }
    }
}

/// Capabilities shared by every element variant
pub trait Component {
    /// Process-unique identity
    fn id(&self) -> ElementId;

    /// Schema slot identifier
    fn description(&self) -> &str;

    /// Optional display label
    fn name(&self) -> Option<&str>;

    /// Back-reference to the owning node, if attached
    fn parent(&self) -> Option<&ParentRef>;

    /// True for nodes, false for leaves
    fn is_composite(&self) -> bool;

    /// Export as `{description, name, content}`
    fn export(&self) -> Export;

    /// Positional value in the shape the wire layer expects
    fn serialize(&self) -> Value;

    /// Populate from a positional value.
    ///
    /// Either the whole input is applied or nothing is.
    fn parse(&mut self, input: &Value) -> Result<()>;

    /// Description qualified with the parent's, for diagnostics
    fn location(&self) -> String {
        match self.parent() {
            Some(parent) => format!("{} in {}", self.description(), parent.description),
            None => self.description().to_string(),
        }
    }
}

/// An element of the tree: either a leaf or a node.
///
/// Together with [`Component`] this is the full element interface; `add`,
/// `remove` and `filter_children` live here since they only make sense on
/// nodes and fail or degrade on leaves.
#[derive(Debug)]
pub enum Element {
    Leaf(Leaf),
    Node(Node),
}

impl Element {
    /// Borrow as leaf
    pub fn as_leaf(&self) -> Option<&Leaf> {
        match self {
            Element::Leaf(leaf) => Some(leaf),
            Element::Node(_) => None,
        }
    }

    /// Borrow as node
    pub fn as_node(&self) -> Option<&Node> {
        match self {
            Element::Leaf(_) => None,
            Element::Node(node) => Some(node),
        }
    }

    /// Mutably borrow as node
    pub fn as_node_mut(&mut self) -> Option<&mut Node> {
        match self {
            Element::Leaf(_) => None,
            Element::Node(node) => Some(node),
        }
    }

    /// Append a child; fails on a leaf
    pub fn add(&mut self, child: impl Into<Element>) -> Result<ElementId> {
        match self {
            Element::Leaf(leaf) => Err(Error::not_composite(leaf.location())),
            Element::Node(node) => Ok(node.add(child)),
        }
    }

    /// Detach the child with the given id; fails on a leaf or when absent
    pub fn remove(&mut self, id: ElementId) -> Result<Element> {
        match self {
            Element::Leaf(leaf) => Err(Error::not_composite(leaf.location())),
            Element::Node(node) => node.remove(id),
        }
    }

    /// Direct children whose description equals `description`.
    ///
    /// A leaf yields only itself, whatever the filter value.
    pub fn filter_children<'a>(&'a self, description: &'a str) -> FilterChildren<'a> {
        match self {
            Element::Leaf(_) => FilterChildren::itself(self),
            Element::Node(node) => node.filter_children(description),
        }
    }

    pub(crate) fn set_parent(&mut self, parent: Option<ParentRef>) {
        match self {
            Element::Leaf(leaf) => leaf.parent = parent,
            Element::Node(node) => node.parent = parent,
        }
    }

    pub(crate) fn check(&self, input: &Value, depth: usize, limits: TreeLimits) -> Result<()> {
        match self {
            Element::Leaf(leaf) => leaf.check(input),
            Element::Node(node) => node.check(input, depth, limits),
        }
    }

    pub(crate) fn apply(&mut self, input: &Value) {
        match self {
            Element::Leaf(leaf) => leaf.apply(input),
            Element::Node(node) => node.apply(input),
        }
    }
}

impl Component for Element {
    fn id(&self) -> ElementId {
        match self {
            Element::Leaf(leaf) => leaf.id(),
            Element::Node(node) => node.id(),
        }
    }

    fn description(&self) -> &str {
        match self {
            Element::Leaf(leaf) => leaf.description(),
            Element::Node(node) => node.description(),
        }
    }

    fn name(&self) -> Option<&str> {
        match self {
            Element::Leaf(leaf) => leaf.name(),
            Element::Node(node) => node.name(),
        }
    }

    fn parent(&self) -> Option<&ParentRef> {
        match self {
            Element::Leaf(leaf) => leaf.parent(),
            Element::Node(node) => node.parent(),
        }
    }

    fn is_composite(&self) -> bool {
        matches!(self, Element::Node(_))
    }

    fn export(&self) -> Export {
        match self {
            Element::Leaf(leaf) => leaf.export(),
            Element::Node(node) => node.export(),
        }
    }

    fn serialize(&self) -> Value {
        match self {
            Element::Leaf(leaf) => leaf.serialize(),
            Element::Node(node) => node.serialize(),
        }
    }

    fn parse(&mut self, input: &Value) -> Result<()> {
        match self {
            Element::Leaf(leaf) => leaf.parse(input),
            Element::Node(node) => node.parse(input),
        }
    }
}

impl From<Leaf> for Element {
    fn from(leaf: Leaf) -> Self {
        Element::Leaf(leaf)
    }
}

impl From<Node> for Element {
    fn from(node: Node) -> Self {
        Element::Node(node)
    }
}

/// Lazy sequence returned by `filter_children`
pub struct FilterChildren<'a> {
    inner: FilterInner<'a>,
}

enum FilterInner<'a> {
    Itself(Option<&'a Element>),
    Children {
        iter: slice::Iter<'a, Element>,
        description: &'a str,
    },
}

impl<'a> FilterChildren<'a> {
    pub(crate) fn itself(element: &'a Element) -> Self {
        Self {
            inner: FilterInner::Itself(Some(element)),
        }
    }

    pub(crate) fn children(children: &'a [Element], description: &'a str) -> Self {
        Self {
            inner: FilterInner::Children {
                iter: children.iter(),
                description,
            },
        }
    }
}

impl<'a> Iterator for FilterChildren<'a> {
    type Item = &'a Element;

    fn next(&mut self) -> Option<Self::Item> {
        match &mut self.inner {
            FilterInner::Itself(slot) => slot.take(),
            FilterInner::Children { iter, description } => {
                iter.find(|child| child.description() == *description)
            }
        }
    }
}
