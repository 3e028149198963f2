//! Raw EDIFACT segments as produced by a tokenizer

use edi_ir::{Leaf, Node, Value};
use serde::{Deserialize, Serialize};

/// A tokenized EDIFACT segment: tag plus positional data elements
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    /// Segment tag (3 characters)
    pub tag: String,
    /// Data elements (simple or composite)
    pub elements: Vec<Element>,
}

/// A data element (simple or composite)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Element {
    /// Simple element (single value)
    Simple(String),
    /// Composite element (multiple components)
    Composite(Vec<String>),
}

impl Element {
    /// Component at `index`; a simple element is its own component 0
    #[must_use]
    pub fn component(&self, index: usize) -> Option<&str> {
        match self {
            Element::Simple(value) => (index == 0).then_some(value.as_str()),
            Element::Composite(components) => components.get(index).map(String::as_str),
        }
    }

    /// Number of components (1 for a simple element)
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Element::Simple(_) => 1,
            Element::Composite(components) => components.len(),
        }
    }

    /// True for a composite without components
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Element::Composite(components) if components.is_empty())
    }

    /// Positional value: text for simple, list of texts for composite
    #[must_use]
    pub fn to_value(&self) -> Value {
        match self {
            Element::Simple(value) => Value::Text(value.clone()),
            Element::Composite(components) => {
                Value::List(components.iter().cloned().map(Value::Text).collect())
            }
        }
    }

    /// Convert a positional value back; `None` when nested deeper than one list
    #[must_use]
    pub fn from_value(value: Value) -> Option<Element> {
        match value {
            Value::Text(text) => Some(Element::Simple(text)),
            Value::List(items) => items
                .into_iter()
                .map(|item| match item {
                    Value::Text(text) => Some(text),
                    Value::List(_) => None,
                })
                .collect::<Option<Vec<_>>>()
                .map(Element::Composite),
        }
    }
}

impl From<&str> for Element {
    fn from(value: &str) -> Self {
        Element::Simple(value.to_string())
    }
}

impl From<String> for Element {
    fn from(value: String) -> Self {
        Element::Simple(value)
    }
}

impl From<Vec<&str>> for Element {
    fn from(components: Vec<&str>) -> Self {
        Element::Composite(components.into_iter().map(str::to_string).collect())
    }
}

impl From<Vec<String>> for Element {
    fn from(components: Vec<String>) -> Self {
        Element::Composite(components)
    }
}

impl Segment {
    /// Create a segment from a tag and positional elements
    pub fn new<I, T>(tag: impl Into<String>, elements: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Element>,
    {
        Self {
            tag: tag.into(),
            elements: elements.into_iter().map(Into::into).collect(),
        }
    }

    /// Element at `position`
    #[must_use]
    pub fn get(&self, position: usize) -> Option<&Element> {
        self.elements.get(position)
    }

    /// Component `index` of the element at `position`
    #[must_use]
    pub fn component(&self, position: usize, index: usize) -> Option<&str> {
        self.get(position).and_then(|e| e.component(index))
    }

    /// All elements as one positional list value
    #[must_use]
    pub fn to_value(&self) -> Value {
        Value::List(self.elements.iter().map(Element::to_value).collect())
    }

    /// Convert this segment to an untyped node with positional names.
    ///
    /// Elements become `e1`, `e2`, ...; components of a composite become
    /// `c1`, `c2`, .... Useful when no definition is registered for the tag.
    #[must_use]
    pub fn to_node(&self) -> Node {
        let mut node = Node::new(&self.tag);

        for (i, element) in self.elements.iter().enumerate() {
            match element {
                Element::Simple(value) => {
                    let mut leaf = Leaf::new(format!("e{}", i + 1));
                    leaf.set_content(value.as_str());
                    node.add(leaf);
                }
                Element::Composite(components) => {
                    let mut composite = Node::new(format!("e{}", i + 1));
                    for (j, component) in components.iter().enumerate() {
                        let mut leaf = Leaf::new(format!("c{}", j + 1));
                        leaf.set_content(component.as_str());
                        composite.add(leaf);
                    }
                    node.add(composite);
                }
            }
        }

        node
    }
}
