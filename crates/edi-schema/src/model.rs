//! Segment definition model

use edi_ir::{Element, Leaf, Node};

/// A named set of segment definitions (e.g. one message format version)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    pub name: String,
    pub version: String,
    pub segments: Vec<SegmentDefinition>,
}

/// Definition of a segment: tag plus positional element slots
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentDefinition {
    pub tag: String,
    pub name: Option<String>,
    pub elements: Vec<ElementDefinition>,
}

/// Definition of one positional slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ElementDefinition {
    /// Simple data element, parsed from a scalar
    Simple { id: String, name: Option<String> },

    /// Composite data element, parsed from a list of its components
    Composite {
        id: String,
        name: Option<String>,
        components: Vec<ElementDefinition>,
    },
}

impl Schema {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            segments: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_segments(mut self, segments: Vec<SegmentDefinition>) -> Self {
        self.segments = segments;
        self
    }

    /// Look up a segment definition by tag
    pub fn segment(&self, tag: &str) -> Option<&SegmentDefinition> {
        self.segments.iter().find(|s| s.tag == tag)
    }
}

impl SegmentDefinition {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            name: None,
            elements: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn with_element(mut self, element: ElementDefinition) -> Self {
        self.elements.push(element);
        self
    }

    /// Number of positional elements the built node expects
    pub fn arity(&self) -> usize {
        self.elements.len()
    }

    /// Build an empty node shaped like this definition
    pub fn build(&self) -> Node {
        let mut node = Node::new(&self.tag);
        if let Some(name) = &self.name {
            node = node.with_name(name);
        }
        for element in &self.elements {
            node.add(element.build());
        }
        node
    }
}

impl ElementDefinition {
    pub fn simple(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self::Simple {
            id: id.into(),
            name: Some(name.into()),
        }
    }

    pub fn composite(
        id: impl Into<String>,
        name: impl Into<String>,
        components: Vec<ElementDefinition>,
    ) -> Self {
        Self::Composite {
            id: id.into(),
            name: Some(name.into()),
            components,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            Self::Simple { id, .. } | Self::Composite { id, .. } => id,
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Simple { name, .. } | Self::Composite { name, .. } => name.as_deref(),
        }
    }

    /// Build an empty element shaped like this definition
    pub fn build(&self) -> Element {
        match self {
            Self::Simple { id, name } => {
                let leaf = Leaf::new(id);
                match name {
                    Some(name) => leaf.with_name(name).into(),
                    None => leaf.into(),
                }
            }
            Self::Composite {
                id,
                name,
                components,
            } => {
                let mut node = Node::new(id);
                if let Some(name) = name {
                    node = node.with_name(name);
                }
                for component in components {
                    node.add(component.build());
                }
                node.into()
            }
        }
    }
}
