//! Conversion between raw segments and schema-shaped nodes

use crate::segment::{Element, Segment};
use crate::{Error, Result};
use edi_ir::{Component, Node, TreeLimits, Value};
use edi_schema::SegmentRegistry;
use tracing::{debug, trace};

/// Populate `node` from `raw` after checking that the tags agree.
///
/// The node's child count must equal the number of raw elements, and each
/// composite child must receive a composite element of its exact arity.
pub fn from_raw(node: &mut Node, raw: &Segment) -> Result<()> {
    from_raw_with_limits(node, raw, TreeLimits::default())
}

/// [`from_raw`] with explicit parse bounds
pub fn from_raw_with_limits(node: &mut Node, raw: &Segment, limits: TreeLimits) -> Result<()> {
    if raw.tag != node.description() {
        debug!(
            "Tag mismatch: {} cannot take segment {}",
            node.location(),
            raw.tag
        );
        return Err(Error::TagMismatch {
            location: node.location(),
            expected: node.description().to_string(),
            found: raw.tag.clone(),
        });
    }

    node.parse_with_limits(&raw.to_value(), limits)?;
    trace!("Populated {} from {} raw elements", raw.tag, raw.elements.len());
    Ok(())
}

/// Build a raw segment tagged with the node's description.
///
/// Children serialize positionally into elements; anything nested deeper
/// than composite → component cannot be expressed and is rejected.
pub fn to_raw(node: &Node) -> Result<Segment> {
    let tag = node.description().to_string();
    let items = match node.serialize() {
        Value::List(items) => items,
        Value::Text(_) => Vec::new(),
    };

    let elements = items
        .into_iter()
        .enumerate()
        .map(|(position, item)| {
            Element::from_value(item).ok_or_else(|| Error::UnsupportedNesting {
                tag: tag.clone(),
                position,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    trace!("Serialized {} into {} raw elements", tag, elements.len());
    Ok(Segment { tag, elements })
}

/// Registry-driven bridge: picks the node template by segment tag
pub struct SchemaBridge<'r> {
    registry: &'r SegmentRegistry,
    limits: TreeLimits,
}

impl<'r> SchemaBridge<'r> {
    /// Create a bridge over the given registry
    #[must_use]
    pub fn new(registry: &'r SegmentRegistry) -> Self {
        Self {
            registry,
            limits: TreeLimits::default(),
        }
    }

    /// Set the parse bounds
    #[must_use]
    pub fn with_limits(mut self, limits: TreeLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Create the registered template for `raw.tag` and populate it
    pub fn build(&self, raw: &Segment) -> Result<Node> {
        let mut node = self.registry.create(&raw.tag)?;
        from_raw_with_limits(&mut node, raw, self.limits)?;
        Ok(node)
    }

    /// Build every segment, stopping at the first failure
    pub fn build_all<'a, I>(&self, segments: I) -> Result<Vec<Node>>
    where
        I: IntoIterator<Item = &'a Segment>,
    {
        segments.into_iter().map(|raw| self.build(raw)).collect()
    }
}

impl SchemaBridge<'static> {
    /// Bridge over the process-wide registry
    #[must_use]
    pub fn global() -> Self {
        Self::new(SegmentRegistry::global())
    }
}
