//! Explicit registry mapping segment tags to node constructors

use crate::model::{Schema, SegmentDefinition};
use crate::{Error, Result};
use dashmap::DashMap;
use edi_ir::Node;
use std::sync::{Arc, LazyLock};
use tracing::{debug, trace};

/// Builds a fresh, empty node for one segment tag
pub type SegmentConstructor = Arc<dyn Fn() -> Node + Send + Sync>;

static GLOBAL_REGISTRY: LazyLock<SegmentRegistry> = LazyLock::new(SegmentRegistry::new);

/// Registry for segment constructors keyed by tag.
///
/// Entries are only ever added by explicit `register*` calls, so the caller
/// controls what is known and in which order it was set up.
pub struct SegmentRegistry {
    constructors: DashMap<String, SegmentConstructor>,
}

impl SegmentRegistry {
    /// Create a new empty registry
    #[must_use]
    pub fn new() -> Self {
        Self {
            constructors: DashMap::new(),
        }
    }

    /// Process-wide registry, empty until something registers into it
    pub fn global() -> &'static SegmentRegistry {
        &GLOBAL_REGISTRY
    }

    /// Register a constructor for `tag`, returning true if one was replaced
    pub fn register<F>(&self, tag: impl Into<String>, constructor: F) -> bool
    where
        F: Fn() -> Node + Send + Sync + 'static,
    {
        let tag = tag.into();
        debug!("Registering segment constructor for {}", tag);
        self.constructors
            .insert(tag, Arc::new(constructor))
            .is_some()
    }

    /// Register a definition; each `create` builds a fresh node from it
    pub fn register_definition(&self, definition: SegmentDefinition) -> bool {
        let tag = definition.tag.clone();
        self.register(tag, move || definition.build())
    }

    /// Register every segment definition of a schema
    pub fn register_schema(&self, schema: &Schema) {
        for definition in &schema.segments {
            self.register_definition(definition.clone());
        }
    }

    /// Remove the constructor for `tag`, returning true if it existed
    pub fn unregister(&self, tag: &str) -> bool {
        self.constructors.remove(tag).is_some()
    }

    /// Build a fresh node for `tag`
    pub fn create(&self, tag: &str) -> Result<Node> {
        // clone the handle so the map shard is not locked while constructing
        let constructor = self
            .constructors
            .get(tag)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or_else(|| Error::UnknownTag(tag.to_string()))?;

        trace!("Creating node for segment {}", tag);
        Ok(constructor())
    }

    /// Check if a tag is registered
    pub fn contains(&self, tag: &str) -> bool {
        self.constructors.contains_key(tag)
    }

    /// Registered tags, sorted
    pub fn tags(&self) -> Vec<String> {
        let mut tags: Vec<String> = self
            .constructors
            .iter()
            .map(|entry| entry.key().clone())
            .collect();
        tags.sort();
        tags
    }

    pub fn len(&self) -> usize {
        self.constructors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.constructors.is_empty()
    }
}

impl Default for SegmentRegistry {
    fn default() -> Self {
        Self::new()
    }
}
