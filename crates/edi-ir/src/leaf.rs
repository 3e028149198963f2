//! Leaf elements (simple data elements)
#![allow(clippy::must_use_candidate)]
#![allow(clippy::return_self_not_must_use)]

use crate::element::{Component, ElementId, ParentRef};
use crate::export::{Export, ExportContent};
use crate::value::Value;
use crate::{Error, Result};

/// A single string value in a schema slot
#[derive(Debug)]
pub struct Leaf {
    id: ElementId,
    description: String,
    name: Option<String>,
    content: String,
    pub(crate) parent: Option<ParentRef>,
}

impl Leaf {
    /// Create an empty leaf for the given schema slot
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            id: ElementId::next(),
            description: description.into(),
            name: None,
            content: String::new(),
            parent: None,
        }
    }

    /// Create an empty leaf with a display name
    pub fn named(description: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(description).with_name(name)
    }

    /// Set the display name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Current content
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Overwrite the content
    pub fn set_content(&mut self, content: impl Into<String>) {
        self.content = content.into();
    }

    pub(crate) fn check(&self, input: &Value) -> Result<()> {
        match input {
            Value::Text(_) => Ok(()),
            Value::List(_) => Err(Error::type_mismatch(self.location(), "text", input.kind())),
        }
    }

    pub(crate) fn apply(&mut self, input: &Value) {
        if let Value::Text(content) = input {
            self.content.clone_from(content);
        }
    }
}

impl Component for Leaf {
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
        false
    }

    fn export(&self) -> Export {
        Export {
            description: self.description.clone(),
            name: self.name.clone().unwrap_or_default(),
            content: ExportContent::Text(self.content.clone()),
        }
    }

    fn serialize(&self) -> Value {
        Value::Text(self.content.clone())
    }

    fn parse(&mut self, input: &Value) -> Result<()> {
        self.check(input)?;
        self.apply(input);
        Ok(())
    }
}
