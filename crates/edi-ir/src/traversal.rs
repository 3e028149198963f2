//! Cursor API for navigating a populated tree by description

use crate::element::{Component, Element};
use crate::leaf::Leaf;
use crate::node::Node;
use crate::{Error, Result};

#[derive(Clone, Copy)]
enum Target<'a> {
    Leaf(&'a Leaf),
    Node(&'a Node),
}

impl<'a> From<&'a Element> for Target<'a> {
    fn from(element: &'a Element) -> Self {
        match element {
            Element::Leaf(leaf) => Target::Leaf(leaf),
            Element::Node(node) => Target::Node(node),
        }
    }
}

/// A cursor for navigating the element tree
pub struct Cursor<'a> {
    /// Current element
    target: Target<'a>,

    /// Path to current element (for error reporting)
    path: Vec<String>,
}

impl<'a> Cursor<'a> {
    /// Create a cursor rooted at a node (typically a segment)
    #[must_use]
    pub fn new(node: &'a Node) -> Self {
        Self {
            target: Target::Node(node),
            path: vec![node.description().to_string()],
        }
    }

    /// Create a cursor rooted at any element
    #[must_use]
    pub fn from_element(element: &'a Element) -> Self {
        Self {
            target: element.into(),
            path: vec![element.description().to_string()],
        }
    }

    /// Description of the current element
    #[must_use]
    pub fn description(&self) -> &'a str {
        match self.target {
            Target::Leaf(leaf) => leaf.description(),
            Target::Node(node) => node.description(),
        }
    }

    /// Get the current path
    #[must_use]
    pub fn path(&self) -> &[String] {
        &self.path
    }

    /// Current element as a node, if composite
    #[must_use]
    pub fn node(&self) -> Option<&'a Node> {
        match self.target {
            Target::Leaf(_) => None,
            Target::Node(node) => Some(node),
        }
    }

    /// Leaf content at the current position
    pub fn text(&self) -> Result<&'a str> {
        match self.target {
            Target::Leaf(leaf) => Ok(leaf.content()),
            Target::Node(_) => Err(Error::type_mismatch(self.path.join("/"), "leaf", "node")),
        }
    }

    fn children(&self) -> &'a [Element] {
        match self.target {
            Target::Leaf(_) => &[],
            Target::Node(node) => node.children(),
        }
    }

    fn descend(&self, element: &'a Element, step: String) -> Cursor<'a> {
        let mut path = self.path.clone();
        path.push(step);
        Cursor {
            target: element.into(),
            path,
        }
    }

    /// Navigate to the first direct child with the given description
    pub fn child(&self, description: &str) -> Result<Cursor<'a>> {
        self.nth_child(description, 0)
    }

    /// Navigate to the `index`-th direct child with the given description
    pub fn nth_child(&self, description: &str, index: usize) -> Result<Cursor<'a>> {
        self.children()
            .iter()
            .filter(|c| c.description() == description)
            .nth(index)
            .map(|child| self.descend(child, format!("{description}[{index}]")))
            .ok_or_else(|| {
                let path = self.path.join("/");
                Error::node_not_found(format!("{path}/{description}[{index}]"))
            })
    }

    /// Navigate to a child by position
    pub fn child_at(&self, index: usize) -> Result<Cursor<'a>> {
        self.children()
            .get(index)
            .map(|child| self.descend(child, format!("[{index}]")))
            .ok_or_else(|| {
                let path = self.path.join("/");
                Error::node_not_found(format!("{path}[{index}]"))
            })
    }

    /// Navigate using a description path (e.g., "C002/DE1001" or "FTX/DE4440[1]")
    pub fn navigate(&self, path: &str) -> Result<Cursor<'a>> {
        let mut cursor = Cursor {
            target: self.target,
            path: self.path.clone(),
        };

        for step in path.split('/') {
            if step.is_empty() {
                continue;
            }

            cursor = if let Some(open) = step.find('[') {
                let inner = step[open + 1..].strip_suffix(']').ok_or_else(|| {
                    Error::invalid_path(path, format!("{step} must end with ']'"))
                })?;
                let index: usize = inner
                    .parse()
                    .map_err(|_| Error::invalid_path(path, format!("invalid index in {step}")))?;
                cursor.nth_child(&step[..open], index)?
            } else {
                cursor.child(step)?
            };
        }

        Ok(cursor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;

    fn ftx() -> Node {
        let mut node = Node::named("FTX", "Freier Text")
            .with_child(Leaf::named("DE4451", "Textbezug, Qualifier"))
            .with_child(Leaf::new("DE4453"))
            .with_child(
                Node::new("C108")
                    .with_child(Leaf::new("DE4440"))
                    .with_child(Leaf::new("DE4440")),
            );
        node.parse(&Value::list([
            Value::from("ACB"),
            Value::from(""),
            Value::from(vec!["first", "second"]),
        ]))
        .unwrap();
        node
    }

    #[test]
    fn test_cursor_child() {
        let node = ftx();
        let cursor = Cursor::new(&node);

        let qualifier = cursor.child("DE4451").unwrap();
        assert_eq!(qualifier.text().unwrap(), "ACB");
        assert_eq!(qualifier.path(), &["FTX".to_string(), "DE4451[0]".to_string()]);
    }

    #[test]
    fn test_cursor_navigate_with_index() {
        let node = ftx();
        let cursor = Cursor::new(&node);

        assert_eq!(cursor.navigate("C108/DE4440").unwrap().text().unwrap(), "first");
        assert_eq!(
            cursor.navigate("C108/DE4440[1]").unwrap().text().unwrap(),
            "second"
        );
    }

    #[test]
    fn test_cursor_child_at() {
        let node = ftx();
        let cursor = Cursor::new(&node);

        let composite = cursor.child_at(2).unwrap();
        assert_eq!(composite.description(), "C108");
        assert!(composite.node().is_some());
        assert!(composite.text().is_err());
    }

    #[test]
    fn test_cursor_not_found() {
        let node = ftx();
        let cursor = Cursor::new(&node);

        assert!(matches!(
            cursor.navigate("C108/DE4440[2]"),
            Err(Error::NodeNotFound { .. })
        ));
        assert!(matches!(cursor.child_at(9), Err(Error::NodeNotFound { .. })));
    }

    #[test]
    fn test_cursor_invalid_path() {
        let node = ftx();
        let cursor = Cursor::new(&node);

        assert!(matches!(
            cursor.navigate("C108/DE4440[x]"),
            Err(Error::InvalidPath { .. })
        ));
        assert!(matches!(
            cursor.navigate("C108/DE4440[1"),
            Err(Error::InvalidPath { .. })
        ));
    }

    #[test]
    fn test_cursor_rejects_text_after_index() {
        let node = ftx();
        let cursor = Cursor::new(&node);

        assert!(matches!(
            cursor.navigate("C108/DE4440[1]garbage"),
            Err(Error::InvalidPath { .. })
        ));
        assert!(matches!(
            cursor.navigate("C108[0]x/DE4440"),
            Err(Error::InvalidPath { .. })
        ));
    }

    #[test]
    fn test_cursor_on_leaf_has_no_children() {
        let element = Element::from(Leaf::new("DE0062"));
        let cursor = Cursor::from_element(&element);

        assert!(cursor.child_at(0).is_err());
        assert_eq!(cursor.text().unwrap(), "");
    }
}
