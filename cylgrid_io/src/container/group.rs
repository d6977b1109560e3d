//! Groups and nodes of the container tree.

use std::collections::BTreeMap;

use cylgrid_core::ExternalLink;

use super::dataset::{AttrValue, Attributes, Dataset};
use crate::error::{IoError, Result};

/// Child of a group.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// Nested group.
    Group(Group),
    /// Array leaf.
    Dataset(Dataset),
    /// Reference to a dataset in another container file.
    Link(ExternalLink),
}

impl Node {
    /// Short description of the node kind, for messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Node::Group(_) => "group",
            Node::Dataset(_) => "dataset",
            Node::Link(_) => "external link",
        }
    }
}

/// Named collection of child nodes with attributes.
///
/// Children are kept sorted by name so encoding is deterministic.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Group {
    attrs: Attributes,
    children: BTreeMap<String, Node>,
}

impl Group {
    /// Create an empty group.
    pub fn new() -> Self {
        Self::default()
    }

    /// All attributes.
    #[inline]
    pub fn attrs(&self) -> &Attributes {
        &self.attrs
    }

    /// Look up an attribute.
    pub fn attr(&self, name: &str) -> Option<&AttrValue> {
        self.attrs.get(name)
    }

    /// Set an attribute, replacing any previous value.
    pub fn set_attr(&mut self, name: impl Into<String>, value: impl Into<AttrValue>) {
        self.attrs.insert(name.into(), value.into());
    }

    /// All children by name.
    #[inline]
    pub fn children(&self) -> &BTreeMap<String, Node> {
        &self.children
    }

    /// Names of all children, in order.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.children.keys().map(String::as_str)
    }

    /// Whether a child with this name exists.
    pub fn contains(&self, name: &str) -> bool {
        self.children.contains_key(name)
    }

    /// Look up a child.
    pub fn node(&self, name: &str) -> Option<&Node> {
        self.children.get(name)
    }

    /// Return the child group `name`, creating it if absent.
    ///
    /// # Errors
    /// Returns `NotAGroup` if a non-group child already has that name.
    pub fn require_group(&mut self, name: &str) -> Result<&mut Group> {
        let node = self
            .children
            .entry(name.to_string())
            .or_insert_with(|| Node::Group(Group::new()));
        match node {
            Node::Group(group) => Ok(group),
            _ => Err(IoError::NotAGroup { path: name.into() }),
        }
    }

    /// Child group `name`.
    pub fn group(&self, name: &str) -> Result<&Group> {
        match self.children.get(name) {
            Some(Node::Group(group)) => Ok(group),
            Some(_) => Err(IoError::NotAGroup { path: name.into() }),
            None => Err(IoError::MissingNode { path: name.into() }),
        }
    }

    /// Child group `name`, for modification.
    pub fn group_mut(&mut self, name: &str) -> Result<&mut Group> {
        match self.children.get_mut(name) {
            Some(Node::Group(group)) => Ok(group),
            Some(_) => Err(IoError::NotAGroup { path: name.into() }),
            None => Err(IoError::MissingNode { path: name.into() }),
        }
    }

    /// Child dataset `name`.
    pub fn dataset(&self, name: &str) -> Result<&Dataset> {
        match self.children.get(name) {
            Some(Node::Dataset(dataset)) => Ok(dataset),
            Some(_) => Err(IoError::NotADataset { path: name.into() }),
            None => Err(IoError::MissingNode { path: name.into() }),
        }
    }

    /// Child dataset `name`, for modification.
    pub fn dataset_mut(&mut self, name: &str) -> Result<&mut Dataset> {
        match self.children.get_mut(name) {
            Some(Node::Dataset(dataset)) => Ok(dataset),
            Some(_) => Err(IoError::NotADataset { path: name.into() }),
            None => Err(IoError::MissingNode { path: name.into() }),
        }
    }

    /// Store a dataset, replacing any node with the same name.
    pub fn insert_dataset(&mut self, name: impl Into<String>, dataset: Dataset) -> Option<Node> {
        self.children.insert(name.into(), Node::Dataset(dataset))
    }

    /// Store an external link, replacing any node with the same name.
    pub fn insert_link(&mut self, name: impl Into<String>, link: ExternalLink) -> Option<Node> {
        self.children.insert(name.into(), Node::Link(link))
    }

    /// Store a nested group, replacing any node with the same name.
    pub fn insert_group(&mut self, name: impl Into<String>, group: Group) -> Option<Node> {
        self.children.insert(name.into(), Node::Group(group))
    }

    /// Remove a child.
    pub fn remove(&mut self, name: &str) -> Option<Node> {
        self.children.remove(name)
    }

    /// Follow a slash-separated path from this group.
    ///
    /// Leading, trailing and repeated slashes are ignored. Links are not
    /// followed; a path that passes through a link is reported as `NotAGroup`.
    pub fn get_path(&self, path: &str) -> Result<&Node> {
        let mut segments = path.split('/').filter(|s| !s.is_empty()).peekable();
        let mut current = self;
        let mut walked = String::new();

        while let Some(segment) = segments.next() {
            walked.push('/');
            walked.push_str(segment);
            let node = current
                .children
                .get(segment)
                .ok_or_else(|| IoError::MissingNode {
                    path: walked.clone(),
                })?;
            if segments.peek().is_none() {
                return Ok(node);
            }
            current = match node {
                Node::Group(group) => group,
                _ => return Err(IoError::NotAGroup { path: walked }),
            };
        }

        Err(IoError::MissingNode { path: path.into() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::{ArrayData, Precision};
    use ndarray::array;

    fn dataset() -> Dataset {
        Dataset::new(ArrayData::from_f64(
            array![1.0, 2.0].into_dyn().view(),
            Precision::F64,
        ))
    }

    #[test]
    fn test_require_group_creates_once() {
        let mut root = Group::new();
        root.require_group("Geometry").unwrap().set_attr("grid_type", "cyl_pol");
        root.require_group("Geometry").unwrap();

        let geometry = root.group("Geometry").unwrap();
        assert_eq!(
            geometry.attr("grid_type").and_then(AttrValue::as_str),
            Some("cyl_pol")
        );
        assert_eq!(root.names().collect::<Vec<_>>(), ["Geometry"]);
    }

    #[test]
    fn test_kind_errors() {
        let mut root = Group::new();
        root.insert_dataset("Walls 1", dataset());

        assert!(matches!(
            root.require_group("Walls 1"),
            Err(IoError::NotAGroup { .. })
        ));
        assert!(matches!(root.group("Walls 1"), Err(IoError::NotAGroup { .. })));
        assert!(matches!(root.dataset("missing"), Err(IoError::MissingNode { .. })));

        root.require_group("Quantities").unwrap();
        assert!(matches!(
            root.dataset("Quantities"),
            Err(IoError::NotADataset { .. })
        ));
    }

    #[test]
    fn test_insert_replaces() {
        let mut root = Group::new();
        assert!(root.insert_dataset("density", dataset()).is_none());
        let previous = root.insert_link("density", ExternalLink::new("a.cyl", "/x"));
        assert!(matches!(previous, Some(Node::Dataset(_))));
        assert_eq!(root.node("density").map(Node::kind), Some("external link"));
        assert!(root.remove("density").is_some());
        assert!(!root.contains("density"));
    }

    #[test]
    fn test_get_path() {
        let mut root = Group::new();
        root.require_group("Quantities")
            .unwrap()
            .insert_dataset("density", dataset());

        let node = root.get_path("/Quantities/density").unwrap();
        assert!(matches!(node, Node::Dataset(_)));
        assert!(matches!(root.get_path("Quantities//"), Ok(Node::Group(_))));

        match root.get_path("/Quantities/energy") {
            Err(IoError::MissingNode { path }) => assert_eq!(path, "/Quantities/energy"),
            other => panic!("unexpected result: {:?}", other),
        }
        assert!(matches!(
            root.get_path("/Quantities/density/x"),
            Err(IoError::NotAGroup { .. })
        ));
        assert!(matches!(root.get_path("/"), Err(IoError::MissingNode { .. })));
    }
}
