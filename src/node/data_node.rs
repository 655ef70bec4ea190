//! DataNode — one named element of the generic persistence tree.

use serde::{Deserialize, Serialize};
use super::NodeValue;

/// A named node holding an optional value and an ordered list of children.
///
/// Attribute records write one child per field: the child's name is the
/// field name and its value is the field's encoded data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataNode {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<NodeValue>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<DataNode>,
}

impl DataNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: None,
            children: Vec::new(),
        }
    }

    pub fn with_value(name: impl Into<String>, value: impl Into<NodeValue>) -> Self {
        Self {
            name: name.into(),
            value: Some(value.into()),
            children: Vec::new(),
        }
    }

    /// Append a child and return a mutable handle to it.
    pub fn add_child(&mut self, child: DataNode) -> &mut DataNode {
        self.children.push(child);
        let last = self.children.len() - 1;
        &mut self.children[last]
    }

    /// Append a leaf child holding `value`.
    pub fn add_value(&mut self, name: impl Into<String>, value: impl Into<NodeValue>) {
        self.children.push(DataNode::with_value(name, value));
    }

    /// First child with the given name.
    pub fn child(&self, name: &str) -> Option<&DataNode> {
        self.children.iter().find(|c| c.name == name)
    }

    pub fn child_mut(&mut self, name: &str) -> Option<&mut DataNode> {
        self.children.iter_mut().find(|c| c.name == name)
    }

    pub fn child_at(&self, index: usize) -> Option<&DataNode> {
        self.children.get(index)
    }

    /// Value of the first child with the given name.
    pub fn child_value(&self, name: &str) -> Option<&NodeValue> {
        self.child(name).and_then(|c| c.value.as_ref())
    }

    pub fn children(&self) -> &[DataNode] {
        &self.children
    }

    /// Remove the first child with the given name, returning it.
    pub fn remove_child(&mut self, name: &str) -> Option<DataNode> {
        let pos = self.children.iter().position(|c| c.name == name)?;
        Some(self.children.remove(pos))
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}
