use crate::props::PropValue;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SchemaError {
    #[error("Duplicate node id: {0}")]
    DuplicateId(String),

    #[error("Node not found: {0}")]
    NodeNotFound(String),
}

/// The unit of the UI description.
///
/// `id` is unique within a tree and stable across edits. A node without a
/// `component_name` never appears directly; plain text lives in
/// [`SchemaChild::Text`] leaves instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaNode {
    pub id: String,

    #[serde(rename = "componentName", skip_serializing_if = "Option::is_none")]
    pub component_name: Option<String>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub props: BTreeMap<String, PropValue>,

    /// CSS-text block scoped to `id` (see the renderer's style registry)
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub css: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<SchemaChild>,

    /// Outline variant, e.g. "group" for nested containers
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    /// UI-only display flag for the outline tree
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub expanded: bool,
}

/// A child entry: either a nested node or a plain text leaf.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SchemaChild {
    Text(String),
    Node(SchemaNode),
}

impl SchemaChild {
    pub fn as_node(&self) -> Option<&SchemaNode> {
        match self {
            SchemaChild::Node(node) => Some(node),
            SchemaChild::Text(_) => None,
        }
    }
}

impl SchemaNode {
    pub fn new(id: impl Into<String>, component_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            component_name: Some(component_name.into()),
            props: BTreeMap::new(),
            css: String::new(),
            children: Vec::new(),
            kind: None,
            expanded: false,
        }
    }

    /// A "group" outline container
    pub fn group(id: impl Into<String>, component_name: impl Into<String>) -> Self {
        let mut node = Self::new(id, component_name);
        node.kind = Some("group".to_string());
        node
    }

    pub fn with_prop(mut self, name: impl Into<String>, value: PropValue) -> Self {
        self.props.insert(name.into(), value);
        self
    }

    pub fn with_css(mut self, css: impl Into<String>) -> Self {
        self.css = css.into();
        self
    }

    pub fn with_child(mut self, child: SchemaNode) -> Self {
        self.children.push(SchemaChild::Node(child));
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.children.push(SchemaChild::Text(text.into()));
        self
    }

    pub fn is_group(&self) -> bool {
        self.kind.as_deref() == Some("group")
    }

    /// Nested nodes, skipping text leaves
    pub fn child_nodes(&self) -> impl Iterator<Item = &SchemaNode> {
        self.children.iter().filter_map(SchemaChild::as_node)
    }

    /// Find a node by id within this subtree (self included)
    pub fn find(&self, id: &str) -> Option<&SchemaNode> {
        if self.id == id {
            return Some(self);
        }
        self.child_nodes().find_map(|child| child.find(id))
    }

    pub fn find_mut(&mut self, id: &str) -> Option<&mut SchemaNode> {
        if self.id == id {
            return Some(self);
        }
        for child in &mut self.children {
            if let SchemaChild::Node(node) = child {
                if let Some(found) = node.find_mut(id) {
                    return Some(found);
                }
            }
        }
        None
    }

    /// Collect every id in this subtree in pre-order
    pub fn collect_ids(&self, out: &mut Vec<String>) {
        out.push(self.id.clone());
        for child in self.child_nodes() {
            child.collect_ids(out);
        }
    }

    /// Remove a descendant by id and return it
    pub fn remove_descendant(&mut self, id: &str) -> Option<SchemaNode> {
        if let Some(pos) = self
            .children
            .iter()
            .position(|c| c.as_node().is_some_and(|n| n.id == id))
        {
            match self.children.remove(pos) {
                SchemaChild::Node(node) => return Some(node),
                SchemaChild::Text(_) => unreachable!("position matched a node child"),
            }
        }

        for child in &mut self.children {
            if let SchemaChild::Node(node) = child {
                if let Some(removed) = node.remove_descendant(id) {
                    return Some(removed);
                }
            }
        }

        None
    }
}

/// Where to place a relocated node relative to an anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertPosition {
    /// Immediately before the anchor in its sibling sequence
    Before,
    /// Immediately after the anchor in its sibling sequence
    After,
    /// Appended as the anchor's last child
    LastChild,
}

/// Find a node by id in a sibling sequence
pub fn find_node<'a>(nodes: &'a [SchemaNode], id: &str) -> Option<&'a SchemaNode> {
    nodes.iter().find_map(|node| node.find(id))
}

pub fn find_node_mut<'a>(nodes: &'a mut [SchemaNode], id: &str) -> Option<&'a mut SchemaNode> {
    nodes.iter_mut().find_map(|node| node.find_mut(id))
}

/// Remove a node by id from anywhere in a sibling sequence and return it
pub fn remove_node(nodes: &mut Vec<SchemaNode>, id: &str) -> Option<SchemaNode> {
    if let Some(pos) = nodes.iter().position(|n| n.id == id) {
        return Some(nodes.remove(pos));
    }

    for node in nodes.iter_mut() {
        if let Some(removed) = node.remove_descendant(id) {
            return Some(removed);
        }
    }

    None
}

/// Insert `node` relative to the node with id `anchor`.
///
/// On failure (anchor not found) the node is handed back so the caller
/// never loses it mid-relocation.
pub fn insert_relative(
    nodes: &mut Vec<SchemaNode>,
    anchor: &str,
    node: SchemaNode,
    position: InsertPosition,
) -> Result<(), SchemaNode> {
    if let Some(pos) = nodes.iter().position(|n| n.id == anchor) {
        match position {
            InsertPosition::Before => nodes.insert(pos, node),
            InsertPosition::After => nodes.insert(pos + 1, node),
            InsertPosition::LastChild => nodes[pos].children.push(SchemaChild::Node(node)),
        }
        return Ok(());
    }

    let mut pending = node;
    for parent in nodes.iter_mut() {
        match insert_relative_children(&mut parent.children, anchor, pending, position) {
            Ok(()) => return Ok(()),
            Err(back) => pending = back,
        }
    }

    Err(pending)
}

fn insert_relative_children(
    children: &mut Vec<SchemaChild>,
    anchor: &str,
    node: SchemaNode,
    position: InsertPosition,
) -> Result<(), SchemaNode> {
    if let Some(pos) = children
        .iter()
        .position(|c| c.as_node().is_some_and(|n| n.id == anchor))
    {
        match position {
            InsertPosition::Before => children.insert(pos, SchemaChild::Node(node)),
            InsertPosition::After => children.insert(pos + 1, SchemaChild::Node(node)),
            InsertPosition::LastChild => match &mut children[pos] {
                SchemaChild::Node(parent) => parent.children.push(SchemaChild::Node(node)),
                SchemaChild::Text(_) => unreachable!("position matched a node child"),
            },
        }
        return Ok(());
    }

    let mut pending = node;
    for child in children.iter_mut() {
        if let SchemaChild::Node(parent) = child {
            match insert_relative_children(&mut parent.children, anchor, pending, position) {
                Ok(()) => return Ok(()),
                Err(back) => pending = back,
            }
        }
    }

    Err(pending)
}

/// Check the id-uniqueness invariant over a sibling sequence
pub fn validate_unique_ids(nodes: &[SchemaNode]) -> Result<(), SchemaError> {
    let mut ids = Vec::new();
    for node in nodes {
        node.collect_ids(&mut ids);
    }

    let mut seen = std::collections::HashSet::new();
    for id in ids {
        if !seen.insert(id.clone()) {
            return Err(SchemaError::DuplicateId(id));
        }
    }

    Ok(())
}
