//! # Page Document Handle
//!
//! The single write path for a page's schema. Every edit surface (palette
//! drop, prop panel, style editor, outline drag, delete affordance) goes
//! through a typed [`Mutation`] applied here; nothing else touches the
//! persisted node tree. Mutations validate before they apply, so a refused
//! mutation leaves the document byte-for-byte as it was.

use crate::errors::DslError;
use crate::outline::OutlineList;
use lowpage_renderer::{ComponentDescriptor, ComponentRegistry};
use lowpage_schema::{find_node, find_node_mut, remove_node, validate_unique_ids};
use lowpage_schema::{IdGenerator, PropValue, SchemaNode};
use serde::{Deserialize, Serialize};
use tracing::info;

/// A single edit to the page schema
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Mutation {
    InsertNode { node: SchemaNode },
    SetProp {
        node_id: String,
        name: String,
        value: PropValue,
    },
    SetCss { node_id: String, css: String },
    RemoveNode { node_id: String },
    ReorderTree { nodes: OutlineList },
}

/// One page's schema document: the node tree plus the bookkeeping the host
/// needs to persist it (version per applied mutation, dirty flag)
#[derive(Debug, Clone)]
pub struct PageDocument {
    name: String,
    nodes: OutlineList,
    version: u64,
    dirty: bool,
    ids: IdGenerator,
}

impl PageDocument {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let ids = IdGenerator::new(&name);
        Self {
            name,
            nodes: Vec::new(),
            version: 0,
            dirty: false,
            ids,
        }
    }

    /// Adopt an existing node tree, refusing one with duplicate ids
    pub fn from_nodes(name: impl Into<String>, nodes: OutlineList) -> Result<Self, DslError> {
        validate_unique_ids(&nodes)?;
        let mut doc = Self::new(name);
        doc.nodes = nodes;
        Ok(doc)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn nodes(&self) -> &OutlineList {
        &self.nodes
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn dirty(&self) -> bool {
        self.dirty
    }

    /// Host persisted the document; reset the flag
    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }

    /// Validate, then apply. A returned error means nothing changed.
    pub fn apply(&mut self, mutation: Mutation) -> Result<(), DslError> {
        match mutation {
            Mutation::InsertNode { node } => {
                if find_node(&self.nodes, &node.id).is_some() {
                    return Err(DslError::DuplicateId(node.id));
                }
                info!(node_id = %node.id, component = ?node.component_name, "insert node");
                self.nodes.push(node);
            }
            Mutation::SetProp {
                node_id,
                name,
                value,
            } => {
                let node = find_node_mut(&mut self.nodes, &node_id)
                    .ok_or_else(|| DslError::NodeNotFound(node_id.clone()))?;
                node.props.insert(name, value);
            }
            Mutation::SetCss { node_id, css } => {
                let node = find_node_mut(&mut self.nodes, &node_id)
                    .ok_or_else(|| DslError::NodeNotFound(node_id.clone()))?;
                node.css = css;
            }
            Mutation::RemoveNode { node_id } => {
                remove_node(&mut self.nodes, &node_id)
                    .ok_or_else(|| DslError::NodeNotFound(node_id.clone()))?;
                info!(node_id = %node_id, "remove node");
            }
            Mutation::ReorderTree { nodes } => {
                validate_unique_ids(&nodes)?;
                if sorted_ids(&nodes) != sorted_ids(&self.nodes) {
                    return Err(DslError::NotAPermutation);
                }
                self.nodes = nodes;
            }
        }

        self.version += 1;
        self.dirty = true;
        Ok(())
    }

    /// Palette drop: instantiate a component from its descriptor defaults
    /// under a fresh document-scoped id
    pub fn add_node(&mut self, descriptor: &ComponentDescriptor) -> Result<String, DslError> {
        let id = self.ids.new_id();
        let mut node = SchemaNode::new(id.clone(), descriptor.name.clone());
        node.props = descriptor.default_props.clone();
        node.css = descriptor.default_css.clone();

        self.apply(Mutation::InsertNode { node })?;
        Ok(id)
    }

    /// Prop-panel edit. The `css` name is not a prop: it routes to the
    /// node's style block instead.
    pub fn set_node_prop(
        &mut self,
        name: &str,
        value_text: &str,
        node_id: &str,
    ) -> Result<(), DslError> {
        if name == "css" {
            return self.apply(Mutation::SetCss {
                node_id: node_id.to_string(),
                css: value_text.to_string(),
            });
        }

        self.apply(Mutation::SetProp {
            node_id: node_id.to_string(),
            name: name.to_string(),
            value: PropValue::literal(value_text),
        })
    }

    /// Palette drop payload: a registry key, resolved to a descriptor
    pub fn add_from_palette(
        &mut self,
        registry: &ComponentRegistry,
        key: &str,
    ) -> Result<String, DslError> {
        let descriptor = registry
            .get(key)
            .ok_or_else(|| DslError::UnknownComponent(key.to_string()))?;
        self.add_node(descriptor)
    }

    pub fn delete_node(&mut self, node_id: &str) -> Result<(), DslError> {
        self.apply(Mutation::RemoveNode {
            node_id: node_id.to_string(),
        })
    }

    /// Commit a finished outline drag: same ids, new shape
    pub fn commit_outline(&mut self, nodes: OutlineList) -> Result<(), DslError> {
        self.apply(Mutation::ReorderTree { nodes })
    }
}

fn sorted_ids(nodes: &[SchemaNode]) -> Vec<String> {
    let mut ids = Vec::new();
    for node in nodes {
        node.collect_ids(&mut ids);
    }
    ids.sort();
    ids
}

#[cfg(test)]
mod tests {
    use super::*;
    use lowpage_schema::SchemaChild;

    #[test]
    fn test_add_node_uses_descriptor_defaults() {
        let descriptor = ComponentDescriptor::new("Button", "button")
            .with_default_prop("label", PropValue::literal("Click"))
            .with_default_css("width:80px");

        let mut doc = PageDocument::new("index");
        let id = doc.add_node(&descriptor).unwrap();

        let node = find_node(doc.nodes(), &id).unwrap();
        assert_eq!(node.component_name.as_deref(), Some("Button"));
        assert_eq!(node.css, "width:80px");
        assert_eq!(node.props.get("label"), Some(&PropValue::literal("Click")));
        assert!(id.starts_with(lowpage_schema::get_document_id("index").as_str()));
    }

    #[test]
    fn test_each_mutation_bumps_version_and_dirties() {
        let mut doc = PageDocument::new("index");
        assert_eq!(doc.version(), 0);
        assert!(!doc.dirty());

        let id = doc.add_node(&ComponentDescriptor::new("Button", "button")).unwrap();
        assert_eq!(doc.version(), 1);
        assert!(doc.dirty());

        doc.mark_clean();
        doc.set_node_prop("label", "Go", &id).unwrap();
        assert_eq!(doc.version(), 2);
        assert!(doc.dirty());
    }

    #[test]
    fn test_css_prop_routes_to_style_block() {
        let mut doc = PageDocument::new("index");
        let id = doc.add_node(&ComponentDescriptor::new("Card", "div")).unwrap();

        doc.set_node_prop("css", "left:10px", &id).unwrap();

        let node = find_node(doc.nodes(), &id).unwrap();
        assert_eq!(node.css, "left:10px");
        assert!(!node.props.contains_key("css"));
    }

    #[test]
    fn test_refused_mutation_changes_nothing() {
        let mut doc = PageDocument::new("index");
        doc.add_node(&ComponentDescriptor::new("Card", "div")).unwrap();
        let version = doc.version();
        let nodes = doc.nodes().clone();

        let err = doc.set_node_prop("label", "x", "missing");
        assert!(matches!(err, Err(DslError::NodeNotFound(_))));
        assert_eq!(doc.version(), version);
        assert_eq!(doc.nodes(), &nodes);
    }

    #[test]
    fn test_reorder_rejects_foreign_ids() {
        let mut doc = PageDocument::new("index");
        doc.add_node(&ComponentDescriptor::new("Card", "div")).unwrap();

        let foreign = vec![SchemaNode::new("alien", "Card")];
        assert!(matches!(
            doc.commit_outline(foreign),
            Err(DslError::NotAPermutation)
        ));
    }

    #[test]
    fn test_reorder_accepts_reparented_permutation() {
        let group = SchemaNode::group("g", "Container");
        let leaf = SchemaNode::new("a", "Block");
        let mut doc =
            PageDocument::from_nodes("index", vec![group.clone(), leaf.clone()]).unwrap();

        let reparented = vec![group.with_child(leaf)];
        doc.commit_outline(reparented).unwrap();

        let g = find_node(doc.nodes(), "g").unwrap();
        assert!(matches!(g.children[0], SchemaChild::Node(ref n) if n.id == "a"));
    }

    #[test]
    fn test_delete_node_removes_descendants_too() {
        let tree = vec![
            SchemaNode::group("g", "Container").with_child(SchemaNode::new("a", "Block")),
        ];
        let mut doc = PageDocument::from_nodes("index", tree).unwrap();

        doc.delete_node("g").unwrap();
        assert!(doc.nodes().is_empty());
        assert!(find_node(doc.nodes(), "a").is_none());
    }

    #[test]
    fn test_palette_key_resolves_through_registry() {
        let mut registry = ComponentRegistry::new();
        registry.register(ComponentDescriptor::new("Button", "button"));

        let mut doc = PageDocument::new("index");
        let id = doc.add_from_palette(&registry, "Button").unwrap();
        assert_eq!(
            find_node(doc.nodes(), &id).unwrap().component_name.as_deref(),
            Some("Button")
        );

        assert!(matches!(
            doc.add_from_palette(&registry, "Nope"),
            Err(DslError::UnknownComponent(_))
        ));
    }

    #[test]
    fn test_from_nodes_rejects_duplicate_ids() {
        let nodes = vec![SchemaNode::new("a", "Block"), SchemaNode::new("a", "Block")];
        assert!(PageDocument::from_nodes("index", nodes).is_err());
    }
}
