//! # Node Correlation Index
//!
//! The render engine stamps every emitted element with its schema id (the
//! identity attribute). Mounting a rendered view onto the canvas assigns
//! each element a fresh, opaque [`ElementId`] — the analog of a raw element
//! reference, unique per mount so a re-mounted node is a *different*
//! element even when its schema id is unchanged.
//!
//! [`Canvas::locate`] reverses the link: pointer target element → identity
//! attribute → schema node. A miss is not an error, it is a normal `None`.

use lowpage_renderer::{VNode, ViewDocument};
use lowpage_schema::{find_node, SchemaNode};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;

// Process-wide uid source: handles minted by different canvases (or
// successive mounts of the same canvas) must never compare equal.
static NEXT_UID: AtomicU64 = AtomicU64::new(1);

/// Opaque handle to a live element in the mounted canvas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(u64);

#[derive(Debug, Clone)]
struct MountedElement {
    node_id: Option<String>,
    parent: Option<ElementId>,
}

/// The managed canvas region: the currently mounted view tree, indexed for
/// reverse lookup from elements to schema nodes.
#[derive(Debug, Default)]
pub struct Canvas {
    elements: HashMap<ElementId, MountedElement>,
    by_node_id: HashMap<String, ElementId>,
    roots: Vec<ElementId>,
}

impl Canvas {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mount a rendered view, replacing any previous mount. Every element
    /// gets a fresh id; handles from earlier mounts stop resolving.
    pub fn mount(&mut self, doc: &ViewDocument) {
        self.elements.clear();
        self.by_node_id.clear();
        self.roots.clear();

        let roots: Vec<_> = doc
            .nodes
            .iter()
            .filter_map(|node| self.mount_node(node, None))
            .collect();
        self.roots = roots;

        debug!(elements = self.elements.len(), "canvas mounted");
    }

    fn mount_node(&mut self, node: &VNode, parent: Option<ElementId>) -> Option<ElementId> {
        match node {
            VNode::Element { children, .. } => {
                let id = ElementId(NEXT_UID.fetch_add(1, Ordering::Relaxed));

                self.elements.insert(
                    id,
                    MountedElement {
                        node_id: node.node_id().map(str::to_string),
                        parent,
                    },
                );
                if let Some(node_id) = node.node_id() {
                    self.by_node_id.insert(node_id.to_string(), id);
                }

                for child in children {
                    self.mount_node(child, Some(id));
                }

                Some(id)
            }
            // text content is not independently targetable
            VNode::Text { .. } => None,
        }
    }

    /// Whether an element belongs to the current mount
    pub fn contains(&self, element: ElementId) -> bool {
        self.elements.contains_key(&element)
    }

    /// Live element currently rendering a schema node
    pub fn element_of(&self, node_id: &str) -> Option<ElementId> {
        self.by_node_id.get(node_id).copied()
    }

    /// Schema id attached to an element, walking up to the nearest tagged
    /// ancestor when the target itself carries no identity
    pub fn node_id_of(&self, element: ElementId) -> Option<&str> {
        let mut current = self.elements.get(&element)?;
        loop {
            if let Some(node_id) = &current.node_id {
                return Some(node_id);
            }
            current = self.elements.get(&current.parent?)?;
        }
    }

    /// Resolve a pointer-event target back to its schema node.
    ///
    /// Targets outside the managed canvas region never match, regardless
    /// of any identity they may carry.
    pub fn locate<'a>(
        &self,
        target: ElementId,
        schema: &'a [SchemaNode],
    ) -> Option<&'a SchemaNode> {
        if !self.contains(target) {
            return None;
        }

        let node_id = self.node_id_of(target)?;
        find_node(schema, node_id)
    }
}
