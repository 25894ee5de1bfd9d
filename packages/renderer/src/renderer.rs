//! # Schema Render Engine
//!
//! Recursively turns a schema tree into a view tree. Each component node
//! resolves its props (see [`crate::resolver`]), is instantiated through
//! the component registry (unregistered names fall back to a generic
//! lowercased tag), stamps its schema id as the identity attribute, and
//! renders its children as descendants. Text leaves render as literal text
//! content, never as containers.
//!
//! Rendering is deterministic and idempotent: the same schema and context
//! always produce the same view tree with the same identity keys, so the
//! editor's hover/select probing stays stable across incidental re-renders.

use crate::evaluator::{DataContext, Evaluator};
use crate::registry::ComponentRegistry;
use crate::resolver::{resolve, ResolvedProp};
use crate::vdom::{VNode, ViewDocument, IDENTITY_ATTR};
use lowpage_schema::{SchemaChild, SchemaNode};
use tracing::{debug, instrument};

pub struct Renderer<'a> {
    registry: &'a ComponentRegistry,
    evaluator: &'a dyn Evaluator,
}

impl<'a> Renderer<'a> {
    pub fn new(registry: &'a ComponentRegistry, evaluator: &'a dyn Evaluator) -> Self {
        Self {
            registry,
            evaluator,
        }
    }

    /// Render a sibling sequence, order preserved
    #[instrument(skip_all, fields(roots = schema.len()))]
    pub fn render(&self, schema: &[SchemaNode], context: &DataContext) -> ViewDocument {
        let mut doc = ViewDocument::new();
        for node in schema {
            doc.add_node(self.render_node(node, context));
        }
        doc
    }

    /// Render an optional single root; `None` renders to nothing
    pub fn render_optional(
        &self,
        schema: Option<&SchemaNode>,
        context: &DataContext,
    ) -> ViewDocument {
        match schema {
            Some(node) => self.render(std::slice::from_ref(node), context),
            None => ViewDocument::new(),
        }
    }

    fn render_node(&self, node: &SchemaNode, context: &DataContext) -> VNode {
        let tag = match &node.component_name {
            Some(name) => self.registry.resolve_tag(name),
            // A node without a component renders as a plain container so
            // its children stay reachable; text leaves are SchemaChild::Text
            None => "div".to_string(),
        };

        debug!(id = %node.id, %tag, "rendering node");

        let mut element = VNode::element(tag).with_attr(IDENTITY_ATTR, &node.id);

        for (name, prop) in resolve(&node.props, context, self.evaluator) {
            match prop {
                ResolvedProp::Value(value) => {
                    element = element.with_attr(name, value.display_string());
                }
                ResolvedProp::Callback(handle) => {
                    element = element.with_callback(name, handle);
                }
            }
        }

        for child in &node.children {
            let rendered = match child {
                SchemaChild::Text(text) => VNode::text(text.clone()),
                SchemaChild::Node(child_node) => self.render_node(child_node, context),
            };
            element = element.with_child(rendered);
        }

        element
    }
}
