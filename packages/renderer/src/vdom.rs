use crate::resolver::CallbackHandle;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Attribute stamped on every rendered element carrying the schema id of
/// the node that produced it. This is the rendered identity link: weak,
/// re-created each render pass, and the key the correlation index reverses.
pub const IDENTITY_ATTR: &str = "data-node-id";

/// View tree node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum VNode {
    Element {
        tag: String,
        attributes: BTreeMap<String, String>,
        children: Vec<VNode>,
        /// Deferred callback props, handed to the component uninvoked
        #[serde(skip)]
        callbacks: BTreeMap<String, CallbackHandle>,
    },

    Text {
        content: String,
    },
}

impl VNode {
    pub fn element(tag: impl Into<String>) -> Self {
        VNode::Element {
            tag: tag.into(),
            attributes: BTreeMap::new(),
            children: Vec::new(),
            callbacks: BTreeMap::new(),
        }
    }

    pub fn text(content: impl Into<String>) -> Self {
        VNode::Text {
            content: content.into(),
        }
    }

    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        if let VNode::Element {
            ref mut attributes, ..
        } = self
        {
            attributes.insert(key.into(), value.into());
        }
        self
    }

    pub fn with_child(mut self, child: VNode) -> Self {
        if let VNode::Element {
            ref mut children, ..
        } = self
        {
            children.push(child);
        }
        self
    }

    pub fn with_children(mut self, new_children: Vec<VNode>) -> Self {
        if let VNode::Element {
            ref mut children, ..
        } = self
        {
            children.extend(new_children);
        }
        self
    }

    pub fn with_callback(mut self, name: impl Into<String>, handle: CallbackHandle) -> Self {
        if let VNode::Element {
            ref mut callbacks, ..
        } = self
        {
            callbacks.insert(name.into(), handle);
        }
        self
    }

    /// Schema id this element renders, read off the identity attribute
    pub fn node_id(&self) -> Option<&str> {
        match self {
            VNode::Element { attributes, .. } => attributes.get(IDENTITY_ATTR).map(String::as_str),
            VNode::Text { .. } => None,
        }
    }

    pub fn children(&self) -> &[VNode] {
        match self {
            VNode::Element { children, .. } => children,
            VNode::Text { .. } => &[],
        }
    }
}

/// Rendered view tree (collection of root nodes)
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ViewDocument {
    pub nodes: Vec<VNode>,
}

impl ViewDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_node(&mut self, node: VNode) {
        self.nodes.push(node);
    }
}
