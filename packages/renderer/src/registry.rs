use lowpage_schema::PropValue;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A registered component: the tag it renders to plus the defaults a new
/// instance starts from when dropped onto the canvas from the palette.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentDescriptor {
    pub name: String,
    pub tag: String,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub default_props: BTreeMap<String, PropValue>,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub default_css: String,
}

impl ComponentDescriptor {
    pub fn new(name: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tag: tag.into(),
            default_props: BTreeMap::new(),
            default_css: String::new(),
        }
    }

    pub fn with_default_prop(mut self, name: impl Into<String>, value: PropValue) -> Self {
        self.default_props.insert(name.into(), value);
        self
    }

    pub fn with_default_css(mut self, css: impl Into<String>) -> Self {
        self.default_css = css.into();
        self
    }
}

/// Open factory from `component_name` to renderable components.
///
/// Unregistered names never fail: they fall back to a generic container
/// tag derived by lowercasing the component name.
#[derive(Debug, Clone, Default)]
pub struct ComponentRegistry {
    entries: BTreeMap<String, ComponentDescriptor>,
}

impl ComponentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, descriptor: ComponentDescriptor) {
        self.entries.insert(descriptor.name.clone(), descriptor);
    }

    pub fn get(&self, name: &str) -> Option<&ComponentDescriptor> {
        self.entries.get(name)
    }

    /// Tag to instantiate for a component name, with the generic fallback
    pub fn resolve_tag(&self, name: &str) -> String {
        match self.entries.get(name) {
            Some(descriptor) => descriptor.tag.clone(),
            None => name.to_lowercase(),
        }
    }
}
