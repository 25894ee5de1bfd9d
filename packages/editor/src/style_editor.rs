//! # Direct-Manipulation Style Editor
//!
//! Canvas drag gestures on the selection handle produce geometry deltas
//! (`left`, `top`, width and height on resize). This module merges them
//! into the node's css text: parse the block into declarations, overwrite
//! the changed geometry properties, serialize back. The node's css is only
//! assigned after the whole merge succeeded, so a malformed block leaves
//! the schema untouched.

use lowpage_schema::SchemaNode;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error, PartialEq)]
pub enum StyleEditError {
    #[error("malformed css block: {0}")]
    CssParse(String),
}

/// Geometry fields a selection-handle gesture may change; `None` fields
/// are left as they are in the node's css
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeometryStyle {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub left: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<String>,
}

impl GeometryStyle {
    pub fn offset(left: impl Into<String>, top: impl Into<String>) -> Self {
        Self {
            left: Some(left.into()),
            top: Some(top.into()),
            ..Self::default()
        }
    }

    fn pairs(&self) -> impl Iterator<Item = (&'static str, &str)> {
        [
            ("left", self.left.as_deref()),
            ("top", self.top.as_deref()),
            ("width", self.width.as_deref()),
            ("height", self.height.as_deref()),
        ]
        .into_iter()
        .filter_map(|(name, value)| value.map(|v| (name, v)))
    }
}

/// A css block split into its selector shell (if it carried one) and its
/// ordered declarations
#[derive(Debug, Clone, PartialEq)]
pub struct StyleBlock {
    selector: Option<String>,
    declarations: Vec<(String, String)>,
}

impl StyleBlock {
    /// Parse a node css text. Accepts either bare declarations
    /// (`left:1px;top:2px`) or a single selector block
    /// (`#id{...}` / `.id{...}` / `:root{...}`).
    pub fn parse(css: &str) -> Result<Self, StyleEditError> {
        let trimmed = css.trim();

        let (selector, body) = if trimmed.starts_with(['#', '.', ':']) && trimmed.contains('{') {
            let open = trimmed.find('{').unwrap_or(0);
            let close = trimmed
                .rfind('}')
                .ok_or_else(|| StyleEditError::CssParse("unterminated block".to_string()))?;
            if close < open {
                return Err(StyleEditError::CssParse("unterminated block".to_string()));
            }
            (
                Some(trimmed[..open].trim().to_string()),
                &trimmed[open + 1..close],
            )
        } else if trimmed.contains(['{', '}']) {
            return Err(StyleEditError::CssParse(
                "braces without a selector".to_string(),
            ));
        } else {
            (None, trimmed)
        };

        let mut declarations = Vec::new();
        for decl in body.split(';') {
            let decl = decl.trim();
            if decl.is_empty() {
                continue;
            }
            let Some((name, value)) = decl.split_once(':') else {
                return Err(StyleEditError::CssParse(format!(
                    "declaration without a colon: {decl:?}"
                )));
            };
            let (name, value) = (name.trim(), value.trim());
            if name.is_empty() || value.is_empty() {
                return Err(StyleEditError::CssParse(format!(
                    "empty property or value in {decl:?}"
                )));
            }
            declarations.push((name.to_string(), value.to_string()));
        }

        Ok(Self {
            selector,
            declarations,
        })
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.declarations
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Overwrite a declaration in place, or append it
    pub fn set(&mut self, name: &str, value: &str) {
        if let Some(slot) = self.declarations.iter_mut().find(|(n, _)| n == name) {
            slot.1 = value.to_string();
        } else {
            self.declarations.push((name.to_string(), value.to_string()));
        }
    }

    /// Serialize, keeping the selector shell the block came with
    pub fn to_css(&self) -> String {
        let body: Vec<String> = self
            .declarations
            .iter()
            .map(|(n, v)| format!("{n}:{v}"))
            .collect();
        let body = body.join(";");

        match &self.selector {
            Some(selector) => format!("{selector}{{{body}}}"),
            None => body,
        }
    }
}

/// Merge a gesture's geometry into the node's css text. On a parse error
/// nothing is written back.
pub fn apply_geometry(node: &mut SchemaNode, style: &GeometryStyle) -> Result<(), StyleEditError> {
    let mut block = match StyleBlock::parse(&node.css) {
        Ok(block) => block,
        Err(error) => {
            warn!(node_id = %node.id, %error, "css block unreadable, edit aborted");
            return Err(error);
        }
    };

    for (name, value) in style.pairs() {
        block.set(name, value);
    }

    node.css = block.to_css();
    debug!(node_id = %node.id, css = %node.css, "geometry applied");
    Ok(())
}
