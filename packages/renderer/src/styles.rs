//! # Scoped Style Registry
//!
//! Each schema node's `css` block is materialized as a rule scoped to the
//! node's id and held here keyed by that id. Editing one node's css only
//! touches its own rule, and rules for deleted nodes are removable by id —
//! no edit ever forces a full document style rebuild.

use lowpage_schema::SchemaNode;
use std::collections::BTreeMap;
use tracing::debug;

/// Active style rules, keyed by node id
#[derive(Debug, Clone, Default)]
pub struct StyleRegistry {
    rules: BTreeMap<String, String>,
}

impl StyleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sync the rules for a node's subtree. Nodes with css get a rule,
    /// nodes whose css became empty lose theirs.
    pub fn sync(&mut self, node: &SchemaNode) {
        if node.css.is_empty() {
            self.rules.remove(&node.id);
        } else {
            self.rules.insert(node.id.clone(), node.css.clone());
        }

        for child in node.child_nodes() {
            self.sync(child);
        }
    }

    /// Sync an entire sibling sequence
    pub fn sync_all(&mut self, nodes: &[SchemaNode]) {
        for node in nodes {
            self.sync(node);
        }
    }

    pub fn set_rule(&mut self, id: impl Into<String>, css: impl Into<String>) {
        self.rules.insert(id.into(), css.into());
    }

    /// Drop the rule for a deleted node
    pub fn remove_rule(&mut self, id: &str) -> bool {
        let removed = self.rules.remove(id).is_some();
        if removed {
            debug!(%id, "removed stale style rule");
        }
        removed
    }

    /// The scoped rule for one node, `#<id>{<css>}`. Css that already
    /// carries its own selector block is kept as written.
    pub fn rule_for(&self, id: &str) -> Option<String> {
        self.rules.get(id).map(|css| scope_rule(id, css))
    }

    /// All active rules as one css text block
    pub fn to_css(&self) -> String {
        let mut out = String::new();
        for (id, css) in &self.rules {
            out.push_str(&scope_rule(id, css));
            out.push('\n');
        }
        out
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

fn scope_rule(id: &str, css: &str) -> String {
    // A block that already names its selector (page-level `:root{...}`,
    // `#id{...}` or `.id{...}` edits) is preserved exactly
    if css.trim_start().starts_with(['#', '.', ':']) && css.contains('{') {
        css.trim().to_string()
    } else {
        format!("#{}{{{}}}", id, css)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rules_scoped_by_id() {
        let node = SchemaNode::new("card-1", "Card").with_css("left:10px;top:20px");

        let mut styles = StyleRegistry::new();
        styles.sync(&node);

        assert_eq!(
            styles.rule_for("card-1").unwrap(),
            "#card-1{left:10px;top:20px}"
        );
    }

    #[test]
    fn test_sync_recurses_into_children() {
        let node = SchemaNode::new("parent", "Card")
            .with_css("left:0")
            .with_child(SchemaNode::new("child", "Label").with_css("color:red"));

        let mut styles = StyleRegistry::new();
        styles.sync(&node);

        assert_eq!(styles.len(), 2);
        assert!(styles.rule_for("child").is_some());
    }

    #[test]
    fn test_stale_rule_removable_by_id() {
        let mut styles = StyleRegistry::new();
        styles.set_rule("gone", "left:0");

        assert!(styles.remove_rule("gone"));
        assert!(!styles.remove_rule("gone"));
        assert!(styles.rule_for("gone").is_none());
    }

    #[test]
    fn test_emptied_css_drops_rule_on_sync() {
        let mut node = SchemaNode::new("a", "Card").with_css("left:0");
        let mut styles = StyleRegistry::new();
        styles.sync(&node);
        assert_eq!(styles.len(), 1);

        node.css.clear();
        styles.sync(&node);
        assert!(styles.is_empty());
    }

    #[test]
    fn test_preselected_block_preserved() {
        let node = SchemaNode::new("page", "Page").with_css(":root {left:0;top:0}");

        let mut styles = StyleRegistry::new();
        styles.sync(&node);

        assert_eq!(styles.rule_for("page").unwrap(), ":root {left:0;top:0}");
    }
}
