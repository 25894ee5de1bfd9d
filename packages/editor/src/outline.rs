//! # Outline Drag Engine
//!
//! Drag-and-drop reordering of the outline list. A gesture snapshots the
//! committed list into a working copy; every drag-move relocates the
//! dragged node inside the working copy only, and drag-end commits the
//! working copy iff it structurally diverged. Relocation is always
//! remove-before-insert, so the dragged id can never appear twice.

use lowpage_schema::{find_node, find_node_mut, insert_relative, remove_node};
use lowpage_schema::{InsertPosition, SchemaNode};
use tracing::debug;

pub type OutlineList = Vec<SchemaNode>;

/// Element classification on drag-enter
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropTarget {
    /// An outline row body: sibling insertion relative to that row
    Row { node_id: String },
    /// A group header's child zone: append as last child of that group
    ChildZone { group_id: String },
    /// Anything else; no state change
    Other,
}

/// Vertical extent of the row currently under the pointer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RowBounds {
    pub top: f64,
    pub height: f64,
}

impl RowBounds {
    pub fn new(top: f64, height: f64) -> Self {
        Self { top, height }
    }

    fn is_top_half(&self, pointer_y: f64) -> bool {
        pointer_y < self.top + self.height / 2.0
    }
}

#[derive(Debug, Clone, PartialEq)]
enum PendingDrop {
    Sibling { anchor: String },
    Child { group: String },
}

/// One in-flight drag gesture over the outline
#[derive(Debug, Clone)]
pub struct DragSession {
    source_id: String,
    committed: OutlineList,
    working: OutlineList,
    pending: Option<PendingDrop>,
    placeholder_visible: bool,
}

impl DragSession {
    /// Snapshot the committed list; `None` when the dragged id is not in it
    pub fn begin(source_id: impl Into<String>, list: &OutlineList) -> Option<Self> {
        let source_id = source_id.into();
        find_node(list, &source_id)?;

        debug!(source_id = %source_id, "outline drag started");
        Some(Self {
            source_id,
            committed: list.clone(),
            working: list.clone(),
            pending: None,
            placeholder_visible: false,
        })
    }

    pub fn source_id(&self) -> &str {
        &self.source_id
    }

    /// The uncommitted list, as the outline view should display it mid-drag
    pub fn working(&self) -> &OutlineList {
        &self.working
    }

    pub fn placeholder_visible(&self) -> bool {
        self.placeholder_visible
    }

    /// Drag-enter over a candidate drop element. Entering a collapsed
    /// group's child zone expands it in the working copy.
    pub fn enter(&mut self, target: DropTarget) {
        match target {
            DropTarget::Row { node_id } => {
                if find_node(&self.working, &node_id).is_some() {
                    self.pending = Some(PendingDrop::Sibling { anchor: node_id });
                    self.placeholder_visible = true;
                }
            }
            DropTarget::ChildZone { group_id } => {
                let Some(group) = find_node_mut(&mut self.working, &group_id) else {
                    return;
                };
                if !group.is_group() {
                    return;
                }
                group.expanded = true;
                self.pending = Some(PendingDrop::Child { group: group_id });
                self.placeholder_visible = true;
            }
            DropTarget::Other => {}
        }
    }

    /// Drag-move over the current target row: top half inserts before the
    /// anchor, bottom half after it; a child zone always appends as last
    /// child regardless of the half.
    pub fn drag_move(&mut self, pointer_y: f64, bounds: RowBounds) {
        let Some(pending) = self.pending.clone() else {
            return;
        };

        match pending {
            PendingDrop::Sibling { anchor } => {
                let position = if bounds.is_top_half(pointer_y) {
                    InsertPosition::Before
                } else {
                    InsertPosition::After
                };
                self.relocate(&anchor, position);
            }
            PendingDrop::Child { group } => {
                self.relocate(&group, InsertPosition::LastChild);
            }
        }
    }

    /// Drag-end. Hides the placeholder and hands back the working copy iff
    /// it structurally diverged from the committed list.
    pub fn finish(mut self) -> Option<OutlineList> {
        self.placeholder_visible = false;

        if self.working == self.committed {
            debug!(source_id = %self.source_id, "outline drag ended without change");
            return None;
        }

        debug!(source_id = %self.source_id, "outline drag committed");
        Some(self.working)
    }

    fn relocate(&mut self, anchor: &str, position: InsertPosition) {
        // self-drop is a no-op
        if anchor == self.source_id {
            return;
        }

        let Some(source) = find_node(&self.working, &self.source_id) else {
            return;
        };

        // dropping onto one's own descendant would orphan the subtree
        if source.find(anchor).is_some() {
            return;
        }

        if find_node(&self.working, anchor).is_none() {
            return;
        }

        let Some(node) = remove_node(&mut self.working, &self.source_id) else {
            return;
        };

        if let Err(node) = insert_relative(&mut self.working, anchor, node, position) {
            // anchor vanished between lookup and insert; restore the node
            // so the id multiset is preserved
            self.working.push(node);
        }
    }
}
