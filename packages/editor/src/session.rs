//! # Editor Session State
//!
//! Hover, selection, and drag state for one canvas, held in an explicit
//! state struct passed to each handler rather than ambient mutable fields,
//! so every policy below is testable in isolation.
//!
//! Policies:
//! - hover and selection are independent trackers, each deduplicating by
//!   `(element, schema id)` pair — the same schema id re-mounted to a new
//!   element is a new target
//! - hover never updates while a drag gesture is active anywhere, and is
//!   held for a short grace period after drag-end to avoid a spurious
//!   re-trigger on mouse-up
//! - selection takes precedence: hovering the selected pair clears hover
//!   instead of re-resolving it

use crate::canvas::{Canvas, ElementId};
use crate::timing::{Debounce, Throttle};
use lowpage_schema::SchemaNode;
use std::time::{Duration, Instant};
use tracing::debug;

/// What the overlay should do after a pointer policy decision
#[derive(Debug, Clone, PartialEq)]
pub enum OverlayUpdate {
    Set { element: ElementId, node_id: String },
    Clear,
    Unchanged,
}

/// Result of a click: the selection update, plus whether the hover overlay
/// must be cleared alongside it
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionUpdate {
    pub selection: OverlayUpdate,
    pub clear_hover: bool,
}

#[derive(Debug, Clone, Default)]
struct Tracker {
    current: Option<(ElementId, String)>,
}

impl Tracker {
    fn matches(&self, element: ElementId, node_id: &str) -> bool {
        self.current
            .as_ref()
            .is_some_and(|(el, id)| *el == element && id == node_id)
    }

    fn clear(&mut self) -> OverlayUpdate {
        if self.current.take().is_some() {
            OverlayUpdate::Clear
        } else {
            OverlayUpdate::Unchanged
        }
    }

    fn set(&mut self, element: ElementId, node_id: String) -> OverlayUpdate {
        self.current = Some((element, node_id.clone()));
        OverlayUpdate::Set { element, node_id }
    }
}

pub struct EditorSession {
    hover: Tracker,
    select: Tracker,
    dragging: bool,
    hover_resume_at: Option<Instant>,
    grace: Duration,
    hover_gate: Debounce,
    probe_gate: Throttle,
    current_drag_probe: Option<ElementId>,
}

impl Default for EditorSession {
    fn default() -> Self {
        Self::new()
    }
}

impl EditorSession {
    pub fn new() -> Self {
        Self::with_intervals(
            Duration::from_millis(50),
            Duration::from_millis(300),
            Duration::from_millis(100),
        )
    }

    /// Explicit intervals; zero everywhere is valid and keeps every policy
    /// exact (rate limiting bounds frequency, not correctness)
    pub fn with_intervals(hover_debounce: Duration, probe_throttle: Duration, grace: Duration) -> Self {
        Self {
            hover: Tracker::default(),
            select: Tracker::default(),
            dragging: false,
            hover_resume_at: None,
            grace,
            hover_gate: Debounce::new(hover_debounce),
            probe_gate: Throttle::new(probe_throttle),
            current_drag_probe: None,
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub fn selected_node_id(&self) -> Option<&str> {
        self.select.current.as_ref().map(|(_, id)| id.as_str())
    }

    pub fn hovered_node_id(&self) -> Option<&str> {
        self.hover.current.as_ref().map(|(_, id)| id.as_str())
    }

    /// Pointer-move over the canvas; drives the hover overlay
    pub fn pointer_moved(
        &mut self,
        canvas: &Canvas,
        schema: &[SchemaNode],
        target: Option<ElementId>,
        now: Instant,
    ) -> OverlayUpdate {
        if self.dragging {
            return OverlayUpdate::Unchanged;
        }

        if let Some(resume_at) = self.hover_resume_at {
            if now < resume_at {
                return OverlayUpdate::Unchanged;
            }
            self.hover_resume_at = None;
        }

        if !self.hover_gate.allow(now) {
            return OverlayUpdate::Unchanged;
        }

        let Some(element) = target else {
            // pointer left tracked territory
            return self.hover.clear();
        };

        let Some(node) = canvas.locate(element, schema) else {
            return self.hover.clear();
        };

        // selection precedence: the selected pair is never re-hovered
        if self.select.matches(element, &node.id) {
            return self.hover.clear();
        }

        if self.hover.matches(element, &node.id) {
            return OverlayUpdate::Unchanged;
        }

        debug!(node_id = %node.id, "hover target");
        self.hover.set(element, node.id.clone())
    }

    /// Click on the canvas; drives the selection overlay
    pub fn clicked(
        &mut self,
        canvas: &Canvas,
        schema: &[SchemaNode],
        target: Option<ElementId>,
    ) -> SelectionUpdate {
        if self.dragging {
            return SelectionUpdate {
                selection: OverlayUpdate::Unchanged,
                clear_hover: false,
            };
        }

        let resolved = target.and_then(|element| {
            canvas
                .locate(element, schema)
                .map(|node| (element, node.id.clone()))
        });

        let Some((element, node_id)) = resolved else {
            return SelectionUpdate {
                selection: self.select.clear(),
                clear_hover: false,
            };
        };

        if self.select.matches(element, &node_id) {
            return SelectionUpdate {
                selection: OverlayUpdate::Unchanged,
                clear_hover: false,
            };
        }

        debug!(node_id = %node_id, "selection target");
        let selection = self.select.set(element, node_id);
        // only report a hover clear when one was actually showing
        let clear_hover = self.hover.clear() == OverlayUpdate::Clear;

        SelectionUpdate {
            selection,
            clear_hover,
        }
    }

    /// A drag gesture began somewhere in the editor (selection handle or
    /// outline row); hover is suppressed for its duration
    pub fn drag_started(&mut self) {
        self.dragging = true;
        self.current_drag_probe = None;
    }

    /// Drag gesture ended; hover stays suppressed for the grace period
    pub fn drag_ended(&mut self, now: Instant) {
        self.dragging = false;
        self.hover_resume_at = Some(now + self.grace);
    }

    /// Throttled drag-over probing on the canvas. Returns the newly entered
    /// element when it changed, `None` while it is unchanged or throttled.
    pub fn drag_over(&mut self, target: ElementId, now: Instant) -> Option<ElementId> {
        if !self.probe_gate.allow(now) {
            return None;
        }
        if self.current_drag_probe == Some(target) {
            return None;
        }
        self.current_drag_probe = Some(target);
        Some(target)
    }

    /// Drop the selection if its node disappeared from the schema (e.g.
    /// after a delete); the canvas re-mount invalidates the element anyway
    pub fn prune(&mut self, schema: &[SchemaNode]) -> OverlayUpdate {
        let stale = self
            .select
            .current
            .as_ref()
            .is_some_and(|(_, id)| lowpage_schema::find_node(schema, id).is_none());

        if stale {
            self.select.clear()
        } else {
            OverlayUpdate::Unchanged
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lowpage_renderer::{ComponentRegistry, DataContext, ExpressionEvaluator, Renderer};
    use lowpage_schema::SchemaNode;

    fn setup(schema: &[SchemaNode]) -> Canvas {
        let registry = ComponentRegistry::new();
        let evaluator = ExpressionEvaluator::new();
        let doc = Renderer::new(&registry, &evaluator).render(schema, &DataContext::new());
        let mut canvas = Canvas::new();
        canvas.mount(&doc);
        canvas
    }

    fn session() -> EditorSession {
        EditorSession::with_intervals(Duration::ZERO, Duration::ZERO, Duration::ZERO)
    }

    #[test]
    fn test_hover_sets_then_dedups() {
        let schema = vec![SchemaNode::new("a", "Button")];
        let canvas = setup(&schema);
        let mut session = session();
        let el = canvas.element_of("a").unwrap();
        let now = Instant::now();

        assert_eq!(
            session.pointer_moved(&canvas, &schema, Some(el), now),
            OverlayUpdate::Set {
                element: el,
                node_id: "a".to_string()
            }
        );
        // same pair again: no redundant update
        assert_eq!(
            session.pointer_moved(&canvas, &schema, Some(el), now),
            OverlayUpdate::Unchanged
        );
    }

    #[test]
    fn test_hover_clears_outside_canvas() {
        let schema = vec![SchemaNode::new("a", "Button")];
        let canvas = setup(&schema);
        let mut session = session();
        let el = canvas.element_of("a").unwrap();
        let now = Instant::now();

        session.pointer_moved(&canvas, &schema, Some(el), now);
        assert_eq!(
            session.pointer_moved(&canvas, &schema, None, now),
            OverlayUpdate::Clear
        );
        assert_eq!(
            session.pointer_moved(&canvas, &schema, None, now),
            OverlayUpdate::Unchanged
        );
    }

    #[test]
    fn test_selection_precedence_clears_hover() {
        let schema = vec![SchemaNode::new("a", "Button")];
        let canvas = setup(&schema);
        let mut session = session();
        let el = canvas.element_of("a").unwrap();
        let now = Instant::now();

        session.pointer_moved(&canvas, &schema, Some(el), now);
        let update = session.clicked(&canvas, &schema, Some(el));
        assert!(update.clear_hover);
        assert_eq!(session.selected_node_id(), Some("a"));

        // hovering the selected pair clears hover instead of re-resolving
        session.pointer_moved(&canvas, &schema, Some(el), now);
        assert_eq!(session.hovered_node_id(), None);
    }

    #[test]
    fn test_click_without_active_hover_skips_hover_clear() {
        let schema = vec![SchemaNode::new("a", "Button")];
        let canvas = setup(&schema);
        let mut session = session();
        let el = canvas.element_of("a").unwrap();

        // nothing hovered yet: selecting must not emit a redundant clear
        let update = session.clicked(&canvas, &schema, Some(el));
        assert!(matches!(update.selection, OverlayUpdate::Set { .. }));
        assert!(!update.clear_hover);
    }

    #[test]
    fn test_reselect_same_pair_is_unchanged() {
        let schema = vec![SchemaNode::new("a", "Button")];
        let canvas = setup(&schema);
        let mut session = session();
        let el = canvas.element_of("a").unwrap();

        session.clicked(&canvas, &schema, Some(el));
        let update = session.clicked(&canvas, &schema, Some(el));
        assert_eq!(update.selection, OverlayUpdate::Unchanged);
    }

    #[test]
    fn test_hover_suppressed_while_dragging() {
        let schema = vec![SchemaNode::new("a", "Button")];
        let canvas = setup(&schema);
        let mut session = session();
        let el = canvas.element_of("a").unwrap();
        let now = Instant::now();

        session.drag_started();
        assert_eq!(
            session.pointer_moved(&canvas, &schema, Some(el), now),
            OverlayUpdate::Unchanged
        );
    }

    #[test]
    fn test_hover_grace_after_drag_end() {
        let schema = vec![SchemaNode::new("a", "Button")];
        let canvas = setup(&schema);
        let mut session =
            EditorSession::with_intervals(Duration::ZERO, Duration::ZERO, Duration::from_millis(100));
        let el = canvas.element_of("a").unwrap();
        let now = Instant::now();

        session.drag_started();
        session.drag_ended(now);

        // still inside the grace window
        assert_eq!(
            session.pointer_moved(&canvas, &schema, Some(el), now + Duration::from_millis(50)),
            OverlayUpdate::Unchanged
        );
        // past it
        assert!(matches!(
            session.pointer_moved(&canvas, &schema, Some(el), now + Duration::from_millis(150)),
            OverlayUpdate::Set { .. }
        ));
    }

    #[test]
    fn test_remount_makes_hover_a_new_pair() {
        let schema = vec![SchemaNode::new("a", "Button")];
        let registry = ComponentRegistry::new();
        let evaluator = ExpressionEvaluator::new();
        let renderer = Renderer::new(&registry, &evaluator);
        let doc = renderer.render(&schema, &DataContext::new());

        let mut canvas = Canvas::new();
        canvas.mount(&doc);
        let mut session = session();
        let now = Instant::now();

        let first = canvas.element_of("a").unwrap();
        session.pointer_moved(&canvas, &schema, Some(first), now);

        canvas.mount(&doc);
        let second = canvas.element_of("a").unwrap();

        // same schema id, new element: a fresh Set, not a dedup hit
        assert!(matches!(
            session.pointer_moved(&canvas, &schema, Some(second), now),
            OverlayUpdate::Set { .. }
        ));
    }

    #[test]
    fn test_drag_over_dedups_target() {
        let mut session = session();
        let now = Instant::now();
        let schema = vec![SchemaNode::new("a", "Button")];
        let canvas = setup(&schema);
        let target = canvas.element_of("a").unwrap();

        assert_eq!(session.drag_over(target, now), Some(target));
        assert_eq!(session.drag_over(target, now), None);
    }
}
