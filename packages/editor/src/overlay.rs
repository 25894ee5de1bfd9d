//! Overlay contract between the session policies and the host UI. The
//! hover and selection overlays are host-rendered chrome; the session only
//! tells them which rendered element to frame, or to hide.

use crate::canvas::ElementId;
use crate::session::OverlayUpdate;
use crate::style_editor::GeometryStyle;

/// What an overlay frames: a live element plus the schema node it maps to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlayTarget {
    pub element: ElementId,
    pub node_id: String,
}

/// Host-side overlay surface (hover outline, selection handles)
pub trait Overlay {
    fn set_node(&mut self, target: Option<OverlayTarget>);
}

/// Forward a session policy decision to an overlay; `Unchanged` is not a
/// call at all, which is the point of the dedup
pub fn apply_update(overlay: &mut dyn Overlay, update: OverlayUpdate) {
    match update {
        OverlayUpdate::Set { element, node_id } => {
            overlay.set_node(Some(OverlayTarget { element, node_id }));
        }
        OverlayUpdate::Clear => overlay.set_node(None),
        OverlayUpdate::Unchanged => {}
    }
}

/// Payload of a selection-handle drag-end: the moved node and where the
/// gesture left it
#[derive(Debug, Clone, PartialEq)]
pub struct HandleDragEnd {
    pub node_id: String,
    pub geometry: GeometryStyle,
}

/// Payload of the selection overlay's delete affordance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteRequest {
    pub node_id: String,
}
