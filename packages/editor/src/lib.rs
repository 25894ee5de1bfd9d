//! # Lowpage Editor
//!
//! Live-editing surfaces over a rendered page: hover/selection policies,
//! outline drag reordering, direct-manipulation style edits, and the
//! document handle every edit commits through.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ canvas: element ↔ schema correlation index  │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ session: hover / selection / drag policies  │
//! │  - dedup by (element, schema id) pair       │
//! │  - debounced hover, throttled drag probing  │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌──────────────────────┐ ┌────────────────────┐
//! │ outline: drag engine │ │ style_editor:      │
//! │  working-copy drops  │ │  geometry merges   │
//! └──────────────────────┘ └────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ dsl: the one write path to the schema       │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! All handlers are synchronous and single-threaded; rate limiting bounds
//! how often they fire, never what they compute.

pub mod canvas;
pub mod dsl;
pub mod errors;
pub mod outline;
pub mod overlay;
pub mod session;
pub mod style_editor;
pub mod timing;

pub use canvas::{Canvas, ElementId};
pub use dsl::{Mutation, PageDocument};
pub use errors::{DslError, EditorError};
pub use outline::{DragSession, DropTarget, OutlineList, RowBounds};
pub use overlay::{apply_update, DeleteRequest, HandleDragEnd, Overlay, OverlayTarget};
pub use session::{EditorSession, OverlayUpdate, SelectionUpdate};
pub use style_editor::{apply_geometry, GeometryStyle, StyleBlock, StyleEditError};
pub use timing::{Debounce, Throttle};
