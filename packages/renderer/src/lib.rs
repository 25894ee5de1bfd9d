//! # Lowpage Renderer
//!
//! Schema → view tree rendering for the page builder.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ schema: serializable node tree              │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ resolver: prop bag → runtime values         │
//! │  - literals pass through                    │
//! │  - expressions via the Evaluator capability │
//! │  - callbacks packaged uninvoked             │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ renderer: schema → VNode tree               │
//! │  - registry lookup, lowercased-tag fallback │
//! │  - identity attribute per element           │
//! └─────────────────────────────────────────────┘
//!                     +
//! ┌─────────────────────────────────────────────┐
//! │ styles: per-id scoped css rules             │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Determinism Contract
//!
//! Rendering is fully deterministic: the same schema and data context
//! produce the same view tree and the same identity keys on every pass.
//! The editor's correlation index depends on this.

pub mod evaluator;
pub mod registry;
pub mod renderer;
pub mod resolver;
pub mod styles;
pub mod value;
pub mod vdom;

pub use evaluator::{DataContext, EvalError, EvalResult, Evaluator, ExpressionEvaluator};
pub use registry::{ComponentDescriptor, ComponentRegistry};
pub use renderer::Renderer;
pub use resolver::{resolve, CallbackHandle, ResolvedProp, ResolvedProps};
pub use styles::StyleRegistry;
pub use value::Value;
pub use vdom::{VNode, ViewDocument, IDENTITY_ATTR};
