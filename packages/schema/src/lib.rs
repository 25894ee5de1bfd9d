//! # Lowpage Schema
//!
//! The serializable UI description edited by the page builder.
//!
//! A schema is an ordered tree of [`SchemaNode`]s. Each node names the
//! component that renders it, carries a prop bag of [`PropValue`]s, a
//! per-node CSS block scoped to its `id`, and an ordered child sequence
//! that mixes nested nodes with plain text leaves.
//!
//! ## Core Principles
//!
//! 1. **Schema is source of truth**: the rendered view and all editor
//!    indexes are derived, disposable projections
//! 2. **Stable ids**: a node's `id` survives every edit and is the key for
//!    correlation, scoped styles, and mutations
//! 3. **Order is meaning**: `children` order is preserved unless a mutation
//!    explicitly relocates a node

mod id;
mod node;
mod props;

pub use id::{get_document_id, IdGenerator};
pub use node::{
    find_node, find_node_mut, insert_relative, remove_node, validate_unique_ids, InsertPosition,
    SchemaChild, SchemaError, SchemaNode,
};
pub use props::PropValue;
