use crate::style_editor::StyleEditError;
use lowpage_schema::SchemaError;
use thiserror::Error;

/// Errors from the document mutation path
#[derive(Debug, Error)]
pub enum DslError {
    #[error("node not found: {0}")]
    NodeNotFound(String),

    #[error("duplicate node id: {0}")]
    DuplicateId(String),

    #[error("reordered tree is not a permutation of the document")]
    NotAPermutation,

    #[error("unknown component: {0}")]
    UnknownComponent(String),

    #[error(transparent)]
    Schema(#[from] SchemaError),
}

/// Any error an editor surface can report to the host
#[derive(Debug, Error)]
pub enum EditorError {
    #[error(transparent)]
    Dsl(#[from] DslError),

    #[error(transparent)]
    Style(#[from] StyleEditError),
}
