use thiserror::Error;

/// Contract violations reported by tree and traversal operations.
///
/// None of these are transient: the call was rejected before anything was
/// mutated and retrying it unchanged will fail the same way.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TreeError {
    #[error("node reference is absent or has been freed")]
    NullArgument,

    #[error("node belongs to a different tree")]
    ForeignNode,

    #[error("cursor is not positioned on a sequence entry")]
    InvalidCursor,

    #[error("attaching the node would make it an ancestor of itself")]
    WouldCycle,

    #[error("position {pos} is out of range for {len} children")]
    PositionOutOfRange { pos: usize, len: usize },
}

pub type TreeResult<T> = Result<T, TreeError>;
