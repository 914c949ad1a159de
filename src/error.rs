use thiserror::Error;

/// A violation of the binary search tree invariants, reported by
/// [`OrderedMap::check_structure`](crate::OrderedMap::check_structure)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StructureError {
    #[error("root node has a parent link")]
    RootHasParent,
    #[error("a node links to a child that is not allocated in the tree")]
    DanglingLink,
    #[error("a child node does not point back to its parent")]
    ParentMismatch,
    #[error("keys are not strictly increasing at in-order position {position}")]
    OutOfOrder { position: usize },
    #[error("tree has {reachable} reachable nodes but reports a length of {len}")]
    LenMismatch { reachable: usize, len: usize },
}
