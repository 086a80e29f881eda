//! Error types for tree operations.

use thiserror::Error;
use trellis_protocol::NodeId;

/// Result type for tree operations.
pub type TreeResult<T> = Result<T, TreeError>;

/// Errors that can occur while mutating the state-node graph.
#[derive(Debug, Error)]
pub enum TreeError {
    /// The referenced node id is not in the tree.
    #[error("node not found: {node}")]
    NodeNotFound {
        /// The id that was looked up.
        node: NodeId,
    },

    /// The node exists but is no longer reachable from the root.
    ///
    /// Mutations on detached subtrees are rejected; callers that race a
    /// removal recover by dropping the single operation.
    #[error("node {node} is detached from the tree")]
    DetachedTree {
        /// The detached node.
        node: NodeId,
    },

    /// A child index was out of bounds for the target child list.
    #[error("index {index} out of bounds for child list of length {len}")]
    IndexOutOfBounds {
        /// The requested index.
        index: usize,
        /// The child list length.
        len: usize,
    },

    /// The root node cannot be removed.
    #[error("the root node cannot be removed")]
    CannotRemoveRoot,

    /// The given node is not a child of the given parent.
    #[error("node {child} is not a child of {parent}")]
    NotAChild {
        /// The assumed parent.
        parent: NodeId,
        /// The node that was not found in the parent's child list.
        child: NodeId,
    },
}
