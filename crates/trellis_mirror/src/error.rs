//! Error types for the mirror.

use thiserror::Error;
use trellis_protocol::NodeId;

/// Result type for mirror operations.
pub type MirrorResult<T> = Result<T, MirrorError>;

/// Errors that can occur while applying changes to the mirror graph.
#[derive(Debug, Error)]
pub enum MirrorError {
    /// The referenced node does not exist in the mirror.
    ///
    /// During envelope application this is recovered per record (the
    /// record is skipped with a warning); it surfaces only from direct
    /// calls such as event emission.
    #[error("mirror node not found: {node}")]
    NodeNotFound {
        /// The id that was looked up.
        node: NodeId,
    },

    /// The node has already reached the terminal detached state.
    #[error("mirror node {node} is already detached")]
    AlreadyDetached {
        /// The detached node.
        node: NodeId,
    },

    /// The DOM binding layer failed to create or update an element.
    #[error("binding failed for {node}: {message}")]
    BindingFailed {
        /// The node being bound.
        node: NodeId,
        /// Error reported by the binding layer.
        message: String,
    },
}

impl MirrorError {
    /// Creates a binding failure error.
    pub fn binding_failed(node: NodeId, message: impl Into<String>) -> Self {
        Self::BindingFailed {
            node,
            message: message.into(),
        }
    }
}
