//! Mirror nodes and the binding lifecycle.

use crate::dom::DomHandle;
use std::collections::BTreeMap;
use trellis_protocol::{NodeId, Value};

/// The binding lifecycle of a mirror node.
///
/// `Unbound → Bound → Detached`, with `Detached` terminal. A node binds
/// when the binder decides it should render (it has a `tag` feature) and
/// detaches when a remove record is applied to it or an ancestor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingState {
    /// The node exists in the mirror graph but has no DOM counterpart.
    Unbound,
    /// The node is bound to a live rendered element.
    Bound(DomHandle),
    /// The node has been removed; terminal.
    Detached,
}

impl BindingState {
    /// Returns true if the node is bound to an element.
    pub fn is_bound(&self) -> bool {
        matches!(self, BindingState::Bound(_))
    }

    /// Returns true if the node has reached the terminal state.
    pub fn is_detached(&self) -> bool {
        matches!(self, BindingState::Detached)
    }

    /// Returns the bound element handle, if any.
    pub fn handle(&self) -> Option<DomHandle> {
        match self {
            BindingState::Bound(handle) => Some(*handle),
            _ => None,
        }
    }
}

/// Client-side counterpart of a server state node.
///
/// Holds the replicated features and child list plus the binding state.
/// The DOM element itself is owned by the rendering layer; the node keeps
/// only the opaque handle relation.
#[derive(Debug, Clone)]
pub struct MirrorNode {
    id: NodeId,
    parent: Option<NodeId>,
    pub(crate) features: BTreeMap<String, Value>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) state: BindingState,
}

impl MirrorNode {
    pub(crate) fn new(id: NodeId, parent: Option<NodeId>) -> Self {
        Self {
            id,
            parent,
            features: BTreeMap::new(),
            children: Vec::new(),
            state: BindingState::Unbound,
        }
    }

    /// Returns this node's id.
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Returns the parent id, or `None` for the root.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Returns the value of a replicated feature, if set.
    pub fn feature(&self, key: &str) -> Option<&Value> {
        self.features.get(key)
    }

    /// Iterates features in key order.
    pub fn features(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.features.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Returns the ordered child list.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Returns the binding state.
    pub fn state(&self) -> BindingState {
        self.state
    }
}
