//! State nodes.

use std::collections::BTreeMap;
use trellis_protocol::{NodeId, Value};

/// One node in the server-side state graph.
///
/// A node holds a sorted feature map and an ordered child list. It belongs
/// to exactly one parent (or none, for the root); children are owned
/// exclusively, so the graph is always a tree.
///
/// Nodes are only mutated through [`crate::StateTree`], which keeps the
/// change tracker in sync. The accessors here are the read-side API.
#[derive(Debug, Clone)]
pub struct StateNode {
    id: NodeId,
    parent: Option<NodeId>,
    features: BTreeMap<String, Value>,
    children: Vec<NodeId>,
    dirty: bool,
    detached: bool,
}

impl StateNode {
    pub(crate) fn new(id: NodeId, parent: Option<NodeId>) -> Self {
        Self {
            id,
            parent,
            features: BTreeMap::new(),
            children: Vec::new(),
            dirty: false,
            detached: false,
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

    /// Returns the value of a feature, if set.
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

    /// Returns true if the node has uncollected changes.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Returns true if the node has been removed from the tree and is
    /// awaiting purge at the next collect.
    pub fn is_detached(&self) -> bool {
        self.detached
    }

    pub(crate) fn set_feature(&mut self, key: String, value: Value) {
        self.features.insert(key, value);
    }

    pub(crate) fn remove_feature(&mut self, key: &str) -> Option<Value> {
        self.features.remove(key)
    }

    pub(crate) fn insert_child(&mut self, child: NodeId, index: usize) {
        self.children.insert(index, child);
    }

    pub(crate) fn remove_child(&mut self, child: NodeId) -> Option<usize> {
        let index = self.children.iter().position(|c| *c == child)?;
        self.children.remove(index);
        Some(index)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn clear_dirty(&mut self) {
        self.dirty = false;
    }

    pub(crate) fn mark_detached(&mut self) {
        self.detached = true;
    }
}
