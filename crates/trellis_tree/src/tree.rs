//! The session-scoped state-node graph.

use crate::error::{TreeError, TreeResult};
use crate::node::StateNode;
use crate::tracker::ChangeTracker;
use std::collections::HashMap;
use tracing::debug;
use trellis_protocol::{ChangeRecord, NodeId, Value};

/// The server-side node graph for one UI session.
///
/// The tree owns the root node (id 0), the id allocator, and an id-to-node
/// map for O(1) lookup. Every node reachable from the root is in the map;
/// detached nodes stay as tombstones until the next
/// [`collect_and_clear`](StateTree::collect_and_clear) purges them.
///
/// All mutations go through this type so the embedded [`ChangeTracker`]
/// observes each change exactly once. Ids are monotonically increasing and
/// never reused while the session is alive.
#[derive(Debug)]
pub struct StateTree {
    nodes: HashMap<NodeId, StateNode>,
    next_id: u64,
    tracker: ChangeTracker,
}

impl StateTree {
    /// Creates a tree containing only the root node.
    ///
    /// The root exists implicitly on both sides of the wire, so its
    /// creation produces no change record.
    pub fn new() -> Self {
        let mut nodes = HashMap::new();
        nodes.insert(NodeId::ROOT, StateNode::new(NodeId::ROOT, None));
        Self {
            nodes,
            next_id: 1,
            tracker: ChangeTracker::new(),
        }
    }

    /// Returns the root node id.
    pub fn root_id(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Creates a new node under `parent` at `index` in its child list.
    ///
    /// Records an `AddChild` change and marks the parent branch dirty.
    pub fn create_node(&mut self, parent: NodeId, index: usize) -> TreeResult<NodeId> {
        let len = self.attached_node(parent)?.children().len();
        if index > len {
            return Err(TreeError::IndexOutOfBounds { index, len });
        }

        let id = NodeId::new(self.next_id);
        self.next_id += 1;

        let mut node = StateNode::new(id, Some(parent));
        node.mark_dirty();
        self.nodes.insert(id, node);
        self.attached_node_mut(parent)?.insert_child(id, index);

        self.tracker.record(ChangeRecord::add_child(parent, id, index));
        self.mark_branch_dirty(parent);
        Ok(id)
    }

    /// Sets a feature on a node, recording a `Put` change.
    pub fn set_feature(
        &mut self,
        node: NodeId,
        key: impl Into<String>,
        value: impl Into<Value>,
    ) -> TreeResult<()> {
        let key = key.into();
        let value = value.into();

        let state = self.attached_node_mut(node)?;
        state.set_feature(key.clone(), value.clone());
        state.mark_dirty();
        self.tracker.record(ChangeRecord::put(node, key, value));
        Ok(())
    }

    /// Removes a feature from a node, recording a `RemoveKey` change.
    ///
    /// Removing a feature that is not set is a no-op and records nothing.
    pub fn remove_feature(&mut self, node: NodeId, key: &str) -> TreeResult<()> {
        let state = self.attached_node_mut(node)?;
        if state.remove_feature(key).is_some() {
            state.mark_dirty();
            self.tracker.record(ChangeRecord::remove_key(node, key));
        }
        Ok(())
    }

    /// Returns the value of a feature, if set.
    ///
    /// Reads are allowed on detached tombstones; only mutations require
    /// the node to be attached.
    pub fn get_feature(&self, node: NodeId, key: &str) -> TreeResult<Option<&Value>> {
        Ok(self.node(node)?.feature(key))
    }

    /// Removes a node and its whole subtree from the tree.
    ///
    /// A single `RemoveChild` tombstone is recorded for the subtree root;
    /// the client cascades the detach to descendants. The removed nodes
    /// stay in the map as detached tombstones until the next collect.
    pub fn remove_node(&mut self, node: NodeId) -> TreeResult<()> {
        if node.is_root() {
            return Err(TreeError::CannotRemoveRoot);
        }
        let parent = self
            .attached_node(node)?
            .parent()
            .ok_or(TreeError::CannotRemoveRoot)?;

        self.attached_node_mut(parent)?.remove_child(node);
        self.tracker.record(ChangeRecord::remove_child(parent, node));
        self.mark_branch_dirty(parent);

        let detached = self.detach_subtree(node);
        debug!(%node, count = detached, "detached subtree");
        Ok(())
    }

    /// Moves an existing child of `parent` to a new index.
    pub fn reorder_child(
        &mut self,
        parent: NodeId,
        child: NodeId,
        index: usize,
    ) -> TreeResult<()> {
        let parent_node = self.attached_node(parent)?;
        let len = parent_node.children().len();
        if !parent_node.children().contains(&child) {
            return Err(TreeError::NotAChild { parent, child });
        }
        if index >= len {
            return Err(TreeError::IndexOutOfBounds { index, len });
        }

        let parent_node = self.attached_node_mut(parent)?;
        parent_node.remove_child(child);
        parent_node.insert_child(child, index);

        self.tracker.record(ChangeRecord::reorder(parent, child, index));
        self.mark_branch_dirty(parent);
        Ok(())
    }

    /// Marks a node dirty without recording a change.
    ///
    /// Collaborators use this to flag nodes whose repaint is driven by
    /// out-of-band state; the flag is cleared at the next collect.
    pub fn mark_dirty(&mut self, node: NodeId) -> TreeResult<()> {
        self.attached_node_mut(node)?.mark_dirty();
        Ok(())
    }

    /// Looks up a node by id.
    pub fn node(&self, id: NodeId) -> TreeResult<&StateNode> {
        self.nodes
            .get(&id)
            .ok_or(TreeError::NodeNotFound { node: id })
    }

    /// Returns true if the id is in the tree (attached or tombstoned).
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Returns true if the node exists and is reachable from the root.
    pub fn is_attached(&self, id: NodeId) -> bool {
        self.nodes.get(&id).is_some_and(|n| !n.is_detached())
    }

    /// Returns the number of nodes in the map, tombstones included.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if there are uncollected changes.
    pub fn has_pending_changes(&self) -> bool {
        !self.tracker.is_empty()
    }

    /// Returns the number of uncollected change records.
    pub fn pending_change_count(&self) -> usize {
        self.tracker.len()
    }

    /// Takes all pending change records and resets the dirty state.
    ///
    /// After this call the tracker is empty, every node's dirty flag is
    /// cleared, and detached tombstones are purged from the map. The
    /// graph is clean until the next mutation.
    pub fn collect_and_clear(&mut self) -> Vec<ChangeRecord> {
        let records = self.tracker.collect_and_clear();

        let before = self.nodes.len();
        self.nodes.retain(|_, node| !node.is_detached());
        let purged = before - self.nodes.len();
        if purged > 0 {
            debug!(purged, "purged detached tombstones");
        }

        for node in self.nodes.values_mut() {
            node.clear_dirty();
        }
        records
    }

    /// Emits the records that rebuild the current graph from scratch.
    ///
    /// Used for full resynchronization. Records are ordered so a child's
    /// `AddChild` precedes all of that child's own records, matching the
    /// ordering guarantee of incremental flushes.
    pub fn snapshot_records(&self) -> Vec<ChangeRecord> {
        let mut records = Vec::new();
        self.snapshot_node(NodeId::ROOT, &mut records);
        records
    }

    fn snapshot_node(&self, id: NodeId, out: &mut Vec<ChangeRecord>) {
        let node = match self.nodes.get(&id) {
            Some(node) => node,
            None => return,
        };
        for (key, value) in node.features() {
            out.push(ChangeRecord::put(id, key, value.clone()));
        }
        for (index, child) in node.children().iter().enumerate() {
            out.push(ChangeRecord::add_child(id, *child, index));
            self.snapshot_node(*child, out);
        }
    }

    fn attached_node(&self, id: NodeId) -> TreeResult<&StateNode> {
        let node = self.node(id)?;
        if node.is_detached() {
            return Err(TreeError::DetachedTree { node: id });
        }
        Ok(node)
    }

    fn attached_node_mut(&mut self, id: NodeId) -> TreeResult<&mut StateNode> {
        let node = self
            .nodes
            .get_mut(&id)
            .ok_or(TreeError::NodeNotFound { node: id })?;
        if node.is_detached() {
            return Err(TreeError::DetachedTree { node: id });
        }
        Ok(node)
    }

    /// Marks `from` and all its ancestors dirty.
    fn mark_branch_dirty(&mut self, from: NodeId) {
        let mut current = Some(from);
        while let Some(id) = current {
            match self.nodes.get_mut(&id) {
                Some(node) => {
                    node.mark_dirty();
                    current = node.parent();
                }
                None => break,
            }
        }
    }

    /// Marks `root` and all descendants detached; returns the count.
    fn detach_subtree(&mut self, root: NodeId) -> usize {
        let mut stack = vec![root];
        let mut count = 0;
        while let Some(id) = stack.pop() {
            if let Some(node) = self.nodes.get_mut(&id) {
                node.mark_detached();
                count += 1;
                stack.extend_from_slice(node.children());
            }
        }
        count
    }
}

impl Default for StateTree {
    fn default() -> Self {
        Self::new()
    }
}
