//! Mutation scripts and the driver that applies them.

use trellis_protocol::{NodeId, Value};
use trellis_tree::StateTree;

/// One step of a mutation script.
///
/// Slots and seeds are resolved against the tree's current shape when the
/// step runs, so randomly generated scripts always name valid targets.
#[derive(Debug, Clone)]
pub enum ScriptOp {
    /// Create a node under an existing one.
    CreateChild {
        /// Picks the parent among attached nodes (modulo).
        parent_slot: usize,
        /// Picks the insertion index (modulo child count + 1).
        index_seed: usize,
    },
    /// Set a feature on an existing node.
    SetFeature {
        /// Picks the node among attached nodes (modulo).
        node_slot: usize,
        /// Feature key.
        key: String,
        /// Feature value.
        value: Value,
    },
    /// Remove a feature from an existing node.
    RemoveFeature {
        /// Picks the node among attached nodes (modulo).
        node_slot: usize,
        /// Feature key.
        key: String,
    },
    /// Remove a non-root node and its subtree.
    RemoveNode {
        /// Picks the node among attached non-root nodes (modulo).
        node_slot: usize,
    },
    /// Move a child within its parent's child list.
    ReorderChild {
        /// Picks the parent among attached nodes (modulo).
        parent_slot: usize,
        /// Picks the child among the parent's children (modulo).
        child_seed: usize,
        /// Picks the target index (modulo child count).
        index_seed: usize,
    },
}

/// Returns all attached node ids, root first, in depth-first order.
pub fn attached_ids(tree: &StateTree) -> Vec<NodeId> {
    let mut out = Vec::new();
    let mut stack = vec![tree.root_id()];
    while let Some(id) = stack.pop() {
        out.push(id);
        if let Ok(node) = tree.node(id) {
            for child in node.children().iter().rev() {
                stack.push(*child);
            }
        }
    }
    out
}

/// Applies a mutation script to a tree.
///
/// Steps whose target cannot be resolved (e.g. removing a node from a
/// tree that only has the root) are skipped.
pub fn apply_script(tree: &mut StateTree, ops: &[ScriptOp]) {
    for op in ops {
        let nodes = attached_ids(tree);
        match op {
            ScriptOp::CreateChild {
                parent_slot,
                index_seed,
            } => {
                let parent = nodes[parent_slot % nodes.len()];
                let slots = tree.node(parent).expect("attached").children().len() + 1;
                tree.create_node(parent, index_seed % slots).expect("create");
            }
            ScriptOp::SetFeature {
                node_slot,
                key,
                value,
            } => {
                let node = nodes[node_slot % nodes.len()];
                tree.set_feature(node, key.clone(), value.clone()).expect("set");
            }
            ScriptOp::RemoveFeature { node_slot, key } => {
                let node = nodes[node_slot % nodes.len()];
                tree.remove_feature(node, key).expect("remove feature");
            }
            ScriptOp::RemoveNode { node_slot } => {
                if nodes.len() > 1 {
                    let node = nodes[1 + node_slot % (nodes.len() - 1)];
                    tree.remove_node(node).expect("remove node");
                }
            }
            ScriptOp::ReorderChild {
                parent_slot,
                child_seed,
                index_seed,
            } => {
                let parent = nodes[parent_slot % nodes.len()];
                let children = tree.node(parent).expect("attached").children().to_vec();
                if !children.is_empty() {
                    let child = children[child_seed % children.len()];
                    tree.reorder_child(parent, child, index_seed % children.len())
                        .expect("reorder");
                }
            }
        }
    }
}
