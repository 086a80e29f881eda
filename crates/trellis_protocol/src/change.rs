//! Change records describing tree mutations.

use crate::id::NodeId;
use crate::value::Value;
use serde::{Deserialize, Serialize};

/// Operation tags understood by this decoder, in wire form.
pub(crate) const KNOWN_OPS: &[&str] = &["put", "removeKey", "addChild", "removeChild", "reorder"];

/// One mutation applied to a state node.
///
/// Map operations (`Put`, `RemoveKey`) target a feature key; structural
/// operations (`AddChild`, `RemoveChild`, `Reorder`) target the node's
/// child list. The distinction matters for coalescing: map operations on
/// the same key collapse last-write-wins within one flush cycle, while
/// structural operations are always preserved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum ChangeOp {
    /// Set a feature to a new value.
    Put {
        /// Feature key.
        key: String,
        /// New value.
        value: Value,
    },
    /// Remove a feature.
    RemoveKey {
        /// Feature key.
        key: String,
    },
    /// Insert a child node at an index.
    #[serde(rename_all = "camelCase")]
    AddChild {
        /// The child node being attached.
        child_id: NodeId,
        /// Insertion index in the parent's child list.
        index: usize,
    },
    /// Remove a child node.
    #[serde(rename_all = "camelCase")]
    RemoveChild {
        /// The child node being detached.
        child_id: NodeId,
    },
    /// Move an existing child to a new index.
    #[serde(rename_all = "camelCase")]
    Reorder {
        /// The child node being moved.
        child_id: NodeId,
        /// Target index in the parent's child list.
        index: usize,
    },
}

impl ChangeOp {
    /// Returns true for child-list operations, which are never coalesced.
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            ChangeOp::AddChild { .. } | ChangeOp::RemoveChild { .. } | ChangeOp::Reorder { .. }
        )
    }

    /// Returns the feature key for map operations.
    pub fn key(&self) -> Option<&str> {
        match self {
            ChangeOp::Put { key, .. } | ChangeOp::RemoveKey { key } => Some(key),
            _ => None,
        }
    }
}

/// An immutable record of one mutation: the target node and the operation.
///
/// Records are ordered within a flush cycle; the order within one node is
/// preserved through encoding and replay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeRecord {
    /// The node this change applies to.
    pub node_id: NodeId,
    /// The operation.
    #[serde(flatten)]
    pub op: ChangeOp,
}

impl ChangeRecord {
    /// Creates a feature put record.
    pub fn put(node_id: NodeId, key: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            node_id,
            op: ChangeOp::Put {
                key: key.into(),
                value: value.into(),
            },
        }
    }

    /// Creates a feature removal record.
    pub fn remove_key(node_id: NodeId, key: impl Into<String>) -> Self {
        Self {
            node_id,
            op: ChangeOp::RemoveKey { key: key.into() },
        }
    }

    /// Creates a child attach record.
    pub fn add_child(node_id: NodeId, child_id: NodeId, index: usize) -> Self {
        Self {
            node_id,
            op: ChangeOp::AddChild { child_id, index },
        }
    }

    /// Creates a child detach record.
    pub fn remove_child(node_id: NodeId, child_id: NodeId) -> Self {
        Self {
            node_id,
            op: ChangeOp::RemoveChild { child_id },
        }
    }

    /// Creates a child reorder record.
    pub fn reorder(node_id: NodeId, child_id: NodeId, index: usize) -> Self {
        Self {
            node_id,
            op: ChangeOp::Reorder { child_id, index },
        }
    }

    /// Returns true for child-list records.
    pub fn is_structural(&self) -> bool {
        self.op.is_structural()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn structural_classification() {
        assert!(!ChangeRecord::put(NodeId::new(1), "tag", "div").is_structural());
        assert!(!ChangeRecord::remove_key(NodeId::new(1), "tag").is_structural());
        assert!(ChangeRecord::add_child(NodeId::new(1), NodeId::new(2), 0).is_structural());
        assert!(ChangeRecord::remove_child(NodeId::new(1), NodeId::new(2)).is_structural());
        assert!(ChangeRecord::reorder(NodeId::new(1), NodeId::new(2), 1).is_structural());
    }

    #[test]
    fn op_key() {
        let put = ChangeRecord::put(NodeId::new(1), "id", "foo");
        assert_eq!(put.op.key(), Some("id"));

        let add = ChangeRecord::add_child(NodeId::new(1), NodeId::new(2), 0);
        assert_eq!(add.op.key(), None);
    }

    #[test]
    fn wire_form_is_flat() {
        let record = ChangeRecord::put(NodeId::new(3), "tag", "div");
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["nodeId"], 3);
        assert_eq!(json["op"], "put");
        assert_eq!(json["key"], "tag");

        let record = ChangeRecord::add_child(NodeId::new(0), NodeId::new(1), 2);
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["op"], "addChild");
        assert_eq!(json["childId"], 1);
        assert_eq!(json["index"], 2);
    }

    #[test]
    fn record_roundtrip() {
        let records = vec![
            ChangeRecord::put(NodeId::new(1), "text", "hello"),
            ChangeRecord::remove_key(NodeId::new(1), "text"),
            ChangeRecord::add_child(NodeId::ROOT, NodeId::new(1), 0),
            ChangeRecord::remove_child(NodeId::ROOT, NodeId::new(1)),
            ChangeRecord::reorder(NodeId::ROOT, NodeId::new(1), 3),
        ];
        for record in records {
            let bytes = serde_json::to_vec(&record).unwrap();
            let decoded: ChangeRecord = serde_json::from_slice(&bytes).unwrap();
            assert_eq!(decoded, record);
        }
    }

    #[test]
    fn known_ops_cover_all_variants() {
        for record in [
            ChangeRecord::put(NodeId::new(1), "k", Value::Null),
            ChangeRecord::remove_key(NodeId::new(1), "k"),
            ChangeRecord::add_child(NodeId::new(1), NodeId::new(2), 0),
            ChangeRecord::remove_child(NodeId::new(1), NodeId::new(2)),
            ChangeRecord::reorder(NodeId::new(1), NodeId::new(2), 0),
        ] {
            let json = serde_json::to_value(&record).unwrap();
            let op = json["op"].as_str().unwrap();
            assert!(KNOWN_OPS.contains(&op), "missing wire tag {op}");
        }
    }
}
