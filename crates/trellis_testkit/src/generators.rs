//! Property-based test generators using proptest.

use crate::builders::ScriptOp;
use proptest::prelude::*;
use trellis_protocol::Value;

/// Strategy for feature keys.
///
/// Deliberately excludes `tag` so generated graphs stay unbound; binding
/// behavior has its own directed tests.
pub fn feature_key_strategy() -> impl Strategy<Value = String> {
    prop::sample::select(vec!["text", "class", "id", "hidden", "width"])
        .prop_map(|key| key.to_string())
}

/// Strategy for feature values.
pub fn value_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::Int),
        "[a-z]{0,8}".prop_map(Value::Text),
    ]
}

/// Strategy for a single mutation step.
pub fn script_op_strategy() -> impl Strategy<Value = ScriptOp> {
    prop_oneof![
        3 => (any::<usize>(), any::<usize>()).prop_map(|(parent_slot, index_seed)| {
            ScriptOp::CreateChild { parent_slot, index_seed }
        }),
        4 => (any::<usize>(), feature_key_strategy(), value_strategy()).prop_map(
            |(node_slot, key, value)| ScriptOp::SetFeature { node_slot, key, value }
        ),
        1 => (any::<usize>(), feature_key_strategy()).prop_map(|(node_slot, key)| {
            ScriptOp::RemoveFeature { node_slot, key }
        }),
        1 => any::<usize>().prop_map(|node_slot| ScriptOp::RemoveNode { node_slot }),
        1 => (any::<usize>(), any::<usize>(), any::<usize>()).prop_map(
            |(parent_slot, child_seed, index_seed)| ScriptOp::ReorderChild {
                parent_slot,
                child_seed,
                index_seed,
            }
        ),
    ]
}

/// Strategy for a mutation script of up to `max_len` steps.
pub fn script_strategy(max_len: usize) -> impl Strategy<Value = Vec<ScriptOp>> {
    prop::collection::vec(script_op_strategy(), 0..max_len)
}
