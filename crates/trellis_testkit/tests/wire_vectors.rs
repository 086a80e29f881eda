//! Golden vectors for the wire format.
//!
//! These pin the JSON frames so client implementations in other
//! languages can be validated against the same shapes.

use trellis_protocol::{ChangeRecord, ClientMessage, Envelope, EnvelopeWriter, NodeId, Value};

#[test]
fn envelope_frame_shape() {
    let mut writer = EnvelopeWriter::new();
    let envelope = writer.encode(vec![
        ChangeRecord::add_child(NodeId::ROOT, NodeId::new(1), 0),
        ChangeRecord::put(NodeId::new(1), "tag", "div"),
        ChangeRecord::remove_key(NodeId::new(1), "hidden"),
        ChangeRecord::reorder(NodeId::ROOT, NodeId::new(1), 0),
        ChangeRecord::remove_child(NodeId::ROOT, NodeId::new(1)),
    ]);

    let frame: serde_json::Value = serde_json::from_slice(&envelope.encode().unwrap()).unwrap();
    assert_eq!(
        frame,
        serde_json::json!({
            "seq": 0,
            "resync": false,
            "changes": [
                {"nodeId": 0, "op": "addChild", "childId": 1, "index": 0},
                {"nodeId": 1, "op": "put", "key": "tag", "value": {"type": "text", "value": "div"}},
                {"nodeId": 1, "op": "removeKey", "key": "hidden"},
                {"nodeId": 0, "op": "reorder", "childId": 1, "index": 0},
                {"nodeId": 0, "op": "removeChild", "childId": 1},
            ]
        })
    );
}

#[test]
fn value_frame_shapes() {
    let cases = vec![
        (Value::Null, serde_json::json!({"type": "null"})),
        (Value::Bool(true), serde_json::json!({"type": "bool", "value": true})),
        (Value::Int(-3), serde_json::json!({"type": "int", "value": -3})),
        (Value::Double(1.5), serde_json::json!({"type": "double", "value": 1.5})),
        (
            Value::Text("x".into()),
            serde_json::json!({"type": "text", "value": "x"}),
        ),
        (
            Value::Node(NodeId::new(7)),
            serde_json::json!({"type": "node", "value": 7}),
        ),
        (
            Value::List(vec![Value::Int(1)]),
            serde_json::json!({"type": "list", "value": [{"type": "int", "value": 1}]}),
        ),
    ];
    for (value, expected) in cases {
        assert_eq!(serde_json::to_value(&value).unwrap(), expected);
    }
}

#[test]
fn client_message_frame_shapes() {
    let event = ClientMessage::event(4, NodeId::new(2), "click", vec![Value::Int(10)]);
    let frame: serde_json::Value = serde_json::from_slice(&event.encode().unwrap()).unwrap();
    assert_eq!(
        frame,
        serde_json::json!({
            "clientSeq": 4,
            "type": "event",
            "nodeId": 2,
            "name": "click",
            "payload": [{"type": "int", "value": 10}]
        })
    );

    let put = ClientMessage::put(5, NodeId::new(2), "value", "typed");
    let frame: serde_json::Value = serde_json::from_slice(&put.encode().unwrap()).unwrap();
    assert_eq!(
        frame,
        serde_json::json!({
            "clientSeq": 5,
            "type": "put",
            "nodeId": 2,
            "key": "value",
            "value": {"type": "text", "value": "typed"}
        })
    );
}

#[test]
fn frames_decode_back() {
    let mut writer = EnvelopeWriter::new();
    let envelope = writer.encode(vec![ChangeRecord::put(NodeId::new(1), "a", Value::Int(1))]);
    let decoded = Envelope::decode(&envelope.encode().unwrap()).unwrap();
    assert_eq!(decoded, envelope);
}
