//! Client-to-server messages.

use crate::error::{CodecError, CodecResult};
use crate::id::NodeId;
use crate::value::Value;
use serde::{Deserialize, Serialize};

/// The payload of a client-to-server message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ClientMessageBody {
    /// A DOM event or RPC invocation raised on a bound element.
    #[serde(rename_all = "camelCase")]
    Event {
        /// The node the event was raised on.
        node_id: NodeId,
        /// Event or method name.
        name: String,
        /// JSON-encodable parameter list.
        payload: Vec<Value>,
    },
    /// A client-initiated model change (e.g. an input's value).
    #[serde(rename_all = "camelCase")]
    Put {
        /// The node whose feature changed.
        node_id: NodeId,
        /// Feature key.
        key: String,
        /// New value.
        value: Value,
    },
}

impl ClientMessageBody {
    /// Returns the node this message targets.
    pub fn node_id(&self) -> NodeId {
        match self {
            ClientMessageBody::Event { node_id, .. } | ClientMessageBody::Put { node_id, .. } => {
                *node_id
            }
        }
    }
}

/// A client-to-server message with a strictly increasing sequence id.
///
/// The first message a client sends carries `client_seq` 0. The server
/// applies messages in `client_seq` order, buffering early arrivals and
/// dropping duplicates, so the transport may retry without reordering the
/// observable effects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientMessage {
    /// Client-assigned sequence id.
    pub client_seq: u64,
    /// The message payload.
    #[serde(flatten)]
    pub body: ClientMessageBody,
}

impl ClientMessage {
    /// Creates an event message.
    pub fn event(
        client_seq: u64,
        node_id: NodeId,
        name: impl Into<String>,
        payload: Vec<Value>,
    ) -> Self {
        Self {
            client_seq,
            body: ClientMessageBody::Event {
                node_id,
                name: name.into(),
                payload,
            },
        }
    }

    /// Creates a model change message.
    pub fn put(
        client_seq: u64,
        node_id: NodeId,
        key: impl Into<String>,
        value: impl Into<Value>,
    ) -> Self {
        Self {
            client_seq,
            body: ClientMessageBody::Put {
                node_id,
                key: key.into(),
                value: value.into(),
            },
        }
    }

    /// Encodes the message to JSON bytes.
    pub fn encode(&self) -> CodecResult<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }

    /// Decodes a message from JSON bytes.
    pub fn decode(bytes: &[u8]) -> CodecResult<Self> {
        serde_json::from_slice(bytes).map_err(|e| CodecError::invalid_frame(e.to_string()))
    }
}
