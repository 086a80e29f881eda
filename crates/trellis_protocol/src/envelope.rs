//! Server-to-client envelopes and sequence assignment.

use crate::change::{ChangeRecord, KNOWN_OPS};
use crate::error::{CodecError, CodecResult};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// A batch of change records with a server sequence number.
///
/// Sequence numbers start at 0 and increase by 1 per flush; they are never
/// reused. The client uses them to apply envelopes in order and to drop
/// duplicates (idempotent replay).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    /// Server sequence number.
    pub seq: u64,
    /// When true, the client discards its mirror and treats `changes` as a
    /// complete description of the current graph.
    #[serde(default)]
    pub resync: bool,
    /// The changes, in the order they were recorded server-side.
    pub changes: Vec<ChangeRecord>,
}

impl Envelope {
    /// Encodes the envelope to JSON bytes.
    pub fn encode(&self) -> CodecResult<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }

    /// Decodes an envelope from JSON bytes.
    ///
    /// Records with an operation kind this decoder does not understand are
    /// skipped with a warning instead of failing the envelope, so that an
    /// older client can still apply the parts of a newer server's message
    /// it knows about. A record with a known operation that fails to parse
    /// is a hard error.
    pub fn decode(bytes: &[u8]) -> CodecResult<Self> {
        #[derive(Deserialize)]
        struct RawEnvelope {
            seq: u64,
            #[serde(default)]
            resync: bool,
            changes: Vec<serde_json::Value>,
        }

        let raw: RawEnvelope = serde_json::from_slice(bytes)
            .map_err(|e| CodecError::invalid_frame(e.to_string()))?;

        let mut changes = Vec::with_capacity(raw.changes.len());
        for record in raw.changes {
            let op = record
                .get("op")
                .and_then(|v| v.as_str())
                .ok_or_else(|| CodecError::missing_field("op"))?
                .to_string();

            if !KNOWN_OPS.contains(&op.as_str()) {
                warn!(op = %op, seq = raw.seq, "skipping record with unknown operation");
                continue;
            }

            let decoded: ChangeRecord = serde_json::from_value(record)
                .map_err(|e| CodecError::invalid_frame(format!("record with op {op}: {e}")))?;
            changes.push(decoded);
        }

        Ok(Self {
            seq: raw.seq,
            resync: raw.resync,
            changes,
        })
    }

    /// Returns true if the envelope carries no changes.
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }
}

/// Assigns sequence numbers to outgoing envelopes.
///
/// One writer exists per session, owned by the flush path, so sequence
/// assignment happens under the session lock.
#[derive(Debug)]
pub struct EnvelopeWriter {
    next_seq: u64,
}

impl EnvelopeWriter {
    /// Creates a writer whose first envelope will carry sequence 0.
    pub fn new() -> Self {
        Self { next_seq: 0 }
    }

    /// Creates a writer from persisted state.
    pub fn from_state(next_seq: u64) -> Self {
        Self { next_seq }
    }

    /// Wraps the given records in an envelope with the next sequence number.
    pub fn encode(&mut self, changes: Vec<ChangeRecord>) -> Envelope {
        let seq = self.next_seq;
        self.next_seq += 1;
        Envelope {
            seq,
            resync: false,
            changes,
        }
    }

    /// Wraps a full-graph snapshot in a resynchronization envelope.
    ///
    /// Sequence numbering continues across a resync; the flag alone tells
    /// the client to rebuild its mirror.
    pub fn encode_resync(&mut self, changes: Vec<ChangeRecord>) -> Envelope {
        let mut envelope = self.encode(changes);
        envelope.resync = true;
        envelope
    }

    /// Returns the sequence number the next envelope will carry.
    pub fn next_seq(&self) -> u64 {
        self.next_seq
    }
}

impl Default for EnvelopeWriter {
    fn default() -> Self {
        Self::new()
    }
}
