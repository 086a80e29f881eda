//! Outgoing client message sequencing.

use std::collections::VecDeque;
use trellis_protocol::{ClientMessage, NodeId, Value};

/// Assigns client sequence ids and keeps unacknowledged messages.
///
/// The first message carries `client_seq` 0. Messages stay pending until
/// acknowledged so a transport that lost a response can resend them; the
/// server drops duplicates by sequence id.
#[derive(Debug, Default)]
pub struct EventOutbox {
    next_seq: u64,
    pending: VecDeque<ClientMessage>,
}

impl EventOutbox {
    /// Creates an empty outbox.
    pub fn new() -> Self {
        Self {
            next_seq: 0,
            pending: VecDeque::new(),
        }
    }

    /// Builds an event message with the next client sequence id.
    pub fn event(&mut self, node: NodeId, name: impl Into<String>, payload: Vec<Value>) -> ClientMessage {
        let message = ClientMessage::event(self.next_seq, node, name, payload);
        self.push(message.clone());
        message
    }

    /// Builds a model change message with the next client sequence id.
    pub fn put(&mut self, node: NodeId, key: impl Into<String>, value: impl Into<Value>) -> ClientMessage {
        let message = ClientMessage::put(self.next_seq, node, key, value);
        self.push(message.clone());
        message
    }

    fn push(&mut self, message: ClientMessage) {
        self.next_seq += 1;
        self.pending.push_back(message);
    }

    /// Returns the sequence id the next message will carry.
    pub fn next_seq(&self) -> u64 {
        self.next_seq
    }

    /// Iterates pending (unacknowledged) messages in send order.
    pub fn pending(&self) -> impl Iterator<Item = &ClientMessage> {
        self.pending.iter()
    }

    /// Returns the number of pending messages.
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Drops pending messages with `client_seq` up to and including `seq`.
    pub fn acknowledge_up_to(&mut self, seq: u64) {
        while let Some(front) = self.pending.front() {
            if front.client_seq <= seq {
                self.pending.pop_front();
            } else {
                break;
            }
        }
    }

    /// Discards all pending messages, e.g. on resynchronization.
    pub fn clear(&mut self) {
        self.pending.clear();
    }
}
