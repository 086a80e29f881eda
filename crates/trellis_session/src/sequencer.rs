//! In-order admission of client messages.

use std::collections::BTreeMap;
use tracing::debug;
use trellis_protocol::ClientMessage;

/// What happened to an offered client message.
#[derive(Debug)]
pub enum Admission {
    /// The message (and any buffered successors it released) is ready to
    /// apply, in sequence order.
    Ready(Vec<ClientMessage>),
    /// The message arrived early and was buffered.
    Buffered,
    /// The message's sequence id was already applied; dropped.
    Duplicate,
    /// The message is beyond the resend window. The messages in between
    /// are considered lost; the caller must resynchronize.
    Gap {
        /// The sequence id the sequencer expected next.
        expected: u64,
        /// The offered message, returned so the caller can admit it after
        /// skipping past the gap.
        message: ClientMessage,
    },
}

/// Orders client-to-server messages by their sequence id.
///
/// The transport may duplicate or reorder messages; the sequencer admits
/// them strictly in order. Stale ids are dropped, early arrivals within
/// the resend window are buffered until the expected id arrives, and a
/// larger gap is surfaced for resynchronization.
#[derive(Debug)]
pub struct ClientSequencer {
    expected: u64,
    window: u64,
    buffered: BTreeMap<u64, ClientMessage>,
}

impl ClientSequencer {
    /// Creates a sequencer expecting sequence id 0 first.
    pub fn new(window: u64) -> Self {
        Self {
            expected: 0,
            window,
            buffered: BTreeMap::new(),
        }
    }

    /// Offers a message for admission.
    pub fn offer(&mut self, message: ClientMessage) -> Admission {
        let seq = message.client_seq;

        if seq < self.expected {
            debug!(seq, expected = self.expected, "dropping duplicate client message");
            return Admission::Duplicate;
        }

        if seq > self.expected {
            if seq - self.expected > self.window {
                return Admission::Gap {
                    expected: self.expected,
                    message,
                };
            }
            debug!(seq, expected = self.expected, "buffering early client message");
            self.buffered.insert(seq, message);
            return Admission::Buffered;
        }

        let mut ready = vec![message];
        self.expected += 1;
        while let Some(next) = self.buffered.remove(&self.expected) {
            ready.push(next);
            self.expected += 1;
        }
        Admission::Ready(ready)
    }

    /// Returns the next sequence id the sequencer will admit.
    pub fn expected(&self) -> u64 {
        self.expected
    }

    /// Returns the number of buffered early messages.
    pub fn buffered_count(&self) -> usize {
        self.buffered.len()
    }

    /// Abandons lost messages and continues from `seq`.
    ///
    /// Used after a gap: everything below `seq` is considered lost.
    /// Returns buffered messages that become admissible at the new
    /// position, in sequence order.
    pub fn skip_to(&mut self, seq: u64) -> Vec<ClientMessage> {
        self.expected = self.expected.max(seq);
        self.buffered.retain(|s, _| *s >= self.expected);

        let mut released = Vec::new();
        while let Some(next) = self.buffered.remove(&self.expected) {
            released.push(next);
            self.expected += 1;
        }
        released
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trellis_protocol::NodeId;

    fn msg(seq: u64) -> ClientMessage {
        ClientMessage::event(seq, NodeId::new(1), "click", vec![])
    }

    #[test]
    fn in_order_messages_are_ready_immediately() {
        let mut sequencer = ClientSequencer::new(8);
        assert!(matches!(sequencer.offer(msg(0)), Admission::Ready(v) if v.len() == 1));
        assert!(matches!(sequencer.offer(msg(1)), Admission::Ready(v) if v.len() == 1));
        assert_eq!(sequencer.expected(), 2);
    }

    #[test]
    fn early_message_buffers_until_gap_closes() {
        // Expecting 4, receiving 5: buffered, not applied.
        let mut sequencer = ClientSequencer::new(8);
        for i in 0..4 {
            sequencer.offer(msg(i));
        }
        assert_eq!(sequencer.expected(), 4);
        assert!(matches!(sequencer.offer(msg(5)), Admission::Buffered));
        assert_eq!(sequencer.buffered_count(), 1);

        // 4 arrives: both 4 and 5 are released in order
        match sequencer.offer(msg(4)) {
            Admission::Ready(ready) => {
                let seqs: Vec<u64> = ready.iter().map(|m| m.client_seq).collect();
                assert_eq!(seqs, vec![4, 5]);
            }
            other => panic!("expected Ready, got {other:?}"),
        }
        assert_eq!(sequencer.buffered_count(), 0);
        assert_eq!(sequencer.expected(), 6);
    }

    #[test]
    fn duplicates_are_dropped() {
        let mut sequencer = ClientSequencer::new(8);
        sequencer.offer(msg(0));
        assert!(matches!(sequencer.offer(msg(0)), Admission::Duplicate));
    }

    #[test]
    fn gap_beyond_window_is_reported() {
        let mut sequencer = ClientSequencer::new(4);
        match sequencer.offer(msg(5)) {
            Admission::Gap { expected, message } => {
                assert_eq!(expected, 0);
                assert_eq!(message.client_seq, 5);
            }
            other => panic!("expected Gap, got {other:?}"),
        }
    }

    #[test]
    fn skip_to_abandons_lost_messages() {
        let mut sequencer = ClientSequencer::new(4);
        sequencer.offer(msg(2));
        sequencer.offer(msg(3));
        assert_eq!(sequencer.buffered_count(), 2);

        // Messages 0 and 1 are lost; buffered 2 and 3 are released.
        let released = sequencer.skip_to(2);
        let seqs: Vec<u64> = released.iter().map(|m| m.client_seq).collect();
        assert_eq!(seqs, vec![2, 3]);
        assert_eq!(sequencer.expected(), 4);
        assert_eq!(sequencer.buffered_count(), 0);
    }
}
