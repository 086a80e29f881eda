//! Loopback harness: a server session wired to a client mirror.

use trellis_mirror::{ApplyOutcome, Mirror, MirrorConfig, MockDom};
use trellis_protocol::{ClientMessage, Envelope};
use trellis_session::{MessageOutcome, Session, SessionConfig};

/// A session and a mirror connected through encoded byte frames, with no
/// real transport in between.
///
/// Every exchange round-trips through the wire codecs, so harness tests
/// exercise the same path a networked deployment would.
pub struct Loopback {
    /// The server side.
    pub session: Session,
    /// The client side.
    pub mirror: Mirror<MockDom>,
}

impl Loopback {
    /// Creates a harness with default configurations.
    pub fn new() -> Self {
        Self::with_configs(SessionConfig::new(), MirrorConfig::new())
    }

    /// Creates a harness with explicit configurations.
    pub fn with_configs(session: SessionConfig, mirror: MirrorConfig) -> Self {
        Self {
            session: Session::new(session),
            mirror: Mirror::with_config(MockDom::new(), mirror),
        }
    }

    /// Flushes the session and delivers the envelope, if any.
    ///
    /// Returns true if an envelope was produced.
    pub fn flush_to_client(&mut self) -> bool {
        let envelope = {
            let mut guard = self.session.start_request().expect("session lock");
            guard.flush().expect("flush")
        };
        match envelope {
            Some(envelope) => {
                self.deliver(envelope);
                true
            }
            None => false,
        }
    }

    /// Delivers an envelope to the mirror through the wire codec.
    ///
    /// A reported sequence gap is handled the way a client would: by
    /// requesting a full resynchronization and applying it.
    pub fn deliver(&mut self, envelope: Envelope) {
        let bytes = envelope.encode().expect("encode envelope");
        let decoded = Envelope::decode(&bytes).expect("decode envelope");
        let outcome = self.mirror.apply(decoded).expect("apply envelope");
        if outcome == ApplyOutcome::ResyncRequired {
            let resync = {
                let mut guard = self.session.start_request().expect("session lock");
                guard.resynchronize().expect("resynchronize")
            };
            self.deliver(resync);
        }
    }

    /// Sends a client message to the session through the wire codec.
    ///
    /// A resynchronization triggered by a sequence gap is delivered back
    /// to the mirror before returning.
    pub fn send_to_server(&mut self, message: ClientMessage) -> MessageOutcome {
        let bytes = message.encode().expect("encode message");
        let decoded = ClientMessage::decode(&bytes).expect("decode message");
        let outcome = {
            let mut guard = self.session.start_request().expect("session lock");
            guard.apply_client_message(decoded).expect("apply message")
        };
        if let MessageOutcome::Resynchronized(envelope) = &outcome {
            self.deliver(envelope.clone());
        }
        outcome
    }
}

impl Default for Loopback {
    fn default() -> Self {
        Self::new()
    }
}
