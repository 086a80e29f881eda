//! The per-session server engine.

use crate::config::SessionConfig;
use crate::error::{SessionError, SessionResult};
use crate::lock::SessionId;
use crate::sequencer::{Admission, ClientSequencer};
use std::collections::HashMap;
use std::time::Instant;
use tracing::{debug, warn};
use trellis_protocol::{ClientMessage, ClientMessageBody, Envelope, EnvelopeWriter, NodeId, Value};
use trellis_tree::StateTree;

/// Callback invoked when a client event reaches its registered node.
///
/// Handlers receive the tree so the changes they make are tracked and
/// reach the client at the next flush.
pub type EventHandler = Box<dyn FnMut(&mut StateTree, &[Value]) + Send>;

/// The result of offering a client message to the session.
#[derive(Debug)]
pub enum MessageOutcome {
    /// The message (and any buffered messages it released) was applied.
    Applied {
        /// Number of messages whose effect reached the tree or a handler.
        count: usize,
    },
    /// The message arrived early and waits for its predecessors.
    Buffered,
    /// The message was already applied; dropped.
    Duplicate,
    /// A sequence gap forced a full resynchronization. The envelope must
    /// be delivered to the client, which rebuilds its mirror from it.
    Resynchronized(Envelope),
}

/// Server-side state of one UI session.
///
/// Owns the state tree, the envelope writer, the client sequencer, the
/// event handler registry, and the heartbeat clock. All methods assume
/// the caller holds the session lock (see [`crate::Session`]); this type
/// itself is single-threaded.
pub struct UiSession {
    id: SessionId,
    config: SessionConfig,
    tree: StateTree,
    writer: EnvelopeWriter,
    sequencer: ClientSequencer,
    handlers: HashMap<(NodeId, String), EventHandler>,
    last_heartbeat: Instant,
    closed: bool,
}

impl UiSession {
    /// Creates a new session engine.
    pub fn new(id: SessionId, config: SessionConfig) -> Self {
        let sequencer = ClientSequencer::new(config.resend_window);
        Self {
            id,
            config,
            tree: StateTree::new(),
            writer: EnvelopeWriter::new(),
            sequencer,
            handlers: HashMap::new(),
            last_heartbeat: Instant::now(),
            closed: false,
        }
    }

    /// Returns the session id.
    pub fn id(&self) -> SessionId {
        self.id
    }

    /// Returns the session configuration.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Returns the state tree for reading.
    pub fn tree(&self) -> &StateTree {
        &self.tree
    }

    /// Returns the state tree for mutation.
    ///
    /// UI code builds and updates its node graph through this; every
    /// change is tracked and reaches the client at the next flush.
    pub fn tree_mut(&mut self) -> SessionResult<&mut StateTree> {
        self.ensure_open()?;
        Ok(&mut self.tree)
    }

    /// Marks a node as needing repaint.
    pub fn mark_dirty(&mut self, node: NodeId) -> SessionResult<()> {
        self.ensure_open()?;
        self.tree.mark_dirty(node)?;
        Ok(())
    }

    /// Registers a handler for an event name on a node.
    pub fn on_event<F>(&mut self, node: NodeId, name: impl Into<String>, handler: F)
    where
        F: FnMut(&mut StateTree, &[Value]) + Send + 'static,
    {
        self.handlers.insert((node, name.into()), Box::new(handler));
    }

    /// Returns true if there are uncollected changes.
    pub fn has_pending_changes(&self) -> bool {
        self.tree.has_pending_changes()
    }

    /// Collects accumulated changes into the next envelope.
    ///
    /// Returns `None` when the tree is clean; sequence numbers are only
    /// consumed by envelopes that actually carry changes.
    pub fn flush(&mut self) -> SessionResult<Option<Envelope>> {
        self.ensure_open()?;
        let records = self.tree.collect_and_clear();
        if records.is_empty() {
            return Ok(None);
        }
        let envelope = self.writer.encode(records);
        debug!(session = %self.id, seq = envelope.seq, changes = envelope.changes.len(), "flushed");
        Ok(Some(envelope))
    }

    /// Encodes the entire current graph as a resynchronization envelope.
    ///
    /// Pending deltas are discarded; the snapshot supersedes them.
    pub fn resynchronize(&mut self) -> SessionResult<Envelope> {
        self.ensure_open()?;
        let dropped = self.tree.collect_and_clear().len();
        if dropped > 0 {
            debug!(session = %self.id, dropped, "discarding deltas superseded by resynchronization");
        }
        Ok(self.writer.encode_resync(self.tree.snapshot_records()))
    }

    /// Offers a client message to the session.
    ///
    /// Messages apply strictly in `client_seq` order: early arrivals are
    /// buffered, duplicates dropped. A gap beyond the resend window means
    /// messages were lost; the session skips past them and answers with a
    /// full resynchronization.
    ///
    /// Any client message also counts as liveness for heartbeat purposes.
    pub fn apply_client_message(&mut self, message: ClientMessage) -> SessionResult<MessageOutcome> {
        self.ensure_open()?;
        self.last_heartbeat = Instant::now();

        match self.sequencer.offer(message) {
            Admission::Ready(ready) => {
                let count = self.apply_ready(ready);
                Ok(MessageOutcome::Applied { count })
            }
            Admission::Buffered => Ok(MessageOutcome::Buffered),
            Admission::Duplicate => Ok(MessageOutcome::Duplicate),
            Admission::Gap { expected, message } => {
                warn!(
                    session = %self.id,
                    expected,
                    received = message.client_seq,
                    "client sequence gap beyond resend window; resynchronizing"
                );
                let mut ready = self.sequencer.skip_to(message.client_seq);
                if let Admission::Ready(more) = self.sequencer.offer(message) {
                    ready.extend(more);
                }
                let count = self.apply_ready(ready);
                debug!(count, "applied messages recovered past the gap");
                let envelope = self.resynchronize()?;
                Ok(MessageOutcome::Resynchronized(envelope))
            }
        }
    }

    fn apply_ready(&mut self, messages: Vec<ClientMessage>) -> usize {
        let mut count = 0;
        for message in messages {
            if self.apply_message_body(message) {
                count += 1;
            }
        }
        count
    }

    /// Applies one admitted message. Returns false when the message was
    /// dropped by the per-record recovery policy.
    fn apply_message_body(&mut self, message: ClientMessage) -> bool {
        match message.body {
            ClientMessageBody::Put { node_id, key, value } => {
                match self.tree.set_feature(node_id, key, value) {
                    Ok(()) => true,
                    Err(err) => {
                        warn!(node = %node_id, %err, "dropping client model change");
                        false
                    }
                }
            }
            ClientMessageBody::Event { node_id, name, payload } => {
                if !self.tree.is_attached(node_id) {
                    warn!(node = %node_id, event = %name, "dropping event for missing node");
                    return false;
                }
                match self.handlers.get_mut(&(node_id, name.clone())) {
                    Some(handler) => {
                        handler(&mut self.tree, &payload);
                        true
                    }
                    None => {
                        debug!(node = %node_id, event = %name, "no handler registered");
                        false
                    }
                }
            }
        }
    }

    /// Returns the next client sequence id the session will admit.
    pub fn expected_client_seq(&self) -> u64 {
        self.sequencer.expected()
    }

    /// Returns the number of buffered early client messages.
    pub fn buffered_message_count(&self) -> usize {
        self.sequencer.buffered_count()
    }

    /// Records a heartbeat now.
    pub fn record_heartbeat(&mut self) {
        self.record_heartbeat_at(Instant::now());
    }

    /// Records a heartbeat at an explicit instant.
    pub fn record_heartbeat_at(&mut self, at: Instant) {
        self.last_heartbeat = at;
    }

    /// Returns the time of the last observed heartbeat or client message.
    pub fn last_heartbeat(&self) -> Instant {
        self.last_heartbeat
    }

    /// Returns true if the session has missed too many heartbeats.
    pub fn is_stale(&self, now: Instant) -> bool {
        !self.closed && now.saturating_duration_since(self.last_heartbeat) > self.config.stale_after()
    }

    /// Closes the session, detaching the whole graph.
    ///
    /// All of the root's children are removed (the detach cascades),
    /// handlers are dropped, and further operations fail with
    /// [`SessionError::SessionClosed`].
    pub fn close(&mut self) {
        if self.closed {
            return;
        }
        debug!(session = %self.id, "closing session");
        let children: Vec<NodeId> = self
            .tree
            .node(self.tree.root_id())
            .map(|root| root.children().to_vec())
            .unwrap_or_default();
        for child in children {
            if let Err(err) = self.tree.remove_node(child) {
                warn!(node = %child, %err, "failed to detach node during close");
            }
        }
        let _ = self.tree.collect_and_clear();
        self.handlers.clear();
        self.closed = true;
    }

    /// Returns true if the session has been closed.
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    fn ensure_open(&self) -> SessionResult<()> {
        if self.closed {
            return Err(SessionError::SessionClosed);
        }
        Ok(())
    }
}
