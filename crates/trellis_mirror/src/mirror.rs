//! Sequence-ordered envelope application.

use crate::dom::{DomBinder, DomHandle};
use crate::error::{MirrorError, MirrorResult};
use crate::node::{BindingState, MirrorNode};
use crate::outbox::EventOutbox;
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, warn};
use trellis_protocol::{ChangeOp, ChangeRecord, ClientMessage, Envelope, NodeId, Value};

/// Feature key that makes a node renderable.
const TAG: &str = "tag";

/// Configuration for the mirror.
#[derive(Debug, Clone)]
pub struct MirrorConfig {
    /// How far ahead of the expected sequence an envelope may arrive and
    /// still be queued. Anything further triggers a resynchronization
    /// request instead of waiting for a gap that may never close.
    pub queue_window: u64,
}

impl MirrorConfig {
    /// Creates the default configuration.
    pub fn new() -> Self {
        Self { queue_window: 32 }
    }

    /// Sets the queue window.
    pub fn with_queue_window(mut self, window: u64) -> Self {
        self.queue_window = window;
        self
    }
}

impl Default for MirrorConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// The result of offering an envelope to the mirror.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// The envelope (and possibly queued successors) was applied.
    Applied {
        /// Number of records applied.
        applied: usize,
        /// Number of records skipped after per-record recovery.
        skipped: usize,
    },
    /// The envelope's sequence was already seen; nothing happened.
    Duplicate,
    /// The envelope arrived early and was queued until the gap closes.
    Queued,
    /// The gap exceeds the queue window; the caller must request a full
    /// resynchronization from the server.
    ResyncRequired,
}

impl ApplyOutcome {
    /// Returns true if records were applied.
    pub fn is_applied(&self) -> bool {
        matches!(self, ApplyOutcome::Applied { .. })
    }
}

/// Client-resident replica of the server state graph.
///
/// Applies envelopes strictly in sequence order, binds renderable nodes to
/// elements through the [`DomBinder`], and produces outgoing client
/// messages with monotonically increasing sequence ids.
pub struct Mirror<B: DomBinder> {
    binder: B,
    config: MirrorConfig,
    nodes: HashMap<NodeId, MirrorNode>,
    expected_seq: u64,
    queued: BTreeMap<u64, Envelope>,
    outbox: EventOutbox,
}

impl<B: DomBinder> Mirror<B> {
    /// Creates a mirror with the default configuration.
    pub fn new(binder: B) -> Self {
        Self::with_config(binder, MirrorConfig::new())
    }

    /// Creates a mirror with the given configuration.
    ///
    /// The root node (id 0) starts bound to the binder's root element.
    pub fn with_config(binder: B, config: MirrorConfig) -> Self {
        let mut nodes = HashMap::new();
        let mut root = MirrorNode::new(NodeId::ROOT, None);
        root.state = BindingState::Bound(binder.root_handle());
        nodes.insert(NodeId::ROOT, root);
        Self {
            binder,
            config,
            nodes,
            expected_seq: 0,
            queued: BTreeMap::new(),
            outbox: EventOutbox::new(),
        }
    }

    /// Offers an envelope to the mirror.
    ///
    /// Envelopes apply strictly in sequence order: duplicates are dropped,
    /// early arrivals within the queue window are buffered, and a larger
    /// gap reports [`ApplyOutcome::ResyncRequired`]. Applying an envelope
    /// drains any queued successors whose turn has come.
    pub fn apply(&mut self, envelope: Envelope) -> MirrorResult<ApplyOutcome> {
        if envelope.resync {
            return self.rebuild(envelope);
        }

        if envelope.seq < self.expected_seq {
            debug!(seq = envelope.seq, expected = self.expected_seq, "dropping stale envelope");
            return Ok(ApplyOutcome::Duplicate);
        }

        if envelope.seq > self.expected_seq {
            if envelope.seq - self.expected_seq > self.config.queue_window {
                warn!(
                    seq = envelope.seq,
                    expected = self.expected_seq,
                    "sequence gap exceeds queue window"
                );
                return Ok(ApplyOutcome::ResyncRequired);
            }
            debug!(seq = envelope.seq, expected = self.expected_seq, "queueing early envelope");
            self.queued.insert(envelope.seq, envelope);
            return Ok(ApplyOutcome::Queued);
        }

        let (mut applied, mut skipped) = self.apply_changes(&envelope.changes)?;
        self.expected_seq = envelope.seq + 1;

        while let Some(next) = self.queued.remove(&self.expected_seq) {
            let (a, s) = self.apply_changes(&next.changes)?;
            applied += a;
            skipped += s;
            self.expected_seq += 1;
        }

        Ok(ApplyOutcome::Applied { applied, skipped })
    }

    /// Discards the replica and rebuilds it from a resync envelope.
    fn rebuild(&mut self, envelope: Envelope) -> MirrorResult<ApplyOutcome> {
        debug!(seq = envelope.seq, "rebuilding mirror from resynchronization");
        self.queued.clear();

        let handles: Vec<DomHandle> = self
            .nodes
            .values()
            .filter(|n| !n.id().is_root())
            .filter_map(|n| n.state().handle())
            .collect();
        for handle in handles {
            self.binder.remove_element(handle);
        }

        self.nodes.clear();
        let mut root = MirrorNode::new(NodeId::ROOT, None);
        root.state = BindingState::Bound(self.binder.root_handle());
        self.nodes.insert(NodeId::ROOT, root);

        let (applied, skipped) = self.apply_changes(&envelope.changes)?;
        self.expected_seq = envelope.seq + 1;
        Ok(ApplyOutcome::Applied { applied, skipped })
    }

    /// Applies records in order, recovering per record where the policy
    /// allows it.
    fn apply_changes(&mut self, changes: &[ChangeRecord]) -> MirrorResult<(usize, usize)> {
        let mut applied = 0;
        let mut skipped = 0;
        for record in changes {
            match self.apply_record(record) {
                Ok(()) => applied += 1,
                Err(MirrorError::NodeNotFound { node }) => {
                    warn!(%node, "skipping record for unknown mirror node");
                    skipped += 1;
                }
                Err(MirrorError::AlreadyDetached { node }) => {
                    warn!(%node, "skipping record for detached mirror node");
                    skipped += 1;
                }
                Err(err) => return Err(err),
            }
        }
        Ok((applied, skipped))
    }

    fn apply_record(&mut self, record: &ChangeRecord) -> MirrorResult<()> {
        let id = record.node_id;
        match &record.op {
            ChangeOp::Put { key, value } => {
                let state = {
                    let node = self.node_mut(id)?;
                    node.features.insert(key.clone(), value.clone());
                    node.state
                };
                match state {
                    BindingState::Bound(handle) => {
                        if key == TAG {
                            warn!(node = %id, "ignoring tag change on bound node");
                        } else {
                            self.binder.set_attribute(handle, key, value);
                        }
                    }
                    BindingState::Unbound => self.try_bind(id)?,
                    BindingState::Detached => {}
                }
                Ok(())
            }
            ChangeOp::RemoveKey { key } => {
                let state = {
                    let node = self.node_mut(id)?;
                    node.features.remove(key);
                    node.state
                };
                if let BindingState::Bound(handle) = state {
                    if key == TAG {
                        warn!(node = %id, "ignoring tag removal on bound node");
                    } else {
                        self.binder.remove_attribute(handle, key);
                    }
                }
                Ok(())
            }
            ChangeOp::AddChild { child_id, index } => {
                if self.nodes.contains_key(child_id) {
                    warn!(node = %child_id, "ignoring add for node already in mirror");
                    return Ok(());
                }
                {
                    let node = self.node_mut(id)?;
                    let index = (*index).min(node.children.len());
                    node.children.insert(index, *child_id);
                }
                self.nodes.insert(*child_id, MirrorNode::new(*child_id, Some(id)));
                Ok(())
            }
            ChangeOp::RemoveChild { child_id } => {
                self.node_mut(id)?.children.retain(|c| c != child_id);
                self.detach_subtree(*child_id)?;
                Ok(())
            }
            ChangeOp::Reorder { child_id, index } => {
                let node = self.node_mut(id)?;
                let pos = node
                    .children
                    .iter()
                    .position(|c| c == child_id)
                    .ok_or(MirrorError::NodeNotFound { node: *child_id })?;
                node.children.remove(pos);
                let index = (*index).min(node.children.len());
                node.children.insert(index, *child_id);

                if let (Some(parent_handle), Some(child_handle)) =
                    (self.handle_of(id), self.handle_of(*child_id))
                {
                    let dom_index = self.bound_index(id, *child_id);
                    self.binder.move_child(parent_handle, child_handle, dom_index);
                }
                Ok(())
            }
        }
    }

    /// Binds a node to a new element if it has become renderable.
    fn try_bind(&mut self, id: NodeId) -> MirrorResult<()> {
        let (tag, features, parent) = {
            let node = self.node(id)?;
            if node.state() != BindingState::Unbound {
                return Ok(());
            }
            let tag = match node.feature(TAG).and_then(Value::as_text) {
                Some(tag) => tag.to_string(),
                None => return Ok(()),
            };
            (tag, node.features.clone(), node.parent())
        };

        let handle = self
            .binder
            .create_element(id, &tag)
            .map_err(|message| MirrorError::binding_failed(id, message))?;
        for (key, value) in &features {
            if key != TAG {
                self.binder.set_attribute(handle, key, value);
            }
        }
        if let Some(node) = self.nodes.get_mut(&id) {
            node.state = BindingState::Bound(handle);
        }
        debug!(node = %id, %handle, tag = %tag, "bound mirror node");

        if let Some(parent) = parent {
            if let Some(parent_handle) = self.handle_of(parent) {
                let index = self.bound_index(parent, id);
                self.binder.insert_child(parent_handle, handle, index);
            }
        }

        // Children that bound before this node attach now.
        let children: Vec<NodeId> = self
            .nodes
            .get(&id)
            .map(|n| n.children.clone())
            .unwrap_or_default();
        for child in children {
            if let Some(child_handle) = self.handle_of(child) {
                let index = self.bound_index(id, child);
                self.binder.insert_child(handle, child_handle, index);
            }
        }
        Ok(())
    }

    /// Detaches a subtree, releasing its DOM and purging its nodes.
    fn detach_subtree(&mut self, root: NodeId) -> MirrorResult<()> {
        if !self.nodes.contains_key(&root) {
            return Err(MirrorError::NodeNotFound { node: root });
        }
        if let Some(handle) = self.handle_of(root) {
            self.binder.remove_element(handle);
        }

        let mut stack = vec![root];
        let mut count = 0;
        while let Some(id) = stack.pop() {
            if let Some(mut node) = self.nodes.remove(&id) {
                node.state = BindingState::Detached;
                count += 1;
                stack.extend_from_slice(&node.children);
            }
        }
        debug!(node = %root, count, "detached mirror subtree");
        Ok(())
    }

    /// Builds an event message for a node, assigning the next client
    /// sequence id.
    pub fn emit_event(
        &mut self,
        node: NodeId,
        name: impl Into<String>,
        payload: Vec<Value>,
    ) -> MirrorResult<ClientMessage> {
        self.node(node)?;
        Ok(self.outbox.event(node, name, payload))
    }

    /// Records a client-initiated model change and builds the message.
    ///
    /// The local feature map is updated optimistically; the rendered
    /// element already reflects the change (the user made it there).
    pub fn set_client_feature(
        &mut self,
        node: NodeId,
        key: impl Into<String>,
        value: impl Into<Value>,
    ) -> MirrorResult<ClientMessage> {
        let key = key.into();
        let value = value.into();
        let state = self.node_mut(node)?;
        state.features.insert(key.clone(), value.clone());
        Ok(self.outbox.put(node, key, value))
    }

    /// Looks up a mirror node by id.
    pub fn node(&self, id: NodeId) -> MirrorResult<&MirrorNode> {
        self.nodes
            .get(&id)
            .ok_or(MirrorError::NodeNotFound { node: id })
    }

    fn node_mut(&mut self, id: NodeId) -> MirrorResult<&mut MirrorNode> {
        self.nodes
            .get_mut(&id)
            .ok_or(MirrorError::NodeNotFound { node: id })
    }

    /// Returns true if the id exists in the mirror.
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Returns the number of mirror nodes, the root included.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Returns the sequence number the next envelope must carry.
    pub fn expected_seq(&self) -> u64 {
        self.expected_seq
    }

    /// Returns the number of envelopes waiting for a gap to close.
    pub fn queued_count(&self) -> usize {
        self.queued.len()
    }

    /// Returns the DOM handle bound to a node, if any.
    pub fn dom_handle(&self, id: NodeId) -> Option<DomHandle> {
        self.handle_of(id)
    }

    /// Returns the outbox of outgoing client messages.
    pub fn outbox(&self) -> &EventOutbox {
        &self.outbox
    }

    /// Returns the outbox mutably, e.g. to acknowledge messages.
    pub fn outbox_mut(&mut self) -> &mut EventOutbox {
        &mut self.outbox
    }

    /// Returns the binding layer.
    pub fn binder(&self) -> &B {
        &self.binder
    }

    fn handle_of(&self, id: NodeId) -> Option<DomHandle> {
        self.nodes.get(&id)?.state().handle()
    }

    /// Index of `child` among its parent's bound children.
    fn bound_index(&self, parent: NodeId, child: NodeId) -> usize {
        self.nodes
            .get(&parent)
            .map(|node| {
                node.children
                    .iter()
                    .take_while(|c| **c != child)
                    .filter(|c| self.handle_of(**c).is_some())
                    .count()
            })
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::MockDom;
    use trellis_protocol::EnvelopeWriter;

    fn mirror() -> Mirror<MockDom> {
        Mirror::new(MockDom::new())
    }

    fn div_envelope(writer: &mut EnvelopeWriter) -> Envelope {
        writer.encode(vec![
            ChangeRecord::add_child(NodeId::ROOT, NodeId::new(1), 0),
            ChangeRecord::put(NodeId::new(1), "tag", "div"),
        ])
    }

    #[test]
    fn binds_when_tag_arrives() {
        let mut mirror = mirror();
        let mut writer = EnvelopeWriter::new();

        let outcome = mirror.apply(div_envelope(&mut writer)).unwrap();
        assert_eq!(outcome, ApplyOutcome::Applied { applied: 2, skipped: 0 });

        let node = mirror.node(NodeId::new(1)).unwrap();
        assert!(node.state().is_bound());

        let handle = mirror.dom_handle(NodeId::new(1)).unwrap();
        let root = mirror.binder().root_handle();
        assert_eq!(mirror.binder().children_of(root), &[handle]);
        assert_eq!(mirror.binder().element(handle).unwrap().tag, "div");
    }

    #[test]
    fn node_without_tag_stays_unbound() {
        let mut mirror = mirror();
        let mut writer = EnvelopeWriter::new();
        mirror
            .apply(writer.encode(vec![
                ChangeRecord::add_child(NodeId::ROOT, NodeId::new(1), 0),
                ChangeRecord::put(NodeId::new(1), "hidden", true),
            ]))
            .unwrap();

        assert_eq!(
            mirror.node(NodeId::new(1)).unwrap().state(),
            BindingState::Unbound
        );
        assert_eq!(mirror.binder().element_count(), 1); // just the root
    }

    #[test]
    fn features_known_before_bind_are_applied_at_bind() {
        let mut mirror = mirror();
        let mut writer = EnvelopeWriter::new();
        mirror
            .apply(writer.encode(vec![
                ChangeRecord::add_child(NodeId::ROOT, NodeId::new(1), 0),
                ChangeRecord::put(NodeId::new(1), "id", "foo"),
                ChangeRecord::put(NodeId::new(1), "tag", "div"),
            ]))
            .unwrap();

        let handle = mirror.dom_handle(NodeId::new(1)).unwrap();
        assert_eq!(
            mirror.binder().attribute(handle, "id"),
            Some(&Value::Text("foo".into()))
        );
    }

    #[test]
    fn attribute_changes_reach_bound_elements() {
        let mut mirror = mirror();
        let mut writer = EnvelopeWriter::new();
        mirror.apply(div_envelope(&mut writer)).unwrap();

        mirror
            .apply(writer.encode(vec![
                ChangeRecord::put(NodeId::new(1), "class", "active"),
            ]))
            .unwrap();
        let handle = mirror.dom_handle(NodeId::new(1)).unwrap();
        assert_eq!(
            mirror.binder().attribute(handle, "class"),
            Some(&Value::Text("active".into()))
        );

        mirror
            .apply(writer.encode(vec![ChangeRecord::remove_key(NodeId::new(1), "class")]))
            .unwrap();
        assert_eq!(mirror.binder().attribute(handle, "class"), None);
    }

    #[test]
    fn duplicate_envelope_is_a_no_op() {
        let mut mirror = mirror();
        let mut writer = EnvelopeWriter::new();
        let envelope = div_envelope(&mut writer);

        mirror.apply(envelope.clone()).unwrap();
        let count = mirror.binder().element_count();

        let outcome = mirror.apply(envelope).unwrap();
        assert_eq!(outcome, ApplyOutcome::Duplicate);
        assert_eq!(mirror.binder().element_count(), count);
    }

    #[test]
    fn early_envelope_queues_until_gap_closes() {
        let mut mirror = mirror();
        let mut writer = EnvelopeWriter::new();

        let first = div_envelope(&mut writer);
        let second = writer.encode(vec![ChangeRecord::put(NodeId::new(1), "id", "foo")]);

        let outcome = mirror.apply(second).unwrap();
        assert_eq!(outcome, ApplyOutcome::Queued);
        assert_eq!(mirror.queued_count(), 1);
        assert!(!mirror.contains(NodeId::new(1)));

        let outcome = mirror.apply(first).unwrap();
        assert_eq!(outcome, ApplyOutcome::Applied { applied: 3, skipped: 0 });
        assert_eq!(mirror.queued_count(), 0);

        let handle = mirror.dom_handle(NodeId::new(1)).unwrap();
        assert_eq!(
            mirror.binder().attribute(handle, "id"),
            Some(&Value::Text("foo".into()))
        );
    }

    #[test]
    fn gap_beyond_window_requires_resync() {
        let mut mirror = Mirror::with_config(MockDom::new(), MirrorConfig::new().with_queue_window(2));
        let envelope = Envelope {
            seq: 10,
            resync: false,
            changes: vec![],
        };
        assert_eq!(mirror.apply(envelope).unwrap(), ApplyOutcome::ResyncRequired);
        assert_eq!(mirror.queued_count(), 0);
    }

    #[test]
    fn remove_child_detaches_subtree_and_dom() {
        let mut mirror = mirror();
        let mut writer = EnvelopeWriter::new();
        mirror
            .apply(writer.encode(vec![
                ChangeRecord::add_child(NodeId::ROOT, NodeId::new(1), 0),
                ChangeRecord::put(NodeId::new(1), "tag", "div"),
                ChangeRecord::add_child(NodeId::new(1), NodeId::new(2), 0),
                ChangeRecord::put(NodeId::new(2), "tag", "span"),
            ]))
            .unwrap();
        assert_eq!(mirror.binder().element_count(), 3);

        mirror
            .apply(writer.encode(vec![ChangeRecord::remove_child(NodeId::ROOT, NodeId::new(1))]))
            .unwrap();
        assert_eq!(mirror.binder().element_count(), 1);
        assert!(!mirror.contains(NodeId::new(1)));
        assert!(!mirror.contains(NodeId::new(2)));
    }

    #[test]
    fn add_then_remove_in_one_envelope_leaves_no_element() {
        let mut mirror = mirror();
        let mut writer = EnvelopeWriter::new();
        mirror
            .apply(writer.encode(vec![
                ChangeRecord::add_child(NodeId::ROOT, NodeId::new(1), 0),
                ChangeRecord::put(NodeId::new(1), "tag", "div"),
                ChangeRecord::remove_child(NodeId::ROOT, NodeId::new(1)),
            ]))
            .unwrap();

        assert_eq!(mirror.binder().element_count(), 1);
        assert!(!mirror.contains(NodeId::new(1)));
    }

    #[test]
    fn reorder_moves_dom_children() {
        let mut mirror = mirror();
        let mut writer = EnvelopeWriter::new();
        mirror
            .apply(writer.encode(vec![
                ChangeRecord::add_child(NodeId::ROOT, NodeId::new(1), 0),
                ChangeRecord::put(NodeId::new(1), "tag", "div"),
                ChangeRecord::add_child(NodeId::ROOT, NodeId::new(2), 1),
                ChangeRecord::put(NodeId::new(2), "tag", "span"),
            ]))
            .unwrap();

        mirror
            .apply(writer.encode(vec![ChangeRecord::reorder(NodeId::ROOT, NodeId::new(2), 0)]))
            .unwrap();

        let a = mirror.dom_handle(NodeId::new(1)).unwrap();
        let b = mirror.dom_handle(NodeId::new(2)).unwrap();
        let root = mirror.binder().root_handle();
        assert_eq!(mirror.binder().children_of(root), &[b, a]);
    }

    #[test]
    fn late_parent_bind_attaches_bound_children() {
        let mut mirror = mirror();
        let mut writer = EnvelopeWriter::new();
        mirror
            .apply(writer.encode(vec![
                ChangeRecord::add_child(NodeId::ROOT, NodeId::new(1), 0),
                ChangeRecord::add_child(NodeId::new(1), NodeId::new(2), 0),
                ChangeRecord::put(NodeId::new(2), "tag", "span"),
            ]))
            .unwrap();
        // Child is bound, parent is not; the element exists but floats.
        assert!(mirror.node(NodeId::new(2)).unwrap().state().is_bound());

        mirror
            .apply(writer.encode(vec![ChangeRecord::put(NodeId::new(1), "tag", "div")]))
            .unwrap();
        let parent = mirror.dom_handle(NodeId::new(1)).unwrap();
        let child = mirror.dom_handle(NodeId::new(2)).unwrap();
        assert_eq!(mirror.binder().children_of(parent), &[child]);
    }

    #[test]
    fn unknown_node_record_is_skipped() {
        let mut mirror = mirror();
        let mut writer = EnvelopeWriter::new();
        let outcome = mirror
            .apply(writer.encode(vec![
                ChangeRecord::put(NodeId::new(42), "tag", "div"),
                ChangeRecord::add_child(NodeId::ROOT, NodeId::new(1), 0),
            ]))
            .unwrap();
        assert_eq!(outcome, ApplyOutcome::Applied { applied: 1, skipped: 1 });
        assert!(mirror.contains(NodeId::new(1)));
    }

    #[test]
    fn resync_rebuilds_the_replica() {
        let mut mirror = mirror();
        let mut writer = EnvelopeWriter::new();
        mirror.apply(div_envelope(&mut writer)).unwrap();
        assert_eq!(mirror.node_count(), 2);

        // An early envelope sits in the queue; the resync must discard it.
        let early = Envelope {
            seq: 3,
            resync: false,
            changes: vec![ChangeRecord::put(NodeId::new(1), "id", "x")],
        };
        assert_eq!(mirror.apply(early).unwrap(), ApplyOutcome::Queued);

        let resync = writer.encode_resync(vec![
            ChangeRecord::add_child(NodeId::ROOT, NodeId::new(5), 0),
            ChangeRecord::put(NodeId::new(5), "tag", "section"),
        ]);
        let outcome = mirror.apply(resync).unwrap();
        assert!(outcome.is_applied());
        assert_eq!(mirror.queued_count(), 0);
        assert_eq!(mirror.node_count(), 2);
        assert!(mirror.contains(NodeId::new(5)));
        assert!(!mirror.contains(NodeId::new(1)));
        assert_eq!(mirror.binder().element_count(), 2);
        assert_eq!(mirror.expected_seq(), 2);
    }

    #[test]
    fn event_messages_carry_increasing_client_seqs() {
        let mut mirror = mirror();
        let mut writer = EnvelopeWriter::new();
        mirror.apply(div_envelope(&mut writer)).unwrap();

        let a = mirror
            .emit_event(NodeId::new(1), "click", vec![Value::Int(3)])
            .unwrap();
        let b = mirror
            .set_client_feature(NodeId::new(1), "value", "typed")
            .unwrap();
        assert_eq!(a.client_seq, 0);
        assert_eq!(b.client_seq, 1);
        assert_eq!(mirror.outbox().pending_count(), 2);

        mirror.outbox_mut().acknowledge_up_to(0);
        assert_eq!(mirror.outbox().pending_count(), 1);
    }

    #[test]
    fn event_for_unknown_node_is_an_error() {
        let mut mirror = mirror();
        assert!(matches!(
            mirror.emit_event(NodeId::new(9), "click", vec![]),
            Err(MirrorError::NodeNotFound { .. })
        ));
    }
}
