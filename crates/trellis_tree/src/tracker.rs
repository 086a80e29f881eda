//! Ordered mutation log with coalescing.

use trellis_protocol::ChangeRecord;

/// Records every mutation since the last flush, in order.
///
/// Coalescing policy: map operations (`Put`, `RemoveKey`) on the same
/// `(node, key)` collapse last-write-wins — the earlier record keeps its
/// position and takes the later operation's payload, which cannot change
/// the observable outcome because map operations on different keys
/// commute. Structural operations are never coalesced: the client must
/// replay each child attach/detach/reorder exactly once.
#[derive(Debug, Default)]
pub struct ChangeTracker {
    records: Vec<ChangeRecord>,
}

impl ChangeTracker {
    /// Creates an empty tracker.
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
        }
    }

    /// Appends a change, coalescing map operations on the same key.
    pub fn record(&mut self, record: ChangeRecord) {
        if !record.is_structural() {
            let slot = self.records.iter_mut().find(|existing| {
                existing.node_id == record.node_id
                    && !existing.is_structural()
                    && existing.op.key() == record.op.key()
            });
            if let Some(existing) = slot {
                existing.op = record.op;
                return;
            }
        }
        self.records.push(record);
    }

    /// Takes all pending records, leaving the tracker empty.
    pub fn collect_and_clear(&mut self) -> Vec<ChangeRecord> {
        std::mem::take(&mut self.records)
    }

    /// Returns the number of pending records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if no changes are pending.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
