//! Visited-request set keyed by 64-bit request fingerprints

use fjall::TxPartitionHandle;
use tracing::debug;

use crate::store::partitions::encode_u64_key;
use crate::store::{Result, StoreHandle};

/// Records which request fingerprints were already processed
///
/// Entries are never removed. Marking is idempotent.
#[derive(Clone)]
pub struct VisitedSet {
    handle: StoreHandle,
    requests: TxPartitionHandle,
}

impl VisitedSet {
    pub fn new(handle: StoreHandle, requests: TxPartitionHandle) -> Self {
        Self { handle, requests }
    }

    /// Record `id` as visited
    pub fn mark_visited(&self, id: u64) -> Result<()> {
        self.handle.update(|tx| {
            tx.insert(&self.requests, encode_u64_key(id), Vec::<u8>::new());
            Ok(())
        })?;
        self.handle.metrics().visited_marked();
        debug!(id, "Marked request visited");
        Ok(())
    }

    /// Whether `id` was ever marked
    pub fn is_visited(&self, id: u64) -> Result<bool> {
        self.handle
            .view(|tx| Ok(tx.contains_key(&self.requests, encode_u64_key(id))?))
    }

    pub(crate) fn partition(&self) -> &TxPartitionHandle {
        &self.requests
    }
}
