use fjall::TxPartitionHandle;
use tracing::{debug, trace};

use crate::store::partitions::{encode_u64_key, PARTITION_QUEUE};
use crate::store::sequence::{current_sequence, next_sequence};
use crate::store::{Result, StorageError, StoreHandle};

/// Durable FIFO of serialized requests
///
/// Architecture:
/// - `queue` partition: u64 sequence (big-endian) -> request bytes
/// - `sequences` partition: "queue" -> last issued sequence
///
/// Keys sort in insertion order, so the first key is always the oldest
/// pending item. Enqueue draws the sequence and writes the item in one
/// transaction; dequeue reads the first item and removes it in one
/// transaction. A crash therefore either keeps an item or loses nothing.
#[derive(Clone)]
pub struct FifoQueue {
    handle: StoreHandle,
    items: TxPartitionHandle,
    sequences: TxPartitionHandle,
}

impl FifoQueue {
    pub fn new(handle: StoreHandle, items: TxPartitionHandle, sequences: TxPartitionHandle) -> Self {
        Self {
            handle,
            items,
            sequences,
        }
    }

    /// Append `item` and return the sequence number it was stored under
    pub fn enqueue(&self, item: &[u8]) -> Result<u64> {
        let seq = self.handle.update(|tx| {
            let seq = next_sequence(tx, &self.sequences, PARTITION_QUEUE)?;
            tx.insert(&self.items, encode_u64_key(seq), item);
            Ok(seq)
        })?;

        self.handle.metrics().enqueued();
        debug!(seq, len = item.len(), "Request enqueued");
        Ok(seq)
    }

    /// Remove and return the oldest pending item
    ///
    /// Returns `StorageError::EmptyQueue` when nothing is pending; the
    /// transaction is rolled back and the store is left unchanged.
    pub fn dequeue(&self) -> Result<Vec<u8>> {
        let result = self.handle.update(|tx| {
            let (key, value) = tx
                .first_key_value(&self.items)?
                .ok_or(StorageError::EmptyQueue)?;
            tx.remove(&self.items, key);
            Ok(value.to_vec())
        });

        match &result {
            Ok(item) => {
                self.handle.metrics().dequeued();
                debug!(len = item.len(), "Request dequeued");
            }
            Err(StorageError::EmptyQueue) => {
                self.handle.metrics().empty_poll();
                trace!("Dequeue on empty queue");
            }
            Err(_) => {}
        }

        result
    }

    /// Number of pending items in one consistent snapshot
    pub fn size(&self) -> Result<u64> {
        self.handle.view(|tx| Ok(tx.len(&self.items)? as u64))
    }

    /// Last sequence number handed out, 0 before the first enqueue
    pub fn last_sequence(&self) -> Result<u64> {
        self.handle
            .view(|tx| current_sequence(tx, &self.sequences, PARTITION_QUEUE))
    }

    pub(crate) fn partition(&self) -> &TxPartitionHandle {
        &self.items
    }

    pub(crate) fn sequences(&self) -> &TxPartitionHandle {
        &self.sequences
    }
}
