use std::sync::Arc;

use fjall::{
    PartitionCreateOptions, PersistMode, ReadTransaction, TxKeyspace, TxPartitionHandle,
    WriteTransaction,
};
use tracing::debug;

use crate::observability::Metrics;

use super::error::Result;

/// Shared handle onto one open keyspace
///
/// Every component holds a clone. Cloning is cheap (the keyspace is
/// reference counted) and all clones see the same data.
#[derive(Clone)]
pub struct StoreHandle {
    keyspace: TxKeyspace,
    durability: Option<PersistMode>,
    metrics: Arc<Metrics>,
}

impl StoreHandle {
    pub(crate) fn new(keyspace: TxKeyspace, durability: Option<PersistMode>) -> Self {
        Self {
            keyspace,
            durability,
            metrics: Arc::new(Metrics::new()),
        }
    }

    /// Create the partition if absent and return its handle
    pub fn open_partition(&self, name: &str) -> Result<TxPartitionHandle> {
        let partition = self
            .keyspace
            .open_partition(name, PartitionCreateOptions::default())?;
        debug!(partition = name, "Partition ready");
        Ok(partition)
    }

    /// Run `f` inside one read-write transaction
    ///
    /// Commits when `f` returns `Ok`, rolls back when it returns `Err`.
    /// Write transactions are serialized by the keyspace, so `f` never
    /// observes a concurrent writer.
    pub fn update<T>(&self, f: impl FnOnce(&mut WriteTransaction) -> Result<T>) -> Result<T> {
        let mut tx = self.keyspace.write_tx().durability(self.durability);
        match f(&mut tx) {
            Ok(value) => {
                tx.commit()?;
                Ok(value)
            }
            Err(e) => {
                tx.rollback();
                Err(e)
            }
        }
    }

    /// Run `f` against one read-only snapshot
    pub fn view<T>(&self, f: impl FnOnce(&ReadTransaction) -> Result<T>) -> Result<T> {
        let tx = self.keyspace.read_tx();
        f(&tx)
    }

    /// Flush the journal to disk
    pub fn persist(&self) -> Result<()> {
        self.keyspace.persist(PersistMode::SyncAll)?;
        Ok(())
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }
}
