//! Fjall-backed persistence for crawler state
//!
//! One transactional keyspace holds three independent structures used by a
//! crawling engine:
//!
//! - the visited set (`requests` partition), for "have I seen this request"
//! - the cookie cache (`cookies` partition), session state per origin
//! - the request queue (`queue` partition), a durable FIFO frontier
//!
//! A fourth partition, `sequences`, stores the queue's sequence counter.
//!
//! ## Transactions
//!
//! Each public operation runs in exactly one transaction obtained through
//! [`StoreHandle::update`] or [`StoreHandle::view`]. Fjall serializes write
//! transactions and gives readers a consistent snapshot, so no extra locking
//! exists in this crate. Nothing spans partitions atomically; callers compose
//! that themselves if they need it.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use crawlstore::config::StoreConfig;
//! use crawlstore::store::CrawlStore;
//!
//! let store = CrawlStore::open(&StoreConfig::at("data/crawl"))?;
//! store.queue().enqueue(b"https://example.com/")?;
//! let next = store.queue().dequeue()?;
//! ```

pub mod error;
pub mod handle;
pub mod partitions;
pub mod sequence;
#[allow(clippy::module_inception)]
pub mod store;

pub use error::{Result, StorageError};
pub use handle::StoreHandle;
pub use store::{CrawlStore, StoreStats};
