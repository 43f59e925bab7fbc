use crate::store::{CrawlStore, Result};

/// Crawl state a crawling engine reads and writes between requests
///
/// `init` may be called on every startup. Cookie operations never fail:
/// a store error reads as "no cookies" and drops the write.
pub trait Storage: Send + Sync {
    /// Make sure the backing partitions exist
    fn init(&self) -> Result<()>;

    /// Record a request fingerprint as processed
    fn mark_visited(&self, id: u64) -> Result<()>;

    /// Whether a request fingerprint was processed before
    fn is_visited(&self, id: u64) -> Result<bool>;

    /// Serialized cookies for an origin, empty when unknown
    fn get_cookies(&self, origin: &str) -> String;

    /// Replace the serialized cookies for an origin
    fn set_cookies(&self, origin: &str, cookies: &str);
}

/// Durable FIFO of serialized requests
pub trait RequestQueue: Send + Sync {
    /// Append a request
    fn enqueue(&self, request: &[u8]) -> Result<()>;

    /// Pop the oldest request; `StorageError::EmptyQueue` when none is pending
    fn dequeue(&self) -> Result<Vec<u8>>;

    /// Number of pending requests
    fn size(&self) -> Result<u64>;
}

impl Storage for CrawlStore {
    fn init(&self) -> Result<()> {
        CrawlStore::init(self)
    }

    fn mark_visited(&self, id: u64) -> Result<()> {
        self.visited().mark_visited(id)
    }

    fn is_visited(&self, id: u64) -> Result<bool> {
        self.visited().is_visited(id)
    }

    fn get_cookies(&self, origin: &str) -> String {
        self.cookies().get_cookies(origin)
    }

    fn set_cookies(&self, origin: &str, cookies: &str) {
        self.cookies().set_cookies(origin, cookies)
    }
}

impl RequestQueue for CrawlStore {
    fn enqueue(&self, request: &[u8]) -> Result<()> {
        self.queue().enqueue(request)?;
        Ok(())
    }

    fn dequeue(&self) -> Result<Vec<u8>> {
        self.queue().dequeue()
    }

    fn size(&self) -> Result<u64> {
        self.queue().size()
    }
}
