use std::path::Path;
use std::thread;
use std::time::{Duration, Instant};

use fjall::{Config as KeyspaceConfig, TxKeyspace};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::StoreConfig;
use crate::cookies::CookieCache;
use crate::observability::MetricsSnapshot;
use crate::queue::FifoQueue;
use crate::visited::VisitedSet;

use super::error::{Result, StorageError};
use super::handle::StoreHandle;
use super::partitions::{
    ALL_PARTITIONS, PARTITION_COOKIES, PARTITION_QUEUE, PARTITION_REQUESTS, PARTITION_SEQUENCES,
};
use super::sequence::current_sequence;

/// Pause between open attempts while an open timeout is running
const OPEN_RETRY_INTERVAL: Duration = Duration::from_millis(50);

/// Crawl state persisted in one Fjall keyspace
///
/// Owns the visited set, the cookie cache and the request queue. All three
/// share one `StoreHandle`, and each operation on them is its own transaction.
#[derive(Clone)]
pub struct CrawlStore {
    handle: StoreHandle,
    visited: VisitedSet,
    cookies: CookieCache,
    queue: FifoQueue,
}

impl CrawlStore {
    /// Open or create a crawl store as described by `config`
    pub fn open(config: &StoreConfig) -> Result<Self> {
        let path = config.path.as_path();
        info!(
            path = %path.display(),
            mode = %config.mode,
            cache_size = %config.cache_size,
            max_write_buffer_size = %config.max_write_buffer_size,
            "Opening crawl store"
        );

        create_store_dir(path, config)?;

        let keyspace = open_keyspace(config)?;
        let handle = StoreHandle::new(keyspace, config.durability.persist_mode());

        let store = Self::from_handle(handle)?;
        info!(path = %path.display(), "Crawl store opened");
        Ok(store)
    }

    /// Build a store over an already-open handle, provisioning partitions
    pub fn from_handle(handle: StoreHandle) -> Result<Self> {
        provision(&handle)?;

        let visited = VisitedSet::new(handle.clone(), handle.open_partition(PARTITION_REQUESTS)?);
        let cookies = CookieCache::new(handle.clone(), handle.open_partition(PARTITION_COOKIES)?);
        let queue = FifoQueue::new(
            handle.clone(),
            handle.open_partition(PARTITION_QUEUE)?,
            handle.open_partition(PARTITION_SEQUENCES)?,
        );

        Ok(Self {
            handle,
            visited,
            cookies,
            queue,
        })
    }

    /// Ensure every partition exists
    ///
    /// Safe to call on every startup: existing partitions and their data are
    /// left untouched.
    pub fn init(&self) -> Result<()> {
        provision(&self.handle)
    }

    pub fn visited(&self) -> &VisitedSet {
        &self.visited
    }

    pub fn cookies(&self) -> &CookieCache {
        &self.cookies
    }

    pub fn queue(&self) -> &FifoQueue {
        &self.queue
    }

    pub fn handle(&self) -> &StoreHandle {
        &self.handle
    }

    /// Persist all pending writes to disk
    pub fn persist(&self) -> Result<()> {
        self.handle.persist()
    }

    /// Flush and release this handle on the store
    ///
    /// The keyspace itself shuts down once the last clone is gone.
    pub fn close(self) -> Result<()> {
        self.handle.persist()?;
        info!("Crawl store closed");
        Ok(())
    }

    /// Health check - verify the store is readable
    pub fn health_check(&self) -> Result<()> {
        self.queue.last_sequence()?;
        Ok(())
    }

    /// Entry counts of every partition, read from a single snapshot
    pub fn stats(&self) -> Result<StoreStats> {
        let counts = self.handle.view(|tx| {
            Ok(StoreStats {
                visited_count: tx.len(self.visited.partition())? as u64,
                cookie_origins: tx.len(self.cookies.partition())? as u64,
                queue_size: tx.len(self.queue.partition())? as u64,
                last_sequence: current_sequence(tx, self.queue.sequences(), PARTITION_QUEUE)?,
                metrics: self.handle.metrics().snapshot(),
            })
        })?;
        debug!(?counts, "Collected store stats");
        Ok(counts)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StoreStats {
    pub visited_count: u64,
    pub cookie_origins: u64,
    pub queue_size: u64,
    pub last_sequence: u64,
    pub metrics: MetricsSnapshot,
}

fn provision(handle: &StoreHandle) -> Result<()> {
    debug!("Creating partitions");
    for name in ALL_PARTITIONS {
        handle.open_partition(name)?;
    }
    Ok(())
}

/// Create the store directory with the configured mode if it is missing
fn create_store_dir(path: &Path, config: &StoreConfig) -> Result<()> {
    if path.exists() {
        debug!(path = %path.display(), "Store directory exists, keeping its mode");
        return Ok(());
    }

    let mut builder = std::fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(config.mode.dir_mode());
    }

    builder.create(path)?;
    debug!(path = %path.display(), mode = %config.mode, "Created store directory");
    Ok(())
}

fn open_keyspace(config: &StoreConfig) -> Result<TxKeyspace> {
    let started = Instant::now();
    let timeout = config.open_timeout();
    let mut attempts = 0u32;

    loop {
        attempts += 1;
        let attempt = KeyspaceConfig::new(&config.path)
            .cache_size(config.cache_size.as_u64())
            .max_write_buffer_size(config.max_write_buffer_size.as_u64())
            .fsync_ms(config.fsync_ms)
            .open_transactional();

        match attempt {
            Ok(keyspace) => return Ok(keyspace),
            Err(e) => match timeout {
                Some(limit) if started.elapsed() < limit => {
                    if attempts == 1 {
                        warn!(error = %e, ?limit, "Store not available yet, retrying");
                    } else {
                        debug!(error = %e, attempts, "Store still not available");
                    }
                    thread::sleep(OPEN_RETRY_INTERVAL);
                }
                Some(_) => {
                    warn!(error = %e, attempts, "Giving up opening store");
                    return Err(StorageError::OpenTimeout {
                        waited: started.elapsed(),
                        source: e,
                    });
                }
                None => return Err(e.into()),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_store() -> (CrawlStore, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let config = StoreConfig::at(temp_dir.path().join("crawl"));
        let store = CrawlStore::open(&config).unwrap();
        (store, temp_dir)
    }

    #[test]
    fn test_open_store() {
        let temp_dir = TempDir::new().unwrap();
        let store = CrawlStore::open(&StoreConfig::at(temp_dir.path().join("crawl")));
        assert!(store.is_ok());
    }

    #[test]
    fn test_open_creates_nested_directory() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("a").join("b").join("crawl");
        let _store = CrawlStore::open(&StoreConfig::at(path.clone())).unwrap();
        assert!(path.is_dir());
    }

    #[cfg(unix)]
    #[test]
    fn test_directory_mode_applied() {
        use crate::humanize::FileMode;
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("crawl");
        let mut config = StoreConfig::at(path.clone());
        config.mode = FileMode(0o600);

        let _store = CrawlStore::open(&config).unwrap();
        let mode = std::fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        // umask can only clear bits, never add group/world access
        assert_eq!(mode & 0o077, 0);
    }

    #[test]
    fn test_open_times_out_on_unusable_path() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("crawl");
        std::fs::write(&path, b"not a keyspace").unwrap();

        let mut config = StoreConfig::at(path);
        config.open_timeout_ms = Some(200);

        let started = Instant::now();
        let result = CrawlStore::open(&config);

        match result {
            Err(StorageError::OpenTimeout { waited, .. }) => {
                assert!(waited >= Duration::from_millis(200), "gave up after {waited:?}");
            }
            Err(e) => panic!("expected OpenTimeout, got {e}"),
            Ok(_) => panic!("opening a regular file as a store should fail"),
        }
        assert!(started.elapsed() >= Duration::from_millis(200));
    }

    #[test]
    fn test_open_without_timeout_fails_once() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("crawl");
        std::fs::write(&path, b"not a keyspace").unwrap();

        let result = CrawlStore::open(&StoreConfig::at(path));
        assert!(matches!(result, Err(StorageError::Fjall(_)) | Err(StorageError::Io(_))));
    }

    #[test]
    fn test_stats_empty_store() {
        let (store, _temp) = create_test_store();
        let stats = store.stats().unwrap();
        assert_eq!(stats.visited_count, 0);
        assert_eq!(stats.cookie_origins, 0);
        assert_eq!(stats.queue_size, 0);
        assert_eq!(stats.last_sequence, 0);
    }

    #[test]
    fn test_stats_counts_each_partition() {
        let (store, _temp) = create_test_store();

        store.visited().mark_visited(1).unwrap();
        store.visited().mark_visited(2).unwrap();
        store.cookies().set_cookies("https://example.com/", "a=1");
        store.queue().enqueue(b"req").unwrap();

        let stats = store.stats().unwrap();
        assert_eq!(stats.visited_count, 2);
        assert_eq!(stats.cookie_origins, 1);
        assert_eq!(stats.queue_size, 1);
        assert_eq!(stats.last_sequence, 1);
        assert_eq!(stats.metrics.enqueued, 1);
    }

    #[test]
    fn test_init_is_idempotent() {
        let (store, _temp) = create_test_store();
        store.queue().enqueue(b"keep-me").unwrap();

        store.init().unwrap();
        store.init().unwrap();

        assert_eq!(store.queue().size().unwrap(), 1);
    }

    #[test]
    fn test_health_check() {
        let (store, _temp) = create_test_store();
        store.health_check().unwrap();
    }

    #[test]
    fn test_persist_and_close() {
        let (store, _temp) = create_test_store();
        store.visited().mark_visited(9).unwrap();
        store.persist().unwrap();
        store.close().unwrap();
    }
}
