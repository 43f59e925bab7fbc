//! Integration tests for crawlstore
//!
//! Every test opens a real on-disk store in its own temporary directory.

use std::collections::HashSet;
use std::sync::Arc;
use std::thread;

use crawlstore::config::{Durability, StoreConfig};
use crawlstore::{CrawlStore, RequestQueue, StorageError, Storage};
use tempfile::TempDir;

/// Opens a store in a fresh temporary directory
fn create_test_store() -> (CrawlStore, TempDir) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let store = CrawlStore::open(&StoreConfig::at(temp_dir.path().join("crawl")))
        .expect("Failed to open test store");
    (store, temp_dir)
}

#[test]
fn test_queue_scenario() {
    let (store, _temp) = create_test_store();

    store.enqueue(b"req-1").unwrap();
    store.enqueue(b"req-2").unwrap();
    assert_eq!(store.size().unwrap(), 2);

    assert_eq!(store.dequeue().unwrap(), b"req-1");
    assert_eq!(store.size().unwrap(), 1);

    assert_eq!(store.dequeue().unwrap(), b"req-2");
    assert_eq!(store.size().unwrap(), 0);

    assert!(matches!(store.dequeue(), Err(StorageError::EmptyQueue)));
}

#[test]
fn test_visited_scenario() {
    let (store, _temp) = create_test_store();

    store.mark_visited(42).unwrap();

    assert!(store.is_visited(42).unwrap());
    assert!(!store.is_visited(7).unwrap());
}

#[test]
fn test_strict_fifo_and_size_tracking() {
    let (store, _temp) = create_test_store();
    let items: Vec<Vec<u8>> = (0..50).map(|i| format!("item-{i}").into_bytes()).collect();

    let mut expected_size = 0u64;
    for item in &items {
        store.enqueue(item).unwrap();
        expected_size += 1;
        assert_eq!(store.size().unwrap(), expected_size);
    }

    for item in &items {
        assert_eq!(&store.dequeue().unwrap(), item);
        expected_size -= 1;
        assert_eq!(store.size().unwrap(), expected_size);
    }

    assert!(store.dequeue().unwrap_err().is_empty_queue());
}

#[test]
fn test_interleaved_enqueue_dequeue() {
    let (store, _temp) = create_test_store();

    store.enqueue(b"a").unwrap();
    store.enqueue(b"b").unwrap();
    assert_eq!(store.dequeue().unwrap(), b"a");
    store.enqueue(b"c").unwrap();
    assert_eq!(store.dequeue().unwrap(), b"b");
    assert_eq!(store.dequeue().unwrap(), b"c");
    assert!(store.dequeue().unwrap_err().is_empty_queue());
}

#[test]
fn test_cookies_roundtrip_and_default() {
    let (store, _temp) = create_test_store();

    assert_eq!(store.get_cookies("https://example.com/"), "");

    store.set_cookies("https://example.com/", "session=1");
    assert_eq!(store.get_cookies("https://example.com/"), "session=1");
    assert_eq!(store.get_cookies("https://other.example/"), "");
}

#[test]
fn test_reinit_keeps_data() {
    let (store, _temp) = create_test_store();

    store.mark_visited(1).unwrap();
    store.set_cookies("https://example.com/", "a=1");
    store.enqueue(b"pending").unwrap();

    Storage::init(&store).unwrap();
    Storage::init(&store).unwrap();

    assert!(store.is_visited(1).unwrap());
    assert_eq!(store.get_cookies("https://example.com/"), "a=1");
    assert_eq!(store.size().unwrap(), 1);
}

#[test]
fn test_partitions_are_independent() {
    let (store, _temp) = create_test_store();

    // Same 8-byte key in two partitions
    store.mark_visited(1).unwrap();
    assert_eq!(store.size().unwrap(), 0);

    let seq = store.queue().enqueue(b"first").unwrap();
    assert_eq!(seq, 1);
    assert!(!store.is_visited(2).unwrap());

    store.dequeue().unwrap();
    assert!(store.is_visited(1).unwrap());
}

#[test]
fn test_persistence_across_reopens() {
    let temp_dir = TempDir::new().unwrap();
    let config = StoreConfig::at(temp_dir.path().join("crawl"));

    {
        let store = CrawlStore::open(&config).unwrap();
        store.mark_visited(7).unwrap();
        store.set_cookies("https://example.com/", "sid=xyz");
        store.enqueue(b"one").unwrap();
        store.enqueue(b"two").unwrap();
        store.enqueue(b"three").unwrap();
        assert_eq!(store.dequeue().unwrap(), b"one");
        store.close().unwrap();
    }

    let store = CrawlStore::open(&config).unwrap();
    assert!(store.is_visited(7).unwrap());
    assert_eq!(store.get_cookies("https://example.com/"), "sid=xyz");
    assert_eq!(store.size().unwrap(), 2);
    assert_eq!(store.queue().last_sequence().unwrap(), 3);

    // Sequence continues where it left off
    assert_eq!(store.queue().enqueue(b"four").unwrap(), 4);

    assert_eq!(store.dequeue().unwrap(), b"two");
    assert_eq!(store.dequeue().unwrap(), b"three");
    assert_eq!(store.dequeue().unwrap(), b"four");
}

#[test]
fn test_sequence_not_reused_after_drain_and_reopen() {
    let temp_dir = TempDir::new().unwrap();
    let config = StoreConfig::at(temp_dir.path().join("crawl"));

    {
        let store = CrawlStore::open(&config).unwrap();
        store.enqueue(b"a").unwrap();
        store.enqueue(b"b").unwrap();
        store.dequeue().unwrap();
        store.dequeue().unwrap();
        store.close().unwrap();
    }

    let store = CrawlStore::open(&config).unwrap();
    assert_eq!(store.size().unwrap(), 0);
    assert_eq!(store.queue().enqueue(b"c").unwrap(), 3);
}

#[test]
fn test_buffered_durability_still_works() {
    let temp_dir = TempDir::new().unwrap();
    let mut config = StoreConfig::at(temp_dir.path().join("crawl"));
    config.durability = Durability::Buffer;

    let store = CrawlStore::open(&config).unwrap();
    store.enqueue(b"x").unwrap();
    assert_eq!(store.dequeue().unwrap(), b"x");
}

#[test]
fn test_open_with_timeout_succeeds() {
    let temp_dir = TempDir::new().unwrap();
    let mut config = StoreConfig::at(temp_dir.path().join("crawl"));
    config.open_timeout_ms = Some(500);

    let store = CrawlStore::open(&config).unwrap();
    store.mark_visited(3).unwrap();
    assert!(store.is_visited(3).unwrap());
}

#[test]
fn test_concurrent_enqueue_assigns_distinct_sequences() {
    let (store, _temp) = create_test_store();
    let store = Arc::new(store);

    let handles: Vec<_> = (0..4)
        .map(|worker| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                (0..25)
                    .map(|i| {
                        let payload = format!("w{worker}-{i}");
                        store.queue().enqueue(payload.as_bytes()).unwrap()
                    })
                    .collect::<Vec<u64>>()
            })
        })
        .collect();

    let mut seqs = HashSet::new();
    for handle in handles {
        for seq in handle.join().unwrap() {
            assert!(seqs.insert(seq), "sequence {seq} issued twice");
        }
    }

    assert_eq!(seqs.len(), 100);
    assert_eq!(seqs.iter().copied().min(), Some(1));
    assert_eq!(seqs.iter().copied().max(), Some(100));
    assert_eq!(store.size().unwrap(), 100);
}

#[test]
fn test_per_producer_order_preserved_under_concurrency() {
    let (store, _temp) = create_test_store();
    let store = Arc::new(store);

    let handles: Vec<_> = (0..3)
        .map(|worker| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                for i in 0..20u32 {
                    store.enqueue(format!("{worker}:{i}").as_bytes()).unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let mut last_seen = [None::<u32>; 3];
    while let Ok(item) = store.dequeue() {
        let text = String::from_utf8(item).unwrap();
        let (worker, i) = text.split_once(':').unwrap();
        let worker: usize = worker.parse().unwrap();
        let i: u32 = i.parse().unwrap();

        if let Some(prev) = last_seen[worker] {
            assert!(i > prev, "worker {worker} items out of order");
        }
        last_seen[worker] = Some(i);
    }

    assert_eq!(last_seen, [Some(19); 3]);
}

#[test]
fn test_concurrent_dequeue_is_exactly_once() {
    let (store, _temp) = create_test_store();
    for i in 0..200u32 {
        store.enqueue(&i.to_be_bytes()).unwrap();
    }
    let store = Arc::new(store);

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                let mut taken = Vec::new();
                loop {
                    match store.dequeue() {
                        Ok(item) => taken.push(item),
                        Err(e) if e.is_empty_queue() => break,
                        Err(e) => panic!("unexpected error: {e}"),
                    }
                }
                taken
            })
        })
        .collect();

    let mut seen = HashSet::new();
    for handle in handles {
        for item in handle.join().unwrap() {
            assert!(seen.insert(item), "item dequeued twice");
        }
    }

    assert_eq!(seen.len(), 200);
    assert_eq!(store.size().unwrap(), 0);
}

#[test]
fn test_independent_stores_in_one_process() {
    let (first, _temp_a) = create_test_store();
    let (second, _temp_b) = create_test_store();

    first.mark_visited(5).unwrap();
    first.enqueue(b"only-in-first").unwrap();

    assert!(!second.is_visited(5).unwrap());
    assert_eq!(second.size().unwrap(), 0);
    assert_eq!(first.size().unwrap(), 1);
}

#[test]
fn test_stats_track_metrics() {
    let (store, _temp) = create_test_store();

    store.enqueue(b"a").unwrap();
    store.dequeue().unwrap();
    let _ = store.dequeue();
    store.mark_visited(1).unwrap();

    let stats = store.stats().unwrap();
    assert_eq!(stats.metrics.enqueued, 1);
    assert_eq!(stats.metrics.dequeued, 1);
    assert_eq!(stats.metrics.empty_polls, 1);
    assert_eq!(stats.metrics.visited_marked, 1);
    assert_eq!(stats.last_sequence, 1);
}
