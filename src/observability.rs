//! Logging setup and in-process counters

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;
use tracing_subscriber::EnvFilter;

use crate::config::{LogFormat, LoggingConfig};

/// Counters recorded by the store components
#[derive(Debug, Default)]
pub struct Metrics {
    visited_marked: AtomicU64,
    enqueued: AtomicU64,
    dequeued: AtomicU64,
    empty_polls: AtomicU64,
    cookie_reads: AtomicU64,
    cookie_writes: AtomicU64,
    cookie_errors: AtomicU64,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn visited_marked(&self) {
        self.visited_marked.fetch_add(1, Ordering::Relaxed);
    }

    pub fn enqueued(&self) {
        self.enqueued.fetch_add(1, Ordering::Relaxed);
    }

    pub fn dequeued(&self) {
        self.dequeued.fetch_add(1, Ordering::Relaxed);
    }

    pub fn empty_poll(&self) {
        self.empty_polls.fetch_add(1, Ordering::Relaxed);
    }

    pub fn cookie_read(&self) {
        self.cookie_reads.fetch_add(1, Ordering::Relaxed);
    }

    pub fn cookie_written(&self) {
        self.cookie_writes.fetch_add(1, Ordering::Relaxed);
    }

    /// A cookie failure was swallowed by the tolerant cookie API
    pub fn cookie_error(&self) {
        self.cookie_errors.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(counter = "cookie_errors", "Metric incremented");
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            visited_marked: self.visited_marked.load(Ordering::Relaxed),
            enqueued: self.enqueued.load(Ordering::Relaxed),
            dequeued: self.dequeued.load(Ordering::Relaxed),
            empty_polls: self.empty_polls.load(Ordering::Relaxed),
            cookie_reads: self.cookie_reads.load(Ordering::Relaxed),
            cookie_writes: self.cookie_writes.load(Ordering::Relaxed),
            cookie_errors: self.cookie_errors.load(Ordering::Relaxed),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub visited_marked: u64,
    pub enqueued: u64,
    pub dequeued: u64,
    pub empty_polls: u64,
    pub cookie_reads: u64,
    pub cookie_writes: u64,
    pub cookie_errors: u64,
}

/// Install the global tracing subscriber
///
/// `RUST_LOG` takes precedence over the configured level. Only binaries call
/// this; the library never installs a subscriber on its own, so it stays
/// silent unless the embedding program asks for output.
pub fn init_logging(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    let result = match config.format {
        LogFormat::Pretty => builder.pretty().try_init(),
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Json => builder.json().try_init(),
    };

    if let Err(e) = result {
        tracing::warn!(error = %e, "Tracing subscriber already installed");
    }
}
