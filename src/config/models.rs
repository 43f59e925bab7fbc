use crate::humanize::{ByteSize, FileMode};
use fjall::PersistMode;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Top-level configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Store configuration, applied once when the store is opened
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StoreConfig {
    /// Directory holding the keyspace
    #[serde(default = "default_store_path")]
    pub path: PathBuf,
    /// Permissions for a newly created store (ignored when it already exists)
    #[serde(default)]
    pub mode: FileMode,
    /// How long `open` keeps retrying; unset means a single attempt
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub open_timeout_ms: Option<u64>,
    /// When a committed write is considered durable
    #[serde(default)]
    pub durability: Durability,
    /// Block cache size
    #[serde(default = "default_cache_size")]
    pub cache_size: ByteSize,
    /// Memtable budget across all partitions
    #[serde(default = "default_max_write_buffer_size")]
    pub max_write_buffer_size: ByteSize,
    /// Background journal fsync interval; unset leaves it to Fjall
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fsync_ms: Option<u16>,
}

impl StoreConfig {
    /// Default settings for a store at `path`
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    pub fn open_timeout(&self) -> Option<Duration> {
        self.open_timeout_ms.map(Duration::from_millis)
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: default_store_path(),
            mode: FileMode::default(),
            open_timeout_ms: None,
            durability: Durability::default(),
            cache_size: default_cache_size(),
            max_write_buffer_size: default_max_write_buffer_size(),
            fsync_ms: None,
        }
    }
}

fn default_store_path() -> PathBuf {
    PathBuf::from("data/crawlstore")
}

fn default_cache_size() -> ByteSize {
    ByteSize(32 * 1024 * 1024) // 32 MB
}

fn default_max_write_buffer_size() -> ByteSize {
    ByteSize(64 * 1024 * 1024) // 64 MB
}

/// Commit durability
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Durability {
    /// Commit returns once the journal reaches OS buffers
    Buffer,
    /// Commit fsyncs journal data
    SyncData,
    /// Commit fsyncs journal data and metadata
    #[default]
    SyncAll,
}

impl Durability {
    pub fn persist_mode(self) -> Option<PersistMode> {
        match self {
            Durability::Buffer => None,
            Durability::SyncData => Some(PersistMode::SyncData),
            Durability::SyncAll => Some(PersistMode::SyncAll),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Compact,
    Json,
}
