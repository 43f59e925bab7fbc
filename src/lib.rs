pub mod config;
pub mod cookies;
pub mod humanize;
pub mod observability;
pub mod queue;
pub mod store;
pub mod traits;
pub mod visited;

pub use cookies::CookieCache;
pub use queue::FifoQueue;
pub use store::{CrawlStore, StorageError, StoreHandle, StoreStats};
pub use traits::{RequestQueue, Storage};
pub use visited::VisitedSet;
