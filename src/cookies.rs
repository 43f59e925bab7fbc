//! Per-origin cookie cache
//!
//! Two flavours of every operation exist. `try_get_cookies` and
//! `try_set_cookies` report store failures like every other operation in the
//! crate. `get_cookies` and `set_cookies` are tolerant: crawlers treat session
//! state as best-effort, so a failed read looks like "no cookies" and a failed
//! write is dropped. Tolerated failures are logged and counted in
//! `Metrics::cookie_errors`.

use fjall::TxPartitionHandle;
use tracing::{debug, warn};

use crate::observability::Metrics;
use crate::store::partitions::encode_cookie_key;
use crate::store::{Result, StoreHandle};

/// Maps an origin string to its serialized cookie jar, last write wins
///
/// Origins are used verbatim as keys; normalizing them is the caller's job.
#[derive(Clone)]
pub struct CookieCache {
    handle: StoreHandle,
    cookies: TxPartitionHandle,
}

impl CookieCache {
    pub fn new(handle: StoreHandle, cookies: TxPartitionHandle) -> Self {
        Self { handle, cookies }
    }

    /// Cookies stored for `origin`, `None` if nothing was ever stored
    pub fn try_get_cookies(&self, origin: &str) -> Result<Option<String>> {
        self.handle.metrics().cookie_read();
        self.handle.view(|tx| {
            let value = tx.get(&self.cookies, encode_cookie_key(origin))?;
            Ok(value.map(|bytes| String::from_utf8_lossy(&bytes).into_owned()))
        })
    }

    /// Store `value` for `origin`, replacing anything stored before
    pub fn try_set_cookies(&self, origin: &str, value: &str) -> Result<()> {
        self.handle.update(|tx| {
            tx.insert(&self.cookies, encode_cookie_key(origin), value.as_bytes());
            Ok(())
        })?;
        self.handle.metrics().cookie_written();
        debug!(origin, len = value.len(), "Stored cookies");
        Ok(())
    }

    /// Cookies for `origin`, or an empty string when absent or unreadable
    pub fn get_cookies(&self, origin: &str) -> String {
        tolerate_read(self.try_get_cookies(origin), origin, self.handle.metrics())
    }

    /// Store cookies for `origin`, dropping the write if the store fails
    pub fn set_cookies(&self, origin: &str, value: &str) {
        tolerate_write(self.try_set_cookies(origin, value), origin, self.handle.metrics())
    }

    pub(crate) fn partition(&self) -> &TxPartitionHandle {
        &self.cookies
    }
}

/// Degrade a cookie read: missing and failed both become ""
fn tolerate_read(result: Result<Option<String>>, origin: &str, metrics: &Metrics) -> String {
    match result {
        Ok(cookies) => cookies.unwrap_or_default(),
        Err(e) => {
            metrics.cookie_error();
            warn!(origin, error = %e, "Cookie read failed, treating as no cookies");
            String::new()
        }
    }
}

/// Degrade a cookie write: a failure is logged and dropped
fn tolerate_write(result: Result<()>, origin: &str, metrics: &Metrics) {
    if let Err(e) = result {
        metrics.cookie_error();
        warn!(origin, error = %e, "Cookie write failed, dropping it");
    }
}
