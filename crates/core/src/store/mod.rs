//! Option and transient storage.
//!
//! Two small key/value contracts stand in for the host platform's option
//! table and its expiring "transient" cache:
//!
//! - [`OptionStore`] keeps admin settings until they are deleted.
//! - [`TransientStore`] keeps a value until its TTL elapses.
//!
//! Both are implemented by the SQLite-backed [`CacheDb`] and by the
//! process-local [`MemoryStore`]. Values are JSON.

pub mod clock;
pub mod connection;
pub mod memory;
pub mod migrations;
pub mod options;
pub mod transients;

use async_trait::async_trait;
use serde_json::Value;

pub use crate::Error;

pub use clock::{Clock, ManualClock, SystemClock};
pub use connection::CacheDb;
pub use memory::MemoryStore;

/// Persistent key/value options.
#[async_trait]
pub trait OptionStore: Send + Sync {
    /// Read an option; `None` when it was never set or has been deleted.
    async fn get_option(&self, key: &str) -> Result<Option<Value>, Error>;

    /// Insert or replace an option.
    async fn set_option(&self, key: &str, value: &Value) -> Result<(), Error>;

    /// Delete an option. Returns whether it existed.
    async fn delete_option(&self, key: &str) -> Result<bool, Error>;
}

/// Key/value cache entries with a time-to-live.
#[async_trait]
pub trait TransientStore: Send + Sync {
    /// Read an entry; `None` when missing or expired.
    async fn get_transient(&self, key: &str) -> Result<Option<Value>, Error>;

    /// Insert or replace an entry that expires `ttl_seconds` from now.
    async fn set_transient(&self, key: &str, value: &Value, ttl_seconds: i64) -> Result<(), Error>;

    /// Delete an entry. Returns whether it existed (expired entries count).
    async fn delete_transient(&self, key: &str) -> Result<bool, Error>;
}
