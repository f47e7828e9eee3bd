//! Key-value cache backends
//!
//! Published result sets live in a process-external cache so that HTTP
//! readers never touch the relational store. Backends implement
//! [`CacheStore`]: Redis in production, an in-memory map for tests and
//! cache-less development. Writes are unconditional overwrites and a TTL,
//! when present, is applied atomically with the value.

mod memory;
mod redis;

pub use memory::MemoryCache;
pub use redis::RedisCache;

use crate::Result;
use async_trait::async_trait;
use std::time::Duration;

/// Key-value access with optional expiry
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Fetch the payload under a key, or None if absent or expired
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Overwrite a key with no expiry
    async fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Overwrite a key and apply the expiry in the same operation
    async fn set_with_ttl(&self, key: &str, value: &str, ttl: Duration) -> Result<()>;
}
