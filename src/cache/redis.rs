//! Redis implementation of the `CacheStore` trait

use super::CacheStore;
use crate::config::CacheServiceConfig;
use crate::Result;
use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use std::time::Duration;

/// Redis-backed cache, constructed once at startup and shared by every job
///
/// The connection manager multiplexes one connection and reconnects on
/// failure; cloning it is cheap, so each call works on its own handle.
pub struct RedisCache {
    manager: ConnectionManager,
}

impl RedisCache {
    /// Connect to the cache service
    pub async fn connect(config: &CacheServiceConfig) -> Result<Self> {
        let client = redis::Client::open(config.url())?;
        let manager = client.get_connection_manager().await?;

        tracing::info!(
            host = %config.host,
            port = config.port,
            "Connected to cache service"
        );

        Ok(Self { manager })
    }
}

#[async_trait]
impl CacheStore for RedisCache {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let mut conn = self.manager.clone();
        Ok(conn.get(key).await?)
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut conn = self.manager.clone();
        conn.set::<_, _, ()>(key, value).await?;
        Ok(())
    }

    async fn set_with_ttl(&self, key: &str, value: &str, ttl: Duration) -> Result<()> {
        // SETEX writes value and expiry in one command, so no window exists
        // where the key is present without its TTL.
        let mut conn = self.manager.clone();
        conn.set_ex::<_, _, ()>(key, value, ttl.as_secs()).await?;
        Ok(())
    }
}
