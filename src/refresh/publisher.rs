//! Cache publisher
//!
//! Serializes a complete result-set snapshot and overwrites the target key.
//! No merge, no versioning: the last writer wins, and readers always observe
//! either the old payload or the new one, never a partial write. A TTL, when
//! present, lands in the same cache operation as the value.

use crate::cache::CacheStore;
use crate::db::RowSet;
use crate::Result;
use std::sync::Arc;
use std::time::Duration;

pub struct CachePublisher {
    store: Arc<dyn CacheStore>,
}

impl CachePublisher {
    pub fn new(store: Arc<dyn CacheStore>) -> Self {
        Self { store }
    }

    /// Publish a result set under a key, returning the serialized payload so
    /// aliases can republish the identical bytes
    pub async fn publish(
        &self,
        key: &str,
        rows: &RowSet,
        ttl: Option<Duration>,
    ) -> Result<String> {
        let payload = serde_json::to_string(rows)?;

        match ttl {
            Some(ttl) => self.store.set_with_ttl(key, &payload, ttl).await?,
            None => self.store.set(key, &payload).await?,
        }

        tracing::debug!(key = key, rows = rows.len(), "Published result set");
        Ok(payload)
    }

    /// Republish an already-serialized payload under a secondary key
    pub async fn publish_alias(&self, alias: &str, payload: &str) -> Result<()> {
        self.store.set(alias, payload).await?;
        tracing::debug!(key = alias, "Published alias");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MemoryCache;
    use crate::db::Row;

    fn sample_rows() -> RowSet {
        let mut row = Row::new();
        row.insert("ip".to_string(), serde_json::json!("10.20.0.1"));
        row.insert("latency_ms".to_string(), serde_json::json!(42));
        vec![row]
    }

    #[tokio::test]
    async fn test_publish_serializes_whole_snapshot() {
        let cache = Arc::new(MemoryCache::new());
        let publisher = CachePublisher::new(cache.clone());

        publisher.publish("latency", &sample_rows(), None).await.unwrap();

        let stored = cache.get("latency").await.unwrap().unwrap();
        assert_eq!(stored, r#"[{"ip":"10.20.0.1","latency_ms":42}]"#);
    }

    #[tokio::test]
    async fn test_empty_result_set_publishes_as_empty_array() {
        let cache = Arc::new(MemoryCache::new());
        let publisher = CachePublisher::new(cache.clone());

        publisher.publish("latency", &RowSet::new(), None).await.unwrap();

        assert_eq!(cache.get("latency").await.unwrap().as_deref(), Some("[]"));
    }

    #[tokio::test]
    async fn test_alias_is_byte_identical() {
        let cache = Arc::new(MemoryCache::new());
        let publisher = CachePublisher::new(cache.clone());

        let payload = publisher
            .publish("kpidashboard-signal_quality", &sample_rows(), None)
            .await
            .unwrap();
        publisher
            .publish_alias("kpidashboard-snr_latest", &payload)
            .await
            .unwrap();

        let primary = cache.get("kpidashboard-signal_quality").await.unwrap();
        let alias = cache.get("kpidashboard-snr_latest").await.unwrap();
        assert_eq!(primary, alias);
        assert!(primary.is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_publish_with_ttl_expires() {
        let cache = Arc::new(MemoryCache::new());
        let publisher = CachePublisher::new(cache.clone());

        publisher
            .publish("latency", &sample_rows(), Some(Duration::from_secs(3600)))
            .await
            .unwrap();

        tokio::time::advance(Duration::from_secs(3601)).await;
        assert_eq!(cache.get("latency").await.unwrap(), None);
    }
}
