//! Aggregation executor and group runner
//!
//! Runs catalog entries against the relational store and hands results to the
//! publisher. Every failure is contained here: a job that errors is logged
//! and skipped, its previous cache value stays in place, and its siblings
//! keep running. Nothing in this module may surface an error to the
//! scheduler loop.

use super::jobs::{JobSource, JobSpec, RefreshGroup, GROUPS};
use super::publisher::CachePublisher;
use crate::cache::CacheStore;
use crate::catalog::{self, CatalogKind};
use crate::db::{Database, RowSet};
use crate::{MeshboardError, Result};
use futures::future::join_all;
use std::sync::Arc;
use std::time::Duration;

pub struct RefreshEngine {
    db: Arc<dyn Database>,
    publisher: CachePublisher,
    /// Addresses precharged by the per-host server health job
    servers: Vec<String>,
    /// Upper bound on a single query; keeps a stuck statement from pinning a
    /// pool connection across ticks
    job_timeout: Duration,
}

impl RefreshEngine {
    pub fn new(
        db: Arc<dyn Database>,
        store: Arc<dyn CacheStore>,
        servers: Vec<String>,
        job_timeout: Duration,
    ) -> Self {
        Self {
            db,
            publisher: CachePublisher::new(store),
            servers,
            job_timeout,
        }
    }

    /// Run one catalog entry and return its rows.
    ///
    /// Unknown names resolve to the fallback query, so this never fails on a
    /// bad name — only on store errors.
    pub async fn execute(&self, kind: CatalogKind, job: &str) -> Result<RowSet> {
        self.execute_sql(catalog::query_for(kind, job)).await
    }

    async fn execute_sql(&self, sql: &str) -> Result<RowSet> {
        match tokio::time::timeout(self.job_timeout, self.db.fetch_rows(sql)).await {
            Ok(rows) => rows,
            Err(_) => Err(MeshboardError::QueryTimeout(self.job_timeout.as_secs())),
        }
    }

    /// Run one job, containing any failure
    pub async fn run_job(&self, spec: &JobSpec) {
        match spec.source {
            JobSource::Trend => {
                let sql = catalog::query_for(CatalogKind::Trend, spec.name);
                self.refresh_one(&spec.cache_key(), sql, spec).await;
            }
            JobSource::Latest => {
                let sql = catalog::query_for(CatalogKind::Latest, spec.name);
                self.refresh_one(&spec.cache_key(), sql, spec).await;
            }
            JobSource::Fixed(sql) => {
                self.refresh_one(&spec.cache_key(), sql, spec).await;
            }
            JobSource::EachServer => {
                for addr in &self.servers {
                    let key = format!("{}-{}", spec.name, addr);
                    let sql = catalog::server_health_query(addr);
                    self.refresh_one(&key, &sql, spec).await;
                }
            }
        }
    }

    async fn refresh_one(&self, key: &str, sql: &str, spec: &JobSpec) {
        if let Err(e) = self.try_refresh(key, sql, spec).await {
            // The prior payload under this key is deliberately left alone:
            // stale-but-present beats absent for the dashboards.
            tracing::warn!(
                job = spec.name,
                key = key,
                error = %e,
                "Refresh failed; previous cached value retained"
            );
        }
    }

    async fn try_refresh(&self, key: &str, sql: &str, spec: &JobSpec) -> Result<()> {
        let rows = self.execute_sql(sql).await?;
        let payload = self.publisher.publish(key, &rows, spec.ttl()).await?;

        if let Some(alias) = spec.alias {
            self.publisher.publish_alias(alias, &payload).await?;
        }

        Ok(())
    }

    /// Run one group: parallel jobs are spawned with a join point, the
    /// ordered tail is awaited strictly in sequence
    pub async fn run_group(self: Arc<Self>, group: &'static RefreshGroup) {
        tracing::debug!(group = group.name, "Refreshing group");

        let tasks: Vec<_> = group
            .parallel
            .iter()
            .map(|spec| {
                let engine = Arc::clone(&self);
                tokio::spawn(async move { engine.run_job(spec).await })
            })
            .collect();

        for spec in group.ordered {
            self.run_job(spec).await;
        }

        for task in join_all(tasks).await {
            if let Err(e) = task {
                tracing::error!(group = group.name, error = %e, "Refresh task panicked");
            }
        }

        tracing::debug!(group = group.name, "Group refresh complete");
    }

    /// One-time pass over every group, used at startup and by `refresh` runs
    pub async fn warm_start(self: Arc<Self>) {
        tracing::info!("Warm start: precharging all refresh groups");

        join_all(GROUPS.iter().map(|group| {
            let engine = Arc::clone(&self);
            async move { engine.run_group(group).await }
        }))
        .await;

        tracing::info!("Warm start complete");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MemoryCache;
    use crate::refresh::testutil::ScriptedDb;
    use std::sync::atomic::Ordering;

    fn engine_with(db: Arc<ScriptedDb>, cache: Arc<MemoryCache>) -> Arc<RefreshEngine> {
        Arc::new(RefreshEngine::new(
            db,
            cache,
            vec!["192.168.2.60".to_string()],
            Duration::from_secs(30),
        ))
    }

    #[tokio::test]
    async fn test_unknown_job_runs_fallback_without_failing() {
        let db = Arc::new(ScriptedDb::new());
        let cache = Arc::new(MemoryCache::new());
        let engine = engine_with(db.clone(), cache);

        let rows = engine
            .execute(CatalogKind::Trend, "definitely_not_a_job")
            .await
            .unwrap();

        assert!(!rows.is_empty());
        assert_eq!(db.statements(), vec![catalog::FALLBACK_QUERY.to_string()]);
    }

    #[tokio::test]
    async fn test_failed_refresh_keeps_previous_value() {
        let db = Arc::new(ScriptedDb::new());
        let cache = Arc::new(MemoryCache::new());
        let engine = engine_with(db.clone(), cache.clone());

        let spec = &GROUPS[0].parallel[0];
        engine.run_job(spec).await;
        let before = cache.get(&spec.cache_key()).await.unwrap().unwrap();

        db.fail_next.store(true, Ordering::SeqCst);
        engine.run_job(spec).await;

        let after = cache.get(&spec.cache_key()).await.unwrap().unwrap();
        assert_eq!(before, after);
    }

    #[tokio::test]
    async fn test_second_run_fully_replaces_payload() {
        let db = Arc::new(ScriptedDb::new());
        let cache = Arc::new(MemoryCache::new());
        let engine = engine_with(db, cache.clone());

        let spec = &GROUPS[0].parallel[0];
        engine.run_job(spec).await;
        engine.run_job(spec).await;

        let payload = cache.get(&spec.cache_key()).await.unwrap().unwrap();
        // Two runs over the same one-row source: still exactly one row, not
        // an accumulation.
        let rows: serde_json::Value = serde_json::from_str(&payload).unwrap();
        assert_eq!(rows.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_alias_published_with_identical_bytes() {
        let db = Arc::new(ScriptedDb::new());
        let cache = Arc::new(MemoryCache::new());
        let engine = engine_with(db, cache.clone());

        let spec = GROUPS[0]
            .parallel
            .iter()
            .find(|s| s.alias.is_some())
            .expect("an aliased job exists");
        engine.run_job(spec).await;

        let primary = cache.get(&spec.cache_key()).await.unwrap();
        let alias = cache.get(spec.alias.unwrap()).await.unwrap();
        assert!(primary.is_some());
        assert_eq!(primary, alias);
    }

    #[tokio::test]
    async fn test_each_server_expansion_writes_suffixed_keys() {
        let db = Arc::new(ScriptedDb::new());
        let cache = Arc::new(MemoryCache::new());
        let engine = engine_with(db.clone(), cache.clone());

        let spec = GROUPS[1]
            .parallel
            .iter()
            .find(|s| matches!(s.source, JobSource::EachServer))
            .unwrap();
        engine.run_job(spec).await;

        assert!(cache
            .get("server_health-192.168.2.60")
            .await
            .unwrap()
            .is_some());
        assert!(db.statements()[0].contains("a.ip = '192.168.2.60'"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_query_timeout_is_contained() {
        use crate::db::{Database, RowSet};
        use async_trait::async_trait;

        struct HungDb;

        #[async_trait]
        impl Database for HungDb {
            async fn fetch_rows(&self, _sql: &str) -> crate::Result<RowSet> {
                tokio::time::sleep(Duration::from_secs(600)).await;
                Ok(RowSet::new())
            }
        }

        let cache = Arc::new(MemoryCache::new());
        let engine = Arc::new(RefreshEngine::new(
            Arc::new(HungDb),
            cache.clone(),
            Vec::new(),
            Duration::from_secs(5),
        ));

        let spec = &GROUPS[2].parallel[0];
        // Must come back (timeout) instead of hanging, and publish nothing.
        engine.run_job(spec).await;
        assert!(cache.get(&spec.cache_key()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_warm_start_populates_every_key() {
        let db = Arc::new(ScriptedDb::new());
        let cache = Arc::new(MemoryCache::new());
        let engine = engine_with(db, cache.clone());

        engine.warm_start().await;

        for group in GROUPS {
            for job in group.jobs() {
                match job.source {
                    JobSource::EachServer => {
                        let key = format!("{}-192.168.2.60", job.name);
                        assert!(
                            cache.get(&key).await.unwrap().is_some(),
                            "missing key {}",
                            key
                        );
                    }
                    _ => {
                        assert!(
                            cache.get(&job.cache_key()).await.unwrap().is_some(),
                            "missing key {}",
                            job.cache_key()
                        );
                    }
                }
            }
        }
    }
}
