//! The refresh engine
//!
//! Heart of the service: the scheduler fires every minute, checks which
//! minute-of-hour buckets are due, and triggers the matching groups. Each
//! group's jobs run the executor (catalog query against the store) and the
//! publisher (snapshot overwrite into the cache). A warm-start pass runs all
//! groups once at startup so readers never see an empty cache for long.

pub mod engine;
pub mod jobs;
pub mod publisher;
pub mod scheduler;

pub use engine::RefreshEngine;
pub use jobs::{due_groups, group_by_name, JobSource, JobSpec, RefreshGroup, GROUPS};
pub use publisher::CachePublisher;
pub use scheduler::{RefreshCommand, RefreshEvent, RefreshScheduler, SchedulerConfig};

#[cfg(test)]
pub(crate) mod testutil {
    use crate::db::{Database, Row, RowSet};
    use crate::{MeshboardError, Result};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Mutex;

    /// Scripted store double: records every statement, optionally fails
    #[derive(Default)]
    pub struct ScriptedDb {
        pub fail_next: AtomicBool,
        pub statements: Mutex<Vec<String>>,
    }

    impl ScriptedDb {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn statements(&self) -> Vec<String> {
            self.statements.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Database for ScriptedDb {
        async fn fetch_rows(&self, sql: &str) -> Result<RowSet> {
            self.statements.lock().unwrap().push(sql.to_string());
            if self.fail_next.swap(false, Ordering::SeqCst) {
                return Err(MeshboardError::Other("injected store failure".to_string()));
            }
            let mut row = Row::new();
            row.insert("ip".to_string(), serde_json::json!("10.20.0.1"));
            row.insert("name".to_string(), serde_json::json!("relay-01"));
            Ok(vec![row])
        }
    }
}
