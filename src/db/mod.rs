//! Relational store access
//!
//! The refresh engine only ever reads: every statement is an aggregation
//! query produced by the catalog. Access goes through the [`Database`] trait
//! so the engine can be exercised against substitute stores in tests; the
//! production implementation is a bounded sqlx MySQL pool shared by every
//! job.

mod mysql;

pub use mysql::MySqlDatabase;

use crate::Result;
use async_trait::async_trait;

/// One result row: column name to scalar, in select order
pub type Row = serde_json::Map<String, serde_json::Value>;

/// An ordered result set
pub type RowSet = Vec<Row>;

/// Read-only query execution against the telemetry store
#[async_trait]
pub trait Database: Send + Sync {
    /// Run one aggregation statement and return its rows in query order
    async fn fetch_rows(&self, sql: &str) -> Result<RowSet>;
}
