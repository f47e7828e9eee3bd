//! Meshboard - Telemetry Aggregation and Cache Precharge Service
//!
//! Meshboard sits between a relational store of mesh-network telemetry
//! (device latency, signal quality, sensor readings, GPS location, server
//! health) and read-heavy HTTP dashboard consumers. A minute-of-hour bucket
//! scheduler periodically re-runs a fixed catalog of aggregation queries and
//! republishes the results into a key-value cache, so request handlers only
//! ever read precomputed keys.
//!
//! # Architecture
//!
//! - **catalog**: The query catalog (trend and latest KPI variants, fixed jobs)
//! - **db**: Relational store access behind the `Database` trait
//! - **cache**: Key-value cache backends behind the `CacheStore` trait
//! - **refresh**: Executor, publisher and the bucket scheduler daemon
//! - **web**: Read-only HTTP layer serving cached payloads verbatim
//! - **config**: YAML configuration for store, cache, HTTP and schedule

// Core modules
pub mod cache;
pub mod catalog;
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod refresh;
pub mod web;

// Re-exports
pub use error::{MeshboardError, Result};
