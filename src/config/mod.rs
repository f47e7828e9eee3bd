//! Configuration system
//!
//! Loads ~/.config/meshboard/config.yaml with settings for:
//! - Relational store connection (host, user, password, database, pool size)
//! - Cache service connection (host, port)
//! - HTTP bind address
//! - Refresh schedule tuning (tick interval, warm-start delay, job timeout)
//! - Monitored server addresses for per-host health precharge

mod settings;

pub use settings::{
    CacheServiceConfig, HttpConfig, MeshboardConfig, MySqlConfig, RefreshConfig,
};
