//! Error types for meshboard
//!
//! Defines a comprehensive error enum covering all failure modes across the system.
//! Uses thiserror for ergonomic error handling.

use thiserror::Error;

/// Result type alias for meshboard operations
pub type Result<T> = std::result::Result<T, MeshboardError>;

/// Comprehensive error type for meshboard operations
#[derive(Error, Debug)]
pub enum MeshboardError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Relational store query errors
    #[error("Query error: {0}")]
    Query(#[from] sqlx::Error),

    /// A query exceeded the per-job timeout
    #[error("Query timed out after {0} seconds")]
    QueryTimeout(u64),

    /// Cache service errors
    #[error("Cache error: {0}")]
    Cache(#[from] redis::RedisError),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A refresh group name that is not in the schedule
    #[error("Unknown refresh group: {0}")]
    UnknownGroup(String),

    /// Other errors
    #[error("{0}")]
    Other(String),

    /// Anyhow errors (for more context)
    #[error("{0}")]
    Anyhow(#[from] anyhow::Error),
}
