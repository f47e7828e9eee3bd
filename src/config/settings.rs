//! Meshboard configuration file handling
//!
//! Loads and manages the ~/.config/meshboard/config.yaml file.

use crate::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Relational store connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MySqlConfig {
    /// Database host
    pub host: String,

    /// Database port
    #[serde(default = "default_mysql_port")]
    pub port: u16,

    /// Database user
    pub user: String,

    /// Database password
    pub password: String,

    /// Database name
    pub database: String,

    /// Maximum concurrent connections in the pool; excess acquisitions queue
    #[serde(default = "default_pool_size")]
    pub pool_size: u32,
}

fn default_mysql_port() -> u16 {
    3306
}

fn default_pool_size() -> u32 {
    20
}

impl Default for MySqlConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: default_mysql_port(),
            user: "meshboard".to_string(),
            password: String::new(),
            database: "telemetry".to_string(),
            pool_size: default_pool_size(),
        }
    }
}

impl MySqlConfig {
    /// Connection URL for the pool
    pub fn url(&self) -> String {
        format!(
            "mysql://{}:{}@{}:{}/{}",
            self.user, self.password, self.host, self.port, self.database
        )
    }
}

/// Cache service connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheServiceConfig {
    /// Cache host
    #[serde(default = "default_cache_host")]
    pub host: String,

    /// Cache port
    #[serde(default = "default_cache_port")]
    pub port: u16,
}

fn default_cache_host() -> String {
    "127.0.0.1".to_string()
}

fn default_cache_port() -> u16 {
    6379
}

impl Default for CacheServiceConfig {
    fn default() -> Self {
        Self {
            host: default_cache_host(),
            port: default_cache_port(),
        }
    }
}

impl CacheServiceConfig {
    /// Connection URL for the cache client
    pub fn url(&self) -> String {
        format!("redis://{}:{}/", self.host, self.port)
    }
}

/// HTTP read-layer settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Bind address for the read-only API
    #[serde(default = "default_bind")]
    pub bind: String,
}

fn default_bind() -> String {
    "0.0.0.0:4159".to_string()
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

/// Refresh schedule tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshConfig {
    /// Scheduler tick interval in seconds
    #[serde(default = "default_tick_secs")]
    pub tick_secs: u64,

    /// Delay before the one-time warm-start pass, in milliseconds
    #[serde(default = "default_warm_start_delay_ms")]
    pub warm_start_delay_ms: u64,

    /// Per-job query timeout in seconds; must stay under the tick interval
    #[serde(default = "default_job_timeout_secs")]
    pub job_timeout_secs: u64,
}

fn default_tick_secs() -> u64 {
    60
}

fn default_warm_start_delay_ms() -> u64 {
    100
}

fn default_job_timeout_secs() -> u64 {
    30
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            tick_secs: default_tick_secs(),
            warm_start_delay_ms: default_warm_start_delay_ms(),
            job_timeout_secs: default_job_timeout_secs(),
        }
    }
}

impl RefreshConfig {
    /// Tick interval as a Duration
    pub fn tick(&self) -> Duration {
        Duration::from_secs(self.tick_secs)
    }

    /// Warm-start delay as a Duration
    pub fn warm_start_delay(&self) -> Duration {
        Duration::from_millis(self.warm_start_delay_ms)
    }

    /// Per-job timeout as a Duration
    pub fn job_timeout(&self) -> Duration {
        Duration::from_secs(self.job_timeout_secs)
    }
}

/// Meshboard configuration
///
/// Represents the complete ~/.config/meshboard/config.yaml file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MeshboardConfig {
    /// Relational store connection
    #[serde(default)]
    pub mysql: MySqlConfig,

    /// Cache service connection
    #[serde(default)]
    pub cache: CacheServiceConfig,

    /// HTTP read layer
    #[serde(default)]
    pub http: HttpConfig,

    /// Refresh schedule tuning
    #[serde(default)]
    pub refresh: RefreshConfig,

    /// Server addresses precharged by the per-host health job
    #[serde(default)]
    pub servers: Vec<String>,
}

impl MeshboardConfig {
    /// Default config file path (~/.config/meshboard/config.yaml)
    pub fn default_path() -> PathBuf {
        let mut path = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push(".config");
        path.push("meshboard");
        path.push("config.yaml");
        path
    }

    /// Load configuration from the default path
    pub fn load_default() -> Result<Self> {
        Self::load(Self::default_path())
    }

    /// Load configuration from a specific path
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;
        let config: Self = serde_yaml::from_str(&contents)?;
        config.validate()?;

        tracing::info!(
            path = %path.display(),
            servers = config.servers.len(),
            "Configuration loaded successfully"
        );

        Ok(config)
    }

    /// Save configuration to a specific path, creating parent directories
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let contents = serde_yaml::to_string(self)?;
        fs::write(path, contents)?;
        Ok(())
    }

    /// Validate the configuration, failing fast on unusable values
    pub fn validate(&self) -> Result<()> {
        if self.mysql.host.is_empty() {
            return Err(crate::MeshboardError::Config(
                "mysql.host must not be empty".to_string(),
            ));
        }
        if self.mysql.database.is_empty() {
            return Err(crate::MeshboardError::Config(
                "mysql.database must not be empty".to_string(),
            ));
        }
        if self.mysql.pool_size == 0 {
            return Err(crate::MeshboardError::Config(
                "mysql.pool_size must be at least 1".to_string(),
            ));
        }
        if self.refresh.tick_secs == 0 {
            return Err(crate::MeshboardError::Config(
                "refresh.tick_secs must be at least 1".to_string(),
            ));
        }
        if self.http.bind.parse::<std::net::SocketAddr>().is_err() {
            return Err(crate::MeshboardError::Config(format!(
                "http.bind is not a valid socket address: {}",
                self.http.bind
            )));
        }
        if self.refresh.job_timeout_secs >= self.refresh.tick_secs {
            tracing::warn!(
                job_timeout_secs = self.refresh.job_timeout_secs,
                tick_secs = self.refresh.tick_secs,
                "Job timeout is not below the tick interval; stuck queries may overlap ticks"
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = MeshboardConfig::default();
        assert_eq!(config.mysql.port, 3306);
        assert_eq!(config.mysql.pool_size, 20);
        assert_eq!(config.cache.port, 6379);
        assert_eq!(config.refresh.tick_secs, 60);
        assert!(config.servers.is_empty());
    }

    #[test]
    fn test_urls() {
        let config = MeshboardConfig::default();
        assert!(config.mysql.url().starts_with("mysql://meshboard:@127.0.0.1:3306/"));
        assert_eq!(config.cache.url(), "redis://127.0.0.1:6379/");
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.yaml");

        let mut config = MeshboardConfig::default();
        config.servers.push("192.168.2.60".to_string());
        config.save(&path).unwrap();

        let loaded = MeshboardConfig::load(&path).unwrap();
        assert_eq!(loaded.servers, vec!["192.168.2.60".to_string()]);
        assert_eq!(loaded.mysql.pool_size, 20);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.yaml");
        fs::write(
            &path,
            "mysql:\n  host: db.internal\n  user: ro\n  password: secret\n  database: telemetry\n",
        )
        .unwrap();

        let loaded = MeshboardConfig::load(&path).unwrap();
        assert_eq!(loaded.mysql.host, "db.internal");
        assert_eq!(loaded.mysql.port, 3306);
        assert_eq!(loaded.cache.host, "127.0.0.1");
    }

    #[test]
    fn test_validate_rejects_zero_pool() {
        let mut config = MeshboardConfig::default();
        config.mysql.pool_size = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_bind() {
        let mut config = MeshboardConfig::default();
        config.http.bind = "not-an-address".to_string();
        assert!(config.validate().is_err());
    }
}
