//! Meshboard - Telemetry aggregation and cache precharge service
//!
//! Main entry point for the meshboard daemon and CLI.

use clap::{Parser, Subcommand};
use meshboard::cache::{CacheStore, MemoryCache, RedisCache};
use meshboard::config::MeshboardConfig;
use meshboard::db::MySqlDatabase;
use meshboard::refresh::{group_by_name, RefreshEngine, RefreshScheduler, SchedulerConfig};
use meshboard::web::ApiServer;
use meshboard::MeshboardError;
use std::path::PathBuf;
use std::process;
use std::sync::Arc;

/// Meshboard - precharge telemetry aggregations into the dashboard cache
#[derive(Parser, Debug)]
#[command(name = "meshboard")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to config file (default: ~/.config/meshboard/config.yaml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the refresh scheduler and the read API
    Serve {
        /// Override the HTTP bind address from the config file
        #[arg(short, long)]
        bind: Option<String>,

        /// Use an in-process cache instead of the cache service (local runs;
        /// published data is lost on exit)
        #[arg(long)]
        memory_cache: bool,
    },

    /// Run one precharge pass and exit
    Refresh {
        /// Refresh a single group (kpi, status, topology); all when omitted
        #[arg(short, long)]
        group: Option<String>,
    },

    /// Write a default configuration file
    Init,
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

async fn run() -> meshboard::Result<()> {
    meshboard::logging::init()?;

    let cli = Cli::parse();
    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(MeshboardConfig::default_path);

    match cli.command {
        Commands::Init => init_config(&config_path),
        Commands::Serve { bind, memory_cache } => {
            let config = MeshboardConfig::load(&config_path)?;
            serve(config, bind, memory_cache).await
        }
        Commands::Refresh { group } => {
            let config = MeshboardConfig::load(&config_path)?;
            refresh_once(config, group).await
        }
    }
}

fn init_config(path: &PathBuf) -> meshboard::Result<()> {
    if path.exists() {
        return Err(MeshboardError::Config(format!(
            "Refusing to overwrite existing config at {}",
            path.display()
        )));
    }

    MeshboardConfig::default().save(path)?;
    println!("Wrote default configuration to {}", path.display());
    println!("Fill in the mysql credentials before running `meshboard serve`.");
    Ok(())
}

async fn serve(
    config: MeshboardConfig,
    bind_override: Option<String>,
    memory_cache: bool,
) -> meshboard::Result<()> {
    // Pool and cache client are constructed exactly once and shared by
    // reference; no component may close or reconfigure them.
    let db = Arc::new(MySqlDatabase::connect(&config.mysql).await?);
    let cache: Arc<dyn CacheStore> = if memory_cache {
        Arc::new(MemoryCache::new())
    } else {
        Arc::new(RedisCache::connect(&config.cache).await?)
    };

    let engine = Arc::new(RefreshEngine::new(
        db,
        cache.clone(),
        config.servers.clone(),
        config.refresh.job_timeout(),
    ));

    let scheduler_config = SchedulerConfig {
        tick: config.refresh.tick(),
        warm_start_delay: config.refresh.warm_start_delay(),
        ..Default::default()
    };
    let mut scheduler = RefreshScheduler::new(engine, scheduler_config);

    tokio::spawn(async move {
        if let Err(e) = scheduler.run().await {
            tracing::error!(error = %e, "Refresh scheduler exited with error");
        }
    });

    let bind = bind_override.unwrap_or(config.http.bind.clone());
    ApiServer::new(cache).run(&bind).await
}

async fn refresh_once(config: MeshboardConfig, group: Option<String>) -> meshboard::Result<()> {
    let db = Arc::new(MySqlDatabase::connect(&config.mysql).await?);
    let cache: Arc<dyn CacheStore> = Arc::new(RedisCache::connect(&config.cache).await?);

    let engine = Arc::new(RefreshEngine::new(
        db,
        cache,
        config.servers.clone(),
        config.refresh.job_timeout(),
    ));

    match group {
        Some(name) => {
            let group = group_by_name(&name).ok_or(MeshboardError::UnknownGroup(name))?;
            engine.run_group(group).await;
        }
        None => engine.warm_start().await,
    }

    Ok(())
}
