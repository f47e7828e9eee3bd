//! Refresh scheduler daemon
//!
//! A single long-lived timer drives all refresh activity. Every tick reads
//! the wall-clock minute and triggers each group whose bucket set contains
//! it; triggered groups run as spawned tasks so the timer itself never
//! blocks. A one-time warm-start pass populates the cache shortly after
//! startup, without waiting for a bucket match. No job failure can stop the
//! loop — containment lives in the engine.

use super::engine::RefreshEngine;
use super::jobs::{due_groups, group_by_name};
use crate::{MeshboardError, Result};
use chrono::{Local, Timelike};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, mpsc};

/// Default tick interval (one minute, matching the bucket granularity)
pub const DEFAULT_TICK: Duration = Duration::from_secs(60);

/// Default delay before the warm-start pass
pub const DEFAULT_WARM_START_DELAY: Duration = Duration::from_millis(100);

/// Default event broadcast channel capacity
pub const DEFAULT_EVENT_CHANNEL_CAPACITY: usize = 256;

/// Scheduler configuration
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    /// Timer interval; buckets are evaluated once per tick
    pub tick: Duration,

    /// Delay before the one-time warm-start pass
    pub warm_start_delay: Duration,

    /// Event broadcast channel capacity
    pub event_channel_capacity: usize,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            tick: DEFAULT_TICK,
            warm_start_delay: DEFAULT_WARM_START_DELAY,
            event_channel_capacity: DEFAULT_EVENT_CHANNEL_CAPACITY,
        }
    }
}

/// Events emitted by the scheduler
#[derive(Debug, Clone)]
pub enum RefreshEvent {
    /// Scheduler started
    Started,

    /// Warm-start pass finished
    WarmStartCompleted,

    /// A group's bucket matched the current minute
    GroupTriggered {
        group: &'static str,
        minute: u32,
    },

    /// Scheduler stopped
    Stopped,
}

/// Commands that can be sent to the scheduler
#[derive(Debug, Clone)]
pub enum RefreshCommand {
    /// Trigger a group immediately (None = all groups)
    RefreshNow(Option<String>),

    /// Stop the scheduler
    Shutdown,
}

/// Result of handling a command
enum CommandResult {
    Continue,
    Stop,
}

/// The refresh scheduler daemon
pub struct RefreshScheduler {
    config: SchedulerConfig,
    engine: Arc<RefreshEngine>,
    event_tx: broadcast::Sender<RefreshEvent>,
    command_tx: mpsc::Sender<RefreshCommand>,
    command_rx: Option<mpsc::Receiver<RefreshCommand>>,
}

impl RefreshScheduler {
    pub fn new(engine: Arc<RefreshEngine>, config: SchedulerConfig) -> Self {
        let (event_tx, _) = broadcast::channel(config.event_channel_capacity);
        let (command_tx, command_rx) = mpsc::channel(16);

        Self {
            config,
            engine,
            event_tx,
            command_tx,
            command_rx: Some(command_rx),
        }
    }

    /// Get an event subscriber
    pub fn subscribe(&self) -> broadcast::Receiver<RefreshEvent> {
        self.event_tx.subscribe()
    }

    /// Get a command sender
    pub fn command_sender(&self) -> mpsc::Sender<RefreshCommand> {
        self.command_tx.clone()
    }

    fn send_event(&self, event: RefreshEvent) {
        // Dropped events only mean nobody is listening.
        let _ = self.event_tx.send(event);
    }

    /// Run the scheduler loop until shutdown
    pub async fn run(&mut self) -> Result<()> {
        self.send_event(RefreshEvent::Started);
        tracing::info!(
            tick_secs = self.config.tick.as_secs(),
            "Refresh scheduler running"
        );

        // Warm start is decoupled from the timer so slow precharge queries
        // never delay the first tick.
        {
            let engine = Arc::clone(&self.engine);
            let event_tx = self.event_tx.clone();
            let delay = self.config.warm_start_delay;
            tokio::spawn(async move {
                tokio::time::sleep(delay).await;
                engine.warm_start().await;
                let _ = event_tx.send(RefreshEvent::WarmStartCompleted);
            });
        }

        // First fire lands one full interval from now; minute zero belongs to
        // the warm start.
        let start = tokio::time::Instant::now() + self.config.tick;
        let mut interval = tokio::time::interval_at(start, self.config.tick);

        let mut command_rx = self
            .command_rx
            .take()
            .ok_or_else(|| MeshboardError::Other("Scheduler already running".to_string()))?;

        #[cfg(unix)]
        self.run_with_signals(&mut interval, &mut command_rx).await?;

        #[cfg(not(unix))]
        self.run_without_signals(&mut interval, &mut command_rx).await?;

        self.send_event(RefreshEvent::Stopped);
        tracing::info!("Refresh scheduler stopped");
        Ok(())
    }

    /// Event loop with Unix signal handling (SIGTERM/SIGINT)
    #[cfg(unix)]
    async fn run_with_signals(
        &mut self,
        interval: &mut tokio::time::Interval,
        command_rx: &mut mpsc::Receiver<RefreshCommand>,
    ) -> Result<()> {
        use tokio::signal::unix::{signal, SignalKind};

        let mut sigterm = signal(SignalKind::terminate()).map_err(|e| {
            MeshboardError::Other(format!("Failed to set up SIGTERM handler: {}", e))
        })?;
        let mut sigint = signal(SignalKind::interrupt()).map_err(|e| {
            MeshboardError::Other(format!("Failed to set up SIGINT handler: {}", e))
        })?;

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    self.on_tick();
                }
                Some(cmd) = command_rx.recv() => {
                    match self.handle_command(cmd) {
                        CommandResult::Continue => {}
                        CommandResult::Stop => break,
                    }
                }
                _ = sigterm.recv() => {
                    tracing::info!("Received SIGTERM, shutting down scheduler");
                    break;
                }
                _ = sigint.recv() => {
                    tracing::info!("Received SIGINT, shutting down scheduler");
                    break;
                }
            }
        }
        Ok(())
    }

    /// Event loop without signal handling (non-Unix platforms)
    #[cfg(not(unix))]
    async fn run_without_signals(
        &mut self,
        interval: &mut tokio::time::Interval,
        command_rx: &mut mpsc::Receiver<RefreshCommand>,
    ) -> Result<()> {
        loop {
            tokio::select! {
                _ = interval.tick() => {
                    self.on_tick();
                }
                Some(cmd) = command_rx.recv() => {
                    match self.handle_command(cmd) {
                        CommandResult::Continue => {}
                        CommandResult::Stop => break,
                    }
                }
            }
        }
        Ok(())
    }

    /// One timer tick: trigger every group whose buckets contain the current
    /// wall-clock minute
    fn on_tick(&self) {
        let minute = Local::now().minute();

        for group in due_groups(minute) {
            self.send_event(RefreshEvent::GroupTriggered {
                group: group.name,
                minute,
            });

            tracing::info!(group = group.name, minute = minute, "Bucket matched");

            let engine = Arc::clone(&self.engine);
            tokio::spawn(async move {
                engine.run_group(group).await;
            });
        }
    }

    fn handle_command(&self, cmd: RefreshCommand) -> CommandResult {
        match cmd {
            RefreshCommand::RefreshNow(None) => {
                let engine = Arc::clone(&self.engine);
                tokio::spawn(async move {
                    engine.warm_start().await;
                });
            }
            RefreshCommand::RefreshNow(Some(name)) => match group_by_name(&name) {
                Some(group) => {
                    let engine = Arc::clone(&self.engine);
                    tokio::spawn(async move {
                        engine.run_group(group).await;
                    });
                }
                None => {
                    tracing::warn!(group = %name, "RefreshNow for unknown group ignored");
                }
            },
            RefreshCommand::Shutdown => {
                tracing::info!("Received shutdown command");
                return CommandResult::Stop;
            }
        }
        CommandResult::Continue
    }
}
