//! Steedfield - gesture-driven particle morphing
//!
//! A particle field that morphs between a scattered cloud, a steed silhouette
//! and a radial photo gallery:
//! - Hand landmarks from an external tracker, debounced into fist/palm gestures
//! - A five-phase state machine with a cancelable delayed transition
//! - Per-frame particle targets and photo transforms, eased every tick
//! - Manual control from stdin or HTTP, status over Server-Sent Events

pub mod audio;
pub mod config;
pub mod engine;
pub mod error;
pub mod gallery;
pub mod gesture;
pub mod output;
pub mod silhouette;
pub mod state;
pub mod status;
pub mod tracking;
pub mod web;

pub use config::Config;
pub use error::{Result, SteedfieldError};

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc, RwLock};

use engine::{Command, SceneSnapshot};
use status::StatusUpdate;

/// Queue depth for commands waiting on the next tick
const COMMAND_QUEUE: usize = 256;

/// Shared hub between the tick loop and background services.
///
/// The scene itself stays owned by the tick loop; services only see
/// snapshots and send commands.
#[derive(Debug)]
pub struct ServiceHub {
    /// Current configuration
    pub config: RwLock<Config>,
    /// Latest scene snapshot
    pub snapshot: RwLock<SceneSnapshot>,
    /// Channel for status updates
    pub status_tx: broadcast::Sender<StatusUpdate>,
    /// Commands for the tick loop
    pub command_tx: mpsc::Sender<Command>,
    /// Shutdown signal
    pub shutdown_tx: broadcast::Sender<()>,
    /// Hand tracker connection status
    pub tracker_connected: AtomicBool,
}

impl ServiceHub {
    /// Create the hub and the command receiver owned by the tick loop
    pub fn new(config: Config) -> (Arc<Self>, mpsc::Receiver<Command>) {
        let (status_tx, _) = broadcast::channel(64);
        let (shutdown_tx, _) = broadcast::channel(1);
        let (command_tx, command_rx) = mpsc::channel(COMMAND_QUEUE);

        let hub = Arc::new(Self {
            config: RwLock::new(config),
            snapshot: RwLock::new(SceneSnapshot::default()),
            status_tx,
            command_tx,
            shutdown_tx,
            tracker_connected: AtomicBool::new(false),
        });
        (hub, command_rx)
    }

    /// Broadcast a status change
    pub fn publish_status(&self, update: StatusUpdate) {
        let _ = self.status_tx.send(update);
    }

    /// Subscribe to status changes
    pub fn subscribe_status(&self) -> broadcast::Receiver<StatusUpdate> {
        self.status_tx.subscribe()
    }

    /// Replace the latest snapshot
    pub async fn set_snapshot(&self, snapshot: SceneSnapshot) {
        let mut current = self.snapshot.write().await;
        *current = snapshot;
    }

    /// Get the latest snapshot
    pub async fn get_snapshot(&self) -> SceneSnapshot {
        self.snapshot.read().await.clone()
    }

    /// Queue a command for the next tick
    pub async fn send_command(&self, command: Command) -> bool {
        self.command_tx.send(command).await.is_ok()
    }

    /// Subscribe to shutdown signal
    pub fn subscribe_shutdown(&self) -> broadcast::Receiver<()> {
        self.shutdown_tx.subscribe()
    }

    /// Signal shutdown
    pub fn shutdown(&self) {
        let _ = self.shutdown_tx.send(());
    }

    /// Set hand tracker connection status
    pub fn set_tracker_connected(&self, connected: bool) {
        self.tracker_connected.store(connected, Ordering::Relaxed);
    }

    pub fn is_tracker_connected(&self) -> bool {
        self.tracker_connected.load(Ordering::Relaxed)
    }
}

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::StatusLabel;

    #[tokio::test]
    async fn test_status_broadcast() {
        let (hub, _commands) = ServiceHub::new(Config::default());
        let mut rx = hub.subscribe_status();
        hub.publish_status(StatusUpdate::new(StatusLabel::Fist, "forming"));
        assert_eq!(rx.recv().await.unwrap().label, StatusLabel::Fist);
    }

    #[tokio::test]
    async fn test_commands_reach_receiver() {
        let (hub, mut commands) = ServiceHub::new(Config::default());
        assert!(hub.send_command(Command::Toggle).await);
        assert_eq!(commands.recv().await, Some(Command::Toggle));

        drop(commands);
        assert!(!hub.send_command(Command::Quit).await);
    }

    #[tokio::test]
    async fn test_snapshot_roundtrip() {
        let (hub, _commands) = ServiceHub::new(Config::default());
        let mut snapshot = SceneSnapshot::default();
        snapshot.frame = 42;
        hub.set_snapshot(snapshot.clone()).await;
        assert_eq!(hub.get_snapshot().await, snapshot);
        assert!(!hub.is_tracker_connected());
    }
}
