//! Tracking module
//!
//! Hand landmarks arrive from an external tracker helper as JSON over UDP.
//! Startup is bounded: if no packet arrives within the configured timeout the
//! caller is told, and the scene continues in manual-only mode.

pub mod hands;
pub mod subprocess;

pub use hands::{HandFrame, HandPacket, HandReceiver};
pub use subprocess::HandTrackerProcess;

use std::time::Duration;
use tokio::sync::{broadcast, oneshot, watch};
use tracing::{error, info, warn};

use crate::config::TrackingConfig;
use crate::error::{SteedfieldError, TrackingError};

/// Delay between polls while no packet is waiting
const POLL_INTERVAL: Duration = Duration::from_millis(5);

/// Poll until the first packet arrives or `timeout` elapses
pub async fn wait_first_frame(
    receiver: &mut HandReceiver,
    timeout: Duration,
) -> Result<HandFrame, SteedfieldError> {
    let wait = async {
        loop {
            match receiver.process().await {
                Ok(Some(frame)) => return frame,
                Ok(None) => {}
                Err(e) => warn!("Hand tracker packet dropped: {}", e),
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    };

    tokio::time::timeout(timeout, wait)
        .await
        .map_err(|_| TrackingError::StartupTimeout(timeout.as_secs()).into())
}

/// Run hand tracking until shutdown.
///
/// `ready` resolves once: `Ok` with the first packet, or the startup failure.
/// Detection frames are published on `frames`.
pub async fn run_hand_tracking(
    config: TrackingConfig,
    frames: watch::Sender<HandFrame>,
    ready: oneshot::Sender<Result<(), SteedfieldError>>,
    mut shutdown_rx: broadcast::Receiver<()>,
) -> Result<(), SteedfieldError> {
    let mut subprocess = if config.auto_launch {
        let mut sp = HandTrackerProcess::new(&config);
        if let Err(e) = sp.start() {
            let _ = ready.send(Err(e));
            return Ok(());
        }
        Some(sp)
    } else {
        None
    };

    let mut receiver = HandReceiver::new(&config);
    if let Err(e) = receiver.start() {
        let _ = ready.send(Err(e));
        return Ok(());
    }

    let timeout = Duration::from_secs(config.startup_timeout_secs);
    let first = tokio::select! {
        result = wait_first_frame(&mut receiver, timeout) => Some(result),
        _ = shutdown_rx.recv() => None,
    };
    let Some(first) = first else {
        receiver.stop();
        return Ok(());
    };

    match first {
        Ok(frame) => {
            info!("Hand tracker connected");
            frames.send_replace(frame);
            let _ = ready.send(Ok(()));
        }
        Err(e) => {
            receiver.stop();
            if let Some(ref mut sp) = subprocess {
                sp.stop().await;
            }
            let _ = ready.send(Err(e));
            return Ok(());
        }
    }

    loop {
        tokio::select! {
            result = receiver.process() => {
                match result {
                    Ok(Some(frame)) => {
                        frames.send_replace(frame);
                    }
                    Ok(None) => {}
                    Err(e) => {
                        error!("Hand tracker receive error: {}", e);
                        tokio::time::sleep(Duration::from_millis(100)).await;
                    }
                }

                if let Some(ref mut sp) = subprocess {
                    if !sp.is_running() {
                        warn!("Hand tracker subprocess stopped, no further gesture input");
                        break;
                    }
                }
            }
            _ = shutdown_rx.recv() => {
                info!("Hand tracking shutting down");
                break;
            }
        }

        // Small yield to avoid busy-spinning when no data arrives
        tokio::time::sleep(POLL_INTERVAL).await;
    }

    receiver.stop();
    if let Some(ref mut sp) = subprocess {
        sp.stop().await;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::UdpSocket;

    fn config(port: u16, timeout: u64) -> TrackingConfig {
        TrackingConfig {
            port,
            startup_timeout_secs: timeout,
            ..TrackingConfig::default()
        }
    }

    #[tokio::test]
    async fn test_startup_timeout() {
        let mut receiver = HandReceiver::new(&config(0, 0));
        receiver.start().unwrap();
        let result = wait_first_frame(&mut receiver, Duration::from_millis(30)).await;
        assert!(matches!(
            result,
            Err(SteedfieldError::Tracking(TrackingError::StartupTimeout(_)))
        ));
    }

    #[tokio::test]
    async fn test_first_frame_arrives() {
        let mut receiver = HandReceiver::new(&config(0, 1));
        receiver.start().unwrap();
        let addr = receiver.local_addr().unwrap();

        let sender = UdpSocket::bind("127.0.0.1:0").unwrap();
        sender
            .send_to(br#"{"hand_detected":false}"#, addr)
            .unwrap();

        let frame = wait_first_frame(&mut receiver, Duration::from_secs(2))
            .await
            .unwrap();
        assert_eq!(frame.sequence, 1);
        assert!(frame.hand.is_none());
    }

    #[tokio::test]
    async fn test_run_reports_startup_failure() {
        // Occupy a port so the receiver cannot bind it
        let blocker = UdpSocket::bind("127.0.0.1:0").unwrap();
        let port = blocker.local_addr().unwrap().port();

        let (frames_tx, _frames_rx) = watch::channel(HandFrame::default());
        let (ready_tx, ready_rx) = oneshot::channel();
        let (_shutdown_tx, shutdown_rx) = broadcast::channel(1);

        run_hand_tracking(config(port, 1), frames_tx, ready_tx, shutdown_rx)
            .await
            .unwrap();

        let ready = ready_rx.await.unwrap();
        assert!(matches!(
            ready,
            Err(SteedfieldError::Tracking(TrackingError::Receiver(_)))
        ));
    }
}
