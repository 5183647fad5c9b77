//! Hand landmark receiver
//!
//! Receives JSON-over-UDP packets from the hand tracker helper, one per
//! camera frame:
//!
//! ```json
//! {"hand_detected": true, "landmarks": [[0.51, 0.62, -0.01], ...]}
//! ```

use serde::Deserialize;
use std::net::{SocketAddr, UdpSocket};

use crate::config::TrackingConfig;
use crate::error::{SteedfieldError, TrackingError};
use crate::gesture::HandLandmarks;

/// A single JSON packet from the hand tracker
#[derive(Debug, Clone, Deserialize)]
pub struct HandPacket {
    /// Whether a hand was detected this frame
    pub hand_detected: bool,
    /// Normalized [x, y, z] per landmark, wrist first
    #[serde(default)]
    pub landmarks: Vec<[f32; 3]>,
    /// "Left" or "Right", when the tracker reports it
    #[serde(default)]
    pub handedness: Option<String>,
    /// Capture timestamp in milliseconds
    #[serde(default)]
    pub timestamp_ms: Option<u64>,
}

impl HandPacket {
    /// Landmarks of the detected hand, or `None` for no hand or an
    /// unusable landmark set
    pub fn hand(&self) -> Option<HandLandmarks> {
        if !self.hand_detected {
            return None;
        }
        HandLandmarks::from_points(&self.landmarks)
    }
}

/// One detection result forwarded to the tick loop
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HandFrame {
    /// Increments with every packet; 0 means nothing received yet
    pub sequence: u64,
    pub hand: Option<HandLandmarks>,
}

/// Hand landmark JSON-over-UDP receiver
pub struct HandReceiver {
    config: TrackingConfig,
    socket: Option<UdpSocket>,
    sequence: u64,
}

impl HandReceiver {
    /// Create a new receiver (does not bind yet)
    pub fn new(config: &TrackingConfig) -> Self {
        Self {
            config: config.clone(),
            socket: None,
            sequence: 0,
        }
    }

    /// Bind the UDP socket and start receiving
    pub fn start(&mut self) -> Result<(), SteedfieldError> {
        let addr = format!("{}:{}", self.config.listen_address, self.config.port);

        let socket = UdpSocket::bind(&addr).map_err(|e| {
            TrackingError::Receiver(format!("Failed to bind to {}: {}", addr, e))
        })?;

        socket.set_nonblocking(true).map_err(|e| {
            TrackingError::Receiver(format!("Failed to set non-blocking: {}", e))
        })?;

        tracing::info!("Hand receiver listening on {}", addr);
        self.socket = Some(socket);

        Ok(())
    }

    /// Bound address, once started
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.socket.as_ref().and_then(|s| s.local_addr().ok())
    }

    /// Process one incoming packet (non-blocking).
    ///
    /// `Ok(None)` when no packet is waiting.
    pub async fn process(&mut self) -> Result<Option<HandFrame>, SteedfieldError> {
        let socket = match &self.socket {
            Some(s) => s,
            None => return Ok(None),
        };

        let mut buf = [0u8; 65536];

        match socket.recv(&mut buf) {
            Ok(size) if size > 0 => {
                let packet: HandPacket = serde_json::from_slice(&buf[..size]).map_err(|e| {
                    TrackingError::Parse(format!("JSON parse error: {}", e))
                })?;

                self.sequence += 1;
                Ok(Some(HandFrame {
                    sequence: self.sequence,
                    hand: packet.hand(),
                }))
            }
            Ok(_) => Ok(None),
            Err(e) if e.kind() == std::io::ErrorKind::WouldBlock => Ok(None),
            Err(e) => Err(TrackingError::Receiver(format!("Receive error: {}", e)).into()),
        }
    }

    /// Packets received so far
    pub fn packets(&self) -> u64 {
        self.sequence
    }

    /// Stop the receiver
    pub fn stop(&mut self) {
        self.socket = None;
        tracing::info!("Hand receiver stopped");
    }
}
