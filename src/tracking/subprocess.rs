//! Hand tracker subprocess manager
//!
//! Launches the Python hand landmarker helper as a child process with
//! automatic cleanup on drop.

use tokio::process::{Child, Command};

use crate::config::TrackingConfig;
use crate::error::{SteedfieldError, TrackingError};

/// Manages the hand tracker helper subprocess
pub struct HandTrackerProcess {
    child: Option<Child>,
    config: TrackingConfig,
}

impl HandTrackerProcess {
    /// Create a new subprocess manager (does not start the process)
    pub fn new(config: &TrackingConfig) -> Self {
        Self {
            child: None,
            config: config.clone(),
        }
    }

    /// Arguments passed after the script path
    pub fn args(&self) -> Vec<String> {
        vec![
            "--ip".to_string(),
            self.config.listen_address.clone(),
            "--port".to_string(),
            self.config.port.to_string(),
            "--capture".to_string(),
            self.config.camera_device.to_string(),
            "--width".to_string(),
            self.config.capture_width.to_string(),
            "--height".to_string(),
            self.config.capture_height.to_string(),
            "--num-hands".to_string(),
            "1".to_string(),
        ]
    }

    /// Launch the tracker subprocess.
    ///
    /// Runs: `python3 <tracker_script> --ip <listen_address> --port <port>
    ///        --capture <camera_device> --width <w> --height <h> --num-hands 1`
    pub fn start(&mut self) -> Result<(), SteedfieldError> {
        if self.is_running() {
            return Ok(());
        }

        let child = Command::new("python3")
            .arg(&self.config.tracker_script)
            .args(self.args())
            .kill_on_drop(true)
            .stdout(std::process::Stdio::null())
            .stderr(std::process::Stdio::null())
            .spawn()
            .map_err(|e| {
                TrackingError::Subprocess(format!(
                    "Failed to launch hand tracker at '{}': {}",
                    self.config.tracker_script, e
                ))
            })?;

        tracing::info!(
            "Hand tracker subprocess started (pid: {:?}, camera: {}, port: {})",
            child.id(),
            self.config.camera_device,
            self.config.port,
        );

        self.child = Some(child);
        Ok(())
    }

    /// Check if the subprocess is still running (non-blocking)
    pub fn is_running(&mut self) -> bool {
        match &mut self.child {
            Some(child) => match child.try_wait() {
                Ok(None) => true,
                Ok(Some(status)) => {
                    tracing::warn!("Hand tracker subprocess exited with: {}", status);
                    self.child = None;
                    false
                }
                Err(e) => {
                    tracing::error!("Failed to check hand tracker status: {}", e);
                    false
                }
            },
            None => false,
        }
    }

    /// Stop the subprocess by killing it
    pub async fn stop(&mut self) {
        if let Some(mut child) = self.child.take() {
            tracing::info!("Stopping hand tracker subprocess (pid: {:?})", child.id());
            let _ = child.kill().await;
            let _ = child.wait().await;
        }
    }
}
