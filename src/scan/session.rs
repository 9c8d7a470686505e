use tracing::{info, warn};

use super::verifier::QrVerifier;
use crate::models::{ScannedPatientRecord, VerifyOutcome};

/// Capture settings forwarded to the external scanner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanConfig {
    pub facing_mode: FacingMode,
    pub fps: u32,
    /// Detection box width and height in pixels.
    pub qrbox: (u32, u32),
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            facing_mode: FacingMode::Environment,
            fps: 10,
            qrbox: (250, 250),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FacingMode {
    User,
    Environment,
}

#[derive(Debug, thiserror::Error)]
#[error("camera unavailable: {0}")]
pub struct CameraError(pub String);

/// External camera plus QR decoder. Only one capture session may be active;
/// `start` and `stop` must pair on every exit path. Decoded text is fed back
/// through [`ScanSession::handle_decode`].
pub trait CameraScanner: Send {
    fn start(&mut self, config: &ScanConfig) -> Result<(), CameraError>;
    fn stop(&mut self);
    fn is_active(&self) -> bool;
}

#[derive(Debug, Clone, PartialEq)]
pub enum ScanState {
    Idle,
    Scanning,
    Resolved(ScannedPatientRecord),
    CameraError(String),
}

/// Transient user-facing notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub title: String,
    pub detail: String,
}

impl Notice {
    fn new(title: &str, detail: impl Into<String>) -> Self {
        Self {
            title: title.to_string(),
            detail: detail.into(),
        }
    }
}

/// Scan session state machine: Idle → Scanning → Resolved, with a
/// CameraError side branch. The camera is released on every exit path,
/// including drop.
pub struct ScanSession<S: CameraScanner, V> {
    scanner: S,
    verifier: V,
    config: ScanConfig,
    state: ScanState,
    verify_in_flight: bool,
    notices: Vec<Notice>,
}

impl<S: CameraScanner, V: QrVerifier> ScanSession<S, V> {
    pub fn new(scanner: S, verifier: V) -> Self {
        Self::with_config(scanner, verifier, ScanConfig::default())
    }

    pub fn with_config(scanner: S, verifier: V, config: ScanConfig) -> Self {
        Self {
            scanner,
            verifier,
            config,
            state: ScanState::Idle,
            verify_in_flight: false,
            notices: Vec::new(),
        }
    }

    pub fn state(&self) -> &ScanState {
        &self.state
    }

    /// The resolved record, if any.
    pub fn record(&self) -> Option<&ScannedPatientRecord> {
        match &self.state {
            ScanState::Resolved(record) => Some(record),
            _ => None,
        }
    }

    pub fn camera_active(&self) -> bool {
        self.scanner.is_active()
    }

    /// Drains accumulated notifications for display.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    /// Idle → Scanning. On acquisition failure the state moves to
    /// CameraError with the camera inactive; the user retries manually.
    pub fn start_scanning(&mut self) {
        if !matches!(self.state, ScanState::Idle | ScanState::CameraError(_)) {
            return;
        }
        match self.scanner.start(&self.config) {
            Ok(()) => {
                self.state = ScanState::Scanning;
                self.verify_in_flight = false;
            }
            Err(error) => {
                warn!(%error, "camera acquisition failed");
                self.notices.push(Notice::new(
                    "Camera Error",
                    "Unable to access camera. Please ensure camera permissions are granted.",
                ));
                self.state = ScanState::CameraError(error.to_string());
            }
        }
    }

    /// Handles one decode event from the scanner. Events may fire
    /// arbitrarily often while scanning; at most one verify request is in
    /// flight and the rest are dropped. A failed verification leaves the
    /// camera active so the next decode event tries again.
    pub async fn handle_decode(&mut self, decoded: &str) {
        if !matches!(self.state, ScanState::Scanning) || self.verify_in_flight {
            return;
        }

        self.verify_in_flight = true;
        let outcome = self.verifier.verify(decoded).await;
        self.verify_in_flight = false;

        match outcome {
            VerifyOutcome::Verified(record) => {
                self.scanner.stop();
                info!(uid = %record.uid, "patient record resolved");
                self.notices.push(Notice::new(
                    "QR Code Scanned",
                    "Patient information loaded successfully",
                ));
                self.state = ScanState::Resolved(record);
            }
            VerifyOutcome::Rejected(reason) => {
                warn!(reason = %reason, "qr verification rejected");
                self.notices.push(Notice::new("Verification Failed", reason));
            }
            VerifyOutcome::NetworkError(reason) => {
                warn!(reason = %reason, "qr verification unreachable");
                self.notices
                    .push(Notice::new("Verification Failed", reason));
            }
        }
    }

    /// Releases the camera if held and returns to Idle.
    pub fn stop_scanning(&mut self) {
        self.scanner.stop();
        self.verify_in_flight = false;
        if matches!(self.state, ScanState::Scanning) {
            self.state = ScanState::Idle;
        }
    }

    /// Discards a resolved record or camera error; pure client-side reset.
    pub fn clear(&mut self) {
        if matches!(self.state, ScanState::Resolved(_) | ScanState::CameraError(_)) {
            self.state = ScanState::Idle;
        }
    }
}

impl<S: CameraScanner, V> Drop for ScanSession<S, V> {
    fn drop(&mut self) {
        self.scanner.stop();
    }
}
