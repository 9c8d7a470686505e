//! Client-side scan session: drives an external camera scanner and resolves
//! decoded QR text through the verification endpoint.

pub mod session;
pub mod verifier;

pub use session::{CameraError, CameraScanner, FacingMode, Notice, ScanConfig, ScanSession, ScanState};
pub use verifier::{HttpVerifier, QrVerifier};
