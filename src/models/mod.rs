pub mod patient;
pub mod verify;

pub use patient::{EmergencyDetails, ScannedPatientRecord};
pub use verify::{parse_qr_token, VerifyOutcome, VerifyQrRequest, VerifyQrResponse};
