use serde::{Deserialize, Serialize};

use super::ScannedPatientRecord;

/// Body of `POST /api/emergency/verify-qr`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyQrRequest {
    #[serde(rename = "qrData")]
    pub qr_data: String,
}

/// Endpoint response. Rejections are in-band (`success: false` with a
/// message); only repository failures surface as error statuses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyQrResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<ScannedPatientRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl VerifyQrResponse {
    pub fn verified(record: ScannedPatientRecord) -> Self {
        Self {
            success: true,
            data: Some(record),
            message: None,
        }
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message.into()),
        }
    }
}

/// Outcome of one verification round trip, as seen by the scanning client.
#[derive(Debug, Clone, PartialEq)]
pub enum VerifyOutcome {
    Verified(ScannedPatientRecord),
    Rejected(String),
    NetworkError(String),
}

/// Extracts the patient uid from a decoded QR payload. Accepted shapes are
/// `uid:<id>` and a bare uid; anything blank is rejected.
pub fn parse_qr_token(qr_data: &str) -> Option<&str> {
    let token = qr_data.trim();
    let uid = token.strip_prefix("uid:").unwrap_or(token).trim();
    if uid.is_empty() {
        None
    } else {
        Some(uid)
    }
}
