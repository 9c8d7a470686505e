use async_trait::async_trait;

use crate::models::{VerifyOutcome, VerifyQrRequest, VerifyQrResponse};

/// Resolves decoded QR text into a patient record. The scan session only
/// sees the tagged outcome, never a raw response body.
#[async_trait]
pub trait QrVerifier: Send + Sync {
    async fn verify(&self, qr_data: &str) -> VerifyOutcome;
}

/// Verifier backed by the emergency endpoint over HTTP.
pub struct HttpVerifier {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpVerifier {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base = base_url.into();
        Self {
            client: reqwest::Client::new(),
            endpoint: format!("{}/api/emergency/verify-qr", base.trim_end_matches('/')),
        }
    }
}

#[async_trait]
impl QrVerifier for HttpVerifier {
    async fn verify(&self, qr_data: &str) -> VerifyOutcome {
        let request = VerifyQrRequest {
            qr_data: qr_data.to_string(),
        };

        let response = match self.client.post(&self.endpoint).json(&request).send().await {
            Ok(response) => response,
            Err(error) => return VerifyOutcome::NetworkError(error.to_string()),
        };

        if !response.status().is_success() {
            return VerifyOutcome::Rejected(format!(
                "verification failed with status {}",
                response.status()
            ));
        }

        match response.json::<VerifyQrResponse>().await {
            Ok(VerifyQrResponse {
                success: true,
                data: Some(record),
                ..
            }) => VerifyOutcome::Verified(record),
            Ok(body) => VerifyOutcome::Rejected(
                body.message
                    .unwrap_or_else(|| "QR code was not accepted".to_string()),
            ),
            Err(error) => VerifyOutcome::NetworkError(error.to_string()),
        }
    }
}
