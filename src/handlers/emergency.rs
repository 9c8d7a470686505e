use std::sync::Arc;

use axum::{extract::State, Json};

use super::ApiError;
use crate::db::Database;
use crate::models::{parse_qr_token, VerifyQrRequest, VerifyQrResponse};

/// `POST /api/emergency/verify-qr` — resolves a scanned token into a patient
/// emergency profile. Every attempt is audited.
pub async fn verify_qr(
    State(db): State<Arc<Database>>,
    Json(request): Json<VerifyQrRequest>,
) -> Result<Json<VerifyQrResponse>, ApiError> {
    let Some(uid) = parse_qr_token(&request.qr_data) else {
        db.log_access(&request.qr_data, None, "rejected").await;
        return Ok(Json(VerifyQrResponse::rejected("Unrecognized QR payload")));
    };

    match db.resolve_uid(uid).await {
        Ok(Some(record)) => {
            db.log_access(&request.qr_data, Some(&record.uid), "verified")
                .await;
            tracing::info!(uid = %record.uid, "emergency profile verified");
            Ok(Json(VerifyQrResponse::verified(record)))
        }
        Ok(None) => {
            db.log_access(&request.qr_data, None, "unknown").await;
            Ok(Json(VerifyQrResponse::rejected(
                "No patient matches this QR code",
            )))
        }
        Err(error) => {
            tracing::error!(%error, "verification lookup failed");
            Err(ApiError::internal(format!(
                "Failed to verify QR code: {error}"
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StorageConfig;
    use crate::models::{EmergencyDetails, ScannedPatientRecord};

    async fn setup_db() -> Arc<Database> {
        Arc::new(
            Database::connect(&StorageConfig::in_memory())
                .await
                .expect("in-memory sqlite should open"),
        )
    }

    fn alice() -> ScannedPatientRecord {
        ScannedPatientRecord {
            uid: "12345".to_string(),
            username: "alice".to_string(),
            wallet_address: "0xabc".to_string(),
            profile_picture: None,
            emergency_details: Some(EmergencyDetails {
                blood_type: Some("O-".to_string()),
                allergies: vec!["penicillin".to_string()],
                ..Default::default()
            }),
        }
    }

    #[tokio::test]
    async fn known_token_verifies() {
        let db = setup_db().await;
        db.store_profile(&alice()).await.unwrap();

        let request = VerifyQrRequest {
            qr_data: "uid:12345".to_string(),
        };
        let Json(response) = verify_qr(State(db), Json(request)).await.unwrap();

        assert!(response.success);
        let record = response.data.unwrap();
        assert_eq!(record.uid, "12345");
        assert_eq!(record.username, "alice");
        let details = record.emergency_details.unwrap();
        assert_eq!(details.blood_type.as_deref(), Some("O-"));
        assert_eq!(details.allergies, vec!["penicillin"]);
    }

    #[tokio::test]
    async fn unknown_token_is_rejected_in_band() {
        let db = setup_db().await;

        let request = VerifyQrRequest {
            qr_data: "uid:nobody".to_string(),
        };
        let Json(response) = verify_qr(State(db), Json(request)).await.unwrap();

        assert!(!response.success);
        assert!(response.data.is_none());
        assert!(response.message.is_some());
    }

    #[tokio::test]
    async fn blank_payload_is_rejected_in_band() {
        let db = setup_db().await;

        let request = VerifyQrRequest {
            qr_data: "   ".to_string(),
        };
        let Json(response) = verify_qr(State(db), Json(request)).await.unwrap();

        assert!(!response.success);
        assert!(response.data.is_none());
    }

    #[tokio::test]
    async fn attempts_are_audited() {
        let db = setup_db().await;
        db.store_profile(&alice()).await.unwrap();

        let request = VerifyQrRequest {
            qr_data: "uid:12345".to_string(),
        };
        let _ = verify_qr(State(db.clone()), Json(request)).await.unwrap();

        let Database::Sqlite(pool) = db.as_ref() else {
            panic!("expected sqlite handle");
        };
        let outcome: String =
            sqlx::query_scalar("SELECT outcome FROM emergency_access_log LIMIT 1")
                .fetch_one(pool)
                .await
                .unwrap();
        assert_eq!(outcome, "verified");
    }
}
