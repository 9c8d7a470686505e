use chrono::Utc;
use sqlx::FromRow;
use uuid::Uuid;

use super::Database;
use crate::models::{EmergencyDetails, ScannedPatientRecord};

#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("database query failed: {0}")]
    Query(#[from] sqlx::Error),
    #[error("stored record is malformed: {0}")]
    Malformed(#[from] serde_json::Error),
}

// SQLite accepts $N placeholders as well, so one statement text serves both
// backends.
const RESOLVE_SQL: &str = "SELECT p.uid, p.username, p.wallet_address, p.profile_picture,
            e.patient_uid AS details_uid, e.blood_type, e.allergies,
            e.chronic_conditions, e.current_medications,
            e.emergency_contact, e.emergency_phone
     FROM patients p
     LEFT JOIN emergency_details e ON e.patient_uid = p.uid
     WHERE p.uid = $1";

const UPSERT_PATIENT_SQL: &str = "INSERT INTO patients (uid, username, wallet_address, profile_picture)
     VALUES ($1, $2, $3, $4)
     ON CONFLICT (uid) DO UPDATE SET
         username = excluded.username,
         wallet_address = excluded.wallet_address,
         profile_picture = excluded.profile_picture";

const DELETE_DETAILS_SQL: &str = "DELETE FROM emergency_details WHERE patient_uid = $1";

const INSERT_DETAILS_SQL: &str = "INSERT INTO emergency_details (patient_uid, blood_type, allergies,
         chronic_conditions, current_medications, emergency_contact, emergency_phone)
     VALUES ($1, $2, $3, $4, $5, $6, $7)";

const LOG_ACCESS_SQL: &str = "INSERT INTO emergency_access_log (id, qr_data, patient_uid, outcome, accessed_at)
     VALUES ($1, $2, $3, $4, $5)";

#[derive(FromRow)]
struct ProfileRow {
    uid: String,
    username: String,
    wallet_address: String,
    profile_picture: Option<String>,
    details_uid: Option<String>,
    blood_type: Option<String>,
    allergies: Option<String>,
    chronic_conditions: Option<String>,
    current_medications: Option<String>,
    emergency_contact: Option<String>,
    emergency_phone: Option<String>,
}

impl ProfileRow {
    fn into_record(self) -> Result<ScannedPatientRecord, DbError> {
        let emergency_details = if self.details_uid.is_some() {
            Some(EmergencyDetails {
                blood_type: self.blood_type,
                allergies: parse_list(self.allergies)?,
                chronic_conditions: parse_list(self.chronic_conditions)?,
                current_medications: parse_list(self.current_medications)?,
                emergency_contact: self.emergency_contact,
                emergency_phone: self.emergency_phone,
            })
        } else {
            None
        };

        Ok(ScannedPatientRecord {
            uid: self.uid,
            username: self.username,
            wallet_address: self.wallet_address,
            profile_picture: self.profile_picture,
            emergency_details,
        })
    }
}

/// Name lists are stored as JSON arrays in a TEXT column, which both
/// backends handle identically.
fn parse_list(raw: Option<String>) -> Result<Vec<String>, serde_json::Error> {
    match raw {
        Some(text) if !text.is_empty() => serde_json::from_str(&text),
        _ => Ok(Vec::new()),
    }
}

fn encode_list(list: &[String]) -> Result<String, serde_json::Error> {
    serde_json::to_string(list)
}

impl Database {
    /// Resolves a patient uid into the record served to scanning clients.
    pub async fn resolve_uid(&self, uid: &str) -> Result<Option<ScannedPatientRecord>, DbError> {
        let row: Option<ProfileRow> = match self {
            Self::Postgres(pool) => {
                sqlx::query_as(RESOLVE_SQL)
                    .bind(uid)
                    .fetch_optional(pool)
                    .await?
            }
            Self::Sqlite(pool) => {
                sqlx::query_as(RESOLVE_SQL)
                    .bind(uid)
                    .fetch_optional(pool)
                    .await?
            }
        };

        row.map(ProfileRow::into_record).transpose()
    }

    /// Inserts or replaces a patient profile together with its emergency
    /// details.
    pub async fn store_profile(&self, record: &ScannedPatientRecord) -> Result<(), DbError> {
        match self {
            Self::Postgres(pool) => {
                sqlx::query(UPSERT_PATIENT_SQL)
                    .bind(&record.uid)
                    .bind(&record.username)
                    .bind(&record.wallet_address)
                    .bind(&record.profile_picture)
                    .execute(pool)
                    .await?;
                sqlx::query(DELETE_DETAILS_SQL)
                    .bind(&record.uid)
                    .execute(pool)
                    .await?;
                if let Some(details) = &record.emergency_details {
                    sqlx::query(INSERT_DETAILS_SQL)
                        .bind(&record.uid)
                        .bind(&details.blood_type)
                        .bind(encode_list(&details.allergies)?)
                        .bind(encode_list(&details.chronic_conditions)?)
                        .bind(encode_list(&details.current_medications)?)
                        .bind(&details.emergency_contact)
                        .bind(&details.emergency_phone)
                        .execute(pool)
                        .await?;
                }
            }
            Self::Sqlite(pool) => {
                sqlx::query(UPSERT_PATIENT_SQL)
                    .bind(&record.uid)
                    .bind(&record.username)
                    .bind(&record.wallet_address)
                    .bind(&record.profile_picture)
                    .execute(pool)
                    .await?;
                sqlx::query(DELETE_DETAILS_SQL)
                    .bind(&record.uid)
                    .execute(pool)
                    .await?;
                if let Some(details) = &record.emergency_details {
                    sqlx::query(INSERT_DETAILS_SQL)
                        .bind(&record.uid)
                        .bind(&details.blood_type)
                        .bind(encode_list(&details.allergies)?)
                        .bind(encode_list(&details.chronic_conditions)?)
                        .bind(encode_list(&details.current_medications)?)
                        .bind(&details.emergency_contact)
                        .bind(&details.emergency_phone)
                        .execute(pool)
                        .await?;
                }
            }
        }

        Ok(())
    }

    /// Records one emergency access attempt. Best effort: a failed audit
    /// insert never fails the verification request.
    pub async fn log_access(&self, qr_data: &str, patient_uid: Option<&str>, outcome: &str) {
        let id = Uuid::new_v4().to_string();
        let accessed_at = Utc::now().to_rfc3339();

        let result = match self {
            Self::Postgres(pool) => {
                sqlx::query(LOG_ACCESS_SQL)
                    .bind(&id)
                    .bind(qr_data)
                    .bind(patient_uid)
                    .bind(outcome)
                    .bind(&accessed_at)
                    .execute(pool)
                    .await
                    .map(|_| ())
            }
            Self::Sqlite(pool) => {
                sqlx::query(LOG_ACCESS_SQL)
                    .bind(&id)
                    .bind(qr_data)
                    .bind(patient_uid)
                    .bind(outcome)
                    .bind(&accessed_at)
                    .execute(pool)
                    .await
                    .map(|_| ())
            }
        };

        if let Err(error) = result {
            tracing::warn!(%error, "failed to record emergency access");
        }
    }
}
