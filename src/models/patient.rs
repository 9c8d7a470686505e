use serde::{Deserialize, Serialize};

/// Patient profile returned to a scanning client after a successful QR
/// verification. Held transiently on the client, never persisted there.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScannedPatientRecord {
    pub uid: String,
    pub username: String,
    #[serde(rename = "walletAddress")]
    pub wallet_address: String,
    #[serde(rename = "profilePicture", skip_serializing_if = "Option::is_none")]
    pub profile_picture: Option<String>,
    #[serde(rename = "emergencyDetails", skip_serializing_if = "Option::is_none")]
    pub emergency_details: Option<EmergencyDetails>,
}

/// Medical subset of a patient profile. Every field may be absent; consumers
/// render them conditionally.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmergencyDetails {
    #[serde(rename = "bloodType", skip_serializing_if = "Option::is_none")]
    pub blood_type: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub allergies: Vec<String>,
    #[serde(
        rename = "chronicConditions",
        default,
        skip_serializing_if = "Vec::is_empty"
    )]
    pub chronic_conditions: Vec<String>,
    #[serde(
        rename = "currentMedications",
        default,
        skip_serializing_if = "Vec::is_empty"
    )]
    pub current_medications: Vec<String>,
    #[serde(rename = "emergencyContact", skip_serializing_if = "Option::is_none")]
    pub emergency_contact: Option<String>,
    #[serde(rename = "emergencyPhone", skip_serializing_if = "Option::is_none")]
    pub emergency_phone: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_record() -> ScannedPatientRecord {
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

    #[test]
    fn record_serializes_with_camel_case_keys() {
        let json = serde_json::to_value(sample_record()).unwrap();
        assert_eq!(json["uid"], "12345");
        assert_eq!(json["walletAddress"], "0xabc");
        assert_eq!(json["emergencyDetails"]["bloodType"], "O-");
        assert_eq!(json["emergencyDetails"]["allergies"][0], "penicillin");
    }

    #[test]
    fn absent_fields_are_omitted() {
        let record = ScannedPatientRecord {
            uid: "1".to_string(),
            username: "bob".to_string(),
            wallet_address: "0xdef".to_string(),
            profile_picture: None,
            emergency_details: None,
        };
        let json = serde_json::to_string(&record).unwrap();
        assert!(!json.contains("profilePicture"));
        assert!(!json.contains("emergencyDetails"));
    }

    #[test]
    fn empty_detail_lists_are_omitted() {
        let details = EmergencyDetails {
            blood_type: Some("AB+".to_string()),
            ..Default::default()
        };
        let json = serde_json::to_string(&details).unwrap();
        assert!(json.contains("bloodType"));
        assert!(!json.contains("allergies"));
        assert!(!json.contains("chronicConditions"));
        assert!(!json.contains("currentMedications"));
    }

    #[test]
    fn record_deserializes_from_wire_shape() {
        let json = r#"{
            "uid": "12345",
            "username": "alice",
            "walletAddress": "0xabc",
            "emergencyDetails": {
                "bloodType": "O-",
                "allergies": ["penicillin"],
                "emergencyContact": "Carol",
                "emergencyPhone": "+1-555-0100"
            }
        }"#;

        let record: ScannedPatientRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.uid, "12345");
        let details = record.emergency_details.unwrap();
        assert_eq!(details.blood_type.as_deref(), Some("O-"));
        assert_eq!(details.allergies, vec!["penicillin"]);
        assert_eq!(details.emergency_contact.as_deref(), Some("Carol"));
        assert!(details.chronic_conditions.is_empty());
    }
}
