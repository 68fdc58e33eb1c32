use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

/// Status the file-storage backend reports for a stored upload
pub const UPLOAD_CREATED: u16 = 201;

/// Response envelope of the upload endpoint.
///
/// Successful replies are the backend's body passed through untouched; this
/// type is used to build local errors and to read the reply on the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct UploadEnvelope {
    pub timestamp: String,
    pub status: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Encrypted file reference on success
    #[serde(default)]
    #[schema(value_type = Object)]
    pub data: Value,
}

impl UploadEnvelope {
    pub fn is_created(&self) -> bool {
        self.status == UPLOAD_CREATED
    }

    /// Reference to hand to the training endpoint: strings and numbers as
    /// text, anything else as its JSON rendering.
    pub fn encrypted_file_reference(&self) -> Option<String> {
        match &self.data {
            Value::Null => None,
            Value::String(s) if s.is_empty() => None,
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            other => Some(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn envelope(data: Value) -> UploadEnvelope {
        UploadEnvelope {
            timestamp: "2024-01-01T00:00:00.000Z".into(),
            status: 201,
            error: None,
            path: Some("/arquivo/upload".into()),
            data,
        }
    }

    #[test]
    fn test_reference_from_string_and_number() {
        assert_eq!(envelope(json!("/enc/a.bin")).encrypted_file_reference().as_deref(), Some("/enc/a.bin"));
        assert_eq!(envelope(json!(42)).encrypted_file_reference().as_deref(), Some("42"));
    }

    #[test]
    fn test_reference_from_object_is_json_text() {
        let reference = envelope(json!({"id": 7})).encrypted_file_reference();
        assert_eq!(reference.as_deref(), Some(r#"{"id":7}"#));
    }

    #[test]
    fn test_no_reference_for_null() {
        assert!(envelope(Value::Null).encrypted_file_reference().is_none());
    }
}
