use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;

use crate::id::AssetId;

/// Status of a long-running asset operation.
///
/// Returned both as the immediate body of an upload and by each poll of the
/// operation url. `done` stays false while the job is still running, in which
/// case neither `response` nor `error` is present.
#[derive(Clone, Debug, Deserialize)]
pub struct OperationResponse {
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub done: bool,
    #[serde(default)]
    pub response: Option<AssetOperationResult>,
    #[serde(default)]
    pub error: Option<OperationError>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct AssetOperationResult {
    #[serde(rename = "assetId")]
    pub asset_id: AssetId,
    /// A new revision is committed whenever the asset content changes.
    #[serde(rename = "revisionId", default)]
    pub revision_id: Option<String>,
    #[serde(rename = "revisionCreateTime", default)]
    pub revision_create_time: Option<DateTime<Utc>>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct OperationError {
    #[serde(default)]
    pub code: i64,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub details: Value,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pending_operation() {
        let body = r#"{"path": "operations/abc", "done": false}"#;
        let operation = serde_json::from_str::<OperationResponse>(body).unwrap();
        assert!(!operation.done);
        assert!(operation.response.is_none());
        assert!(operation.error.is_none());
    }

    #[test]
    fn completed_operation_parses_revision_timestamp() {
        let body = r#"{
            "path": "operations/abc",
            "done": true,
            "response": {
                "assetId": "7132858975",
                "revisionId": "2",
                "revisionCreateTime": "2024-03-01T12:30:45.120Z"
            }
        }"#;
        let operation = serde_json::from_str::<OperationResponse>(body).unwrap();
        assert!(operation.done);
        let result = operation.response.unwrap();
        assert_eq!(result.asset_id, AssetId(7_132_858_975));
        assert_eq!(result.revision_id.as_deref(), Some("2"));
        let time = result.revision_create_time.unwrap();
        assert_eq!(time.timestamp(), 1_709_296_245);
    }

    #[test]
    fn failed_operation_carries_error() {
        let body = r#"{
            "done": true,
            "error": { "code": 3, "message": "moderation rejected the asset" }
        }"#;
        let operation = serde_json::from_str::<OperationResponse>(body).unwrap();
        assert!(operation.done);
        let error = operation.error.unwrap();
        assert_eq!(error.code, 3);
        assert_eq!(error.message, "moderation rejected the asset");
    }

    #[test]
    fn done_defaults_to_false() {
        let operation = serde_json::from_str::<OperationResponse>("{}").unwrap();
        assert!(!operation.done);
    }
}
