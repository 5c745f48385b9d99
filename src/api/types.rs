// src/api/types.rs - Wire types for both backends

use serde::{Deserialize, Serialize};

// ── Auth ────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordChangeRequest {
    pub current_password: String,
    pub new_password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpdateNameRequest {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub name: String,
}

/// `{"message": "..."}` acknowledgement returned by signup and the user updates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: i64,
    pub email: String,
    pub name: String,
    #[serde(default)]
    pub created_at: Option<String>,
}

// ── Analysis ────────────────────────────────────────────────────

/// Immediate result of an upload, as produced by the analysis backend. The
/// primary backend adds `analysis_id` once it has stored the result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis_id: Option<i64>,
    #[serde(default)]
    pub file_id: String,
    pub file_name: String,
    #[serde(default)]
    pub row_count: u64,
    #[serde(default)]
    pub column_count: u64,
    #[serde(default)]
    pub columns: Vec<String>,
    #[serde(default)]
    pub statistics: Vec<ColumnStatistics>,
    #[serde(default)]
    pub charts: Vec<ChartInfo>,
    #[serde(default)]
    pub summary: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnStatistics {
    pub column_name: String,
    #[serde(default)]
    pub data_type: String,
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub unique: u64,
    #[serde(default)]
    pub missing: u64,
    #[serde(default)]
    pub mean: Option<f64>,
    #[serde(default)]
    pub std: Option<f64>,
    #[serde(default)]
    pub min: Option<f64>,
    #[serde(default)]
    pub max: Option<f64>,
    /// Most frequent value, for categorical columns.
    #[serde(default)]
    pub top: Option<String>,
}

/// Chart descriptor. The image itself is rendered server-side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartInfo {
    #[serde(default)]
    pub chart_type: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisHistoryItem {
    pub id: i64,
    #[serde(default)]
    pub file_name: String,
    #[serde(default)]
    pub file_id: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub thumbnail_path: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// A stored analysis. `result_data` is the serialized result payload, parsed
/// on demand with [`crate::api::payload::AnalysisPayload::parse`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisDetail {
    pub id: i64,
    #[serde(default)]
    pub file_name: String,
    #[serde(default)]
    pub file_id: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub result_data: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_change_is_camel_case() {
        let body = serde_json::to_value(PasswordChangeRequest {
            current_password: "old-pass".into(),
            new_password: "new-pass".into(),
        })
        .unwrap();
        assert_eq!(body["currentPassword"], "old-pass");
        assert_eq!(body["newPassword"], "new-pass");
    }

    #[test]
    fn test_login_response_parses() {
        let resp: LoginResponse = serde_json::from_str(
            r#"{"accessToken":"abc","tokenType":"Bearer","email":"a@b.c","name":"Ann"}"#,
        )
        .unwrap();
        assert_eq!(resp.access_token, "abc");
        assert_eq!(resp.token_type.as_deref(), Some("Bearer"));
        assert_eq!(resp.name, "Ann");
    }

    #[test]
    fn test_analysis_result_tolerates_missing_fields() {
        let result: AnalysisResult = serde_json::from_str(
            r#"{"file_name":"sales.csv","row_count":120,"column_count":5,
                "columns":["a","b","c","d","e"],
                "charts":[{"title":"Histogram","chart_type":"bar"}]}"#,
        )
        .unwrap();
        assert_eq!(result.file_name, "sales.csv");
        assert!(result.analysis_id.is_none());
        assert!(result.statistics.is_empty());
        assert_eq!(result.charts[0].url, "");
        assert_eq!(result.file_id, "");
    }

    #[test]
    fn test_column_statistics_nulls() {
        let stat: ColumnStatistics = serde_json::from_str(
            r#"{"column_name":"city","data_type":"object","count":10,"unique":4,
                "missing":2,"mean":null,"min":null,"max":null,"top":"Seoul"}"#,
        )
        .unwrap();
        assert!(stat.mean.is_none());
        assert_eq!(stat.top.as_deref(), Some("Seoul"));
        assert_eq!(stat.missing, 2);
    }

    #[test]
    fn test_history_item_camel_case() {
        let items: Vec<AnalysisHistoryItem> = serde_json::from_str(
            r#"[{"id":3,"fileName":"q1.xlsx","fileId":"f-3","summary":"ok",
                 "thumbnailPath":"/api/analysis/chart/f-3/bar","createdAt":"2026-03-01T09:30:00"}]"#,
        )
        .unwrap();
        assert_eq!(items[0].id, 3);
        assert_eq!(items[0].file_name, "q1.xlsx");
        assert_eq!(items[0].created_at.as_deref(), Some("2026-03-01T09:30:00"));
    }
}
