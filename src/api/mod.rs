// src/api/mod.rs - REST clients for the primary and analysis backends
//
// `ApiClient` owns one reqwest client and both base URLs. The `AuthApi` and
// `AnalysisApi` traits are the seam the pages depend on, so page logic can be
// exercised without a network.

pub mod analysis;
pub mod auth;
pub mod payload;
pub mod types;

use async_trait::async_trait;
use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;

use crate::infra::config::ApiConfig;
use crate::infra::errors::DropSeeError;
use crate::upload::UploadedFile;
use types::*;

/// Authentication and account calls against the primary backend.
#[async_trait]
pub trait AuthApi: Send + Sync {
    async fn signup(&self, request: SignupRequest) -> Result<MessageResponse, DropSeeError>;

    async fn login(&self, request: LoginRequest) -> Result<LoginResponse, DropSeeError>;

    async fn get_my_info(&self, token: &str) -> Result<UserProfile, DropSeeError>;

    async fn change_password(
        &self,
        token: &str,
        request: PasswordChangeRequest,
    ) -> Result<MessageResponse, DropSeeError>;

    async fn update_name(&self, token: &str, name: &str) -> Result<MessageResponse, DropSeeError>;
}

/// Upload and history calls.
#[async_trait]
pub trait AnalysisApi: Send + Sync {
    /// Authenticated upload through the primary backend (result is persisted).
    async fn upload_file(
        &self,
        token: &str,
        file: &UploadedFile,
    ) -> Result<AnalysisResult, DropSeeError>;

    /// Anonymous upload straight to the analysis backend (nothing persisted).
    async fn upload_file_direct(&self, file: &UploadedFile)
        -> Result<AnalysisResult, DropSeeError>;

    async fn get_history(&self, token: &str) -> Result<Vec<AnalysisHistoryItem>, DropSeeError>;

    async fn get_analysis(&self, token: &str, id: &str) -> Result<AnalysisDetail, DropSeeError>;

    /// Origin of the analysis backend, used to resolve relative chart URLs.
    fn analysis_origin(&self) -> &str;

    /// Image URL for one chart of an uploaded file. No network call.
    fn chart_url(&self, file_id: &str, chart_type: &str) -> String {
        analysis::chart_url(self.analysis_origin(), file_id, chart_type)
    }
}

/// HTTP client for both backends.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
    analysis_url: String,
}

impl ApiClient {
    pub fn new(config: &ApiConfig) -> Self {
        Self::with_client(reqwest::Client::new(), config)
    }

    pub fn with_client(client: reqwest::Client, config: &ApiConfig) -> Self {
        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            analysis_url: config.analysis_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Primary-backend URL for `path` (which starts with `/`).
    fn api_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Primary-backend URL for `path` with `segment` appended as one
    /// percent-encoded path segment.
    fn api_url_with_segment(&self, path: &str, segment: &str) -> Result<reqwest::Url, DropSeeError> {
        let mut url = reqwest::Url::parse(&self.api_url(path))
            .map_err(|e| DropSeeError::Config(format!("invalid API URL: {e}")))?;
        let url_display = url.to_string();
        url.path_segments_mut()
            .map_err(|_| DropSeeError::Config(format!("API URL cannot take a path: {url_display}")))?
            .push(segment);
        Ok(url)
    }

    /// Analysis-backend URL for `path` (which starts with `/`).
    fn analysis_endpoint(&self, path: &str) -> String {
        format!("{}{}", self.analysis_url, path)
    }

    fn http(&self) -> &reqwest::Client {
        &self.client
    }
}

/// Send a request and return the raw body of a success response. Non-success
/// statuses become `DropSeeError::Http` with the body's error message.
pub(crate) async fn send_text(request: RequestBuilder) -> Result<String, DropSeeError> {
    let response = request.send().await?;
    let status = response.status();

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        tracing::debug!("HTTP {} error body: {}", status, crate::util::truncate_str(&body, 300));
        return Err(DropSeeError::Http {
            status: status.as_u16(),
            message: extract_error_message(&body),
        });
    }
    Ok(response.text().await?)
}

/// Send a request and decode a JSON success body.
pub(crate) async fn send_json<T: DeserializeOwned>(
    request: RequestBuilder,
) -> Result<T, DropSeeError> {
    let body = send_text(request).await?;
    serde_json::from_str(&body).map_err(|e| DropSeeError::Decode(e.to_string()))
}

/// Pull a human-readable message out of an error body: the first string among
/// `message`, `detail` and `error`, or a short plain-text body.
pub fn extract_error_message(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }
    match serde_json::from_str::<serde_json::Value>(trimmed) {
        Ok(serde_json::Value::Object(obj)) => ["message", "detail", "error"]
            .iter()
            .filter_map(|k| obj.get(*k).and_then(|v| v.as_str()))
            .map(str::trim)
            .find(|s| !s.is_empty())
            .map(str::to_string),
        Ok(serde_json::Value::String(s)) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Ok(_) => None,
        Err(_) if !trimmed.starts_with('<') && trimmed.len() <= 300 => Some(trimmed.to_string()),
        Err(_) => None,
    }
}
