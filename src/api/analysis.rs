// src/api/analysis.rs - Upload, history and chart endpoints

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};

use super::types::*;
use super::{send_json, send_text, AnalysisApi, ApiClient};
use crate::infra::errors::DropSeeError;
use crate::upload::UploadedFile;

/// `{origin}/api/analysis/chart/{file_id}/{chart_type}`
pub fn chart_url(origin: &str, file_id: &str, chart_type: &str) -> String {
    format!(
        "{}/api/analysis/chart/{}/{}",
        origin.trim_end_matches('/'),
        file_id,
        chart_type
    )
}

/// Resolve a stored chart URL: relative paths are joined to the analysis
/// origin, anything else is used as-is. Empty stays empty.
pub fn resolve_chart_url(origin: &str, url: &str) -> String {
    if url.is_empty() {
        return String::new();
    }
    if url.starts_with('/') {
        return format!("{}{}", origin.trim_end_matches('/'), url);
    }
    url.to_string()
}

/// Decode the body of an authenticated upload. The primary backend relays
/// the analysis result as text; depending on how it was relayed, the JSON
/// may arrive once more wrapped in a JSON string, so a string is decoded a
/// second time.
pub fn decode_upload_body(body: &str) -> Result<AnalysisResult, DropSeeError> {
    let value: serde_json::Value =
        serde_json::from_str(body).map_err(|e| DropSeeError::Decode(e.to_string()))?;
    let value = match value {
        serde_json::Value::String(inner) => {
            tracing::debug!("Upload response was a JSON string; decoding a second time");
            serde_json::from_str(&inner).map_err(|e| DropSeeError::Decode(e.to_string()))?
        }
        v => v,
    };
    serde_json::from_value(value).map_err(|e| DropSeeError::Decode(e.to_string()))
}

async fn file_form(file: &UploadedFile) -> Result<Form, DropSeeError> {
    let bytes = file.read_bytes().await?;
    let part = Part::bytes(bytes)
        .file_name(file.name().to_string())
        .mime_str(file.kind().mime_type())?;
    Ok(Form::new().part("file", part))
}

#[async_trait]
impl AnalysisApi for ApiClient {
    async fn upload_file(
        &self,
        token: &str,
        file: &UploadedFile,
    ) -> Result<AnalysisResult, DropSeeError> {
        tracing::debug!("POST /analysis/upload ({}, {} bytes)", file.name(), file.size());
        let form = file_form(file).await?;
        let body = send_text(
            self.http()
                .post(self.api_url("/analysis/upload"))
                .bearer_auth(token)
                .multipart(form),
        )
        .await?;
        decode_upload_body(&body)
    }

    async fn upload_file_direct(
        &self,
        file: &UploadedFile,
    ) -> Result<AnalysisResult, DropSeeError> {
        tracing::debug!(
            "POST {{analysis}}/api/analysis/upload ({}, {} bytes)",
            file.name(),
            file.size()
        );
        let form = file_form(file).await?;
        let response = self
            .http()
            .post(self.analysis_endpoint("/api/analysis/upload"))
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            // Only `detail` is meaningful on this backend's error bodies.
            let body = response.text().await.unwrap_or_default();
            let detail = serde_json::from_str::<serde_json::Value>(&body)
                .ok()
                .and_then(|v| v.get("detail").and_then(|d| d.as_str()).map(str::to_string))
                .filter(|d| !d.trim().is_empty());
            return Err(DropSeeError::Http {
                status: status.as_u16(),
                message: detail,
            });
        }

        response
            .json::<AnalysisResult>()
            .await
            .map_err(|e| DropSeeError::Decode(e.to_string()))
    }

    async fn get_history(&self, token: &str) -> Result<Vec<AnalysisHistoryItem>, DropSeeError> {
        tracing::debug!("GET /analysis/history");
        let items: Option<Vec<AnalysisHistoryItem>> =
            send_json(self.http().get(self.api_url("/analysis/history")).bearer_auth(token))
                .await?;
        Ok(items.unwrap_or_default())
    }

    async fn get_analysis(&self, token: &str, id: &str) -> Result<AnalysisDetail, DropSeeError> {
        let url = self.api_url_with_segment("/analysis", id)?;
        tracing::debug!("GET {url}");
        send_json(self.http().get(url).bearer_auth(token)).await
    }

    fn analysis_origin(&self) -> &str {
        &self.analysis_url
    }
}
