// src/api/auth.rs - Auth and account endpoints of the primary backend

use async_trait::async_trait;

use super::types::*;
use super::{send_json, send_text, ApiClient, AuthApi};
use crate::infra::errors::DropSeeError;

/// Acknowledgement bodies are informational only: an empty body is fine and a
/// non-JSON body is kept as the message.
fn parse_message(body: &str) -> MessageResponse {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return MessageResponse::default();
    }
    serde_json::from_str(trimmed).unwrap_or_else(|_| MessageResponse {
        message: Some(trimmed.to_string()),
    })
}

#[async_trait]
impl AuthApi for ApiClient {
    async fn signup(&self, request: SignupRequest) -> Result<MessageResponse, DropSeeError> {
        tracing::debug!("POST /auth/signup for {}", request.email);
        let body = send_text(self.http().post(self.api_url("/auth/signup")).json(&request)).await?;
        Ok(parse_message(&body))
    }

    async fn login(&self, request: LoginRequest) -> Result<LoginResponse, DropSeeError> {
        tracing::debug!("POST /auth/login for {}", request.email);
        send_json(self.http().post(self.api_url("/auth/login")).json(&request)).await
    }

    async fn get_my_info(&self, token: &str) -> Result<UserProfile, DropSeeError> {
        tracing::debug!("GET /users/me");
        send_json(self.http().get(self.api_url("/users/me")).bearer_auth(token)).await
    }

    async fn change_password(
        &self,
        token: &str,
        request: PasswordChangeRequest,
    ) -> Result<MessageResponse, DropSeeError> {
        tracing::debug!("PUT /users/password");
        let body = send_text(
            self.http()
                .put(self.api_url("/users/password"))
                .bearer_auth(token)
                .json(&request),
        )
        .await?;
        Ok(parse_message(&body))
    }

    async fn update_name(&self, token: &str, name: &str) -> Result<MessageResponse, DropSeeError> {
        tracing::debug!("PUT /users/name");
        let body = UpdateNameRequest {
            name: name.to_string(),
        };
        let resp = send_text(
            self.http()
                .put(self.api_url("/users/name"))
                .bearer_auth(token)
                .json(&body),
        )
        .await?;
        Ok(parse_message(&resp))
    }
}
