// src/infra/errors.rs - Error types for dropsee

use thiserror::Error;

use crate::api::payload::PayloadError;

/// Client-side validation failures. Raised before any network call is made.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Unsupported file type. Only CSV, JSON and Excel files can be uploaded.")]
    UnsupportedExtension { file_name: String },

    #[error("Please select a file.")]
    NoFileSelected,

    #[error("Please fill in every field.")]
    EmptyField,

    #[error("Password must be at least {min} characters.")]
    PasswordTooShort { min: usize },

    #[error("Passwords do not match.")]
    PasswordMismatch,

    #[error("Name cannot be empty.")]
    EmptyName,
}

#[derive(Error, Debug)]
pub enum DropSeeError {
    /// Non-success HTTP status. `message` is the conventional error field of the
    /// body (`message`, `detail` or `error`) when the server sent one.
    #[error("HTTP {status}{}", .message.as_deref().map(|m| format!(": {m}")).unwrap_or_default())]
    Http {
        status: u16,
        message: Option<String>,
    },

    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Unexpected response body: {0}")]
    Decode(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Payload(#[from] PayloadError),

    #[error("Not logged in. Run `dropsee login` first.")]
    NotAuthenticated,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl DropSeeError {
    /// Text a page shows for this error: the server-provided message or the
    /// validation text when there is one, otherwise `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            DropSeeError::Http {
                message: Some(m), ..
            } if !m.trim().is_empty() => m.clone(),
            DropSeeError::Validation(v) => v.to_string(),
            DropSeeError::NotAuthenticated => self.to_string(),
            _ => fallback.to_string(),
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            DropSeeError::Http { status, .. } => Some(*status),
            DropSeeError::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_prefers_server_text() {
        let err = DropSeeError::Http {
            status: 400,
            message: Some("Email already registered".into()),
        };
        assert_eq!(err.user_message("Sign-up failed."), "Email already registered");
    }

    #[test]
    fn test_user_message_falls_back() {
        let err = DropSeeError::Http {
            status: 500,
            message: None,
        };
        assert_eq!(err.user_message("Sign-up failed."), "Sign-up failed.");

        let blank = DropSeeError::Http {
            status: 500,
            message: Some("  ".into()),
        };
        assert_eq!(blank.user_message("fallback"), "fallback");

        let decode = DropSeeError::Decode("not json".into());
        assert_eq!(decode.user_message("fallback"), "fallback");
    }

    #[test]
    fn test_validation_message_is_shown_verbatim() {
        let err = DropSeeError::from(ValidationError::PasswordTooShort { min: 6 });
        assert_eq!(
            err.user_message("fallback"),
            "Password must be at least 6 characters."
        );
    }

    #[test]
    fn test_http_display() {
        let err = DropSeeError::Http {
            status: 404,
            message: Some("not found".into()),
        };
        assert_eq!(err.to_string(), "HTTP 404: not found");
        let bare = DropSeeError::Http {
            status: 502,
            message: None,
        };
        assert_eq!(bare.to_string(), "HTTP 502");
        assert_eq!(bare.status(), Some(502));
    }
}
