// src/pages/auth.rs - Login and signup forms, logout

use anyhow::Result;

use crate::api::types::{LoginRequest, SignupRequest};
use crate::api::AuthApi;
use crate::infra::errors::ValidationError;
use crate::infra::session::{Session, SessionContext};
use crate::router::{DASHBOARD_PATH, LOGIN_PATH};

use super::messages;
use super::mypage::MIN_PASSWORD_LEN;

/// Where a successful submit sends the user, plus an optional one-shot hint
/// for the next page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirect {
    pub path: &'static str,
    pub notice: Option<&'static str>,
}

#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
    error: Option<String>,
    loading: bool,
}

impl LoginForm {
    pub fn new(email: &str, password: &str) -> Self {
        Self {
            email: email.to_string(),
            password: password.to_string(),
            ..Default::default()
        }
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Log in and store the session. The form keeps its fields on failure.
    pub async fn submit(
        &mut self,
        session: &mut SessionContext,
        api: &dyn AuthApi,
    ) -> Option<Redirect> {
        if self.loading {
            return None;
        }
        let email = self.email.trim().to_string();
        if email.is_empty() || self.password.is_empty() {
            self.error = Some(ValidationError::EmptyField.to_string());
            return None;
        }

        self.loading = true;
        let outcome = api
            .login(LoginRequest {
                email,
                password: self.password.clone(),
            })
            .await;
        self.loading = false;

        let response = match outcome {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!("Login failed: {e}");
                self.error = Some(e.user_message(messages::LOGIN_FAILED));
                return None;
            }
        };

        let established = session.establish(Session::new(
            response.access_token,
            response.name,
            response.email,
        ));
        if let Err(e) = established {
            tracing::warn!("{}: {e:#}", messages::SESSION_SAVE_FAILED);
            self.error = Some(messages::SESSION_SAVE_FAILED.to_string());
            return None;
        }
        self.error = None;
        self.password.clear();
        Some(Redirect {
            path: DASHBOARD_PATH,
            notice: None,
        })
    }
}

/// Signup checks: every field filled, confirmation matching, then length.
pub fn validate_signup(
    name: &str,
    email: &str,
    password: &str,
    confirm: &str,
) -> Result<(), ValidationError> {
    if name.trim().is_empty() || email.trim().is_empty() || password.is_empty() {
        return Err(ValidationError::EmptyField);
    }
    if password != confirm {
        return Err(ValidationError::PasswordMismatch);
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ValidationError::PasswordTooShort {
            min: MIN_PASSWORD_LEN,
        });
    }
    Ok(())
}

#[derive(Debug, Clone, Default)]
pub struct SignupForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    error: Option<String>,
    loading: bool,
}

impl SignupForm {
    pub fn new(name: &str, email: &str, password: &str, confirm_password: &str) -> Self {
        Self {
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
            confirm_password: confirm_password.to_string(),
            ..Default::default()
        }
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Register the account. Success sends the user to the login page.
    pub async fn submit(&mut self, api: &dyn AuthApi) -> Option<Redirect> {
        if self.loading {
            return None;
        }
        if let Err(v) = validate_signup(&self.name, &self.email, &self.password, &self.confirm_password) {
            self.error = Some(v.to_string());
            return None;
        }

        self.loading = true;
        let outcome = api
            .signup(SignupRequest {
                name: self.name.trim().to_string(),
                email: self.email.trim().to_string(),
                password: self.password.clone(),
            })
            .await;
        self.loading = false;

        match outcome {
            Ok(_) => {
                tracing::info!("Signed up {}", self.email.trim());
                self.error = None;
                Some(Redirect {
                    path: LOGIN_PATH,
                    notice: Some(messages::SIGNUP_COMPLETE),
                })
            }
            Err(e) => {
                self.error = Some(e.user_message(messages::SIGNUP_FAILED));
                None
            }
        }
    }
}

/// Forget the session and go back to the login page.
pub fn logout(session: &mut SessionContext) -> Result<Redirect> {
    session.clear()?;
    Ok(Redirect {
        path: LOGIN_PATH,
        notice: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::session::SessionStore;
    use crate::pages::testing::FakeAuth;

    fn signup_form(password: &str, confirm: &str) -> SignupForm {
        SignupForm::new("Mina", "mina@example.com", password, confirm)
    }

    #[test]
    fn test_signup_checks_mismatch_before_length() {
        assert_eq!(
            validate_signup("a", "b", "abc", "abd"),
            Err(ValidationError::PasswordMismatch)
        );
        assert_eq!(
            validate_signup("a", "b", "abc", "abc"),
            Err(ValidationError::PasswordTooShort { min: 6 })
        );
        assert_eq!(
            validate_signup(" ", "b", "abcdef", "abcdef"),
            Err(ValidationError::EmptyField)
        );
        assert_eq!(validate_signup("a", "b", "abcdef", "abcdef"), Ok(()));
    }

    #[tokio::test]
    async fn test_signup_success_redirects_to_login() {
        let api = FakeAuth::default();
        let mut form = signup_form("secret1", "secret1");
        let redirect = form.submit(&api).await;
        assert_eq!(
            redirect,
            Some(Redirect {
                path: "/login",
                notice: Some("Sign-up complete. Please log in."),
            })
        );
        assert_eq!(api.calls(), vec!["signup:mina@example.com"]);
    }

    #[tokio::test]
    async fn test_signup_invalid_makes_no_call() {
        let api = FakeAuth::default();
        let mut form = signup_form("short", "short");
        assert!(form.submit(&api).await.is_none());
        assert_eq!(form.error(), Some("Password must be at least 6 characters."));
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn test_signup_failure_shows_server_message() {
        let api = FakeAuth::failing(409, Some("Email already registered"));
        let mut form = signup_form("secret1", "secret1");
        assert!(form.submit(&api).await.is_none());
        assert_eq!(form.error(), Some("Email already registered"));
        assert_eq!(form.email, "mina@example.com");
    }

    #[tokio::test]
    async fn test_login_stores_session_and_goes_to_dashboard() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path().join("session.json"));
        let mut session = SessionContext::load(store.clone());
        let api = FakeAuth::default();

        let mut form = LoginForm::new("mina@example.com", "secret1");
        let redirect = form.submit(&mut session, &api).await;

        assert_eq!(redirect.unwrap().path, "/dashboard");
        assert_eq!(session.token(), Some("tok-new"));
        assert_eq!(session.display_name(), "Mina");
        assert_eq!(store.load().unwrap().unwrap().token, "tok-new");
        assert!(form.password.is_empty());
    }

    #[tokio::test]
    async fn test_login_failure_keeps_form() {
        let api = FakeAuth::failing(401, None);
        let mut session = SessionContext::in_memory(None);
        let mut form = LoginForm::new("mina@example.com", "wrong");
        assert!(form.submit(&mut session, &api).await.is_none());
        assert_eq!(form.error(), Some(messages::LOGIN_FAILED));
        assert_eq!(form.password, "wrong");
        assert!(!session.is_authenticated());
    }

    #[tokio::test]
    async fn test_login_requires_both_fields() {
        let api = FakeAuth::default();
        let mut session = SessionContext::in_memory(None);
        let mut form = LoginForm::new("  ", "pw");
        assert!(form.submit(&mut session, &api).await.is_none());
        assert!(api.calls().is_empty());
    }

    #[test]
    fn test_logout_clears_session() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path().join("session.json"));
        store.save(&Session::new("tok", "Mina", "m@x")).unwrap();
        let mut session = SessionContext::load(store.clone());
        assert!(session.is_authenticated());

        let redirect = logout(&mut session).unwrap();
        assert_eq!(redirect.path, "/login");
        assert!(!session.is_authenticated());
        assert!(store.load().unwrap().is_none());
    }
}
