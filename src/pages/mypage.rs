// src/pages/mypage.rs - Profile, cached history list and account changes

use std::time::{Duration, Instant};

use crate::api::types::{AnalysisHistoryItem, PasswordChangeRequest, UserProfile};
use crate::api::{AnalysisApi, AuthApi};
use crate::infra::errors::{DropSeeError, ValidationError};
use crate::infra::session::SessionContext;
use crate::router::analysis_path;
use crate::util::{format_timestamp, PLACEHOLDER};

use super::messages;

pub const MIN_PASSWORD_LEN: usize = 6;

/// How long a confirmation notice stays on screen.
pub const NOTICE_TTL: Duration = Duration::from_secs(3);

/// Check a password change before anything is sent. Order matters: empty
/// fields, then length, then confirmation.
pub fn validate_password_change(
    current: &str,
    new: &str,
    confirm: &str,
) -> Result<(), ValidationError> {
    if current.is_empty() || new.is_empty() || confirm.is_empty() {
        return Err(ValidationError::EmptyField);
    }
    if new.chars().count() < MIN_PASSWORD_LEN {
        return Err(ValidationError::PasswordTooShort {
            min: MIN_PASSWORD_LEN,
        });
    }
    if new != confirm {
        return Err(ValidationError::PasswordMismatch);
    }
    Ok(())
}

/// The change-password dialog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PasswordDialog {
    pub open: bool,
    pub current_password: String,
    pub new_password: String,
    pub confirm_password: String,
    pub error: Option<String>,
    pub submitting: bool,
}

impl PasswordDialog {
    pub fn open(&mut self) {
        self.open = true;
        self.error = None;
    }

    /// Close and forget whatever was typed.
    pub fn close(&mut self) {
        *self = Self::default();
    }

    pub fn set_fields(&mut self, current: &str, new: &str, confirm: &str) {
        self.current_password = current.to_string();
        self.new_password = new.to_string();
        self.confirm_password = confirm.to_string();
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryRow {
    pub id: i64,
    pub file_name: String,
    pub summary: String,
    pub created_at: String,
    pub detail_path: String,
}

impl HistoryRow {
    fn from_item(item: &AnalysisHistoryItem) -> Self {
        Self {
            id: item.id,
            file_name: item.file_name.clone(),
            summary: item.summary.clone().unwrap_or_default(),
            created_at: format_timestamp(item.created_at.as_deref()),
            detail_path: analysis_path(&item.id.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileView {
    pub name: String,
    pub email: String,
    pub member_since: String,
}

#[derive(Debug, Clone, Default)]
pub struct MyPage {
    profile: Option<UserProfile>,
    /// `None` until the first successful fetch; never refetched afterwards.
    history: Option<Vec<AnalysisHistoryItem>>,
    history_open: bool,
    history_loading: bool,
    selected: usize,
    pub password: PasswordDialog,
    error: Option<String>,
    /// Confirmation text and when it was shown.
    notice: Option<(String, Instant)>,
}

impl MyPage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_ref().map(|(text, _)| text.as_str())
    }

    fn show_notice(&mut self, text: &str) {
        self.notice = Some((text.to_string(), Instant::now()));
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    /// Drop the notice once it has been visible for `NOTICE_TTL`.
    pub fn expire_notice(&mut self, now: Instant) {
        if let Some((_, shown)) = &self.notice {
            if now.saturating_duration_since(*shown) >= NOTICE_TTL {
                self.notice = None;
            }
        }
    }

    pub fn is_history_open(&self) -> bool {
        self.history_open
    }

    pub fn is_history_loading(&self) -> bool {
        self.history_loading
    }

    pub fn history(&self) -> Option<&[AnalysisHistoryItem]> {
        self.history.as_deref()
    }

    /// Rows to list, empty while collapsed.
    pub fn history_rows(&self) -> Vec<HistoryRow> {
        match (&self.history, self.history_open) {
            (Some(items), true) => items.iter().map(HistoryRow::from_item).collect(),
            _ => Vec::new(),
        }
    }

    pub fn profile_view(&self, session: &SessionContext) -> ProfileView {
        match &self.profile {
            Some(p) => ProfileView {
                name: p.name.clone(),
                email: p.email.clone(),
                member_since: format_timestamp(p.created_at.as_deref()),
            },
            None => ProfileView {
                name: session.display_name().to_string(),
                email: session.email().to_string(),
                member_since: PLACEHOLDER.to_string(),
            },
        }
    }

    // ── Profile ──────────────────────────────────────────────────

    pub async fn load_profile(&mut self, session: &mut SessionContext, api: &dyn AuthApi) {
        let Some(token) = session.token().map(str::to_string) else {
            self.error = Some(DropSeeError::NotAuthenticated.to_string());
            return;
        };
        match api.get_my_info(&token).await {
            Ok(profile) => {
                if let Err(e) = session.refresh_profile(&profile.name, &profile.email) {
                    tracing::warn!("{}: {e}", messages::SESSION_SAVE_FAILED);
                }
                self.profile = Some(profile);
            }
            Err(e) => {
                tracing::warn!("Profile fetch failed: {e}");
                self.error = Some(e.user_message(messages::PROFILE_LOAD_FAILED));
            }
        }
    }

    /// Change the display name on the server, then in the stored session.
    pub async fn rename(&mut self, session: &mut SessionContext, api: &dyn AuthApi, name: &str) {
        let name = name.trim();
        if name.is_empty() {
            self.error = Some(ValidationError::EmptyName.to_string());
            return;
        }
        let Some(token) = session.token().map(str::to_string) else {
            self.error = Some(DropSeeError::NotAuthenticated.to_string());
            return;
        };
        match api.update_name(&token, name).await {
            Ok(_) => {
                if let Err(e) = session.set_display_name(name) {
                    tracing::warn!("{}: {e}", messages::SESSION_SAVE_FAILED);
                }
                if let Some(p) = self.profile.as_mut() {
                    p.name = name.to_string();
                }
                self.error = None;
                self.show_notice(messages::NAME_CHANGED);
            }
            Err(e) => {
                self.error = Some(e.user_message(messages::NAME_CHANGE_FAILED));
            }
        }
    }

    // ── History ──────────────────────────────────────────────────

    /// First call fetches and opens the list; later calls only flip
    /// visibility. A failed fetch leaves nothing cached, so the next call
    /// tries again.
    pub async fn toggle_history(&mut self, session: &SessionContext, api: &dyn AnalysisApi) {
        if self.history.is_some() {
            self.history_open = !self.history_open;
            return;
        }
        if self.history_loading {
            return;
        }
        let Some(token) = session.token() else {
            self.error = Some(DropSeeError::NotAuthenticated.to_string());
            return;
        };

        self.history_loading = true;
        let outcome = api.get_history(token).await;
        self.history_loading = false;

        match outcome {
            Ok(items) => {
                tracing::debug!("Loaded {} history entries", items.len());
                self.history = Some(items);
                self.history_open = true;
                self.selected = 0;
                self.error = None;
            }
            Err(e) => {
                tracing::warn!("History fetch failed: {e}");
                self.history_open = false;
                self.error = Some(messages::HISTORY_LOAD_FAILED.to_string());
            }
        }
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn select_next(&mut self) {
        let len = self.history_rows().len();
        if len > 0 {
            self.selected = (self.selected + 1).min(len - 1);
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    /// Detail path of the highlighted history entry, when the list is open.
    pub fn selected_detail_path(&self) -> Option<String> {
        self.history_rows()
            .get(self.selected)
            .map(|row| row.detail_path.clone())
    }

    // ── Password ─────────────────────────────────────────────────

    /// Submit the dialog. Invalid input never reaches the server.
    pub async fn change_password(&mut self, session: &SessionContext, api: &dyn AuthApi) {
        if self.password.submitting {
            return;
        }
        let dialog = &self.password;
        if let Err(v) = validate_password_change(
            &dialog.current_password,
            &dialog.new_password,
            &dialog.confirm_password,
        ) {
            self.password.error = Some(v.to_string());
            return;
        }
        let Some(token) = session.token() else {
            self.password.error = Some(DropSeeError::NotAuthenticated.to_string());
            return;
        };

        let request = PasswordChangeRequest {
            current_password: self.password.current_password.clone(),
            new_password: self.password.new_password.clone(),
        };
        self.password.submitting = true;
        let outcome = api.change_password(token, request).await;
        self.password.submitting = false;

        match outcome {
            Ok(_) => {
                tracing::info!("Password changed");
                self.password.close();
                self.error = None;
                self.show_notice(messages::PASSWORD_CHANGED);
            }
            Err(e) => {
                self.password.error = Some(e.user_message(messages::PASSWORD_CHANGE_FAILED));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::session::Session;
    use crate::pages::testing::{FakeAnalysis, FakeAuth};
    use pretty_assertions::assert_eq;

    fn logged_in() -> SessionContext {
        SessionContext::in_memory(Some(Session::new("tok", "Mina", "mina@example.com")))
    }

    fn history_item(id: i64, name: &str) -> AnalysisHistoryItem {
        AnalysisHistoryItem {
            id,
            file_name: name.into(),
            file_id: None,
            summary: Some("ok".into()),
            thumbnail_path: None,
            created_at: Some("2026-02-03T04:05:06".into()),
        }
    }

    #[test]
    fn test_password_validation_order() {
        assert_eq!(
            validate_password_change("", "abc", "xyz"),
            Err(ValidationError::EmptyField)
        );
        assert_eq!(
            validate_password_change("old", "abc", "xyz"),
            Err(ValidationError::PasswordTooShort { min: 6 })
        );
        assert_eq!(
            validate_password_change("old", "abcdef", "abcdeg"),
            Err(ValidationError::PasswordMismatch)
        );
        assert_eq!(validate_password_change("old", "abcdef", "abcdef"), Ok(()));
    }

    #[tokio::test]
    async fn test_invalid_password_never_calls_api() {
        let api = FakeAuth::default();
        let mut page = MyPage::new();
        page.password.open();
        for (cur, new, confirm) in [("", "", ""), ("old", "abc", "abc"), ("old", "abcdef", "zzzzzz")] {
            page.password.set_fields(cur, new, confirm);
            page.change_password(&logged_in(), &api).await;
            assert!(page.password.error.is_some());
            assert!(page.password.open);
        }
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn test_valid_password_change_calls_once_and_closes() {
        let api = FakeAuth::default();
        let mut page = MyPage::new();
        page.password.open();
        page.password.set_fields("oldpass", "newpass1", "newpass1");
        page.change_password(&logged_in(), &api).await;

        assert_eq!(api.calls(), vec!["password:tok:oldpass:newpass1"]);
        assert_eq!(page.password, PasswordDialog::default());
        assert_eq!(page.notice(), Some(messages::PASSWORD_CHANGED));
    }

    #[tokio::test]
    async fn test_password_failure_keeps_dialog_open() {
        let api = FakeAuth::failing(400, Some("Current password is incorrect"));
        let mut page = MyPage::new();
        page.password.open();
        page.password.set_fields("wrong", "newpass1", "newpass1");
        page.change_password(&logged_in(), &api).await;

        assert!(page.password.open);
        assert_eq!(
            page.password.error.as_deref(),
            Some("Current password is incorrect")
        );
        assert_eq!(page.password.new_password, "newpass1");
        assert!(page.notice().is_none());

        let api = FakeAuth::failing(500, None);
        page.change_password(&logged_in(), &api).await;
        assert_eq!(
            page.password.error.as_deref(),
            Some(messages::PASSWORD_CHANGE_FAILED)
        );
    }

    #[tokio::test]
    async fn test_password_success_replaces_earlier_error() {
        let mut session = logged_in();
        let mut page = MyPage::new();
        page.load_profile(&mut session, &FakeAuth::failing(500, None)).await;
        assert_eq!(page.error(), Some(messages::PROFILE_LOAD_FAILED));

        page.password.open();
        page.password.set_fields("oldpass", "newpass1", "newpass1");
        page.change_password(&session, &FakeAuth::default()).await;

        assert!(page.error().is_none());
        assert_eq!(page.notice(), Some(messages::PASSWORD_CHANGED));
    }

    #[tokio::test]
    async fn test_notice_expires_after_ttl() {
        let mut page = MyPage::new();
        page.password.open();
        page.password.set_fields("oldpass", "newpass1", "newpass1");
        page.change_password(&logged_in(), &FakeAuth::default()).await;

        page.expire_notice(Instant::now());
        assert_eq!(page.notice(), Some(messages::PASSWORD_CHANGED));

        page.expire_notice(Instant::now() + NOTICE_TTL);
        assert!(page.notice().is_none());
    }

    #[tokio::test]
    async fn test_history_fetched_once_then_toggled() {
        let api = FakeAnalysis {
            history: vec![history_item(3, "a.csv"), history_item(4, "b.json")],
            ..Default::default()
        };
        let session = logged_in();
        let mut page = MyPage::new();

        page.toggle_history(&session, &api).await;
        assert!(page.is_history_open());
        assert_eq!(page.history_rows().len(), 2);

        page.toggle_history(&session, &api).await;
        assert!(!page.is_history_open());
        assert!(page.history_rows().is_empty());

        page.toggle_history(&session, &api).await;
        assert!(page.is_history_open());
        assert_eq!(api.calls(), vec!["history:tok"]);
    }

    #[tokio::test]
    async fn test_history_failure_retries_next_time() {
        let failing = FakeAnalysis::failing(500, None);
        let session = logged_in();
        let mut page = MyPage::new();

        page.toggle_history(&session, &failing).await;
        assert_eq!(page.error(), Some(messages::HISTORY_LOAD_FAILED));
        assert!(page.history().is_none());
        assert!(!page.is_history_open());

        let ok = FakeAnalysis {
            history: vec![history_item(3, "a.csv")],
            ..Default::default()
        };
        page.toggle_history(&session, &ok).await;
        assert_eq!(ok.calls(), vec!["history:tok"]);
        assert!(page.is_history_open());
        assert!(page.error().is_none());
    }

    #[tokio::test]
    async fn test_history_rows_and_selection() {
        let api = FakeAnalysis {
            history: vec![history_item(3, "a.csv"), history_item(4, "b.json")],
            ..Default::default()
        };
        let mut page = MyPage::new();
        assert_eq!(page.selected_detail_path(), None);
        page.toggle_history(&logged_in(), &api).await;

        let rows = page.history_rows();
        assert_eq!(rows[0].created_at, "2026-02-03 04:05");
        assert_eq!(rows[0].detail_path, "/analysis/3");

        page.select_next();
        page.select_next();
        assert_eq!(page.selected_detail_path().as_deref(), Some("/analysis/4"));
        page.select_prev();
        assert_eq!(page.selected_index(), 0);
    }

    #[tokio::test]
    async fn test_load_profile_refreshes_session() {
        let api = FakeAuth {
            profile: Some(UserProfile {
                id: 1,
                email: "new@example.com".into(),
                name: "Minji".into(),
                created_at: Some("2025-12-24T10:00:00Z".into()),
            }),
            ..Default::default()
        };
        let mut session = logged_in();
        let mut page = MyPage::new();
        assert_eq!(page.profile_view(&session).member_since, "-");

        page.load_profile(&mut session, &api).await;
        assert_eq!(session.display_name(), "Minji");
        assert_eq!(session.email(), "new@example.com");
        assert_eq!(
            page.profile_view(&session),
            ProfileView {
                name: "Minji".into(),
                email: "new@example.com".into(),
                member_since: "2025-12-24 10:00".into(),
            }
        );
    }

    #[tokio::test]
    async fn test_rename() {
        let api = FakeAuth::default();
        let mut session = logged_in();
        let mut page = MyPage::new();

        page.rename(&mut session, &api, "   ").await;
        assert_eq!(page.error(), Some("Name cannot be empty."));
        assert!(api.calls().is_empty());

        page.rename(&mut session, &api, " Jisoo ").await;
        assert_eq!(api.calls(), vec!["name:tok:Jisoo"]);
        assert_eq!(session.display_name(), "Jisoo");
        assert_eq!(page.notice(), Some(messages::NAME_CHANGED));
        assert!(page.error().is_none());
    }

    #[tokio::test]
    async fn test_logged_out_calls_nothing() {
        let auth = FakeAuth::default();
        let analysis = FakeAnalysis::default();
        let mut session = SessionContext::in_memory(None);
        let mut page = MyPage::new();
        page.toggle_history(&session, &analysis).await;
        page.load_profile(&mut session, &auth).await;
        assert!(auth.calls().is_empty());
        assert!(analysis.calls().is_empty());
        assert!(page.error().unwrap().contains("Not logged in"));
    }
}
