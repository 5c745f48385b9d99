// src/pages/dashboard.rs - File selection, upload routing and the immediate result

use std::path::Path;

use crate::api::types::AnalysisResult;
use crate::api::AnalysisApi;
use crate::infra::errors::{DropSeeError, ValidationError};
use crate::infra::session::SessionContext;
use crate::upload::UploadedFile;

use super::messages;

#[derive(Debug, Clone, PartialEq)]
pub enum Phase {
    Idle,
    FileSelected(UploadedFile),
    Analyzing(UploadedFile),
    ResultShown(AnalysisResult),
}

/// Coarse state for rendering. `Error` wins whenever an inline error is set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DashboardStatus {
    Idle,
    FileSelected,
    Analyzing,
    ResultShown,
    Error,
}

/// Which backend an analysis goes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadRoute {
    /// Through the primary backend with the session token; result is stored.
    Authenticated,
    /// Straight to the analysis backend; nothing is stored.
    Direct,
}

impl UploadRoute {
    pub fn for_session(session: &SessionContext) -> Self {
        if session.is_authenticated() {
            UploadRoute::Authenticated
        } else {
            UploadRoute::Direct
        }
    }
}

#[derive(Debug, Clone)]
pub struct DashboardPage {
    phase: Phase,
    error: Option<String>,
}

impl Default for DashboardPage {
    fn default() -> Self {
        Self::new()
    }
}

impl DashboardPage {
    pub fn new() -> Self {
        Self {
            phase: Phase::Idle,
            error: None,
        }
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn status(&self) -> DashboardStatus {
        if self.error.is_some() {
            return DashboardStatus::Error;
        }
        match self.phase {
            Phase::Idle => DashboardStatus::Idle,
            Phase::FileSelected(_) => DashboardStatus::FileSelected,
            Phase::Analyzing(_) => DashboardStatus::Analyzing,
            Phase::ResultShown(_) => DashboardStatus::ResultShown,
        }
    }

    pub fn selected_file(&self) -> Option<&UploadedFile> {
        match &self.phase {
            Phase::FileSelected(f) | Phase::Analyzing(f) => Some(f),
            _ => None,
        }
    }

    pub fn result(&self) -> Option<&AnalysisResult> {
        match &self.phase {
            Phase::ResultShown(r) => Some(r),
            _ => None,
        }
    }

    pub fn is_analyzing(&self) -> bool {
        matches!(self.phase, Phase::Analyzing(_))
    }

    /// Header greeting.
    pub fn greeting(session: &SessionContext) -> String {
        format!("Hello, {}", session.display_name())
    }

    /// Pick a file from disk. A rejected file only sets the inline error.
    pub fn select_path(&mut self, path: &Path) {
        if self.is_analyzing() {
            return;
        }
        match UploadedFile::from_path(path) {
            Ok(file) => self.accept(file),
            Err(e) => {
                tracing::debug!("Rejected {}: {e}", path.display());
                self.error = Some(match e {
                    DropSeeError::Validation(v) => v.to_string(),
                    other => other.to_string(),
                });
            }
        }
    }

    /// Pick an in-memory file.
    pub fn select_bytes(&mut self, name: &str, bytes: Vec<u8>) {
        if self.is_analyzing() {
            return;
        }
        match UploadedFile::from_bytes(name, bytes) {
            Ok(file) => self.accept(file),
            Err(v) => self.error = Some(v.to_string()),
        }
    }

    fn accept(&mut self, file: UploadedFile) {
        self.phase = Phase::FileSelected(file);
        self.error = None;
    }

    /// Move to `Analyzing` and hand back the file to upload. Sets the
    /// "select a file" error when nothing is selected.
    pub fn begin_analysis(&mut self) -> Option<UploadedFile> {
        let file = match &self.phase {
            Phase::FileSelected(f) => f.clone(),
            Phase::Analyzing(_) => return None,
            _ => {
                self.error = Some(ValidationError::NoFileSelected.to_string());
                return None;
            }
        };
        self.phase = Phase::Analyzing(file.clone());
        self.error = None;
        Some(file)
    }

    /// Apply the outcome of an upload started with `begin_analysis`.
    pub fn finish_analysis(&mut self, outcome: Result<AnalysisResult, DropSeeError>) {
        let Phase::Analyzing(file) = std::mem::replace(&mut self.phase, Phase::Idle) else {
            return;
        };
        match outcome {
            Ok(result) => {
                tracing::info!(
                    "Analysis of {} done: {} rows, {} columns",
                    result.file_name,
                    result.row_count,
                    result.column_count
                );
                self.phase = Phase::ResultShown(result);
                self.error = None;
            }
            Err(e) => {
                tracing::warn!("Analysis of {} failed: {e}", file.name());
                self.phase = Phase::FileSelected(file);
                self.error = Some(e.user_message(messages::ANALYSIS_FAILED));
            }
        }
    }

    /// Upload the selected file: authenticated when a session token exists,
    /// direct otherwise.
    pub async fn analyze(&mut self, session: &SessionContext, api: &dyn AnalysisApi) {
        let Some(file) = self.begin_analysis() else {
            return;
        };
        let outcome = upload(session, api, &file).await;
        self.finish_analysis(outcome);
    }

    pub fn reset(&mut self) {
        self.phase = Phase::Idle;
        self.error = None;
    }
}

/// Route one upload according to the session.
pub async fn upload(
    session: &SessionContext,
    api: &dyn AnalysisApi,
    file: &UploadedFile,
) -> Result<AnalysisResult, DropSeeError> {
    match session.token() {
        Some(token) => api.upload_file(token, file).await,
        None => api.upload_file_direct(file).await,
    }
}
