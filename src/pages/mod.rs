// src/pages/mod.rs - Page state machines and their view models
//
// Each page owns its state, talks to the backends only through the
// `AuthApi`/`AnalysisApi` traits, and receives the session explicitly.
// View models are plain data built by pure functions so the CLI and the TUI
// draw the same thing.

pub mod auth;
pub mod dashboard;
pub mod detail;
pub mod mypage;
pub mod result_view;

/// Fallback texts shown when the server gives no usable message.
pub mod messages {
    pub const ANALYSIS_FAILED: &str = "An error occurred during analysis.";
    pub const DETAIL_LOAD_FAILED: &str = "Failed to load the analysis result.";
    pub const HISTORY_LOAD_FAILED: &str = "Failed to load analysis history.";
    pub const PROFILE_LOAD_FAILED: &str = "Failed to load your profile.";
    pub const PASSWORD_CHANGE_FAILED: &str = "Failed to change the password.";
    pub const PASSWORD_CHANGED: &str = "Password changed successfully.";
    pub const NAME_CHANGE_FAILED: &str = "Failed to change the name.";
    pub const NAME_CHANGED: &str = "Name changed successfully.";
    pub const SIGNUP_FAILED: &str = "Sign-up failed.";
    pub const SIGNUP_COMPLETE: &str = "Sign-up complete. Please log in.";
    pub const LOGIN_FAILED: &str = "Login failed. Check your email and password.";
    pub const SESSION_SAVE_FAILED: &str = "Could not save the session.";
}
