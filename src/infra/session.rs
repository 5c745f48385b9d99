// src/infra/session.rs - Session persistence and the session context handed to pages
//
// The session file holds exactly three fields: the access token, the display
// name and the email. It is written on login, cleared on logout and read once
// when the process starts; pages receive a `SessionContext` instead of reading
// the file themselves.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::infra::paths;

pub const DEFAULT_DISPLAY_NAME: &str = "User";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
}

impl Session {
    pub fn new(
        token: impl Into<String>,
        name: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            token: token.into(),
            name: name.into(),
            email: email.into(),
        }
    }
}

/// On-disk session file.
///
/// Stored as plaintext JSON with chmod 600 on Unix, like other CLI tools
/// that keep bearer tokens in the user's config directory.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at the default location (`$DROPSEE_HOME/session.json`).
    pub fn default_location() -> Self {
        Self::new(paths::session_file_path())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the session. A missing file or an empty token means "logged out".
    pub fn load(&self) -> Result<Option<Session>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(None);
        }
        let session: Session = serde_json::from_str(&content)?;
        if session.token.is_empty() {
            return Ok(None);
        }
        Ok(Some(session))
    }

    /// Save atomically (write to .tmp then rename, chmod 600).
    pub fn save(&self, session: &Session) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(session)?;

        let tmp_path = self.path.with_extension("json.tmp");
        std::fs::write(&tmp_path, &json)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&tmp_path, std::fs::Permissions::from_mode(0o600))?;
        }

        std::fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }

    pub fn clear(&self) -> Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// The current session plus where it is persisted. Passed explicitly to every
/// page; `establish` and `clear` are the only ways it changes.
#[derive(Debug, Clone, Default)]
pub struct SessionContext {
    store: Option<SessionStore>,
    current: Option<Session>,
}

impl SessionContext {
    /// Load from a store. An unreadable file is treated as logged out.
    pub fn load(store: SessionStore) -> Self {
        let current = match store.load() {
            Ok(s) => s,
            Err(e) => {
                tracing::warn!("Ignoring unreadable session file {}: {e}", store.path().display());
                None
            }
        };
        Self {
            store: Some(store),
            current,
        }
    }

    /// A context that never touches disk.
    pub fn in_memory(current: Option<Session>) -> Self {
        Self {
            store: None,
            current,
        }
    }

    pub fn current(&self) -> Option<&Session> {
        self.current.as_ref()
    }

    pub fn token(&self) -> Option<&str> {
        self.current.as_ref().map(|s| s.token.as_str())
    }

    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    /// Display name, or the generic placeholder when unknown.
    pub fn display_name(&self) -> &str {
        self.current
            .as_ref()
            .map(|s| s.name.as_str())
            .filter(|n| !n.is_empty())
            .unwrap_or(DEFAULT_DISPLAY_NAME)
    }

    pub fn email(&self) -> &str {
        self.current.as_ref().map(|s| s.email.as_str()).unwrap_or("")
    }

    /// Start a session after a successful login.
    pub fn establish(&mut self, session: Session) -> Result<()> {
        if let Some(store) = &self.store {
            store.save(&session)?;
        }
        tracing::info!("Session established for {}", session.email);
        self.current = Some(session);
        Ok(())
    }

    /// Drop the session (logout).
    pub fn clear(&mut self) -> Result<()> {
        if let Some(store) = &self.store {
            store.clear()?;
        }
        if self.current.take().is_some() {
            tracing::info!("Session cleared");
        }
        Ok(())
    }

    /// Update the cached display name after a rename on the server.
    pub fn set_display_name(&mut self, name: &str) -> Result<()> {
        let Some(mut session) = self.current.clone() else {
            return Ok(());
        };
        session.name = name.to_string();
        if let Some(store) = &self.store {
            store.save(&session)?;
        }
        self.current = Some(session);
        Ok(())
    }

    /// Update the cached name and email from a fresh profile fetch.
    pub fn refresh_profile(&mut self, name: &str, email: &str) -> Result<()> {
        let Some(mut session) = self.current.clone() else {
            return Ok(());
        };
        if session.name == name && session.email == email {
            return Ok(());
        }
        session.name = name.to_string();
        session.email = email.to_string();
        if let Some(store) = &self.store {
            store.save(&session)?;
        }
        self.current = Some(session);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_in(dir: &tempfile::TempDir) -> SessionStore {
        SessionStore::new(dir.path().join("session.json"))
    }

    #[test]
    fn test_missing_file_is_logged_out() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = SessionContext::load(store_in(&dir));
        assert!(!ctx.is_authenticated());
        assert_eq!(ctx.display_name(), DEFAULT_DISPLAY_NAME);
        assert_eq!(ctx.email(), "");
    }

    #[test]
    fn test_establish_persists_and_reloads() {
        let dir = tempfile::tempdir().unwrap();
        let mut ctx = SessionContext::load(store_in(&dir));
        ctx.establish(Session::new("tok-1", "Mina", "mina@example.com"))
            .unwrap();
        assert_eq!(ctx.token(), Some("tok-1"));

        let reloaded = SessionContext::load(store_in(&dir));
        assert_eq!(reloaded.token(), Some("tok-1"));
        assert_eq!(reloaded.display_name(), "Mina");
        assert_eq!(reloaded.email(), "mina@example.com");
    }

    #[cfg(unix)]
    #[test]
    fn test_session_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        store.save(&Session::new("t", "n", "e")).unwrap();
        let mode = std::fs::metadata(store.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn test_clear_removes_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut ctx = SessionContext::load(store_in(&dir));
        ctx.establish(Session::new("tok", "A", "a@b.c")).unwrap();
        ctx.clear().unwrap();
        assert!(!ctx.is_authenticated());
        assert!(!dir.path().join("session.json").exists());
        // clearing twice is fine
        ctx.clear().unwrap();
    }

    #[test]
    fn test_corrupt_file_is_logged_out() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("session.json"), "{not json").unwrap();
        let ctx = SessionContext::load(store_in(&dir));
        assert!(!ctx.is_authenticated());
    }

    #[test]
    fn test_empty_token_is_logged_out() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("session.json"),
            r#"{"token":"","name":"x","email":"y"}"#,
        )
        .unwrap();
        assert!(store_in(&dir).load().unwrap().is_none());
    }

    #[test]
    fn test_set_display_name() {
        let dir = tempfile::tempdir().unwrap();
        let mut ctx = SessionContext::load(store_in(&dir));
        ctx.set_display_name("ignored").unwrap();
        assert!(ctx.current().is_none());

        ctx.establish(Session::new("tok", "Old", "o@x.io")).unwrap();
        ctx.set_display_name("New").unwrap();
        assert_eq!(ctx.display_name(), "New");
        let reloaded = store_in(&dir).load().unwrap().unwrap();
        assert_eq!(reloaded.name, "New");
        assert_eq!(reloaded.token, "tok");
    }

    #[test]
    fn test_in_memory_never_writes() {
        let mut ctx = SessionContext::in_memory(None);
        ctx.establish(Session::new("t", "n", "e")).unwrap();
        assert!(ctx.is_authenticated());
        ctx.clear().unwrap();
        assert!(!ctx.is_authenticated());
    }
}
