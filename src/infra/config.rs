// src/infra/config.rs - Configuration loading (TOML)

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::infra::paths;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub ui: UiConfig,

    #[serde(default)]
    pub log: LogConfig,
}

/// Backend locations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Primary backend (auth, users, persisted analyses), including its `/api` prefix.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Analysis backend origin (direct uploads and chart images).
    #[serde(default = "default_analysis_url")]
    pub analysis_url: String,
}

fn default_base_url() -> String {
    "http://localhost:8080/api".into()
}

fn default_analysis_url() -> String {
    "http://localhost:8000".into()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            analysis_url: default_analysis_url(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Maximum preview rows shown on the detail page.
    #[serde(default = "default_preview_rows")]
    pub preview_rows: usize,
}

fn default_preview_rows() -> usize {
    100
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            preview_rows: default_preview_rows(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "warn".into()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Config {
    /// Load config from file, falling back to defaults, then apply env overrides.
    pub fn load() -> anyhow::Result<Self> {
        let path = paths::config_file_path();
        let mut config = if path.exists() {
            Self::load_from(&path)?
        } else {
            Self::default()
        };
        config.apply_env(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// `DROPSEE_API_URL` and `DROPSEE_ANALYSIS_URL` replace the configured bases.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(v) = lookup("DROPSEE_API_URL").filter(|v| !v.trim().is_empty()) {
            self.api.base_url = v;
        }
        if let Some(v) = lookup("DROPSEE_ANALYSIS_URL").filter(|v| !v.trim().is_empty()) {
            self.api.analysis_url = v;
        }
    }

    /// Both base URLs must be absolute http(s) URLs and the preview must show
    /// at least one row.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.ui.preview_rows == 0 {
            anyhow::bail!("ui.preview_rows must be at least 1");
        }
        for (key, value) in [
            ("api.base_url", &self.api.base_url),
            ("api.analysis_url", &self.api.analysis_url),
        ] {
            let parsed = url::Url::parse(value)
                .with_context(|| format!("{key} is not a valid URL: {value}"))?;
            if !matches!(parsed.scheme(), "http" | "https") {
                anyhow::bail!("{key} must use http or https: {value}");
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults_reasonable() {
        let c = Config::default();
        assert_eq!(c.api.base_url, "http://localhost:8080/api");
        assert_eq!(c.api.analysis_url, "http://localhost:8000");
        assert_eq!(c.ui.preview_rows, 100);
        assert_eq!(c.log.level, "warn");
        assert!(c.validate().is_ok());
    }

    #[test]
    fn test_parse_minimal_toml() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.ui.preview_rows, 100);
    }

    #[test]
    fn test_parse_full_toml() {
        let toml_str = r#"
[api]
base_url = "https://dropsee.example.com/api"
analysis_url = "https://analysis.example.com"

[ui]
preview_rows = 20

[log]
level = "debug"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.api.base_url, "https://dropsee.example.com/api");
        assert_eq!(config.api.analysis_url, "https://analysis.example.com");
        assert_eq!(config.ui.preview_rows, 20);
        assert_eq!(config.log.level, "debug");
    }

    #[test]
    fn test_partial_section_keeps_other_defaults() {
        let config: Config = toml::from_str("[api]\nbase_url = \"http://10.0.0.5:8080/api\"\n").unwrap();
        assert_eq!(config.api.base_url, "http://10.0.0.5:8080/api");
        assert_eq!(config.api.analysis_url, "http://localhost:8000");
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("DROPSEE_API_URL", "http://api.internal/api"),
            ("DROPSEE_ANALYSIS_URL", ""),
        ]
        .into_iter()
        .collect();
        let mut config = Config::default();
        config.apply_env(|k| env.get(k).map(|v| v.to_string()));
        assert_eq!(config.api.base_url, "http://api.internal/api");
        // blank values are ignored
        assert_eq!(config.api.analysis_url, "http://localhost:8000");
    }

    #[test]
    fn test_validate_rejects_bad_urls() {
        let mut config = Config::default();
        config.api.analysis_url = "not a url".into();
        assert!(config.validate().is_err());

        config.api.analysis_url = "ftp://files.example.com".into();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_preview_rows() {
        let mut config = Config::default();
        config.ui.preview_rows = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("ui.preview_rows"));

        config.ui.preview_rows = 1;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[ui]\npreview_rows = 7\n").unwrap();
        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.ui.preview_rows, 7);
    }

    #[test]
    fn test_load_nonexistent_file() {
        let result = Config::load_from(Path::new("/nonexistent/config.toml"));
        assert!(result.is_err());
    }
}
