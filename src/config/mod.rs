//! Configuration (layered: file < env < code).

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use tracing::debug;

use crate::backend::ChatBackend;
use crate::error::ForgeError;

/// Which chat backend to construct.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum BackendKind {
    #[default]
    OpenAi,
    Azure,
}

/// Backend settings and credentials.
///
/// Resolution order: values from a TOML file, then environment variables
/// (including a `.env` file), then explicit `with_*` calls.
#[derive(Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForgeConfig {
    pub backend: BackendKind,
    pub openai_api_key: Option<String>,
    pub openai_base_url: Option<String>,
    pub azure_endpoint: Option<String>,
    pub azure_api_key: Option<String>,
    pub azure_api_version: Option<String>,
}

impl std::fmt::Debug for ForgeConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let redact = |v: &Option<String>| v.as_ref().map(|_| "..");
        f.debug_struct("ForgeConfig")
            .field("backend", &self.backend)
            .field("openai_api_key", &redact(&self.openai_api_key))
            .field("openai_base_url", &self.openai_base_url)
            .field("azure_endpoint", &self.azure_endpoint)
            .field("azure_api_key", &redact(&self.azure_api_key))
            .field("azure_api_version", &self.azure_api_version)
            .finish()
    }
}

impl ForgeConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load from environment variables (`OPENAI_API_KEY`, `AZURE_OPENAI_*`,
    /// `AGENTFORGE_BACKEND`), reading `.env` first if present.
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv(); // load .env if present, ignore error
        Self::new().with_env(|key| std::env::var(key).ok())
    }

    /// Parse a TOML document.
    pub fn from_toml_str(raw: &str) -> Result<Self, ForgeError> {
        toml::from_str(raw).map_err(|e| ForgeError::Configuration(e.to_string()))
    }

    /// Read a TOML config file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ForgeError> {
        let raw = fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&raw)
    }

    /// Per-user config file location (`<config dir>/agentforge/config.toml`).
    pub fn default_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "agentforge")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Default file (when it exists) overlaid with the environment.
    pub fn load() -> Result<Self, ForgeError> {
        let base = match Self::default_path() {
            Some(path) if path.exists() => {
                debug!(path = %path.display(), "loading agentforge config file");
                Self::from_file(&path)?
            }
            _ => Self::new(),
        };
        let _ = dotenvy::dotenv();
        Ok(base.with_env(|key| std::env::var(key).ok()))
    }

    /// Overlay values found through `lookup` (an environment accessor).
    pub fn with_env(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let overlay = |slot: &mut Option<String>, key: &str| {
            if let Some(value) = lookup(key).filter(|v| !v.is_empty()) {
                *slot = Some(value);
            }
        };
        overlay(&mut self.openai_api_key, "OPENAI_API_KEY");
        overlay(&mut self.openai_base_url, "OPENAI_BASE_URL");
        overlay(&mut self.azure_endpoint, "AZURE_OPENAI_ENDPOINT");
        overlay(&mut self.azure_api_key, "AZURE_OPENAI_API_KEY");
        overlay(&mut self.azure_api_version, "AZURE_OPENAI_API_VERSION");

        if let Some(kind) = lookup("AGENTFORGE_BACKEND").and_then(|v| v.parse().ok()) {
            self.backend = kind;
        }
        self
    }

    pub fn with_backend(mut self, backend: BackendKind) -> Self {
        self.backend = backend;
        self
    }

    pub fn with_openai_api_key(mut self, key: impl Into<String>) -> Self {
        self.openai_api_key = Some(key.into());
        self
    }

    pub fn with_openai_base_url(mut self, url: impl Into<String>) -> Self {
        self.openai_base_url = Some(url.into());
        self
    }

    pub fn with_azure(mut self, endpoint: impl Into<String>, api_key: impl Into<String>) -> Self {
        self.backend = BackendKind::Azure;
        self.azure_endpoint = Some(endpoint.into());
        self.azure_api_key = Some(api_key.into());
        self
    }

    /// Construct the configured backend.
    pub fn create_backend(&self) -> Result<Arc<dyn ChatBackend>, ForgeError> {
        match self.backend {
            #[cfg(feature = "openai")]
            BackendKind::OpenAi => {
                let api_key = self
                    .openai_api_key
                    .clone()
                    .ok_or_else(|| ForgeError::Authentication("Missing OPENAI_API_KEY".into()))?;
                Ok(Arc::new(crate::backend::openai::OpenAiBackend::new(
                    api_key,
                    self.openai_base_url.clone(),
                )))
            }
            #[cfg(feature = "azure")]
            BackendKind::Azure => {
                let endpoint = self.azure_endpoint.clone().ok_or_else(|| {
                    ForgeError::Configuration("Missing AZURE_OPENAI_ENDPOINT".into())
                })?;
                let api_key = self.azure_api_key.clone().ok_or_else(|| {
                    ForgeError::Authentication("Missing AZURE_OPENAI_API_KEY".into())
                })?;
                Ok(Arc::new(crate::backend::azure::AzureOpenAiBackend::new(
                    endpoint,
                    api_key,
                    self.azure_api_version.clone(),
                )))
            }
            #[allow(unreachable_patterns)]
            other => Err(ForgeError::Configuration(format!(
                "Backend '{other}' not enabled via feature flags"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn env_overrides_file_values() {
        let config = ForgeConfig::from_toml_str(
            r#"
            openai_api_key = "from-file"
            openai_base_url = "http://localhost:8080/v1"
            "#,
        )
        .unwrap()
        .with_env(env(&[("OPENAI_API_KEY", "from-env")]));

        assert_eq!(config.openai_api_key.as_deref(), Some("from-env"));
        assert_eq!(
            config.openai_base_url.as_deref(),
            Some("http://localhost:8080/v1")
        );
        assert_eq!(config.backend, BackendKind::OpenAi);
    }

    #[test]
    fn backend_kind_parses_case_insensitively() {
        let config = ForgeConfig::new().with_env(env(&[("AGENTFORGE_BACKEND", "Azure")]));
        assert_eq!(config.backend, BackendKind::Azure);
    }

    #[test]
    fn debug_output_redacts_keys() {
        let config = ForgeConfig::new().with_openai_api_key("sk-secret");
        assert!(!format!("{config:?}").contains("sk-secret"));
    }
}
