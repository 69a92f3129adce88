//! Application configuration
//!
//! This module handles application-wide configuration settings. Values come
//! from built-in defaults, an optional TOML file and `SOUSCHEF_*` environment
//! variables, in that order.

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::Error;
use crate::orchestrator::SavePolicy;
use crate::storage::config::{BackendType, StorageConfig};

/// Get the platform directories for souschef
pub fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "souschef", "souschef")
}

/// Generative model settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub endpoint: String,
    pub max_tokens: u32,
    pub temperature: f32,
    #[serde(with = "humantime_serde")]
    pub timeout: Duration,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: "claude-3-5-haiku-latest".to_string(),
            endpoint: "https://api.anthropic.com/v1/messages".to_string(),
            max_tokens: 1024,
            temperature: 0.7,
            timeout: Duration::from_secs(60),
        }
    }
}

/// Sessions issued by the external sign-in
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct IdentityConfig {
    /// Bearer token to authenticated user id
    pub tokens: BTreeMap<String, String>,
}

impl IdentityConfig {
    /// Copy with the tokens masked, for display
    pub fn masked(&self) -> Self {
        let tokens = self
            .tokens
            .iter()
            .map(|(token, user_id)| {
                let prefix: String = token.chars().take(4).collect();
                (format!("{prefix}********"), user_id.clone())
            })
            .collect();
        Self { tokens }
    }
}

/// Application configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Verbosity level for logging
    #[serde(skip)]
    pub verbose: u8,
    /// Address the HTTP server binds to
    pub bind_address: String,
    /// Who may save favorites
    pub save_policy: SavePolicy,
    /// Buffer size of the persistence event channel
    pub event_capacity: usize,
    pub model: ModelConfig,
    pub storage: StorageConfig,
    pub identity: IdentityConfig,
}

impl AppConfig {
    /// Create a new application configuration
    pub fn new(verbose: u8) -> Self {
        Self {
            verbose,
            ..Self::default()
        }
    }

    /// Load configuration from `path`, or from the default location if it exists
    ///
    /// An explicit `path` must exist; only the default location is optional.
    pub fn load(path: Option<&Path>, verbose: u8) -> Result<Self> {
        let path = match path {
            Some(path) if !path.exists() => {
                return Err(Error::Config(format!(
                    "Config file not found: {}",
                    path.display()
                ))
                .into());
            }
            Some(path) => Some(path.to_path_buf()),
            None => default_config_path().filter(|path| path.exists()),
        };

        let mut config = match path {
            Some(path) => {
                let content = std::fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read config file {}", path.display()))?;
                toml::from_str::<AppConfig>(&content)
                    .with_context(|| format!("Invalid config file {}", path.display()))?
            }
            None => AppConfig::default(),
        };

        config.verbose = verbose;
        config.merge_env_vars()?;
        Ok(config)
    }

    /// Apply `SOUSCHEF_*` environment overrides
    pub fn merge_env_vars(&mut self) -> crate::Result<()> {
        self.merge_vars(|key| std::env::var(key).ok())
    }

    fn merge_vars(&mut self, var: impl Fn(&str) -> Option<String>) -> crate::Result<()> {
        if let Some(bind) = var("SOUSCHEF_BIND") {
            self.bind_address = bind;
        }

        if let Some(api_key) = var("SOUSCHEF_API_KEY").or_else(|| var("ANTHROPIC_API_KEY")) {
            self.model.api_key = Some(api_key);
        }

        if let Some(model) = var("SOUSCHEF_MODEL") {
            self.model.model = model;
        }

        if let Some(endpoint) = var("SOUSCHEF_MODEL_ENDPOINT") {
            self.model.endpoint = endpoint;
        }

        if let Some(backend) = var("SOUSCHEF_STORAGE_BACKEND") {
            self.storage.backend = match backend.to_ascii_lowercase().as_str() {
                "memory" => BackendType::Memory,
                "file" => BackendType::File,
                other => {
                    return Err(Error::Config(format!(
                        "SOUSCHEF_STORAGE_BACKEND: unknown storage backend '{other}'"
                    )))
                }
            };
        }

        if let Some(dir) = var("SOUSCHEF_DATA_DIR") {
            self.storage.data_dir = PathBuf::from(dir);
        }

        if let Some(policy) = var("SOUSCHEF_SAVE_POLICY") {
            self.save_policy = policy
                .parse::<SavePolicy>()
                .map_err(|e| Error::Config(format!("SOUSCHEF_SAVE_POLICY: {e}")))?;
        }

        Ok(())
    }

    /// Set the bind address
    pub fn with_bind_address(mut self, bind: impl Into<String>) -> Self {
        self.bind_address = bind.into();
        self
    }

    /// Get the log level string based on verbosity
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "info",
            1 => "debug",
            2 => "trace",
            _ => "trace,hyper=debug,tower=debug",
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            verbose: 0,
            bind_address: "127.0.0.1:8080".to_string(),
            save_policy: SavePolicy::default(),
            event_capacity: 256,
            model: ModelConfig::default(),
            storage: StorageConfig::default(),
            identity: IdentityConfig::default(),
        }
    }
}

fn default_config_path() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().join("config.toml"))
}
