//! Configuration management for Vics
//!
//! Settings are layered, lowest precedence first:
//! 1. Built-in defaults
//! 2. `<config_dir>/vics-agent/config.toml` (or an explicit path)
//! 3. Environment variables
//! 4. Command-line overrides applied by the caller
//!
//! The environment is read through a lookup function so the layering can be
//! exercised without touching process state.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use vics_sandbox::CommandPolicy;

use crate::error::{Error, Result};
use crate::provider::{GenerationSettings, ProviderKind};

pub const MAX_ITERATIONS_ENV: &str = "VICS_MAX_ITERATIONS";
pub const WORKSPACE_ENV: &str = "VICS_WORKSPACE";
pub const BASE_URL_ENV: &str = "VICS_BASE_URL";

/// LLM provider configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub provider: ProviderKind,
    /// Key for `provider`. The provider's env var overrides a key from the
    /// file; switching provider drops it.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub api_key: String,
    pub model: String,
    pub temperature: f64,
    pub max_tokens: u32,
    /// Override for the provider's API endpoint
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::OpenAI,
            api_key: String::new(),
            model: ProviderKind::OpenAI.default_model().to_string(),
            temperature: 0.1,
            max_tokens: 4096,
            base_url: None,
        }
    }
}

impl LlmConfig {
    pub fn has_api_key(&self) -> bool {
        !self.api_key.trim().is_empty()
    }

    /// API key with everything but the last four characters hidden
    pub fn masked_api_key(&self) -> String {
        let chars: Vec<char> = self.api_key.chars().collect();
        match chars.len() {
            0 => "(not set)".to_string(),
            n if n <= 8 => "*".repeat(n),
            n => format!("{}{}", "*".repeat(n - 4), chars[n - 4..].iter().collect::<String>()),
        }
    }

    pub fn base_url(&self) -> &str {
        self.base_url
            .as_deref()
            .unwrap_or_else(|| self.provider.default_base_url())
    }

    pub fn generation_settings(&self) -> GenerationSettings {
        GenerationSettings {
            model: self.model.clone(),
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        }
    }
}

/// Shell command settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShellConfig {
    /// Extra denylist patterns on top of the built-in baseline
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub denylist: Vec<String>,
}

impl ShellConfig {
    pub fn policy(&self) -> CommandPolicy {
        CommandPolicy::with_patterns(self.denylist.iter().cloned())
    }
}

/// Top-level agent configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    pub llm: LlmConfig,
    pub max_iterations: usize,
    pub workspace: PathBuf,
    pub verbose: bool,
    pub shell: ShellConfig,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            llm: LlmConfig::default(),
            max_iterations: 25,
            workspace: PathBuf::from("./workspace"),
            verbose: false,
            shell: ShellConfig::default(),
        }
    }
}

impl AgentConfig {
    /// Get the default config path
    pub fn default_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| Error::Config("Could not find config directory".to_string()))?;

        Ok(config_dir.join("vics-agent").join("config.toml"))
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read config {}: {}", path.display(), e)))?;

        toml::from_str(&content)
            .map_err(|e| Error::Config(format!("Failed to parse config {}: {}", path.display(), e)))
    }

    /// Defaults overlaid with the process environment
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Defaults, then the config file, then the process environment.
    ///
    /// An explicit `path` must exist; the default path is optional.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with(path, |key| std::env::var(key).ok())
    }

    pub fn load_with<F>(path: Option<&Path>, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => match Self::default_config_path() {
                Ok(default_path) if default_path.exists() => Self::from_file(&default_path)?,
                _ => Self::default(),
            },
        };
        config.apply_env(lookup)?;
        Ok(config)
    }

    /// Overlay environment variables read through `lookup`.
    ///
    /// Anthropic is chosen only when its key is set and the OpenAI key is
    /// not; an OpenAI key alone selects OpenAI. With neither key present the
    /// provider from lower layers is kept.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let anthropic_key = non_empty(ProviderKind::Anthropic.api_key_env());
        let openai_key = non_empty(ProviderKind::OpenAI.api_key_env());

        match (anthropic_key, openai_key) {
            (Some(key), None) => self.switch_provider(ProviderKind::Anthropic, key),
            (_, Some(key)) => self.switch_provider(ProviderKind::OpenAI, key),
            (None, None) => {}
        }

        if let Some(model) = non_empty(self.llm.provider.model_env()) {
            self.llm.model = model;
        }

        if let Some(value) = non_empty(MAX_ITERATIONS_ENV) {
            self.max_iterations = value.trim().parse().map_err(|_| {
                Error::Config(format!("{} must be a positive integer, got {:?}", MAX_ITERATIONS_ENV, value))
            })?;
        }

        if let Some(workspace) = non_empty(WORKSPACE_ENV) {
            self.workspace = PathBuf::from(workspace);
        }

        if let Some(base_url) = non_empty(BASE_URL_ENV) {
            self.llm.base_url = Some(base_url);
        }

        Ok(())
    }

    /// Select `provider` explicitly, picking up its key and model from `lookup`.
    ///
    /// Reselecting the active provider keeps its key. A different provider
    /// never inherits the previous provider's key.
    pub fn select_provider<F>(&mut self, provider: ProviderKind, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if provider == self.llm.provider {
            return;
        }
        let key = lookup(provider.api_key_env()).unwrap_or_default();
        self.switch_provider(provider, key);
        if let Some(model) = lookup(provider.model_env()).filter(|m| !m.trim().is_empty()) {
            self.llm.model = model;
        }
    }

    fn switch_provider(&mut self, provider: ProviderKind, api_key: String) {
        if provider != self.llm.provider {
            self.llm.provider = provider;
            self.llm.model = provider.default_model().to_string();
        }
        self.llm.api_key = api_key;
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=2.0).contains(&self.llm.temperature) {
            return Err(Error::Config(format!(
                "temperature must be between 0 and 2, got {}",
                self.llm.temperature
            )));
        }
        if self.llm.max_tokens == 0 {
            return Err(Error::Config("max_tokens must be greater than 0".into()));
        }
        if self.max_iterations == 0 {
            return Err(Error::Config("max_iterations must be greater than 0".into()));
        }
        if self.llm.model.trim().is_empty() {
            return Err(Error::Config("model must not be empty".into()));
        }
        Ok(())
    }

    /// Command policy with any configured extra patterns
    pub fn command_policy(&self) -> CommandPolicy {
        self.shell.policy()
    }
}
