//! Configuration module for Ticketsmith
//!
//! Configuration is layered: built-in defaults, then an optional TOML file,
//! then CLI flags / environment variables applied by the binary. The result
//! is validated once and handed to every client at construction time.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::domain::ProjectMapping;

/// Model requested from the LLM server unless configured otherwise
pub const DEFAULT_MODEL: &str = "gemma3:27b";

/// LLM server used when `OLLAMA_REMOTE_HOST` is not set
pub const DEFAULT_OLLAMA_HOST: &str = "http://ollama.hgi.sanger.ac.uk:11434";

/// Issue tracker all tickets are filed against
pub const DEFAULT_JIRA_BASE_URL: &str = "https://jira.sanger.ac.uk";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("JIRA_TOKEN is not set; an issue tracker token is required to start")]
    MissingToken,

    #[error("ollama.model must name a model")]
    MissingModel,

    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// LLM server configuration
    #[serde(default)]
    pub ollama: OllamaConfig,

    /// Issue tracker configuration
    #[serde(default)]
    pub jira: JiraConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OllamaConfig {
    /// Base URL of the Ollama server
    #[serde(default = "default_ollama_host")]
    pub host: String,

    /// Model used for every generation call
    #[serde(default = "default_model")]
    pub model: String,
}

fn default_ollama_host() -> String {
    DEFAULT_OLLAMA_HOST.to_string()
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            host: default_ollama_host(),
            model: default_model(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JiraConfig {
    /// Base URL of the JIRA instance (without `/rest/...`)
    #[serde(default = "default_jira_base_url")]
    pub base_url: String,

    /// Raw value sent in the `Authorization` header
    #[serde(default)]
    pub token: Option<String>,

    /// Project code used when a request omits one
    #[serde(default = "default_project")]
    pub default_project: String,

    /// Project code to numeric project id table
    #[serde(default)]
    pub projects: ProjectMapping,

    /// `maxResults` used when paging through JQL searches
    #[serde(default = "default_search_page_size")]
    pub search_page_size: u32,
}

fn default_jira_base_url() -> String {
    DEFAULT_JIRA_BASE_URL.to_string()
}

fn default_project() -> String {
    "HI".to_string()
}

fn default_search_page_size() -> u32 {
    50
}

impl Default for JiraConfig {
    fn default() -> Self {
        Self {
            base_url: default_jira_base_url(),
            token: None,
            default_project: default_project(),
            projects: ProjectMapping::default(),
            search_page_size: default_search_page_size(),
        }
    }
}

impl Config {
    /// Fail if anything required at startup is missing.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.ollama.model.trim().is_empty() {
            return Err(ConfigError::MissingModel);
        }

        match self.jira.token.as_deref() {
            Some(token) if !token.trim().is_empty() => Ok(()),
            _ => Err(ConfigError::MissingToken),
        }
    }

    /// Issue tracker token, empty until [`Config::validate`] has passed
    pub fn jira_token(&self) -> &str {
        self.jira.token.as_deref().unwrap_or_default()
    }

    /// Copy of the configuration that is safe to print
    pub fn redacted(&self) -> Config {
        let mut config = self.clone();
        if config.jira.token.is_some() {
            config.jira.token = Some("********".to_string());
        }
        config
    }
}

/// Get the config directory for Ticketsmith
pub fn get_config_dir() -> PathBuf {
    dirs::config_dir()
        .map(|d| d.join("ticketsmith"))
        .or_else(|| dirs::home_dir().map(|h| h.join(".ticketsmith")))
        .unwrap_or_else(|| PathBuf::from(".ticketsmith"))
}

/// Default location of the config file
pub fn default_config_path() -> PathBuf {
    get_config_dir().join("config.toml")
}

/// Parse a config file
pub fn load_config_file(path: &Path) -> Result<Config, ConfigError> {
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    toml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Load configuration from an explicit file, the default location, or defaults
///
/// An explicitly requested file must exist; the default location is optional.
pub fn load_config(explicit: Option<&Path>) -> Result<Config, ConfigError> {
    if let Some(path) = explicit {
        return load_config_file(path);
    }

    let path = default_config_path();
    if path.exists() {
        tracing::debug!("Loading configuration from {}", path.display());
        load_config_file(&path)
    } else {
        Ok(Config::default())
    }
}
