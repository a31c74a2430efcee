use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable pointing at an explicit settings file
pub const CONFIG_ENV: &str = "DOCVEC_CONFIG";

/// Environment variable holding the embedding server API key
pub const EMBEDDING_API_KEY_ENV: &str = "DOCVEC_EMBEDDING_API_KEY";

/// Application configuration loaded from settings.toml
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    pub index: IndexConfig,
    #[serde(default)]
    pub embedding: EmbeddingConfig,
    #[serde(default)]
    pub search: SearchConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexConfig {
    #[serde(default = "default_collection_name")]
    pub collection_name: String,
    #[serde(default = "default_persist_dir")]
    pub persist_dir: PathBuf,
    #[serde(default = "default_log_dir")]
    pub log_dir: PathBuf,
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    /// One of `tei`, `ollama` or `hash`
    #[serde(default = "default_embedding_provider")]
    pub provider: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default = "default_embedding_model")]
    pub model: String,
    #[serde(default = "default_embedding_dims")]
    pub dims: usize,
    #[serde(default)]
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    #[serde(default = "default_search_limit")]
    pub default_limit: usize,
    #[serde(default = "default_search_query")]
    pub default_query: String,
}

fn default_collection_name() -> String {
    "html_documents".to_string()
}

fn default_persist_dir() -> PathBuf {
    PathBuf::from("vector_db")
}

fn default_log_dir() -> PathBuf {
    PathBuf::from("logs")
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_extensions() -> Vec<String> {
    vec!["html".to_string(), "csv".to_string()]
}

fn default_embedding_provider() -> String {
    "tei".to_string()
}

fn default_embedding_model() -> String {
    "BAAI/bge-small-en-v1.5".to_string()
}

fn default_embedding_dims() -> usize {
    384 // bge-small-en-v1.5
}

fn default_search_limit() -> usize {
    5
}

fn default_search_query() -> String {
    "where am i".to_string()
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            collection_name: default_collection_name(),
            persist_dir: default_persist_dir(),
            log_dir: default_log_dir(),
            data_dir: default_data_dir(),
            extensions: default_extensions(),
        }
    }
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: default_embedding_provider(),
            url: None,
            model: default_embedding_model(),
            dims: default_embedding_dims(),
            api_key: None,
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_limit: default_search_limit(),
            default_query: default_search_query(),
        }
    }
}

/// Expand `~` and environment variables in a path
pub fn expand_path(path: &Path) -> PathBuf {
    let raw = path.to_string_lossy();
    match shellexpand::full(&raw) {
        Ok(expanded) => PathBuf::from(expanded.as_ref()),
        Err(_) => path.to_path_buf(),
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        Self::from_toml(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))
    }

    /// Parse configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content).context("Invalid configuration")?;
        Ok(config.expanded())
    }

    /// Load configuration from `DOCVEC_CONFIG` or the default locations,
    /// falling back to defaults when no file exists
    pub fn load() -> Result<Self> {
        if let Ok(explicit) = std::env::var(CONFIG_ENV) {
            return Self::from_file(expand_path(Path::new(&explicit)));
        }

        let default_paths = [
            PathBuf::from("config/settings.toml"),
            expand_path(Path::new("~/.config/docvec/settings.toml")),
        ];

        for path in &default_paths {
            if path.exists() {
                return Self::from_file(path);
            }
        }

        Ok(Self::default())
    }

    /// Get the embedding API key from config or environment variable
    pub fn embedding_api_key(&self) -> Option<String> {
        self.embedding
            .api_key
            .clone()
            .or_else(|| std::env::var(EMBEDDING_API_KEY_ENV).ok())
    }

    fn expanded(mut self) -> Self {
        self.index.persist_dir = expand_path(&self.index.persist_dir);
        self.index.log_dir = expand_path(&self.index.log_dir);
        self.index.data_dir = expand_path(&self.index.data_dir);
        self
    }
}
