//! Configuration settings for annograph.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};
use crate::ontology::{DEFAULT_ADMITTED_RELATIONS, DEFAULT_DEPTH, DEFAULT_LANGUAGE};

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub ontology: OntologyConfig,
    pub enrichment: EnrichmentConfig,
    pub cache: CacheConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::ReadFile)?;
        Self::from_toml(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from default locations or use defaults.
    pub fn load() -> Result<Self> {
        let config_paths = [
            PathBuf::from("annograph.toml"),
            PathBuf::from("config.toml"),
            dirs::config_dir()
                .map(|p| p.join("annograph/config.toml"))
                .unwrap_or_default(),
        ];

        for path in &config_paths {
            if path.exists() {
                tracing::info!("Loading config from: {}", path.display());
                return Self::from_file(path);
            }
        }

        tracing::info!("No config file found, using defaults");
        Ok(Config::default())
    }

    /// Validate the configuration.
    fn validate(&self) -> Result<()> {
        if self.ontology.endpoint.is_empty() {
            return Err(ConfigError::MissingField("ontology.endpoint".to_string()).into());
        }
        if self.enrichment.depth == 0 {
            return Err(ConfigError::Invalid("enrichment.depth must be > 0".to_string()).into());
        }
        if self.cache.max_entries == 0 {
            return Err(ConfigError::Invalid("cache.max_entries must be > 0".to_string()).into());
        }
        Ok(())
    }
}

/// Ontology service configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OntologyConfig {
    /// Base URL of the lexical knowledge graph service.
    pub endpoint: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for OntologyConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:8084".to_string(),
            timeout_secs: 30,
        }
    }
}

/// Hierarchy enrichment configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EnrichmentConfig {
    /// Default lookup language.
    pub language: String,
    /// Admit only edges whose both endpoints match the lookup language.
    pub filter_language: bool,
    /// Default traversal depth.
    pub depth: u32,
    /// Relation allowlist. Empty admits every relation.
    pub admitted_relations: Vec<String>,
}

impl Default for EnrichmentConfig {
    fn default() -> Self {
        Self {
            language: DEFAULT_LANGUAGE.to_string(),
            filter_language: false,
            depth: DEFAULT_DEPTH,
            admitted_relations: DEFAULT_ADMITTED_RELATIONS
                .iter()
                .map(|r| r.to_string())
                .collect(),
        }
    }
}

/// Concept-resolution cache configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Maximum number of cached resolutions.
    pub max_entries: u64,
    /// Time-to-live per entry in seconds.
    pub ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_entries: 10_000,
            ttl_secs: 1800,
        }
    }
}
