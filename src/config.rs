use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::recommend::{RecommendOptions, SimilarityMetric, UnknownUserPolicy};

pub const DEFAULT_CONFIG_PATH: &str = "music-recommender.yaml";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub listen: ListenConfig,
    #[serde(default)]
    pub logformat: LogFormat,
    #[serde(default)]
    pub seedfile: Option<String>,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub recommendations: RecommendationsConfig,
    #[serde(skip)]
    pub debug_logs: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ListenConfig {
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default = "default_port")]
    pub port: String,
    #[serde(default)]
    pub tlscert: Option<String>,
    #[serde(default)]
    pub tlskey: Option<String>,
}

impl Default for ListenConfig {
    fn default() -> Self {
        Self {
            address: None,
            port: default_port(),
            tlscert: None,
            tlskey: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct DatabaseConfig {
    #[serde(default)]
    pub sqlite: Option<SqliteConfig>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SqliteConfig {
    pub filename: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RecommendationsConfig {
    #[serde(alias = "defaultcount", default = "default_count")]
    pub default_count: i64,
    #[serde(alias = "maxcount", default = "default_max_count")]
    pub max_count: i64,
    #[serde(default)]
    pub similarity: SimilarityMetric,
    #[serde(alias = "unknownuser", default)]
    pub unknown_user: UnknownUserPolicy,
}

impl Default for RecommendationsConfig {
    fn default() -> Self {
        Self {
            default_count: default_count(),
            max_count: default_max_count(),
            similarity: SimilarityMetric::default(),
            unknown_user: UnknownUserPolicy::default(),
        }
    }
}

impl RecommendationsConfig {
    pub fn options(&self) -> RecommendOptions {
        RecommendOptions {
            metric: self.similarity,
            unknown_user: self.unknown_user,
        }
    }

    /// Count to use for a request: the default when none was given, never
    /// more than `max_count`.
    pub fn effective_count(&self, requested: Option<i64>) -> i64 {
        requested.unwrap_or(self.default_count).min(self.max_count)
    }
}

fn default_port() -> String {
    "8080".to_string()
}

fn default_count() -> i64 {
    5
}

fn default_max_count() -> i64 {
    100
}

impl Config {
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::ReadError(path.to_string(), e))?;

        let config: Config = serde_yaml::from_str(&content)
            .map_err(|e| ConfigError::ParseError(path.to_string(), e))?;

        Ok(config)
    }

    /// Load an explicitly given file, or the default file if it exists, or
    /// fall back to built-in defaults.
    pub fn load(path: Option<&str>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::from_file(path),
            None if Path::new(DEFAULT_CONFIG_PATH).exists() => Self::from_file(DEFAULT_CONFIG_PATH),
            None => Ok(Self::default()),
        }
    }

    pub fn get_database_path(&self) -> Option<String> {
        self.database.sqlite.as_ref().map(|sqlite| sqlite.filename.clone())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {0}: {1}")]
    ReadError(String, std::io::Error),
    #[error("Failed to parse config file {0}: {1}")]
    ParseError(String, serde_yaml::Error),
}
