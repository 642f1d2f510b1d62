use crate::core::selection::{DEFAULT_ATTEMPTS, DEFAULT_MAX_ATTEMPTS, DEFAULT_MIN_REMAINING};
use crate::utils::error::{AppError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::SocketAddr;
use std::path::Path;
use std::str::FromStr;

pub const DEFAULT_YOUTUBE_BASE_URL: &str = "https://www.googleapis.com/youtube/v3";
/// Per-request ceiling of the YouTube Data API.
pub const YOUTUBE_MAX_RESULTS: usize = 50;
const API_KEY_PLACEHOLDER: &str = "your_youtube_api_key_here";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub selection: SelectionConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    #[default]
    Memory,
    Catalog,
    YouTube,
}

impl FromStr for SourceKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "memory" => Ok(SourceKind::Memory),
            "catalog" | "database" | "db" => Ok(SourceKind::Catalog),
            "youtube" => Ok(SourceKind::YouTube),
            other => Err(AppError::InvalidConfigValueError {
                field: "source.kind".to_string(),
                value: other.to_string(),
                reason: "expected memory, catalog or youtube".to_string(),
            }),
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SourceKind::Memory => "memory",
            SourceKind::Catalog => "catalog",
            SourceKind::YouTube => "youtube",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    #[serde(default)]
    pub kind: SourceKind,
    #[serde(default = "default_catalog_path")]
    pub catalog_path: String,
    #[serde(default)]
    pub youtube: YouTubeConfig,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            kind: SourceKind::default(),
            catalog_path: default_catalog_path(),
            youtube: YouTubeConfig::default(),
        }
    }
}

fn default_catalog_path() -> String {
    "./data".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct YouTubeConfig {
    pub api_key: Option<String>,
    pub channel_id: Option<String>,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    pub timeout_seconds: Option<u64>,
    pub retry_attempts: Option<u32>,
    pub retry_delay_seconds: Option<u64>,
    pub max_results: Option<usize>,
}

impl Default for YouTubeConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            channel_id: None,
            base_url: default_base_url(),
            timeout_seconds: None,
            retry_attempts: None,
            retry_delay_seconds: None,
            max_results: None,
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_YOUTUBE_BASE_URL.to_string()
}

/// Treats empty strings, unresolved `${VAR}` references and the sample
/// placeholder as unset.
fn usable(value: Option<&str>) -> Option<&str> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty() && !v.starts_with("${") && *v != API_KEY_PLACEHOLDER)
}

impl YouTubeConfig {
    pub fn api_key(&self) -> Option<&str> {
        usable(self.api_key.as_deref())
    }

    pub fn channel_id(&self) -> Option<&str> {
        usable(self.channel_id.as_deref())
    }

    pub fn timeout_seconds(&self) -> u64 {
        self.timeout_seconds.unwrap_or(10)
    }

    pub fn retry_attempts(&self) -> u32 {
        self.retry_attempts.unwrap_or(2)
    }

    pub fn retry_delay_seconds(&self) -> u64 {
        self.retry_delay_seconds.unwrap_or(1)
    }

    pub fn max_results(&self) -> usize {
        self.max_results
            .unwrap_or(YOUTUBE_MAX_RESULTS)
            .min(YOUTUBE_MAX_RESULTS)
    }

    /// Fills unset credentials from `YOUTUBE_API_KEY` / `YOUTUBE_CHANNEL_ID`.
    pub fn apply_env_fallback(&mut self) {
        if self.api_key().is_none() {
            if let Ok(key) = std::env::var("YOUTUBE_API_KEY") {
                self.api_key = Some(key);
            }
        }
        if self.channel_id().is_none() {
            if let Ok(channel) = std::env::var("YOUTUBE_CHANNEL_ID") {
                self.channel_id = Some(channel);
            }
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectionConfig {
    #[serde(default = "default_attempts")]
    pub attempts: usize,
    #[serde(default = "default_min_remaining")]
    pub min_remaining: i64,
    /// Upper bound for `attempts` requested through the CLI or HTTP API.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: usize,
    pub seed: Option<u64>,
    #[serde(default)]
    pub parallel: bool,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            attempts: DEFAULT_ATTEMPTS,
            min_remaining: DEFAULT_MIN_REMAINING,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            seed: None,
            parallel: false,
        }
    }
}

fn default_attempts() -> usize {
    DEFAULT_ATTEMPTS
}

fn default_max_attempts() -> usize {
    DEFAULT_MAX_ATTEMPTS
}

fn default_min_remaining() -> i64 {
    DEFAULT_MIN_REMAINING
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

fn default_bind() -> String {
    "127.0.0.1:5000".to_string()
}

impl AppConfig {
    /// Loads and parses a TOML configuration file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(AppError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        let mut config: AppConfig =
            toml::from_str(&processed_content).map_err(|e| AppError::ConfigValidationError {
                field: "toml_parsing".to_string(),
                message: format!("TOML parsing error: {}", e),
            })?;
        config.source.youtube.apply_env_fallback();
        Ok(config)
    }

    /// Defaults plus credentials from the environment, for runs without a file.
    pub fn from_env() -> Self {
        let mut config = AppConfig::default();
        config.source.youtube.apply_env_fallback();
        config
    }

    /// Replaces `${VAR}` with the environment value; unset variables stay as written.
    fn substitute_env_vars(content: &str) -> String {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").unwrap();

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        result.to_string()
    }

    pub fn bind_addr(&self) -> Result<SocketAddr> {
        self.server
            .bind
            .parse()
            .map_err(|e| AppError::ConfigValidationError {
                field: "server.bind".to_string(),
                message: format!("Invalid socket address '{}': {}", self.server.bind, e),
            })
    }

    pub fn validate_config(&self) -> Result<()> {
        validation::validate_path("source.catalog_path", &self.source.catalog_path)?;
        validation::validate_url("source.youtube.base_url", &self.source.youtube.base_url)?;

        if let Some(max_results) = self.source.youtube.max_results {
            validation::validate_range(
                "source.youtube.max_results",
                max_results,
                1,
                YOUTUBE_MAX_RESULTS,
            )?;
        }

        validation::validate_positive_number("selection.max_attempts", self.selection.max_attempts, 1)?;
        validation::validate_range(
            "selection.attempts",
            self.selection.attempts,
            1,
            self.selection.max_attempts,
        )?;
        validation::validate_range(
            "selection.min_remaining",
            self.selection.min_remaining,
            0,
            i64::MAX,
        )?;

        self.bind_addr()?;

        if self.source.kind == SourceKind::YouTube {
            self.validate_youtube_credentials()?;
        }

        Ok(())
    }

    pub fn validate_youtube_credentials(&self) -> Result<()> {
        let youtube = &self.source.youtube;
        validation::validate_required_field("source.youtube.api_key", &youtube.api_key())?;
        validation::validate_required_field("source.youtube.channel_id", &youtube.channel_id())?;
        Ok(())
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
