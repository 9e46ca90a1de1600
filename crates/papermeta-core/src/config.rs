//! papermeta Configuration Management
//!
//! Handles configuration from environment variables and TOML config files,
//! with defaults that reproduce the reference extraction heuristics.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Field extraction limits
    pub extraction: ExtractionConfig,

    /// Record sink settings
    pub sink: SinkConfig,

    /// Entity engine selection
    pub engine: EngineConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable source
    pub fn from_vars<F>(get: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        // Sink
        if let Some(output) = get("PAPERMETA_OUTPUT") {
            config.sink.output = PathBuf::from(output);
        }
        if let Some(format) = get("PAPERMETA_SINK_FORMAT") {
            config.sink.format = format.parse()?;
        }
        if let Some(len) = get("PAPERMETA_MAX_CELL_LENGTH") {
            config.sink.max_cell_length = len.parse().map_err(|_| ConfigError::InvalidValue {
                key: "PAPERMETA_MAX_CELL_LENGTH".to_string(),
                value: len,
            })?;
        }

        // Engine
        if let Some(kind) = get("PAPERMETA_ENGINE") {
            config.engine.kind = kind.parse()?;
        }

        // Logging
        if let Some(level) = get("LOG_LEVEL") {
            config.logging.level = level;
        }
        if let Some(json) = get("LOG_JSON") {
            config.logging.json_format = matches!(json.to_lowercase().as_str(), "1" | "true");
        }

        Ok(config)
    }

    /// Load from a TOML file
    pub fn from_file(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let content = std::fs::read_to_string(&path).map_err(|e| ConfigError::FileReadError {
            path: path.clone(),
            source: e,
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path,
            message: e.to_string(),
        })
    }

    /// Merge with environment variables (env takes precedence)
    pub fn with_env_override(self) -> Result<Self, ConfigError> {
        self.with_var_override(|key| std::env::var(key).ok())
    }

    /// Merge with an arbitrary variable source (variables take precedence)
    pub fn with_var_override<F>(mut self, get: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env_config = Self::from_vars(&get)?;

        // Only override if a variable was actually set
        if get("PAPERMETA_OUTPUT").is_some() {
            self.sink.output = env_config.sink.output;
        }
        if get("PAPERMETA_SINK_FORMAT").is_some() {
            self.sink.format = env_config.sink.format;
        }
        if get("PAPERMETA_MAX_CELL_LENGTH").is_some() {
            self.sink.max_cell_length = env_config.sink.max_cell_length;
        }
        if get("PAPERMETA_ENGINE").is_some() {
            self.engine.kind = env_config.engine.kind;
        }
        if get("LOG_LEVEL").is_some() {
            self.logging.level = env_config.logging.level;
        }
        if get("LOG_JSON").is_some() {
            self.logging.json_format = env_config.logging.json_format;
        }

        Ok(self)
    }
}

/// Limits applied by the field extractors
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Number of leading lines scanned for author names
    pub author_lines: usize,

    /// Maximum number of authors kept
    pub max_authors: usize,

    /// A first line must be longer than this to count as a title
    pub min_title_len: usize,

    /// Maximum number of conclusion sentences kept
    pub max_conclusion_sentences: usize,

    /// Maximum number of topics kept
    pub max_topics: usize,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            author_lines: 3,
            max_authors: 3,
            min_title_len: 5,
            max_conclusion_sentences: 5,
            max_topics: 5,
        }
    }
}

/// Record sink configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SinkConfig {
    /// Output file the sink appends to
    pub output: PathBuf,

    /// Storage format
    pub format: SinkFormat,

    /// Cells longer than this many characters are truncated and suffixed with "..."
    pub max_cell_length: usize,
}

impl Default for SinkConfig {
    fn default() -> Self {
        Self {
            output: PathBuf::from("papermeta.csv"),
            format: SinkFormat::Csv,
            max_cell_length: 10_000,
        }
    }
}

/// Supported sink formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SinkFormat {
    Csv,
    Jsonl,
}

impl std::str::FromStr for SinkFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "jsonl" | "ndjson" => Ok(Self::Jsonl),
            _ => Err(ConfigError::InvalidValue {
                key: "PAPERMETA_SINK_FORMAT".to_string(),
                value: s.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for SinkFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Csv => write!(f, "csv"),
            Self::Jsonl => write!(f, "jsonl"),
        }
    }
}

/// Entity engine configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Which engine implementation to load
    pub kind: EngineKind,
}

/// Available entity engines
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EngineKind {
    /// Built-in regex and dictionary engine
    #[default]
    Rules,
}

impl std::str::FromStr for EngineKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "rules" | "rule" | "regex" => Ok(Self::Rules),
            _ => Err(ConfigError::InvalidValue {
                key: "PAPERMETA_ENGINE".to_string(),
                value: s.to_string(),
            }),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// JSON format for logs
    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    FileReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}
