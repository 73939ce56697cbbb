//! Configuration management
//!
//! This module handles loading, validation, and management of the BlogFlow configuration.
//! Configuration is stored in TOML format at ~/.blogflow/config.toml.
//!
//! # Configuration Sections
//!
//! - **core**: Log level and output directory
//! - **pipeline**: Quality threshold, iteration bound and context limits
//! - **llm**: Provider selection, request timeout and per-provider settings
//!
//! # Overrides
//!
//! After the file is parsed, two environment variables are applied:
//! - `GEMINI_MODEL` replaces `llm.gemini.model`
//! - `OUTPUT_DIR` replaces `core.output_dir`
//!
//! CLI flags are applied on top by the `run` handler.
//!
//! # Examples
//!
//! ```no_run
//! use blogflow_engine::config::Config;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::load_or_create()?;
//!
//! println!("Output directory: {:?}", config.core.output_dir);
//! println!("Default provider: {}", config.llm.default_provider);
//! # Ok(())
//! # }
//! ```

use sdk::errors::EngineError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Providers the engine knows how to build
pub const VALID_PROVIDERS: [&str; 2] = ["gemini", "ollama"];

const VALID_LOG_LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Core settings
    #[serde(default)]
    pub core: CoreConfig,

    /// Pipeline tuning
    #[serde(default)]
    pub pipeline: PipelineConfig,

    /// LLM provider configuration
    #[serde(default)]
    pub llm: LLMConfig,
}

/// Core configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoreConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Directory where published articles are written (supports ~ expansion)
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

/// Pipeline configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Combined score at or above which a draft is approved (0.0-10.0)
    #[serde(default = "default_quality_threshold")]
    pub quality_threshold: f64,

    /// Maximum number of review rounds; the last one is force-approved
    #[serde(default = "default_max_iterations")]
    pub max_iterations: u32,

    /// Characters of research findings given to the reviewer for fact checking
    #[serde(default = "default_review_context_chars")]
    pub review_context_chars: usize,

    /// Characters of research findings kept in the brief
    #[serde(default = "default_research_context_chars")]
    pub research_context_chars: usize,
}

/// LLM provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LLMConfig {
    /// Default LLM provider (gemini, ollama)
    #[serde(default = "default_provider")]
    pub default_provider: String,

    /// Per-call timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Gemini provider settings
    #[serde(default)]
    pub gemini: GeminiConfig,

    /// Ollama provider settings
    #[serde(default)]
    pub ollama: OllamaConfig,
}

/// Gemini provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiConfig {
    /// Base URL for Gemini API
    #[serde(default = "default_gemini_base_url")]
    pub base_url: String,

    /// Model name
    #[serde(default = "default_gemini_model")]
    pub model: String,
    // Note: API key comes from GOOGLE_API_KEY or the OS keychain, not from config
}

/// Ollama provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OllamaConfig {
    /// Base URL for Ollama API
    #[serde(default = "default_ollama_base_url")]
    pub base_url: String,

    /// Model name
    #[serde(default = "default_ollama_model")]
    pub model: String,
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("output")
}

fn default_quality_threshold() -> f64 {
    7.0
}

fn default_max_iterations() -> u32 {
    3
}

fn default_review_context_chars() -> usize {
    1000
}

fn default_research_context_chars() -> usize {
    8000
}

fn default_provider() -> String {
    "gemini".to_string()
}

fn default_request_timeout() -> u64 {
    120
}

fn default_gemini_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_gemini_model() -> String {
    "gemini-2.0-flash-exp".to_string()
}

fn default_ollama_base_url() -> String {
    "http://localhost:11434".to_string()
}

fn default_ollama_model() -> String {
    "llama3.1:8b".to_string()
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            output_dir: default_output_dir(),
        }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            quality_threshold: default_quality_threshold(),
            max_iterations: default_max_iterations(),
            review_context_chars: default_review_context_chars(),
            research_context_chars: default_research_context_chars(),
        }
    }
}

impl Default for LLMConfig {
    fn default() -> Self {
        Self {
            default_provider: default_provider(),
            request_timeout_secs: default_request_timeout(),
            gemini: GeminiConfig::default(),
            ollama: OllamaConfig::default(),
        }
    }
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            base_url: default_gemini_base_url(),
            model: default_gemini_model(),
        }
    }
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            base_url: default_ollama_base_url(),
            model: default_ollama_model(),
        }
    }
}

impl Config {
    /// Load configuration from the default location (~/.blogflow/config.toml)
    ///
    /// If the configuration file doesn't exist, creates a default configuration.
    /// Environment overrides are applied and the result is validated.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Configuration file cannot be read or written
    /// - TOML parsing fails
    /// - Validation fails
    pub fn load_or_create() -> Result<Self, EngineError> {
        let config_path = Self::default_config_path()?;

        if config_path.exists() {
            Self::load_from_path(&config_path)
        } else {
            Self::create_default(&config_path)
        }
    }

    /// Load from an explicit path if given, otherwise from the default location
    pub fn load(path: Option<&Path>) -> Result<Self, EngineError> {
        match path {
            Some(path) => Self::load_from_path(path),
            None => Self::load_or_create(),
        }
    }

    /// Load configuration from a specific path
    pub fn load_from_path(path: &Path) -> Result<Self, EngineError> {
        let contents = fs::read_to_string(path)
            .map_err(|e| EngineError::Config(format!("Failed to read config file: {}", e)))?;

        Self::from_toml_str(&contents)
    }

    /// Parse, apply environment overrides and validate
    pub fn from_toml_str(contents: &str) -> Result<Self, EngineError> {
        let mut config: Config = toml::from_str(contents)
            .map_err(|e| EngineError::Config(format!("Failed to parse config: {}", e)))?;

        config.apply_env_overrides(|name| std::env::var(name).ok());
        config.validate_and_process()?;

        Ok(config)
    }

    /// Create default configuration and save to path
    fn create_default(path: &Path) -> Result<Self, EngineError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                EngineError::Config(format!("Failed to create config directory: {}", e))
            })?;
        }

        let config = Self::default();
        let toml_string = config.to_toml()?;

        fs::write(path, toml_string)
            .map_err(|e| EngineError::Config(format!("Failed to write config file: {}", e)))?;

        tracing::info!("Created default configuration at {:?}", path);

        let mut config = config;
        config.apply_env_overrides(|name| std::env::var(name).ok());
        config.validate_and_process()?;
        Ok(config)
    }

    /// Serialize the configuration to pretty TOML
    pub fn to_toml(&self) -> Result<String, EngineError> {
        toml::to_string_pretty(self)
            .map_err(|e| EngineError::Config(format!("Failed to serialize config: {}", e)))
    }

    /// Get the default configuration file path (~/.blogflow/config.toml)
    pub fn default_config_path() -> Result<PathBuf, EngineError> {
        let home = dirs::home_dir()
            .ok_or_else(|| EngineError::Config("Could not determine home directory".to_string()))?;

        Ok(home.join(".blogflow").join("config.toml"))
    }

    /// Apply `GEMINI_MODEL` and `OUTPUT_DIR` overrides from the given lookup
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(model) = lookup("GEMINI_MODEL").filter(|v| !v.trim().is_empty()) {
            tracing::debug!("GEMINI_MODEL overrides configured model");
            self.llm.gemini.model = model.trim().to_string();
        }

        if let Some(dir) = lookup("OUTPUT_DIR").filter(|v| !v.trim().is_empty()) {
            tracing::debug!("OUTPUT_DIR overrides configured output directory");
            self.core.output_dir = PathBuf::from(dir.trim());
        }
    }

    /// Validate and process configuration
    ///
    /// This method:
    /// - Validates log level, provider and pipeline ranges
    /// - Expands ~ in the output directory
    ///
    /// The output directory is created lazily when an article is written.
    pub fn validate_and_process(&mut self) -> Result<(), EngineError> {
        if !VALID_LOG_LEVELS.contains(&self.core.log_level.as_str()) {
            return Err(EngineError::Config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.core.log_level,
                VALID_LOG_LEVELS.join(", ")
            )));
        }

        if !VALID_PROVIDERS.contains(&self.llm.default_provider.as_str()) {
            return Err(EngineError::Config(format!(
                "Invalid default provider '{}'. Must be one of: {}",
                self.llm.default_provider,
                VALID_PROVIDERS.join(", ")
            )));
        }

        self.pipeline.validate()?;

        if self.llm.request_timeout_secs == 0 {
            return Err(EngineError::Config(
                "request_timeout_secs must be at least 1".to_string(),
            ));
        }

        self.core.output_dir = expand_path(&self.core.output_dir)?;

        Ok(())
    }
}

impl PipelineConfig {
    /// Range checks shared by file loading and CLI overrides
    pub fn validate(&self) -> Result<(), EngineError> {
        if !(0.0..=10.0).contains(&self.quality_threshold) {
            return Err(EngineError::Config(
                "quality_threshold must be between 0.0 and 10.0".to_string(),
            ));
        }

        if self.max_iterations == 0 {
            return Err(EngineError::Config(
                "max_iterations must be at least 1".to_string(),
            ));
        }

        if self.review_context_chars == 0 || self.research_context_chars == 0 {
            return Err(EngineError::Config(
                "context limits must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }
}

/// Expand ~ in path to user's home directory
pub fn expand_path(path: &Path) -> Result<PathBuf, EngineError> {
    let path_str = path
        .to_str()
        .ok_or_else(|| EngineError::Config("Invalid UTF-8 in path".to_string()))?;

    if let Some(rest) = path_str.strip_prefix("~/") {
        let home = dirs::home_dir()
            .ok_or_else(|| EngineError::Config("Could not determine home directory".to_string()))?;

        Ok(home.join(rest))
    } else if path_str == "~" {
        dirs::home_dir()
            .ok_or_else(|| EngineError::Config("Could not determine home directory".to_string()))
    } else {
        Ok(path.to_path_buf())
    }
}
