//! LLM Provider Abstraction Layer
//!
//! This module defines the text generation port used by the pipeline stages.
//! The `LLMProvider` trait is the contract every backend (Gemini, Ollama)
//! implements: given a prompt and generation options, return text or fail.
//!
//! Stages never call a provider directly. They go through [`Generator`],
//! which bounds every call with a timeout so that a hung request takes the
//! same fallback path as any other generation failure.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

pub mod gemini;
pub mod ollama;

/// Result type for LLM operations
pub type Result<T> = std::result::Result<T, LLMError>;

/// Errors that can occur during LLM operations
#[derive(Debug, thiserror::Error)]
pub enum LLMError {
    #[error("Provider unavailable: {0}")]
    ProviderUnavailable(String),

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Timeout")]
    Timeout,

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Empty response")]
    EmptyResponse,
}

/// Per-call generation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationOptions {
    /// Sampling temperature
    pub temperature: f32,

    /// Upper bound on generated tokens
    pub max_output_tokens: u32,

    /// Augment the call with web search grounding
    #[serde(default)]
    pub grounding: bool,
}

impl GenerationOptions {
    /// Plain generation with the given temperature and token budget
    pub fn new(temperature: f32, max_output_tokens: u32) -> Self {
        Self {
            temperature,
            max_output_tokens,
            grounding: false,
        }
    }

    /// Enable search grounding
    pub fn with_grounding(mut self) -> Self {
        self.grounding = true;
        self
    }
}

/// Text returned by a provider
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Generation {
    /// Generated text
    pub text: String,

    /// Source identifiers surfaced by grounded calls
    #[serde(default)]
    pub sources: Vec<String>,
}

impl Generation {
    /// A plain text generation without sources
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            sources: Vec::new(),
        }
    }
}

/// LLM Provider trait that all providers must implement
#[async_trait]
pub trait LLMProvider: Send + Sync {
    /// Returns the name of the provider (e.g., "gemini", "ollama")
    fn name(&self) -> &str;

    /// Returns true if this is a local provider (e.g., Ollama)
    fn is_local(&self) -> bool;

    /// Whether grounded (search-augmented) generation is available
    fn supports_grounding(&self) -> bool {
        false
    }

    /// Generate text for a single prompt
    ///
    /// # Returns
    /// * `Ok(Generation)` - Generated text plus any grounding sources
    /// * `Err(LLMError)` - If the request fails
    async fn generate(&self, prompt: &str, options: &GenerationOptions) -> Result<Generation>;

    /// Check that the provider is reachable and the credentials are accepted.
    ///
    /// Called once before a pipeline starts. Default implementation succeeds.
    async fn verify_credentials(&self) -> Result<()> {
        Ok(())
    }
}

/// Timeout-bounded handle to a provider, shared by all pipeline stages
#[derive(Clone)]
pub struct Generator {
    provider: Arc<dyn LLMProvider>,
    timeout: Duration,
}

impl Generator {
    pub fn new(provider: Arc<dyn LLMProvider>, timeout: Duration) -> Self {
        Self { provider, timeout }
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Generate text, mapping an elapsed timeout to `LLMError::Timeout`.
    ///
    /// Grounded requests against providers without grounding support fail
    /// with `InvalidRequest` without touching the network.
    pub async fn generate(&self, prompt: &str, options: &GenerationOptions) -> Result<Generation> {
        if options.grounding && !self.provider.supports_grounding() {
            return Err(LLMError::InvalidRequest(format!(
                "{} does not support grounded generation",
                self.provider.name()
            )));
        }

        tracing::debug!(
            "Generating with {}: prompt_chars={}, temperature={}, max_tokens={}, grounding={}",
            self.provider.name(),
            prompt.len(),
            options.temperature,
            options.max_output_tokens,
            options.grounding
        );

        match tokio::time::timeout(self.timeout, self.provider.generate(prompt, options)).await {
            Ok(Ok(generation)) if generation.text.trim().is_empty() => Err(LLMError::EmptyResponse),
            Ok(result) => result,
            Err(_) => {
                tracing::warn!(
                    "Provider {} timed out after {}s",
                    self.provider.name(),
                    self.timeout.as_secs_f64()
                );
                Err(LLMError::Timeout)
            }
        }
    }
}
