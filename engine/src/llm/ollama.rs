//! Ollama LLM Provider
//!
//! This module implements the LLMProvider trait for Ollama, a local LLM provider.
//! Ollama runs models locally on the user's machine, typically at http://localhost:11434.
//!
//! Key features:
//! - Local execution (no API keys required)
//! - Single-prompt `/api/generate` calls with temperature and token limits
//! - No search grounding; grounded research falls back to plain generation

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{Generation, GenerationOptions, LLMError, LLMProvider, Result};

/// Ollama provider configuration
#[derive(Debug, Clone)]
pub struct OllamaProvider {
    /// Base URL for Ollama API (typically http://localhost:11434)
    base_url: String,

    /// Model name to use (e.g., "llama3.1:8b")
    model: String,

    /// HTTP client for API requests
    client: Client,
}

impl OllamaProvider {
    /// Create a new Ollama provider
    ///
    /// # Arguments
    /// * `base_url` - Base URL for Ollama API (e.g., "http://localhost:11434")
    /// * `model` - Model name to use (e.g., "llama3.1:8b")
    pub fn new(base_url: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
            client: Client::new(),
        }
    }

    fn map_send_error(&self, e: reqwest::Error) -> LLMError {
        if e.is_timeout() {
            LLMError::Timeout
        } else if e.is_connect() {
            LLMError::ProviderUnavailable(format!(
                "Cannot connect to Ollama at {}. Is Ollama running?",
                self.base_url
            ))
        } else {
            LLMError::NetworkError(e.to_string())
        }
    }
}

#[async_trait]
impl LLMProvider for OllamaProvider {
    fn name(&self) -> &str {
        "ollama"
    }

    fn is_local(&self) -> bool {
        true
    }

    async fn generate(&self, prompt: &str, options: &GenerationOptions) -> Result<Generation> {
        if options.grounding {
            return Err(LLMError::InvalidRequest(
                "Ollama does not support grounded generation".to_string(),
            ));
        }

        tracing::debug!(
            "Ollama request: model={}, prompt_chars={}",
            self.model,
            prompt.len()
        );

        let request = OllamaRequest {
            model: &self.model,
            prompt,
            stream: false,
            options: OllamaOptions {
                temperature: options.temperature,
                num_predict: options.max_output_tokens,
            },
        };

        let url = format!("{}/api/generate", self.base_url);
        let start = std::time::Instant::now();
        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        tracing::info!(
            "Ollama response received in {:.1}s",
            start.elapsed().as_secs_f64()
        );

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(if status.as_u16() == 404 {
                LLMError::InvalidRequest(format!("Ollama model not found: {}", error_text))
            } else {
                LLMError::ProviderUnavailable(format!(
                    "Ollama API error ({}): {}",
                    status, error_text
                ))
            });
        }

        let ollama_response: OllamaResponse = response
            .json()
            .await
            .map_err(|e| LLMError::ParseError(format!("Failed to parse Ollama response: {}", e)))?;

        Ok(Generation::text(ollama_response.response))
    }

    async fn verify_credentials(&self) -> Result<()> {
        let response = self
            .client
            .get(format!("{}/api/tags", self.base_url))
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(LLMError::ProviderUnavailable(format!(
                "Ollama API error ({})",
                response.status()
            )))
        }
    }
}

/// Ollama API request format
#[derive(Debug, Serialize)]
struct OllamaRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: OllamaOptions,
}

#[derive(Debug, Serialize)]
struct OllamaOptions {
    temperature: f32,
    num_predict: u32,
}

/// Ollama API response format
#[derive(Debug, Deserialize)]
struct OllamaResponse {
    response: String,
    #[allow(dead_code)]
    #[serde(default)]
    done: bool,
}
