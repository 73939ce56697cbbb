use super::{Generation, GenerationOptions, LLMError, LLMProvider};
use crate::config::GeminiConfig;
use crate::secrets::SecretString;
use async_trait::async_trait;
use serde_json::json;

/// Maximum number of grounding URIs surfaced as sources
const MAX_GROUNDING_SOURCES: usize = 5;
const WEB_SOURCE_LABEL: &str = "Web Source";

pub struct GeminiProvider {
    config: GeminiConfig,
    api_key: SecretString,
    client: reqwest::Client,
}

impl GeminiProvider {
    pub fn new(config: GeminiConfig, api_key: SecretString) -> Self {
        Self {
            config,
            api_key,
            client: reqwest::Client::new(),
        }
    }

    fn endpoint(&self, suffix: &str) -> String {
        format!(
            "{}/models/{}{}?key={}",
            self.config.base_url.trim_end_matches('/'),
            self.config.model,
            suffix,
            self.api_key.unsecure()
        )
    }

    async fn map_status(response: reqwest::Response) -> LLMError {
        let status = response.status();
        let text = response.text().await.unwrap_or_default();

        match status.as_u16() {
            400 | 404 => LLMError::InvalidRequest(text),
            401 | 403 => LLMError::AuthenticationFailed(text),
            429 => LLMError::RateLimitExceeded,
            _ => LLMError::ProviderUnavailable(format!("Gemini API error ({}): {}", status, text)),
        }
    }
}

/// Pull grounding source URIs out of a candidate.
///
/// Looks at the first five chunks. Each web chunk yields its URI, or
/// "Web Source" when the URI is missing, and other chunk kinds are skipped.
/// A "Google Search" marker follows when the response carries a search
/// entry point.
fn extract_sources(candidate: &serde_json::Value) -> Vec<String> {
    let Some(metadata) = candidate.get("groundingMetadata") else {
        return Vec::new();
    };

    let mut sources: Vec<String> = metadata
        .get("groundingChunks")
        .and_then(|c| c.as_array())
        .map(|chunks| {
            chunks
                .iter()
                .take(MAX_GROUNDING_SOURCES)
                .filter_map(|chunk| chunk.get("web"))
                .map(|web| {
                    web.get("uri")
                        .and_then(|u| u.as_str())
                        .unwrap_or(WEB_SOURCE_LABEL)
                        .to_string()
                })
                .collect()
        })
        .unwrap_or_default();

    if metadata.get("searchEntryPoint").is_some() {
        sources.push("Google Search".to_string());
    }

    sources
}

#[async_trait]
impl LLMProvider for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    fn is_local(&self) -> bool {
        false
    }

    fn supports_grounding(&self) -> bool {
        true
    }

    async fn generate(&self, prompt: &str, options: &GenerationOptions) -> super::Result<Generation> {
        let url = self.endpoint(":generateContent");

        let mut payload = serde_json::Map::new();
        payload.insert(
            "contents".to_string(),
            json!([{ "role": "user", "parts": [{ "text": prompt }] }]),
        );
        payload.insert(
            "generationConfig".to_string(),
            json!({
                "temperature": options.temperature,
                "maxOutputTokens": options.max_output_tokens,
            }),
        );
        if options.grounding {
            payload.insert("tools".to_string(), json!([{ "google_search": {} }]));
        }

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(&payload)
            .send()
            .await
            .map_err(|e| LLMError::NetworkError(crate::secrets::scrub_text(&e.to_string())))?;

        if !response.status().is_success() {
            return Err(Self::map_status(response).await);
        }

        let data: serde_json::Value = response
            .json()
            .await
            .map_err(|e| LLMError::ParseError(e.to_string()))?;

        let candidate = data
            .get("candidates")
            .and_then(|c| c.as_array())
            .and_then(|c| c.first())
            .ok_or_else(|| LLMError::ParseError("No candidates in response".to_string()))?;

        let parts = candidate
            .pointer("/content/parts")
            .and_then(|p| p.as_array())
            .ok_or_else(|| LLMError::ParseError("No parts in candidate content".to_string()))?;

        let mut full_text = String::new();
        for part in parts {
            if let Some(text) = part.get("text").and_then(|t| t.as_str()) {
                full_text.push_str(text);
            }
        }

        let sources = extract_sources(candidate);
        if !sources.is_empty() {
            tracing::debug!("Gemini grounding returned {} sources", sources.len());
        }

        Ok(Generation {
            text: full_text,
            sources,
        })
    }

    async fn verify_credentials(&self) -> super::Result<()> {
        let response = self
            .client
            .get(self.endpoint(""))
            .send()
            .await
            .map_err(|e| LLMError::NetworkError(crate::secrets::scrub_text(&e.to_string())))?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(Self::map_status(response).await)
        }
    }
}
