//! Hugging Face Inference API text-generation provider.
//!
//! Minimal integration with the hosted inference endpoint via `reqwest`.
//! Construction fails when no API key is available so callers can fall
//! back to [`NoopGeneration`](crate::llms::text_generation::NoopGeneration)
//! gracefully.

use async_trait::async_trait;
use serde_json::Value;

use crate::llms::text_generation::{GenerationError, TextGeneration};

/// Default hosted model.
pub const DEFAULT_MODEL_ID: &str = "meta-llama/Meta-Llama-3-8B-Instruct";

/// Environment variable holding the API key.
pub const API_KEY_ENV: &str = "HF_API_KEY";

/// Request timeout in seconds.
const REQUEST_TIMEOUT_SECS: u64 = 60;

/// Maximum characters of an error body carried into an error message.
const MAX_ERROR_SNIPPET_CHARS: usize = 500;

/// Truncate an API error body for an error message. Bodies can be
/// non-ASCII, so the cut must land on a character boundary.
fn error_snippet(text: &str) -> String {
    text.chars().take(MAX_ERROR_SNIPPET_CHARS).collect()
}

/// Text generation against the Hugging Face Inference API.
#[derive(Debug, Clone)]
pub struct HuggingFaceCompletion {
    model_id: String,
    api_key: String,
    endpoint: String,
    client: reqwest::Client,
}

impl HuggingFaceCompletion {
    /// Create a provider for the default model, reading the key from
    /// the `HF_API_KEY` environment variable.
    pub fn from_env() -> Result<Self, GenerationError> {
        Self::new(DEFAULT_MODEL_ID, None)
    }

    /// Create a provider for a specific model.
    ///
    /// # Arguments
    ///
    /// * `model_id` - Hosted model identifier.
    /// * `api_key` - Optional API key (defaults to the `HF_API_KEY`
    ///   environment variable).
    ///
    /// # Errors
    ///
    /// Fails when no API key is available, so the caller can decide to
    /// run without phrasing.
    pub fn new(model_id: impl Into<String>, api_key: Option<String>) -> Result<Self, GenerationError> {
        let model_id = model_id.into();
        let api_key = api_key
            .or_else(|| std::env::var(API_KEY_ENV).ok())
            .ok_or_else(|| {
                format!(
                    "{API_KEY_ENV} not found in environment. \
                     Set {API_KEY_ENV} to enable Hugging Face phrasing."
                )
            })?;

        let endpoint = format!("https://api-inference.huggingface.co/models/{model_id}");
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            model_id,
            api_key,
            endpoint,
            client,
        })
    }

    /// Build the inference request payload.
    fn build_request_body(&self, prompt: &str, max_tokens: u32, temperature: f64) -> Value {
        serde_json::json!({
            "inputs": prompt,
            "parameters": {
                "max_new_tokens": max_tokens,
                "temperature": temperature,
                // Keep hosted-inference defaults simple and robust.
                "return_full_text": false,
            },
        })
    }

    /// Pull generated text out of a response.
    ///
    /// The API returns either `[{"generated_text": ...}]` or
    /// `{"generated_text": ...}`; anything else is stringified as a
    /// fallback.
    fn parse_response(data: &Value) -> String {
        if let Some(text) = data
            .as_array()
            .and_then(|arr| arr.first())
            .and_then(|first| first.get("generated_text"))
            .and_then(|t| t.as_str())
        {
            return text.trim().to_string();
        }
        if let Some(text) = data.get("generated_text").and_then(|t| t.as_str()) {
            return text.trim().to_string();
        }
        data.to_string()
    }
}

#[async_trait]
impl TextGeneration for HuggingFaceCompletion {
    fn model(&self) -> &str {
        &self.model_id
    }

    async fn generate(
        &self,
        prompt: &str,
        max_tokens: u32,
        temperature: f64,
    ) -> Result<String, GenerationError> {
        log::debug!(
            "HuggingFaceCompletion.generate: model={}, prompt_len={}",
            self.model_id,
            prompt.len(),
        );

        let body = self.build_request_body(prompt, max_tokens, temperature);
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(
                format!("Hugging Face API error ({}): {}", status, error_snippet(&text)).into(),
            );
        }

        let data: Value = response.json().await?;
        Ok(Self::parse_response(&data))
    }
}
