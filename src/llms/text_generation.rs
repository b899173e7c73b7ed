//! Abstract text-generation capability.
//!
//! Defines the interface the agent uses to rephrase its rationales.
//! Implementations may fail for any reason (network, auth, quota); the
//! caller must treat every failure as "no rephrasing available".

use std::fmt;

use async_trait::async_trait;

/// Boxed error type for generation calls.
pub type GenerationError = Box<dyn std::error::Error + Send + Sync>;

/// A text-generation collaborator.
///
/// Implementations should handle error cases gracefully, including
/// timeouts, authentication failures and malformed responses; the agent
/// falls back to the unphrased text on any `Err`.
#[async_trait]
pub trait TextGeneration: Send + Sync + fmt::Debug {
    /// Model identifier for logging.
    fn model(&self) -> &str;

    /// Generate text for a prompt.
    async fn generate(
        &self,
        prompt: &str,
        max_tokens: u32,
        temperature: f64,
    ) -> Result<String, GenerationError>;
}

/// Null-object generator: always returns an empty string, which the
/// agent treats as "keep the original text". The default collaborator
/// when no provider is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopGeneration;

#[async_trait]
impl TextGeneration for NoopGeneration {
    fn model(&self) -> &str {
        "noop"
    }

    async fn generate(
        &self,
        _prompt: &str,
        _max_tokens: u32,
        _temperature: f64,
    ) -> Result<String, GenerationError> {
        Ok(String::new())
    }
}
