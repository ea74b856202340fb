use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How much extended reasoning the model may spend before answering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReasoningEffort {
    /// Cheapest setting the provider accepts; used where latency matters
    Minimal,
    /// Provider default
    Default,
}

/// Decoding parameters attached to one request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationParams {
    /// Sampling temperature; `None` keeps the provider default
    pub temperature: Option<f32>,
    pub reasoning: ReasoningEffort,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            temperature: None,
            reasoning: ReasoningEffort::Default,
        }
    }
}

/// One text-generation request
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub prompt: String,
    pub params: GenerationParams,
}

impl GenerationRequest {
    pub fn new(prompt: impl Into<String>, params: GenerationParams) -> Self {
        Self {
            prompt: prompt.into(),
            params,
        }
    }
}

/// Failure returned by a text generator
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    /// Request-rate or quota limit hit
    #[error("Rate limited: {0}")]
    RateLimited(String),

    /// Network failure or timeout before a response arrived
    #[error("Transport error: {0}")]
    Transport(String),

    /// Provider answered with an error
    #[error("API error: {0}")]
    Api(String),

    /// Provider answered successfully but without text
    #[error("Empty response from provider")]
    EmptyResponse,
}

impl ProviderError {
    /// Classify a raw provider message, picking out rate-limit conditions
    pub fn from_api_message(message: impl Into<String>) -> Self {
        let message = message.into();
        if is_rate_limit_message(&message) {
            ProviderError::RateLimited(message)
        } else {
            ProviderError::Api(message)
        }
    }

    pub fn is_rate_limited(&self) -> bool {
        matches!(self, ProviderError::RateLimited(_))
    }
}

const RATE_LIMIT_MARKERS: [&str; 6] = [
    "too many requests",
    "rate limit",
    "rate_limit",
    "quota",
    "resource_exhausted",
    "resource has been exhausted",
];

/// Words that mark a following `429` as a status or error code
const STATUS_PREFIXES: [&str; 4] = ["http", "status", "code", "error"];

/// Whether a provider message describes a rate limit or exhausted quota
pub fn is_rate_limit_message(message: &str) -> bool {
    let lower = message.to_lowercase();
    RATE_LIMIT_MARKERS
        .iter()
        .any(|marker| lower.contains(marker))
        || has_status_429(&lower)
}

/// `429` as a standalone token, either leading the message or after a status word
fn has_status_429(lower: &str) -> bool {
    let tokens: Vec<&str> = lower
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|token| !token.is_empty())
        .collect();

    tokens.iter().enumerate().any(|(index, token)| {
        *token == "429"
            && (index == 0 || STATUS_PREFIXES.contains(&tokens[index - 1]))
    })
}

/// A hosted text-generation capability
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generate text for a single prompt. At most one attempt is made.
    async fn generate(&self, request: GenerationRequest) -> Result<String, ProviderError>;
}
