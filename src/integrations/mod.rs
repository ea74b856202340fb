// Integrations with the hosted generative-text provider

pub mod assistant;
pub mod openai;
pub mod provider;

pub use assistant::{RewriteDirection, SlangAssistant, TargetLanguage};
pub use openai::{OpenAiGenerator, ProviderConfig};
pub use provider::{GenerationParams, GenerationRequest, ProviderError, TextGenerator};
