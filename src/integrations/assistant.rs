//! Slang rewriting, cultural context and entry translation over a text generator.
//!
//! Every call makes at most one provider request and always yields displayable text:
//! provider failures are logged and replaced by fixed messages, with rate limits
//! getting their own friendlier message.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

use super::provider::{
    GenerationParams, GenerationRequest, ProviderError, ReasoningEffort, TextGenerator,
};

/// User-facing strings produced by the assistant
pub mod messages {
    pub const RATE_LIMITED: &str =
        "Muitos pedidos seguidos à IA. Espera um minuto e tenta outra vez.";
    pub const REWRITE_EMPTY: &str = "Não foi possível traduzir no momento. Tente novamente.";
    pub const REWRITE_FAILED: &str = "Erro ao conectar com a IA. Verifique sua conexão.";
    pub const CONTEXT_EMPTY: &str = "Informação indisponível.";
    pub const CONTEXT_FAILED: &str = "Não foi possível carregar o contexto cultural.";
    pub const TRANSLATION_EMPTY: &str = "Tradução indisponível de momento. Tente novamente.";
    pub const TRANSLATION_FAILED: &str = "Não foi possível traduzir este termo agora.";
}

const REWRITE_TEMPERATURE: f32 = 0.8;
const TRANSLATION_TEMPERATURE: f32 = 0.3;

/// Direction of a phrase rewrite
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RewriteDirection {
    /// Standard Portuguese into Angolan slang
    #[default]
    TowardSlang,
    /// Slang into standard Portuguese
    TowardStandard,
}

/// Foreign languages an entry can be translated into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TargetLanguage {
    English,
    French,
}

impl TargetLanguage {
    pub fn name(&self) -> &'static str {
        match self {
            TargetLanguage::English => "English",
            TargetLanguage::French => "French",
        }
    }

    /// Short code shown on per-card buttons
    pub fn code(&self) -> &'static str {
        match self {
            TargetLanguage::English => "EN",
            TargetLanguage::French => "FR",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_lowercase().as_str() {
            "en" | "english" | "inglês" => Some(TargetLanguage::English),
            "fr" | "french" | "français" | "francês" => Some(TargetLanguage::French),
            _ => None,
        }
    }
}

impl fmt::Display for TargetLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Fallback strings for one kind of request
struct Fallbacks {
    label: &'static str,
    empty: &'static str,
    failed: &'static str,
}

const REWRITE: Fallbacks = Fallbacks {
    label: "rewrite",
    empty: messages::REWRITE_EMPTY,
    failed: messages::REWRITE_FAILED,
};

const CONTEXT: Fallbacks = Fallbacks {
    label: "cultural context",
    empty: messages::CONTEXT_EMPTY,
    failed: messages::CONTEXT_FAILED,
};

const TRANSLATION: Fallbacks = Fallbacks {
    label: "entry translation",
    empty: messages::TRANSLATION_EMPTY,
    failed: messages::TRANSLATION_FAILED,
};

/// Client for the three AI-assisted features. Stateless; cheap to clone.
#[derive(Clone)]
pub struct SlangAssistant {
    generator: Arc<dyn TextGenerator>,
}

impl SlangAssistant {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }

    /// Rewrite a phrase toward slang or toward standard Portuguese.
    ///
    /// Blank input returns an empty string without contacting the provider.
    pub async fn rewrite(&self, text: &str, direction: RewriteDirection) -> String {
        if text.trim().is_empty() {
            debug!("Skipping rewrite of blank input");
            return String::new();
        }

        let params = GenerationParams {
            temperature: Some(REWRITE_TEMPERATURE),
            reasoning: ReasoningEffort::Minimal,
        };
        self.ask(&REWRITE, rewrite_prompt(text, direction), params)
            .await
    }

    /// Short cultural background for a term
    pub async fn cultural_context(&self, term: &str) -> String {
        self.ask(&CONTEXT, context_prompt(term), GenerationParams::default())
            .await
    }

    /// Translate a term and its definition, formatted as the model returns it
    pub async fn translate_entry(
        &self,
        term: &str,
        definition: &str,
        language: TargetLanguage,
    ) -> String {
        let params = GenerationParams {
            temperature: Some(TRANSLATION_TEMPERATURE),
            reasoning: ReasoningEffort::Default,
        };
        self.ask(
            &TRANSLATION,
            translation_prompt(term, definition, language),
            params,
        )
        .await
    }

    async fn ask(&self, fallbacks: &Fallbacks, prompt: String, params: GenerationParams) -> String {
        let request = GenerationRequest::new(prompt, params);
        match self.generator.generate(request).await {
            Ok(text) if !text.trim().is_empty() => text,
            Ok(_) | Err(ProviderError::EmptyResponse) => {
                debug!("Provider returned no text for {}", fallbacks.label);
                fallbacks.empty.to_string()
            }
            Err(ProviderError::RateLimited(details)) => {
                warn!("Provider rate limit hit during {}: {}", fallbacks.label, details);
                messages::RATE_LIMITED.to_string()
            }
            Err(err) => {
                warn!("Provider request for {} failed: {}", fallbacks.label, err);
                fallbacks.failed.to_string()
            }
        }
    }
}

impl fmt::Debug for SlangAssistant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SlangAssistant").finish_non_exhaustive()
    }
}

fn rewrite_prompt(text: &str, direction: RewriteDirection) -> String {
    match direction {
        RewriteDirection::TowardSlang => format!(
            "Fala como um jovem luandense bem-disposto. Reescreve a frase abaixo com calão \
             angolano atual e autêntico (mambo, bwé, kamba, maka...), sem mudar o sentido. \
             Responde só com a frase reescrita.\nFrase: \"{}\"",
            text
        ),
        RewriteDirection::TowardStandard => format!(
            "És linguista especializado no português falado em Angola. Passa a frase abaixo, \
             cheia de calão angolano, para português padrão e explica brevemente as gírias \
             quando for útil.\nFrase: \"{}\"",
            text
        ),
    }
}

fn context_prompt(term: &str) -> String {
    format!(
        "Conta a origem, o contexto cultural e uma curiosidade sobre a gíria angolana \"{}\". \
         Tom educativo e divertido, no máximo um parágrafo curto.",
        term
    )
}

fn translation_prompt(term: &str, definition: &str, language: TargetLanguage) -> String {
    format!(
        "Translate this Angolan Portuguese slang entry into {}.\n\
         Term: \"{}\"\nDefinition: \"{}\"\n\
         Answer exactly in the form: <translated term> - <translated definition>",
        language.name(),
        term,
        definition
    )
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Scripted generator that records every request it receives
    #[derive(Default)]
    pub struct ScriptedGenerator {
        replies: Mutex<VecDeque<Result<String, ProviderError>>>,
        fallback: Option<Result<String, ProviderError>>,
        requests: Mutex<Vec<GenerationRequest>>,
    }

    impl ScriptedGenerator {
        /// Answer every request with the same reply
        pub fn always(reply: Result<String, ProviderError>) -> Self {
            Self {
                fallback: Some(reply),
                ..Default::default()
            }
        }

        pub fn push(&self, reply: Result<String, ProviderError>) {
            self.replies.lock().unwrap().push_back(reply);
        }

        pub fn requests(&self) -> Vec<GenerationRequest> {
            self.requests.lock().unwrap().clone()
        }

        pub fn call_count(&self) -> usize {
            self.requests.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl TextGenerator for ScriptedGenerator {
        async fn generate(&self, request: GenerationRequest) -> Result<String, ProviderError> {
            self.requests.lock().unwrap().push(request);
            let scripted = self.replies.lock().unwrap().pop_front();
            scripted
                .or_else(|| self.fallback.clone())
                .unwrap_or(Err(ProviderError::EmptyResponse))
        }
    }
}
