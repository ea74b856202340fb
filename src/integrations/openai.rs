use async_openai::types::{
    ChatCompletionRequestMessage, ChatCompletionRequestUserMessage,
    ChatCompletionRequestUserMessageContent, CreateChatCompletionRequestArgs,
    CreateChatCompletionResponse, ReasoningEffort as ApiReasoningEffort,
};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::env;
use std::time::Duration;
use tracing::{debug, warn};

use super::provider::{GenerationRequest, ProviderError, ReasoningEffort, TextGenerator};
use crate::error::{KambaError, KambaResult};

pub const DEFAULT_MODEL: &str = "gemini-3-flash-preview";

/// Google's OpenAI-compatible endpoint for Gemini models
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/openai";

/// Environment variables consulted for the API key, in order
pub const API_KEY_VARS: [&str; 3] = ["KAMBA_API_KEY", "API_KEY", "OPENAI_API_KEY"];

/// Upper bound for a single chat-completions call
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Provider connection settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// API key (if not provided, KAMBA_API_KEY, API_KEY and finally OPENAI_API_KEY are used)
    pub api_key: Option<String>,
    /// Base URL of the chat-completions API
    pub api_base: String,
    /// Model identifier
    pub model: String,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_base: DEFAULT_API_BASE.to_string(),
            model: DEFAULT_MODEL.to_string(),
        }
    }
}

impl ProviderConfig {
    /// Explicit key, else the first key found in the environment
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key.clone().or_else(|| {
            API_KEY_VARS
                .iter()
                .find_map(|name| env::var(name).ok().filter(|v| !v.trim().is_empty()))
        })
    }

    /// Full URL of the chat-completions route
    pub fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.api_base.trim_end_matches('/'))
    }
}

/// Text generator backed by an OpenAI-compatible chat-completions endpoint.
///
/// Each call is a single POST; the status code is inspected before the body
/// is parsed so that quota errors are recognised whatever their body shape.
#[derive(Debug, Clone)]
pub struct OpenAiGenerator {
    http: reqwest::Client,
    url: String,
    api_key: Option<String>,
    model: String,
}

impl OpenAiGenerator {
    /// Create a new generator
    pub fn new(config: &ProviderConfig) -> KambaResult<Self> {
        if config.model.trim().is_empty() {
            return Err(KambaError::config_error("Provider model must not be empty"));
        }

        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| {
                KambaError::provider_error(format!("Failed to build HTTP client: {}", e))
            })?;

        Ok(Self {
            http,
            url: config.completions_url(),
            api_key: config.resolve_api_key(),
            model: config.model.clone(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl TextGenerator for OpenAiGenerator {
    async fn generate(&self, request: GenerationRequest) -> Result<String, ProviderError> {
        debug!(
            "Sending prompt to {} ({} chars, temperature {:?})",
            self.model,
            request.prompt.len(),
            request.params.temperature
        );

        let message = ChatCompletionRequestMessage::User(ChatCompletionRequestUserMessage {
            content: ChatCompletionRequestUserMessageContent::Text(request.prompt),
            name: None,
        });

        let mut chat_request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(vec![message])
            .build()
            .map_err(|e| ProviderError::Api(e.to_string()))?;

        if let Some(temperature) = request.params.temperature {
            chat_request.temperature = Some(temperature);
        }

        if request.params.reasoning == ReasoningEffort::Minimal {
            chat_request.reasoning_effort = Some(ApiReasoningEffort::Low);
        }

        let mut http_request = self.http.post(&self.url).json(&chat_request);
        if let Some(api_key) = &self.api_key {
            http_request = http_request.bearer_auth(api_key);
        }

        let response = http_request
            .send()
            .await
            .map_err(|e| ProviderError::Transport(e.to_string()))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ProviderError::Transport(e.to_string()))?;

        if !status.is_success() {
            let error = classify_response(status, &body);
            warn!("Provider answered {}: {}", status, error);
            return Err(error);
        }

        let completion: CreateChatCompletionResponse = serde_json::from_str(&body)
            .map_err(|e| ProviderError::Api(format!("Malformed completion: {}", e)))?;

        completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or(ProviderError::EmptyResponse)
    }
}

/// Map a non-success HTTP answer onto the provider taxonomy.
///
/// A 429 status is always a rate limit. Otherwise the error body is searched
/// for a provider code or status that names one.
pub fn classify_response(status: StatusCode, body: &str) -> ProviderError {
    let details = ErrorDetails::parse(body);
    let message = details.describe(status);

    if status == StatusCode::TOO_MANY_REQUESTS || details.code == Some(429) {
        return ProviderError::RateLimited(message);
    }
    ProviderError::from_api_message(message)
}

/// Error fields from either `{"error": {..}}` or Gemini's `[{"error": {..}}]`
#[derive(Debug, Default, PartialEq)]
struct ErrorDetails {
    message: Option<String>,
    status: Option<String>,
    code: Option<u64>,
}

impl ErrorDetails {
    fn parse(body: &str) -> Self {
        let value: Value = match serde_json::from_str(body) {
            Ok(value) => value,
            Err(_) => {
                return Self {
                    message: Some(body.trim().to_string()).filter(|m| !m.is_empty()),
                    ..Default::default()
                }
            }
        };

        let root = value
            .as_array()
            .and_then(|items| items.first())
            .unwrap_or(&value);
        let error = root.get("error").unwrap_or(root);

        Self {
            message: error
                .get("message")
                .or_else(|| error.get("detail"))
                .and_then(Value::as_str)
                .map(str::to_string),
            status: error
                .get("status")
                .or_else(|| error.get("type"))
                .and_then(Value::as_str)
                .map(str::to_string),
            code: error.get("code").and_then(|code| {
                code.as_u64()
                    .or_else(|| code.as_str().and_then(|s| s.parse().ok()))
            }),
        }
    }

    fn describe(&self, status: StatusCode) -> String {
        let mut text = format!("HTTP {}", status.as_u16());
        if let Some(provider_status) = &self.status {
            text.push_str(&format!(" {}", provider_status));
        }
        if let Some(message) = &self.message {
            text.push_str(&format!(": {}", message));
        }
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::integrations::assistant::{messages, SlangAssistant};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};

    const GEMINI_QUOTA_BODY: &str = r#"[{"error":{"code":429,"message":"Resource has been exhausted (e.g. check quota).","status":"RESOURCE_EXHAUSTED"}}]"#;

    /// Local endpoint answering every request with a fixed status and body
    struct StubServer {
        base: String,
        connections: Arc<AtomicUsize>,
        requests: Arc<Mutex<Vec<String>>>,
    }

    async fn read_request(stream: &mut TcpStream) -> String {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];
        loop {
            let n = stream.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);
            if let Some(end) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                let head = String::from_utf8_lossy(&buf[..end]).to_lowercase();
                let length = head
                    .lines()
                    .find_map(|line| line.strip_prefix("content-length:"))
                    .and_then(|v| v.trim().parse::<usize>().ok())
                    .unwrap_or(0);
                if buf.len() >= end + 4 + length {
                    break;
                }
            }
        }
        String::from_utf8_lossy(&buf).into_owned()
    }

    async fn serve(status_line: &'static str, body: &'static str) -> StubServer {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        let connections = Arc::new(AtomicUsize::new(0));
        let requests = Arc::new(Mutex::new(Vec::new()));

        let counter = connections.clone();
        let seen = requests.clone();
        tokio::spawn(async move {
            loop {
                let Ok((mut stream, _)) = listener.accept().await else {
                    break;
                };
                counter.fetch_add(1, Ordering::SeqCst);
                let request = read_request(&mut stream).await;
                seen.lock().unwrap().push(request);
                let response = format!(
                    "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status_line,
                    body.len(),
                    body
                );
                let _ = stream.write_all(response.as_bytes()).await;
                let _ = stream.shutdown().await;
            }
        });

        StubServer {
            base,
            connections,
            requests,
        }
    }

    fn generator_for(server: &StubServer) -> OpenAiGenerator {
        OpenAiGenerator::new(&ProviderConfig {
            api_key: Some("test-key".to_string()),
            api_base: server.base.clone(),
            model: "gemini-test".to_string(),
        })
        .unwrap()
    }

    fn prompt() -> GenerationRequest {
        GenerationRequest::new("Diz olá", Default::default())
    }

    #[tokio::test]
    async fn test_gemini_quota_body_is_rate_limited() {
        let server = serve("429 Too Many Requests", GEMINI_QUOTA_BODY).await;
        let err = generator_for(&server).generate(prompt()).await.unwrap_err();

        assert!(err.is_rate_limited(), "got {:?}", err);
        assert_eq!(server.connections.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_unrecognised_429_body_is_still_rate_limited() {
        let server = serve("429 Too Many Requests", r#"{"detail":"slow down"}"#).await;
        let err = generator_for(&server).generate(prompt()).await.unwrap_err();
        assert!(err.is_rate_limited(), "got {:?}", err);
    }

    #[tokio::test]
    async fn test_quota_reaches_assistant_as_rate_limit_message() {
        let server = serve("429 Too Many Requests", GEMINI_QUOTA_BODY).await;
        let assistant = SlangAssistant::new(Arc::new(generator_for(&server)));

        assert_eq!(assistant.cultural_context("Maka").await, messages::RATE_LIMITED);
        assert_eq!(server.connections.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_server_error_is_generic() {
        let server = serve(
            "500 Internal Server Error",
            r#"{"error":{"message":"backend unavailable","type":"server_error"}}"#,
        )
        .await;
        let err = generator_for(&server).generate(prompt()).await.unwrap_err();
        assert!(matches!(err, ProviderError::Api(_)), "got {:?}", err);
    }

    #[tokio::test]
    async fn test_successful_completion() {
        let server = serve(
            "200 OK",
            r#"{"id":"c1","object":"chat.completion","created":0,"model":"gemini-test","choices":[{"index":0,"message":{"role":"assistant","content":"Olá, kamba!"},"finish_reason":"stop"}]}"#,
        )
        .await;
        let text = generator_for(&server).generate(prompt()).await.unwrap();
        assert_eq!(text, "Olá, kamba!");

        let requests = server.requests.lock().unwrap();
        let request = requests[0].to_lowercase();
        assert!(request.starts_with("post /chat/completions"));
        assert!(request.contains("authorization: bearer test-key"));
        assert!(request.contains("\"model\":\"gemini-test\""));
    }

    #[tokio::test]
    async fn test_blank_completion_is_empty_response() {
        let server = serve(
            "200 OK",
            r#"{"id":"c1","object":"chat.completion","created":0,"model":"gemini-test","choices":[{"index":0,"message":{"role":"assistant","content":"  "},"finish_reason":"stop"}]}"#,
        )
        .await;
        let err = generator_for(&server).generate(prompt()).await.unwrap_err();
        assert_eq!(err, ProviderError::EmptyResponse);
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_transport_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        drop(listener);

        let generator = OpenAiGenerator::new(&ProviderConfig {
            api_key: None,
            api_base: base,
            model: "gemini-test".to_string(),
        })
        .unwrap();
        let err = generator.generate(prompt()).await.unwrap_err();
        assert!(matches!(err, ProviderError::Transport(_)), "got {:?}", err);
    }

    #[test]
    fn test_error_details_from_both_shapes() {
        let gemini = ErrorDetails::parse(GEMINI_QUOTA_BODY);
        assert_eq!(gemini.code, Some(429));
        assert_eq!(gemini.status.as_deref(), Some("RESOURCE_EXHAUSTED"));

        let openai_body = r#"{"error":{"message":"You exceeded your current quota","type":"insufficient_quota","code":"insufficient_quota"}}"#;
        let openai = ErrorDetails::parse(openai_body);
        assert_eq!(openai.code, None);
        assert_eq!(openai.status.as_deref(), Some("insufficient_quota"));
        assert!(classify_response(StatusCode::BAD_REQUEST, openai_body).is_rate_limited());

        let plain = ErrorDetails::parse("upstream timeout");
        assert_eq!(plain.message.as_deref(), Some("upstream timeout"));
    }

    #[test]
    fn test_request_id_digits_are_not_a_rate_limit() {
        let err = classify_response(
            StatusCode::BAD_REQUEST,
            r#"{"error":{"message":"Invalid model (request id req_84291)","type":"invalid_request_error"}}"#,
        );
        assert!(matches!(err, ProviderError::Api(_)), "got {:?}", err);
    }

    #[test]
    fn test_completions_url_trims_slash() {
        let config = ProviderConfig {
            api_base: "http://localhost:8080/v1/".to_string(),
            ..Default::default()
        };
        assert_eq!(config.completions_url(), "http://localhost:8080/v1/chat/completions");
    }

    #[test]
    fn test_explicit_key_wins() {
        let config = ProviderConfig {
            api_key: Some("explicit".to_string()),
            ..Default::default()
        };
        assert_eq!(config.resolve_api_key().as_deref(), Some("explicit"));
    }

    #[test]
    fn test_empty_model_rejected() {
        let config = ProviderConfig {
            model: "  ".to_string(),
            ..Default::default()
        };
        assert!(OpenAiGenerator::new(&config).is_err());
    }

    #[tokio::test]
    async fn test_live_generation() {
        // Skip if no API key is set
        let config = ProviderConfig::default();
        if config.resolve_api_key().is_none() {
            println!("Skipping provider test: No API key");
            return;
        }

        let generator = OpenAiGenerator::new(&config).unwrap();
        let result = generator.generate(prompt()).await;
        // Quota exhaustion on shared keys is acceptable here
        if let Ok(text) = result {
            assert!(!text.is_empty());
        }
    }
}
