// src/client.rs

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;

use crate::error::MapLlmError;

/// Default provider endpoint base.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Default completion model.
pub const DEFAULT_MODEL: &str = "gpt-4-turbo";

// Low temperature for deterministic outputs; token ceiling sized for the
// largest expected operation payload.
const COMPLETION_TEMPERATURE: f64 = 0.2;
const COMPLETION_MAX_TOKENS: u32 = 2000;

/// One message in a chat-style completion conversation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        ChatMessage {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        ChatMessage {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

#[derive(Serialize, Debug)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f64,
    max_tokens: u32,
}

#[derive(Deserialize, Debug)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize, Debug)]
struct ChatChoice {
    message: ChoiceMessage,
}

#[derive(Deserialize, Debug)]
struct ChoiceMessage {
    content: Option<String>,
}

/// Client for the LLM completion provider.
///
/// `LlmClient` holds the provider base URL, the model name and an underlying
/// `reqwest::Client` carrying the authorization header, and exposes a single
/// operation: one chat-style completion request per call, no batching,
/// retries or timeout logic.
///
/// # Initialization
///
/// ```rust,no_run
/// use llm_map_rs::LlmClient;
/// # use llm_map_rs::MapLlmError;
///
/// # fn main() -> Result<(), MapLlmError> {
/// // Explicit configuration:
/// let client = LlmClient::new("sk-my-key", None, None)?;
///
/// // Or from the process environment (OPENAI_API_KEY is required):
/// let client = LlmClient::from_env()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct LlmClient {
    base_url: String,
    model: String,
    http_client: Client,
}

impl LlmClient {
    /// Creates a new `LlmClient`.
    ///
    /// # Arguments
    ///
    /// * `api_key`: The provider API key. Must be non-empty; it is sent as a
    ///   bearer token on every request.
    /// * `base_url`: Optional base URL override (e.g. a proxy or a
    ///   compatible provider). Defaults to [`DEFAULT_BASE_URL`]. A missing
    ///   scheme is normalized to `https://`.
    /// * `model`: Optional model name override. Defaults to [`DEFAULT_MODEL`].
    pub fn new(
        api_key: &str,
        base_url: Option<&str>,
        model: Option<&str>,
    ) -> Result<Self, MapLlmError> {
        if api_key.trim().is_empty() {
            return Err(MapLlmError::MissingApiKey);
        }

        let mut temp_url_string = base_url.unwrap_or(DEFAULT_BASE_URL).to_string();
        if !temp_url_string.starts_with("http://") && !temp_url_string.starts_with("https://") {
            temp_url_string = format!("https://{}", temp_url_string);
        }

        let parsed_base_url = Url::parse(&temp_url_string)?;
        if parsed_base_url.cannot_be_a_base() {
            return Err(MapLlmError::InvalidInput(format!(
                "The base_url '{}' cannot be used as a base URL. Provide a full base URL (e.g. {}).",
                temp_url_string, DEFAULT_BASE_URL
            )));
        }

        let mut default_headers = HeaderMap::new();
        default_headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", api_key))
                .map_err(MapLlmError::InvalidHeaderValue)?,
        );
        default_headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http_client = Client::builder()
            .default_headers(default_headers)
            .build()
            .map_err(MapLlmError::ReqwestError)?;

        let final_base_url = parsed_base_url.as_str().trim_end_matches('/').to_string();

        log::debug!("LlmClient initialized with base url: {}", final_base_url);

        Ok(LlmClient {
            base_url: final_base_url,
            model: model.unwrap_or(DEFAULT_MODEL).to_string(),
            http_client,
        })
    }

    /// Creates a client from the process environment.
    ///
    /// `OPENAI_API_KEY` is required and its absence fails here, at call
    /// time. `LLM_MAP_BASE_URL` and `LLM_MAP_MODEL` override the defaults
    /// when present.
    pub fn from_env() -> Result<Self, MapLlmError> {
        let api_key = std::env::var("OPENAI_API_KEY").map_err(|_| MapLlmError::MissingApiKey)?;
        let base_url = std::env::var("LLM_MAP_BASE_URL").ok();
        let model = std::env::var("LLM_MAP_MODEL").ok();
        Self::new(&api_key, base_url.as_deref(), model.as_deref())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Sends one chat-completion request and returns the raw reply text from
    /// the first choice.
    ///
    /// Non-2xx responses are mapped into [`MapLlmError::ApiError`] with the
    /// provider's message when the body is parseable JSON; a success body
    /// without any choice content is an [`MapLlmError::UnexpectedResponse`].
    pub async fn complete(&self, messages: &[ChatMessage]) -> Result<String, MapLlmError> {
        let url = format!("{}/chat/completions", self.base_url);
        let body = ChatCompletionRequest {
            model: &self.model,
            messages,
            temperature: COMPLETION_TEMPERATURE,
            max_tokens: COMPLETION_MAX_TOKENS,
        };

        log::debug!(
            "Preparing completion request: URL={}, model={}, messages={}",
            url,
            self.model,
            messages.len()
        );

        let response = self
            .http_client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(MapLlmError::ReqwestError)?;

        let status = response.status();
        if status.is_success() {
            let body_bytes = response.bytes().await.map_err(MapLlmError::ReqwestError)?;
            log::debug!(
                "Completion request successful. Response body: {}",
                String::from_utf8_lossy(&body_bytes)
            );
            let parsed: ChatCompletionResponse =
                serde_json::from_slice(&body_bytes).map_err(MapLlmError::JsonError)?;
            parsed
                .choices
                .into_iter()
                .next()
                .and_then(|choice| choice.message.content)
                .ok_or_else(|| {
                    MapLlmError::UnexpectedResponse(
                        "Completion response contained no message content".to_string(),
                    )
                })
        } else {
            let error_body_bytes = response.bytes().await.map_err(MapLlmError::ReqwestError)?;
            let error_body_string = String::from_utf8_lossy(&error_body_bytes).to_string();
            log::warn!(
                "Completion request failed with status {} and body: {}",
                status,
                error_body_string
            );
            match serde_json::from_slice::<Value>(&error_body_bytes) {
                Ok(json_value) => Err(MapLlmError::from_response(status.as_u16(), json_value)),
                Err(_) => Err(MapLlmError::ApiError {
                    status: status.as_u16(),
                    message: error_body_string,
                }),
            }
        }
    }
}
