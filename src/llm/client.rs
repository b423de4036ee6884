//! Chat-completion HTTP client implementation.
//!
//! This module provides `ChatClient` for making synchronous requests to an
//! OpenAI-compatible `/chat/completions` endpoint, along with the builder used
//! to configure it.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ModelError;
use crate::models::{DEFAULT_API_BASE, DEFAULT_API_KEY, DEFAULT_MODEL, Settings};

/// Environment variable consulted when no base URL was given to the builder.
pub const ENV_API_BASE: &str = "DOCTAG_API_BASE";
/// Environment variable consulted when no API key was given to the builder.
pub const ENV_API_KEY: &str = "DOCTAG_API_KEY";
/// Environment variable consulted when no model was given to the builder.
pub const ENV_MODEL: &str = "DOCTAG_MODEL";

const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);
const ERROR_BODY_LIMIT: usize = 200;

/// Builder for constructing `ChatClient` instances.
///
/// # Examples
///
/// ```
/// use doctag::llm::ChatClientBuilder;
///
/// let client = ChatClientBuilder::new()
///     .base_url("http://127.0.0.1:1234/v1")
///     .api_key("lm-studio")
///     .model("local-model")
///     .build()
///     .expect("Failed to create client");
/// assert_eq!(client.endpoint(), "http://127.0.0.1:1234/v1/chat/completions");
/// ```
#[derive(Debug, Default)]
pub struct ChatClientBuilder {
    base_url: Option<String>,
    api_key: Option<String>,
    model: Option<String>,
    timeout: Option<Duration>,
}

impl ChatClientBuilder {
    /// Creates a new `ChatClientBuilder` with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a builder preloaded with the connection fields of `settings`.
    pub fn from_settings(settings: &Settings) -> Self {
        Self::new()
            .base_url(&settings.api_base)
            .api_key(&settings.api_key)
            .model(&settings.model)
    }

    /// Sets the API base URL (e.g. "http://127.0.0.1:1234/v1").
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Sets the bearer token sent with every request.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Sets the model name placed in the request body.
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Overrides the whole-request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Builds the `ChatClient` with the configured settings.
    ///
    /// # Environment Variables
    ///
    /// Each of base URL, API key and model that was not set on the builder is
    /// read from `DOCTAG_API_BASE`, `DOCTAG_API_KEY` and `DOCTAG_MODEL`
    /// respectively, falling back to the stock local-server defaults.
    ///
    /// # Errors
    ///
    /// Returns `ModelError::InvalidUrl` if the base URL does not parse, or
    /// `ModelError::Network` if the HTTP client cannot be constructed.
    pub fn build(self) -> Result<ChatClient, ModelError> {
        let base_url = resolve(self.base_url, ENV_API_BASE, DEFAULT_API_BASE);
        let api_key = resolve(self.api_key, ENV_API_KEY, DEFAULT_API_KEY);
        let model = resolve(self.model, ENV_MODEL, DEFAULT_MODEL);

        reqwest::Url::parse(&base_url)
            .map_err(|e| ModelError::InvalidUrl(format!("{}: {}", base_url, e)))?;

        let client = reqwest::blocking::Client::builder()
            .timeout(self.timeout.unwrap_or(REQUEST_TIMEOUT))
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .map_err(ModelError::Network)?;

        Ok(ChatClient {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            model,
        })
    }
}

/// Builder value first, then the environment variable, then the default.
fn resolve(explicit: Option<String>, env_var: &str, default: &str) -> String {
    explicit.unwrap_or_else(|| std::env::var(env_var).unwrap_or_else(|_| default.to_string()))
}

/// Synchronous client for an OpenAI-compatible chat-completion endpoint.
///
/// Should be constructed using `ChatClientBuilder`.
pub struct ChatClient {
    client: reqwest::blocking::Client,
    base_url: String,
    api_key: String,
    model: String,
}

/// Trait for chat-completion operations.
///
/// This is the seam the pipeline depends on, so tests can substitute a mock.
pub trait ChatClientTrait: Send + Sync {
    /// Sends one system/user message pair and returns the first choice's text, trimmed.
    ///
    /// # Errors
    ///
    /// Returns `ModelError` when the endpoint is unreachable, answers with an
    /// error status, or returns no choices.
    fn complete(&self, system_prompt: &str, user_content: &str) -> Result<String, ModelError>;
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f32,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

impl ChatClient {
    /// Returns the base URL configured for this client.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the model name configured for this client.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Returns the full chat-completion URL requests are posted to.
    pub fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    fn complete_internal(
        &self,
        system_prompt: &str,
        user_content: &str,
    ) -> Result<String, ModelError> {
        let url = self.endpoint();
        let request = build_request(&self.model, system_prompt, user_content);

        debug!(endpoint = %url, model = %self.model, "sending chat completion request");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .map_err(ModelError::from_transport)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(ModelError::Http {
                status: status.as_u16(),
                body: truncate(&body, ERROR_BODY_LIMIT),
            });
        }

        let body = response.text().map_err(ModelError::from_transport)?;
        parse_reply(&body)
    }
}

impl ChatClientTrait for ChatClient {
    fn complete(&self, system_prompt: &str, user_content: &str) -> Result<String, ModelError> {
        self.complete_internal(system_prompt, user_content)
    }
}

fn build_request<'a>(model: &'a str, system_prompt: &'a str, user_content: &'a str) -> ChatRequest<'a> {
    ChatRequest {
        model,
        messages: [
            ChatMessage {
                role: "system",
                content: system_prompt,
            },
            ChatMessage {
                role: "user",
                content: user_content,
            },
        ],
        temperature: 0.0,
        stream: false,
    }
}

/// Pulls the trimmed text of the first choice out of a response body.
///
/// A first choice whose message has no content counts as no usable choice.
fn parse_reply(body: &str) -> Result<String, ModelError> {
    let response: ChatResponse = serde_json::from_str(body).map_err(ModelError::Serialization)?;
    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .map(|content| content.trim().to_string())
        .ok_or(ModelError::EmptyChoices)
}

fn truncate(text: &str, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}
