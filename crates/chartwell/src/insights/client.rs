//! Chat-completions client.
//!
//! [`LanguageModel`] is the seam between prompt building and the network.
//! [`HttpLanguageModel`] implements it over a blocking HTTP client speaking
//! the OpenAI chat-completions format.

use std::{env, time::Duration};

use log::{debug, warn};
use reqwest::{StatusCode, blocking::Client};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::InsightsError;
use crate::config::InsightsConfig;

/// Author of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// One message of a chat-completions conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    role: Role,
    content: String,
}

impl ChatMessage {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn content(&self) -> &str {
        &self.content
    }
}

/// A model-agnostic completion request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletionRequest {
    messages: Vec<ChatMessage>,
    /// `response_format` object forwarded verbatim, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<Value>,
}

impl CompletionRequest {
    pub fn new(messages: Vec<ChatMessage>) -> Self {
        Self {
            messages,
            response_format: None,
        }
    }

    /// Constrains the reply to match a JSON schema.
    pub fn with_json_schema(mut self, name: &str, schema: Value) -> Self {
        self.response_format = Some(serde_json::json!({
            "type": "json_schema",
            "json_schema": {
                "name": name,
                "strict": true,
                "schema": schema,
            },
        }));
        self
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn response_format(&self) -> Option<&Value> {
        self.response_format.as_ref()
    }
}

/// A language model that answers a completion request with text.
pub trait LanguageModel {
    /// Sends `request` and returns the text content of the reply.
    ///
    /// # Errors
    ///
    /// Returns [`InsightsError::Transport`] if the model cannot be reached or
    /// refuses the request, and [`InsightsError::Decode`] if the reply
    /// envelope carries no text content.
    fn complete(&self, request: &CompletionRequest) -> Result<String, InsightsError>;
}

#[derive(Serialize)]
struct ChatCompletionBody<'a> {
    model: &'a str,
    #[serde(flatten)]
    request: &'a CompletionRequest,
}

/// Blocking client for an OpenAI-compatible chat-completions endpoint.
///
/// The API key is read once from the environment variable named by
/// [`InsightsConfig::api_key_env`]. Requests are sent without an
/// `Authorization` header when the variable is unset, which suits local
/// OpenAI-compatible servers.
#[derive(Debug)]
pub struct HttpLanguageModel {
    client: Client,
    endpoint: String,
    model: String,
    api_key: Option<String>,
}

impl HttpLanguageModel {
    /// Creates a client from the insights configuration.
    ///
    /// # Errors
    ///
    /// Returns [`InsightsError::Transport`] if the HTTP client cannot be
    /// initialized.
    pub fn new(config: &InsightsConfig) -> Result<Self, InsightsError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs()))
            .build()
            .map_err(|err| InsightsError::Transport(err.to_string()))?;

        let api_key = env::var(config.api_key_env())
            .ok()
            .filter(|key| !key.trim().is_empty());
        if api_key.is_none() {
            warn!(variable = config.api_key_env(); "API key variable is not set, sending unauthenticated requests");
        }

        Ok(Self {
            client,
            endpoint: config.endpoint().to_string(),
            model: config.model().to_string(),
            api_key,
        })
    }
}

impl LanguageModel for HttpLanguageModel {
    fn complete(&self, request: &CompletionRequest) -> Result<String, InsightsError> {
        let body = ChatCompletionBody {
            model: &self.model,
            request,
        };

        debug!(endpoint = self.endpoint, model = self.model; "Sending chat completion");
        let mut builder = self.client.post(&self.endpoint).json(&body);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder
            .send()
            .map_err(|err| InsightsError::Transport(err.to_string()))?;
        let status = response.status();
        let text = response
            .text()
            .map_err(|err| InsightsError::Transport(err.to_string()))?;

        read_reply(status, &text)
    }
}

/// Maps an HTTP reply onto the message content or an [`InsightsError`].
fn read_reply(status: StatusCode, body: &str) -> Result<String, InsightsError> {
    if !status.is_success() {
        warn!(status = status.as_u16(); "Chat completion refused");
        return Err(InsightsError::Transport(format!(
            "endpoint returned {status}: {}",
            body.trim()
        )));
    }

    debug!(bytes = body.len(); "Chat completion received");
    extract_content(body)
}

/// Extracts `choices[0].message.content` from a chat-completions envelope.
pub(super) fn extract_content(envelope: &str) -> Result<String, InsightsError> {
    let value: Value = serde_json::from_str(envelope)
        .map_err(|err| InsightsError::Decode(format!("invalid response envelope: {err}")))?;

    value
        .pointer("/choices/0/message/content")
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| InsightsError::Decode("response envelope has no message content".to_string()))
}
