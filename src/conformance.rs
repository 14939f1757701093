//! Conformance review through a hosted chat model.
//!
//! The document text is wrapped in a fixed review prompt and submitted to a
//! [`ChatService`]. Whatever goes wrong on the service side, the caller gets
//! text back: either the model's answer or [`FALLBACK_RESPONSE`].

use std::time::Duration;

#[cfg(any(feature = "remote", test))]
use serde::Deserialize;
#[cfg(feature = "remote")]
use serde::Serialize;

use crate::error::ChatError;

/// Shown instead of the report when the service gives no usable answer.
pub const FALLBACK_RESPONSE: &str = "No response generated, please try again.";

/// Open Finance Brasil standards page the review is measured against.
pub const STANDARDS_URL: &str =
    "https://openfinancebrasil.atlassian.net/wiki/spaces/OF/pages/17377278/Padr+es";

/// Default request timeout for the chat service (4 minutes).
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(240);

/// Default sampling temperature.
pub const DEFAULT_TEMPERATURE: f32 = 1.0;

/// A stateless prompt-in, text-out chat service.
pub trait ChatService {
    /// Submit a prompt and return the model's text.
    fn submit(&self, prompt: &str) -> Result<String, ChatError>;
}

/// Build the review prompt for an OpenAPI document.
pub fn build_prompt(document_text: &str) -> String {
    format!(
        "You are a technical expert in APIs following the Open Finance Brasil standard. \
Your goal is to analyze an OpenAPI specification and produce a detailed report on its \
conformance with the official Open Finance standards, as described here: {url}\n\
\n\
Split the analysis into three sections:\n\
1. Points that conform to the standards (for example: correct versioning under `/v1/`, \
use of `securitySchemes`, standardized headers).\n\
2. Points that do not conform or are missing (for example: no OAuth2 authentication, \
path structure outside the standard, missing `info.version`).\n\
3. Practical corrections for each non-conformity found (for example: \"the path \
`/cotacoes` should follow the pattern `/v1/market-data/quotes`\").\n\
\n\
Additional context:\n\
- The analysis must be technical and objective.\n\
- Use formal but clear language.\n\
- Reference specific standards where possible.\n\
- Assume the OpenAPI 3.0 structure.\n\
\n\
Specification:\n\
\n\
{document}\n",
        url = STANDARDS_URL,
        document = document_text,
    )
}

/// Ask `service` for a conformance report on `document_text`.
///
/// Service failures and blank answers are logged and replaced by
/// [`FALLBACK_RESPONSE`].
pub fn conformance_report(service: &dyn ChatService, document_text: &str) -> String {
    match service.submit(&build_prompt(document_text)) {
        Ok(text) if !text.trim().is_empty() => text,
        Ok(_) => {
            tracing::warn!("chat service returned blank text");
            FALLBACK_RESPONSE.to_string()
        }
        Err(e) => {
            tracing::warn!(error = %e, "conformance review failed");
            FALLBACK_RESPONSE.to_string()
        }
    }
}

/// Connection settings for [`HttpChatClient`].
#[derive(Debug, Clone)]
pub struct ChatConfig {
    /// Chat-completions URL, e.g. `https://host/v1/chat/completions`.
    pub endpoint: String,
    pub model: String,
    /// Sent as a bearer token when set.
    pub api_key: Option<String>,
    pub temperature: f32,
    pub timeout: Duration,
}

impl ChatConfig {
    pub fn new(endpoint: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            model: model.into(),
            api_key: None,
            temperature: DEFAULT_TEMPERATURE,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn api_key(mut self, api_key: Option<String>) -> Self {
        self.api_key = api_key;
        self
    }

    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[cfg(feature = "remote")]
#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
    temperature: f32,
}

#[cfg(feature = "remote")]
#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[cfg(any(feature = "remote", test))]
#[derive(Debug, Deserialize)]
struct ChatCompletion {
    choices: Vec<ChatChoice>,
}

#[cfg(any(feature = "remote", test))]
#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[cfg(any(feature = "remote", test))]
#[derive(Debug, Deserialize)]
struct ChatReply {
    content: Option<String>,
}

/// Extract the first choice's text from a chat-completions response body.
#[cfg(any(feature = "remote", test))]
fn parse_completion(body: &str) -> Result<String, ChatError> {
    let completion: ChatCompletion =
        serde_json::from_str(body).map_err(|e| ChatError::InvalidResponse {
            message: e.to_string(),
        })?;

    completion
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .filter(|text| !text.is_empty())
        .ok_or(ChatError::EmptyResponse)
}

/// Blocking client for an OpenAI-compatible chat-completions endpoint.
///
/// Requires the `remote` feature (enabled by default). No retries.
#[cfg(feature = "remote")]
pub struct HttpChatClient {
    config: ChatConfig,
    client: reqwest::blocking::Client,
}

#[cfg(feature = "remote")]
impl HttpChatClient {
    /// # Errors
    ///
    /// Returns `ChatError::Request` if the HTTP client can't be built.
    pub fn new(config: ChatConfig) -> Result<Self, ChatError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|source| ChatError::Request {
                endpoint: config.endpoint.clone(),
                source,
            })?;
        Ok(Self { config, client })
    }
}

#[cfg(feature = "remote")]
impl ChatService for HttpChatClient {
    fn submit(&self, prompt: &str) -> Result<String, ChatError> {
        let body = ChatRequest {
            model: &self.config.model,
            messages: [ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: self.config.temperature,
        };

        let mut request = self.client.post(&self.config.endpoint).json(&body);
        if let Some(key) = &self.config.api_key {
            request = request.bearer_auth(key);
        }

        tracing::debug!(
            endpoint = %self.config.endpoint,
            model = %self.config.model,
            "submitting chat request"
        );
        let response = request.send().map_err(|source| ChatError::Request {
            endpoint: self.config.endpoint.clone(),
            source,
        })?;

        let status = response.status();
        let text = response.text().map_err(|source| ChatError::Request {
            endpoint: self.config.endpoint.clone(),
            source,
        })?;
        if !status.is_success() {
            return Err(ChatError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        parse_completion(&text)
    }
}
