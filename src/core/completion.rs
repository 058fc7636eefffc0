//! The completion capability: persona instruction + history in, text out.
//!
//! [`CompletionCapability`] is the seam the request controller talks to.
//! [`GeminiClient`] implements it against the Gemini `generateContent`
//! endpoint and owns the translation from transcript roles to the roles the
//! provider expects.

use std::error::Error as StdError;
use std::fmt;

use async_trait::async_trait;
use tracing::debug;

use crate::api::{Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig};
use crate::core::message::{Message, Role};
use crate::utils::url::construct_api_url;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-3-flash-preview";
pub const TEMPERATURE: f64 = 0.7;
pub const TOP_P: f64 = 0.95;

/// Environment variables checked for the API credential, in order.
pub const API_KEY_ENV_VARS: [&str; 2] = ["GEMINI_API_KEY", "API_KEY"];

#[derive(Debug)]
pub enum CompletionError {
    /// No credential was found in the environment at startup.
    MissingCredential,
    /// The request never produced an HTTP response (DNS, TLS, connection reset, ...).
    Transport(reqwest::Error),
    /// The provider answered with a non-success status.
    Api { status: u16, message: String },
    /// A success response whose body could not be decoded.
    MalformedResponse(serde_json::Error),
    /// The task running the call panicked or was cancelled before it produced an outcome.
    Aborted(String),
}

impl CompletionError {
    pub fn is_transport(&self) -> bool {
        matches!(self, CompletionError::Transport(_))
    }
}

impl fmt::Display for CompletionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompletionError::MissingCredential => write!(
                f,
                "No API key configured (set {})",
                API_KEY_ENV_VARS.join(" or ")
            ),
            CompletionError::Transport(err) => write!(f, "Request failed: {err}"),
            CompletionError::Api { status, message } => {
                write!(f, "API error ({status}): {message}")
            }
            CompletionError::MalformedResponse(err) => {
                write!(f, "Could not decode API response: {err}")
            }
            CompletionError::Aborted(reason) => write!(f, "Completion task aborted: {reason}"),
        }
    }
}

impl StdError for CompletionError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            CompletionError::Transport(err) => Some(err),
            CompletionError::MalformedResponse(err) => Some(err),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for CompletionError {
    fn from(err: reqwest::Error) -> Self {
        CompletionError::Transport(err)
    }
}

#[async_trait]
pub trait CompletionCapability: Send + Sync {
    /// Generates the assistant's next turn.
    ///
    /// `history` holds the turns before `new_message`; the new message is
    /// passed separately and must not already be part of `history`.
    async fn generate(
        &self,
        persona_instruction: &str,
        new_message: &str,
        history: &[Message],
    ) -> Result<String, CompletionError>;
}

/// Role label Gemini expects for a transcript role.
pub fn provider_role(role: Role) -> &'static str {
    match role {
        Role::User => "user",
        Role::Assistant => "model",
    }
}

pub fn build_request(
    persona_instruction: &str,
    new_message: &str,
    history: &[Message],
) -> GenerateContentRequest {
    let mut contents: Vec<Content> = history
        .iter()
        .map(|message| Content::text(Some(provider_role(message.role)), message.content.clone()))
        .collect();
    contents.push(Content::text(Some(provider_role(Role::User)), new_message));

    GenerateContentRequest {
        system_instruction: Content::text(None, persona_instruction),
        contents,
        generation_config: GenerationConfig {
            temperature: TEMPERATURE,
            top_p: TOP_P,
        },
    }
}

/// First non-empty environment value among [`API_KEY_ENV_VARS`].
pub fn api_key_from_env() -> Option<String> {
    API_KEY_ENV_VARS
        .iter()
        .filter_map(|name| std::env::var(name).ok())
        .map(|value| value.trim().to_string())
        .find(|value| !value.is_empty())
}

fn extract_error_summary(value: &serde_json::Value) -> Option<String> {
    let summary = value
        .pointer("/error/message")
        .and_then(|v| v.as_str())
        .or_else(|| value.get("message").and_then(|v| v.as_str()))
        .or_else(|| value.get("error").and_then(|v| v.as_str()))?;

    let collapsed = summary.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.is_empty() {
        None
    } else {
        Some(collapsed)
    }
}

/// One-line description of an error body, preferring the JSON `error.message`.
pub(crate) fn summarize_api_error(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return "<empty body>".to_string();
    }
    serde_json::from_str::<serde_json::Value>(trimmed)
        .ok()
        .and_then(|value| extract_error_summary(&value))
        .unwrap_or_else(|| trimmed.split_whitespace().collect::<Vec<_>>().join(" "))
}

#[derive(Clone)]
pub struct GeminiClient {
    client: reqwest::Client,
    base_url: String,
    model: String,
    api_key: Option<String>,
}

impl GeminiClient {
    /// Construction never validates the credential; a missing key surfaces as
    /// [`CompletionError::MissingCredential`] on the first call.
    pub fn new(
        client: reqwest::Client,
        base_url: impl Into<String>,
        model: impl Into<String>,
        api_key: Option<String>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            model: model.into(),
            api_key,
        }
    }

    pub fn from_env(
        client: reqwest::Client,
        base_url: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self::new(client, base_url, model, api_key_from_env())
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self) -> String {
        construct_api_url(
            &self.base_url,
            &format!("models/{}:generateContent", self.model),
        )
    }
}

#[async_trait]
impl CompletionCapability for GeminiClient {
    async fn generate(
        &self,
        persona_instruction: &str,
        new_message: &str,
        history: &[Message],
    ) -> Result<String, CompletionError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(CompletionError::MissingCredential)?;

        let request = build_request(persona_instruction, new_message, history);
        debug!(
            model = %self.model,
            turns = request.contents.len(),
            "sending generateContent request"
        );

        let response = self
            .client
            .post(self.endpoint())
            .header("Content-Type", "application/json")
            .header("x-goog-api-key", api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(CompletionError::Api {
                status: status.as_u16(),
                message: summarize_api_error(&body),
            });
        }

        let parsed: GenerateContentResponse =
            serde_json::from_str(&body).map_err(CompletionError::MalformedResponse)?;
        Ok(parsed.text())
    }
}
