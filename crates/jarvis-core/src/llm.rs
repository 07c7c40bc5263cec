//! Minimal chat-completion client.

use crate::config::LlmConfig;
use crate::error::{JarvisError, Result};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful assistant.";

pub const JARVIS_PERSONA: &str = "You are Jarvis, an elite AI assistant modeled after the wit of \
Alfred Pennyworth and the refinement of Tony Stark's original Jarvis system. Your tone is calm, \
articulate, and subtly witty, capable of dry humor, but never sarcastic unless prompted. Your \
purpose is to assist in development tasks, content generation, system logic, and high-level \
planning. Maintain a composed demeanor, offer helpful insight, and occasionally add light \
commentary if the moment calls for it. You are always loyal, focused, and quietly brilliant.";

pub const NO_RESPONSE: &str = "No response";

const TIMEOUT: Duration = Duration::from_secs(120);

/// Model name for the CLI's `--model` shorthand.
pub fn model_for_flag(flag: &str) -> &'static str {
    match flag.trim() {
        "3.5" | "gpt-3.5-turbo" => "gpt-3.5-turbo",
        _ => "gpt-4",
    }
}

pub fn api_key_from_env() -> Result<String> {
    match std::env::var(API_KEY_ENV) {
        Ok(key) if !key.trim().is_empty() => Ok(key),
        _ => Err(JarvisError::MissingApiKey),
    }
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: String,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [Message],
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Message,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}

// ---------------------------------------------------------------------------
// Prompting
// ---------------------------------------------------------------------------

/// One prompt: the user's text plus per-call overrides of [`LlmConfig`].
#[derive(Debug, Clone, PartialEq)]
pub struct PromptRequest {
    pub text: String,
    pub model: Option<String>,
    pub temperature: Option<f32>,
    /// Use the Jarvis persona instead of the plain assistant prompt.
    pub persona: bool,
}

impl PromptRequest {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            model: None,
            temperature: None,
            persona: false,
        }
    }

    pub fn messages(&self) -> Vec<Message> {
        let system = if self.persona {
            JARVIS_PERSONA
        } else {
            DEFAULT_SYSTEM_PROMPT
        };
        vec![Message::system(system), Message::user(self.text.clone())]
    }
}

/// Send one chat completion and return the first choice's content, or
/// [`NO_RESPONSE`] when the API returns no choices.
pub fn complete(cfg: &LlmConfig, api_key: &str, req: &PromptRequest) -> Result<String> {
    let model = req.model.as_deref().unwrap_or(&cfg.model);
    let messages = req.messages();
    let body = ChatRequest {
        model,
        messages: &messages,
        temperature: req.temperature.unwrap_or(cfg.temperature),
        max_tokens: cfg.max_tokens,
    };

    let url = format!("{}/chat/completions", cfg.api_base.trim_end_matches('/'));
    tracing::debug!(%url, model, "sending chat completion");

    let client = Client::builder().timeout(TIMEOUT).build()?;
    let response = client
        .post(&url)
        .bearer_auth(api_key)
        .json(&body)
        .send()?;

    let status = response.status();
    let text = response.text()?;
    if !status.is_success() {
        let message = serde_json::from_str::<ApiError>(&text)
            .map(|e| e.error.message)
            .unwrap_or(text);
        return Err(JarvisError::Llm(format!("HTTP {}: {message}", status.as_u16())));
    }

    let parsed: ChatResponse = serde_json::from_str(&text)
        .map_err(|e| JarvisError::Llm(format!("unreadable response: {e}")))?;
    Ok(parsed
        .choices
        .into_iter()
        .next()
        .map(|c| c.message.content)
        .filter(|c| !c.is_empty())
        .unwrap_or_else(|| NO_RESPONSE.to_string()))
}
