//! Generative-model client.
//!
//! The model is treated as an opaque text-completion service: we send one
//! prompt string plus a "return JSON" instruction and get raw text back.
//! No structured function-calling contract is assumed; all repair happens
//! downstream in [`crate::recover`].

use std::time::Duration;

use serde_json::json;

use crate::error::{Result, SynthesisError};

/// Default OpenAI-compatible endpoint base.
pub const DEFAULT_API_URL: &str = "https://api.openai.com/v1";

/// One completion request.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    /// Model identifier (from the generation config)
    pub model: String,
    /// The full prompt text
    pub prompt: String,
    /// Ask the endpoint for JSON-typed output
    pub json_output: bool,
}

/// Opaque text-completion service.
pub trait ModelClient {
    /// Send a prompt, receive raw response text.
    fn complete(&self, request: &CompletionRequest) -> Result<String>;
}

/// Blocking HTTP client for OpenAI-compatible chat-completion endpoints.
#[derive(Debug, Clone)]
pub struct HttpModelClient {
    base_url: String,
    api_key: String,
    client: reqwest::blocking::Client,
}

impl HttpModelClient {
    /// Create a client against the default endpoint.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_url(DEFAULT_API_URL, api_key)
    }

    /// Create a client against a custom endpoint base URL.
    pub fn with_url(base_url: impl Into<String>, api_key: impl Into<String>) -> Result<Self> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(120))
            .build()?;

        Ok(Self {
            base_url,
            api_key: api_key.into(),
            client,
        })
    }

    /// Endpoint base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl ModelClient for HttpModelClient {
    fn complete(&self, request: &CompletionRequest) -> Result<String> {
        let url = format!("{}/chat/completions", self.base_url);

        let mut body = json!({
            "model": request.model,
            "messages": [{"role": "user", "content": request.prompt}],
        });
        if request.json_output {
            body["response_format"] = json!({"type": "json_object"});
        }

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().unwrap_or_else(|_| "unknown error".to_string());
            return Err(SynthesisError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: serde_json::Value = response.json()?;
        parsed["choices"][0]["message"]["content"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| SynthesisError::MalformedResponse(parsed.to_string()))
    }
}
