//! Ollama chat backend.

use std::time::Duration;

use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::GenAiError;
use crate::{ChatRequest, GenerativeService, Result};

/// Connection settings for an Ollama server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OllamaConfig {
    /// Base URL of the Ollama API, e.g. `http://127.0.0.1:11434/`.
    pub endpoint: String,
    /// Per-request timeout. `None` waits for slow models indefinitely.
    pub timeout_secs: Option<u64>,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://127.0.0.1:11434/".to_string(),
            timeout_secs: None,
        }
    }
}

/// Backend talking to Ollama's `/api/chat` endpoint.
pub struct OllamaBackend {
    base_url: String,
    client: Client,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: String,
}

impl OllamaBackend {
    /// Validate the endpoint and check that the server answers.
    pub fn connect(config: &OllamaConfig) -> Result<Self> {
        let base_url = normalize_endpoint(&config.endpoint)?;

        let client = Client::builder()
            .timeout(config.timeout_secs.map(Duration::from_secs))
            .build()
            .map_err(|e| GenAiError::Connection(e.to_string()))?;

        debug!("Connecting to Ollama at {}", base_url);
        let resp = client
            .get(&base_url)
            .send()
            .map_err(|e| GenAiError::Connection(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(GenAiError::Connection(format!(
                "failed to connect to Ollama API: HTTP {}",
                resp.status()
            )));
        }

        Ok(Self { base_url, client })
    }

    /// Base URL requests are sent to (always ends with `/`).
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl GenerativeService for OllamaBackend {
    fn invoke(&self, request: &ChatRequest) -> Result<String> {
        let url = format!("{}api/chat", self.base_url);
        debug!("POST {} (model {})", url, request.model);

        let resp = self
            .client
            .post(&url)
            .json(request)
            .send()
            .map_err(|e| GenAiError::Connection(e.to_string()))?;

        let status = resp.status();
        let body = resp
            .text()
            .map_err(|e| GenAiError::Decode(e.to_string()))?;

        if !status.is_success() {
            return Err(GenAiError::Status {
                status: status.as_u16(),
                body,
            });
        }

        parse_chat_body(&body)
    }
}

/// Require an http(s) scheme and a trailing slash.
fn normalize_endpoint(endpoint: &str) -> Result<String> {
    let endpoint = endpoint.trim();
    if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
        return Err(GenAiError::InvalidEndpoint(format!(
            "URL must start with 'http://' or 'https://': {}",
            endpoint
        )));
    }

    if endpoint.ends_with('/') {
        Ok(endpoint.to_string())
    } else {
        Ok(format!("{}/", endpoint))
    }
}

/// Read either a single JSON response or newline-delimited stream chunks.
fn parse_chat_body(body: &str) -> Result<String> {
    if let Ok(resp) = serde_json::from_str::<ChatResponse>(body) {
        return Ok(resp.message.content);
    }

    let mut text = String::new();
    for line in body.lines().filter(|l| !l.trim().is_empty()) {
        let chunk: ChatResponse = serde_json::from_str(line)
            .map_err(|e| GenAiError::Decode(format!("{}: {}", e, line)))?;
        text.push_str(&chunk.message.content);
    }

    Ok(text)
}
