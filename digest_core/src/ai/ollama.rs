use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client as ReqClient;
use serde::{Deserialize, Serialize};

use crate::ai::dto::GenerationRequest;
use crate::ai::handler::TextGenerator;
use crate::ai::prompt::build_prompt;
use crate::error::{DigestError, DigestResult};

#[derive(Serialize, Debug)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Serialize, Debug)]
struct ChatOptions {
    temperature: f32,
    num_ctx: usize,
    num_predict: usize,
}

#[derive(Serialize, Debug)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    stream: bool,
    options: ChatOptions,
}

#[derive(Deserialize, Debug)]
struct ChatResponseMessage {
    content: String,
}

#[derive(Deserialize, Debug)]
struct ChatResponse {
    message: Option<ChatResponseMessage>,
}

/// Text generation through a local Ollama server (`/api/chat`).
#[derive(Clone)]
pub struct OllamaGenerator {
    client: ReqClient,
    base_url: String,
    model: String,
    language: String,
    temperature: f32,
    context_window_tokens: usize,
    max_output_tokens: usize,
}

impl OllamaGenerator {
    pub fn new(
        base_url: &str,
        model: String,
        language: String,
        temperature: f32,
        context_window_tokens: usize,
        max_output_tokens: usize,
        timeout: Duration,
    ) -> DigestResult<Self> {
        let client = ReqClient::builder()
            .user_agent("digest-core/1.0")
            .timeout(timeout)
            .build()
            .map_err(|e| DigestError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            model,
            language,
            temperature,
            context_window_tokens,
            max_output_tokens,
        })
    }
}

#[async_trait]
impl TextGenerator for OllamaGenerator {
    async fn generate(&self, request: &GenerationRequest) -> DigestResult<String> {
        let kind = request.kind();
        let prompt = build_prompt(request, &self.language);

        let body = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: prompt.instructions,
                },
                ChatMessage {
                    role: "user",
                    content: prompt.input,
                },
            ],
            stream: false,
            options: ChatOptions {
                temperature: self.temperature,
                num_ctx: self.context_window_tokens,
                num_predict: self.max_output_tokens,
            },
        };

        let response = self
            .client
            .post(format!("{}/api/chat", self.base_url))
            .json(&body)
            .send()
            .await
            .map_err(|e| DigestError::generation(kind, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(DigestError::generation(
                kind,
                format!("Ollama returned {}: {}", status, detail),
            ));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| DigestError::generation(kind, format!("Malformed response: {}", e)))?;

        parsed
            .message
            .map(|m| m.content)
            .ok_or_else(|| DigestError::generation(kind, "Response has no message"))
    }
}
