use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::ai::dto::GenerationRequest;
use crate::ai::ollama::OllamaGenerator;
use crate::ai::openai::OpenAIGenerator;
use crate::chunker::approx_token_count;
use crate::config::{BackendConfig, GenerationConfig, SummarizerConfig};
use crate::error::{DigestError, DigestResult};

/// A text generation backend. Implementations turn one request into one
/// string; an empty string is a valid answer.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, request: &GenerationRequest) -> DigestResult<String>;

    /// Native token count, if the backend has one.
    fn count_tokens(&self, _text: &str) -> Option<usize> {
        None
    }
}

/// Builds the backend selected by `GenerationConfig`.
pub fn generator_from_config(
    generation: &GenerationConfig,
    summarizer: &SummarizerConfig,
) -> DigestResult<Arc<dyn TextGenerator>> {
    let generator: Arc<dyn TextGenerator> = match &generation.backend {
        BackendConfig::OpenAI { api_key, model } => {
            let max_output_tokens =
                u32::try_from(summarizer.reserved_output_tokens).map_err(|_| {
                    DigestError::Config(format!(
                        "RESERVED_OUTPUT_TOKENS is too large: {}",
                        summarizer.reserved_output_tokens
                    ))
                })?;
            Arc::new(OpenAIGenerator::new(
                api_key,
                *model,
                generation.language.clone(),
                max_output_tokens,
            )?)
        }
        BackendConfig::Ollama {
            base_url,
            model,
            temperature,
        } => Arc::new(OllamaGenerator::new(
            base_url,
            model.clone(),
            generation.language.clone(),
            *temperature,
            summarizer.context_window_tokens,
            summarizer.reserved_output_tokens,
            generation.timeout,
        )?),
    };
    Ok(generator)
}

/// Typed front for the five topic prompts. Checks the cancellation token
/// before every call and trims every answer.
#[derive(Clone)]
pub struct TopicGateway {
    generator: Arc<dyn TextGenerator>,
    cancel: CancellationToken,
}

impl TopicGateway {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self {
            generator,
            cancel: CancellationToken::new(),
        }
    }

    pub fn with_cancellation(&self, cancel: CancellationToken) -> Self {
        Self {
            generator: self.generator.clone(),
            cancel,
        }
    }

    pub fn count_tokens(&self, text: &str) -> usize {
        self.generator
            .count_tokens(text)
            .unwrap_or_else(|| approx_token_count(text))
    }

    pub async fn name_topic(&self, keywords: &[String]) -> DigestResult<String> {
        self.call(GenerationRequest::NameTopic {
            keywords: keywords.to_vec(),
        })
        .await
    }

    pub async fn summarize_chunk(&self, theme: &str, chunk: &str) -> DigestResult<String> {
        self.call(GenerationRequest::SummarizeChunk {
            theme: theme.to_string(),
            chunk: chunk.to_string(),
        })
        .await
    }

    pub async fn reduce_summaries(&self, theme: &str, summaries: &str) -> DigestResult<String> {
        self.call(GenerationRequest::ReduceSummaries {
            theme: theme.to_string(),
            summaries: summaries.to_string(),
        })
        .await
    }

    pub async fn update_with_previous(
        &self,
        theme: &str,
        previous_summary: &str,
        summary: &str,
    ) -> DigestResult<String> {
        self.call(GenerationRequest::UpdateWithPrevious {
            theme: theme.to_string(),
            previous_summary: previous_summary.to_string(),
            summary: summary.to_string(),
        })
        .await
    }

    pub async fn refine_topic_name(
        &self,
        keywords: &[String],
        summary: &str,
    ) -> DigestResult<String> {
        self.call(GenerationRequest::RefineTopicName {
            keywords: keywords.to_vec(),
            summary: summary.to_string(),
        })
        .await
    }

    async fn call(&self, request: GenerationRequest) -> DigestResult<String> {
        if self.cancel.is_cancelled() {
            return Err(DigestError::Cancelled);
        }

        let kind = request.kind();
        log::debug!("Generation call {}", kind);

        let output = tokio::select! {
            _ = self.cancel.cancelled() => return Err(DigestError::Cancelled),
            output = self.generator.generate(&request) => output,
        };

        match output {
            Ok(text) => Ok(text.trim().to_string()),
            Err(e) => {
                log::error!("Generation call {} failed: {}", kind, e);
                Err(e)
            }
        }
    }
}
