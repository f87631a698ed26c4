use async_trait::async_trait;
use open_ai_rust_responses_by_sshift::{Client as OAIClient, ReasoningEffort, Request, Verbosity};

use crate::ai::dto::GenerationRequest;
use crate::ai::handler::TextGenerator;
use crate::ai::prompt::build_prompt;
use crate::config::SummaryModel;
use crate::error::{DigestError, DigestResult};

#[derive(Clone)]
pub struct OpenAIGenerator {
    openai_client: OAIClient,
    model: SummaryModel,
    language: String,
    max_output_tokens: u32,
}

impl OpenAIGenerator {
    pub fn new(
        api_key: &str,
        model: SummaryModel,
        language: String,
        max_output_tokens: u32,
    ) -> DigestResult<Self> {
        let openai_client = OAIClient::new(api_key)
            .map_err(|e| DigestError::Config(format!("Failed to create OpenAI client: {}", e)))?;

        Ok(Self {
            openai_client,
            model,
            language,
            max_output_tokens,
        })
    }
}

#[async_trait]
impl TextGenerator for OpenAIGenerator {
    async fn generate(&self, request: &GenerationRequest) -> DigestResult<String> {
        let kind = request.kind();
        let prompt = build_prompt(request, &self.language);

        let mut builder = Request::builder()
            .model(self.model.to_openai_model())
            .instructions(prompt.instructions)
            .input(prompt.input)
            .max_output_tokens(self.max_output_tokens);

        if self.model.is_reasoning() {
            builder = builder
                .verbosity(Verbosity::Low)
                .reasoning_effort(ReasoningEffort::Minimal);
        }

        let response = self
            .openai_client
            .responses
            .create(builder.build())
            .await
            .map_err(|e| DigestError::generation(kind, e.to_string()))?;

        if let Some(usage) = &response.usage {
            log::info!("Generation call {} used {} tokens", kind, usage.total_tokens);
        }

        Ok(response.output_text().trim().to_string())
    }
}
