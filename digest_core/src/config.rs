use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::error::{DigestError, DigestResult};

const MIN_WINDOW_TOKENS: usize = 512;
const WINDOW_SAFETY_MARGIN: usize = 512;

/// Token budgets and round limit driving the map-reduce controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummarizerConfig {
    pub context_window_tokens: usize,
    pub reserved_output_tokens: usize,
    pub per_chunk_target_tokens: Option<usize>,
    pub max_rounds: u32,
}

impl Default for SummarizerConfig {
    fn default() -> Self {
        Self {
            context_window_tokens: 4096,
            reserved_output_tokens: 256,
            per_chunk_target_tokens: None,
            max_rounds: 8,
        }
    }
}

impl SummarizerConfig {
    pub fn effective_window_tokens(&self) -> usize {
        self.context_window_tokens
            .saturating_sub(self.reserved_output_tokens)
            .saturating_sub(WINDOW_SAFETY_MARGIN)
            .max(MIN_WINDOW_TOKENS)
    }

    pub fn per_chunk_target_tokens(&self) -> usize {
        self.per_chunk_target_tokens
            .filter(|&n| n > 0)
            .unwrap_or_else(|| (self.effective_window_tokens() / 2).max(MIN_WINDOW_TOKENS))
    }

    pub fn from_env() -> DigestResult<Self> {
        let defaults = Self::default();
        Ok(Self {
            context_window_tokens: env_or("CONTEXT_WINDOW_TOKENS", defaults.context_window_tokens)?,
            reserved_output_tokens: env_or(
                "RESERVED_OUTPUT_TOKENS",
                defaults.reserved_output_tokens,
            )?,
            // zero means unset
            per_chunk_target_tokens: env_opt("PER_CHUNK_TARGET_TOKENS")?
                .filter(|&n: &usize| n > 0),
            max_rounds: env_or("MAX_ROUNDS", defaults.max_rounds)?,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummaryModel {
    GPT5Nano,
    GPT5Mini,
    GPT41Mini,
    GPT4o,
}

impl SummaryModel {
    pub fn to_openai_model(&self) -> open_ai_rust_responses_by_sshift::Model {
        match self {
            SummaryModel::GPT5Nano => open_ai_rust_responses_by_sshift::Model::GPT5Nano,
            SummaryModel::GPT5Mini => open_ai_rust_responses_by_sshift::Model::GPT5Mini,
            SummaryModel::GPT41Mini => open_ai_rust_responses_by_sshift::Model::GPT41Mini,
            SummaryModel::GPT4o => open_ai_rust_responses_by_sshift::Model::GPT4o,
        }
    }

    /// Reasoning controls are only accepted by the GPT-5 family.
    pub fn is_reasoning(&self) -> bool {
        matches!(self, SummaryModel::GPT5Nano | SummaryModel::GPT5Mini)
    }
}

impl FromStr for SummaryModel {
    type Err = DigestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "gpt-5-nano" => Ok(SummaryModel::GPT5Nano),
            "gpt-5-mini" => Ok(SummaryModel::GPT5Mini),
            "gpt-4.1-mini" => Ok(SummaryModel::GPT41Mini),
            "gpt-4o" => Ok(SummaryModel::GPT4o),
            other => Err(DigestError::Config(format!("Unknown SUMMARY_MODEL: {}", other))),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum BackendConfig {
    OpenAI {
        api_key: String,
        model: SummaryModel,
    },
    Ollama {
        base_url: String,
        model: String,
        temperature: f32,
    },
}

/// Where and how text generation calls are made.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationConfig {
    pub backend: BackendConfig,
    pub language: String,
    pub timeout: Duration,
}

impl GenerationConfig {
    pub fn from_env() -> DigestResult<Self> {
        let backend = env::var("GENERATION_BACKEND").unwrap_or_else(|_| "openai".to_string());

        let backend = match backend.trim().to_lowercase().as_str() {
            "openai" => {
                let api_key = env::var("OPENAI_API_KEY")
                    .map_err(|_| DigestError::Config("OPENAI_API_KEY not set".to_string()))?;
                let model = env::var("SUMMARY_MODEL")
                    .unwrap_or_else(|_| "gpt-5-nano".to_string())
                    .parse()?;
                BackendConfig::OpenAI { api_key, model }
            }
            "ollama" => BackendConfig::Ollama {
                base_url: env::var("OLLAMA_BASE_URL")
                    .unwrap_or_else(|_| "http://127.0.0.1:11434".to_string()),
                model: env::var("OLLAMA_MODEL")
                    .unwrap_or_else(|_| "qwen2.5:1.5b-instruct".to_string()),
                temperature: env_or("TEMPERATURE", 0.0)?,
            },
            other => {
                return Err(DigestError::Config(format!(
                    "Unknown GENERATION_BACKEND: {}",
                    other
                )));
            }
        };

        Ok(Self {
            backend,
            language: env::var("SUMMARY_LANGUAGE").unwrap_or_else(|_| "Russian".to_string()),
            timeout: Duration::from_secs(env_or("GENERATION_TIMEOUT_SECS", 120)?),
        })
    }
}

fn env_or<T: FromStr>(name: &str, default: T) -> DigestResult<T> {
    Ok(env_opt(name)?.unwrap_or(default))
}

fn env_opt<T: FromStr>(name: &str) -> DigestResult<Option<T>> {
    match env::var(name) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| DigestError::Config(format!("{} has an invalid value: {}", name, raw))),
        _ => Ok(None),
    }
}
