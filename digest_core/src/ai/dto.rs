use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PromptKind {
    NameTopic,
    SummarizeChunk,
    ReduceSummaries,
    UpdateWithPrevious,
    RefineTopicName,
}

impl fmt::Display for PromptKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PromptKind::NameTopic => write!(f, "name_topic"),
            PromptKind::SummarizeChunk => write!(f, "summarize_chunk"),
            PromptKind::ReduceSummaries => write!(f, "reduce_summaries"),
            PromptKind::UpdateWithPrevious => write!(f, "update_with_previous"),
            PromptKind::RefineTopicName => write!(f, "refine_topic_name"),
        }
    }
}

/// A single text generation call with its named inputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationRequest {
    NameTopic {
        keywords: Vec<String>,
    },
    SummarizeChunk {
        theme: String,
        chunk: String,
    },
    ReduceSummaries {
        theme: String,
        summaries: String,
    },
    UpdateWithPrevious {
        theme: String,
        previous_summary: String,
        summary: String,
    },
    RefineTopicName {
        keywords: Vec<String>,
        summary: String,
    },
}

impl GenerationRequest {
    pub fn kind(&self) -> PromptKind {
        match self {
            GenerationRequest::NameTopic { .. } => PromptKind::NameTopic,
            GenerationRequest::SummarizeChunk { .. } => PromptKind::SummarizeChunk,
            GenerationRequest::ReduceSummaries { .. } => PromptKind::ReduceSummaries,
            GenerationRequest::UpdateWithPrevious { .. } => PromptKind::UpdateWithPrevious,
            GenerationRequest::RefineTopicName { .. } => PromptKind::RefineTopicName,
        }
    }
}

/// Prompt split the way chat backends take it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptParts {
    pub instructions: String,
    pub input: String,
}
