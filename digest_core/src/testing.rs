use std::sync::Mutex;

use async_trait::async_trait;

use crate::ai::dto::{GenerationRequest, PromptKind};
use crate::ai::handler::TextGenerator;
use crate::error::DigestResult;

type Responder = Box<dyn Fn(&GenerationRequest) -> DigestResult<String> + Send + Sync>;

/// Records every request and answers through a closure.
pub struct StubGenerator {
    calls: Mutex<Vec<GenerationRequest>>,
    responder: Responder,
    tokens_per_line: bool,
}

impl StubGenerator {
    pub fn new<F>(responder: F) -> Self
    where
        F: Fn(&GenerationRequest) -> DigestResult<String> + Send + Sync + 'static,
    {
        Self {
            calls: Mutex::new(Vec::new()),
            responder: Box::new(responder),
            tokens_per_line: false,
        }
    }

    /// Deterministic canned answers for every prompt kind.
    pub fn canned() -> Self {
        Self::new(|request| Ok(canned_answer(request)))
    }

    /// Counts one token per non-blank line instead of the char estimate.
    pub fn with_line_tokens(mut self) -> Self {
        self.tokens_per_line = true;
        self
    }

    pub fn calls(&self) -> Vec<GenerationRequest> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, kind: PromptKind) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.kind() == kind)
            .count()
    }
}

pub fn canned_answer(request: &GenerationRequest) -> String {
    match request {
        GenerationRequest::NameTopic { keywords } => format!("Draft {}", keywords.join(" ")),
        GenerationRequest::SummarizeChunk { .. } => "- chunk summary".to_string(),
        GenerationRequest::ReduceSummaries { .. } => "- reduced summary".to_string(),
        GenerationRequest::UpdateWithPrevious { .. } => "- merged summary".to_string(),
        GenerationRequest::RefineTopicName { keywords, .. } => {
            format!("Topic {}", keywords.join(" "))
        }
    }
}

#[async_trait]
impl TextGenerator for StubGenerator {
    async fn generate(&self, request: &GenerationRequest) -> DigestResult<String> {
        self.calls.lock().unwrap().push(request.clone());
        (self.responder)(request)
    }

    fn count_tokens(&self, text: &str) -> Option<usize> {
        if self.tokens_per_line {
            Some(text.lines().filter(|l| !l.trim().is_empty()).count())
        } else {
            None
        }
    }
}
