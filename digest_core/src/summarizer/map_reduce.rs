use crate::ai::handler::TopicGateway;
use crate::chunker::chunk_by_tokens;
use crate::config::SummarizerConfig;
use crate::error::DigestResult;
use crate::summarizer::dto::{ChunkState, ReduceStage};

/// Drives one topic through chunk-summarize and bounded reduce rounds.
pub struct MapReduceController<'a> {
    gateway: &'a TopicGateway,
    config: &'a SummarizerConfig,
}

impl<'a> MapReduceController<'a> {
    pub fn new(gateway: &'a TopicGateway, config: &'a SummarizerConfig) -> Self {
        Self { gateway, config }
    }

    pub async fn run(&self, mut state: ChunkState) -> DigestResult<ChunkState> {
        let mut stage = ReduceStage::Chunking;

        loop {
            match stage {
                ReduceStage::Chunking => {
                    self.chunk_and_summarize(&mut state).await?;
                    stage = self.route(&state);
                }
                ReduceStage::Reducing => {
                    self.reduce_once(&mut state).await?;
                    stage = self.route(&state);
                }
                ReduceStage::Done => {
                    log::debug!(
                        "Topic '{}' done after {} round(s)",
                        state.topic_label,
                        state.round
                    );
                    return Ok(state);
                }
            }
        }
    }

    async fn chunk_and_summarize(&self, state: &mut ChunkState) -> DigestResult<()> {
        let chunks = chunk_by_tokens(
            &state.text,
            |line| self.gateway.count_tokens(line),
            self.config.per_chunk_target_tokens(),
        );

        if chunks.is_empty() {
            state.text.clear();
            state.round += 1;
            return Ok(());
        }

        log::info!(
            "Topic '{}': summarizing {} chunk(s)",
            state.topic_label,
            chunks.len()
        );

        let mut summaries = Vec::with_capacity(chunks.len());
        for chunk in &chunks {
            summaries.push(self.gateway.summarize_chunk(&state.topic_label, chunk).await?);
        }

        state.text = summaries.join("\n\n");
        state.round += 1;
        Ok(())
    }

    async fn reduce_once(&self, state: &mut ChunkState) -> DigestResult<()> {
        log::info!(
            "Topic '{}': reduce round {} ({} tokens)",
            state.topic_label,
            state.round,
            self.gateway.count_tokens(&state.text)
        );
        state.text = self
            .gateway
            .reduce_summaries(&state.topic_label, &state.text)
            .await?;
        state.round += 1;
        Ok(())
    }

    fn route(&self, state: &ChunkState) -> ReduceStage {
        if state.round >= self.config.max_rounds {
            ReduceStage::Done
        } else if self.gateway.count_tokens(&state.text) > self.config.effective_window_tokens() {
            ReduceStage::Reducing
        } else {
            ReduceStage::Done
        }
    }
}
