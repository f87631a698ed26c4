use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::ai::handler::{TextGenerator, TopicGateway};
use crate::config::SummarizerConfig;
use crate::error::DigestResult;
use crate::message::dto::TopicGroups;
use crate::message::helpers::{messages_to_transcript, parse_keywords};
use crate::summarizer::dto::{ChunkState, SummaryOutput, SummaryState, TopicSummary};
use crate::summarizer::map_reduce::MapReduceController;

const UNTITLED_TOPIC: &str = "untitled";

/// Summarizes topic groups and folds them into the previous summary state.
#[derive(Clone)]
pub struct SummaryBuilder {
    gateway: TopicGateway,
    config: SummarizerConfig,
}

impl SummaryBuilder {
    pub fn new(generator: Arc<dyn TextGenerator>, config: SummarizerConfig) -> Self {
        Self {
            gateway: TopicGateway::new(generator),
            config,
        }
    }

    pub async fn run(
        &self,
        grouped: &TopicGroups,
        previous_summary: Option<&SummaryState>,
    ) -> DigestResult<SummaryOutput> {
        self.run_with_cancellation(grouped, previous_summary, CancellationToken::new())
            .await
    }

    /// Same as [`SummaryBuilder::run`], but stops issuing generation calls
    /// once `cancel` fires.
    pub async fn run_with_cancellation(
        &self,
        grouped: &TopicGroups,
        previous_summary: Option<&SummaryState>,
        cancel: CancellationToken,
    ) -> DigestResult<SummaryOutput> {
        let gateway = self.gateway.with_cancellation(cancel);
        let empty = SummaryState::new();
        let previous = previous_summary.unwrap_or(&empty);
        let mut out = SummaryOutput::new();

        for (topic_key, messages) in grouped {
            let transcript = messages_to_transcript(messages);

            if transcript.trim().is_empty() {
                let summary = previous.get(topic_key).cloned().unwrap_or_default();
                let title = if topic_key.trim().is_empty() {
                    UNTITLED_TOPIC
                } else {
                    topic_key.as_str()
                };
                insert_unique(&mut out, title, summary);
                continue;
            }

            log::info!(
                "Summarizing topic '{}' ({} messages)",
                topic_key,
                messages.len()
            );

            let (title, summary) = self
                .summarize_topic(&gateway, topic_key, transcript, previous)
                .await?;
            insert_unique(&mut out, &title, summary);
        }

        for (title, summary) in previous {
            if !out.contains_key(title) {
                log::debug!("Carrying forward topic '{}'", title);
                out.insert(title.clone(), TopicSummary::new(title.clone(), summary.clone()));
            }
        }

        Ok(out)
    }

    async fn summarize_topic(
        &self,
        gateway: &TopicGateway,
        topic_key: &str,
        transcript: String,
        previous: &SummaryState,
    ) -> DigestResult<(String, String)> {
        let keywords = parse_keywords(topic_key);

        let mut draft_title = gateway.name_topic(&keywords).await?;
        if draft_title.is_empty() {
            draft_title = fallback_title(topic_key);
        }

        let state = ChunkState::new(draft_title.clone(), keywords, transcript);
        let done = MapReduceController::new(gateway, &self.config)
            .run(state)
            .await?;
        let mut summary = done.text;

        if let Some(previous_summary) = previous.get(&draft_title) {
            if summary.is_empty() {
                summary = previous_summary.clone();
            } else {
                summary = gateway
                    .update_with_previous(&draft_title, previous_summary, &summary)
                    .await?;
            }
        }

        let mut title = gateway.refine_topic_name(&done.keywords, &summary).await?;
        if title.is_empty() {
            title = draft_title;
        }

        Ok((title, summary))
    }
}

fn fallback_title(topic_key: &str) -> String {
    let trimmed = topic_key.trim();
    if trimmed.is_empty() {
        UNTITLED_TOPIC.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Inserts under `title`, suffixing ` (2)`, ` (3)`... when this run already
/// produced that title.
fn insert_unique(out: &mut SummaryOutput, title: &str, summary: String) {
    let mut key = title.to_string();
    let mut n = 2;
    while out.contains_key(&key) {
        key = format!("{} ({})", title, n);
        n += 1;
    }
    if key != title {
        log::warn!("Topic title '{}' already produced, storing as '{}'", title, key);
    }
    out.insert(key.clone(), TopicSummary::new(key, summary));
}
