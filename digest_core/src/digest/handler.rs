use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::checkpoint::dto::ThreadKey;
use crate::checkpoint::handler::CheckpointStore;
use crate::digest::dto::{DigestOutcome, DigestSnapshot};
use crate::error::DigestResult;
use crate::message::dto::{TopicGroups, TrackedTopicGroups};
use crate::summarizer::dto::{output_to_state, state_to_output};
use crate::summarizer::handler::SummaryBuilder;

/// Runs the summary builder for a chat thread between reading and advancing
/// its checkpoint. Callers keep at most one run per thread in flight.
#[derive(Clone)]
pub struct DigestService {
    builder: SummaryBuilder,
    store: Arc<dyn CheckpointStore>,
}

impl DigestService {
    pub fn new(builder: SummaryBuilder, store: Arc<dyn CheckpointStore>) -> Self {
        Self { builder, store }
    }

    pub fn builder(&self) -> &SummaryBuilder {
        &self.builder
    }

    pub async fn summarize(
        &self,
        chat_id: i64,
        thread_id: Option<i64>,
        topics: &TrackedTopicGroups,
        cancel: CancellationToken,
    ) -> DigestResult<DigestOutcome> {
        let key = ThreadKey::new(chat_id, thread_id);
        let cursor = self.store.get_cursor(key).await?;
        let (grouped, newest) = select_new_messages(topics, cursor);
        let processed: usize = grouped.values().map(Vec::len).sum();

        let Some(newest) = newest else {
            log::info!("No new messages for {} after cursor {:?}", key, cursor);
            let cursor = match max_message_id(topics) {
                Some(seen) => Some(self.store.set_cursor(key, seen).await?),
                None => cursor,
            };
            let state = self.store.get_summary_state(key).await?.unwrap_or_default();
            return Ok(DigestOutcome {
                cursor,
                processed: 0,
                summaries: state_to_output(&state),
            });
        };

        log::info!(
            "Summarizing {} new message(s) in {} topic(s) for {}",
            processed,
            grouped.len(),
            key
        );

        let previous = self.store.get_summary_state(key).await?;
        let summaries = self
            .builder
            .run_with_cancellation(&grouped, previous.as_ref(), cancel)
            .await?;

        let cursor = self
            .store
            .commit(key, &output_to_state(&summaries), newest)
            .await?;

        log::info!("Stored {} topic(s) for {}, cursor {}", summaries.len(), key, cursor);

        Ok(DigestOutcome {
            cursor: Some(cursor),
            processed,
            summaries,
        })
    }

    pub async fn snapshot(&self, chat_id: i64, thread_id: Option<i64>) -> DigestResult<DigestSnapshot> {
        let key = ThreadKey::new(chat_id, thread_id);
        let cursor = self.store.get_cursor(key).await?;
        let state = self.store.get_summary_state(key).await?.unwrap_or_default();
        Ok(DigestSnapshot {
            cursor,
            summaries: state_to_output(&state),
        })
    }
}

/// Keeps messages newer than `cursor`, dropping topics left empty. Also
/// returns the newest kept message id.
fn select_new_messages(
    topics: &TrackedTopicGroups,
    cursor: Option<i64>,
) -> (TopicGroups, Option<i64>) {
    let mut grouped = TopicGroups::new();
    let mut newest: Option<i64> = None;

    for (topic_key, messages) in topics {
        let fresh: Vec<_> = messages
            .iter()
            .filter(|m| cursor.is_none_or(|c| m.message_id > c))
            .collect();
        if fresh.is_empty() {
            continue;
        }
        for m in &fresh {
            newest = Some(newest.map_or(m.message_id, |n| n.max(m.message_id)));
        }
        grouped.insert(
            topic_key.clone(),
            fresh.into_iter().map(|m| m.message.clone()).collect(),
        );
    }

    (grouped, newest)
}

fn max_message_id(topics: &TrackedTopicGroups) -> Option<i64> {
    topics.values().flatten().map(|m| m.message_id).max()
}
