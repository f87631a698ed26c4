use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Stages of a single topic's map-reduce run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReduceStage {
    Chunking,
    Reducing,
    Done,
}

/// Run record carried through the stages; `text` holds the transcript at
/// first and the current summary afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkState {
    pub topic_label: String,
    pub keywords: Vec<String>,
    pub text: String,
    pub round: u32,
}

impl ChunkState {
    pub fn new(topic_label: String, keywords: Vec<String>, text: String) -> Self {
        Self {
            topic_label,
            keywords,
            text,
            round: 0,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct TopicSummary {
    pub theme: String,
    pub summary: String,
}

impl TopicSummary {
    pub fn new(theme: impl Into<String>, summary: impl Into<String>) -> Self {
        Self {
            theme: theme.into(),
            summary: summary.into(),
        }
    }
}

/// Final topic title -> summary record.
pub type SummaryOutput = BTreeMap<String, TopicSummary>;

/// Persisted memory of a chat thread: topic title -> summary text.
pub type SummaryState = BTreeMap<String, String>;

pub fn output_to_state(output: &SummaryOutput) -> SummaryState {
    output
        .iter()
        .map(|(title, record)| (title.clone(), record.summary.clone()))
        .collect()
}

pub fn state_to_output(state: &SummaryState) -> SummaryOutput {
    state
        .iter()
        .map(|(title, summary)| (title.clone(), TopicSummary::new(title.clone(), summary.clone())))
        .collect()
}
