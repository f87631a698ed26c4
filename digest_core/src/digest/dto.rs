use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::summarizer::dto::SummaryOutput;

/// Result of summarizing one window of a chat thread.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct DigestOutcome {
    pub cursor: Option<i64>,
    /// Messages newer than the previous cursor that went into this run.
    pub processed: usize,
    #[schema(value_type = Object)]
    pub summaries: SummaryOutput,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct DigestSnapshot {
    pub cursor: Option<i64>,
    #[schema(value_type = Object)]
    pub summaries: SummaryOutput,
}
