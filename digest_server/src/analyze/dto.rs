use digest_core::{message::dto::TopicGroups, summarizer::dto::SummaryState};
use serde::Deserialize;
use utoipa::ToSchema;

#[derive(Deserialize, Debug, ToSchema)]
pub struct AnalyzeRequest {
    /// Topic key -> messages, as produced by the clustering service.
    #[schema(value_type = Object)]
    pub topics: TopicGroups,
    #[schema(value_type = Option<Object>)]
    pub previous_summary: Option<SummaryState>,
}
