use digest_core::message::dto::TrackedTopicGroups;
use serde::Deserialize;
use utoipa::ToSchema;

#[derive(Deserialize, Debug, ToSchema)]
pub struct DigestRequest {
    pub chat_id: i64,
    pub thread_id: Option<i64>,
    /// Topic key -> messages with their chat message ids.
    #[schema(value_type = Object)]
    pub topics: TrackedTopicGroups,
}
