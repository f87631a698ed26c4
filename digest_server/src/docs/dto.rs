use crate::{analyze, digest, health};
use digest_core::{
    digest::dto::{DigestOutcome, DigestSnapshot},
    message::dto::{Message, MessageKind, TrackedMessage},
    summarizer::dto::TopicSummary,
};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        health::handler::health,
        analyze::handler::analyze,
        digest::handler::digest,
        digest::handler::snapshot,
    ),
    components(schemas(
        health::handler::Health,
        analyze::dto::AnalyzeRequest,
        digest::dto::DigestRequest,
        DigestOutcome,
        DigestSnapshot,
        TopicSummary,
        Message,
        MessageKind,
        TrackedMessage
    ))
)]
pub struct ApiDoc;
