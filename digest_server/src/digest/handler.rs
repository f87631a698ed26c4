use std::sync::Arc;

use axum::extract::{Json, Path, State};
use digest_core::digest::dto::{DigestOutcome, DigestSnapshot};
use tokio_util::sync::CancellationToken;

use crate::{digest::dto::DigestRequest, error::ErrorServer, state::ServerState};

#[utoipa::path(
    post,
    path = "/digest",
    request_body = DigestRequest,
    description = "Summarize messages newer than the thread checkpoint and advance it",
    responses(
        (status = 200, description = "Updated summaries", body = DigestOutcome),
        (status = 502, description = "Generation backend failed, checkpoint unchanged"),
        (status = 503, description = "Durable store unavailable"),
    )
)]
#[axum::debug_handler]
pub async fn digest(
    State(server_state): State<Arc<ServerState>>,
    Json(request): Json<DigestRequest>,
) -> Result<Json<DigestOutcome>, ErrorServer> {
    // dropping the request future cancels the run
    let cancel = CancellationToken::new();
    let _guard = cancel.clone().drop_guard();
    let service = server_state.digest().clone();

    let outcome = tokio::spawn(async move {
        service
            .summarize(request.chat_id, request.thread_id, &request.topics, cancel)
            .await
    })
    .await??;

    Ok(Json(outcome))
}

#[utoipa::path(
    get,
    path = "/digest/{chat_id}/{thread_id}",
    params(
        ("chat_id" = i64, Path, description = "Chat id"),
        ("thread_id" = i64, Path, description = "Forum thread id, 0 for none"),
    ),
    description = "Stored summaries and checkpoint of a chat thread",
    responses(
        (status = 200, description = "Snapshot", body = DigestSnapshot),
        (status = 503, description = "Durable store unavailable"),
    )
)]
pub async fn snapshot(
    State(server_state): State<Arc<ServerState>>,
    Path((chat_id, thread_id)): Path<(i64, i64)>,
) -> Result<Json<DigestSnapshot>, ErrorServer> {
    let snapshot = server_state
        .digest()
        .snapshot(chat_id, Some(thread_id))
        .await?;
    Ok(Json(snapshot))
}
