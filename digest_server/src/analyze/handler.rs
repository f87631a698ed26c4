use std::sync::Arc;

use axum::extract::{Json, State};
use digest_core::summarizer::dto::SummaryOutput;
use tokio_util::sync::CancellationToken;

use crate::{analyze::dto::AnalyzeRequest, error::ErrorServer, state::ServerState};

#[utoipa::path(
    post,
    path = "/analyze",
    request_body = AnalyzeRequest,
    description = "Summarize grouped topics against an optional previous summary, without touching stored state",
    responses(
        (status = 200, description = "Topic title -> {theme, summary}"),
        (status = 502, description = "Generation backend failed"),
    )
)]
#[axum::debug_handler]
pub async fn analyze(
    State(server_state): State<Arc<ServerState>>,
    Json(request): Json<AnalyzeRequest>,
) -> Result<Json<SummaryOutput>, ErrorServer> {
    log::info!("Analyze request: topics={}", request.topics.len());

    let cancel = CancellationToken::new();
    let _guard = cancel.clone().drop_guard();
    let builder = server_state.builder().clone();

    let summaries = tokio::spawn(async move {
        builder
            .run_with_cancellation(&request.topics, request.previous_summary.as_ref(), cancel)
            .await
    })
    .await??;

    log::info!("Analyze completed: themes={}", summaries.len());
    Ok(Json(summaries))
}
