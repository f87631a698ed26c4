use axum::Json;
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Serialize, ToSchema)]
pub struct Health {
    pub ok: bool,
}

#[utoipa::path(
    get,
    path = "/health",
    description = "Liveness check",
    responses(
        (status = 200, description = "Service is up", body = Health),
    )
)]
pub async fn health() -> Json<Health> {
    Json(Health { ok: true })
}
