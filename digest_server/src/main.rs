mod analyze;
mod digest;
mod docs;
mod error;
mod health;
mod router;
mod state;

use std::env;

use anyhow::Context;
use dotenvy::dotenv;
use router::router;
use state::build_state;

#[tokio::main(flavor = "multi_thread", worker_threads = 4)]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt::init();

    let server_domain = env::var("SERVER_DOMAIN").unwrap_or("0.0.0.0:8000".to_string());

    let state = build_state().await?;
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&server_domain)
        .await
        .with_context(|| format!("Failed to bind {}", server_domain))?;

    log::info!("Digest server listening on {}", server_domain);

    axum::serve(listener, app).await?;
    Ok(())
}
