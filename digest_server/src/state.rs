use std::{env, sync::Arc};

use anyhow::Context;
use digest_core::{
    ai::handler::generator_from_config,
    checkpoint::{
        cache::RedisCache,
        handler::{CheckpointStore, TieredCheckpoints},
        storage::SledStore,
    },
    config::{GenerationConfig, SummarizerConfig},
    digest::handler::DigestService,
    summarizer::handler::SummaryBuilder,
};

#[derive(Clone)]
pub struct ServerState {
    digest: DigestService,
}

impl From<DigestService> for ServerState {
    fn from(digest: DigestService) -> Self {
        Self { digest }
    }
}

impl ServerState {
    pub fn digest(&self) -> &DigestService {
        &self.digest
    }

    pub fn builder(&self) -> &SummaryBuilder {
        self.digest.builder()
    }
}

pub async fn build_state() -> anyhow::Result<Arc<ServerState>> {
    let summarizer_config = SummarizerConfig::from_env()?;
    let generation_config = GenerationConfig::from_env()?;

    let generator = generator_from_config(&generation_config, &summarizer_config)?;

    let sled_path = env::var("SLED_PATH").unwrap_or("digest_db".to_string());
    let db = sled::open(&sled_path).with_context(|| format!("Failed to open sled DB at {}", sled_path))?;
    let durable = SledStore::new(&db)?;

    let store: Arc<dyn CheckpointStore> = match env::var("REDIS_URL") {
        Ok(redis_url) => match RedisCache::connect(&redis_url).await {
            Ok(cache) => {
                log::info!("Connected to Redis for checkpoints");
                Arc::new(TieredCheckpoints::new(durable, cache))
            }
            Err(e) => {
                log::warn!("Redis unavailable, using sled only for checkpoints: {}", e);
                Arc::new(durable)
            }
        },
        Err(_) => {
            log::info!("REDIS_URL is not set; using sled only for checkpoints");
            Arc::new(durable)
        }
    };

    log::info!(
        "Summarizer window {} tokens, chunk target {} tokens, max {} rounds",
        summarizer_config.effective_window_tokens(),
        summarizer_config.per_chunk_target_tokens(),
        summarizer_config.max_rounds
    );

    let builder = SummaryBuilder::new(generator, summarizer_config);
    Ok(Arc::new(ServerState::from(DigestService::new(builder, store))))
}
