use async_trait::async_trait;
use sled::transaction::{ConflictableTransactionResult, TransactionError};
use sled::{Db, IVec, Transactional, Tree};

use crate::checkpoint::dto::ThreadKey;
use crate::checkpoint::handler::CheckpointStore;
use crate::error::DigestResult;
use crate::summarizer::dto::SummaryState;

const CHECKPOINTS_TREE: &str = "summary_checkpoints";
const SUMMARY_STATES_TREE: &str = "summary_states";

/// Durable tier backed by sled. Also usable on its own as the durable-only
/// checkpoint store.
#[derive(Clone)]
pub struct SledStore {
    checkpoints: Tree,
    states: Tree,
}

impl SledStore {
    pub fn new(db: &Db) -> sled::Result<Self> {
        let checkpoints = db.open_tree(CHECKPOINTS_TREE)?;
        let states = db.open_tree(SUMMARY_STATES_TREE)?;
        Ok(Self {
            checkpoints,
            states,
        })
    }
}

fn decode_cursor(bytes: &[u8]) -> Option<i64> {
    <[u8; 8]>::try_from(bytes).ok().map(i64::from_be_bytes)
}

fn advance(old: Option<&[u8]>, message_id: i64) -> i64 {
    match old.and_then(decode_cursor) {
        Some(current) => current.max(message_id),
        None => message_id,
    }
}

#[async_trait]
impl CheckpointStore for SledStore {
    async fn get_cursor(&self, key: ThreadKey) -> DigestResult<Option<i64>> {
        let cursor = self.checkpoints.get(key.to_bytes())?;
        Ok(cursor.as_deref().and_then(decode_cursor))
    }

    async fn set_cursor(&self, key: ThreadKey, message_id: i64) -> DigestResult<i64> {
        // never move backwards, even if a stale run finishes late
        let stored: Option<IVec> = self.checkpoints.update_and_fetch(key.to_bytes(), |old| {
            Some(advance(old, message_id).to_be_bytes().to_vec())
        })?;
        self.checkpoints.flush_async().await?;

        Ok(stored
            .as_deref()
            .and_then(decode_cursor)
            .unwrap_or(message_id))
    }

    async fn get_summary_state(&self, key: ThreadKey) -> DigestResult<Option<SummaryState>> {
        let Some(bytes) = self.states.get(key.to_bytes())? else {
            return Ok(None);
        };

        match serde_json::from_slice::<SummaryState>(&bytes) {
            Ok(state) => Ok(Some(state)),
            Err(e) => {
                log::warn!("Ignoring malformed summary state for {}: {}", key, e);
                Ok(None)
            }
        }
    }

    async fn set_summary_state(&self, key: ThreadKey, state: &SummaryState) -> DigestResult<()> {
        let json_data = serde_json::to_vec(state)?;
        self.states.insert(key.to_bytes(), json_data)?;
        self.states.flush_async().await?;
        Ok(())
    }

    async fn commit(
        &self,
        key: ThreadKey,
        state: &SummaryState,
        message_id: i64,
    ) -> DigestResult<i64> {
        let json_data = serde_json::to_vec(state)?;
        let db_key = key.to_bytes();

        let stored = (&self.checkpoints, &self.states)
            .transaction(
                |(checkpoints, states)| -> ConflictableTransactionResult<i64, sled::Error> {
                    let old = checkpoints.get(db_key.as_slice())?;
                    let next = advance(old.as_deref(), message_id);
                    checkpoints.insert(db_key.clone(), next.to_be_bytes().to_vec())?;
                    states.insert(db_key.clone(), json_data.clone())?;
                    Ok(next)
                },
            )
            .map_err(|e| match e {
                TransactionError::Abort(e) | TransactionError::Storage(e) => e,
            })?;
        self.checkpoints.flush_async().await?;

        Ok(stored)
    }
}
