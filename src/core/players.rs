//! Process-lifetime player catalog.
//!
//! The full `/players/nfl` catalog is fetched once, on first use, and never
//! refreshed: player metadata does not need live invalidation at the
//! timescale of one process.

use std::{collections::HashMap, sync::Arc};
use tokio::sync::OnceCell;
use tracing::info;

use crate::{
    cli::types::PlayerId,
    error::{Result, SleeperError},
    sleeper::{http::SleeperClient, types::PlayerRecord},
};

type Catalog = HashMap<PlayerId, Arc<PlayerRecord>>;

#[derive(Debug, Default)]
pub struct PlayerDirectory {
    players: OnceCell<Catalog>,
}

impl PlayerDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populated directory, mostly for tests.
    pub fn from_records(records: impl IntoIterator<Item = PlayerRecord>) -> Self {
        let catalog = records
            .into_iter()
            .map(|p| (p.player_id.clone(), Arc::new(p)))
            .collect();
        Self {
            players: OnceCell::new_with(Some(catalog)),
        }
    }

    /// Fetch the catalog unless it is already loaded.
    ///
    /// Concurrent callers share one in-flight fetch. A failed (or empty)
    /// fetch leaves the directory unloaded so the next call retries.
    pub async fn ensure_loaded(&self, client: &SleeperClient) -> Result<()> {
        self.players
            .get_or_try_init(|| async {
                let raw = client.players().await?;
                if raw.is_empty() {
                    return Err(SleeperError::NoData {
                        what: "player catalog".to_string(),
                    });
                }
                info!(players = raw.len(), "player directory loaded");
                Ok::<Catalog, SleeperError>(raw.into_iter().map(|(id, p)| (id, Arc::new(p))).collect())
            })
            .await?;
        Ok(())
    }

    pub fn is_loaded(&self) -> bool {
        self.players.initialized()
    }

    pub fn len(&self) -> usize {
        self.players.get().map_or(0, HashMap::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, id: &PlayerId) -> Option<Arc<PlayerRecord>> {
        self.players.get()?.get(id).cloned()
    }

    /// Display name, or the raw id when the player is unknown.
    pub fn name_of(&self, id: &PlayerId) -> String {
        self.get(id).map_or_else(|| id.to_string(), |p| p.name())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<PlayerRecord>> {
        self.players.get().into_iter().flat_map(HashMap::values)
    }
}
