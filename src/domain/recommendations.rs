use crate::domain::error::Result;
use crate::ports::outbound::storage::Storage;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::Mutex;

pub const RECOMMENDATIONS_KEY: &str = "edhrec_data.json";
pub const STAPLES_KEY: &str = "edhrec_staples.json";

/// Candidate card id → synergy score in `0..=100`.
pub type Synergies = BTreeMap<String, u8>;

#[derive(Default)]
struct State {
    commanders: BTreeMap<String, Synergies>,
    staples: Option<Vec<String>>,
}

/// Durable commander → synergy map plus the global staple list.
///
/// A single lock covers every read-modify-write together with its flush, so
/// two commanders stored concurrently cannot interleave their writes.
pub struct RecommendationCache<S> {
    storage: Arc<S>,
    state: Mutex<State>,
}

impl<S> RecommendationCache<S>
where
    S: Storage + Send + Sync,
{
    pub async fn load(storage: Arc<S>) -> Result<Self> {
        let commanders = match storage.read(RECOMMENDATIONS_KEY).await? {
            Some(bytes) => serde_json::from_slice(&bytes)?,
            None => BTreeMap::new(),
        };
        let staples = match storage.read(STAPLES_KEY).await? {
            Some(bytes) => Some(serde_json::from_slice(&bytes)?),
            None => None,
        };

        Ok(Self {
            storage,
            state: Mutex::new(State {
                commanders,
                staples,
            }),
        })
    }

    pub async fn get(&self, commander_id: &str) -> Option<Synergies> {
        self.state.lock().await.commanders.get(commander_id).cloned()
    }

    /// Records the synergies for `commander_id`, replacing any older entry,
    /// and persists the full map before returning it.
    pub async fn store(&self, commander_id: &str, synergies: Synergies) -> Result<Synergies> {
        let mut state = self.state.lock().await;
        let previous = state
            .commanders
            .insert(commander_id.to_string(), synergies.clone());

        let bytes = serde_json::to_vec_pretty(&state.commanders)?;
        if let Err(why) = self.storage.write(RECOMMENDATIONS_KEY, &bytes).await {
            match previous {
                Some(previous) => state.commanders.insert(commander_id.to_string(), previous),
                None => state.commanders.remove(commander_id),
            };
            return Err(why.into());
        }
        log::info!("Stored {} recommendations for {commander_id}", synergies.len());

        Ok(synergies)
    }

    pub async fn staples(&self) -> Option<Vec<String>> {
        self.state.lock().await.staples.clone()
    }

    pub async fn store_staples(&self, ids: Vec<String>) -> Result<()> {
        let mut state = self.state.lock().await;
        let bytes = serde_json::to_vec_pretty(&ids)?;
        self.storage.write(STAPLES_KEY, &bytes).await?;
        log::info!("Stored {} staples", ids.len());
        state.staples = Some(ids);

        Ok(())
    }
}
