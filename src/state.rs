use std::sync::Arc;
use std::time::{Instant, SystemTime};

use crate::config::Config;
use crate::scoring::{RandomSource, ThreadRandom};
use crate::store::{ClueStore, MemoryClueStore, RedisClueStore};

/// Builds a fresh random source per selection request.
pub type RandomFactory = Arc<dyn Fn() -> Box<dyn RandomSource> + Send + Sync>;

#[derive(Clone)]
pub struct AppState {
    started_at: Instant,
    started_at_system: SystemTime,
    store: Arc<dyn ClueStore>,
    random: RandomFactory,
    fetch_concurrency: usize,
    include_complete_default: bool,
}

impl AppState {
    pub fn new(store: Arc<dyn ClueStore>, config: &Config) -> Self {
        Self {
            started_at: Instant::now(),
            started_at_system: SystemTime::now(),
            store,
            random: Arc::new(|| Box::new(ThreadRandom) as Box<dyn RandomSource>),
            fetch_concurrency: config.fetch_concurrency,
            include_complete_default: config.include_complete_default,
        }
    }

    pub fn with_random(mut self, random: RandomFactory) -> Self {
        self.random = random;
        self
    }

    /// Connects to Redis when configured, otherwise falls back to the
    /// in-memory store.
    pub async fn create_store(config: &Config) -> Arc<dyn ClueStore> {
        let Some(url) = config.redis_url.as_deref() else {
            tracing::warn!("REDIS_URL not set, using in-memory clue store");
            return Arc::new(MemoryClueStore::new());
        };

        match RedisClueStore::connect(url).await {
            Ok(store) => {
                tracing::info!("connected to redis clue store");
                Arc::new(store)
            }
            Err(err) => {
                tracing::error!(error = %err, "redis unavailable, using in-memory clue store");
                Arc::new(MemoryClueStore::new())
            }
        }
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }

    pub fn started_at_system(&self) -> SystemTime {
        self.started_at_system
    }

    pub fn store(&self) -> Arc<dyn ClueStore> {
        Arc::clone(&self.store)
    }

    pub fn random_source(&self) -> Box<dyn RandomSource> {
        (self.random)()
    }

    pub fn fetch_concurrency(&self) -> usize {
        self.fetch_concurrency
    }

    pub fn include_complete_default(&self) -> bool {
        self.include_complete_default
    }
}
