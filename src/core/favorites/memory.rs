use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{FavoritesError, FavoritesSet, FavoritesStore};

/// Process-local favorites; nothing survives a restart.
#[derive(Debug, Clone, Default)]
pub struct MemoryFavoritesStore {
    set: Arc<RwLock<FavoritesSet>>,
}

impl MemoryFavoritesStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl FavoritesStore for MemoryFavoritesStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn list(&self) -> Result<FavoritesSet, FavoritesError> {
        Ok(self.set.read().await.clone())
    }

    async fn add(&self, id: &str) -> Result<FavoritesSet, FavoritesError> {
        let mut set = self.set.write().await;
        set.insert(id);
        Ok(set.clone())
    }

    async fn remove(&self, id: &str) -> Result<FavoritesSet, FavoritesError> {
        let mut set = self.set.write().await;
        set.remove(id);
        Ok(set.clone())
    }
}
