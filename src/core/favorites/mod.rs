//! The favorites set and its storage backends.
//!
//! Every backend implements [`FavoritesStore`] with the same semantics: `add`
//! is idempotent, `remove` of an absent id is a no-op, and ids come back in
//! the order they were first added. Mutations on one store are linearized.

pub mod file;
pub mod memory;
pub mod models;
pub mod repository;

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;

use crate::core::config::FavoritesBackend;

pub use file::FileFavoritesStore;
pub use memory::MemoryFavoritesStore;
pub use models::FavoritesSet;
pub use repository::SqliteFavoritesStore;

#[derive(Debug, thiserror::Error)]
pub enum FavoritesError {
    #[error("failed to read favorites from {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write favorites to {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("favorites file {} is corrupt: {source}", path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("favorites could not be serialized: {0}")]
    Encode(#[source] serde_json::Error),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

#[async_trait]
pub trait FavoritesStore: Send + Sync + std::fmt::Debug {
    /// Short backend name for logs and health reports.
    fn backend(&self) -> &'static str;

    /// Current set; an empty set when nothing was ever persisted.
    async fn list(&self) -> Result<FavoritesSet, FavoritesError>;

    async fn add(&self, id: &str) -> Result<FavoritesSet, FavoritesError>;

    async fn remove(&self, id: &str) -> Result<FavoritesSet, FavoritesError>;
}

pub async fn open_store(
    backend: &FavoritesBackend,
) -> Result<Arc<dyn FavoritesStore>, FavoritesError> {
    let store: Arc<dyn FavoritesStore> = match backend {
        FavoritesBackend::File(path) => Arc::new(FileFavoritesStore::new(path)),
        FavoritesBackend::Memory => Arc::new(MemoryFavoritesStore::new()),
        FavoritesBackend::Sqlite(database_url) => {
            Arc::new(SqliteFavoritesStore::connect(database_url).await?)
        }
    };
    tracing::info!(backend = store.backend(), "Opened favorites store");
    Ok(store)
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn assert_set_semantics(store: &dyn FavoritesStore) {
        assert!(store.list().await.expect("initial list").is_empty());

        store.add("10").await.expect("add 10");
        let twice = store.add("10").await.expect("add 10 again");
        assert_eq!(twice.iter().collect::<Vec<_>>(), vec!["10"]);

        store.add("20").await.expect("add 20");
        store.add("30").await.expect("add 30");
        let unchanged = store.remove("404").await.expect("remove absent id");
        assert_eq!(unchanged.iter().collect::<Vec<_>>(), vec!["10", "20", "30"]);

        let removed = store.remove("20").await.expect("remove 20");
        assert_eq!(removed.iter().collect::<Vec<_>>(), vec!["10", "30"]);

        store.add("20").await.expect("re-add 20");
        let listed = store.list().await.expect("final list");
        assert_eq!(listed.iter().collect::<Vec<_>>(), vec!["10", "30", "20"]);
    }

    #[tokio::test]
    async fn file_backend_honors_set_semantics() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = open_store(&FavoritesBackend::File(dir.path().join("favorites.json")))
            .await
            .expect("store should open");

        assert_eq!(store.backend(), "file");
        assert_set_semantics(store.as_ref()).await;
    }

    #[tokio::test]
    async fn memory_backend_honors_set_semantics() {
        let store = open_store(&FavoritesBackend::Memory)
            .await
            .expect("store should open");

        assert_eq!(store.backend(), "memory");
        assert_set_semantics(store.as_ref()).await;
    }

    #[tokio::test]
    async fn sqlite_backend_honors_set_semantics() {
        let store = open_store(&FavoritesBackend::Sqlite("sqlite::memory:".to_string()))
            .await
            .expect("store should open");

        assert_eq!(store.backend(), "sqlite");
        assert_set_semantics(store.as_ref()).await;
    }
}
