pub mod catalog;
pub mod config;
pub mod error;
pub mod favorites;
pub mod resolver;
pub mod upstream;

#[cfg(test)]
pub(crate) mod test_support;

use std::collections::BTreeMap;
use std::sync::Arc;

use catalog::CategoryAggregator;
use config::Config;
use error::AppError;
use favorites::{FavoritesSet, FavoritesStore};
use resolver::ResourceResolver;
use upstream::{Category, CategoryListing, Resource, UpstreamGateway};

/// The operations a presentation layer calls. Cheap to clone; clones share
/// the same favorites store.
#[derive(Debug, Clone)]
pub struct AppServices {
    gateway: UpstreamGateway,
    resolver: ResourceResolver,
    aggregator: CategoryAggregator,
    favorites: Arc<dyn FavoritesStore>,
}

impl AppServices {
    pub fn new(gateway: UpstreamGateway, favorites: Arc<dyn FavoritesStore>) -> Self {
        Self {
            resolver: ResourceResolver::new(gateway.clone()),
            aggregator: CategoryAggregator::new(gateway.clone()),
            gateway,
            favorites,
        }
    }

    pub async fn from_config(config: &Config) -> Result<Self, AppError> {
        let gateway = UpstreamGateway::new(&config.upstream)?;
        let favorites = favorites::open_store(&config.favorites).await?;
        Ok(Self::new(gateway, favorites))
    }

    pub fn health_report(&self) -> BTreeMap<String, String> {
        let mut report = BTreeMap::new();
        report.insert("upstream".to_string(), self.gateway.base_url().to_string());
        report.insert(
            "favorites".to_string(),
            self.favorites.backend().to_string(),
        );
        report
    }

    pub async fn resolve_one(
        &self,
        category: Option<Category>,
        id: &str,
    ) -> Result<Resource, AppError> {
        Ok(self.resolver.resolve(category, id).await?)
    }

    pub async fn list_category(&self, category: Category) -> Result<Vec<Resource>, AppError> {
        Ok(self.aggregator.fetch_category(category).await?)
    }

    pub async fn list_all_categories(&self) -> Result<CategoryListing, AppError> {
        Ok(self.aggregator.fetch_all().await?)
    }

    pub async fn search(&self, query: &str) -> Result<Vec<Resource>, AppError> {
        Ok(catalog::search::search(&self.aggregator, query).await?)
    }

    pub async fn favorites_list(&self) -> Result<FavoritesSet, AppError> {
        Ok(self.favorites.list().await?)
    }

    pub async fn favorites_add(&self, id: &str) -> Result<FavoritesSet, AppError> {
        let id = require_id(id)?;
        let set = self.favorites.add(id).await?;
        tracing::info!(id, count = set.len(), "Added favorite");
        Ok(set)
    }

    pub async fn favorites_remove(&self, id: &str) -> Result<FavoritesSet, AppError> {
        let id = require_id(id)?;
        let set = self.favorites.remove(id).await?;
        tracing::info!(id, count = set.len(), "Removed favorite");
        Ok(set)
    }

    /// Favorites hydrated into full records, in favorites order. Ids that no
    /// longer resolve are left out of the result but stay in the set.
    pub async fn favorite_resources(&self) -> Result<Vec<Resource>, AppError> {
        let set = self.favorites.list().await?;
        let mut resources = Vec::with_capacity(set.len());
        for id in set.iter() {
            match self.resolver.resolve(None, id).await {
                Ok(resource) => resources.push(resource),
                Err(error) => {
                    tracing::warn!(id, error = %error, "Skipping favorite that does not resolve");
                }
            }
        }
        Ok(resources)
    }
}

fn require_id(id: &str) -> Result<&str, AppError> {
    let id = id.trim();
    if id.is_empty() {
        return Err(AppError::Validation("resource id is missing".to_string()));
    }
    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::favorites::MemoryFavoritesStore;
    use crate::core::test_support::{
        resource_json, resource_list_json, RunningStub, StubUpstream,
    };
    use axum::http::StatusCode;

    fn services_for(stub: &RunningStub) -> AppServices {
        AppServices::new(stub.gateway(), Arc::new(MemoryFavoritesStore::new()))
    }

    #[tokio::test]
    async fn hydration_skips_ids_that_no_longer_resolve() {
        let stub = StubUpstream::new()
            .json("/v3/articles/1", resource_json(1, "Artemis II crew named"))
            .json("/v3/blogs/3", resource_json(3, "Notes from the pad"))
            .spawn()
            .await;
        let services = services_for(&stub);
        services.favorites_add("3").await.expect("add 3");
        services.favorites_add("2").await.expect("add 2");
        services.favorites_add("1").await.expect("add 1");

        let hydrated = services
            .favorite_resources()
            .await
            .expect("hydration should succeed");
        let set = services.favorites_list().await.expect("list should succeed");

        let ids: Vec<i64> = hydrated.iter().map(|item| item.id).collect();
        assert_eq!(ids, vec![3, 1]);
        assert_eq!(set.iter().collect::<Vec<_>>(), vec!["3", "2", "1"]);
    }

    #[tokio::test]
    async fn favorite_mutations_validate_and_trim_ids() {
        let stub = StubUpstream::new().spawn().await;
        let services = services_for(&stub);

        let blank = services.favorites_add("  ").await;
        let set = services.favorites_add(" 42 ").await.expect("add 42");
        let removed = services
            .favorites_remove("42\n")
            .await
            .expect("remove 42");

        assert!(matches!(blank, Err(AppError::Validation(_))));
        assert_eq!(set.iter().collect::<Vec<_>>(), vec!["42"]);
        assert!(removed.is_empty());
    }

    #[tokio::test]
    async fn errors_map_to_taxonomy() {
        let stub = StubUpstream::new()
            .status("/v3/blogs", StatusCode::INTERNAL_SERVER_ERROR)
            .spawn()
            .await;
        let services = services_for(&stub);

        let missing = services.resolve_one(None, "999999").await;
        let empty_query = services.search("").await;
        let outage = services.list_category(Category::Blogs).await;
        let bad_category = "launches".parse::<Category>().map_err(AppError::from);

        match missing {
            Err(AppError::NotFound { id }) => assert_eq!(id, "999999"),
            other => panic!("expected NotFound, got {other:?}"),
        }
        assert!(matches!(empty_query, Err(AppError::Validation(_))));
        assert!(matches!(outage, Err(AppError::Upstream(_))));
        assert!(matches!(bad_category, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn listing_and_health_report() {
        let stub = StubUpstream::new()
            .json("/v3/articles", resource_list_json(&[(1, "One")]))
            .json("/v3/reports", resource_list_json(&[(2, "Two")]))
            .json("/v3/blogs", resource_list_json(&[(3, "Three")]))
            .spawn()
            .await;
        let services = services_for(&stub);

        let listing = services
            .list_all_categories()
            .await
            .expect("listing should succeed");
        let report = services.health_report();

        assert_eq!(listing.get(Category::Blogs)[0].title, "Three");
        assert_eq!(report.get("favorites").map(String::as_str), Some("memory"));
        assert_eq!(report.get("upstream"), Some(&stub.base_url));
    }
}
