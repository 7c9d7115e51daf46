pub mod search;

use crate::core::upstream::{
    Category, CategoryListing, Resource, UpstreamError, UpstreamGateway,
};

#[derive(Debug, Clone)]
pub struct CategoryAggregator {
    gateway: UpstreamGateway,
}

impl CategoryAggregator {
    pub fn new(gateway: UpstreamGateway) -> Self {
        Self { gateway }
    }

    /// One upstream call; upstream order is kept as-is.
    pub async fn fetch_category(
        &self,
        category: Category,
    ) -> Result<Vec<Resource>, UpstreamError> {
        let items = self
            .gateway
            .fetch_resources(self.gateway.collection_url(category))
            .await?;
        tracing::debug!(category = %category, count = items.len(), "Fetched category");
        Ok(items)
    }

    /// All three categories, fetched concurrently. Any failure fails the whole listing.
    pub async fn fetch_all(&self) -> Result<CategoryListing, UpstreamError> {
        let (articles, reports, blogs) = tokio::try_join!(
            self.fetch_category(Category::Articles),
            self.fetch_category(Category::Reports),
            self.fetch_category(Category::Blogs),
        )?;
        Ok(CategoryListing {
            articles,
            reports,
            blogs,
        })
    }
}
