use super::CategoryAggregator;
use crate::core::upstream::{Resource, UpstreamError};

#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("search query is empty")]
    EmptyQuery,
    #[error(transparent)]
    Upstream(#[from] UpstreamError),
}

/// Resources whose title contains `query`, ignoring case. Input order is kept.
pub fn filter_by_title(resources: Vec<Resource>, query: &str) -> Vec<Resource> {
    let needle = query.to_lowercase();
    resources
        .into_iter()
        .filter(|resource| resource.title.to_lowercase().contains(&needle))
        .collect()
}

pub async fn search(
    aggregator: &CategoryAggregator,
    query: &str,
) -> Result<Vec<Resource>, SearchError> {
    if query.trim().is_empty() {
        return Err(SearchError::EmptyQuery);
    }

    let all = aggregator.fetch_all().await?.flatten();
    let total = all.len();
    let matches = filter_by_title(all, query);
    tracing::debug!(query, total, matched = matches.len(), "Search complete");
    Ok(matches)
}
