//! Resolution of a single resource id against the upstream provider.
//!
//! The provider exposes every category under its own collection, and a bare
//! id does not say which collection it belongs to. Without a category hint
//! the resolver tries every collection in [`Category::ALL`] order and keeps
//! the first record that decodes.

use reqwest::Url;

use crate::core::upstream::{Category, Resource, UpstreamGateway};

#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error("resource id is missing")]
    InvalidId,
    #[error("resource {id} was not found after {attempts} attempt(s)")]
    NotFound { id: String, attempts: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub category: Category,
    pub url: Url,
}

/// Candidate URLs for `id`, in the order they must be tried.
pub fn candidates(
    gateway: &UpstreamGateway,
    category: Option<Category>,
    id: &str,
) -> Vec<Candidate> {
    let categories: Vec<Category> = match category {
        Some(category) => vec![category],
        None => Category::ALL.to_vec(),
    };
    categories
        .into_iter()
        .map(|category| Candidate {
            category,
            url: gateway.resource_url(category, id),
        })
        .collect()
}

#[derive(Debug, Clone)]
pub struct ResourceResolver {
    gateway: UpstreamGateway,
}

impl ResourceResolver {
    pub fn new(gateway: UpstreamGateway) -> Self {
        Self { gateway }
    }

    pub async fn resolve(
        &self,
        category: Option<Category>,
        id: &str,
    ) -> Result<Resource, ResolveError> {
        let id = id.trim();
        if id.is_empty() {
            return Err(ResolveError::InvalidId);
        }

        let candidates = candidates(&self.gateway, category, id);
        let attempts = candidates.len();
        for candidate in candidates {
            match self.gateway.fetch_resource(candidate.url.clone()).await {
                Ok(resource) => {
                    tracing::debug!(id, category = %candidate.category, "Resolved resource");
                    return Ok(resource);
                }
                Err(error) => {
                    tracing::debug!(
                        id,
                        category = %candidate.category,
                        url = %candidate.url,
                        error = %error,
                        "Candidate failed, trying next"
                    );
                }
            }
        }

        tracing::info!(id, attempts, "Resource not found in any candidate");
        Err(ResolveError::NotFound {
            id: id.to_string(),
            attempts,
        })
    }
}
