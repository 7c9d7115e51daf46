use crate::core::catalog::search::SearchError;
use crate::core::favorites::FavoritesError;
use crate::core::resolver::ResolveError;
use crate::core::upstream::{UnknownCategory, UpstreamError};

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("invalid input: {0}")]
    Validation(String),
    #[error("upstream provider failed: {0}")]
    Upstream(#[from] UpstreamError),
    #[error("resource {id} not found")]
    NotFound { id: String },
    #[error("favorites storage failed: {0}")]
    Persistence(#[from] FavoritesError),
}

impl AppError {
    /// Failures caused by the caller's input rather than by the system.
    pub fn is_client_error(&self) -> bool {
        matches!(self, AppError::Validation(_) | AppError::NotFound { .. })
    }
}

impl From<ResolveError> for AppError {
    fn from(error: ResolveError) -> Self {
        match error {
            invalid @ ResolveError::InvalidId => AppError::Validation(invalid.to_string()),
            ResolveError::NotFound { id, .. } => AppError::NotFound { id },
        }
    }
}

impl From<SearchError> for AppError {
    fn from(error: SearchError) -> Self {
        match error {
            empty @ SearchError::EmptyQuery => AppError::Validation(empty.to_string()),
            SearchError::Upstream(inner) => AppError::Upstream(inner),
        }
    }
}

impl From<UnknownCategory> for AppError {
    fn from(error: UnknownCategory) -> Self {
        AppError::Validation(error.to_string())
    }
}
