//! Spaceflight news aggregation: category listings, title search, id lookups
//! that sweep every collection, and a favorites list that survives restarts.
//!
//! [`AppServices`] is the surface a presentation layer talks to.

pub mod core;

pub use crate::core::config::{Config, ConfigError, FavoritesBackend};
pub use crate::core::error::AppError;
pub use crate::core::favorites::{FavoritesError, FavoritesSet, FavoritesStore};
pub use crate::core::upstream::{Category, CategoryListing, Resource, UpstreamError};
pub use crate::core::AppServices;
