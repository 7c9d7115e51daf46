pub mod gateway;
pub mod types;

pub use gateway::{UpstreamConfig, UpstreamError, UpstreamGateway};
pub use types::{Category, CategoryListing, Resource, UnknownCategory};
