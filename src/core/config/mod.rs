use std::path::PathBuf;

use reqwest::Url;

use crate::core::upstream::gateway::{UpstreamConfig, DEFAULT_BASE_URL, DEFAULT_LIST_LIMIT};

pub const DEFAULT_FAVORITES_PATH: &str = "favorites.json";
pub const DEFAULT_DATABASE_URL: &str = "sqlite://favorites.db?mode=rwc";

const BASE_URL_KEY: &str = "ASTROFEED_API_BASE_URL";
const LIST_LIMIT_KEY: &str = "ASTROFEED_LIST_LIMIT";
const BACKEND_KEY: &str = "ASTROFEED_FAVORITES_BACKEND";
const FAVORITES_PATH_KEY: &str = "ASTROFEED_FAVORITES_PATH";
const DATABASE_URL_KEY: &str = "ASTROFEED_DATABASE_URL";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{key} is not a valid url: {value}")]
    InvalidUrl { key: &'static str, value: String },
    #[error("{key} must be a positive integer, got {value:?}")]
    InvalidNumber { key: &'static str, value: String },
    #[error("ASTROFEED_FAVORITES_BACKEND must be one of file, memory, sqlite, got {0:?}")]
    UnknownBackend(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FavoritesBackend {
    File(PathBuf),
    Memory,
    Sqlite(String),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub upstream: UpstreamConfig,
    pub favorites: FavoritesBackend,
}

impl Config {
    /// Reads the process environment after loading `.env.local` and `.env`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::from_filename(".env.local");
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let raw_base = read(BASE_URL_KEY).unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let base_url = parse_base_url(&raw_base)?;

        let list_limit = match read(LIST_LIMIT_KEY) {
            Some(value) => value
                .parse::<u32>()
                .ok()
                .filter(|limit| *limit > 0)
                .ok_or(ConfigError::InvalidNumber {
                    key: LIST_LIMIT_KEY,
                    value,
                })?,
            None => DEFAULT_LIST_LIMIT,
        };

        let backend = read(BACKEND_KEY).unwrap_or_else(|| "file".to_string());
        let favorites = match backend.to_ascii_lowercase().as_str() {
            "file" => FavoritesBackend::File(PathBuf::from(
                read(FAVORITES_PATH_KEY).unwrap_or_else(|| DEFAULT_FAVORITES_PATH.to_string()),
            )),
            "memory" => FavoritesBackend::Memory,
            "sqlite" => FavoritesBackend::Sqlite(
                read(DATABASE_URL_KEY).unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
            ),
            _ => return Err(ConfigError::UnknownBackend(backend)),
        };

        let mut upstream = UpstreamConfig::new(base_url);
        upstream.list_limit = list_limit;
        Ok(Self {
            upstream,
            favorites,
        })
    }
}

fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
    let invalid = || ConfigError::InvalidUrl {
        key: BASE_URL_KEY,
        value: raw.to_string(),
    };
    let url = Url::parse(raw.trim_end_matches('/')).map_err(|_| invalid())?;
    if url.cannot_be_a_base() || !matches!(url.scheme(), "http" | "https") {
        return Err(invalid());
    }
    Ok(url)
}
