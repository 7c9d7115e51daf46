use std::collections::HashMap;
use std::ffi::OsString;
use std::fs::{File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

use async_trait::async_trait;
use fs2::FileExt;
use tempfile::NamedTempFile;
use tokio::sync::RwLock;

use super::{FavoritesError, FavoritesSet, FavoritesStore};

/// Favorites kept in a single JSON document.
///
/// Every mutation rewrites the whole document through a uniquely named
/// staging file in the same directory and a rename. Two locks guard the
/// load-modify-persist cycle: an in-process `RwLock` shared by every store
/// on the same file, and an advisory lock on `<file>.lock` for other
/// processes.
#[derive(Debug, Clone)]
pub struct FileFavoritesStore {
    path: PathBuf,
}

#[derive(Debug, Clone, Copy)]
enum LockMode {
    Shared,
    Exclusive,
}

impl FileFavoritesStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn parent_dir(&self) -> Option<&Path> {
        self.path
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
    }

    fn lock_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(OsString::from)
            .unwrap_or_else(|| OsString::from("favorites.json"));
        name.push(".lock");
        self.path.with_file_name(name)
    }

    async fn load(&self) -> Result<FavoritesSet, FavoritesError> {
        let raw = match tokio::fs::read(&self.path).await {
            Ok(raw) => raw,
            Err(error) if error.kind() == ErrorKind::NotFound => {
                return Ok(FavoritesSet::default());
            }
            Err(source) => {
                return Err(FavoritesError::Read {
                    path: self.path.clone(),
                    source,
                })
            }
        };
        if raw.iter().all(u8::is_ascii_whitespace) {
            return Ok(FavoritesSet::default());
        }
        serde_json::from_slice(&raw).map_err(|source| FavoritesError::Corrupt {
            path: self.path.clone(),
            source,
        })
    }

    async fn persist(&self, set: &FavoritesSet) -> Result<(), FavoritesError> {
        let payload = serde_json::to_vec_pretty(set).map_err(FavoritesError::Encode)?;
        let path = self.path.clone();
        let dir = self
            .parent_dir()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));

        tokio::task::spawn_blocking(move || -> std::io::Result<()> {
            let mut staging = NamedTempFile::new_in(&dir)?;
            staging.write_all(&payload)?;
            staging.as_file().sync_all()?;
            staging.persist(&path).map_err(|error| error.error)?;
            Ok(())
        })
        .await
        .map_err(std::io::Error::other)
        .and_then(|written| written)
        .map_err(|source| FavoritesError::Write {
            path: self.path.clone(),
            source,
        })?;

        tracing::debug!(path = %self.path.display(), count = set.len(), "Persisted favorites");
        Ok(())
    }

    async fn mutate<F>(&self, apply: F) -> Result<FavoritesSet, FavoritesError>
    where
        F: FnOnce(&mut FavoritesSet) -> bool + Send,
    {
        let write_error = |source: std::io::Error| FavoritesError::Write {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.parent_dir() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(write_error)?;
        }

        let lock = path_lock(&self.path);
        let _guard = lock.write().await;
        let _file_lock = lock_file(self.lock_path(), LockMode::Exclusive)
            .await
            .map_err(write_error)?;

        let mut set = self.load().await?;
        if apply(&mut set) {
            self.persist(&set).await?;
        }
        Ok(set)
    }
}

/// The in-process lock for `path`, shared by every store pointing at it.
fn path_lock(path: &Path) -> Arc<RwLock<()>> {
    static LOCKS: OnceLock<Mutex<HashMap<PathBuf, Arc<RwLock<()>>>>> = OnceLock::new();
    let key = lock_key(path);
    let mut locks = LOCKS
        .get_or_init(Default::default)
        .lock()
        .unwrap_or_else(PoisonError::into_inner);
    locks.entry(key).or_default().clone()
}

/// Canonical parent directory joined with the file name, so relative and
/// absolute spellings of one file share a lock.
fn lock_key(path: &Path) -> PathBuf {
    let parent = path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    match (parent.canonicalize(), path.file_name()) {
        (Ok(parent), Some(name)) => parent.join(name),
        _ => std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf()),
    }
}

/// Opens `lock_path` and takes an advisory lock on it. The lock is released
/// when the returned file is closed.
async fn lock_file(lock_path: PathBuf, mode: LockMode) -> std::io::Result<File> {
    tokio::task::spawn_blocking(move || {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)?;
        match mode {
            LockMode::Shared => FileExt::lock_shared(&file)?,
            LockMode::Exclusive => FileExt::lock_exclusive(&file)?,
        }
        Ok(file)
    })
    .await
    .map_err(std::io::Error::other)?
}

#[async_trait]
impl FavoritesStore for FileFavoritesStore {
    fn backend(&self) -> &'static str {
        "file"
    }

    async fn list(&self) -> Result<FavoritesSet, FavoritesError> {
        let lock = path_lock(&self.path);
        let _guard = lock.read().await;
        let _file_lock = match lock_file(self.lock_path(), LockMode::Shared).await {
            Ok(file) => file,
            // No directory yet, so nothing was ever persisted.
            Err(error) if error.kind() == ErrorKind::NotFound => {
                return Ok(FavoritesSet::default());
            }
            Err(source) => {
                return Err(FavoritesError::Read {
                    path: self.path.clone(),
                    source,
                })
            }
        };
        self.load().await
    }

    async fn add(&self, id: &str) -> Result<FavoritesSet, FavoritesError> {
        self.mutate(|set| set.insert(id)).await
    }

    async fn remove(&self, id: &str) -> Result<FavoritesSet, FavoritesError> {
        self.mutate(|set| set.remove(id)).await
    }
}
