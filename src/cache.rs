//! Persistent response cache.
//!
//! The whole cache is one flat JSON object mapping a request URL to the raw
//! response body. It is loaded once at startup and rewritten in full after
//! every new entry. Entries never expire and are never evicted. The file is
//! owned by a single process; concurrent writers would clobber each other.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::{AppError, Result};

/// URL -> raw response body.
pub type CacheMap = BTreeMap<String, String>;

/// Why the cache document could not be loaded.
#[derive(Debug, thiserror::Error)]
pub enum CacheLoadError {
    #[error("cache file does not exist")]
    Missing,

    #[error("cache file could not be read: {0}")]
    Unreadable(#[source] io::Error),

    #[error("cache file is not a flat JSON object of strings: {0}")]
    Corrupt(#[source] serde_json::Error),
}

/// Handle on the on-disk cache document.
#[derive(Debug, Clone)]
pub struct ResponseCache {
    path: PathBuf,
}

impl ResponseCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the persisted document, reporting exactly why it could not be used.
    pub fn load(&self) -> std::result::Result<CacheMap, CacheLoadError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Err(CacheLoadError::Missing),
            Err(e) => return Err(CacheLoadError::Unreadable(e)),
        };
        serde_json::from_str(&content).map_err(CacheLoadError::Corrupt)
    }

    /// Best-effort load: any failure yields an empty cache.
    pub fn load_or_empty(&self) -> CacheMap {
        match self.load() {
            Ok(cache) => {
                debug!(path = %self.path.display(), entries = cache.len(), "Loaded cache");
                cache
            }
            Err(CacheLoadError::Missing) => {
                debug!(path = %self.path.display(), "No cache file, starting empty");
                CacheMap::new()
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Ignoring unusable cache file");
                CacheMap::new()
            }
        }
    }

    /// Overwrites the document with the full mapping.
    pub fn save(&self, cache: &CacheMap) -> Result<()> {
        let json = serde_json::to_string(cache)
            .map_err(|e| AppError::CacheError(format!("Failed to serialize cache: {}", e)))?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                AppError::CacheError(format!("Failed to create {}: {}", parent.display(), e))
            })?;
        }
        fs::write(&self.path, json).map_err(|e| {
            AppError::CacheError(format!("Failed to write {}: {}", self.path.display(), e))
        })
    }
}
