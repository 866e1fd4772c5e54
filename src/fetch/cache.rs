//! Response cache
//!
//! An opaque accelerator in front of the transport: bodies are stored by URL
//! and served back until the whole cache is cleared. There is no expiry and
//! no partial invalidation. Cache I/O failures degrade to a miss.

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use sha2::{Digest, Sha256};
use tracing::{debug, warn};

use crate::error::{FetchError, Result};

#[derive(Debug)]
enum Store {
    Memory(Mutex<HashMap<String, Vec<u8>>>),
    Disk(PathBuf),
}

/// URL-keyed body cache
#[derive(Debug)]
pub struct HttpCache {
    store: Store,
}

impl HttpCache {
    /// Process-local cache
    pub fn memory() -> Self {
        Self {
            store: Store::Memory(Mutex::new(HashMap::new())),
        }
    }

    /// Cache persisted under `dir`, one file per URL
    pub fn disk(dir: impl Into<PathBuf>) -> Self {
        Self {
            store: Store::Disk(dir.into()),
        }
    }

    /// Cached body for `url`, if any
    pub async fn get(&self, url: &str) -> Option<Vec<u8>> {
        match &self.store {
            Store::Memory(map) => {
                let body = map.lock().get(url).cloned();
                body
            }
            Store::Disk(dir) => {
                let path = entry_path(dir, url);
                match tokio::fs::read(&path).await {
                    Ok(body) => Some(body),
                    Err(e) if e.kind() == ErrorKind::NotFound => None,
                    Err(e) => {
                        warn!(path = %path.display(), error = %e, "Unreadable cache entry");
                        None
                    }
                }
            }
        }
    }

    /// Store `body` for `url`
    pub async fn put(&self, url: &str, body: &[u8]) {
        match &self.store {
            Store::Memory(map) => {
                map.lock().insert(url.to_string(), body.to_vec());
            }
            Store::Disk(dir) => {
                let path = entry_path(dir, url);
                let written = match tokio::fs::create_dir_all(dir).await {
                    Ok(()) => tokio::fs::write(&path, body).await,
                    Err(e) => Err(e),
                };
                if let Err(e) = written {
                    warn!(path = %path.display(), error = %e, "Failed to write cache entry");
                }
            }
        }
    }

    /// Drop every entry
    pub async fn clear(&self) -> Result<()> {
        match &self.store {
            Store::Memory(map) => {
                map.lock().clear();
            }
            Store::Disk(dir) => match tokio::fs::remove_dir_all(dir).await {
                Ok(()) => {}
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => {
                    return Err(FetchError::Cache(format!(
                        "failed to clear {}: {}",
                        dir.display(),
                        e
                    ))
                    .into())
                }
            },
        }
        debug!("Response cache cleared");
        Ok(())
    }

    /// Number of cached entries
    pub async fn len(&self) -> usize {
        match &self.store {
            Store::Memory(map) => {
                let count = map.lock().len();
                count
            }
            Store::Disk(dir) => {
                let Ok(mut entries) = tokio::fs::read_dir(dir).await else {
                    return 0;
                };
                let mut count = 0;
                while let Ok(Some(_)) = entries.next_entry().await {
                    count += 1;
                }
                count
            }
        }
    }

    /// Whether the cache holds no entries
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

fn entry_path(dir: &Path, url: &str) -> PathBuf {
    let digest = Sha256::digest(url.as_bytes());
    let name: String = digest.iter().map(|b| format!("{b:02x}")).collect();
    dir.join(format!("{name}.body"))
}
