use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for response caching
#[derive(Clone, Debug)]
pub struct CacheConfig {
    pub enabled: bool, // false when --no-cache
}

/// Get the platform-appropriate cache directory for leaddesk
pub fn get_cache_path() -> PathBuf {
    dirs::cache_dir()
        .map(|p| p.join("leaddesk/http-cache"))
        .unwrap_or_else(|| {
            PathBuf::from(format!(
                "{}/.cache/leaddesk/http-cache",
                std::env::var("HOME").unwrap_or_default()
            ))
        })
}

/// Clear the response cache directory
pub fn clear_cache() -> Result<()> {
    clear_cache_at(&get_cache_path())
}

fn clear_cache_at(cache_path: &std::path::Path) -> Result<()> {
    match std::fs::remove_dir_all(cache_path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e).context("Failed to remove cache directory"),
    }
}

/// Serializable cache entry: the raw response body and when it was fetched
#[derive(Debug, Serialize, Deserialize)]
pub struct CachedBody {
    pub fetched_at: DateTime<Utc>,
    pub body: Vec<u8>,
}

/// Last-known-good collection bodies, keyed by URL.
///
/// Only consulted when a live request fails after its retries.
#[derive(Clone, Debug)]
pub struct ResponseCache {
    cache_path: PathBuf,
}

impl ResponseCache {
    pub fn new(cache_path: PathBuf) -> Self {
        Self { cache_path }
    }

    pub fn store(&self, url: &str, body: &[u8]) -> Result<()> {
        let entry = CachedBody {
            fetched_at: Utc::now(),
            body: body.to_vec(),
        };
        let json = serde_json::to_vec(&entry)?;
        cacache::write_sync(&self.cache_path, url, &json)
            .with_context(|| format!("Failed to write cache entry for {}", url))?;
        Ok(())
    }

    pub fn load(&self, url: &str) -> Option<CachedBody> {
        let bytes = cacache::read_sync(&self.cache_path, url).ok()?;
        serde_json::from_slice(&bytes).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    #[test]
    fn test_store_and_load() {
        let path = env::temp_dir().join("leaddesk_test_cache_roundtrip");
        let _ = clear_cache_at(&path);

        let cache = ResponseCache::new(path.clone());
        cache
            .store("http://localhost:5000/api/leads", br#"{"success":true,"data":[]}"#)
            .unwrap();

        let loaded = cache.load("http://localhost:5000/api/leads").unwrap();
        assert_eq!(loaded.body, br#"{"success":true,"data":[]}"#.to_vec());
        assert!(loaded.fetched_at <= Utc::now());
        assert!(cache.load("http://localhost:5000/api/customers").is_none());

        let _ = clear_cache_at(&path);
    }

    #[test]
    fn test_clear_missing_dir_is_ok() {
        let path = env::temp_dir().join("leaddesk_test_cache_missing");
        let _ = std::fs::remove_dir_all(&path);
        assert!(clear_cache_at(&path).is_ok());
    }
}
